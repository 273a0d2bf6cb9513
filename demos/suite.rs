//! Provides an example of how to use tally to work out which die was rolled.
//!
//! A box holds a 4, 6, 8, 12 and 20 sided die. One is picked at random and rolled; given the
//! rolls, how likely is each die?

use tally as t;
use tracing_subscriber::EnvFilter;

fn main() -> t::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut suite = t::dice_suite(&[4, 6, 8, 12, 20])?;

    for roll in [6u32, 8, 7, 7, 5, 4].iter() {
        let evidence = suite.update(roll)?;
        println!("after rolling {} (P = {:.4}):", roll, evidence);
        for (name, p) in suite.render() {
            println!("  {:<3} {:.4}", name, p);
        }
    }

    // a roll no die can produce is reported and skipped
    if let Err(e) = suite.update(&21u32) {
        println!("skipping roll 21: {}", e);
    }

    if let Some((id, p)) = suite.map_estimate() {
        println!("most likely: {} ({:.4})", suite.name_of(id).unwrap_or("?"), p);
    }

    Ok(())
}
