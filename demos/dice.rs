//! Distributions of the sum of one, two and three six-sided dice.
//!
//! Run with `RUST_LOG=tally=trace` to watch the convolutions.

use tally as t;
use tracing_subscriber::EnvFilter;

fn main() -> t::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let d6 = t::make_die(6)?.with_name("one die");

    let mut twice = &d6 + &d6;
    twice.set_name("two dice");

    // sum of three dice, starting from the identity
    let mut thrice = std::iter::repeat(&d6).take(3).fold(t::Pmf::point(0), |acc, d| acc + d);
    thrice.set_name("three dice");

    for pmf in [&d6, &twice, &thrice].iter() {
        println!("{}", pmf.name().unwrap_or("unnamed"));
        for (total, p) in pmf.render() {
            println!("  {:>2} {:.4}", total, p);
        }

        let (lo, hi) = pmf.credible_interval(90.0)?;
        println!("  mean {:.2}, 90% interval [{}, {}]", pmf.mean()?, lo, hi);
    }

    Ok(())
}
