//! Dice: the worked example for `Pmf` and `Suite`.
//!
//! A die with `n` sides is a uniform `Pmf` over ```1..=n```. Given a roll, a `DiceSuite` infers
//! which of several dice produced it.

use crate::init::Prior;
use crate::pmf::Pmf;
use crate::suite::{Suite, SuiteBuilder};
use crate::util::{Result, TallyError};

/// The likelihood strategy used by `DiceSuite`
pub type DiceLikelihood = fn(&u32, &Pmf<u32>) -> f64;

/// A `Suite` whose hypotheses are dice
pub type DiceSuite = Suite<Pmf<u32>, DiceLikelihood>;


/// A fair die with `sides` sides, normalized and named ```d{sides}```.
///
/// # Errors
/// * `TallyError::EmptyDistribution` if `sides` is zero
pub fn make_die(sides: u32) -> Result<Pmf<u32>> {
    if sides == 0 {
        return Err(TallyError::EmptyDistribution);
    }

    let mut die = Pmf::from_outcomes(1..=sides);
    die.normalize()?;
    Ok(die.with_name(&format!("d{}", sides)))
}


/// Probability of rolling `roll` with `die`: ```1 / sides``` if the die can show it, else zero
pub fn dice_likelihood(roll: &u32, die: &Pmf<u32>) -> f64 {
    die.prob(roll)
}


/// A `DiceSuite` with one hypothesis per entry of `sides`, each named after its die, and a
/// normalized uniform prior.
///
/// # Errors
/// * `TallyError::EmptyDistribution` if any entry is zero
/// * `TallyError::DuplicateHypothesis` if a die appears twice
pub fn dice_suite(sides: &[u32]) -> Result<DiceSuite> {
    let mut builder = SuiteBuilder::new().with_prior(Prior::Normalized).named("dice");
    for &n in sides {
        let die = make_die(n)?;
        let name = format!("d{}", n);
        builder = builder.with_named_hypothesis(die, &name);
    }

    builder.build(dice_likelihood as DiceLikelihood)
}
