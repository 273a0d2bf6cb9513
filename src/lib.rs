//! Discrete probability mass functions, their sums, and Bayesian suites of hypotheses.

pub mod util;
pub mod pmf;
pub mod init;
pub mod suite;
pub mod dice;
pub mod multiset;

pub use util::{Result, TallyError, PROBABILITY_TOLERANCE};
pub use pmf::Pmf;
pub use init::Prior;
pub use suite::{HypothesisId, Likelihood, Suite, SuiteBuilder};
pub use dice::{dice_likelihood, dice_suite, make_die, DiceLikelihood, DiceSuite};
pub use multiset::{can_spell, is_anagram, Multiset};
