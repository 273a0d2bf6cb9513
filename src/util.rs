//! Defines the `Error` type for the tally library

use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, TallyError>;

/// Tolerance used when checking that a distribution sums to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Debug, Error)]
pub enum TallyError {

    /// The total weight of a distribution is zero (or not finite), so there is nothing to
    /// normalize against
    #[error("degenerate distribution: total weight is {0}")]
    DegenerateDistribution(f64),

    /// An operation that needs at least one outcome was given an empty distribution
    #[error("the distribution has no outcomes")]
    EmptyDistribution,

    /// A weight was negative, NaN or infinite
    #[error("invalid weight {0}: weights must be finite and non-negative")]
    InvalidWeight(f64),

    /// A likelihood strategy returned a negative, NaN or infinite value for a hypothesis
    #[error("invalid likelihood {value} for hypothesis `{hypothesis}`")]
    InvalidLikelihood {
        hypothesis: String,
        value: f64
    },

    /// A probability argument outside of `[0, 1]`
    #[error("invalid probability {0}: must lie in [0, 1]")]
    InvalidProbability(f64),

    /// A `Prior` that is incompatible with the hypotheses it is applied to
    #[error("an invalid prior was provided")]
    InvalidInitialization,

    /// Two hypotheses were given the same name
    #[error("hypothesis `{0}` was added twice")]
    DuplicateHypothesis(String),

    /// A likelihood table could not be shaped
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError)

}

/// Check that `w` can be stored as a weight.
pub(crate) fn check_weight(w: f64) -> Result<f64> {
    if w.is_finite() && w >= 0.0 {
        Ok(w)
    } else {
        Err(TallyError::InvalidWeight(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights() {
        assert_eq!(check_weight(0.0).unwrap(), 0.0);
        assert_eq!(check_weight(2.5).unwrap(), 2.5);

        for w in [-1.0, std::f64::NAN, std::f64::INFINITY].iter() {
            match check_weight(*w) {
                Err(TallyError::InvalidWeight(_)) => assert!(true),
                _ => panic!("accepted invalid weight {}", w)
            }
        }
    }

    #[test]
    fn messages() {
        let e = TallyError::InvalidLikelihood { hypothesis: String::from("d6"), value: -0.5 };
        assert_eq!(e.to_string(), "invalid likelihood -0.5 for hypothesis `d6`");

        let e = TallyError::DegenerateDistribution(0.0);
        assert_eq!(e.to_string(), "degenerate distribution: total weight is 0");
    }
}
