//! Module containing initialization routines for the prior weights of a `Suite`.

use crate::util::{check_weight, Result, TallyError};

/// Defines possible ways to initialize the prior weights of a `Suite`'s hypotheses.
///
/// No variant normalizes unless it says so; `Suite::normalize` is the explicit step for that.
#[derive(Clone, Copy, Debug)]
pub enum Prior<'a> {
    /// Weight one for every hypothesis
    Uniform,

    /// Weight `1 / n` for each of the `n` hypotheses
    Normalized,

    /// User defined weights, one per hypothesis in insertion order
    Weights(&'a [f64])
}


impl<'a> Default for Prior<'a> {
    fn default() -> Self {
        Prior::Uniform
    }
}


impl<'a> Prior<'a> {

    /// Build the weights for `count` hypotheses, initialized based on ```self```
    ///
    /// # Errors
    /// * `TallyError::InvalidInitialization` if explicit weights do not match `count`
    /// * `TallyError::InvalidWeight` if an explicit weight is negative, NaN or infinite
    pub fn build_weights(self, count: usize) -> Result<Vec<f64>> {
        match self {
            Prior::Uniform => Ok(vec![1.0; count]),
            Prior::Normalized => {
                // normalizing constant is just the number of hypotheses
                Ok(vec![1.0 / (count as f64); count])
            },
            Prior::Weights(ws) => {
                if ws.len() != count {
                    return Err(TallyError::InvalidInitialization);
                }

                ws.iter().map(|&w| check_weight(w)).collect()
            }
        }
    }

}
