//! Definition of the pmf module
//!
//! A `Pmf` is a probability mass function: a finite map from outcomes to non-negative weights.
//! Weights are not required to sum to one until `normalize` is called.

use crate::util::{check_weight, Result, TallyError, PROBABILITY_TOLERANCE};

use indexmap::IndexMap;
use itertools::{iproduct, Itertools};
use ndarray::Array1;
use rand::Rng;
use tracing::{debug, trace};

use std::hash::Hash;
use std::ops::Add;


/// A finite discrete distribution over outcomes of type `T`.
///
/// # Representation
/// Outcomes are held in insertion order, which makes every iteration over a `Pmf` deterministic.
/// A `Pmf` is intentionally neither `Hash` nor `PartialEq`: its contents may change, so it is
/// never used as a key. Compare two distributions with `approx_eq`.
#[derive(Clone, Debug)]
pub struct Pmf<T> {

    /// The weight of each outcome. Weights are always finite and non-negative.
    weights: IndexMap<T, f64>,

    /// Optional display name
    name: Option<String>

}


impl<T: Hash + Eq> Default for Pmf<T> {
    fn default() -> Self {
        Pmf::new()
    }
}


impl<T: Hash + Eq> Pmf<T> {

    /// Construct an empty `Pmf`
    pub fn new() -> Self {
        Pmf { weights: IndexMap::new(), name: None }
    }


    /// Construct a `Pmf` from a sequence of outcomes. The weight of each distinct outcome is the
    /// number of times it occurs. No normalization is performed.
    pub fn from_outcomes<I: IntoIterator<Item = T>>(outcomes: I) -> Self {
        let mut weights = IndexMap::new();
        for outcome in outcomes {
            *weights.entry(outcome).or_insert(0.0) += 1.0;
        }

        Pmf { weights, name: None }
    }


    /// Construct a `Pmf` from `(outcome, weight)` pairs. Repeated outcomes accumulate weight.
    ///
    /// # Errors
    /// * `TallyError::InvalidWeight` if any weight (or accumulated weight) is negative, NaN or
    ///   infinite
    pub fn from_weights<I: IntoIterator<Item = (T, f64)>>(pairs: I) -> Result<Self> {
        let mut weights = IndexMap::new();
        for (outcome, w) in pairs {
            *weights.entry(outcome).or_insert(0.0) += check_weight(w)?;
        }

        for &w in weights.values() {
            check_weight(w)?;
        }

        Ok(Pmf { weights, name: None })
    }


    /// A point mass: weight one on `value`. This is the identity of `combine_sum` when `value`
    /// is the additive identity of `T`.
    pub fn point(value: T) -> Self {
        let mut weights = IndexMap::new();
        weights.insert(value, 1.0);
        Pmf { weights, name: None }
    }


    /// Builder-style naming
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(String::from(name));
        self
    }


    pub fn set_name(&mut self, name: &str) {
        self.name = Some(String::from(name));
    }


    /// The display name of this `Pmf`, if one was given
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }


    /// The weight of `outcome`. Outcomes that are not in the `Pmf` have weight zero.
    pub fn prob(&self, outcome: &T) -> f64 {
        self.weights.get(outcome).cloned().unwrap_or(0.0)
    }


    /// The sum of all weights
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }


    /// The number of distinct outcomes
    pub fn len(&self) -> usize {
        self.weights.len()
    }


    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }


    pub fn contains(&self, outcome: &T) -> bool {
        self.weights.contains_key(outcome)
    }


    /// The outcomes, in insertion order
    pub fn outcomes(&self) -> impl Iterator<Item = &T> {
        self.weights.keys()
    }


    /// The `(outcome, weight)` pairs in insertion order. This is the deterministic ordering to
    /// use for outcome types that have no total order.
    pub fn items(&self) -> impl Iterator<Item = (&T, f64)> {
        self.weights.iter().map(|(o, &w)| (o, w))
    }


    /// `true` if the weights sum to one
    pub fn is_normalized(&self) -> bool {
        !self.is_empty() && (self.total() - 1.0).abs() <= PROBABILITY_TOLERANCE
    }


    /// Rescale every weight by `1 / total` so that the weights sum to one.
    ///
    /// # Returns
    /// the total weight before normalization
    ///
    /// # Errors
    /// * `TallyError::DegenerateDistribution` if the total is zero (this includes the empty
    ///   `Pmf`) or not finite. The `Pmf` is left unchanged.
    pub fn normalize(&mut self) -> Result<f64> {
        let total = self.total();
        if !(total > 0.0 && total.is_finite()) {
            return Err(TallyError::DegenerateDistribution(total));
        }

        for w in self.weights.values_mut() {
            *w /= total;
        }

        debug!(total, outcomes = self.weights.len(), name = ?self.name, "normalized distribution");
        Ok(total)
    }


    /// `true` if both distributions assign the same weight (within `tol`) to every outcome.
    /// An outcome missing from one side counts as weight zero there.
    pub fn approx_eq(&self, other: &Pmf<T>, tol: f64) -> bool {
        self.weights.keys()
            .chain(other.weights.keys())
            .all(|o| (self.prob(o) - other.prob(o)).abs() <= tol)
    }


    /// The outcome with the largest weight. Ties go to the outcome inserted first.
    pub fn mode(&self) -> Option<&T> {
        let mut best: Option<(&T, f64)> = None;
        for (o, &w) in self.weights.iter() {
            match best {
                Some((_, bw)) if bw >= w => (),
                _ => best = Some((o, w))
            }
        }

        best.map(|(o, _)| o)
    }


    /// Total weight, checked to be usable as a normalizing constant
    fn positive_total(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(TallyError::EmptyDistribution);
        }

        let total = self.total();
        if total > 0.0 && total.is_finite() {
            Ok(total)
        } else {
            Err(TallyError::DegenerateDistribution(total))
        }
    }

}


impl<T: Hash + Eq + Clone> Pmf<T> {

    /// Distribution of `X + Y` where `X ~ self` and `Y ~ other` are independent.
    ///
    /// Every pair of outcomes contributes `w1 * w2` to the outcome `o1 + o2`. The result is not
    /// renormalized; its total is the product of the operands' totals. Neither operand is
    /// modified and the result is unnamed.
    pub fn combine_sum(&self, other: &Pmf<T>) -> Pmf<T>
        where T: Add<Output = T>
    {
        let mut weights = IndexMap::new();
        for ((o1, &w1), (o2, &w2)) in iproduct!(self.weights.iter(), other.weights.iter()) {
            *weights.entry(o1.clone() + o2.clone()).or_insert(0.0) += w1 * w2;
        }

        trace!(left = self.len(), right = other.len(), outcomes = weights.len(), "combined distributions");
        Pmf { weights, name: None }
    }


    /// Distribution of the sum of `n` independent draws from this `Pmf`, starting from a point
    /// mass at `zero`.
    pub fn repeated_sum(&self, n: usize, zero: T) -> Pmf<T>
        where T: Add<Output = T>
    {
        (0..n).fold(Pmf::point(zero), |acc, _| acc.combine_sum(self))
    }


    /// Draw one outcome with probability proportional to its weight.
    ///
    /// # Errors
    /// * `TallyError::EmptyDistribution` if there are no outcomes
    /// * `TallyError::DegenerateDistribution` if all weights are zero
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Result<T> {
        let total = self.positive_total()?;
        let target = rng.gen::<f64>() * total;

        let mut cumulative = 0.0;
        let mut last = None;
        for (o, &w) in self.weights.iter().filter(|&(_, &w)| w > 0.0) {
            cumulative += w;
            if target < cumulative {
                return Ok(o.clone());
            }
            last = Some(o);
        }

        // rounding can leave target just above the final cumulative weight
        last.cloned().ok_or(TallyError::EmptyDistribution)
    }


    /// The weighted mean of the outcomes
    ///
    /// # Errors
    /// * `TallyError::EmptyDistribution` if there are no outcomes
    /// * `TallyError::DegenerateDistribution` if all weights are zero
    pub fn mean(&self) -> Result<f64>
        where T: Into<f64>
    {
        let total = self.positive_total()?;
        let mut acc = 0.0;
        for (o, &w) in self.weights.iter() {
            let x: f64 = o.clone().into();
            acc += x * w;
        }

        Ok(acc / total)
    }

}


impl<T: Hash + Eq + Clone + Ord> Pmf<T> {

    /// The `(outcome, probability)` pairs sorted by outcome. Does not modify the `Pmf`.
    pub fn render(&self) -> Vec<(T, f64)> {
        self.weights.iter()
                    .map(|(o, &w)| (o.clone(), w))
                    .sorted_by(|a, b| a.0.cmp(&b.0))
                    .collect()
    }


    /// `render`, split into an outcome column and a probability column
    pub fn render_columns(&self) -> (Vec<T>, Array1<f64>) {
        let (outcomes, probs): (Vec<T>, Vec<f64>) = self.render().into_iter().unzip();
        (outcomes, Array1::from(probs))
    }


    /// The smallest outcome whose cumulative probability reaches `p`.
    ///
    /// # Errors
    /// * `TallyError::InvalidProbability` if `p` is not in `[0, 1]`
    /// * `TallyError::EmptyDistribution` / `TallyError::DegenerateDistribution` if there is no
    ///   probability mass
    pub fn percentile(&self, p: f64) -> Result<T> {
        if !(0.0..=1.0).contains(&p) {
            return Err(TallyError::InvalidProbability(p));
        }

        let total = self.positive_total()?;
        let target = p * total;

        let mut cumulative = 0.0;
        let mut last = None;
        for (o, w) in self.render() {
            cumulative += w;
            if cumulative >= target - PROBABILITY_TOLERANCE * total {
                return Ok(o);
            }
            last = Some(o);
        }

        last.ok_or(TallyError::EmptyDistribution)
    }


    /// The central interval holding `percentage` percent of the probability mass
    pub fn credible_interval(&self, percentage: f64) -> Result<(T, T)> {
        if !(0.0..=100.0).contains(&percentage) {
            return Err(TallyError::InvalidProbability(percentage / 100.0));
        }

        let tail = (1.0 - percentage / 100.0) / 2.0;
        Ok((self.percentile(tail)?, self.percentile(1.0 - tail)?))
    }

}


impl<T: Hash + Eq> FromIterator<T> for Pmf<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Pmf::from_outcomes(iter)
    }
}


impl<'a, 'b, T> Add<&'b Pmf<T>> for &'a Pmf<T>
    where T: Hash + Eq + Clone + Add<Output = T>
{
    type Output = Pmf<T>;

    fn add(self, other: &'b Pmf<T>) -> Pmf<T> {
        self.combine_sum(other)
    }
}


impl<'b, T> Add<&'b Pmf<T>> for Pmf<T>
    where T: Hash + Eq + Clone + Add<Output = T>
{
    type Output = Pmf<T>;

    fn add(self, other: &'b Pmf<T>) -> Pmf<T> {
        self.combine_sum(other)
    }
}


impl<T> Add for Pmf<T>
    where T: Hash + Eq + Clone + Add<Output = T>
{
    type Output = Pmf<T>;

    fn add(self, other: Pmf<T>) -> Pmf<T> {
        self.combine_sum(&other)
    }
}


// Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f64 = 1e-12;

    fn d6() -> Pmf<u32> {
        let mut d6 = Pmf::from_outcomes(1..7);
        d6.normalize().expect("unexpected error");
        d6.with_name("one die")
    }

    #[test]
    fn counts() {
        let pmf: Pmf<&str> = vec!["a", "b", "a", "c", "a"].into_iter().collect();

        assert_eq!(3, pmf.len());
        assert_eq!(3.0, pmf.prob(&"a"));
        assert_eq!(1.0, pmf.prob(&"b"));
        assert_eq!(0.0, pmf.prob(&"z"));
        assert_eq!(5.0, pmf.total());
        assert!(!pmf.is_normalized());
        assert_eq!(vec![&"a", &"b", &"c"], pmf.outcomes().collect::<Vec<_>>());
    }

    #[test]
    fn weights() {
        let pmf = Pmf::from_weights(vec![("x", 0.25), ("y", 0.5), ("x", 0.25)]).unwrap();
        assert_eq!(0.5, pmf.prob(&"x"));
        assert_eq!(0.5, pmf.prob(&"y"));
        assert!(pmf.is_normalized());

        match Pmf::from_weights(vec![("x", 1.0), ("y", -0.5)]) {
            Err(TallyError::InvalidWeight(w)) => assert_eq!(-0.5, w),
            _ => panic!("negative weight accepted")
        };

        match Pmf::from_weights(vec![("x", std::f64::NAN)]) {
            Err(TallyError::InvalidWeight(_)) => assert!(true),
            _ => panic!("NaN weight accepted")
        };
    }

    #[test]
    fn normalize() {
        let mut pmf = Pmf::from_outcomes(vec![1, 1, 2, 4]);
        let total = pmf.normalize().unwrap();

        assert_eq!(4.0, total);
        assert!(pmf.is_normalized());
        assert!((pmf.prob(&1) - 0.5).abs() < EPS);
        assert!((pmf.prob(&2) - 0.25).abs() < EPS);
        assert!((pmf.prob(&4) - 0.25).abs() < EPS);
    }

    #[test]
    fn normalize_degenerate() {
        let mut empty: Pmf<u32> = Pmf::new();
        match empty.normalize() {
            Err(TallyError::DegenerateDistribution(t)) => assert_eq!(0.0, t),
            _ => panic!("normalized an empty distribution")
        };
        assert!(empty.is_empty());

        let mut zeros = Pmf::from_weights(vec![(1, 0.0), (2, 0.0)]).unwrap();
        assert!(zeros.normalize().is_err());
        assert_eq!(0.0, zeros.prob(&1));
        assert!(zeros.items().all(|(_, w)| !w.is_nan()));
    }

    #[test]
    fn names() {
        let mut pmf = d6();
        assert_eq!(Some("one die"), pmf.name());
        pmf.set_name("d6");
        assert_eq!(Some("d6"), pmf.name());

        let twice = &pmf + &pmf;
        assert_eq!(None, twice.name());
    }

    #[test]
    fn two_dice() {
        let d6 = d6();
        let twice = &d6 + &d6;

        assert_eq!(11, twice.len());
        assert!((twice.prob(&7) - 6.0 / 36.0).abs() < EPS);
        assert!((twice.prob(&2) - 1.0 / 36.0).abs() < EPS);
        assert!((twice.prob(&12) - 1.0 / 36.0).abs() < EPS);
        assert_eq!(Some(&7), twice.mode());
        assert!(twice.is_normalized());

        // operands untouched
        assert_eq!(6, d6.len());
        assert!(d6.is_normalized());
    }

    #[test]
    fn three_dice() {
        let d6 = d6();
        let folded = vec![&d6; 3].into_iter().fold(Pmf::point(0), |acc, d| acc + d);
        let repeated = d6.repeated_sum(3, 0);

        assert_eq!(16, folded.len());
        assert!(folded.approx_eq(&repeated, EPS));
        assert!((folded.prob(&3) - 1.0 / 216.0).abs() < EPS);
        assert!((folded.prob(&10) - 27.0 / 216.0).abs() < EPS);
        assert!((folded.prob(&11) - 27.0 / 216.0).abs() < EPS);
        assert!(folded.is_normalized());
    }

    #[test]
    fn combine_empty() {
        let empty: Pmf<i32> = Pmf::new();
        let d6 = Pmf::from_outcomes(1..7);

        assert!(empty.combine_sum(&d6).is_empty());
        assert!(d6.combine_sum(&empty).is_empty());
    }

    #[test]
    fn combine_identity() {
        let d6 = d6();
        let shifted = d6.combine_sum(&Pmf::point(0));
        assert!(shifted.approx_eq(&d6, EPS));

        let shifted = d6.combine_sum(&Pmf::point(10));
        assert_eq!(0.0, shifted.prob(&1));
        assert!((shifted.prob(&11) - 1.0 / 6.0).abs() < EPS);
    }

    #[test]
    fn render_sorted() {
        let pmf = Pmf::from_outcomes(vec![5, 3, 9, 3]);
        let rendered = pmf.render();
        assert_eq!(vec![(3, 2.0), (5, 1.0), (9, 1.0)], rendered);

        // render is read-only
        assert_eq!(vec![&5, &3, &9], pmf.outcomes().collect::<Vec<_>>());

        let (outcomes, probs) = pmf.render_columns();
        assert_eq!(vec![3, 5, 9], outcomes);
        assert_eq!(3, probs.len());
        assert_eq!(2.0, probs[0]);
        assert_eq!(4.0, probs.sum());
    }

    #[test]
    fn approx_eq() {
        let a = Pmf::from_weights(vec![(1, 0.5), (2, 0.5)]).unwrap();
        let b = Pmf::from_weights(vec![(2, 0.5), (1, 0.5), (3, 0.0)]).unwrap();
        let c = Pmf::from_weights(vec![(1, 0.4), (2, 0.6)]).unwrap();

        assert!(a.approx_eq(&b, EPS));
        assert!(b.approx_eq(&a, EPS));
        assert!(!a.approx_eq(&c, EPS));
        assert!(a.approx_eq(&c, 0.2));
    }

    #[test]
    fn mode_ties() {
        let pmf = Pmf::from_outcomes(vec!["b", "a", "a", "b"]);
        assert_eq!(Some(&"b"), pmf.mode());

        let empty: Pmf<u8> = Pmf::new();
        assert_eq!(None, empty.mode());
    }

    #[test]
    fn mean() {
        assert!((d6().mean().unwrap() - 3.5).abs() < EPS);

        // mean does not require normalized weights
        let pmf = Pmf::from_outcomes(vec![2u32, 2, 8]);
        assert!((pmf.mean().unwrap() - 4.0).abs() < EPS);

        let empty: Pmf<u32> = Pmf::new();
        match empty.mean() {
            Err(TallyError::EmptyDistribution) => assert!(true),
            _ => panic!("mean of an empty distribution")
        };
    }

    #[test]
    fn percentiles() {
        let d6 = d6();
        assert_eq!(1, d6.percentile(0.0).unwrap());
        assert_eq!(3, d6.percentile(0.5).unwrap());
        assert_eq!(4, d6.percentile(0.51).unwrap());
        assert_eq!(6, d6.percentile(1.0).unwrap());

        match d6.percentile(1.5) {
            Err(TallyError::InvalidProbability(p)) => assert_eq!(1.5, p),
            _ => panic!("accepted invalid probability")
        };

        let twice = &d6 + &d6;
        assert_eq!((3, 11), twice.credible_interval(90.0).unwrap());
        assert!(twice.credible_interval(120.0).is_err());
    }

    #[test]
    fn sample() {
        let pmf = Pmf::from_weights(vec![("never", 0.0), ("rare", 1.0), ("common", 3.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let draws: Vec<&str> = (0..4000).map(|_| pmf.sample(&mut rng).unwrap()).collect();
        let counts = Pmf::from_outcomes(draws);

        assert_eq!(0.0, counts.prob(&"never"));
        let frac = counts.prob(&"common") / 4000.0;
        assert!((frac - 0.75).abs() < 0.05, "common drawn {} of the time", frac);
    }

    #[test]
    fn sample_degenerate() {
        let mut rng = StdRng::seed_from_u64(7);

        let empty: Pmf<u32> = Pmf::new();
        match empty.sample(&mut rng) {
            Err(TallyError::EmptyDistribution) => assert!(true),
            _ => panic!("sampled an empty distribution")
        };

        let zeros = Pmf::from_weights(vec![(1u32, 0.0)]).unwrap();
        match zeros.sample(&mut rng) {
            Err(TallyError::DegenerateDistribution(_)) => assert!(true),
            _ => panic!("sampled a zero distribution")
        };
    }
}
