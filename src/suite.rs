//! Defines a `Suite`, a finite set of hypotheses whose probabilities are revised with Bayes' rule
//! as data are observed.
//!
//! The discrete update is ```posterior(h) ∝ prior(h) * P(datum | h)```. Every hypothesis is scored
//! against the same prior and the result is normalized once, so the order in which hypotheses are
//! visited does not matter.

use crate::init::Prior;
use crate::pmf::Pmf;
use crate::util::{Result, TallyError};

use bidir_map::BidirMap;
use ndarray::{Array2, Axis};
use tracing::{debug, warn};

use std::fmt;


/// Identifies a hypothesis within a `Suite`. Ids are assigned in insertion order when the `Suite`
/// is built, so hypotheses never need to be hashable themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HypothesisId(usize);

impl HypothesisId {

    /// Position of the hypothesis in insertion order
    pub fn index(&self) -> usize {
        self.0
    }

}

impl fmt::Display for HypothesisId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}


/// A `Likelihood` scores a datum against a hypothesis: ```P(datum | hypothesis)```.
///
/// Implementations must be deterministic and return a finite, non-negative value. Zero is legal
/// and rules the hypothesis out for good. Any `Fn(&D, &H) -> f64` is a `Likelihood`.
pub trait Likelihood<D: ?Sized, H> {

    fn likelihood(&self, datum: &D, hypothesis: &H) -> f64;

}

impl<D: ?Sized, H, F> Likelihood<D, H> for F
    where F: Fn(&D, &H) -> f64
{
    fn likelihood(&self, datum: &D, hypothesis: &H) -> f64 {
        self(datum, hypothesis)
    }
}


/// A set of hypotheses of type `H` with a probability for each, updated through the likelihood
/// strategy `L`.
pub struct Suite<H, L> {

    /// The hypotheses, indexed by `HypothesisId`
    hypotheses: Vec<H>,

    /// Current (prior or posterior) weight of each hypothesis
    beliefs: Pmf<HypothesisId>,

    /// The unique name of each hypothesis. This is a two way lookup ```(Id->Name)``` and
    /// ```(Name->Id)```
    names: BidirMap<HypothesisId, String>,

    /// Scores data against hypotheses
    likelihood: L,

    /// Optional display name
    name: Option<String>

}


impl<H, L> Suite<H, L> {

    /// Construct a `Suite` with weight one for every hypothesis. Hypotheses are named after their
    /// ids (```h0, h1, ...```). The weights are not normalized.
    pub fn new<I: IntoIterator<Item = H>>(hypotheses: I, likelihood: L) -> Self {
        let hypotheses: Vec<H> = hypotheses.into_iter().collect();
        let mut names = BidirMap::new();
        for i in 0..hypotheses.len() {
            names.insert(HypothesisId(i), HypothesisId(i).to_string());
        }

        let beliefs = Pmf::from_outcomes((0..hypotheses.len()).map(HypothesisId));

        Suite { hypotheses, beliefs, names, likelihood, name: None }
    }


    /// The display name of this `Suite`, if one was given
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }


    /// The number of hypotheses
    pub fn len(&self) -> usize {
        self.hypotheses.len()
    }


    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
    }


    /// All hypothesis ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = HypothesisId> {
        (0..self.hypotheses.len()).map(HypothesisId)
    }


    pub fn hypothesis(&self, id: HypothesisId) -> Option<&H> {
        self.hypotheses.get(id.0)
    }


    /// The current weight of a hypothesis (zero for unknown ids)
    pub fn prob(&self, id: HypothesisId) -> f64 {
        self.beliefs.prob(&id)
    }


    /// Lookup a hypothesis by name
    pub fn lookup(&self, name: &str) -> Option<HypothesisId> {
        self.names.get_by_second(&String::from(name)).cloned()
    }


    /// Lookup a hypothesis' name
    pub fn name_of(&self, id: HypothesisId) -> Option<&str> {
        self.names.get_by_first(&id).map(|s| s.as_str())
    }


    /// The current weight of the hypothesis called `name`
    pub fn prob_of(&self, name: &str) -> Option<f64> {
        self.lookup(name).map(|id| self.prob(id))
    }


    /// `(id, hypothesis, weight)` triples in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (HypothesisId, &H, f64)> {
        self.hypotheses.iter()
                       .enumerate()
                       .map(move |(i, h)| (HypothesisId(i), h, self.beliefs.prob(&HypothesisId(i))))
    }


    /// The weights as a `Pmf` over hypothesis ids
    pub fn beliefs(&self) -> &Pmf<HypothesisId> {
        &self.beliefs
    }


    /// The sum of all weights
    pub fn total(&self) -> f64 {
        self.beliefs.total()
    }


    /// `(name, weight)` pairs in insertion order, for display
    pub fn render(&self) -> Vec<(String, f64)> {
        self.ids().map(|id| (self.label(id), self.prob(id))).collect()
    }


    /// The most probable hypothesis and its weight. Ties go to the hypothesis inserted first.
    pub fn map_estimate(&self) -> Option<(HypothesisId, f64)> {
        self.beliefs.mode().map(|&id| (id, self.prob(id)))
    }


    /// Normalize the weights so they sum to one.
    ///
    /// # Returns
    /// the total weight before normalization
    ///
    /// # Errors
    /// * `TallyError::DegenerateDistribution` if the total weight is zero
    pub fn normalize(&mut self) -> Result<f64> {
        self.beliefs.normalize()
    }


    /// Condition the `Suite` on one observed datum.
    ///
    /// Each weight is multiplied by ```likelihood(datum, h)``` and the result is normalized.
    ///
    /// # Returns
    /// the normalizing constant ```sum_h prior(h) * P(datum | h)```
    ///
    /// # Errors
    /// * `TallyError::InvalidLikelihood` if the likelihood is negative, NaN or infinite for
    ///   some hypothesis
    /// * `TallyError::DegenerateDistribution` if no hypothesis has any weight left
    ///
    /// On error the `Suite` is left unchanged, so the caller may skip the datum and carry on.
    pub fn update<D: ?Sized>(&mut self, datum: &D) -> Result<f64>
        where L: Likelihood<D, H>
    {
        let mut posterior = Vec::with_capacity(self.len());
        for (i, h) in self.hypotheses.iter().enumerate() {
            let id = HypothesisId(i);
            let like = self.likelihood.likelihood(datum, h);
            self.check_likelihood(id, like)?;

            posterior.push((id, self.beliefs.prob(&id) * like));
        }

        self.commit(posterior, 0.0)
    }


    /// Condition the `Suite` on several data at once, using the product of the per-datum
    /// likelihoods for each hypothesis. The posterior is the same as updating on each datum in
    /// turn.
    ///
    /// The product is taken in log space, so long runs of data do not underflow.
    ///
    /// # Returns
    /// the normalizing constant ```sum_h prior(h) * prod_d P(d | h)```. For long runs this can
    /// underflow to zero even though the posterior is well defined.
    ///
    /// # Errors
    /// The same as `update`. On error the `Suite` is left unchanged.
    pub fn update_batch<D>(&mut self, data: &[D]) -> Result<f64>
        where L: Likelihood<D, H>
    {
        if data.is_empty() {
            return self.normalize();
        }

        let mut likes = Vec::with_capacity(self.len() * data.len());
        for (i, h) in self.hypotheses.iter().enumerate() {
            for datum in data {
                let like = self.likelihood.likelihood(datum, h);
                self.check_likelihood(HypothesisId(i), like)?;
                likes.push(like);
            }
        }

        // rows are hypotheses, columns are data
        let table = Array2::from_shape_vec((self.len(), data.len()), likes)?;
        let log_joint = table.mapv(f64::ln).sum_axis(Axis(1));

        // a zero prior or likelihood gives -inf, which stays at weight zero below
        let log_posterior: Vec<f64> = self.ids()
                                          .zip(log_joint.iter())
                                          .map(|(id, &log_like)| self.prob(id).ln() + log_like)
                                          .collect();

        // the largest weight is scaled to one before leaving log space
        let scale = log_posterior.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let scale = if scale.is_finite() { scale } else { 0.0 };

        let posterior = self.ids()
                            .zip(log_posterior)
                            .map(|(id, w)| (id, (w - scale).exp()))
                            .collect();

        self.commit(posterior, scale)
    }


    /// Replace the beliefs with the normalized `posterior`, or report why that is impossible.
    /// The weights in `posterior` are scaled down by ```exp(log_scale)```.
    fn commit(&mut self, posterior: Vec<(HypothesisId, f64)>, log_scale: f64) -> Result<f64> {
        let normalized = Pmf::from_weights(posterior).and_then(|mut beliefs| {
            let total = beliefs.normalize()?;
            Ok((beliefs, total))
        });

        let (beliefs, total) = match normalized {
            Ok(normalized) => normalized,
            Err(e) => {
                warn!(error = %e, hypotheses = self.len(), suite = ?self.name, "rejected update");
                return Err(e);
            }
        };

        let evidence = total * log_scale.exp();
        self.beliefs = beliefs;
        debug!(evidence, hypotheses = self.len(), suite = ?self.name, "updated suite");
        Ok(evidence)
    }


    fn check_likelihood(&self, id: HypothesisId, like: f64) -> Result<()> {
        if like.is_finite() && like >= 0.0 {
            return Ok(());
        }

        warn!(hypothesis = %self.label(id), likelihood = like, "rejected update: invalid likelihood");
        Err(TallyError::InvalidLikelihood { hypothesis: self.label(id), value: like })
    }


    fn label(&self, id: HypothesisId) -> String {
        self.name_of(id).map(String::from).unwrap_or_else(|| id.to_string())
    }

}


/// An implementation of the [builder pattern] for creating a `Suite` with named hypotheses and
/// a chosen `Prior`.
///
/// [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern
pub struct SuiteBuilder<'a, H> {

    /// The hypotheses, in insertion order
    hypotheses: Vec<H>,

    /// The names of each hypothesis
    names: BidirMap<HypothesisId, String>,

    /// How to weight the hypotheses
    prior: Prior<'a>,

    /// Display name of the suite
    name: Option<String>,

    /// The error state of the builder
    err: Option<TallyError>

}


impl<'a, H> Default for SuiteBuilder<'a, H> {
    fn default() -> Self {
        SuiteBuilder::new()
    }
}


impl<'a, H> SuiteBuilder<'a, H> {

    /// Construct a new `SuiteBuilder` representing an empty `Suite`
    pub fn new() -> Self {
        SuiteBuilder {
            hypotheses: Vec::new(),
            names: BidirMap::new(),
            prior: Prior::default(),
            name: None,
            err: None
        }
    }


    /// Add an anonymous hypothesis. It is named after its id, unless a named hypothesis already
    /// uses that name.
    pub fn with_hypothesis(self, hypothesis: H) -> Self {
        self.add_hypothesis(hypothesis, None)
    }


    /// Add a named hypothesis. Names must be unique within the `Suite`.
    pub fn with_named_hypothesis(self, hypothesis: H, name: &str) -> Self {
        self.add_hypothesis(hypothesis, Some(String::from(name)))
    }


    /// Choose how the hypotheses are weighted. Defaults to `Prior::Uniform`.
    pub fn with_prior(mut self, prior: Prior<'a>) -> Self {
        self.prior = prior;
        self
    }


    /// Give the `Suite` a display name
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(String::from(name));
        self
    }


    /// Complete building the `Suite`.
    ///
    /// # Returns
    /// the `Suite`, or the first error generated during the building process
    ///
    /// # Postcondition
    /// This call consumes the `SuiteBuilder`
    pub fn build<L>(self, likelihood: L) -> Result<Suite<H, L>> {
        if let Some(e) = self.err {
            return Err(e);
        }

        let weights = self.prior.build_weights(self.hypotheses.len())?;
        let beliefs = Pmf::from_weights((0..self.hypotheses.len()).map(HypothesisId).zip(weights))?;

        // anonymous hypotheses take their id as a name once every user name is known
        let mut names = self.names;
        for id in (0..self.hypotheses.len()).map(HypothesisId) {
            let generated = id.to_string();
            if names.get_by_first(&id).is_none() && names.get_by_second(&generated).is_none() {
                names.insert(id, generated);
            }
        }

        Ok(Suite {
            hypotheses: self.hypotheses,
            beliefs,
            names,
            likelihood,
            name: self.name
        })
    }


    /// Internal function that actually does the hypothesis addition
    fn add_hypothesis(mut self, hypothesis: H, name: Option<String>) -> Self {
        if self.err.is_some() {
            return self;
        }

        let id = HypothesisId(self.hypotheses.len());
        if let Some(name) = name {
            if self.names.get_by_second(&name).is_some() {
                self.err = Some(TallyError::DuplicateHypothesis(name));
                return self;
            }
            self.names.insert(id, name);
        }

        self.hypotheses.push(hypothesis);
        self
    }

}
