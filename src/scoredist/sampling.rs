//! Sampling of empirical score distributions with random term sets.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use thousands::Separable;

use super::{ObjectScoreDistribution, ScoreDistribution};
use crate::err::Error;
use crate::ontology::{Ontology, TermId};
use crate::similarity::Similarity;

/// Maximal number of draws for picking one random term set.
const MAX_TRIES_FACTOR: usize = 1000;

/// Options for `SimilarityScoreSampling`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, derive_builder::Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ScoreSamplingOptions {
    /// Sample for `min_num_terms..=max_num_terms` terms.
    #[builder(default = "1")]
    pub min_num_terms: usize,
    /// Sample for `min_num_terms..=max_num_terms` terms.
    #[builder(default = "10")]
    pub max_num_terms: usize,
    /// Number of random term sets for each object and number of terms.
    #[builder(default = "100_000")]
    pub num_iterations: usize,
    /// Draw terms from the descendants of this term instead of from all
    /// non-obsolete terms except for the root.
    #[builder(default)]
    pub term_id: Option<TermId>,
    /// Seed for the random number generator.
    #[builder(default = "42")]
    pub seed: u64,
}

impl ScoreSamplingOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        let min_num_terms = self.min_num_terms.unwrap_or(1);
        let max_num_terms = self.max_num_terms.unwrap_or(10);
        if min_num_terms == 0 {
            return Err("min_num_terms must be at least 1".into());
        }
        if min_num_terms > max_num_terms {
            return Err(format!(
                "min_num_terms ({}) must not exceed max_num_terms ({})",
                min_num_terms, max_num_terms
            ));
        }
        if self.num_iterations == Some(0) {
            return Err("num_iterations must be at least 1".into());
        }
        Ok(())
    }
}

impl Default for ScoreSamplingOptions {
    fn default() -> Self {
        Self {
            min_num_terms: 1,
            max_num_terms: 10,
            num_iterations: 100_000,
            term_id: None,
            seed: 42,
        }
    }
}

/// Samples score distributions by scoring random term sets against the terms
/// of each object.
pub struct SimilarityScoreSampling<'a> {
    ontology: &'a Ontology,
    similarity: &'a dyn Similarity,
    options: ScoreSamplingOptions,
}

impl<'a> SimilarityScoreSampling<'a> {
    pub fn new(
        ontology: &'a Ontology,
        similarity: &'a dyn Similarity,
        options: ScoreSamplingOptions,
    ) -> Self {
        Self {
            ontology,
            similarity,
            options,
        }
    }

    /// The terms that random term sets are drawn from.
    pub fn term_universe(&self) -> Result<Vec<TermId>, Error> {
        Ok(match self.options.term_id.as_ref() {
            Some(term_id) => {
                let term_id = self.ontology.primary_term_id(term_id)?;
                self.ontology
                    .descendants(&term_id)?
                    .into_iter()
                    .filter(|t| self.ontology.non_obsolete_term_ids().contains(t))
                    .collect()
            }
            None => self
                .ontology
                .non_obsolete_term_ids()
                .iter()
                .filter(|t| !self.ontology.is_root_term(t))
                .cloned()
                .collect(),
        })
    }

    /// Sample the distributions for all numbers of terms, keyed by the number
    /// of terms.
    pub fn perform_sampling(
        &self,
        object_terms: &BTreeMap<u32, BTreeSet<TermId>>,
    ) -> Result<BTreeMap<usize, ScoreDistribution>, Error> {
        let universe = self.term_universe()?;
        let mut rng = fastrand::Rng::with_seed(self.options.seed);

        let mut result = BTreeMap::new();
        for num_terms in self.options.min_num_terms..=self.options.max_num_terms {
            let dist =
                self.perform_sampling_for_term_count(&universe, object_terms, num_terms, &mut rng)?;
            result.insert(num_terms, dist);
        }
        Ok(result)
    }

    /// Sample the distributions of all objects for `num_terms` terms.
    pub fn perform_sampling_for_term_count(
        &self,
        universe: &[TermId],
        object_terms: &BTreeMap<u32, BTreeSet<TermId>>,
        num_terms: usize,
        rng: &mut fastrand::Rng,
    ) -> Result<ScoreDistribution, Error> {
        tracing::info!(
            "  sampling {} objects for {} terms ...",
            object_terms.len().separate_with_commas(),
            num_terms
        );
        let before = Instant::now();
        if num_terms == 0 || num_terms > universe.len() {
            return Err(Error::InvalidSampling(format!(
                "cannot draw {} distinct terms from {} terms",
                num_terms,
                universe.len()
            )));
        }

        let mut result = ScoreDistribution::new(num_terms, Vec::<ObjectScoreDistribution>::new())?;
        for (object_id, terms) in object_terms {
            let terms = terms.iter().cloned().collect::<Vec<_>>();
            let scores = (0..self.options.num_iterations)
                .map(|_| {
                    let query = pick_random_terms(universe, num_terms, rng)?;
                    self.similarity.compute_score(&query, &terms)
                })
                .collect::<Result<Vec<_>, Error>>()?;
            result.insert(ObjectScoreDistribution::from_scores(
                *object_id, num_terms, scores,
            )?)?;
        }

        tracing::info!("  ... done in {:?}", before.elapsed());
        Ok(result)
    }
}

/// Pick `num_terms` distinct random terms, with a circuit breaker on the
/// number of tries.
fn pick_random_terms(
    universe: &[TermId],
    num_terms: usize,
    rng: &mut fastrand::Rng,
) -> Result<Vec<TermId>, Error> {
    let max_tries = MAX_TRIES_FACTOR * num_terms;
    let mut tries = 0;
    let mut picked = BTreeSet::new();
    while picked.len() < num_terms {
        tries += 1;
        if tries > max_tries {
            return Err(Error::InvalidSampling(format!(
                "tried too often to pick {} random terms",
                num_terms
            )));
        }
        picked.insert(rng.usize(0..universe.len()));
    }
    Ok(picked.into_iter().map(|i| universe[i].clone()).collect())
}
