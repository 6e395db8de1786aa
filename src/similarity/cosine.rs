//! Cosine similarity of the binary ancestor vectors of two term sets.

use super::Similarity;
use crate::err::Error;
use crate::ontology::{Ontology, TermId};

/// `|A ∩ B| / sqrt(|A| * |B|)` for the non-root ancestor sets `A` and `B`.
#[derive(Debug, Clone, Copy)]
pub struct CosineSimilarity<'a> {
    ontology: &'a Ontology,
}

impl<'a> CosineSimilarity<'a> {
    pub fn new(ontology: &'a Ontology) -> Self {
        Self { ontology }
    }
}

impl Similarity for CosineSimilarity<'_> {
    fn name(&self) -> &'static str {
        "Cosine similarity"
    }

    fn parameters(&self) -> String {
        "{oppositeAware: false}".to_string()
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn compute_score(&self, query: &[TermId], target: &[TermId]) -> Result<f64, Error> {
        let query = self.ontology.all_ancestor_term_ids(query, false)?;
        let target = self.ontology.all_ancestor_term_ids(target, false)?;

        let denominator = ((query.len() * target.len()) as f64).sqrt();
        if denominator == 0.0 {
            Ok(0.0)
        } else {
            Ok(query.intersection(&target).count() as f64 / denominator)
        }
    }
}
