//! Overlap of the ancestor sets of two term sets.

use super::Similarity;
use crate::err::Error;
use crate::ontology::{Ontology, TermId};

/// Number of shared non-root ancestors, optionally divided by the size of
/// the smaller ancestor set.
#[derive(Debug, Clone, Copy)]
pub struct TermOverlapSimilarity<'a> {
    ontology: &'a Ontology,
    normalized: bool,
}

impl<'a> TermOverlapSimilarity<'a> {
    pub fn new(ontology: &'a Ontology, normalized: bool) -> Self {
        Self {
            ontology,
            normalized,
        }
    }
}

impl Similarity for TermOverlapSimilarity<'_> {
    fn name(&self) -> &'static str {
        "Term overlap similarity"
    }

    fn parameters(&self) -> String {
        format!("{{normalized: {}}}", self.normalized)
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn compute_score(&self, query: &[TermId], target: &[TermId]) -> Result<f64, Error> {
        let query = self.ontology.all_ancestor_term_ids(query, false)?;
        let target = self.ontology.all_ancestor_term_ids(target, false)?;

        let overlap = query.intersection(&target).count() as f64;
        if !self.normalized {
            Ok(overlap)
        } else {
            match query.len().min(target.len()) {
                0 => Ok(0.0),
                min_len => Ok(overlap / min_len as f64),
            }
        }
    }
}
