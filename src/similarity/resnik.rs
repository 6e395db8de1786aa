//! Resnik similarity: information content of the most informative common
//! ancestor.

use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use rayon::prelude::*;
use thousands::Separable;

use super::{CommonAncestorSimilarity, PairwiseSimilarity, Similarity};
use crate::common::trace_rss_now;
use crate::err::Error;
use crate::ontology::algo::InformationContent;
use crate::ontology::{Ontology, TermId};

/// Maximal information content in the intersection of two ancestor sets.
fn max_common_information_content(
    lhs: &BTreeSet<TermId>,
    rhs: &BTreeSet<TermId>,
    information_content: &InformationContent,
) -> Result<f64, Error> {
    let mut result = 0.0f64;
    for term_id in lhs.intersection(rhs) {
        result = result.max(information_content.get(term_id)?);
    }
    Ok(result)
}

/// Resnik similarity of two terms, computed on each call.
#[derive(Debug, Clone, Copy)]
pub struct PairwiseResnikSimilarity<'a> {
    ontology: &'a Ontology,
    information_content: &'a InformationContent,
}

impl<'a> PairwiseResnikSimilarity<'a> {
    pub fn new(ontology: &'a Ontology, information_content: &'a InformationContent) -> Self {
        Self {
            ontology,
            information_content,
        }
    }

    /// The information content used for scoring.
    pub fn information_content(&self) -> &'a InformationContent {
        self.information_content
    }
}

impl PairwiseSimilarity for PairwiseResnikSimilarity<'_> {
    fn score(&self, query: &TermId, target: &TermId) -> Result<f64, Error> {
        max_common_information_content(
            &self.ontology.ancestors(query, true)?,
            &self.ontology.ancestors(target, true)?,
            self.information_content,
        )
    }
}

/// Resnik similarity with the scores of all pairs of non-obsolete terms
/// computed on construction.
///
/// Only the upper triangle of the symmetric score matrix is stored.
#[derive(Debug, Clone)]
pub struct PrecomputingPairwiseResnikSimilarity {
    /// Index of each term, assigned in ascending term id order.
    term_id_to_idx: HashMap<TermId, usize>,
    /// Offset of each row in `scores`.
    row_offsets: Vec<usize>,
    /// Row `i` holds the scores of `i` against `i..n`.
    scores: Vec<f64>,
}

impl PrecomputingPairwiseResnikSimilarity {
    /// Compute all scores, in parallel using the global `rayon` pool.
    pub fn new(
        ontology: &Ontology,
        information_content: &InformationContent,
    ) -> Result<Self, Error> {
        let before = Instant::now();
        let term_ids = ontology.non_obsolete_term_ids().iter().collect::<Vec<_>>();
        let n = term_ids.len();
        tracing::info!(
            "Precomputing Resnik similarity for {} term pairs ...",
            (n * (n + 1) / 2).separate_with_commas()
        );

        let ancestors = term_ids
            .par_iter()
            .map(|term_id| ontology.ancestors(term_id, true))
            .collect::<Result<Vec<_>, Error>>()?;
        let rows = (0..n)
            .into_par_iter()
            .map(|i| {
                (i..n)
                    .map(|j| {
                        max_common_information_content(
                            &ancestors[i],
                            &ancestors[j],
                            information_content,
                        )
                    })
                    .collect::<Result<Vec<_>, Error>>()
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let row_offsets = rows
            .iter()
            .scan(0, |offset, row| {
                let result = *offset;
                *offset += row.len();
                Some(result)
            })
            .collect();
        let scores = rows.into_iter().flatten().collect();
        let term_id_to_idx = term_ids
            .into_iter()
            .enumerate()
            .map(|(i, term_id)| (term_id.clone(), i))
            .collect();

        tracing::info!("... done in {:?}", before.elapsed());
        trace_rss_now();
        Ok(Self {
            term_id_to_idx,
            row_offsets,
            scores,
        })
    }

    /// Number of terms in the table.
    pub fn term_count(&self) -> usize {
        self.row_offsets.len()
    }

    fn index(&self, term_id: &TermId) -> Result<usize, Error> {
        self.term_id_to_idx
            .get(term_id)
            .copied()
            .ok_or_else(|| Error::TermNotFound(term_id.to_string()))
    }
}

impl PairwiseSimilarity for PrecomputingPairwiseResnikSimilarity {
    fn score(&self, query: &TermId, target: &TermId) -> Result<f64, Error> {
        let (q, t) = (self.index(query)?, self.index(target)?);
        let (i, j) = if q <= t { (q, t) } else { (t, q) };
        Ok(self.scores[self.row_offsets[i] + (j - i)])
    }
}

/// Set-level Resnik similarity.
#[derive(Debug, Clone)]
pub struct ResnikSimilarity<P> {
    inner: CommonAncestorSimilarity<P>,
}

impl<'a> ResnikSimilarity<PairwiseResnikSimilarity<'a>> {
    /// Construct with pairwise scores computed on demand.
    pub fn new(
        ontology: &'a Ontology,
        information_content: &'a InformationContent,
        symmetric: bool,
    ) -> Self {
        Self::with_pairwise(
            PairwiseResnikSimilarity::new(ontology, information_content),
            symmetric,
        )
    }
}

impl<P: PairwiseSimilarity> ResnikSimilarity<P> {
    /// Construct with the given pairwise Resnik similarity, e.g., a
    /// `PrecomputingPairwiseResnikSimilarity`.
    pub fn with_pairwise(pairwise: P, symmetric: bool) -> Self {
        Self {
            inner: CommonAncestorSimilarity::new(pairwise, symmetric),
        }
    }
}

impl<P: PairwiseSimilarity> Similarity for ResnikSimilarity<P> {
    fn name(&self) -> &'static str {
        "Resnik similarity"
    }

    fn parameters(&self) -> String {
        self.inner.parameters()
    }

    fn is_symmetric(&self) -> bool {
        self.inner.is_symmetric()
    }

    fn compute_score(&self, query: &[TermId], target: &[TermId]) -> Result<f64, Error> {
        self.inner.compute_score(query, target)
    }
}
