//! Jiang similarity, derived from Resnik similarity.

use super::{CommonAncestorSimilarity, PairwiseResnikSimilarity, PairwiseSimilarity, Similarity};
use crate::err::Error;
use crate::ontology::algo::InformationContent;
use crate::ontology::{Ontology, TermId};

/// Pairwise Jiang similarity `1 / (IC(q) + IC(t) - 2 * resnik(q, t) + 1)`.
#[derive(Debug, Clone, Copy)]
pub struct PairwiseJiangSimilarity<'a> {
    resnik: PairwiseResnikSimilarity<'a>,
}

impl<'a> PairwiseJiangSimilarity<'a> {
    pub fn new(resnik: PairwiseResnikSimilarity<'a>) -> Self {
        Self { resnik }
    }
}

impl PairwiseSimilarity for PairwiseJiangSimilarity<'_> {
    fn score(&self, query: &TermId, target: &TermId) -> Result<f64, Error> {
        let information_content = self.resnik.information_content();
        let resnik = self.resnik.score(query, target)?;
        Ok(1.0
            / (information_content.get(query)? + information_content.get(target)?
                - 2.0 * resnik
                + 1.0))
    }
}

/// Set-level Jiang similarity.
#[derive(Debug, Clone)]
pub struct JiangSimilarity<'a> {
    inner: CommonAncestorSimilarity<PairwiseJiangSimilarity<'a>>,
}

impl<'a> JiangSimilarity<'a> {
    pub fn new(
        ontology: &'a Ontology,
        information_content: &'a InformationContent,
        symmetric: bool,
    ) -> Self {
        Self {
            inner: CommonAncestorSimilarity::new(
                PairwiseJiangSimilarity::new(PairwiseResnikSimilarity::new(
                    ontology,
                    information_content,
                )),
                symmetric,
            ),
        }
    }
}

impl Similarity for JiangSimilarity<'_> {
    fn name(&self) -> &'static str {
        "Jiang similarity"
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
