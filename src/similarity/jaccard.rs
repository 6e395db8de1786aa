//! Jaccard index of ancestor sets, weighted with information content.

use std::collections::BTreeSet;

use super::Similarity;
use crate::err::Error;
use crate::ontology::algo::InformationContent;
use crate::ontology::{Ontology, TermId};

/// `sum(IC(A ∩ B)) / sum(IC(A ∪ B))` for the non-root ancestor sets `A` and
/// `B`.
#[derive(Debug, Clone, Copy)]
pub struct JaccardIcWeightedSimilarity<'a> {
    ontology: &'a Ontology,
    information_content: &'a InformationContent,
}

impl<'a> JaccardIcWeightedSimilarity<'a> {
    pub fn new(ontology: &'a Ontology, information_content: &'a InformationContent) -> Self {
        Self {
            ontology,
            information_content,
        }
    }

    fn sum_information_content<'b>(
        &self,
        term_ids: impl Iterator<Item = &'b TermId>,
    ) -> Result<f64, Error> {
        term_ids.map(|t| self.information_content.get(t)).sum()
    }
}

impl Similarity for JaccardIcWeightedSimilarity<'_> {
    fn name(&self) -> &'static str {
        "Jaccard IC-weighted similarity"
    }

    fn parameters(&self) -> String {
        "{normalized: true}".to_string()
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn compute_score(&self, query: &[TermId], target: &[TermId]) -> Result<f64, Error> {
        let query: BTreeSet<TermId> = self.ontology.all_ancestor_term_ids(query, false)?;
        let target: BTreeSet<TermId> = self.ontology.all_ancestor_term_ids(target, false)?;

        let union = self.sum_information_content(query.union(&target))?;
        if union == 0.0 {
            return Ok(0.0);
        }
        let intersection = self.sum_information_content(query.intersection(&target))?;
        Ok(intersection / union)
    }
}

#[cfg(test)]
mod test {
    use float_cmp::approx_eq;

    use super::JaccardIcWeightedSimilarity;
    use crate::similarity::Similarity;
    use crate::test_util::{
        tid, vegetable_information_content, vegetable_ontology, BEET, BLUE_CARROT, CARROT,
        LEAF_VEGETABLE, PUMPKIN, ROOT_VEGETABLE,
    };

    #[rstest::rstest]
    #[case(BEET, 0.0)]
    #[case(BLUE_CARROT, 1.5f64.ln() / (3.0f64.ln() + 1.5f64.ln()))]
    #[case(PUMPKIN, 0.0)]
    #[case(LEAF_VEGETABLE, 0.0)]
    fn against_carrot(#[case] query: &str, #[case] expected: f64) -> Result<(), anyhow::Error> {
        let ontology = vegetable_ontology()?;
        let ic = vegetable_information_content(&ontology)?;
        let similarity = JaccardIcWeightedSimilarity::new(&ontology, &ic);

        let score = similarity.compute_score(&[tid(query)], &[tid(CARROT)])?;

        assert!(approx_eq!(f64, score, expected, epsilon = 1e-12), "{}", score);

        Ok(())
    }

    #[test]
    fn zero_information_content_union() -> Result<(), anyhow::Error> {
        let ontology = vegetable_ontology()?;
        let ic = vegetable_information_content(&ontology)?;
        let similarity = JaccardIcWeightedSimilarity::new(&ontology, &ic);

        // the root vegetable term has zero information content
        let score = similarity.compute_score(&[tid(ROOT_VEGETABLE)], &[])?;

        assert_eq!(score, 0.0);

        Ok(())
    }
}
