//! Number of terms shared by two term sets.

use std::collections::HashSet;

use super::Similarity;
use crate::err::Error;
use crate::ontology::TermId;

/// `|query ∩ target|` on the given terms, without the ontology.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleFeatureVectorSimilarity;

impl Similarity for SimpleFeatureVectorSimilarity {
    fn name(&self) -> &'static str {
        "Simple feature vector similarity"
    }

    fn parameters(&self) -> String {
        "{}".to_string()
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn compute_score(&self, query: &[TermId], target: &[TermId]) -> Result<f64, Error> {
        let query: HashSet<&TermId> = query.iter().collect();
        let target: HashSet<&TermId> = target.iter().collect();
        Ok(query.intersection(&target).count() as f64)
    }
}

#[cfg(test)]
mod test {
    use super::SimpleFeatureVectorSimilarity;
    use crate::similarity::Similarity;
    use crate::test_util::tid;

    #[rstest::rstest]
    #[case(&["HP:0000008", "HP:0000009"], &["HP:0000008"], 1.0)]
    #[case(&["HP:0000008", "HP:0000009"], &["HP:0000008", "HP:0000010"], 1.0)]
    #[case(&["HP:0000009"], &["HP:0000008", "HP:0000010"], 0.0)]
    #[case(&["HP:0000008", "HP:0000008"], &["HP:0000008"], 1.0)]
    fn shared_terms(
        #[case] query: &[&str],
        #[case] target: &[&str],
        #[case] expected: f64,
    ) -> Result<(), anyhow::Error> {
        let query = query.iter().map(|t| tid(t)).collect::<Vec<_>>();
        let target = target.iter().map(|t| tid(t)).collect::<Vec<_>>();

        let score = SimpleFeatureVectorSimilarity.compute_score(&query, &target)?;

        assert_eq!(score, expected);

        Ok(())
    }
}
