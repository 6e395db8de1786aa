//! Aggregation of pairwise term similarities to set similarities.

use crate::err::Error;
use crate::ontology::TermId;

use super::PairwiseSimilarity;

/// Set similarity from the best matching pairwise scores.
///
/// Each query term is matched with the target term of maximal pairwise
/// score and the maxima are averaged over the query terms.  The symmetric
/// variant averages both directions.
#[derive(Debug, Clone)]
pub struct CommonAncestorSimilarity<P> {
    pairwise: P,
    symmetric: bool,
}

impl<P: PairwiseSimilarity> CommonAncestorSimilarity<P> {
    pub fn new(pairwise: P, symmetric: bool) -> Self {
        Self {
            pairwise,
            symmetric,
        }
    }

    /// The underlying pairwise similarity.
    pub fn pairwise(&self) -> &P {
        &self.pairwise
    }

    /// Whether both directions are averaged.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// `{symmetric: <bool>}`
    pub fn parameters(&self) -> String {
        format!("{{symmetric: {}}}", self.symmetric)
    }

    /// Compute the (possibly symmetric) score.
    pub fn compute_score(&self, query: &[TermId], target: &[TermId]) -> Result<f64, Error> {
        if self.symmetric {
            Ok(0.5 * (self.score_dir(query, target)? + self.score_dir(target, query)?))
        } else {
            self.score_dir(query, target)
        }
    }

    /// "Directed" part of the score.
    fn score_dir(&self, query: &[TermId], target: &[TermId]) -> Result<f64, Error> {
        if query.is_empty() {
            return Ok(0.0);
        }

        let mut sum = 0.0;
        for q in query {
            let mut best = 0.0f64;
            for t in target {
                best = best.max(self.pairwise.score(q, t)?);
            }
            sum += best;
        }

        Ok(sum / query.len() as f64)
    }
}

#[cfg(test)]
mod test {
    use float_cmp::approx_eq;

    use super::CommonAncestorSimilarity;
    use crate::err::Error;
    use crate::ontology::TermId;
    use crate::similarity::PairwiseSimilarity;
    use crate::test_util::tid;

    /// Scores 1.0 for equal terms and 0.25 otherwise.
    struct Identity;

    impl PairwiseSimilarity for Identity {
        fn score(&self, query: &TermId, target: &TermId) -> Result<f64, Error> {
            Ok(if query == target { 1.0 } else { 0.25 })
        }
    }

    #[rstest::rstest]
    #[case(false, 1.0)]
    #[case(true, 0.5 * (1.0 + 0.625))]
    fn best_match_average(#[case] symmetric: bool, #[case] expected: f64) -> Result<(), anyhow::Error> {
        let sim = CommonAncestorSimilarity::new(Identity, symmetric);

        let score = sim.compute_score(&[tid("X:1")], &[tid("X:1"), tid("X:2")])?;

        assert!(approx_eq!(f64, score, expected, ulps = 2), "{}", score);
        assert_eq!(sim.parameters(), format!("{{symmetric: {}}}", symmetric));

        Ok(())
    }

    #[test]
    fn empty_sets() -> Result<(), anyhow::Error> {
        let sim = CommonAncestorSimilarity::new(Identity, true);

        assert_eq!(sim.compute_score(&[], &[tid("X:1")])?, 0.0);
        assert_eq!(sim.compute_score(&[], &[])?, 0.0);

        Ok(())
    }
}
