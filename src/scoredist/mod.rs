//! Empirical score distributions for estimating the significance of
//! similarity scores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::err::Error;

pub mod prepare;
pub mod query;
pub mod sampling;
pub mod text;

/// Tolerance when checking that the last cumulative frequency is 1.0.
const PROBABILITY_EPSILON: f64 = 1e-9;

/// Empirical distribution of the scores of random term sets against one
/// object for a fixed number of terms.
///
/// Deserialization goes through `ObjectScoreDistribution::new()` and thus
/// applies the same validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ObjectScoreDistributionData")]
pub struct ObjectScoreDistribution {
    /// Id of the object, e.g., an NCBI gene id.
    object_id: u32,
    /// Number of terms in the random term sets.
    num_terms: usize,
    /// Number of random term sets drawn.
    sample_size: usize,
    /// `(score, P(X <= score))` sorted by strictly increasing score.
    cumulative_frequencies: Vec<(f64, f64)>,
}

/// Unvalidated serialized form of `ObjectScoreDistribution`.
#[derive(Debug, Deserialize)]
struct ObjectScoreDistributionData {
    object_id: u32,
    num_terms: usize,
    sample_size: usize,
    cumulative_frequencies: Vec<(f64, f64)>,
}

impl TryFrom<ObjectScoreDistributionData> for ObjectScoreDistribution {
    type Error = Error;

    fn try_from(data: ObjectScoreDistributionData) -> Result<Self, Self::Error> {
        Self::new(
            data.object_id,
            data.num_terms,
            data.sample_size,
            data.cumulative_frequencies,
        )
    }
}

impl ObjectScoreDistribution {
    /// Construct from a cumulative frequency table.
    ///
    /// The table is sorted by score and for equal scores the last given
    /// probability is kept.
    ///
    /// # Errors
    ///
    /// `Error::EmptyDistribution` for an empty table, `Error::InvalidDistribution`
    /// if a score is NaN, a probability is outside of `[0, 1]`, the
    /// probabilities decrease, or the last probability is not 1.0.
    pub fn new<I>(
        object_id: u32,
        num_terms: usize,
        sample_size: usize,
        cumulative_frequencies: I,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut table = cumulative_frequencies.into_iter().collect::<Vec<_>>();
        if table.iter().any(|(score, _)| score.is_nan()) {
            return Err(Error::InvalidDistribution(format!(
                "NaN score for object {}",
                object_id
            )));
        }
        // stable sort keeps the input order of equal scores
        table.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut collapsed: Vec<(f64, f64)> = Vec::with_capacity(table.len());
        for (score, p) in table {
            match collapsed.last_mut() {
                Some(last) if last.0 == score => last.1 = p,
                _ => collapsed.push((score, p)),
            }
        }

        let last_p = match collapsed.last() {
            Some((_, p)) => *p,
            None => return Err(Error::EmptyDistribution),
        };
        if collapsed.iter().any(|(_, p)| !(0.0..=1.0).contains(p)) {
            return Err(Error::InvalidDistribution(format!(
                "probability outside of [0, 1] for object {}",
                object_id
            )));
        }
        if collapsed.windows(2).any(|w| w[1].1 < w[0].1) {
            return Err(Error::InvalidDistribution(format!(
                "decreasing cumulative frequencies for object {}",
                object_id
            )));
        }
        if (last_p - 1.0).abs() > PROBABILITY_EPSILON {
            return Err(Error::InvalidDistribution(format!(
                "last cumulative frequency is {} instead of 1.0 for object {}",
                last_p, object_id
            )));
        }

        Ok(Self {
            object_id,
            num_terms,
            sample_size,
            cumulative_frequencies: collapsed,
        })
    }

    /// Construct from the raw scores of the random samples.
    ///
    /// The probability of each distinct score is the fraction of samples with
    /// a score less than or equal to it.
    pub fn from_scores(object_id: u32, num_terms: usize, mut scores: Vec<f64>) -> Result<Self, Error> {
        if scores.iter().any(|s| s.is_nan()) {
            return Err(Error::InvalidDistribution(format!(
                "NaN score for object {}",
                object_id
            )));
        }
        scores.sort_by(|a, b| a.total_cmp(b));

        let n = scores.len();
        let table = scores
            .iter()
            .enumerate()
            .filter(|(i, score)| *i + 1 == n || scores[*i + 1] != **score)
            .map(|(i, score)| (*score, (i + 1) as f64 / n as f64))
            .collect::<Vec<_>>();
        Self::new(object_id, num_terms, n, table)
    }

    pub fn object_id(&self) -> u32 {
        self.object_id
    }

    pub fn num_terms(&self) -> usize {
        self.num_terms
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// The `(score, P(X <= score))` table.
    pub fn cumulative_frequencies(&self) -> &[(f64, f64)] {
        &self.cumulative_frequencies
    }

    /// The distinct observed scores in increasing order.
    pub fn observed_scores(&self) -> Vec<f64> {
        self.cumulative_frequencies.iter().map(|(s, _)| *s).collect()
    }

    /// Estimate `P(X <= score)` by linear interpolation between the
    /// bracketing table entries.
    ///
    /// Scores outside of the table's range get the first or last probability.
    pub fn estimate_p_value(&self, score: f64) -> f64 {
        let table = &self.cumulative_frequencies;
        let idx = table.partition_point(|(s, _)| *s < score);
        if idx == 0 {
            return table[0].1;
        } else if idx == table.len() {
            return table[idx - 1].1;
        }

        let (hi_score, hi_p) = table[idx];
        if hi_score == score {
            return hi_p;
        }
        let (lo_score, lo_p) = table[idx - 1];
        lo_p + (score - lo_score) / (hi_score - lo_score) * (hi_p - lo_p)
    }

    /// The `(score, probability)` table, resampled to `resolution + 1` evenly
    /// spaced points of the observed scores or verbatim with `None`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidResolution` for a resolution of zero.
    pub fn resampled(&self, resolution: Option<usize>) -> Result<Vec<(f64, f64)>, Error> {
        let resolution = match resolution {
            None => return Ok(self.cumulative_frequencies.clone()),
            Some(0) => return Err(Error::InvalidResolution(0)),
            Some(resolution) => resolution,
        };

        let observed = self.observed_scores();
        let n = observed.len();
        Ok((0..=resolution)
            .map(|i| {
                let pos = ((n as f64 - 1.0) / resolution as f64) * i as f64;
                let left = (pos.floor() as usize).min(n - 1);
                let right = (pos.ceil() as usize).min(n - 1);
                let dx = right as f64 - pos;
                let score = observed[left] + (1.0 - dx) * (observed[right] - observed[left]);
                (score, self.estimate_p_value(score))
            })
            .collect())
    }
}

/// Score distributions of all objects for one number of terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScoreDistributionData")]
pub struct ScoreDistribution {
    /// Number of terms in the random term sets.
    num_terms: usize,
    /// Distributions by object id.
    object_distributions: BTreeMap<u32, ObjectScoreDistribution>,
}

/// Unvalidated serialized form of `ScoreDistribution`.
#[derive(Debug, Deserialize)]
struct ScoreDistributionData {
    num_terms: usize,
    object_distributions: BTreeMap<u32, ObjectScoreDistribution>,
}

impl TryFrom<ScoreDistributionData> for ScoreDistribution {
    type Error = Error;

    fn try_from(data: ScoreDistributionData) -> Result<Self, Self::Error> {
        if let Some((key, dist)) = data
            .object_distributions
            .iter()
            .find(|(key, dist)| **key != dist.object_id)
        {
            return Err(Error::InvalidDistribution(format!(
                "distribution of object {} stored under key {}",
                dist.object_id, key
            )));
        }
        Self::new(data.num_terms, data.object_distributions.into_values())
    }
}

impl ScoreDistribution {
    /// Construct from the object distributions.
    ///
    /// # Errors
    ///
    /// `Error::InvalidDistribution` if an object distribution is for a
    /// different number of terms.
    pub fn new<I>(num_terms: usize, object_distributions: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = ObjectScoreDistribution>,
    {
        let mut result = Self {
            num_terms,
            object_distributions: BTreeMap::new(),
        };
        for dist in object_distributions {
            result.insert(dist)?;
        }
        Ok(result)
    }

    /// Add or replace the distribution of one object.
    pub fn insert(&mut self, dist: ObjectScoreDistribution) -> Result<(), Error> {
        if dist.num_terms != self.num_terms {
            return Err(Error::InvalidDistribution(format!(
                "distribution of object {} is for {} terms, expected {}",
                dist.object_id, dist.num_terms, self.num_terms
            )));
        }
        self.object_distributions.insert(dist.object_id, dist);
        Ok(())
    }

    pub fn num_terms(&self) -> usize {
        self.num_terms
    }

    /// Ids of the objects in ascending order.
    pub fn object_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.object_distributions.keys().copied()
    }

    /// All object distributions in ascending order of object id.
    pub fn object_distributions(&self) -> impl Iterator<Item = &ObjectScoreDistribution> {
        self.object_distributions.values()
    }

    /// The distribution of the given object, if any.
    pub fn object_distribution(&self, object_id: u32) -> Option<&ObjectScoreDistribution> {
        self.object_distributions.get(&object_id)
    }

    /// Estimate the p-value of `score` for the given object, if known.
    pub fn estimate_p_value(&self, object_id: u32, score: f64) -> Option<f64> {
        self.object_distribution(object_id)
            .map(|dist| dist.estimate_p_value(score))
    }
}

#[cfg(test)]
mod test {
    use float_cmp::approx_eq;
    use pretty_assertions::assert_eq;

    use super::{ObjectScoreDistribution, ScoreDistribution};
    use crate::err::Error;

    fn example() -> Result<ObjectScoreDistribution, Error> {
        ObjectScoreDistribution::from_scores(
            1,
            2,
            vec![0.5, 0.1, 0.2, 0.2, 0.9, 0.5, 0.5, 0.3, 0.1, 0.7],
        )
    }

    #[test]
    fn from_scores() -> Result<(), anyhow::Error> {
        let dist = example()?;

        assert_eq!(dist.object_id(), 1);
        assert_eq!(dist.num_terms(), 2);
        assert_eq!(dist.sample_size(), 10);
        assert_eq!(
            dist.cumulative_frequencies(),
            &[
                (0.1, 0.2),
                (0.2, 0.4),
                (0.3, 0.5),
                (0.5, 0.8),
                (0.7, 0.9),
                (0.9, 1.0)
            ]
        );

        Ok(())
    }

    #[rstest::rstest]
    #[case(0.0, 0.2)]
    #[case(0.1, 0.2)]
    #[case(0.15, 0.3)]
    #[case(0.4, 0.65)]
    #[case(0.9, 1.0)]
    #[case(2.0, 1.0)]
    fn estimate_p_value(#[case] score: f64, #[case] expected: f64) -> Result<(), anyhow::Error> {
        let dist = example()?;

        let p = dist.estimate_p_value(score);

        assert!(approx_eq!(f64, p, expected, epsilon = 1e-12), "{}", p);

        Ok(())
    }

    #[test]
    fn p_value_is_monotone() -> Result<(), anyhow::Error> {
        let dist = example()?;

        let ps = (0..=110)
            .map(|i| dist.estimate_p_value(i as f64 / 100.0))
            .collect::<Vec<_>>();

        assert!(ps.windows(2).all(|w| w[0] <= w[1]));
        assert!(ps.iter().all(|p| (0.0..=1.0).contains(p)));

        Ok(())
    }

    #[rstest::rstest]
    #[case(1)]
    #[case(4)]
    #[case(5)]
    #[case(100)]
    fn resample_keeps_endpoints(#[case] resolution: usize) -> Result<(), anyhow::Error> {
        let dist = example()?;

        let resampled = dist.resampled(Some(resolution))?;

        assert_eq!(resampled.len(), resolution + 1);
        assert_eq!(resampled.first(), dist.cumulative_frequencies().first());
        assert_eq!(resampled.last(), dist.cumulative_frequencies().last());
        assert!(resampled.windows(2).all(|w| w[0].0 <= w[1].0 && w[0].1 <= w[1].1));

        Ok(())
    }

    #[test]
    fn resample_last_point_is_one() -> Result<(), anyhow::Error> {
        // (n - 1) / resolution * resolution rounds to just below n - 1 here
        let dist = ObjectScoreDistribution::from_scores(1, 1, vec![0.0, 1.0, 2.0, 3.0])?;

        let resampled = dist.resampled(Some(47))?;

        assert_eq!(resampled.len(), 48);
        let (score, p) = resampled[47];
        assert!(approx_eq!(f64, score, 3.0, epsilon = 1e-9), "{}", score);
        assert!(approx_eq!(f64, p, 1.0, epsilon = 1e-9), "{}", p);
        assert!(resampled.iter().all(|(_, p)| (0.0..=1.0).contains(p)));

        Ok(())
    }

    #[test]
    fn resample_interpolates() -> Result<(), anyhow::Error> {
        // observed scores are 0.0, 1.0, 2.0 with equal weight
        let dist = ObjectScoreDistribution::from_scores(7, 1, vec![0.0, 1.0, 2.0])?;

        let resampled = dist.resampled(Some(4))?;

        let scores = resampled.iter().map(|(s, _)| *s).collect::<Vec<_>>();
        assert_eq!(scores, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert!(approx_eq!(f64, resampled[1].1, 0.5, epsilon = 1e-12));
        assert_eq!(dist.resampled(None)?, dist.cumulative_frequencies());
        assert_eq!(dist.resampled(Some(0)), Err(Error::InvalidResolution(0)));

        Ok(())
    }

    #[test]
    fn new_collapses_and_validates() -> Result<(), anyhow::Error> {
        let dist = ObjectScoreDistribution::new(1, 1, 4, vec![(2.0, 1.0), (1.0, 0.25), (1.0, 0.5)])?;
        assert_eq!(dist.cumulative_frequencies(), &[(1.0, 0.5), (2.0, 1.0)]);

        assert_eq!(
            ObjectScoreDistribution::new(1, 1, 0, vec![]),
            Err(Error::EmptyDistribution)
        );
        assert!(matches!(
            ObjectScoreDistribution::new(1, 1, 2, vec![(1.0, 0.5), (2.0, 0.4)]),
            Err(Error::InvalidDistribution(_))
        ));
        assert!(matches!(
            ObjectScoreDistribution::new(1, 1, 2, vec![(1.0, 0.5), (2.0, 0.9)]),
            Err(Error::InvalidDistribution(_))
        ));
        assert!(matches!(
            ObjectScoreDistribution::from_scores(1, 1, vec![f64::NAN]),
            Err(Error::InvalidDistribution(_))
        ));

        Ok(())
    }

    #[test]
    fn deserialize_validates() -> Result<(), anyhow::Error> {
        let dist = ScoreDistribution::new(2, vec![example()?])?;
        let json = serde_json::to_string(&dist)?;
        assert_eq!(serde_json::from_str::<ScoreDistribution>(&json)?, dist);

        for json in [
            r#"{"object_id":1,"num_terms":1,"sample_size":0,"cumulative_frequencies":[]}"#,
            r#"{"object_id":1,"num_terms":1,"sample_size":2,"cumulative_frequencies":[[0.5,0.8],[1.0,0.4]]}"#,
            r#"{"object_id":1,"num_terms":1,"sample_size":1,"cumulative_frequencies":[[0.5,0.5]]}"#,
        ] {
            assert!(
                serde_json::from_str::<ObjectScoreDistribution>(json).is_err(),
                "{}",
                json
            );
        }

        let valid = r#"{"object_id":1,"num_terms":1,"sample_size":1,"cumulative_frequencies":[[0.5,1.0]]}"#;
        for json in [
            format!(r#"{{"num_terms":2,"object_distributions":{{"1":{}}}}}"#, valid),
            format!(r#"{{"num_terms":1,"object_distributions":{{"3":{}}}}}"#, valid),
        ] {
            assert!(
                serde_json::from_str::<ScoreDistribution>(&json).is_err(),
                "{}",
                json
            );
        }

        Ok(())
    }

    #[test]
    fn score_distribution() -> Result<(), anyhow::Error> {
        let mut dist = ScoreDistribution::new(2, vec![example()?])?;
        dist.insert(ObjectScoreDistribution::from_scores(3, 2, vec![1.0])?)?;

        assert_eq!(dist.num_terms(), 2);
        assert_eq!(dist.object_ids().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(dist.estimate_p_value(3, 1.0), Some(1.0));
        assert_eq!(dist.estimate_p_value(2, 1.0), None);
        assert!(matches!(
            dist.insert(ObjectScoreDistribution::from_scores(4, 5, vec![1.0])?),
            Err(Error::InvalidDistribution(_))
        ));

        Ok(())
    }
}
