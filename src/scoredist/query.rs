//! Implementation of the `scoredist query` sub command.

use clap::Parser;
use tracing::info;

use crate::scoredist::text::TextScoreDistributionReader;

/// Command line arguments for `scoredist query` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Estimate the p-value of a score", long_about = None)]
pub struct Args {
    /// Path to the score distribution file written by `scoredist sample`.
    #[arg(long, required = true)]
    pub path_scoredist: String,
    /// Number of terms in the query.
    #[arg(long, required = true)]
    pub num_terms: usize,
    /// Id of the object, e.g., an NCBI gene id.
    #[arg(long, required = true)]
    pub object_id: u32,
    /// The observed score.
    #[arg(long, required = true, allow_negative_numbers = true)]
    pub score: f64,
}

/// Result of `scoredist query`, written as JSON to stdout.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct QueryResult {
    pub num_terms: usize,
    pub object_id: u32,
    pub sample_size: usize,
    pub score: f64,
    /// Estimated probability of a random term set scoring at most `score`.
    pub p_value: f64,
}

fn query(args: &Args) -> Result<QueryResult, anyhow::Error> {
    let dist = TextScoreDistributionReader::open(&args.path_scoredist)?
        .read_for_term_count_and_object(args.num_terms, args.object_id)?;
    Ok(QueryResult {
        num_terms: args.num_terms,
        object_id: args.object_id,
        sample_size: dist.sample_size(),
        score: args.score,
        p_value: dist.estimate_p_value(args.score),
    })
}

/// Main entry point for `scoredist query` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    info!("args_common = {:?}", &args_common);
    info!("args = {:?}", &args);

    let result = query(args)?;
    info!(
        "p-value of score {} for object {} and {} terms: {}",
        result.score, result.object_id, result.num_terms, result.p_value
    );
    println!("{}", serde_json::to_string(&result)?);

    Ok(())
}

#[cfg(test)]
mod test {
    use float_cmp::approx_eq;

    use super::{query, Args};
    use crate::scoredist::text::TextScoreDistributionWriter;
    use crate::scoredist::{ObjectScoreDistribution, ScoreDistribution};

    fn write_scoredist(path: &std::path::Path) -> Result<(), anyhow::Error> {
        let mut writer = TextScoreDistributionWriter::create(path, None)?;
        writer.write(&ScoreDistribution::new(
            2,
            vec![ObjectScoreDistribution::from_scores(
                2200,
                2,
                vec![0.0, 1.0, 1.0, 2.0],
            )?],
        )?)?;
        std::io::Write::flush(&mut writer.into_inner()?)?;
        Ok(())
    }

    fn args(path_scoredist: &std::path::Path, object_id: u32, score: f64) -> Args {
        Args {
            path_scoredist: format!("{}", path_scoredist.display()),
            num_terms: 2,
            object_id,
            score,
        }
    }

    #[rstest::rstest]
    #[case(-1.0, 0.25)]
    #[case(0.5, 0.5)]
    #[case(1.0, 0.75)]
    #[case(3.0, 1.0)]
    fn query_p_value(#[case] score: f64, #[case] expected: f64) -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join("scoredist.tsv");
        write_scoredist(&path)?;

        let result = query(&args(&path, 2200, score))?;

        assert_eq!(result.sample_size, 4);
        assert!(
            approx_eq!(f64, result.p_value, expected, epsilon = 1e-12),
            "{}",
            result.p_value
        );

        Ok(())
    }

    #[test]
    fn query_unknown_object() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join("scoredist.tsv");
        write_scoredist(&path)?;

        assert!(query(&args(&path, 1, 1.0)).is_err());

        Ok(())
    }
}
