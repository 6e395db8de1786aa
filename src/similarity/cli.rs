//! Implementation of the `sim score` sub command.

use clap::Parser;
use tracing::info;

use crate::ontology::cli::{load_information_content, load_with_sub_root};
use crate::ontology::{Ontology, TermId};
use crate::similarity::SimilarityMethod;

/// Command line arguments for `sim score` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Compute similarity between two term sets", long_about = None)]
pub struct Args {
    /// Path to the ontology JSON file.
    #[arg(long, required = true)]
    pub path_ontology: String,
    /// Path to the annotation TSV file used for the information content.
    #[arg(long, required = true)]
    pub path_annotations: String,
    /// Optional term to restrict the ontology to, e.g., `HP:0000118`.
    #[arg(long)]
    pub sub_root: Option<TermId>,

    /// The similarity measure to use.
    #[arg(long, value_enum, default_value_t = SimilarityMethod::Resnik)]
    pub method: SimilarityMethod,
    /// Use the asymmetric (query to target) variant of the common ancestor
    /// measures.
    #[arg(long, default_value_t = false)]
    pub asymmetric: bool,

    /// Comma-separated query terms.
    #[arg(long, required = true, value_delimiter = ',')]
    pub query: Vec<TermId>,
    /// Comma-separated target terms.
    #[arg(long, required = true, value_delimiter = ',')]
    pub target: Vec<TermId>,
}

/// Result of `sim score`, written as JSON to stdout.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScoreResult {
    /// Name of the measure.
    pub name: String,
    /// Parameters of the measure.
    pub parameters: String,
    /// The query terms, resolved to primary ids.
    pub query: Vec<TermId>,
    /// The target terms, resolved to primary ids.
    pub target: Vec<TermId>,
    /// The similarity score.
    pub score: f64,
}

/// Resolve alternative ids to primary ids.
pub fn resolve_term_ids(ontology: &Ontology, term_ids: &[TermId]) -> Result<Vec<TermId>, anyhow::Error> {
    term_ids
        .iter()
        .map(|t| ontology.primary_term_id(t).map_err(anyhow::Error::from))
        .collect()
}

fn compute(ontology: &Ontology, args: &Args) -> Result<ScoreResult, anyhow::Error> {
    let information_content = load_information_content(ontology, &args.path_annotations)?;
    let similarity = args
        .method
        .build(ontology, &information_content, !args.asymmetric, false)?;
    let query = resolve_term_ids(ontology, &args.query)?;
    let target = resolve_term_ids(ontology, &args.target)?;

    let score = similarity.compute_score(&query, &target)?;
    info!(
        "{} {} of {} query and {} target terms: {}",
        similarity.name(),
        similarity.parameters(),
        query.len(),
        target.len(),
        score
    );

    Ok(ScoreResult {
        name: similarity.name().to_string(),
        parameters: similarity.parameters(),
        query,
        target,
        score,
    })
}

/// Main entry point for `sim score` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    info!("args_common = {:?}", &args_common);
    info!("args = {:?}", &args);

    let ontology = load_with_sub_root(&args.path_ontology, args.sub_root.as_ref())?;
    let result = compute(&ontology, args)?;
    println!("{}", serde_json::to_string(&result)?);

    Ok(())
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use clap::Parser;
    use float_cmp::approx_eq;

    use super::{compute, Args};
    use crate::similarity::SimilarityMethod;
    use crate::test_util::{
        recipe_annotations, tid, vegetable_ontology, BLUE_CARROT, CARROT, PUMPKIN,
    };

    fn write_annotations(path: &std::path::Path) -> Result<(), anyhow::Error> {
        let mut f = std::fs::File::create(path)?;
        for (term_id, label) in recipe_annotations() {
            writeln!(f, "{}\t{}", term_id, label)?;
        }
        Ok(())
    }

    #[test]
    fn parse_args() -> Result<(), anyhow::Error> {
        let args = Args::try_parse_from([
            "score",
            "--path-ontology",
            "vegetables.json",
            "--path-annotations",
            "recipes.tsv",
            "--method",
            "jaccard-ic",
            "--query",
            "VO:0000004,VO:0000006",
            "--target",
            "VO:0000007",
        ])?;

        assert_eq!(args.method, SimilarityMethod::JaccardIc);
        assert!(!args.asymmetric);
        assert_eq!(args.query, vec![tid(CARROT), tid(PUMPKIN)]);
        assert_eq!(args.target, vec![tid(BLUE_CARROT)]);

        Ok(())
    }

    #[rstest::rstest]
    #[case(SimilarityMethod::Resnik, false, 0.5 * 1.5f64.ln())]
    #[case(SimilarityMethod::Resnik, true, 0.75 * 1.5f64.ln())]
    #[case(SimilarityMethod::SimpleFeatureVector, true, 0.0)]
    fn compute_scores(
        #[case] method: SimilarityMethod,
        #[case] symmetric: bool,
        #[case] expected: f64,
    ) -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path_annotations = tmp_dir.join("recipes.tsv");
        write_annotations(&path_annotations)?;
        let ontology = vegetable_ontology()?;
        let args = Args {
            path_ontology: String::new(),
            path_annotations: format!("{}", path_annotations.display()),
            sub_root: None,
            method,
            asymmetric: !symmetric,
            query: vec![tid(BLUE_CARROT), tid(PUMPKIN)],
            target: vec![tid(CARROT)],
        };

        let result = compute(&ontology, &args)?;

        assert!(
            approx_eq!(f64, result.score, expected, epsilon = 1e-12),
            "{}",
            result.score
        );

        Ok(())
    }
}
