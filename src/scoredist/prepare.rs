//! Implementation of the `scoredist sample` sub command.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::time::Instant;

use clap::Parser;
use thousands::Separable;
use tracing::info;

use crate::common::trace_rss_now;
use crate::ontology::cli::{load_information_content, load_with_sub_root};
use crate::ontology::io::object_terms::load_object_terms;
use crate::ontology::TermId;
use crate::scoredist::sampling::{ScoreSamplingOptionsBuilder, SimilarityScoreSampling};
use crate::scoredist::text::TextScoreDistributionWriter;
use crate::similarity::cli::resolve_term_ids;
use crate::similarity::SimilarityMethod;

/// Command line arguments for `scoredist sample` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Sample empirical score distributions", long_about = None)]
pub struct Args {
    /// Path to the ontology JSON file.
    #[arg(long, required = true)]
    pub path_ontology: String,
    /// Path to the annotation TSV file used for the information content.
    #[arg(long, required = true)]
    pub path_annotations: String,
    /// Path to the TSV file with the terms of each object.
    #[arg(long, required = true)]
    pub path_object_terms: String,
    /// Path to the output file, gzip-compressed if ending in `.gz`.
    #[arg(long, required = true)]
    pub path_out: String,
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

    /// Number of random term sets for each object and term set size.
    #[arg(long, default_value_t = 100_000)]
    pub num_iterations: usize,
    /// Sample for `min_terms..=max_terms` terms.
    #[arg(long, default_value_t = 1)]
    pub min_terms: usize,
    /// Sample for `min_terms..=max_terms` terms.
    #[arg(long, default_value_t = 10)]
    pub max_terms: usize,
    /// Optionally, draw random terms from the descendants of this term only.
    #[arg(long)]
    pub term_id: Option<TermId>,
    /// Optionally, resample each distribution to `resolution + 1` points.
    #[arg(long)]
    pub resolution: Option<usize>,

    /// Number of threads for precomputing pairwise scores (default is 1
    /// thread per core).
    #[arg(long)]
    pub num_threads: Option<usize>,
    /// Seed for the random number generator.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Main entry point for `scoredist sample` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    info!("args_common = {:?}", &args_common);
    info!("args = {:?}", &args);

    if let Some(num_threads) = args.num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()?;
    }
    if args.resolution == Some(0) {
        anyhow::bail!("resolution must be at least 1");
    }

    info!("Loading ontology ...");
    let before = Instant::now();
    let ontology = load_with_sub_root(&args.path_ontology, args.sub_root.as_ref())?;
    info!(
        "... done loading {} terms in {:?}",
        ontology.non_obsolete_term_ids().len().separate_with_commas(),
        before.elapsed()
    );

    let information_content = load_information_content(&ontology, &args.path_annotations)?;

    info!("Loading object terms ...");
    let object_terms: BTreeMap<u32, BTreeSet<TermId>> = load_object_terms(&args.path_object_terms)?
        .into_iter()
        .map(|(object_id, terms)| {
            let terms = terms.into_iter().collect::<Vec<_>>();
            let terms = resolve_term_ids(&ontology, &terms)?;
            Ok((object_id, terms.into_iter().collect::<BTreeSet<_>>()))
        })
        .collect::<Result<_, anyhow::Error>>()?;
    info!(
        "  loaded terms of {} objects",
        object_terms.len().separate_with_commas()
    );

    info!("Preparing similarity measure ...");
    let before = Instant::now();
    let similarity = args
        .method
        .build(&ontology, &information_content, !args.asymmetric, true)?;
    info!("... done in {:?}", before.elapsed());
    trace_rss_now();

    let options = ScoreSamplingOptionsBuilder::default()
        .min_num_terms(args.min_terms)
        .max_num_terms(args.max_terms)
        .num_iterations(args.num_iterations)
        .term_id(args.term_id.clone())
        .seed(args.seed)
        .build()?;

    info!(
        "Sampling {} {} ...",
        similarity.name(),
        similarity.parameters()
    );
    let before = Instant::now();
    let sampling = SimilarityScoreSampling::new(&ontology, similarity.as_ref(), options);
    let distributions = sampling.perform_sampling(&object_terms)?;
    info!("... done in {:?}", before.elapsed());

    info!("Writing distributions to {:?} ...", &args.path_out);
    let mut writer = TextScoreDistributionWriter::create(&args.path_out, args.resolution)?;
    for dist in distributions.values() {
        writer.write(dist)?;
    }
    writer.into_inner()?.flush()?;

    trace_rss_now();
    Ok(())
}
