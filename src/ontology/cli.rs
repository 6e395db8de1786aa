//! Implementation of the `ontology info` sub command.

use std::time::Instant;

use clap::Parser;
use thousands::Separable;
use tracing::info;

use crate::common::trace_rss_now;
use crate::ontology::algo::{
    term_labels_from_annotations, InformationContent, InformationContentComputation,
    ShortestPathTable, DISTANCE_INFINITY,
};
use crate::ontology::io::{annotations::load_annotations, load_ontology};
use crate::ontology::{Ontology, TermId};

/// Command line arguments for `ontology info` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Print information about an ontology", long_about = None)]
pub struct Args {
    /// Path to the ontology JSON file.
    #[arg(long, required = true)]
    pub path_ontology: String,
    /// Optional term to restrict the ontology to, e.g., `HP:0000118`.
    #[arg(long)]
    pub sub_root: Option<TermId>,
    /// Optionally, print the shortest path distance from this term ...
    #[arg(long, requires = "distance_to")]
    pub distance_from: Option<TermId>,
    /// ... to this term.
    #[arg(long, requires = "distance_from")]
    pub distance_to: Option<TermId>,
}

/// Load the ontology and restrict it to the descendants of `sub_root`, if given.
pub fn load_with_sub_root(
    path_ontology: &str,
    sub_root: Option<&TermId>,
) -> Result<Ontology, anyhow::Error> {
    let ontology = load_ontology(path_ontology)?;
    match sub_root {
        Some(sub_root) => {
            let sub_root = ontology.primary_term_id(sub_root)?;
            info!("  restricting to descendants of {}", &sub_root);
            Ok(ontology.sub_ontology(&sub_root)?)
        }
        None => Ok(ontology),
    }
}

/// Compute the information content from the annotation file at
/// `path_annotations`.
pub fn load_information_content(
    ontology: &Ontology,
    path_annotations: &str,
) -> Result<InformationContent, anyhow::Error> {
    info!("Computing information content from {:?} ...", path_annotations);
    let before = Instant::now();
    let annotations = load_annotations(path_annotations)?
        .into_iter()
        // annotations outside of a sub ontology are dropped
        .filter(|(term_id, _)| {
            ontology
                .primary_term_id(term_id)
                .map(|t| ontology.non_obsolete_term_ids().contains(&t))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();
    let term_labels = term_labels_from_annotations(ontology, annotations)?;
    let information_content =
        InformationContentComputation::new(ontology).compute_information_content(&term_labels)?;
    info!("... done in {:?}", before.elapsed());
    Ok(information_content)
}

/// Summary of an ontology as printed by `ontology info`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Summary {
    pub root: TermId,
    pub non_obsolete_terms: usize,
    pub obsolete_terms: usize,
    pub relations: usize,
    pub distance: Option<i32>,
}

fn summarize(ontology: &Ontology, args: &Args) -> Result<Summary, anyhow::Error> {
    let distance = match (args.distance_from.as_ref(), args.distance_to.as_ref()) {
        (Some(from), Some(to)) => {
            let from = ontology.primary_term_id(from)?;
            let to = ontology.primary_term_id(to)?;
            info!("Computing shortest path table ...");
            let before = Instant::now();
            let table = ShortestPathTable::new(ontology)?;
            info!("... done in {:?}", before.elapsed());
            trace_rss_now();
            Some(table.distance_symmetric(&from, &to))
        }
        _ => None,
    };

    Ok(Summary {
        root: ontology.root_term_id().clone(),
        non_obsolete_terms: ontology.non_obsolete_term_ids().len(),
        obsolete_terms: ontology.obsolete_term_ids().len(),
        relations: ontology.graph().edge_count(),
        distance,
    })
}

/// Main entry point for `ontology info` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    info!("args_common = {:?}", &args_common);
    info!("args = {:?}", &args);

    let ontology = load_with_sub_root(&args.path_ontology, args.sub_root.as_ref())?;
    for (key, value) in ontology.meta_info() {
        info!("  {}: {}", key, value);
    }

    let summary = summarize(&ontology, args)?;
    info!("root term: {}", &summary.root);
    info!(
        "terms: {} non-obsolete, {} obsolete",
        summary.non_obsolete_terms.separate_with_commas(),
        summary.obsolete_terms.separate_with_commas()
    );
    info!("relations: {}", summary.relations.separate_with_commas());
    match summary.distance {
        Some(DISTANCE_INFINITY) => info!("no path between the terms"),
        Some(distance) => info!("distance: {}", distance),
        None => (),
    }

    println!("{}", serde_json::to_string(&summary)?);

    Ok(())
}
