//! ontolib main executable

use clap::{Args, Parser, Subcommand};
use console::{Emoji, Term};

use ontolib::{common, ontology, scoredist, similarity};

/// CLI parser based on clap.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Ontology graphs and semantic similarity",
    long_about = "This tool works with ontologies, computes semantic similarity between term \
                  sets, and estimates the significance of similarity scores"
)]
struct Cli {
    /// Commonly used arguments
    #[command(flatten)]
    common: common::Args,

    /// The sub command to run
    #[command(subcommand)]
    command: Commands,
}

/// Enum supporting the parsing of top-level commands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Ontology-related commands.
    Ontology(Ontology),
    /// Similarity-related commands.
    Sim(Sim),
    /// Score distribution related commands.
    Scoredist(Scoredist),
}

/// Parsing of "ontology *" sub commands.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
struct Ontology {
    /// The sub command to run
    #[command(subcommand)]
    command: OntologyCommands,
}

/// Enum supporting the parsing of "ontology *" sub commands.
#[derive(Debug, Subcommand)]
enum OntologyCommands {
    Info(ontology::cli::Args),
}

/// Parsing of "sim *" sub commands.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
struct Sim {
    /// The sub command to run
    #[command(subcommand)]
    command: SimCommands,
}

/// Enum supporting the parsing of "sim *" sub commands.
#[derive(Debug, Subcommand)]
enum SimCommands {
    Score(similarity::cli::Args),
}

/// Parsing of "scoredist *" sub commands.
#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
struct Scoredist {
    /// The sub command to run
    #[command(subcommand)]
    command: ScoredistCommands,
}

/// Enum supporting the parsing of "scoredist *" sub commands.
#[derive(Debug, Subcommand)]
enum ScoredistCommands {
    Sample(scoredist::prepare::Args),
    Query(scoredist::query::Args),
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Build a tracing subscriber according to the configuration in `cli.common`.
    let collector = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(match cli.common.verbose.log_level() {
            Some(level) => match level {
                log::Level::Error => tracing::Level::ERROR,
                log::Level::Warn => tracing::Level::WARN,
                log::Level::Info => tracing::Level::INFO,
                log::Level::Debug => tracing::Level::DEBUG,
                log::Level::Trace => tracing::Level::TRACE,
            },
            None => tracing::Level::INFO,
        })
        .compact()
        .finish();

    // Install collector and go into sub commands.
    let term = Term::stderr();
    let result = tracing::subscriber::with_default(collector, || {
        match &cli.command {
            Commands::Ontology(ontology) => match &ontology.command {
                OntologyCommands::Info(args) => ontology::cli::run(&cli.common, args)?,
            },
            Commands::Sim(sim) => match &sim.command {
                SimCommands::Score(args) => similarity::cli::run(&cli.common, args)?,
            },
            Commands::Scoredist(scoredist) => match &scoredist.command {
                ScoredistCommands::Sample(args) => scoredist::prepare::run(&cli.common, args)?,
                ScoredistCommands::Query(args) => scoredist::query::run(&cli.common, args)?,
            },
        }

        Ok::<(), anyhow::Error>(())
    });
    if let Err(err) = result {
        term.write_line(&format!("Error: {:?}", err))?;
        let code = err
            .downcast_ref::<ontolib::err::Error>()
            .map(|err| err.kind().exit_code())
            .unwrap_or(1);
        std::process::exit(code);
    }
    term.write_line(&format!("All done. Have a nice day!{}", Emoji(" 😃", "")))?;

    Ok(())
}
