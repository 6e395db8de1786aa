//! Error types of the core library.

/// Category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ErrorKind {
    /// Malformed topology or unknown identifiers.
    #[strum(serialize = "structural")]
    Structural,
    /// Problems stemming from corpus or parameter values.
    #[strum(serialize = "data")]
    Data,
}

/// Errors raised by graph, ontology, similarity, and score distribution code.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("unknown vertex: {0}")]
    UnknownVertex(String),
    #[error("duplicate edge id: {0}")]
    DuplicateEdgeId(usize),
    #[error("graph is not a DAG, cycle through vertex {0}")]
    NotDag(String),
    #[error("term not found: {0}")]
    TermNotFound(String),
    #[error("invalid term id: {0:?}")]
    InvalidTermId(String),
    #[error("invalid ontology: {0}")]
    InvalidOntology(String),
    #[error("term {0} has zero annotation frequency")]
    ZeroFrequency(String),
    #[error("no information content for term {0}")]
    MissingInformationContent(String),
    #[error("invalid resolution {0}, must be greater than zero")]
    InvalidResolution(usize),
    #[error("score distribution is empty")]
    EmptyDistribution,
    #[error("invalid score distribution: {0}")]
    InvalidDistribution(String),
    #[error("invalid sampling: {0}")]
    InvalidSampling(String),
}

impl Error {
    /// Return whether the error stems from topology or from data.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownVertex(_)
            | Error::DuplicateEdgeId(_)
            | Error::NotDag(_)
            | Error::TermNotFound(_)
            | Error::InvalidTermId(_)
            | Error::InvalidOntology(_) => ErrorKind::Structural,
            Error::ZeroFrequency(_)
            | Error::MissingInformationContent(_)
            | Error::InvalidResolution(_)
            | Error::EmptyDistribution
            | Error::InvalidDistribution(_)
            | Error::InvalidSampling(_) => ErrorKind::Data,
        }
    }
}

impl ErrorKind {
    /// Process exit code for failures of this kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::Structural => 2,
            ErrorKind::Data => 3,
        }
    }
}
