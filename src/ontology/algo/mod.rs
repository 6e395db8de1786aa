//! Algorithms on top of `Ontology`.

pub mod annotations;
pub mod information_content;
pub mod shortest_path;

pub use annotations::{term_labels_from_annotations, TermLabels};
pub use information_content::{InformationContent, InformationContentComputation};
pub use shortest_path::{ShortestPathTable, DISTANCE_INFINITY};
