//! Ontology graphs, semantic similarity, and empirical score distributions.
//!
//! An `ontology::Ontology` wraps a `graph::DirectedGraph` of terms whose edges
//! point from the more specific to the more general term.  Information
//! content and shortest path tables are derived from it in `ontology::algo`,
//! the measures in `similarity` score term sets against each other, and
//! `scoredist` estimates the significance of such scores from sampled
//! distributions.

pub mod common;
pub mod err;
pub mod graph;
pub mod ontology;
pub mod scoredist;
pub mod similarity;

#[cfg(test)]
mod test_util;
