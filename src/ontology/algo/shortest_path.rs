//! All-pairs shortest path lengths between the terms of an ontology.

use std::collections::HashMap;
use std::time::Instant;

use thousands::Separable;

use crate::err::Error;
use crate::graph::algo::topological_sort_forward;
use crate::graph::Direction;
use crate::ontology::{Ontology, TermId};

/// Distance value for "no path".
pub const DISTANCE_INFINITY: i32 = -1;

/// Table with the number of edges on the shortest directed (child to
/// ancestor) path between any two non-obsolete terms.
#[derive(Debug, Clone)]
pub struct ShortestPathTable {
    /// Number of terms, the side length of `distances`.
    term_count: usize,
    /// Dense index of each term, assigned in ascending term id order.
    term_id_to_idx: HashMap<TermId, usize>,
    /// Row-major `term_count * term_count` distance matrix.
    distances: Vec<i32>,
}

impl ShortestPathTable {
    /// Precompute the table for `ontology`.
    pub fn new(ontology: &Ontology) -> Result<Self, Error> {
        let before = Instant::now();
        let term_count = ontology.non_obsolete_term_ids().len();
        tracing::debug!(
            "computing shortest paths between {} terms",
            term_count.separate_with_commas()
        );

        let term_id_to_idx = ontology
            .non_obsolete_term_ids()
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect::<HashMap<_, _>>();
        let mut distances = vec![DISTANCE_INFINITY; term_count * term_count];

        // Visiting in topological order guarantees that the rows of all
        // ancestors are complete when a term is visited.
        let mut seen: Vec<usize> = Vec::with_capacity(term_count);
        let mut failure = None;
        topological_sort_forward(ontology.graph(), |g, term_id| {
            let Some(&idx) = term_id_to_idx.get(term_id) else {
                // obsolete terms are not part of the table
                return true;
            };
            distances[idx * term_count + idx] = 0;

            let via = match g.neighbors_via(term_id, Direction::Forward) {
                Ok(via) => via
                    .into_iter()
                    .filter_map(|v| term_id_to_idx.get(v).copied())
                    .collect::<Vec<_>>(),
                Err(e) => {
                    failure = Some(e);
                    return false;
                }
            };
            for &dest in &seen {
                let min_dist = via
                    .iter()
                    .map(|&v| distances[v * term_count + dest])
                    .filter(|&d| d != DISTANCE_INFINITY)
                    .min();
                if let Some(min_dist) = min_dist {
                    distances[idx * term_count + dest] = min_dist + 1;
                }
            }

            seen.push(idx);
            true
        })?;
        if let Some(e) = failure {
            return Err(e);
        }

        tracing::debug!("... done computing shortest paths in {:?}", before.elapsed());
        Ok(Self {
            term_count,
            term_id_to_idx,
            distances,
        })
    }

    /// Number of terms in the table.
    pub fn term_count(&self) -> usize {
        self.term_count
    }

    /// Number of edges on the shortest directed path from `source` to `dest`.
    ///
    /// Returns `DISTANCE_INFINITY` if there is no such path or if either term
    /// is not in the table.
    pub fn distance(&self, source: &TermId, dest: &TermId) -> i32 {
        match (
            self.term_id_to_idx.get(source),
            self.term_id_to_idx.get(dest),
        ) {
            (Some(&s), Some(&d)) => self.distances[s * self.term_count + d],
            _ => DISTANCE_INFINITY,
        }
    }

    /// Like `distance()` but also considers the path from `dest` to `source`.
    pub fn distance_symmetric(&self, source: &TermId, dest: &TermId) -> i32 {
        match self.distance(source, dest) {
            DISTANCE_INFINITY => self.distance(dest, source),
            dist => dist,
        }
    }
}
