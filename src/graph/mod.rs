//! Immutable directed graphs over comparable vertices.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::err::Error;

pub mod algo;

/// Trait alias for the requirements on vertex types.
pub trait Vertex: Clone + Eq + Ord + Hash + Display {}

impl<T: Clone + Eq + Ord + Hash + Display> Vertex for T {}

/// Direction to follow edges in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Direction {
    /// Follow edges from source to destination.
    Forward,
    /// Follow edges from destination to source.
    Reverse,
}

/// A directed edge with an id that is unique in its graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_new::new)]
pub struct Edge<V> {
    /// Source vertex.
    pub source: V,
    /// Destination vertex.
    pub dest: V,
    /// Numeric edge identifier.
    pub id: usize,
}

/// Incoming and outgoing edges of one vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VertexEdgeList<V> {
    in_edges: Vec<Edge<V>>,
    out_edges: Vec<Edge<V>>,
}

impl<V> Default for VertexEdgeList<V> {
    fn default() -> Self {
        Self {
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        }
    }
}

/// Immutable directed graph.
///
/// Vertices are iterated in the order they were passed on construction and
/// incident edges in the order of the edge list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectedGraph<V: Vertex> {
    edge_lists: IndexMap<V, VertexEdgeList<V>>,
    edge_count: usize,
}

impl<V: Vertex> DirectedGraph<V> {
    /// Construct graph from vertices and edges.
    ///
    /// # Errors
    ///
    /// `Error::UnknownVertex` if an edge references a vertex not in `vertices`,
    /// `Error::DuplicateEdgeId` if two edges share an id.
    pub fn new<I, J>(vertices: I, edges: J) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        J: IntoIterator<Item = Edge<V>>,
    {
        let mut edge_lists: IndexMap<V, VertexEdgeList<V>> = IndexMap::new();
        for v in vertices {
            edge_lists.entry(v).or_default();
        }

        let mut seen_ids = HashSet::new();
        let mut edge_count = 0;
        for edge in edges {
            if !seen_ids.insert(edge.id) {
                return Err(Error::DuplicateEdgeId(edge.id));
            }
            let source = edge_lists
                .get_index_of(&edge.source)
                .ok_or_else(|| Error::UnknownVertex(edge.source.to_string()))?;
            let dest = edge_lists
                .get_index_of(&edge.dest)
                .ok_or_else(|| Error::UnknownVertex(edge.dest.to_string()))?;
            edge_lists[dest].in_edges.push(edge.clone());
            edge_lists[source].out_edges.push(edge);
            edge_count += 1;
        }

        Ok(Self {
            edge_lists,
            edge_count,
        })
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.edge_lists.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether `v` is a vertex of the graph.
    pub fn contains_vertex(&self, v: &V) -> bool {
        self.edge_lists.contains_key(v)
    }

    /// Iterate all vertices exactly once.
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.edge_lists.keys()
    }

    /// Iterate all edges, grouped by source vertex.
    pub fn edges(&self) -> impl Iterator<Item = &Edge<V>> {
        self.edge_lists.values().flat_map(|l| l.out_edges.iter())
    }

    fn edge_list(&self, v: &V) -> Result<&VertexEdgeList<V>, Error> {
        self.edge_lists
            .get(v)
            .ok_or_else(|| Error::UnknownVertex(v.to_string()))
    }

    /// Edges with `v` as the source.
    pub fn out_edges(&self, v: &V) -> Result<&[Edge<V>], Error> {
        Ok(&self.edge_list(v)?.out_edges)
    }

    /// Edges with `v` as the destination.
    pub fn in_edges(&self, v: &V) -> Result<&[Edge<V>], Error> {
        Ok(&self.edge_list(v)?.in_edges)
    }

    /// Vertices reachable from `v` via one edge in the given direction.
    pub fn neighbors_via(&self, v: &V, direction: Direction) -> Result<Vec<&V>, Error> {
        let list = self.edge_list(v)?;
        Ok(match direction {
            Direction::Forward => list.out_edges.iter().map(|e| &e.dest).collect(),
            Direction::Reverse => list.in_edges.iter().map(|e| &e.source).collect(),
        })
    }

    /// Whether there is an edge from `source` to `dest`.
    pub fn contains_edge(&self, source: &V, dest: &V) -> Result<bool, Error> {
        Ok(self.out_edges(source)?.iter().any(|e| &e.dest == dest))
    }

    /// Sub graph induced by `vertices`, keeping edges with both endpoints
    /// inside.  Unknown vertices are ignored.
    pub fn sub_graph(&self, vertices: &HashSet<V>) -> Self {
        let edge_lists: IndexMap<V, VertexEdgeList<V>> = self
            .edge_lists
            .iter()
            .filter(|(v, _)| vertices.contains(*v))
            .map(|(v, list)| {
                let keep = |e: &&Edge<V>| vertices.contains(&e.source) && vertices.contains(&e.dest);
                (
                    v.clone(),
                    VertexEdgeList {
                        in_edges: list.in_edges.iter().filter(keep).cloned().collect(),
                        out_edges: list.out_edges.iter().filter(keep).cloned().collect(),
                    },
                )
            })
            .collect();
        let edge_count = edge_lists.values().map(|l| l.out_edges.len()).sum();
        Self {
            edge_lists,
            edge_count,
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::{Direction, DirectedGraph, Edge};
    use crate::err::Error;

    fn diamond() -> Result<DirectedGraph<u32>, Error> {
        DirectedGraph::new(
            vec![1, 2, 3, 4],
            vec![
                Edge::new(1, 2, 1),
                Edge::new(1, 3, 2),
                Edge::new(2, 4, 3),
                Edge::new(3, 4, 4),
            ],
        )
    }

    #[test]
    fn construct_and_query() -> Result<(), anyhow::Error> {
        let g = diamond()?;

        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.vertices().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(
            g.out_edges(&1)?.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(
            g.in_edges(&4)?.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert_eq!(g.neighbors_via(&1, Direction::Forward)?, vec![&2, &3]);
        assert_eq!(g.neighbors_via(&4, Direction::Reverse)?, vec![&2, &3]);
        assert!(g.neighbors_via(&4, Direction::Forward)?.is_empty());
        assert!(g.contains_edge(&2, &4)?);
        assert!(!g.contains_edge(&4, &2)?);

        Ok(())
    }

    #[test]
    fn unknown_vertex_on_query() -> Result<(), anyhow::Error> {
        let g = diamond()?;

        assert_eq!(g.out_edges(&5), Err(Error::UnknownVertex("5".into())));
        assert_eq!(
            g.neighbors_via(&5, Direction::Reverse),
            Err(Error::UnknownVertex("5".into()))
        );

        Ok(())
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let res = DirectedGraph::new(vec![1, 2], vec![Edge::new(1, 3, 1)]);

        assert_eq!(res, Err(Error::UnknownVertex("3".into())));
    }

    #[test]
    fn duplicate_edge_id_is_rejected() {
        let res = DirectedGraph::new(vec![1, 2, 3], vec![Edge::new(1, 2, 7), Edge::new(2, 3, 7)]);

        assert_eq!(res, Err(Error::DuplicateEdgeId(7)));
    }

    #[test]
    fn sub_graph() -> Result<(), anyhow::Error> {
        let g = diamond()?;
        let keep = HashSet::from([2, 4]);

        let sub = g.sub_graph(&keep);

        assert_eq!(sub.vertices().copied().collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(sub.edge_count(), 1);
        assert_eq!(sub.in_edges(&4)?.len(), 1);
        assert!(sub.in_edges(&2)?.is_empty());

        Ok(())
    }
}
