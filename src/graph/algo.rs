//! Traversal algorithms on `DirectedGraph`.
//!
//! All traversals use explicit work stacks/queues so that deep hierarchies do
//! not exhaust the call stack.

use std::collections::{HashSet, VecDeque};

use super::{DirectedGraph, Direction, Vertex};
use crate::err::Error;

/// Depth-first topological sorting (Tarjan) in forward direction.
///
/// `visitor` is called for each vertex after all vertices reachable from it
/// via out-edges have been visited, i.e., descendants before ancestors along
/// child to parent edges.
///
/// # Errors
///
/// `Error::NotDag` as soon as a cycle is detected.
pub fn topological_sort_forward<V, F>(g: &DirectedGraph<V>, visitor: F) -> Result<(), Error>
where
    V: Vertex,
    F: FnMut(&DirectedGraph<V>, &V) -> bool,
{
    topological_sort(g, Direction::Forward, visitor)
}

/// Depth-first topological sorting (Tarjan) in reverse direction, following
/// in-edges instead of out-edges.
pub fn topological_sort_reverse<V, F>(g: &DirectedGraph<V>, visitor: F) -> Result<(), Error>
where
    V: Vertex,
    F: FnMut(&DirectedGraph<V>, &V) -> bool,
{
    topological_sort(g, Direction::Reverse, visitor)
}

/// Collect the topological order for `direction` into a `Vec`.
pub fn topological_order<V: Vertex>(
    g: &DirectedGraph<V>,
    direction: Direction,
) -> Result<Vec<V>, Error> {
    let mut result = Vec::with_capacity(g.vertex_count());
    topological_sort(g, direction, |_, v| {
        result.push(v.clone());
        true
    })?;
    Ok(result)
}

/// One entry of the explicit recursion stack.
struct Frame<'a, V> {
    vertex: &'a V,
    neighbors: Vec<&'a V>,
    next: usize,
}

/// Implementation of Tarjan's algorithm.
///
/// When `visitor` returns `false`, the remaining neighbors of the enclosing
/// vertex are skipped.  The traversal as a whole continues with the next
/// unvisited vertex.
///
/// The order is only topological as long as `visitor` returns `true`.  After
/// an early stop, the enclosing vertex is still visited right away, i.e.,
/// possibly before the skipped vertices that it reaches.
pub fn topological_sort<V, F>(
    g: &DirectedGraph<V>,
    direction: Direction,
    mut visitor: F,
) -> Result<(), Error>
where
    V: Vertex,
    F: FnMut(&DirectedGraph<V>, &V) -> bool,
{
    let mut done: HashSet<&V> = HashSet::with_capacity(g.vertex_count());
    let mut tmp_marked: HashSet<&V> = HashSet::new();

    for start in g.vertices() {
        if done.contains(start) {
            continue;
        }

        tmp_marked.insert(start);
        let mut stack = vec![Frame {
            vertex: start,
            neighbors: g.neighbors_via(start, direction)?,
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.next < frame.neighbors.len() {
                let next = frame.neighbors[frame.next];
                frame.next += 1;
                if tmp_marked.contains(next) {
                    return Err(Error::NotDag(next.to_string()));
                }
                if !done.contains(next) {
                    tmp_marked.insert(next);
                    stack.push(Frame {
                        vertex: next,
                        neighbors: g.neighbors_via(next, direction)?,
                        next: 0,
                    });
                }
            } else {
                let vertex = frame.vertex;
                stack.pop();
                tmp_marked.remove(vertex);
                done.insert(vertex);
                if !visitor(g, vertex) {
                    if let Some(parent) = stack.last_mut() {
                        parent.next = parent.neighbors.len();
                    }
                }
            }
        }
    }

    Ok(())
}

/// Breadth-first search from `start`, calling `visitor` for each reached
/// vertex including `start`.  Returning `false` from `visitor` stops the
/// expansion of that vertex.
pub fn breadth_first_search<V, F>(
    g: &DirectedGraph<V>,
    start: &V,
    direction: Direction,
    mut visitor: F,
) -> Result<(), Error>
where
    V: Vertex,
    F: FnMut(&DirectedGraph<V>, &V) -> bool,
{
    if !g.contains_vertex(start) {
        return Err(Error::UnknownVertex(start.to_string()));
    }

    let mut seen: HashSet<&V> = HashSet::from([start]);
    let mut queue: VecDeque<&V> = VecDeque::from([start]);
    while let Some(v) = queue.pop_front() {
        if !visitor(g, v) {
            continue;
        }
        for n in g.neighbors_via(v, direction)? {
            if seen.insert(n) {
                queue.push_back(n);
            }
        }
    }

    Ok(())
}
