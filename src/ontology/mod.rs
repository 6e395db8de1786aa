//! Ontologies as immutable DAGs of terms.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::err::Error;
use crate::graph::algo::{breadth_first_search, topological_order};
use crate::graph::{DirectedGraph, Direction, Edge};

pub mod algo;
pub mod cli;
pub mod io;
pub mod term;

pub use term::{
    Dbxref, RelationQualifier, Term, TermId, TermRelation, TermSynonym, TermSynonymScope,
};

/// An ontology: a DAG over `TermId`s with a distinguished root.
///
/// Edges point from the more specific to the more general term, so the
/// ancestors of a term are reached by following out-edges.
#[derive(Debug, Clone)]
pub struct Ontology {
    /// Meta information, e.g., format and data version.
    meta_info: BTreeMap<String, String>,
    /// The term hierarchy.
    graph: DirectedGraph<TermId>,
    /// Root of the hierarchy.
    root_term_id: TermId,
    /// Ids of the non-obsolete terms.
    non_obsolete_term_ids: BTreeSet<TermId>,
    /// Ids of the obsolete terms.
    obsolete_term_ids: BTreeSet<TermId>,
    /// Term metadata by primary id.
    term_map: HashMap<TermId, Term>,
    /// Mapping from alternative id to primary id.
    alt_to_primary: HashMap<TermId, TermId>,
    /// Relations by edge id.
    relation_map: HashMap<usize, TermRelation>,
}

impl Ontology {
    /// Construct from a graph and term metadata.
    ///
    /// # Errors
    ///
    /// `Error::InvalidOntology` if the root or term sets are inconsistent with
    /// the graph, `Error::NotDag` if the graph has a cycle.
    pub fn new(
        meta_info: BTreeMap<String, String>,
        graph: DirectedGraph<TermId>,
        root_term_id: TermId,
        non_obsolete_term_ids: BTreeSet<TermId>,
        obsolete_term_ids: BTreeSet<TermId>,
        term_map: HashMap<TermId, Term>,
        relation_map: HashMap<usize, TermRelation>,
    ) -> Result<Self, Error> {
        if !non_obsolete_term_ids.contains(&root_term_id) {
            return Err(Error::InvalidOntology(format!(
                "root {} is not a non-obsolete term",
                &root_term_id
            )));
        }
        if let Some(term_id) = non_obsolete_term_ids.intersection(&obsolete_term_ids).next() {
            return Err(Error::InvalidOntology(format!(
                "term {} is both obsolete and non-obsolete",
                term_id
            )));
        }
        if let Some(term_id) = non_obsolete_term_ids
            .iter()
            .chain(obsolete_term_ids.iter())
            .find(|t| !graph.contains_vertex(t))
        {
            return Err(Error::InvalidOntology(format!(
                "term {} is not a vertex of the graph",
                term_id
            )));
        }

        topological_order(&graph, Direction::Forward)?;

        let mut reaching_root = HashSet::new();
        breadth_first_search(&graph, &root_term_id, Direction::Reverse, |_, t| {
            reaching_root.insert(t.clone());
            true
        })?;
        if let Some(term_id) = non_obsolete_term_ids
            .iter()
            .find(|t| !reaching_root.contains(*t))
        {
            return Err(Error::InvalidOntology(format!(
                "root {} is not reachable from term {}",
                &root_term_id, term_id
            )));
        }

        let alt_to_primary = term_map
            .values()
            .flat_map(|term| {
                term.alt_term_ids
                    .iter()
                    .map(|alt_id| (alt_id.clone(), term.id.clone()))
            })
            .collect();

        Ok(Self {
            meta_info,
            graph,
            root_term_id,
            non_obsolete_term_ids,
            obsolete_term_ids,
            term_map,
            alt_to_primary,
            relation_map,
        })
    }

    /// Construct from a list of terms and the relations between them.
    ///
    /// Each term becomes a vertex and each relation an edge with the relation's
    /// id.  The obsolete flag of the terms partitions the term ids.
    pub fn from_terms_and_relations(
        meta_info: BTreeMap<String, String>,
        root_term_id: TermId,
        terms: Vec<Term>,
        relations: Vec<TermRelation>,
    ) -> Result<Self, Error> {
        let graph = DirectedGraph::new(
            terms.iter().map(|t| t.id.clone()),
            relations
                .iter()
                .map(|r| Edge::new(r.source.clone(), r.dest.clone(), r.id)),
        )?;
        let (obsolete, non_obsolete): (Vec<_>, Vec<_>) = terms.iter().partition(|t| t.obsolete);
        let non_obsolete_term_ids = non_obsolete.into_iter().map(|t| t.id.clone()).collect();
        let obsolete_term_ids = obsolete.into_iter().map(|t| t.id.clone()).collect();
        let term_map = terms.into_iter().map(|t| (t.id.clone(), t)).collect();
        let relation_map = relations.into_iter().map(|r| (r.id, r)).collect();

        Self::new(
            meta_info,
            graph,
            root_term_id,
            non_obsolete_term_ids,
            obsolete_term_ids,
            term_map,
            relation_map,
        )
    }

    /// Meta information.
    pub fn meta_info(&self) -> &BTreeMap<String, String> {
        &self.meta_info
    }

    /// The underlying graph.
    pub fn graph(&self) -> &DirectedGraph<TermId> {
        &self.graph
    }

    /// The root term's id.
    pub fn root_term_id(&self) -> &TermId {
        &self.root_term_id
    }

    /// Whether `term_id` is the root.
    pub fn is_root_term(&self, term_id: &TermId) -> bool {
        &self.root_term_id == term_id
    }

    /// Ids of the non-obsolete terms in ascending order.
    pub fn non_obsolete_term_ids(&self) -> &BTreeSet<TermId> {
        &self.non_obsolete_term_ids
    }

    /// Ids of the obsolete terms in ascending order.
    pub fn obsolete_term_ids(&self) -> &BTreeSet<TermId> {
        &self.obsolete_term_ids
    }

    /// Ids of all terms, obsolete or not.
    pub fn all_term_ids(&self) -> impl Iterator<Item = &TermId> {
        self.non_obsolete_term_ids
            .iter()
            .chain(self.obsolete_term_ids.iter())
    }

    /// Number of all terms, obsolete or not.
    pub fn count_all_terms(&self) -> usize {
        self.non_obsolete_term_ids.len() + self.obsolete_term_ids.len()
    }

    /// All term metadata records.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.term_map.values()
    }

    /// Resolve an alternative id to the primary one; primary ids map to
    /// themselves.
    pub fn primary_term_id(&self, term_id: &TermId) -> Result<TermId, Error> {
        if self.graph.contains_vertex(term_id) {
            Ok(term_id.clone())
        } else {
            self.alt_to_primary
                .get(term_id)
                .cloned()
                .ok_or_else(|| Error::TermNotFound(term_id.to_string()))
        }
    }

    /// Metadata of the term with the given primary or alternative id.
    pub fn term(&self, term_id: &TermId) -> Result<&Term, Error> {
        let primary = self.primary_term_id(term_id)?;
        self.term_map
            .get(&primary)
            .ok_or_else(|| Error::TermNotFound(term_id.to_string()))
    }

    /// The relation for the given edge id.
    pub fn relation(&self, edge_id: usize) -> Option<&TermRelation> {
        self.relation_map.get(&edge_id)
    }

    /// All relations.
    pub fn relations(&self) -> impl Iterator<Item = &TermRelation> {
        self.relation_map.values()
    }

    fn ensure_known(&self, term_id: &TermId) -> Result<(), Error> {
        if self.graph.contains_vertex(term_id) {
            Ok(())
        } else {
            Err(Error::TermNotFound(term_id.to_string()))
        }
    }

    fn reachable(&self, term_id: &TermId, direction: Direction) -> Result<BTreeSet<TermId>, Error> {
        self.ensure_known(term_id)?;
        let mut result = BTreeSet::new();
        breadth_first_search(&self.graph, term_id, direction, |_, t| {
            result.insert(t.clone());
            true
        })?;
        Ok(result)
    }

    /// Ids of all ancestors of `term_id`, including `term_id` itself.
    ///
    /// With `include_root == false` the root is removed from the result, even
    /// when `term_id` is the root.
    pub fn ancestors(&self, term_id: &TermId, include_root: bool) -> Result<BTreeSet<TermId>, Error> {
        let mut result = self.reachable(term_id, Direction::Forward)?;
        if !include_root {
            result.remove(&self.root_term_id);
        }
        Ok(result)
    }

    /// Union of `ancestors()` over all `term_ids`.
    pub fn all_ancestor_term_ids<'a, I>(
        &self,
        term_ids: I,
        include_root: bool,
    ) -> Result<BTreeSet<TermId>, Error>
    where
        I: IntoIterator<Item = &'a TermId>,
    {
        let mut result = BTreeSet::new();
        for term_id in term_ids {
            result.extend(self.ancestors(term_id, include_root)?);
        }
        Ok(result)
    }

    /// Ids of all descendants of `term_id`, including `term_id` itself.
    pub fn descendants(&self, term_id: &TermId) -> Result<BTreeSet<TermId>, Error> {
        self.reachable(term_id, Direction::Reverse)
    }

    /// Whether there is a path of one or more edges from `source` to `dest`.
    pub fn exists_path(&self, source: &TermId, dest: &TermId) -> Result<bool, Error> {
        self.ensure_known(dest)?;
        if source == dest {
            self.ensure_known(source)?;
            return Ok(false);
        }
        Ok(self.reachable(source, Direction::Forward)?.contains(dest))
    }

    /// Ids of the direct parents of `term_id`.
    pub fn parent_term_ids(&self, term_id: &TermId) -> Result<BTreeSet<TermId>, Error> {
        self.neighbors(term_id, Direction::Forward)
    }

    /// Ids of the direct children of `term_id`.
    pub fn child_term_ids(&self, term_id: &TermId) -> Result<BTreeSet<TermId>, Error> {
        self.neighbors(term_id, Direction::Reverse)
    }

    fn neighbors(&self, term_id: &TermId, direction: Direction) -> Result<BTreeSet<TermId>, Error> {
        self.ensure_known(term_id)?;
        Ok(self
            .graph
            .neighbors_via(term_id, direction)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// The sub ontology of the non-obsolete descendants of `sub_root`, with
    /// `sub_root` as the new root.
    pub fn sub_ontology(&self, sub_root: &TermId) -> Result<Ontology, Error> {
        let term_ids: HashSet<TermId> = self
            .descendants(sub_root)?
            .into_iter()
            .filter(|t| self.non_obsolete_term_ids.contains(t))
            .collect();
        let graph = self.graph.sub_graph(&term_ids);
        let non_obsolete_term_ids = term_ids.iter().cloned().collect();
        let term_map = self
            .term_map
            .iter()
            .filter(|(t, _)| term_ids.contains(*t))
            .map(|(t, term)| (t.clone(), term.clone()))
            .collect();
        let relation_map = graph
            .edges()
            .filter_map(|e| self.relation_map.get(&e.id).map(|r| (e.id, r.clone())))
            .collect();

        Ontology::new(
            self.meta_info.clone(),
            graph,
            sub_root.clone(),
            non_obsolete_term_ids,
            BTreeSet::new(),
            term_map,
            relation_map,
        )
    }
}
