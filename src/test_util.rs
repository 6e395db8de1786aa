//! Shared fixtures for the unit tests.

use std::collections::BTreeMap;

use crate::err::Error;
use crate::ontology::algo::{
    term_labels_from_annotations, InformationContent, InformationContentComputation,
};
use crate::ontology::{Ontology, RelationQualifier, Term, TermId, TermRelation};

/// Parse a `TermId`, panicking on malformed input.
pub fn tid(s: &str) -> TermId {
    s.parse().expect("valid term id in test")
}

fn build(root: &str, terms: &[(&str, &str)], edges: &[(&str, &str)]) -> Result<Ontology, Error> {
    let terms = terms
        .iter()
        .map(|(id, name)| Term::new(tid(id), name))
        .collect();
    let relations = edges
        .iter()
        .enumerate()
        .map(|(i, (source, dest))| {
            TermRelation::new(tid(source), tid(dest), i + 1, RelationQualifier::IsA)
        })
        .collect();
    Ontology::from_terms_and_relations(BTreeMap::new(), tid(root), terms, relations)
}

/// Five terms with root `HP:0000005`.
///
/// `1 -> {2, 3, 4}`, `2 -> 5`, `3 -> 5`, `4 -> 5`
pub fn hp_ontology() -> Result<Ontology, Error> {
    build(
        "HP:0000005",
        &[
            ("HP:0000001", "term1"),
            ("HP:0000002", "term2"),
            ("HP:0000003", "term3"),
            ("HP:0000004", "term4"),
            ("HP:0000005", "term5"),
        ],
        &[
            ("HP:0000001", "HP:0000002"),
            ("HP:0000001", "HP:0000003"),
            ("HP:0000001", "HP:0000004"),
            ("HP:0000002", "HP:0000005"),
            ("HP:0000003", "HP:0000005"),
            ("HP:0000004", "HP:0000005"),
        ],
    )
}

pub const VEGETABLE: &str = "VO:0000001";
pub const ROOT_VEGETABLE: &str = "VO:0000002";
pub const LEAF_VEGETABLE: &str = "VO:0000003";
pub const CARROT: &str = "VO:0000004";
pub const BEET: &str = "VO:0000005";
pub const PUMPKIN: &str = "VO:0000006";
pub const BLUE_CARROT: &str = "VO:0000007";

/// Small vegetable ontology; beet is both a root and a leaf vegetable.
pub fn vegetable_ontology() -> Result<Ontology, Error> {
    build(
        VEGETABLE,
        &[
            (VEGETABLE, "vegetable"),
            (ROOT_VEGETABLE, "root vegetable"),
            (LEAF_VEGETABLE, "leaf vegetable"),
            (CARROT, "carrot"),
            (BEET, "beet"),
            (PUMPKIN, "pumpkin"),
            (BLUE_CARROT, "blue carrot"),
        ],
        &[
            (ROOT_VEGETABLE, VEGETABLE),
            (LEAF_VEGETABLE, VEGETABLE),
            (CARROT, ROOT_VEGETABLE),
            (BEET, ROOT_VEGETABLE),
            (BEET, LEAF_VEGETABLE),
            (PUMPKIN, ROOT_VEGETABLE),
            (BLUE_CARROT, CARROT),
        ],
    )
}

/// Vegetables used in three recipes.
pub fn recipe_annotations() -> Vec<(TermId, String)> {
    [
        (CARROT, "pumpkin soup"),
        (PUMPKIN, "pumpkin soup"),
        (BLUE_CARROT, "cauliflower potato mash"),
        (BEET, "beet salad"),
        (LEAF_VEGETABLE, "beet salad"),
    ]
    .iter()
    .map(|(t, label)| (tid(t), label.to_string()))
    .collect()
}

/// Information content of the vegetable ontology from the recipe annotations.
pub fn vegetable_information_content(ontology: &Ontology) -> Result<InformationContent, Error> {
    let term_labels = term_labels_from_annotations(ontology, recipe_annotations())?;
    InformationContentComputation::new(ontology).compute_information_content(&term_labels)
}
