//! Term identifiers, terms, and relations.

use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::err::Error;

/// Identifier of a term, e.g., `HP:0000118`.
///
/// Equality and ordering are by `(prefix, id)`.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde_with::SerializeDisplay,
    serde_with::DeserializeFromStr,
)]
pub struct TermId {
    prefix: String,
    id: String,
}

impl TermId {
    /// Construct from prefix and local id.
    pub fn new(prefix: &str, id: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            id: id.to_string(),
        }
    }

    /// The namespace prefix, e.g., `HP`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The local id, e.g., `0000118`.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl FromStr for TermId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((prefix, id)) if !prefix.is_empty() && !id.is_empty() => {
                Ok(TermId::new(prefix, id))
            }
            _ => Err(Error::InvalidTermId(s.to_string())),
        }
    }
}

impl TryFrom<&str> for TermId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.prefix, self.id)
    }
}

/// Scope of a term synonym.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "UPPERCASE")]
pub enum TermSynonymScope {
    #[default]
    Exact,
    Broad,
    Narrow,
    Related,
}

/// Database cross reference.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dbxref {
    /// Name, e.g., `UMLS:C0000768`.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Trailing `{key=value}` modifiers.
    #[serde(default)]
    pub trailing_modifiers: IndexMap<String, String>,
}

/// A synonym of a term.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSynonym {
    /// The synonym text.
    pub value: String,
    /// The synonym's scope.
    #[serde(default)]
    pub scope: TermSynonymScope,
    /// Optional synonym type name.
    pub synonym_type_name: Option<String>,
    /// Supporting cross references.
    #[serde(default)]
    pub xrefs: Vec<Dbxref>,
}

/// Metadata of one ontology term.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Primary id of the term.
    pub id: TermId,
    /// Alternative (secondary) ids.
    #[serde(default)]
    pub alt_term_ids: Vec<TermId>,
    /// Human-readable name.
    pub name: String,
    /// Textual definition.
    pub definition: Option<String>,
    /// Free-text comment.
    pub comment: Option<String>,
    /// Names of the subsets the term belongs to.
    #[serde(default)]
    pub subsets: Vec<String>,
    /// Synonyms.
    #[serde(default)]
    pub synonyms: Vec<TermSynonym>,
    /// Whether the term is obsolete.
    #[serde(default)]
    pub obsolete: bool,
    /// Creator of the term.
    pub created_by: Option<String>,
    /// Creation date of the term.
    pub creation_date: Option<chrono::DateTime<chrono::Utc>>,
    /// Database cross references.
    #[serde(default)]
    pub xrefs: Vec<Dbxref>,
    /// Further ontology-specific key/value data.
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
}

impl Term {
    /// Construct a non-obsolete term with only id and name.
    pub fn new(id: TermId, name: &str) -> Self {
        Self {
            id,
            alt_term_ids: Vec::new(),
            name: name.to_string(),
            definition: None,
            comment: None,
            subsets: Vec::new(),
            synonyms: Vec::new(),
            obsolete: false,
            created_by: None,
            creation_date: None,
            xrefs: Vec::new(),
            attributes: IndexMap::new(),
        }
    }
}

/// Qualifier of a relation between two terms.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RelationQualifier {
    #[default]
    IsA,
    PartOf,
    Regulates,
    PositivelyRegulates,
    NegativelyRegulates,
    Unknown,
}

/// Relation between two terms, stored as an edge in the ontology graph.
///
/// The direction is from the more specific to the more general term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct TermRelation {
    /// The more specific term.
    pub source: TermId,
    /// The more general term.
    pub dest: TermId,
    /// Edge id in the graph.
    pub id: usize,
    /// Qualifier of the relation.
    #[serde(default)]
    pub qualifier: RelationQualifier,
}
