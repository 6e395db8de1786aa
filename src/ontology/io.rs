//! Loading of ontologies and annotation tables from files.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use crate::common::io::{open_read_maybe_gz, open_write_maybe_gz};
use crate::ontology::{Ontology, Term, TermId, TermRelation};

/// JSON representation of an ontology.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OntologyDocument {
    /// Meta information, e.g., the data version.
    #[serde(default)]
    pub meta_info: BTreeMap<String, String>,
    /// Id of the root term.
    pub root: TermId,
    /// All terms, obsolete or not.
    pub terms: Vec<Term>,
    /// All relations between the terms.
    pub relations: Vec<TermRelation>,
}

impl From<&Ontology> for OntologyDocument {
    fn from(ontology: &Ontology) -> Self {
        let mut terms = ontology.terms().cloned().collect::<Vec<_>>();
        terms.sort_by(|a, b| a.id.cmp(&b.id));
        let mut relations = ontology.relations().cloned().collect::<Vec<_>>();
        relations.sort_by_key(|r| r.id);
        Self {
            meta_info: ontology.meta_info().clone(),
            root: ontology.root_term_id().clone(),
            terms,
            relations,
        }
    }
}

impl TryFrom<OntologyDocument> for Ontology {
    type Error = crate::err::Error;

    fn try_from(doc: OntologyDocument) -> Result<Self, Self::Error> {
        Ontology::from_terms_and_relations(doc.meta_info, doc.root, doc.terms, doc.relations)
    }
}

/// Load an ontology from a (possibly gzip-compressed) JSON file.
pub fn load_ontology<P: AsRef<Path>>(path: P) -> Result<Ontology, anyhow::Error> {
    tracing::info!("Loading ontology from {:?} ...", path.as_ref());
    let before = Instant::now();
    let doc: OntologyDocument = serde_json::from_reader(open_read_maybe_gz(&path)?)
        .map_err(|e| anyhow::anyhow!("could not parse {:?}: {}", path.as_ref(), e))?;
    let ontology = Ontology::try_from(doc)?;
    tracing::info!(
        "... done loading {} terms in {:?}",
        ontology.count_all_terms(),
        before.elapsed()
    );
    Ok(ontology)
}

/// Write an ontology as JSON, gzip-compressed if the path ends in `.gz`.
pub fn write_ontology<P: AsRef<Path>>(ontology: &Ontology, path: P) -> Result<(), anyhow::Error> {
    let mut writer = open_write_maybe_gz(path)?;
    serde_json::to_writer(&mut writer, &OntologyDocument::from(ontology))?;
    writer.flush()?;
    Ok(())
}

/// Code for accessing annotation files, one `term_id<TAB>label` per line.
pub mod annotations {
    use std::path::Path;

    use crate::common::io::open_read_maybe_gz;
    use crate::ontology::TermId;

    /// One line of the annotation file.
    #[derive(Debug, Clone, PartialEq, serde::Deserialize)]
    pub struct Entry {
        /// The annotating term.
        pub term_id: TermId,
        /// Label of the annotated subject, e.g., a disease name.
        pub label: String,
    }

    /// Read the annotation file using the `csv` crate via serde.
    ///
    /// # Errors
    ///
    /// In the case that the file could not be read.
    pub fn load_entries<P: AsRef<Path>>(path: P) -> Result<Vec<Entry>, anyhow::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .comment(Some(b'#'))
            .from_reader(open_read_maybe_gz(path)?);
        let mut entries = Vec::new();
        for result in rdr.deserialize() {
            let entry: Entry = result?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Read the annotation file into `(term, label)` pairs.
    pub fn load_annotations<P: AsRef<Path>>(path: P) -> Result<Vec<(TermId, String)>, anyhow::Error> {
        Ok(load_entries(path)?
            .into_iter()
            .map(|e| (e.term_id, e.label))
            .collect())
    }
}

/// Code for accessing object term files, one `object_id<TAB>term_id` per line.
pub mod object_terms {
    use super::*;

    /// One line of the object term file.
    #[derive(Debug, Clone, PartialEq, serde::Deserialize)]
    pub struct Entry {
        /// Numeric id of the object, e.g., an NCBI gene id.
        pub object_id: u32,
        /// Term the object is annotated with.
        pub term_id: TermId,
    }

    /// Read the object term file into a map from object id to its terms.
    ///
    /// # Errors
    ///
    /// In the case that the file could not be read.
    pub fn load_object_terms<P: AsRef<Path>>(
        path: P,
    ) -> Result<BTreeMap<u32, BTreeSet<TermId>>, anyhow::Error> {
        let before = Instant::now();
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .comment(Some(b'#'))
            .from_reader(open_read_maybe_gz(path)?);

        let mut result: BTreeMap<u32, BTreeSet<TermId>> = BTreeMap::new();
        let mut total_count = 0;
        for record in rdr.deserialize() {
            let entry: Entry = record?;
            result.entry(entry.object_id).or_default().insert(entry.term_id);
            total_count += 1;
        }
        tracing::debug!(
            "... done loading {} records for {} objects in {:?}",
            total_count,
            result.len(),
            before.elapsed()
        );
        Ok(result)
    }
}
