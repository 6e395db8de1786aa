//! Propagation of term annotations to the ancestors of the annotated terms.

use std::collections::{BTreeMap, BTreeSet};

use crate::err::Error;
use crate::ontology::{Ontology, TermId};

/// Labels of the annotated subjects for each term, including the subjects
/// annotated with any more specific term.
pub type TermLabels = BTreeMap<TermId, BTreeSet<String>>;

/// Build the descendant-inclusive label sets from `(term, label)` pairs.
///
/// Each label is added to the annotated term and all of its ancestors, the
/// root included.  Alternative ids are resolved to their primary id.
///
/// # Errors
///
/// `Error::TermNotFound` if a term is unknown or resolves to an obsolete term.
pub fn term_labels_from_annotations<I>(ontology: &Ontology, annotations: I) -> Result<TermLabels, Error>
where
    I: IntoIterator<Item = (TermId, String)>,
{
    let mut result = TermLabels::new();
    for (term_id, label) in annotations {
        let primary = ontology.primary_term_id(&term_id)?;
        if ontology.obsolete_term_ids().contains(&primary) {
            return Err(Error::TermNotFound(term_id.to_string()));
        }
        for ancestor in ontology.ancestors(&primary, true)? {
            result.entry(ancestor).or_default().insert(label.clone());
        }
    }
    Ok(result)
}
