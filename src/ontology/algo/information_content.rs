//! Information content of terms from annotation frequencies.

use std::collections::HashMap;
use std::time::Instant;

use thousands::Separable;

use super::annotations::TermLabels;
use crate::err::Error;
use crate::ontology::{Ontology, TermId};

/// Information content for each non-obsolete term of an ontology.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InformationContent {
    values: HashMap<TermId, f64>,
}

impl InformationContent {
    /// Information content of `term_id`.
    ///
    /// # Errors
    ///
    /// `Error::MissingInformationContent` if there is no value for the term.
    pub fn get(&self, term_id: &TermId) -> Result<f64, Error> {
        self.values
            .get(term_id)
            .copied()
            .ok_or_else(|| Error::MissingInformationContent(term_id.to_string()))
    }

    /// Number of terms with a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(term id, information content)` in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&TermId, f64)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }
}

impl FromIterator<(TermId, f64)> for InformationContent {
    fn from_iter<T: IntoIterator<Item = (TermId, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Computes information content as `-ln(freq(term) / freq(root))`.
#[derive(Debug, Clone, Copy)]
pub struct InformationContentComputation<'a> {
    ontology: &'a Ontology,
}

impl<'a> InformationContentComputation<'a> {
    pub fn new(ontology: &'a Ontology) -> Self {
        Self { ontology }
    }

    /// Compute the information content of each non-obsolete term.
    ///
    /// `term_labels` must be descendant-inclusive, e.g., as built by
    /// `term_labels_from_annotations()`.
    ///
    /// # Errors
    ///
    /// `Error::ZeroFrequency` for the first term without any label.
    pub fn compute_information_content(
        &self,
        term_labels: &TermLabels,
    ) -> Result<InformationContent, Error> {
        let before = Instant::now();
        let frequency = |term_id: &TermId| -> Result<f64, Error> {
            match term_labels.get(term_id).map(|labels| labels.len()) {
                Some(count) if count > 0 => Ok(count as f64),
                _ => Err(Error::ZeroFrequency(term_id.to_string())),
            }
        };

        let root_frequency = frequency(self.ontology.root_term_id())?;
        tracing::debug!(
            "computing information content for {} terms, root frequency is {}",
            self.ontology.non_obsolete_term_ids().len().separate_with_commas(),
            root_frequency
        );
        let values = self
            .ontology
            .non_obsolete_term_ids()
            .iter()
            .map(|term_id| Ok((term_id.clone(), (root_frequency / frequency(term_id)?).ln())))
            .collect::<Result<HashMap<_, _>, Error>>()?;

        tracing::debug!(
            "... done computing information content in {:?}",
            before.elapsed()
        );
        Ok(InformationContent { values })
    }
}
