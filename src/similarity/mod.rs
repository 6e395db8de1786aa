//! Similarity measures between terms and between sets of terms.

use crate::err::Error;
use crate::ontology::algo::InformationContent;
use crate::ontology::{Ontology, TermId};

pub mod cli;
pub mod common_ancestor;
pub mod cosine;
pub mod jaccard;
pub mod jiang;
pub mod resnik;
pub mod simple_feature_vector;
pub mod term_overlap;

pub use common_ancestor::CommonAncestorSimilarity;
pub use cosine::CosineSimilarity;
pub use jaccard::JaccardIcWeightedSimilarity;
pub use jiang::{JiangSimilarity, PairwiseJiangSimilarity};
pub use resnik::{PairwiseResnikSimilarity, PrecomputingPairwiseResnikSimilarity, ResnikSimilarity};
pub use simple_feature_vector::SimpleFeatureVectorSimilarity;
pub use term_overlap::TermOverlapSimilarity;

/// Similarity between two sets of terms.
pub trait Similarity {
    /// Human-readable name of the measure.
    fn name(&self) -> &'static str;

    /// Parameters of the measure, e.g., `{symmetric: true}`.
    fn parameters(&self) -> String;

    /// Whether `compute_score(q, t) == compute_score(t, q)` always holds.
    fn is_symmetric(&self) -> bool;

    /// Score `query` against `target`.
    fn compute_score(&self, query: &[TermId], target: &[TermId]) -> Result<f64, Error>;
}

/// Similarity between two individual terms.
pub trait PairwiseSimilarity {
    /// Score `query` against `target`.
    fn score(&self, query: &TermId, target: &TermId) -> Result<f64, Error>;
}

impl<T: PairwiseSimilarity + ?Sized> PairwiseSimilarity for &T {
    fn score(&self, query: &TermId, target: &TermId) -> Result<f64, Error> {
        (**self).score(query, target)
    }
}

/// Enumeration of the available set similarity measures.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    clap::ValueEnum,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SimilarityMethod {
    /// Resnik similarity of the best matching terms.
    #[default]
    Resnik,
    /// Jiang similarity of the best matching terms.
    Jiang,
    /// Overlap of the ancestor sets.
    TermOverlap,
    /// Cosine of the ancestor set vectors.
    Cosine,
    /// Information content weighted Jaccard index of the ancestor sets.
    JaccardIc,
    /// Number of shared terms.
    SimpleFeatureVector,
}

impl SimilarityMethod {
    /// Construct the measure.
    ///
    /// `symmetric` applies to the common ancestor measures only.  With
    /// `precompute`, Resnik scores between all term pairs are computed up
    /// front.
    pub fn build<'a>(
        &self,
        ontology: &'a Ontology,
        information_content: &'a InformationContent,
        symmetric: bool,
        precompute: bool,
    ) -> Result<Box<dyn Similarity + 'a>, Error> {
        Ok(match self {
            SimilarityMethod::Resnik if precompute => Box::new(ResnikSimilarity::with_pairwise(
                PrecomputingPairwiseResnikSimilarity::new(ontology, information_content)?,
                symmetric,
            )),
            SimilarityMethod::Resnik => {
                Box::new(ResnikSimilarity::new(ontology, information_content, symmetric))
            }
            SimilarityMethod::Jiang => {
                Box::new(JiangSimilarity::new(ontology, information_content, symmetric))
            }
            SimilarityMethod::TermOverlap => Box::new(TermOverlapSimilarity::new(ontology, true)),
            SimilarityMethod::Cosine => Box::new(CosineSimilarity::new(ontology)),
            SimilarityMethod::JaccardIc => {
                Box::new(JaccardIcWeightedSimilarity::new(ontology, information_content))
            }
            SimilarityMethod::SimpleFeatureVector => Box::new(SimpleFeatureVectorSimilarity),
        })
    }
}
