// Topic modeling: dictionary/corpus construction and LDA inference.

pub mod dictionary;
pub mod lda;
pub mod traits;

use std::fmt;

pub use dictionary::{Corpus, Dictionary};
pub use lda::{GibbsLda, LdaModel, LdaParams};
pub use traits::TopicModeler;

/// There is nothing to model: no documents, or none survived preprocessing.
///
/// Kept as a distinct type so callers can tell "bad input" apart from
/// real failures after it has passed through `anyhow`.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyCorpus {
    pub documents: usize,
}

impl fmt::Display for EmptyCorpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.documents == 0 {
            write!(f, "No documents to analyze")
        } else {
            write!(
                f,
                "None of the {} documents contained a usable token after stop-word filtering",
                self.documents
            )
        }
    }
}

impl std::error::Error for EmptyCorpus {}
