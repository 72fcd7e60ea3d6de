// Topic modeler trait, so the inference method can be swapped.
//
// The default implementation is collapsed Gibbs sampling; a variational
// or online implementation could slot in here without touching the
// pipeline or the renderers.

use anyhow::Result;

use super::dictionary::Corpus;
use super::lda::LdaModel;

pub trait TopicModeler {
    /// Fit a topic model to a bag-of-words corpus.
    fn fit(&self, corpus: &Corpus) -> Result<LdaModel>;
}
