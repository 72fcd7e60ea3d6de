// Text preprocessing: stop-word filtering and tokenization of survey responses.

pub mod stopwords;
pub mod tokenize;

pub use tokenize::Preprocessor;
