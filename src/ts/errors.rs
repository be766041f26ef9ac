use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeSitterError {
    #[error("failed to set {grammar} grammar for parser")]
    LanguageSet { grammar: String },

    #[error("invalid tree-sitter query for {grammar}: {message}")]
    InvalidQuery { grammar: String, message: String },
}
