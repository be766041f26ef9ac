use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    #[error("unsupported language: {language}")]
    UnsupportedLanguage { language: String },

    #[error("language pack '{language}' extends unknown pack '{base}'")]
    UnknownBase { language: String, base: String },
}
