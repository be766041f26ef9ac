//! Language packs: the declarative per-language data driving every other
//! module.
//!
//! A pack says which tree-sitter queries find classes, methods, properties
//! and call-expression blocks, how raw node types normalize to
//! [`NormalizedKind`], and how to find the body of a construct. Packs are
//! looked up through a [`LanguagePackRegistry`] by language name or file
//! extension.

pub mod errors;
pub mod kind;
pub mod pack;
pub mod packs;
pub mod registry;

pub use errors::PackError;
pub use kind::{BodyRule, NormalizedKind};
pub use pack::{Grammar, LanguagePack, PackQueries, QueryCategory};
pub use registry::LanguagePackRegistry;
