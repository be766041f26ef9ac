//! Tree-sitter integration: parsing, index-based structural paths and
//! compiled queries.
//!
//! Every higher layer works against [`SyntaxTree`], an immutable parse of
//! one text with one language pack. Nodes are addressed by
//! [`StructuralPath`], which is stable for a given tree and can be rendered
//! and parsed back without loss.

pub mod errors;
pub mod parser;
pub mod path;
pub mod query;
pub mod tree;

pub use errors::TreeSitterError;
pub use parser::{ParserSetupError, StructuralParser};
pub use path::{PathParseError, PathSegment, StructuralPath};
pub use query::{QueryEngine, QueryMatch};
pub use tree::{ErrorNode, ParseStatus, PathLocation, Position, SyntaxTree};
