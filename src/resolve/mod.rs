//! Semantic path resolution.
//!
//! A semantic path is what a person would type to name a construct:
//!
//! - `Calculator`: a class, method, property or block label named so
//! - `Calculator.add`: a member inside a class (`Outer.Inner.add` nests)
//! - `describe("Auth")`: a call-expression block with that label
//! - `beforeEach()`: every block with that callee
//!
//! Resolution runs the pack's four queries and relates the results by byte
//! range containment, so it works the same across grammars whose node
//! shapes differ. Every match is returned; callers that need exactly one
//! decide how to treat ambiguity.

mod path_spec;
mod semantic;

pub use path_spec::{unquote, SemanticPath};
pub use semantic::{all_semantic_paths, find_by_semantic_path, suggest, SemanticMatch};
