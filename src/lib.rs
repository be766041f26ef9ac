//! treepath: structural code navigation and editing on tree-sitter syntax trees
//!
//! Source files are parsed with tree-sitter grammars and addressed two ways:
//!
//! - **Raw structural paths** (`program[0]/class_declaration[0]/class_body[0]`)
//!   name a node by its node types and positions among its parent's
//!   children. They are exact but only valid for one tree.
//! - **Semantic paths** (`Calculator.add`, `test("adds numbers")`) name
//!   declarations and call-expression blocks the way a reader would.
//!
//! Everything language specific lives in declarative [`LanguagePack`]s:
//! queries, a map from raw node types to [`NormalizedKind`]s, and rules for
//! finding the body of a construct. Built-in packs cover JavaScript,
//! TypeScript (and TSX), Python and Rust; more can be loaded from TOML with
//! [`config::registry_from_path`].
//!
//! # Editing
//!
//! [`TreeEditor`] is an immutable value. Each edit returns a new editor
//! whose text has been re-parsed, while the original text of the chain is
//! kept for [`TreeEditor::generate_diff`]. The library never touches the
//! filesystem; callers decide where text comes from and goes to.
//!
//! # Example
//!
//! ```
//! use treepath::TreeEditor;
//!
//! let source = "class Calculator {\n  add(a, b) { return a + b; }\n}\n";
//! let editor = TreeEditor::for_language("javascript", source)?;
//!
//! let edited = editor.append_child("Calculator", "subtract(a, b) { return a - b; }")?;
//! assert!(edited.text().contains("  subtract(a, b)"));
//! assert_eq!(edited.diff_hunk_count(), 1);
//! # Ok::<(), treepath::EditError>(())
//! ```

pub mod cache;
pub mod config;
pub mod editor;
pub mod lang;
pub mod pool;
pub mod report;
pub mod resolve;
pub mod ts;

// Re-exports
pub use config::{load_from_path, load_from_str, registry_from_path, ConfigError, PackConfig};
pub use editor::{EditError, Splice, TreeEditor};
pub use lang::{
    BodyRule, Grammar, LanguagePack, LanguagePackRegistry, NormalizedKind, PackError,
    QueryCategory,
};
pub use resolve::{all_semantic_paths, find_by_semantic_path, SemanticMatch, SemanticPath};
pub use ts::{
    ParseStatus, PathLocation, QueryEngine, QueryMatch, StructuralParser, StructuralPath,
    SyntaxTree, TreeSitterError,
};
