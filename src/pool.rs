//! Thread-local parser pooling.
//!
//! Creating a tree-sitter parser and loading a grammar is far more expensive
//! than parsing a small file. Each thread keeps one parser per grammar and
//! reuses it for every subsequent parse.

use crate::lang::{Grammar, LanguagePack};
use crate::ts::{StructuralParser, SyntaxTree, TreeSitterError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

thread_local! {
    static PARSERS: RefCell<HashMap<Grammar, StructuralParser>> = RefCell::new(HashMap::new());
}

/// Execute `f` with the pooled parser for `pack`'s grammar.
///
/// On first call per thread and grammar, creates a new parser. Later calls
/// reuse it, rebinding it to `pack` so that derived packs sharing a grammar
/// stamp their own pack on the trees they produce.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use treepath::lang::LanguagePackRegistry;
/// use treepath::pool::with_parser;
///
/// let pack = LanguagePackRegistry::builtin().get("python")?;
/// let tree = with_parser(&pack, |parser| parser.parse("x = 1\n"))?;
/// assert!(!tree.has_errors());
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(pack: &Arc<LanguagePack>, f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut StructuralParser) -> R,
{
    PARSERS.with(|cell| {
        let mut parsers = cell.borrow_mut();
        let parser = match parsers.entry(pack.grammar) {
            std::collections::hash_map::Entry::Occupied(entry) => {
                let parser = entry.into_mut();
                parser.set_pack(Arc::clone(pack));
                parser
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                tracing::trace!(grammar = %pack.grammar, "creating pooled parser");
                entry.insert(StructuralParser::new(Arc::clone(pack))?)
            }
        };
        Ok(f(parser))
    })
}

/// Parse `source` with the pooled parser for `pack`.
pub fn parse(pack: &Arc<LanguagePack>, source: &str) -> Result<SyntaxTree, TreeSitterError> {
    with_parser(pack, |parser| parser.parse(source))
}

/// Number of grammars with a pooled parser on this thread.
pub fn pooled_grammars() -> usize {
    PARSERS.with(|cell| cell.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::LanguagePackRegistry;

    #[test]
    fn parser_reused_per_grammar() {
        let registry = LanguagePackRegistry::builtin();
        let ts = registry.get("typescript").unwrap();

        parse(&ts, "let a = 1;").unwrap();
        let before = pooled_grammars();
        parse(&ts, "let b = 2;").unwrap();
        assert_eq!(pooled_grammars(), before);
    }

    #[test]
    fn derived_pack_is_stamped_on_tree() {
        let registry = LanguagePackRegistry::builtin();
        let base = registry.get("javascript").unwrap();
        let custom = Arc::new(base.derive("jsx-lite", Grammar::JavaScript));

        let tree = parse(&base, "let a = 1;").unwrap();
        assert_eq!(tree.pack().language, "javascript");

        let tree = parse(&custom, "let a = 1;").unwrap();
        assert_eq!(tree.pack().language, "jsx-lite");
    }
}
