use crate::lang::{LanguagePack, LanguagePackRegistry, PackError};
use crate::ts::errors::TreeSitterError;
use crate::ts::tree::{ParseStatus, SyntaxTree};
use std::sync::Arc;
use tree_sitter::Parser;

/// Tree-sitter parser bound to one language pack.
pub struct StructuralParser {
    parser: Parser,
    pack: Arc<LanguagePack>,
    status: ParseStatus,
}

impl StructuralParser {
    /// Create a parser for the pack's grammar.
    pub fn new(pack: Arc<LanguagePack>) -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        parser
            .set_language(&pack.grammar.ts_language())
            .map_err(|_| TreeSitterError::LanguageSet {
                grammar: pack.grammar.to_string(),
            })?;

        Ok(Self {
            parser,
            pack,
            status: ParseStatus::NotParsed,
        })
    }

    /// Create a parser for a built-in language name or extension.
    pub fn for_language(language: &str) -> Result<Self, ParserSetupError> {
        let pack = LanguagePackRegistry::builtin().get(language)?;
        Ok(Self::new(pack)?)
    }

    pub fn pack(&self) -> &Arc<LanguagePack> {
        &self.pack
    }

    /// Status of the most recent parse.
    pub fn status(&self) -> ParseStatus {
        self.status
    }

    /// Swap in a pack that shares this parser's grammar.
    pub(crate) fn set_pack(&mut self, pack: Arc<LanguagePack>) {
        debug_assert_eq!(pack.grammar, self.pack.grammar);
        self.pack = pack;
    }

    /// Parse `source` into a fresh tree. Never fails: when the grammar
    /// binding yields nothing the returned tree is degraded.
    pub fn parse(&mut self, source: &str) -> SyntaxTree {
        let source: Arc<str> = Arc::from(source);
        let tree = match self.parser.parse(source.as_bytes(), None) {
            Some(tree) => SyntaxTree::new(tree, source, Arc::clone(&self.pack)),
            None => {
                tracing::warn!(
                    language = %self.pack.language,
                    "grammar produced no tree; structural operations will return empty results"
                );
                self.parser.reset();
                SyntaxTree::degraded(source, Arc::clone(&self.pack))
            }
        };
        self.status = tree.status();
        tree
    }
}

/// Failure to build a parser from a language name.
#[derive(thiserror::Error, Debug)]
pub enum ParserSetupError {
    #[error(transparent)]
    Pack(#[from] PackError),

    #[error(transparent)]
    TreeSitter(#[from] TreeSitterError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_source() {
        let mut parser = StructuralParser::for_language("rust").unwrap();
        assert_eq!(parser.status(), ParseStatus::NotParsed);

        let tree = parser.parse("fn main() { println!(\"hello\"); }");
        assert_eq!(parser.status(), ParseStatus::Parsed);
        assert!(!tree.has_errors());
        assert_eq!(tree.root().unwrap().kind(), "source_file");
    }

    #[test]
    fn parse_invalid_source_still_yields_tree() {
        let mut parser = StructuralParser::for_language("python").unwrap();
        let tree = parser.parse("def broken(:\n");
        assert_eq!(tree.status(), ParseStatus::Parsed);
        assert!(tree.has_errors());
    }

    #[test]
    fn parser_is_reusable() {
        let mut parser = StructuralParser::for_language("js").unwrap();
        let first = parser.parse("let a = 1;");
        let second = parser.parse("class B {}");
        assert_eq!(first.source(), "let a = 1;");
        assert_eq!(second.find_nodes_by_type("class_declaration").len(), 1);
    }

    #[test]
    fn unknown_language_rejected() {
        assert!(matches!(
            StructuralParser::for_language("fortran"),
            Err(ParserSetupError::Pack(PackError::UnsupportedLanguage { .. }))
        ));
    }
}
