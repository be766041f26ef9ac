use crate::lang::Grammar;
use crate::ts::errors::TreeSitterError;
use crate::ts::tree::SyntaxTree;
use std::collections::HashMap;
use tree_sitter::{Node, Query, QueryCursor, StreamingIterator};

/// Capture holding a construct's identifier or string label.
pub const NAME_CAPTURE: &str = "name";
/// Capture holding the called function of a block.
pub const CALLEE_CAPTURE: &str = "callee";

/// A match from a tree-sitter query with captured nodes.
#[derive(Debug, Clone)]
pub struct QueryMatch<'t> {
    pub pattern_index: usize,
    /// The matched construct: the capture that is neither `@name` nor
    /// `@callee`, or the parent of `@name` when the pattern has no such
    /// capture.
    pub node: Node<'t>,
    /// Named captures; for repeated captures only the first node is kept.
    pub captures: HashMap<String, Node<'t>>,
}

impl<'t> QueryMatch<'t> {
    pub fn capture(&self, name: &str) -> Option<Node<'t>> {
        self.captures.get(name).copied()
    }

    pub fn name_node(&self) -> Option<Node<'t>> {
        self.capture(NAME_CAPTURE)
    }

    pub fn callee_node(&self) -> Option<Node<'t>> {
        self.capture(CALLEE_CAPTURE)
    }
}

/// Compiled query for one grammar.
///
/// Compilation is lenient: if the whole query string fails, each top-level
/// pattern is tried on its own and the ones that compile are kept. Pack
/// queries can therefore list node types that only some grammar versions
/// know about.
#[derive(Debug)]
pub struct QueryEngine {
    grammar: Grammar,
    query: Option<Query>,
    capture_names: Vec<String>,
    dropped_patterns: usize,
}

impl QueryEngine {
    /// Compile `source` for `grammar`.
    ///
    /// # Query Syntax
    ///
    /// Tree-sitter queries use S-expression syntax:
    /// ```text
    /// (class_declaration
    ///   name: (_) @name) @class
    /// ```
    ///
    /// A blank query compiles to an engine that never matches.
    pub fn compile(grammar: Grammar, source: &str) -> Result<Self, TreeSitterError> {
        if source.trim().is_empty() {
            return Ok(Self::from_parts(grammar, None, 0));
        }

        let language = grammar.ts_language();
        let whole_error = match Query::new(&language, source) {
            Ok(query) => return Ok(Self::from_parts(grammar, Some(query), 0)),
            Err(err) => err,
        };

        let patterns = split_patterns(source);
        let total = patterns.len();
        let kept: Vec<&str> = patterns
            .into_iter()
            .filter(|pattern| match Query::new(&language, pattern) {
                Ok(_) => true,
                Err(err) => {
                    tracing::debug!(%grammar, error = %err, pattern, "dropping query pattern");
                    false
                }
            })
            .collect();

        if kept.is_empty() {
            return Err(TreeSitterError::InvalidQuery {
                grammar: grammar.to_string(),
                message: whole_error.to_string(),
            });
        }

        let query = Query::new(&language, &kept.join("\n\n")).map_err(|err| {
            TreeSitterError::InvalidQuery {
                grammar: grammar.to_string(),
                message: err.to_string(),
            }
        })?;

        let dropped = total - kept.len();
        tracing::warn!(
            %grammar,
            dropped,
            kept = kept.len(),
            "query partially compiled; unsupported patterns skipped"
        );
        Ok(Self::from_parts(grammar, Some(query), dropped))
    }

    fn from_parts(grammar: Grammar, query: Option<Query>, dropped_patterns: usize) -> Self {
        let capture_names = query
            .as_ref()
            .map(|q| q.capture_names().iter().map(|s| s.to_string()).collect())
            .unwrap_or_default();

        Self {
            grammar,
            query,
            capture_names,
            dropped_patterns,
        }
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    /// Number of patterns discarded during lenient compilation.
    pub fn dropped_patterns(&self) -> usize {
        self.dropped_patterns
    }

    /// Get capture names defined in the query.
    pub fn capture_names(&self) -> &[String] {
        &self.capture_names
    }

    /// Execute the query against a tree and return all matches in the order
    /// tree-sitter reports them.
    pub fn find_all<'t>(&self, tree: &'t SyntaxTree) -> Vec<QueryMatch<'t>> {
        let (Some(query), Some(root)) = (self.query.as_ref(), tree.root()) else {
            return Vec::new();
        };

        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, root, tree.source().as_bytes());
        let mut results = Vec::new();

        // tree-sitter 0.25+ uses StreamingIterator
        while let Some(m) = matches.next() {
            let mut captures: HashMap<String, Node<'t>> = HashMap::new();
            let mut construct = None;

            for capture in m.captures {
                let Some(name) = self.capture_names.get(capture.index as usize) else {
                    continue;
                };
                if name != NAME_CAPTURE && name != CALLEE_CAPTURE && construct.is_none() {
                    construct = Some(capture.node);
                }
                captures.entry(name.clone()).or_insert(capture.node);
            }

            let node = construct
                .or_else(|| captures.get(NAME_CAPTURE).and_then(|n| n.parent()))
                .or_else(|| m.captures.first().map(|c| c.node));

            if let Some(node) = node {
                results.push(QueryMatch {
                    pattern_index: m.pattern_index,
                    node,
                    captures,
                });
            }
        }

        results
    }
}

/// Split a query into its top-level patterns.
///
/// A new pattern begins at every `(` or `[` opened at nesting depth zero.
/// Captures and quantifiers after a closing paren stay with the pattern they
/// follow. String literals and `;` comments are skipped while tracking depth.
pub(crate) fn split_patterns(source: &str) -> Vec<&str> {
    let mut patterns = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut chars = source.char_indices();

    while let Some((idx, ch)) = chars.next() {
        match ch {
            ';' => {
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '"' => {
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '"' => break,
                        _ => {}
                    }
                }
            }
            '(' | '[' => {
                if depth == 0 {
                    if let Some(begin) = start {
                        patterns.push(source[begin..idx].trim());
                    }
                    start = Some(idx);
                }
                depth += 1;
            }
            ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    if let Some(begin) = start {
        patterns.push(source[begin..].trim());
    }

    patterns.retain(|pattern| !pattern.is_empty());
    patterns
}
