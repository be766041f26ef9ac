//! Immutable structural editing.
//!
//! A [`TreeEditor`] pairs the current tree with the text the edit chain
//! started from. Every operation returns a new editor built by re-parsing
//! the edited text; the receiver is never modified, so several edit
//! branches can grow from the same base. Diffs are always taken against the
//! first text in the chain.
//!
//! All node edits compile down to a single [`Splice`] over the current text.

mod body;
pub mod diff;
mod errors;
mod indent;
pub mod lines;
mod splice;

pub use errors::EditError;
pub use splice::Splice;

use crate::lang::{LanguagePack, LanguagePackRegistry};
use crate::pool;
use crate::resolve::{self, SemanticMatch};
use crate::ts::{PathLocation, StructuralPath, SyntaxTree};
use std::sync::Arc;
use tree_sitter::Node;

#[derive(Debug, Clone)]
#[must_use = "TreeEditor operations return a new editor; the receiver is unchanged"]
pub struct TreeEditor {
    tree: SyntaxTree,
    original: Arc<str>,
}

impl TreeEditor {
    /// Start an edit chain from an already parsed tree.
    pub fn new(tree: SyntaxTree) -> Self {
        let original = tree.shared_source();
        Self { tree, original }
    }

    /// Parse `text` with `pack` and start an edit chain.
    pub fn parse(pack: &Arc<LanguagePack>, text: &str) -> Result<Self, EditError> {
        Ok(Self::new(pool::parse(pack, text)?))
    }

    /// Parse `text` with a built-in pack looked up by name or extension.
    pub fn for_language(language: &str, text: &str) -> Result<Self, EditError> {
        let pack = LanguagePackRegistry::builtin().get(language)?;
        Self::parse(&pack, text)
    }

    pub fn text(&self) -> &str {
        self.tree.source()
    }

    pub fn original_text(&self) -> &str {
        &self.original
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn pack(&self) -> &Arc<LanguagePack> {
        self.tree.pack()
    }

    pub fn is_modified(&self) -> bool {
        *self.original != *self.text()
    }

    fn with_text(&self, text: String) -> Result<Self, EditError> {
        let tree = pool::parse(self.tree.pack(), &text)?;
        tracing::trace!(
            language = %self.tree.pack().language,
            bytes = text.len(),
            "re-parsed after edit"
        );
        Ok(Self {
            tree,
            original: Arc::clone(&self.original),
        })
    }

    fn apply(&self, splice: Splice) -> Result<Self, EditError> {
        let text = splice.apply(self.text())?;
        self.with_text(text)
    }

    fn ensure_parsed(&self) -> Result<(), EditError> {
        if self.tree.is_degraded() {
            return Err(EditError::ParseDegraded {
                language: self.tree.pack().language.clone(),
            });
        }
        Ok(())
    }

    /// Insert `content` after 1-based line `after_line` (`0` inserts at the
    /// top).
    pub fn add_lines(&self, after_line: usize, content: &str) -> Result<Self, EditError> {
        self.with_text(lines::add_lines(self.text(), after_line, content))
    }

    /// Remove 1-based lines `start..=end`, clamped to the buffer.
    pub fn remove_lines(&self, start: usize, end: usize) -> Result<Self, EditError> {
        self.with_text(lines::remove_lines(self.text(), start, end))
    }

    /// Replace 1-based line `line`, clamped to the buffer.
    pub fn update_line(&self, line: usize, content: &str) -> Result<Self, EditError> {
        self.with_text(lines::update_line(self.text(), line, content))
    }

    fn resolve_raw(&self, path: &str) -> Result<Node<'_>, EditError> {
        self.ensure_parsed()?;
        self.tree
            .resolve_path_str(path)
            .ok_or_else(|| EditError::NodeNotFound {
                path: path.to_string(),
                suggestions: Vec::new(),
            })
    }

    /// Exactly one semantic match, `None` for zero, an error for several.
    fn resolve_semantic(&self, path: &str) -> Result<Option<SemanticMatch>, EditError> {
        self.ensure_parsed()?;
        let mut matches = resolve::find_by_semantic_path(&self.tree, path);
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(EditError::AmbiguousPath {
                path: path.to_string(),
                matches: matches.into_iter().map(|m| m.description).collect(),
            }),
        }
    }

    fn not_found(&self, path: &str) -> EditError {
        EditError::NodeNotFound {
            path: path.to_string(),
            suggestions: resolve::suggest(&self.tree, path),
        }
    }

    /// Semantic first, then raw indexed.
    fn resolve_any(&self, path: &str) -> Result<Node<'_>, EditError> {
        if let Some(found) = self.resolve_semantic(path)? {
            return self.node_at(&found.path, path);
        }
        self.tree
            .resolve_path_str(path)
            .ok_or_else(|| self.not_found(path))
    }

    fn node_at(&self, path: &StructuralPath, requested: &str) -> Result<Node<'_>, EditError> {
        self.tree
            .resolve_path(path)
            .ok_or_else(|| self.not_found(requested))
    }

    /// Replace the node at a structural path with `content`.
    pub fn update_node_by_path(&self, path: &str, content: &str) -> Result<Self, EditError> {
        let node = self.resolve_raw(path)?;
        self.apply(Splice::new(node.start_byte(), node.end_byte(), content))
    }

    /// Replace the single node a semantic path names with `content`.
    pub fn update_node_by_semantic_path(
        &self,
        path: &str,
        content: &str,
    ) -> Result<Self, EditError> {
        let found = self
            .resolve_semantic(path)?
            .ok_or_else(|| self.not_found(path))?;
        self.update_node_by_path(&found.path.to_string(), content)
    }

    /// Replace the node a semantic or structural path names.
    pub fn update_node(&self, path: &str, content: &str) -> Result<Self, EditError> {
        let node = self.resolve_any(path)?;
        self.apply(Splice::new(node.start_byte(), node.end_byte(), content))
    }

    /// Remove the node at a structural path, and its line if that leaves
    /// the line blank.
    pub fn delete_node_by_path(&self, path: &str) -> Result<Self, EditError> {
        let node = self.resolve_raw(path)?;
        self.delete(node)
    }

    pub fn delete_node_by_semantic_path(&self, path: &str) -> Result<Self, EditError> {
        let found = self
            .resolve_semantic(path)?
            .ok_or_else(|| self.not_found(path))?;
        self.delete_node_by_path(&found.path.to_string())
    }

    /// Remove the node a semantic or structural path names.
    pub fn delete_node(&self, path: &str) -> Result<Self, EditError> {
        let node = self.resolve_any(path)?;
        self.delete(node)
    }

    fn delete(&self, node: Node<'_>) -> Result<Self, EditError> {
        let start = node.start_byte();
        let end = separator_after(self.text(), node).unwrap_or_else(|| node.end_byte());
        let text = Splice::new(start, end, "").apply(self.text())?;

        let line_start = lines::line_start(&text, start);
        let line_end = lines::line_end(&text, start);
        if !text[line_start..line_end].trim().is_empty() {
            return self.with_text(text);
        }

        let blank = if line_end < text.len() {
            Splice::new(line_start, line_end + 1, "")
        } else if line_start > 0 {
            Splice::new(line_start - 1, line_end, "")
        } else {
            Splice::new(line_start, line_end, "")
        };
        self.with_text(blank.apply(&text)?)
    }

    /// Append `content` as the last member of a parent's body.
    ///
    /// An empty `parent_path` appends at the end of the file after a blank
    /// line. Otherwise the parent is resolved semantically first, then as a
    /// structural path, and its body is located through the pack's body
    /// rules. Content is re-indented one level inside the body.
    pub fn append_child(&self, parent_path: &str, content: &str) -> Result<Self, EditError> {
        if parent_path.trim().is_empty() {
            return self.with_text(append_to_end(self.text(), content));
        }

        let body = self.resolve_body(parent_path)?;
        let splice = self.append_splice(body, content);
        self.apply(splice)
    }

    /// Insert `content` before the first body member whose raw type is in
    /// `before_types`, at that member's indentation. Without such a member
    /// this appends like [`TreeEditor::append_child`].
    pub fn insert_before(
        &self,
        parent_path: &str,
        content: &str,
        before_types: &[&str],
    ) -> Result<Self, EditError> {
        if parent_path.trim().is_empty() {
            return self.with_text(append_to_end(self.text(), content));
        }

        let body = self.resolve_body(parent_path)?;
        let mut cursor = body.walk();
        let anchor = body
            .named_children(&mut cursor)
            .find(|child| before_types.contains(&child.kind()));

        let Some(anchor) = anchor else {
            let splice = self.append_splice(body, content);
            return self.apply(splice);
        };

        let text = self.text();
        let eol = lines::line_ending(text);
        let start = anchor.start_byte();

        let splice = if lines::starts_line(text, start) {
            let prefix = lines::line_indent(text, start);
            Splice::insert(
                lines::line_start(text, start),
                format!("{}{eol}", member_block(content, prefix, eol)),
            )
        } else {
            let prefix = self.member_indent(body);
            let trimmed = text[..start].trim_end_matches([' ', '\t']).len();
            Splice::new(
                trimmed,
                start,
                format!("{eol}{}{eol}{prefix}", member_block(content, &prefix, eol)),
            )
        };
        self.apply(splice)
    }

    fn resolve_body(&self, parent_path: &str) -> Result<Node<'_>, EditError> {
        let parent = self.resolve_any(parent_path)?;
        body::find_body(&self.tree, parent).ok_or_else(|| EditError::BodyNotFound {
            path: parent_path.to_string(),
        })
    }

    /// Indentation for a new member of `body`: that of its first member if
    /// it sits on its own line, otherwise one unit deeper than the line the
    /// body closes (or starts) on.
    fn member_indent(&self, body: Node<'_>) -> String {
        let text = self.text();
        let mut cursor = body.walk();
        let first = body.named_children(&mut cursor).next();
        if let Some(first) = first.filter(|n| lines::starts_line(text, n.start_byte())) {
            return lines::line_indent(text, first.start_byte()).to_string();
        }

        let anchor = body::closing_delimiter(body)
            .map(|close| close.start_byte())
            .unwrap_or_else(|| body.start_byte());
        format!(
            "{}{}",
            lines::line_indent(text, anchor),
            self.tree.pack().indent_unit
        )
    }

    fn append_splice(&self, body: Node<'_>, content: &str) -> Splice {
        let text = self.text();
        let eol = lines::line_ending(text);
        let prefix = self.member_indent(body);
        let block = member_block(content, &prefix, eol);

        if let Some(close) = body::closing_delimiter(body) {
            let close_start = close.start_byte();
            if lines::starts_line(text, close_start) {
                return Splice::insert(lines::line_start(text, close_start), format!("{block}{eol}"));
            }
            let closing_indent = lines::line_indent(text, close_start);
            let trimmed = text[..close_start].trim_end_matches([' ', '\t']).len();
            return Splice::new(trimmed, close_start, format!("{eol}{block}{eol}{closing_indent}"));
        }

        let start = body.start_byte();
        let end = body.end_byte();

        // Indentation-delimited body on its header's line (`class A: pass`):
        // it moves to a line of its own above the new member.
        if !lines::starts_line(text, start) {
            let header = text[..start].trim_end_matches([' ', '\t']).len();
            let inline = text[start..end].trim_end();
            return Splice::new(
                header,
                start + inline.len(),
                format!("{eol}{prefix}{inline}{eol}{block}"),
            );
        }

        // Otherwise add after its last line.
        let anchor = if end > start && text[..end].ends_with('\n') {
            end - 1
        } else {
            end
        };
        let mut at = lines::line_end(text, anchor);
        if text[..at].ends_with('\r') {
            at -= 1;
        }
        Splice::insert(at, format!("{eol}{block}"))
    }

    pub fn find_paths_for_line(&self, search_text: &str) -> Vec<PathLocation> {
        self.tree.find_paths_for_line(search_text)
    }

    pub fn find_nodes_by_semantic_path(&self, path: &str) -> Vec<SemanticMatch> {
        resolve::find_by_semantic_path(&self.tree, path)
    }

    pub fn all_semantic_paths(&self) -> Vec<String> {
        resolve::all_semantic_paths(&self.tree)
    }

    /// Unified diff from the first text of the chain to the current text.
    /// Empty when nothing changed.
    pub fn generate_diff(&self) -> String {
        self.generate_diff_labeled(&self.tree.pack().language)
    }

    /// Like [`TreeEditor::generate_diff`], with `label` in the file headers.
    pub fn generate_diff_labeled(&self, label: &str) -> String {
        diff::unified_diff(&self.original, self.text(), label)
    }

    pub fn diff_hunk_count(&self) -> usize {
        diff::hunk_count(&self.original, self.text())
    }

    /// Fail if the current text has more ERROR or MISSING nodes than the
    /// original text did.
    pub fn validate(&self) -> Result<(), EditError> {
        self.ensure_parsed()?;
        let errors = self.tree.error_nodes();
        if errors.is_empty() {
            return Ok(());
        }

        let baseline = pool::parse(self.tree.pack(), &self.original)?
            .error_nodes()
            .len();
        if errors.len() <= baseline {
            return Ok(());
        }

        let first = &errors[0];
        Err(EditError::SyntaxErrorsIntroduced {
            count: errors.len() - baseline,
            line: first.start.row + 1,
            column: first.start.column + 1,
        })
    }
}

fn append_to_end(text: &str, content: &str) -> String {
    let eol = lines::line_ending(text);
    let content = content.trim_matches(['\r', '\n']).replace("\r\n", "\n").replace('\n', eol);
    let base = text.trim_end_matches(['\r', '\n']);
    if base.is_empty() {
        format!("{content}{eol}")
    } else {
        format!("{base}{eol}{eol}{content}{eol}")
    }
}

/// `content` dedented and re-indented under `prefix`, with `eol` line breaks.
fn member_block(content: &str, prefix: &str, eol: &str) -> String {
    indent::indent(&indent::dedent(content), prefix).replace('\n', eol)
}

/// End of a `;` or `,` directly following `node` on its line.
fn separator_after(text: &str, node: Node<'_>) -> Option<usize> {
    let next = node
        .next_sibling()
        .filter(|next| !next.is_named() && matches!(next.kind(), ";" | ","))?;
    let gap = text.get(node.end_byte()..next.start_byte())?;
    gap.chars()
        .all(|c| c == ' ' || c == '\t')
        .then(|| next.end_byte())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALCULATOR: &str = "class Calculator { add(a,b){return a+b;} }";

    fn js(text: &str) -> TreeEditor {
        TreeEditor::for_language("javascript", text).unwrap()
    }

    #[test]
    fn receiver_is_unchanged_by_edits() {
        let editor = js(CALCULATOR);
        let edited = editor.add_lines(0, "// header").unwrap();
        assert_eq!(editor.text(), CALCULATOR);
        assert!(edited.text().starts_with("// header\n"));
        assert_eq!(edited.original_text(), CALCULATOR);
    }

    #[test]
    fn update_by_semantic_path() {
        let editor = js(CALCULATOR);
        let edited = editor
            .update_node_by_semantic_path("Calculator.add", "subtract(a,b){return a-b;}")
            .unwrap();
        assert!(edited.text().contains("subtract"));
        assert!(!edited.text().contains("add(a,b)"));
    }

    #[test]
    fn update_with_same_text_is_noop() {
        let editor = js(CALCULATOR);
        let matches = editor.find_nodes_by_semantic_path("Calculator.add");
        let path = matches[0].path.to_string();
        let edited = editor.update_node_by_path(&path, &matches[0].text).unwrap();
        assert_eq!(edited.text(), CALCULATOR);
        assert_eq!(edited.diff_hunk_count(), 0);
    }

    #[test]
    fn unknown_raw_path_not_found() {
        let editor = js(CALCULATOR);
        let err = editor
            .update_node_by_path("program[0]/class_declaration[3]", "x")
            .unwrap_err();
        assert!(matches!(err, EditError::NodeNotFound { .. }));
    }

    #[test]
    fn semantic_not_found_suggests() {
        let editor = js(CALCULATOR);
        match editor.update_node_by_semantic_path("Calculator.ad", "x") {
            Err(EditError::NodeNotFound { suggestions, .. }) => {
                assert_eq!(suggestions.first().map(String::as_str), Some("Calculator.add"));
            }
            other => panic!("expected NodeNotFound, got {other:?}"),
        }
    }

    #[test]
    fn append_inline_body() {
        let editor = js(CALCULATOR);
        let edited = editor
            .append_child("Calculator", "subtract(a,b){return a-b;}")
            .unwrap();
        assert_eq!(
            edited.text(),
            "class Calculator { add(a,b){return a+b;}\n  subtract(a,b){return a-b;}\n}"
        );
        assert!(!edited.tree().has_errors());
    }

    #[test]
    fn append_multiline_body_uses_member_indent() {
        let source = "class A {\n    one() {}\n}\n";
        let edited = js(source).append_child("A", "two() {\n  return 2;\n}").unwrap();
        assert_eq!(
            edited.text(),
            "class A {\n    one() {}\n    two() {\n      return 2;\n    }\n}\n"
        );
    }

    #[test]
    fn append_to_empty_body() {
        let edited = js("class A {}\n").append_child("A", "run() {}").unwrap();
        assert_eq!(edited.text(), "class A {\n  run() {}\n}\n");
    }

    #[test]
    fn append_at_end_of_file() {
        let edited = js("let a = 1;\n").append_child("", "let b = 2;").unwrap();
        assert_eq!(edited.text(), "let a = 1;\n\nlet b = 2;\n");
    }

    #[test]
    fn append_by_raw_path() {
        let editor = js("class A {\n  one() {}\n}\n");
        let class_path = editor.tree().node_path(editor.tree().find_nodes_by_type("class_declaration")[0]);
        let edited = editor
            .append_child(&class_path.to_string(), "two() {}")
            .unwrap();
        assert_eq!(edited.text(), "class A {\n  one() {}\n  two() {}\n}\n");
    }

    #[test]
    fn append_into_block_callback() {
        let source = "describe(\"Auth\", () => {\n  it(\"a\", () => {});\n});\n";
        let edited = js(source)
            .append_child("describe(\"Auth\")", "it(\"b\", () => {});")
            .unwrap();
        assert_eq!(
            edited.text(),
            "describe(\"Auth\", () => {\n  it(\"a\", () => {});\n  it(\"b\", () => {});\n});\n"
        );
    }

    #[test]
    fn append_python_indentation_body() {
        let source = "class A:\n    def one(self):\n        return 1\n\nx = 1\n";
        let editor = TreeEditor::for_language("python", source).unwrap();
        let edited = editor
            .append_child("A", "def two(self):\n    return 2")
            .unwrap();
        assert_eq!(
            edited.text(),
            "class A:\n    def one(self):\n        return 1\n    def two(self):\n        return 2\n\nx = 1\n"
        );
        assert!(!edited.tree().has_errors());
        assert_eq!(edited.find_nodes_by_semantic_path("A.two").len(), 1);
    }

    #[test]
    fn append_missing_body() {
        let editor = js("const a = run(\"x\", 1);\n");
        let path = editor.tree().node_path(editor.tree().find_nodes_by_type("number")[0]);
        let err = editor.append_child(&path.to_string(), "x").unwrap_err();
        assert!(matches!(err, EditError::BodyNotFound { .. }));
    }

    #[test]
    fn insert_before_matching_member() {
        let source = "class A {\n  x = 1;\n  run() {}\n}\n";
        let edited = js(source)
            .insert_before("A", "setup() {}", &["method_definition"])
            .unwrap();
        assert_eq!(edited.text(), "class A {\n  x = 1;\n  setup() {}\n  run() {}\n}\n");
    }

    #[test]
    fn insert_before_falls_back_to_append() {
        let source = "class A {\n  run() {}\n}\n";
        let edited = js(source)
            .insert_before("A", "y = 2;", &["field_definition"])
            .unwrap();
        assert_eq!(edited.text(), "class A {\n  run() {}\n  y = 2;\n}\n");
    }

    #[test]
    fn delete_removes_blank_line() {
        let source = "class A {\n  one() {}\n  two() {}\n}\n";
        let edited = js(source).delete_node_by_semantic_path("A.one").unwrap();
        assert_eq!(edited.text(), "class A {\n  two() {}\n}\n");
    }

    #[test]
    fn delete_inline_keeps_line() {
        let edited = js(CALCULATOR).delete_node("Calculator.add").unwrap();
        assert_eq!(edited.text(), "class Calculator {  }");
    }

    #[test]
    fn delete_takes_trailing_separator() {
        let source = "class A {\n  x = 1;\n  run() {}\n}\n";
        let edited = js(source).delete_node_by_semantic_path("A.x").unwrap();
        assert_eq!(edited.text(), "class A {\n  run() {}\n}\n");

        let editor = js("f(a, b);\n");
        let first = editor.tree().node_path(editor.tree().find_nodes_by_type("identifier")[1]);
        let edited = editor.delete_node_by_path(&first.to_string()).unwrap();
        assert_eq!(edited.text(), "f( b);\n");
    }

    #[test]
    fn append_moves_inline_python_body() {
        let editor = TreeEditor::for_language("python", "class A: pass\n").unwrap();
        let edited = editor
            .append_child("A", "def run(self):\n    return 1")
            .unwrap();
        assert_eq!(
            edited.text(),
            "class A:\n    pass\n    def run(self):\n        return 1\n"
        );
        assert!(!edited.tree().has_errors());
        assert_eq!(edited.find_nodes_by_semantic_path("A.run").len(), 1);
    }

    #[test]
    fn edits_keep_crlf_line_endings() {
        let edited = js("class A {\r\n  one() {}\r\n}\r\n")
            .append_child("A", "two() {}")
            .unwrap();
        assert_eq!(edited.text(), "class A {\r\n  one() {}\r\n  two() {}\r\n}\r\n");

        let edited = js("class A {\r\n  run() {}\r\n}\r\n")
            .insert_before("A", "x = 1;", &["method_definition"])
            .unwrap();
        assert_eq!(edited.text(), "class A {\r\n  x = 1;\r\n  run() {}\r\n}\r\n");

        let editor = TreeEditor::for_language("python", "class A:\r\n    x = 1\r\n").unwrap();
        let edited = editor.append_child("A", "y = 2").unwrap();
        assert_eq!(edited.text(), "class A:\r\n    x = 1\r\n    y = 2\r\n");

        let edited = js("let a = 1;\r\n").append_child("", "let b = 2;").unwrap();
        assert_eq!(edited.text(), "let a = 1;\r\n\r\nlet b = 2;\r\n");
    }

    #[test]
    fn diff_tracks_original_across_chain() {
        let editor = js("let a = 1;\nlet b = 2;\n");
        assert_eq!(editor.generate_diff(), "");
        assert_eq!(editor.diff_hunk_count(), 0);

        let edited = editor
            .update_line(1, "let a = 10;")
            .unwrap()
            .update_line(2, "let b = 20;")
            .unwrap();
        let diff = edited.generate_diff_labeled("vars.js");
        assert!(diff.contains("-let a = 1;"));
        assert!(diff.contains("+let b = 20;"));
        assert_eq!(edited.diff_hunk_count(), 1);

        let reverted = edited.update_line(1, "let a = 1;").unwrap().update_line(2, "let b = 2;").unwrap();
        assert_eq!(reverted.generate_diff(), "");
    }

    #[test]
    fn validate_flags_introduced_errors_only() {
        let editor = js(CALCULATOR);
        assert!(editor.validate().is_ok());

        let broken = editor.update_node("Calculator.add", "add(a,b){return a+").unwrap();
        assert!(matches!(
            broken.validate(),
            Err(EditError::SyntaxErrorsIntroduced { .. })
        ));

        let already_broken = js("let = ;\n");
        assert!(already_broken.validate().is_ok());
        let commented = already_broken.add_lines(0, "// note").unwrap();
        assert!(commented.validate().is_ok());
    }

    #[test]
    fn degraded_tree_rejects_node_edits() {
        let pack = LanguagePackRegistry::builtin().get("javascript").unwrap();
        let editor = TreeEditor::new(SyntaxTree::degraded(Arc::from("class A {}"), pack));
        assert!(matches!(
            editor.update_node_by_path("program[0]", "x"),
            Err(EditError::ParseDegraded { .. })
        ));
        assert!(editor.find_nodes_by_semantic_path("A").is_empty());
    }
}
