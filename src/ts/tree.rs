use crate::lang::{LanguagePack, NormalizedKind};
use crate::ts::path::{PathSegment, StructuralPath};
use serde::Serialize;
use std::sync::Arc;
use tree_sitter::{Node, Point, Tree};

/// Outcome of a parse, as seen by callers that need to tell an empty result
/// caused by a degraded parse apart from a genuinely empty one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseStatus {
    /// No text has been parsed yet.
    NotParsed,
    /// The grammar produced a tree with a usable root.
    Parsed,
    /// The grammar binding produced no tree; every traversal is empty.
    Degraded,
}

/// Zero-based row and byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl From<Point> for Position {
    fn from(point: Point) -> Self {
        Position {
            row: point.row,
            column: point.column,
        }
    }
}

/// A literal occurrence found by [`SyntaxTree::find_paths_for_line`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathLocation {
    pub path: StructuralPath,
    pub row: usize,
    pub column: usize,
    /// Text of the smallest node covering the occurrence.
    pub text: String,
}

/// Information about an ERROR or MISSING node in the parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    pub byte_start: usize,
    pub byte_end: usize,
    pub start: Position,
    pub end: Position,
    pub missing: bool,
}

/// Immutable parse result of one text with one language pack.
///
/// The tree never changes after construction; edits produce a new tree from
/// new text. Cloning is cheap (the tree is reference counted and the source
/// is shared).
#[derive(Clone)]
pub struct SyntaxTree {
    tree: Option<Tree>,
    source: Arc<str>,
    pack: Arc<LanguagePack>,
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("language", &self.pack.language)
            .field("status", &self.status())
            .field("bytes", &self.source.len())
            .finish()
    }
}

impl SyntaxTree {
    pub(crate) fn new(tree: Tree, source: Arc<str>, pack: Arc<LanguagePack>) -> Self {
        Self {
            tree: Some(tree),
            source,
            pack,
        }
    }

    /// A tree for text the grammar binding failed to parse.
    pub(crate) fn degraded(source: Arc<str>, pack: Arc<LanguagePack>) -> Self {
        Self {
            tree: None,
            source,
            pack,
        }
    }

    pub fn status(&self) -> ParseStatus {
        match self.tree {
            Some(_) => ParseStatus::Parsed,
            None => ParseStatus::Degraded,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.tree.is_none()
    }

    pub fn root(&self) -> Option<Node<'_>> {
        self.tree.as_ref().map(Tree::root_node)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn shared_source(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }

    pub fn pack(&self) -> &Arc<LanguagePack> {
        &self.pack
    }

    /// Extract text for a node's byte range.
    pub fn node_text(&self, node: Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    /// Normalized kind of a node under this tree's language pack.
    pub fn kind_of(&self, node: Node<'_>) -> NormalizedKind {
        self.pack.kind_of(node.kind())
    }

    /// Check if the tree contains any ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        self.root().is_some_and(|root| root.has_error())
    }

    /// Get all ERROR and MISSING nodes in document order.
    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        self.preorder()
            .into_iter()
            .filter(|node| node.is_error() || node.is_missing())
            .map(|node| ErrorNode {
                byte_start: node.start_byte(),
                byte_end: node.end_byte(),
                start: node.start_position().into(),
                end: node.end_position().into(),
                missing: node.is_missing(),
            })
            .collect()
    }

    /// Every node in pre-order (document order).
    pub fn preorder(&self) -> Vec<Node<'_>> {
        let Some(root) = self.root() else {
            return Vec::new();
        };

        let mut nodes = Vec::new();
        let mut cursor = root.walk();
        loop {
            nodes.push(cursor.node());
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return nodes;
                }
            }
        }
    }

    /// All nodes whose raw type equals `raw_type`, in document order.
    pub fn find_nodes_by_type(&self, raw_type: &str) -> Vec<Node<'_>> {
        self.preorder()
            .into_iter()
            .filter(|node| node.kind() == raw_type)
            .collect()
    }

    /// All named nodes whose raw type normalizes to `kind`.
    ///
    /// Matching is by raw node type only: a pack maps a type to the kind its
    /// nodes usually have, so statement-level types that only sometimes hold
    /// a declaration are left unmapped and never match.
    ///
    /// Results are grouped per raw type (raw types in sorted order), each
    /// group in document order. Callers needing a total order must sort by
    /// start position.
    pub fn find_nodes_by_kind(&self, kind: NormalizedKind) -> Vec<Node<'_>> {
        self.pack
            .raw_types_for(kind)
            .into_iter()
            .flat_map(|raw| {
                self.find_nodes_by_type(raw)
                    .into_iter()
                    .filter(|node| node.is_named())
            })
            .collect()
    }

    /// Locate every literal occurrence of `search_text`, line by line and
    /// left to right, and report the smallest node covering each one.
    pub fn find_paths_for_line(&self, search_text: &str) -> Vec<PathLocation> {
        let Some(root) = self.root() else {
            return Vec::new();
        };
        if search_text.is_empty() {
            return Vec::new();
        }

        let mut locations = Vec::new();
        let mut line_start = 0usize;

        for (row, line) in self.source.split('\n').enumerate() {
            for (column, _) in line.match_indices(search_text) {
                let start = line_start + column;
                let end = start + search_text.len();
                let node = smallest_covering(root, start, end);
                locations.push(PathLocation {
                    path: self.node_path(node),
                    row,
                    column,
                    text: self.node_text(node).to_string(),
                });
            }
            line_start += line.len() + 1;
        }

        locations
    }

    /// Compute the structural path of `node`.
    pub fn node_path(&self, node: Node<'_>) -> StructuralPath {
        let mut segments = Vec::new();
        let mut current = node;

        while let Some(parent) = current.parent() {
            let mut cursor = parent.walk();
            let index = parent
                .children(&mut cursor)
                .position(|child| child == current)
                .unwrap_or(0);
            segments.push(PathSegment {
                node_type: current.kind().to_string(),
                index,
            });
            current = parent;
        }

        segments.push(PathSegment {
            node_type: current.kind().to_string(),
            index: 0,
        });
        segments.reverse();
        StructuralPath::new(segments)
    }

    /// Follow a structural path from the root. Any type or index mismatch
    /// yields `None`.
    pub fn resolve_path(&self, path: &StructuralPath) -> Option<Node<'_>> {
        let root = self.root()?;
        let (first, rest) = path.segments().split_first()?;
        if first.node_type != root.kind() || first.index != 0 {
            return None;
        }

        let mut current = root;
        for segment in rest {
            let mut cursor = current.walk();
            let child = current.children(&mut cursor).nth(segment.index)?;
            if child.kind() != segment.node_type {
                return None;
            }
            current = child;
        }

        Some(current)
    }

    /// Parse and follow a path string; unparsable strings yield `None`.
    pub fn resolve_path_str(&self, path: &str) -> Option<Node<'_>> {
        let path = path.parse::<StructuralPath>().ok()?;
        self.resolve_path(&path)
    }
}

/// Descend from `node` while a child fully covers `start..end`.
fn smallest_covering(node: Node<'_>, start: usize, end: usize) -> Node<'_> {
    let mut current = node;
    'descend: loop {
        let mut cursor = current.walk();
        for child in current.children(&mut cursor) {
            if child.start_byte() <= start && end <= child.end_byte() {
                current = child;
                continue 'descend;
            }
        }
        return current;
    }
}
