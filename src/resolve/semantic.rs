use crate::cache;
use crate::lang::{NormalizedKind, QueryCategory};
use crate::resolve::path_spec::{unquote, SemanticPath};
use crate::ts::{Position, QueryMatch, StructuralPath, SyntaxTree};
use serde::Serialize;
use std::collections::HashSet;
use tree_sitter::Node;

const SUGGESTION_THRESHOLD: f64 = 0.8;
const MAX_SUGGESTIONS: usize = 3;

/// One node a semantic path resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticMatch {
    pub path: StructuralPath,
    pub kind: NormalizedKind,
    pub name: String,
    /// Innermost enclosing class, for members.
    pub container: Option<String>,
    /// Human description, e.g. `add method in class Calculator`.
    pub description: String,
    pub start: Position,
    pub end: Position,
    pub byte_start: usize,
    pub byte_end: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
struct Named<'t> {
    node: Node<'t>,
    name: &'t str,
}

#[derive(Debug, Clone)]
struct Block<'t> {
    node: Node<'t>,
    callee: &'t str,
    label: Option<String>,
}

/// Every construct the pack queries find in one tree, deduplicated by node
/// and sorted in document order.
pub(crate) struct SemanticIndex<'t> {
    tree: &'t SyntaxTree,
    classes: Vec<Named<'t>>,
    methods: Vec<Named<'t>>,
    properties: Vec<Named<'t>>,
    blocks: Vec<Block<'t>>,
}

impl<'t> SemanticIndex<'t> {
    pub(crate) fn build(tree: &'t SyntaxTree) -> Self {
        let named = |category: QueryCategory| {
            let mut entries: Vec<Named<'t>> = run_query(tree, category)
                .into_iter()
                .filter_map(|m| {
                    let name = m.name_node()?;
                    Some(Named {
                        node: m.node,
                        name: tree.node_text(name),
                    })
                })
                .collect();
            dedup_sorted(&mut entries, |e| e.node);
            entries
        };

        let mut blocks: Vec<Block<'t>> = run_query(tree, QueryCategory::Blocks)
            .into_iter()
            .filter_map(|m| {
                let callee = m.callee_node()?;
                Some(Block {
                    node: m.node,
                    callee: tree.node_text(callee),
                    label: m.name_node().map(|n| string_label(tree, n)),
                })
            })
            .collect();
        dedup_sorted(&mut blocks, |b| b.node);

        Self {
            tree,
            classes: named(QueryCategory::Classes),
            methods: named(QueryCategory::Methods),
            properties: named(QueryCategory::Properties),
            blocks,
        }
    }

    /// Innermost class whose byte range strictly encloses `node`.
    fn enclosing_class(&self, node: Node<'t>) -> Option<&Named<'t>> {
        self.enclosing_class_named(node, None)
    }

    fn enclosing_class_named(&self, node: Node<'t>, name: Option<&str>) -> Option<&Named<'t>> {
        self.classes
            .iter()
            .filter(|class| name.map_or(true, |n| class.name == n))
            .filter(|class| encloses(class.node, node))
            .min_by_key(|class| class.node.end_byte() - class.node.start_byte())
    }

    /// Whether `node` sits inside a chain of classes named `containers`,
    /// outermost first.
    fn contained_in_chain(&self, node: Node<'t>, containers: &[String]) -> bool {
        let mut inner = node;
        for container in containers.iter().rev() {
            match self.enclosing_class_named(inner, Some(container.as_str())) {
                Some(class) => inner = class.node,
                None => return false,
            }
        }
        true
    }

    pub(crate) fn resolve(&self, path: &SemanticPath) -> Vec<SemanticMatch> {
        let mut hits: Vec<SemanticMatch> = Vec::new();

        match path {
            SemanticPath::Block { callee, label } => {
                for block in &self.blocks {
                    let label_ok = match label {
                        None => true,
                        Some(wanted) => block.label.as_deref() == Some(wanted.as_str()),
                    };
                    if block.callee == callee && label_ok {
                        hits.push(self.block_match(block));
                    }
                }
            }
            SemanticPath::Name(name) => {
                for class in self.classes.iter().filter(|c| c.name == name) {
                    hits.push(self.class_match(class));
                }
                for method in self.methods.iter().filter(|m| m.name == name) {
                    hits.push(self.member_match(method, NormalizedKind::Method));
                }
                for property in self.properties.iter().filter(|p| p.name == name) {
                    hits.push(self.member_match(property, NormalizedKind::Property));
                }
                for block in &self.blocks {
                    if block.label.as_deref() == Some(name.as_str()) {
                        hits.push(self.block_match(block));
                    }
                }
            }
            SemanticPath::Member { containers, member } => {
                let members = self
                    .methods
                    .iter()
                    .map(|m| (m, NormalizedKind::Method))
                    .chain(self.properties.iter().map(|p| (p, NormalizedKind::Property)));
                for (entry, fallback) in members {
                    if entry.name == member && self.contained_in_chain(entry.node, containers) {
                        hits.push(self.member_match(entry, fallback));
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        hits.retain(|hit| seen.insert((hit.byte_start, hit.byte_end, hit.path.clone())));
        hits.sort_by_key(|hit| (hit.byte_start, std::cmp::Reverse(hit.byte_end)));
        hits
    }

    /// Every path this tree supports, one per construct, in document order.
    pub(crate) fn all_paths(&self) -> Vec<String> {
        let mut entries: Vec<(usize, String)> = Vec::new();

        for class in &self.classes {
            entries.push((class.node.start_byte(), class.name.to_string()));
        }
        for method in &self.methods {
            let path = match self.enclosing_class(method.node) {
                Some(class) => format!("{}.{}", class.name, method.name),
                None => method.name.to_string(),
            };
            entries.push((method.node.start_byte(), path));
        }
        for property in &self.properties {
            if let Some(class) = self.enclosing_class(property.node) {
                entries.push((
                    property.node.start_byte(),
                    format!("{}.{}", class.name, property.name),
                ));
            }
        }
        for block in &self.blocks {
            let path = SemanticPath::Block {
                callee: block.callee.to_string(),
                label: block.label.clone(),
            };
            entries.push((block.node.start_byte(), path.to_string()));
        }

        entries.sort_by_key(|(start, _)| *start);
        entries.into_iter().map(|(_, path)| path).collect()
    }

    fn class_match(&self, class: &Named<'t>) -> SemanticMatch {
        let kind = match self.tree.kind_of(class.node) {
            NormalizedKind::Interface => NormalizedKind::Interface,
            _ => NormalizedKind::Class,
        };
        self.build_match(class.node, kind, class.name, None, format!("{} {kind}", class.name))
    }

    fn member_match(&self, member: &Named<'t>, fallback: NormalizedKind) -> SemanticMatch {
        let container = self.enclosing_class(member.node);
        let kind = match (self.tree.kind_of(member.node), container) {
            (NormalizedKind::Function, Some(_)) => NormalizedKind::Method,
            // `const f = () => {}` and friends have no kind of their own.
            (NormalizedKind::Unknown | NormalizedKind::Body | NormalizedKind::Block, None)
                if fallback == NormalizedKind::Method =>
            {
                NormalizedKind::Function
            }
            (NormalizedKind::Unknown | NormalizedKind::Body | NormalizedKind::Block, _) => fallback,
            (kind, _) => kind,
        };

        let description = match container {
            Some(class) => {
                let container_kind = match self.tree.kind_of(class.node) {
                    NormalizedKind::Interface => "interface",
                    _ => "class",
                };
                format!("{} {kind} in {container_kind} {}", member.name, class.name)
            }
            None => format!("{} {kind}", member.name),
        };

        self.build_match(
            member.node,
            kind,
            member.name,
            container.map(|c| c.name.to_string()),
            description,
        )
    }

    fn block_match(&self, block: &Block<'t>) -> SemanticMatch {
        let rendered = SemanticPath::Block {
            callee: block.callee.to_string(),
            label: block.label.clone(),
        }
        .to_string();
        let container = self.enclosing_class(block.node).map(|c| c.name.to_string());
        let name = block.label.clone().unwrap_or_else(|| block.callee.to_string());
        self.build_match(
            block.node,
            NormalizedKind::Block,
            &name,
            container,
            format!("{rendered} block"),
        )
    }

    fn build_match(
        &self,
        node: Node<'t>,
        kind: NormalizedKind,
        name: &str,
        container: Option<String>,
        description: String,
    ) -> SemanticMatch {
        SemanticMatch {
            path: self.tree.node_path(node),
            kind,
            name: name.to_string(),
            container,
            description,
            start: node.start_position().into(),
            end: node.end_position().into(),
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            text: self.tree.node_text(node).to_string(),
        }
    }
}

/// Run one pack query. A query the grammar rejects yields no matches.
fn run_query(tree: &SyntaxTree, category: QueryCategory) -> Vec<QueryMatch<'_>> {
    let pack = tree.pack();
    let source = pack.queries.get(category);
    if source.trim().is_empty() || tree.is_degraded() {
        return Vec::new();
    }

    match cache::get_or_compile_query(pack.grammar, source) {
        Ok(engine) => engine.find_all(tree),
        Err(err) => {
            tracing::debug!(
                language = %pack.language,
                category = category.as_str(),
                error = %err,
                "query failed; treating as zero matches"
            );
            Vec::new()
        }
    }
}

/// Text of a string literal without its delimiters.
fn string_label(tree: &SyntaxTree, node: Node<'_>) -> String {
    let text = tree.node_text(node);
    if let Some(inner) = unquote(text) {
        return inner.to_string();
    }

    if let Some(content_type) = tree.pack().string_unwrap.as_deref() {
        let mut cursor = node.walk();
        let content: Vec<&str> = node
            .named_children(&mut cursor)
            .filter(|child| child.kind() == content_type)
            .map(|child| tree.node_text(child))
            .collect();
        if !content.is_empty() {
            return content.concat();
        }
    }

    text.to_string()
}

fn encloses(outer: Node<'_>, inner: Node<'_>) -> bool {
    outer != inner && outer.start_byte() <= inner.start_byte() && inner.end_byte() <= outer.end_byte()
}

fn dedup_sorted<'t, T>(entries: &mut Vec<T>, node_of: impl Fn(&T) -> Node<'t>) {
    let mut seen = HashSet::new();
    entries.retain(|entry| seen.insert(node_of(entry).id()));
    entries.sort_by_key(|entry| {
        let node = node_of(entry);
        (node.start_byte(), std::cmp::Reverse(node.end_byte()))
    });
}

/// Resolve a semantic path against a tree. All matches are returned, in
/// document order; an unparsable path yields none.
pub fn find_by_semantic_path(tree: &SyntaxTree, path: &str) -> Vec<SemanticMatch> {
    match SemanticPath::parse(path) {
        Some(parsed) => SemanticIndex::build(tree).resolve(&parsed),
        None => Vec::new(),
    }
}

/// Every semantic path the tree supports, for discovery and completion.
pub fn all_semantic_paths(tree: &SyntaxTree) -> Vec<String> {
    SemanticIndex::build(tree).all_paths()
}

/// Up to three known paths most similar to `path`.
pub fn suggest(tree: &SyntaxTree, path: &str) -> Vec<String> {
    let mut scored: Vec<(f64, String)> = all_semantic_paths(tree)
        .into_iter()
        .collect::<HashSet<_>>()
        .into_iter()
        .map(|candidate| (strsim::jaro_winkler(path, &candidate), candidate))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate)
        .collect()
}
