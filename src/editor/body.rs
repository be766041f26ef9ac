//! Body location driven by the pack's [`BodyRule`] lists.

use crate::lang::{BodyRule, NormalizedKind};
use crate::ts::SyntaxTree;
use tree_sitter::Node;

/// Delimiters that close a body; bodies without one are indentation based.
const CLOSING_DELIMITERS: &[&str] = &["}", "]", ")", "end"];

/// Find the body of `node`: the first rule for its raw type that resolves
/// wins. A node with no rules that is itself a body is its own body.
pub(crate) fn find_body<'t>(tree: &'t SyntaxTree, node: Node<'t>) -> Option<Node<'t>> {
    let rules = tree.pack().body_rules(node.kind());
    if rules.is_empty() {
        return (tree.kind_of(node) == NormalizedKind::Body).then_some(node);
    }
    rules.iter().find_map(|rule| apply_rule(tree, node, rule))
}

fn apply_rule<'t>(tree: &'t SyntaxTree, node: Node<'t>, rule: &BodyRule) -> Option<Node<'t>> {
    match rule {
        BodyRule::SelfNode => Some(node),
        BodyRule::Child { node_type } => {
            let mut cursor = node.walk();
            let found = node
                .named_children(&mut cursor)
                .find(|child| child.kind() == node_type);
            found
        }
        BodyRule::Field { name } => node.child_by_field_name(name),
        BodyRule::FunctionBody => first_body_descendant(tree, node),
        BodyRule::CallCallbackBody => callback_body(tree, node),
    }
}

/// First descendant (pre-order, excluding `node`) that normalizes to a body.
fn first_body_descendant<'t>(tree: &'t SyntaxTree, node: Node<'t>) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let mut stack: Vec<Node<'t>> = node.children(&mut cursor).collect();
    stack.reverse();

    while let Some(current) = stack.pop() {
        if tree.kind_of(current) == NormalizedKind::Body {
            return Some(current);
        }
        let mut cursor = current.walk();
        let mut children: Vec<Node<'t>> = current.children(&mut cursor).collect();
        children.reverse();
        stack.extend(children);
    }

    None
}

/// Body of the last argument of a call that has one.
fn callback_body<'t>(tree: &'t SyntaxTree, call: Node<'t>) -> Option<Node<'t>> {
    let arguments = call.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    let args: Vec<Node<'t>> = arguments.named_children(&mut cursor).collect();

    args.into_iter().rev().find_map(|arg| {
        arg.child_by_field_name("body")
            .filter(|body| tree.kind_of(*body) == NormalizedKind::Body)
    })
}

/// The anonymous token closing `body`, if the body has one.
pub(crate) fn closing_delimiter(body: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = body.walk();
    let last = body.children(&mut cursor).last()?;
    (!last.is_named() && CLOSING_DELIMITERS.contains(&last.kind())).then_some(last)
}
