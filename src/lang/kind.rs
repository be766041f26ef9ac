use serde::{Deserialize, Serialize};
use std::fmt;

/// Cross-language category a raw node type normalizes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizedKind {
    Class,
    Interface,
    Constructor,
    Method,
    Function,
    Property,
    Body,
    Block,
    Unknown,
}

impl NormalizedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizedKind::Class => "class",
            NormalizedKind::Interface => "interface",
            NormalizedKind::Constructor => "constructor",
            NormalizedKind::Method => "method",
            NormalizedKind::Function => "function",
            NormalizedKind::Property => "property",
            NormalizedKind::Body => "body",
            NormalizedKind::Block => "block",
            NormalizedKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NormalizedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to find "the body" of a construct.
///
/// Rules for one node type are tried in declaration order; the first rule
/// that resolves to a node wins.
///
/// In TOML pack files a rule is written as an inline table:
///
/// ```text
/// body_map.class_declaration = [{ rule = "field", name = "body" }]
/// body_map.call_expression = [{ rule = "call-callback-body" }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum BodyRule {
    /// The node is already a body.
    #[serde(rename = "self")]
    SelfNode,
    /// First named child with the given raw type.
    Child { node_type: String },
    /// Child reached through a grammar field.
    Field { name: String },
    /// First nested descendant that normalizes to [`NormalizedKind::Body`].
    FunctionBody,
    /// Body of the last callback argument of a call expression.
    CallCallbackBody,
}

impl BodyRule {
    pub fn child(node_type: impl Into<String>) -> Self {
        BodyRule::Child {
            node_type: node_type.into(),
        }
    }

    pub fn field(name: impl Into<String>) -> Self {
        BodyRule::Field { name: name.into() }
    }
}
