//! Index-based structural paths.
//!
//! A path lists `type[index]` segments from the root to a node, joined with
//! `/`, where `index` is the node's position among all children of its
//! parent:
//!
//! ```text
//! program[0]/class_declaration[0]/class_body[2]/method_definition[1]
//! ```
//!
//! Paths address nodes within one tree instance only; an edit elsewhere in
//! the file may shift sibling indices.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const SEPARATOR: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    pub node_type: String,
    pub index: usize,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.node_type, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StructuralPath {
    segments: Vec<PathSegment>,
}

impl StructuralPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Raw type of the addressed node.
    pub fn leaf_type(&self) -> Option<&str> {
        self.segments.last().map(|s| s.node_type.as_str())
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                f.write_str(SEPARATOR)?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl Serialize for StructuralPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParseError {
    pub input: String,
}

impl fmt::Display for PathParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a structural path: {}", self.input)
    }
}

impl std::error::Error for PathParseError {}

impl FromStr for StructuralPath {
    type Err = PathParseError;

    /// Parse `type[index]/type[index]/...`.
    ///
    /// Raw types may themselves contain `/`, `[` or `]` (operator tokens), so
    /// segments are delimited by `]/` and each segment's index is taken from
    /// its last `[`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PathParseError {
            input: s.to_string(),
        };

        let body = s.trim().strip_suffix(']').ok_or_else(err)?;
        let mut segments = Vec::new();

        for raw in body.split("]/") {
            let open = raw.rfind('[').ok_or_else(err)?;
            let node_type = &raw[..open];
            let index = raw[open + 1..].parse::<usize>().map_err(|_| err())?;
            if node_type.is_empty() {
                return Err(err());
            }
            segments.push(PathSegment {
                node_type: node_type.to_string(),
                index,
            });
        }

        Ok(Self { segments })
    }
}
