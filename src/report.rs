//! Serializable result shapes for callers that hand results to other tools.
//!
//! Field names are camelCase on the wire; lines and columns are 1-based.

use crate::lang::NormalizedKind;
use crate::resolve::SemanticMatch;
use crate::ts::PathLocation;
use serde::Serialize;

/// Every semantic path a file supports, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathsReport {
    pub file: String,
    pub language: String,
    pub total_paths: usize,
    pub paths: Vec<String>,
}

impl PathsReport {
    pub fn new(file: impl Into<String>, language: impl Into<String>, mut paths: Vec<String>) -> Self {
        paths.sort();
        Self {
            file: file.into(),
            language: language.into(),
            total_paths: paths.len(),
            paths,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateMatch {
    pub path: String,
    pub line: usize,
    pub column: usize,
    pub text: String,
}

/// Structural paths of every occurrence of a literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateReport {
    pub file: String,
    pub search_text: String,
    pub language: String,
    pub total_matches: usize,
    pub matches: Vec<LocateMatch>,
}

impl LocateReport {
    pub fn new(
        file: impl Into<String>,
        search_text: impl Into<String>,
        language: impl Into<String>,
        locations: &[PathLocation],
    ) -> Self {
        let matches: Vec<LocateMatch> = locations
            .iter()
            .map(|loc| LocateMatch {
                path: loc.path.to_string(),
                line: loc.row + 1,
                column: loc.column + 1,
                text: loc.text.clone(),
            })
            .collect();

        Self {
            file: file.into(),
            search_text: search_text.into(),
            language: language.into(),
            total_matches: matches.len(),
            matches,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMatch {
    pub path: String,
    pub kind: NormalizedKind,
    pub name: String,
    pub description: String,
    pub line: usize,
    pub column: usize,
}

/// Nodes a semantic path resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindReport {
    pub file: String,
    pub path: String,
    pub language: String,
    pub total_matches: usize,
    pub matches: Vec<FindMatch>,
}

impl FindReport {
    pub fn new(
        file: impl Into<String>,
        path: impl Into<String>,
        language: impl Into<String>,
        found: &[SemanticMatch],
    ) -> Self {
        let matches: Vec<FindMatch> = found
            .iter()
            .map(|m| FindMatch {
                path: m.path.to_string(),
                kind: m.kind,
                name: m.name.clone(),
                description: m.description.clone(),
                line: m.start.row + 1,
                column: m.start.column + 1,
            })
            .collect();

        Self {
            file: file.into(),
            path: path.into(),
            language: language.into(),
            total_matches: matches.len(),
            matches,
        }
    }
}

/// Outcome of one edit operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditReport {
    pub file: String,
    pub path: String,
    pub action: String,
    pub success: bool,
    pub message: String,
}

impl EditReport {
    pub fn success(
        file: impl Into<String>,
        path: impl Into<String>,
        action: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            path: path.into(),
            action: action.into(),
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(
        file: impl Into<String>,
        path: impl Into<String>,
        action: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            ..Self::success(file, path, action, message)
        }
    }
}
