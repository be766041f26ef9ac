use crate::lang::PackError;
use crate::ts::TreeSitterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditError {
    #[error("node not found: {path}{}", render_suggestions(.suggestions))]
    NodeNotFound {
        path: String,
        suggestions: Vec<String>,
    },

    #[error("ambiguous path '{path}' matches {} nodes:{}", .matches.len(), render_list(.matches))]
    AmbiguousPath { path: String, matches: Vec<String> },

    #[error("no body found for '{path}'")]
    BodyNotFound { path: String },

    #[error("parse degraded: the {language} grammar produced no tree")]
    ParseDegraded { language: String },

    #[error("edit introduces {count} syntax error(s); first at {line}:{column}")]
    SyntaxErrorsIntroduced {
        count: usize,
        line: usize,
        column: usize,
    },

    #[error("invalid byte range [{byte_start}, {byte_end}) in text of length {text_len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        text_len: usize,
    },

    #[error(transparent)]
    Pack(#[from] PackError),

    #[error(transparent)]
    TreeSitter(#[from] TreeSitterError),
}

fn render_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

fn render_list(items: &[String]) -> String {
    items.iter().map(|item| format!("\n  - {item}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_message_lists_every_description() {
        let err = EditError::AmbiguousPath {
            path: "method".to_string(),
            matches: vec![
                "method method in class A".to_string(),
                "method method in class B".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "ambiguous path 'method' matches 2 nodes:\n  - method method in class A\n  - method method in class B"
        );
    }

    #[test]
    fn not_found_message_carries_suggestions() {
        let err = EditError::NodeNotFound {
            path: "Calculator.ad".to_string(),
            suggestions: vec!["Calculator.add".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "node not found: Calculator.ad (did you mean: Calculator.add?)"
        );

        let bare = EditError::NodeNotFound {
            path: "x".to_string(),
            suggestions: Vec::new(),
        };
        assert_eq!(bare.to_string(), "node not found: x");
    }
}
