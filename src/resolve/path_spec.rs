use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static BLOCK_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_$][\w$.]*)\s*\((.*)\)\s*$").expect("block path pattern is valid")
});

/// A parsed human-readable path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticPath {
    /// `callee("label")` or `callee()`.
    Block {
        callee: String,
        label: Option<String>,
    },
    /// A bare name, matched against every query category.
    Name(String),
    /// `Outer.Inner.member`: each container must enclose the next part.
    Member {
        containers: Vec<String>,
        member: String,
    },
}

impl SemanticPath {
    /// Parse a semantic path. Returns `None` for blank input or a dotted
    /// path with an empty part.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Some(caps) = BLOCK_FORM.captures(input) {
            let callee = caps.get(1)?.as_str().to_string();
            let argument = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            let label = if argument.is_empty() {
                None
            } else {
                Some(unquote(argument).unwrap_or(argument).to_string())
            };
            return Some(SemanticPath::Block { callee, label });
        }

        let mut parts: Vec<String> = input.split('.').map(|p| p.trim().to_string()).collect();
        if parts.iter().any(String::is_empty) {
            return None;
        }

        let member = parts.pop()?;
        if parts.is_empty() {
            Some(SemanticPath::Name(member))
        } else {
            Some(SemanticPath::Member {
                containers: parts,
                member,
            })
        }
    }
}

impl fmt::Display for SemanticPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticPath::Block {
                callee,
                label: Some(label),
            } => write!(f, "{callee}(\"{label}\")"),
            SemanticPath::Block { callee, label: None } => write!(f, "{callee}()"),
            SemanticPath::Name(name) => f.write_str(name),
            SemanticPath::Member { containers, member } => {
                write!(f, "{}.{member}", containers.join("."))
            }
        }
    }
}

/// Strip one pair of matching string delimiters: triple quotes, `"`, `'`
/// or a backtick. Returns `None` when the text is not symmetrically quoted.
pub fn unquote(text: &str) -> Option<&str> {
    for delim in ["\"\"\"", "'''"] {
        if text.len() >= 2 * delim.len() && text.starts_with(delim) && text.ends_with(delim) {
            return Some(&text[delim.len()..text.len() - delim.len()]);
        }
    }

    let first = text.chars().next()?;
    if matches!(first, '"' | '\'' | '`') && text.len() >= 2 && text.ends_with(first) {
        return Some(&text[1..text.len() - 1]);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(callee: &str, label: Option<&str>) -> SemanticPath {
        SemanticPath::Block {
            callee: callee.to_string(),
            label: label.map(str::to_string),
        }
    }

    #[test]
    fn parses_block_forms() {
        assert_eq!(
            SemanticPath::parse(r#"describe("Auth")"#),
            Some(block("describe", Some("Auth")))
        );
        assert_eq!(
            SemanticPath::parse("it('logs in')"),
            Some(block("it", Some("logs in")))
        );
        assert_eq!(
            SemanticPath::parse("test(`renders`)"),
            Some(block("test", Some("renders")))
        );
        assert_eq!(
            SemanticPath::parse("beforeEach()"),
            Some(block("beforeEach", None))
        );
        assert_eq!(
            SemanticPath::parse("  beforeEach ( )  "),
            Some(block("beforeEach", None))
        );
    }

    #[test]
    fn parses_dotted_forms() {
        assert_eq!(
            SemanticPath::parse("add"),
            Some(SemanticPath::Name("add".to_string()))
        );
        assert_eq!(
            SemanticPath::parse("Calculator.add"),
            Some(SemanticPath::Member {
                containers: vec!["Calculator".to_string()],
                member: "add".to_string(),
            })
        );
        assert_eq!(
            SemanticPath::parse("Outer.Inner.run"),
            Some(SemanticPath::Member {
                containers: vec!["Outer".to_string(), "Inner".to_string()],
                member: "run".to_string(),
            })
        );
    }

    #[test]
    fn rejects_blank_and_broken_paths() {
        assert_eq!(SemanticPath::parse(""), None);
        assert_eq!(SemanticPath::parse("   "), None);
        assert_eq!(SemanticPath::parse("Calculator."), None);
        assert_eq!(SemanticPath::parse(".add"), None);
    }

    #[test]
    fn display_matches_listing_format() {
        for input in [r#"describe("Auth")"#, "beforeEach()", "Calculator.add", "add"] {
            assert_eq!(SemanticPath::parse(input).unwrap().to_string(), input);
        }
    }

    #[test]
    fn unquote_is_symmetric() {
        assert_eq!(unquote(r#""x""#), Some("x"));
        assert_eq!(unquote("'x'"), Some("x"));
        assert_eq!(unquote("`x`"), Some("x"));
        assert_eq!(unquote(r#""""doc""""#), Some("doc"));
        assert_eq!(unquote(r#""""#), Some(""));
        assert_eq!(unquote(r#""x'"#), None);
        assert_eq!(unquote(r#"f"x""#), None);
        assert_eq!(unquote("\""), None);
        assert_eq!(unquote("plain"), None);
    }
}
