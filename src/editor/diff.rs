//! Unified diffs between the original text of an edit chain and its
//! current text.

use similar::TextDiff;

const CONTEXT_LINES: usize = 3;

/// Unified diff with 3 lines of context and `@@ -a,b +c,d @@` hunk headers.
/// Identical texts produce an empty string.
pub fn unified_diff(original: &str, current: &str, label: &str) -> String {
    if original == current {
        return String::new();
    }

    TextDiff::from_lines(original, current)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(&format!("a/{label}"), &format!("b/{label}"))
        .to_string()
}

/// Number of hunks [`unified_diff`] would emit.
pub fn hunk_count(original: &str, current: &str) -> usize {
    if original == current {
        return 0;
    }
    TextDiff::from_lines(original, current)
        .grouped_ops(CONTEXT_LINES)
        .len()
}
