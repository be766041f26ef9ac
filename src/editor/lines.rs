//! Line-level text splicing with 1-based, clamped line numbers.

/// A text split into lines, remembering whether it ended with a newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lines<'a> {
    pub lines: Vec<&'a str>,
    pub trailing_newline: bool,
}

impl<'a> Lines<'a> {
    pub fn split(text: &'a str) -> Self {
        if text.is_empty() {
            return Self {
                lines: Vec::new(),
                trailing_newline: false,
            };
        }

        let trailing_newline = text.ends_with('\n');
        let body = text.strip_suffix('\n').unwrap_or(text);
        Self {
            lines: body.split('\n').collect(),
            trailing_newline,
        }
    }

    pub fn join(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Insert `content` after line `after_line`; `0` inserts at the top and
/// numbers past the end append.
pub fn add_lines(text: &str, after_line: usize, content: &str) -> String {
    let mut buffer = Lines::split(text);
    let inserted = Lines::split(content);
    let at = after_line.min(buffer.lines.len());

    if text.is_empty() {
        buffer.trailing_newline = true;
    }
    buffer.lines.splice(at..at, inserted.lines);
    buffer.join()
}

/// Remove lines `start..=end`. Reversed ranges are swapped and the range is
/// clamped to the buffer.
pub fn remove_lines(text: &str, start: usize, end: usize) -> String {
    let mut buffer = Lines::split(text);
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let len = buffer.lines.len();

    let first = start.max(1);
    let last = end.min(len);
    if first > last {
        return text.to_string();
    }

    buffer.lines.drain(first - 1..last);
    buffer.join()
}

/// Replace line `line` with `content`, which may span several lines.
/// Out-of-range numbers clamp to the first or last line.
pub fn update_line(text: &str, line: usize, content: &str) -> String {
    let mut buffer = Lines::split(text);
    let replacement = Lines::split(content).lines;

    if buffer.lines.is_empty() {
        buffer.lines = replacement;
        buffer.trailing_newline = true;
        return buffer.join();
    }

    let idx = line.clamp(1, buffer.lines.len()) - 1;
    buffer.lines.splice(idx..=idx, replacement);
    buffer.join()
}

/// Byte offset where the line containing `offset` starts.
pub(crate) fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Byte offset of the newline ending the line containing `offset`, or the
/// text length on the last line.
pub(crate) fn line_end(text: &str, offset: usize) -> usize {
    text[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(text.len())
}

/// Leading whitespace of the line containing `offset`.
pub(crate) fn line_indent(text: &str, offset: usize) -> &str {
    let start = line_start(text, offset);
    let line = &text[start..line_end(text, start)];
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

/// Line terminator to use when inserting into `text`.
pub(crate) fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Whether only spaces or tabs precede `offset` on its line.
pub(crate) fn starts_line(text: &str, offset: usize) -> bool {
    text[line_start(text, offset)..offset]
        .chars()
        .all(|c| c == ' ' || c == '\t')
}
