//! Formatting utilities shared by the renderers.
//!
//! Provides identifier checks, escaping for Mermaid and Markdown, and
//! indentation management.

use std::collections::HashSet;

/// Words Mermaid treats as keywords in flowcharts. Compared case-insensitively.
const MERMAID_RESERVED: &[&str] = &[
    "end", "graph", "flowchart", "subgraph", "direction", "style", "classdef", "class", "click",
    "linkstyle", "default", "call", "href",
];

/// Check if a string is a safe Mermaid ER entity or attribute name.
///
/// Safe names start with a letter or underscore, followed by letters,
/// digits, underscores or hyphens.
#[must_use]
pub fn is_safe_er_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Check if a string can be used as a flowchart node id as-is.
#[must_use]
pub fn is_safe_node_id(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_mermaid_reserved(s)
}

#[must_use]
pub fn is_mermaid_reserved(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    MERMAID_RESERVED.contains(&lower.as_str())
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`, prefixing `_`
/// when the result would start with a digit or be empty.
#[must_use]
pub fn sanitize_identifier(s: &str) -> String {
    let mut result: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// Claim `base`, or the first free `base_2`, `base_3`, ... in `used`.
pub fn claim_unique(base: String, used: &mut HashSet<String>) -> String {
    let mut id = base.clone();
    let mut n = 2;
    while used.contains(&id) {
        id = format!("{}_{}", base, n);
        n += 1;
    }
    used.insert(id.clone());
    id
}

/// Escape text for a double-quoted Mermaid string.
///
/// Quotes become the `#quot;` entity; line breaks become spaces.
#[must_use]
pub fn escape_mermaid(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("#quot;"),
            '\n' | '\r' | '\t' => result.push(' '),
            c => result.push(c),
        }
    }
    result
}

/// Quote a Mermaid string.
#[must_use]
pub fn quote_mermaid(s: &str) -> String {
    format!("\"{}\"", escape_mermaid(s))
}

/// ER entity reference: bare when safe, quoted otherwise.
#[must_use]
pub fn er_entity_name(s: &str) -> String {
    if is_safe_er_name(s) {
        s.to_string()
    } else {
        quote_mermaid(s)
    }
}

/// Escape text for a Markdown table cell.
///
/// Pipes are escaped and line breaks flattened; the text is otherwise kept
/// as-is so it can sit inside a code span.
#[must_use]
pub fn escape_markdown(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '|' => result.push_str("\\|"),
            '\n' | '\r' => result.push(' '),
            c => result.push(c),
        }
    }
    result
}

/// Markdown code span for an identifier.
#[must_use]
pub fn code_span(s: &str) -> String {
    let escaped = escape_markdown(s);
    if escaped.contains('`') {
        format!("`` {} ``", escaped)
    } else {
        format!("`{}`", escaped)
    }
}

/// A writer that manages indentation for Mermaid output.
#[derive(Debug)]
pub struct IndentWriter {
    buffer: String,
    indent_str: String,
    current_indent: usize,
}

impl IndentWriter {
    /// Create a writer indenting by `width` spaces per level.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            buffer: String::new(),
            indent_str: " ".repeat(width),
            current_indent: 0,
        }
    }

    pub fn indent(&mut self) {
        self.current_indent += 1;
    }

    pub fn dedent(&mut self) {
        self.current_indent = self.current_indent.saturating_sub(1);
    }

    /// Write a complete line at the current indentation.
    pub fn write_line(&mut self, s: &str) {
        for _ in 0..self.current_indent {
            self.buffer.push_str(&self.indent_str);
        }
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Write a Mermaid comment line.
    pub fn write_comment(&mut self, comment: &str) {
        self.write_line(&format!("%% {}", comment));
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl Default for IndentWriter {
    fn default() -> Self {
        Self::new(4)
    }
}
