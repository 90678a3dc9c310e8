//! changelog::format
//!
//! Canonical markdown formatter.
//!
//! Every rendered changelog document and entry block passes through
//! [`format_markdown`] before being shown or persisted, keeping the file
//! diff-stable across platforms and authorship styles. The formatter is
//! a normalizer, not a full markdown engine:
//!
//! - line endings become `\n`, trailing whitespace is stripped
//! - top-level `*` bullets become `- ` with a single space
//! - runs of blank lines collapse to one
//! - headings are padded by a blank line on both sides
//! - the output has no leading blanks and exactly one trailing newline
//!
//! The normalization is idempotent: formatting already-formatted text
//! returns it unchanged.

/// Normalize a markdown fragment or document.
pub fn format_markdown(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();

    for raw_line in text.replace("\r\n", "\n").lines() {
        let line = raw_line.trim_end();
        let line = normalize_bullet(line);

        if line.is_empty() {
            if matches!(out.last(), Some(last) if last.is_empty()) || out.is_empty() {
                continue;
            }
            out.push(String::new());
            continue;
        }

        // Headings get a blank line above.
        if line.starts_with('#') && matches!(out.last(), Some(last) if !last.is_empty()) {
            out.push(String::new());
        }
        // And a blank line below the previous heading before content.
        if let Some(last) = out.last() {
            if last.starts_with('#') {
                out.push(String::new());
            }
        }

        out.push(line);
    }

    while matches!(out.last(), Some(last) if last.is_empty()) {
        out.pop();
    }

    if out.is_empty() {
        return String::new();
    }
    let mut formatted = out.join("\n");
    formatted.push('\n');
    formatted
}

/// Rewrite `*`-style bullets and multi-space bullets to `- `.
fn normalize_bullet(line: &str) -> String {
    let trimmed = line.trim_start();
    let indent_len = line.len() - trimmed.len();
    let indent = &line[..indent_len];
    for marker in ["- ", "* "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return format!("{indent}- {}", rest.trim_start());
        }
    }
    line.to_string()
}
