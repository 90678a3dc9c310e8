//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag. Boxed
//! panels are used for content the user must read before answering a
//! prompt (pending changelog entries, post-release reminders).

use std::fmt::Display;

use console::{measure_text_width, style};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Style a message as informational (blue).
pub fn info_text(message: impl Display) -> String {
    style(message).blue().to_string()
}

/// Style a message as a success (green).
pub fn success_text(message: impl Display) -> String {
    style(message).green().to_string()
}

/// Style a message as subdued (italic).
pub fn subdued_text(message: impl Display) -> String {
    style(message).italic().to_string()
}

/// Render a boxed panel around `body` with an optional title.
///
/// Widths are measured with ANSI escapes stripped so styled content
/// does not skew the frame.
pub fn panel(title: Option<&str>, body: &str) -> String {
    let lines: Vec<&str> = body.lines().collect();
    let content_width = lines
        .iter()
        .map(|line| measure_text_width(line))
        .chain(title.map(|t| measure_text_width(t) + 2))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    match title {
        Some(title) => {
            let pad = content_width - measure_text_width(title);
            out.push_str(&format!("┌ {} {}┐\n", title, "─".repeat(pad)));
        }
        None => out.push_str(&format!("┌{}┐\n", "─".repeat(content_width + 2))),
    }
    for line in &lines {
        let pad = content_width - measure_text_width(line);
        out.push_str(&format!("│ {}{} │\n", line, " ".repeat(pad)));
    }
    out.push_str(&format!("└{}┘", "─".repeat(content_width + 2)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn panel_frames_every_line() {
        let rendered = panel(Some("Entries"), "one\nlonger line");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Entries"));
        assert!(lines[1].starts_with("│ one"));
        assert!(lines[2].starts_with("│ longer line"));
        let widths: Vec<usize> = lines.iter().map(|l| measure_text_width(l)).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
