// Load error types
// Distinguishes unreadable files from malformed YAML and renders syntax errors with location

use std::fmt;

use thiserror::Error;

/// Failure to turn a file into a document tree
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Syntax(#[from] SyntaxError),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// YAML syntax error with location and an optional hint
#[derive(Debug, Clone)]
pub struct SyntaxError {
    /// Parser message
    pub message: String,
    /// Line number (1-indexed), 0 when the parser gave no location
    pub line: usize,
    /// Column number (1-indexed), 0 when the parser gave no location
    pub column: usize,
    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            suggestion: None,
        }
    }

    fn with_suggestion_opt(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }

    /// Create from a serde_yaml error, using the source to look for common mistakes
    pub fn from_yaml_error(err: &serde_yaml::Error, source: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((0, 0));

        let message = strip_location_suffix(&err.to_string());
        let suggestion = suggest_yaml_fix(source, line);

        SyntaxError::new(message, line, column).with_suggestion_opt(suggestion)
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if self.line > 0 {
            write!(f, " (line {}, column {})", self.line, self.column)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "; help: {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

/// serde_yaml embeds "at line X column Y" in its messages, sometimes twice
/// (problem and context); the location is reported separately.
fn strip_location_suffix(msg: &str) -> String {
    const MARKER: &str = " at line ";

    let mut out = String::with_capacity(msg.len());
    let mut rest = msg;
    while let Some(idx) = rest.find(MARKER) {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx + MARKER.len()..];
        rest = skip_line_column(tail).unwrap_or_else(|| {
            out.push_str(MARKER);
            tail
        });
    }
    out.push_str(rest);
    out
}

/// Consume "N column M" from the start of `s`, returning what follows
fn skip_line_column(s: &str) -> Option<&str> {
    let s = skip_digits(s)?;
    let s = s.strip_prefix(" column ")?;
    skip_digits(s)
}

fn skip_digits(s: &str) -> Option<&str> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    (end > 0).then(|| &s[end..])
}

fn suggest_yaml_fix(source: &str, line: usize) -> Option<String> {
    if line == 0 {
        return None;
    }

    // The scanner may report the line before or after the offending tab.
    let first = line.saturating_sub(2);
    let tab_indented = source
        .lines()
        .skip(first)
        .take(line + 1 - first)
        .any(|l| l.starts_with('\t'));

    if tab_indented {
        return Some("YAML does not allow tabs for indentation. Replace tabs with spaces.".to_string());
    }

    None
}
