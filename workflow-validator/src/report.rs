// Validation Report
// Accumulates errors and warnings across files and renders the run summary

use crate::issue::Issue;

use serde::Serialize;

use std::fmt;
use std::path::Path;

const RULE_WIDTH: usize = 70;

/// Ordered collection of everything found during a run.
///
/// A report is threaded through every check by `&mut` and can be merged, so a
/// caller may validate files into separate reports and combine them later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, path: &Path, message: impl Into<String>) {
        self.errors.push(Issue::error(path, message));
    }

    pub fn warning(&mut self, path: &Path, message: impl Into<String>) {
        self.warnings.push(Issue::warning(path, message));
    }

    /// Append another report's issues after this one's
    pub fn merge(&mut self, other: Report) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Result of validating a set of input paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Conjunction of the per-path verdicts
    pub all_valid: bool,
    pub report: Report,
}

impl RunSummary {
    /// Process exit code: 0 when every path validated and no error was recorded
    pub fn exit_code(&self) -> i32 {
        if self.all_valid && !self.report.has_errors() {
            0
        } else {
            1
        }
    }
}

/// Output format for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    /// Human-readable terminal output
    #[default]
    Terminal,
    /// Machine-readable JSON
    Json,
}

impl fmt::Display for SummaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryFormat::Terminal => write!(f, "terminal"),
            SummaryFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for SummaryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" | "text" | "console" => Ok(SummaryFormat::Terminal),
            "json" => Ok(SummaryFormat::Json),
            _ => Err(format!(
                "Unknown summary format '{}'. Valid formats: terminal, json",
                s
            )),
        }
    }
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    valid: bool,
    errors: &'a [Issue],
    warnings: &'a [Issue],
}

/// Renders a [`RunSummary`] in one of the supported formats
pub struct SummaryRenderer;

impl SummaryRenderer {
    pub fn render(summary: &RunSummary, format: SummaryFormat) -> String {
        match format {
            SummaryFormat::Terminal => Self::to_terminal(&summary.report),
            SummaryFormat::Json => Self::to_json(summary),
        }
    }

    /// Warnings first, then errors, or a single success line
    pub fn to_terminal(report: &Report) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        out.push('\n');
        out.push_str(&rule);
        out.push_str("\nValidation Summary\n");
        out.push_str(&rule);
        out.push('\n');

        if report.has_warnings() {
            out.push_str(&format!(
                "\n\u{26a0} Warnings ({}):\n",
                report.warnings.len()
            ));
            for warning in &report.warnings {
                out.push_str(&format!("  {}\n", warning));
            }
        }

        if report.has_errors() {
            out.push_str(&format!("\n\u{2717} Errors ({}):\n", report.errors.len()));
            for error in &report.errors {
                out.push_str(&format!("  {}\n", error));
            }
        } else {
            out.push_str("\n\u{2713} All validations passed!\n");
        }

        out.push_str(&rule);
        out.push('\n');
        out
    }

    pub fn to_json(summary: &RunSummary) -> String {
        let body = JsonSummary {
            valid: summary.exit_code() == 0,
            errors: &summary.report.errors,
            warnings: &summary.report.warnings,
        };
        // Issues hold only strings and paths, serialization cannot fail
        serde_json::to_string_pretty(&body).unwrap_or_default()
    }
}
