// Workflow Validator Library
// Syntax and minimal-structure checks for GitHub Actions style workflow files

pub mod document;
pub mod error;
pub mod issue;
pub mod report;
pub mod rules;
pub mod validator;

pub use document::{Document, NodeKind};
pub use error::{LoadError, LoadResult, SyntaxError};
pub use issue::{Issue, Severity};
pub use report::{Report, RunSummary, SummaryFormat, SummaryRenderer};
pub use rules::{check_document, StructureOutcome, RULES};
pub use validator::{
    has_workflow_extension, CheckPassed, ValidationObserver, Validator, ValidatorOptions,
    WORKFLOW_EXTENSIONS,
};
