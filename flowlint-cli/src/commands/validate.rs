use crate::output;

use std::path::{Path, PathBuf};

use clap::Args;
use color_eyre::Result;

use workflow_validator::{
    CheckPassed, SummaryFormat, SummaryRenderer, ValidationObserver, Validator, ValidatorOptions,
};

/// Validate workflow files
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Workflow file(s) or directories to validate
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Print a line for every check that passes
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Descend into subdirectories
    #[arg(long, short = 'r')]
    pub recursive: bool,

    /// Summary format: terminal, json
    #[arg(long, default_value = "terminal")]
    pub format: String,
}

/// Prints verbose progress as files are checked
struct TerminalProgress;

impl ValidationObserver for TerminalProgress {
    fn file_started(&self, path: &Path) {
        output::status("Validating", &format!("{}...", path.display()));
    }

    fn check_passed(&self, path: &Path, check: CheckPassed) {
        output::check(&format!("{}: {}", path.display(), check.message()));
    }
}

/// Validate every path and return the process exit code
pub fn execute(args: ValidateArgs) -> Result<i32> {
    let format: SummaryFormat = args
        .format
        .parse()
        .map_err(|e: String| color_eyre::eyre::eyre!("{}", e))?;

    let options = ValidatorOptions::default()
        .with_verbose(args.verbose)
        .with_recursive(args.recursive);
    let validator = Validator::new(options).with_observer(TerminalProgress);

    let summary = validator.validate_paths(&args.paths);
    tracing::debug!(
        errors = summary.report.errors.len(),
        warnings = summary.report.warnings.len(),
        "validation finished"
    );

    print!("{}", SummaryRenderer::render(&summary, format));

    Ok(summary.exit_code())
}
