// Workflow Validator
// Per-file syntax and structure checks plus file/directory traversal

use crate::document::Document;
use crate::error::{LoadResult, SyntaxError};
use crate::report::{Report, RunSummary};
use crate::rules;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

/// File extensions recognised as workflow files
pub const WORKFLOW_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// A check that succeeded for a file, reported to observers in verbose mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckPassed {
    Syntax,
    Structure,
}

impl CheckPassed {
    pub fn message(&self) -> &'static str {
        match self {
            CheckPassed::Syntax => "Valid YAML syntax",
            CheckPassed::Structure => "Valid workflow structure",
        }
    }
}

/// Receives progress notifications while files are validated.
///
/// Only called when the validator runs in verbose mode.
pub trait ValidationObserver {
    fn file_started(&self, _path: &Path) {}

    fn check_passed(&self, _path: &Path, _check: CheckPassed) {}
}

/// Options fixed for the lifetime of a validator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Notify the observer about every successful check
    pub verbose: bool,
    /// Descend into subdirectories when validating a directory
    pub recursive: bool,
}

impl ValidatorOptions {
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Validates workflow files and directories.
///
/// The validator holds no findings of its own: every check records into the
/// [`Report`] it is handed and returns a plain verdict. No check returns an
/// error or panics on bad input.
#[derive(Default)]
pub struct Validator {
    options: ValidatorOptions,
    observer: Option<Box<dyn ValidationObserver>>,
}

impl Validator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self {
            options,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: impl ValidationObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    fn notify_started(&self, path: &Path) {
        if let (true, Some(observer)) = (self.options.verbose, &self.observer) {
            observer.file_started(path);
        }
    }

    fn notify_passed(&self, path: &Path, check: CheckPassed) {
        if let (true, Some(observer)) = (self.options.verbose, &self.observer) {
            observer.check_passed(path, check);
        }
    }

    /// Check that a file can be read and decoded as YAML.
    pub fn check_syntax(&self, path: &Path, report: &mut Report) -> bool {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                report.error(path, format!("Error reading file: {}", e));
                return false;
            }
        };

        if let Err(e) = Document::from_yaml_str(&content) {
            let syntax = SyntaxError::from_yaml_error(&e, &content);
            report.error(path, format!("YAML syntax error: {}", syntax));
            return false;
        }

        self.notify_passed(path, CheckPassed::Syntax);
        true
    }

    /// Check that a file has the minimal workflow shape.
    ///
    /// Re-reads the file rather than reusing the tree from [`check_syntax`],
    /// so the check stands on its own.
    ///
    /// [`check_syntax`]: Validator::check_syntax
    pub fn check_structure(&self, path: &Path, report: &mut Report) -> bool {
        let doc = match load_document(path) {
            Ok(doc) => doc,
            Err(e) => {
                report.error(path, format!("Error validating structure: {}", e));
                return false;
            }
        };

        let outcome = rules::check_document(&doc);
        for warning in outcome.warnings {
            report.warning(path, warning);
        }

        if let Some(error) = outcome.error {
            report.error(path, error);
            return false;
        }

        self.notify_passed(path, CheckPassed::Structure);
        true
    }

    /// Validate a single workflow file: existence, extension, syntax, structure.
    pub fn validate_file(&self, path: &Path, report: &mut Report) -> bool {
        self.notify_started(path);
        debug!(path = %path.display(), "validating file");

        if !path.is_file() {
            report.error(path, "File does not exist");
            return false;
        }

        if !has_workflow_extension(path) {
            report.warning(path, "File extension should be .yml or .yaml");
        }

        self.check_syntax(path, report) && self.check_structure(path, report)
    }

    /// Validate every workflow file in a directory, in lexicographic order.
    ///
    /// An empty directory is only a warning.
    pub fn validate_directory(&self, path: &Path, report: &mut Report) -> bool {
        if !path.is_dir() {
            report.error(path, "Not a directory");
            return false;
        }

        let files = match collect_workflow_files(path, self.options.recursive) {
            Ok(files) => files,
            Err(e) => {
                report.error(path, format!("Error reading directory: {}", e));
                return false;
            }
        };

        if files.is_empty() {
            report.warning(path, "No workflow files found");
            return true;
        }

        debug!(path = %path.display(), count = files.len(), "validating directory");

        let mut all_valid = true;
        for file in &files {
            if !self.validate_file(file, report) {
                all_valid = false;
            }
        }
        all_valid
    }

    /// Dispatch on what the path refers to.
    pub fn validate_path(&self, path: &Path, report: &mut Report) -> bool {
        if path.is_file() {
            self.validate_file(path, report)
        } else if path.is_dir() {
            self.validate_directory(path, report)
        } else {
            report.error(path, "Not found");
            false
        }
    }

    /// Validate every input path; a failing path never stops the others.
    pub fn validate_paths<P: AsRef<Path>>(&self, paths: &[P]) -> RunSummary {
        let mut summary = RunSummary {
            all_valid: true,
            report: Report::new(),
        };

        for path in paths {
            let mut report = Report::new();
            if !self.validate_path(path.as_ref(), &mut report) {
                summary.all_valid = false;
            }
            summary.report.merge(report);
        }

        summary
    }
}

fn load_document(path: &Path) -> LoadResult<Document> {
    let content = fs::read_to_string(path)?;
    let doc = Document::from_yaml_str(&content)
        .map_err(|e| SyntaxError::from_yaml_error(&e, &content))?;
    Ok(doc)
}

/// Whether the path ends in `.yml` or `.yaml`, ignoring case
pub fn has_workflow_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            WORKFLOW_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Collect workflow files under `dir`, sorted by path.
///
/// The recursive walk does not follow directory symlinks.
fn collect_workflow_files(dir: &Path, recursive: bool) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if recursive {
        for entry in WalkDir::new(dir).min_depth(1) {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }
            let path = entry.into_path();
            if path.is_file() && has_workflow_extension(&path) {
                trace!(path = %path.display(), "found workflow file");
                files.push(path);
            }
        }
    } else {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_workflow_extension(&path) {
                trace!(path = %path.display(), "found workflow file");
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    const VALID_NO_NAME: &str = r#"on: push
jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - run: "echo hi"
"#;

    const VALID: &str = r#"name: CI
on: [push, pull_request]
jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - run: cargo test
"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn messages(issues: &[crate::Issue]) -> Vec<String> {
        issues.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_valid_file_without_name() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), "ci.yml", VALID_NO_NAME);

        let mut report = Report::new();
        assert!(Validator::default().validate_file(&path, &mut report));
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].message.contains("'name'"));
    }

    #[test]
    fn test_empty_jobs_gives_exactly_one_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), "ci.yml", "name: X\non: push\njobs: {}\n");

        let mut report = Report::new();
        assert!(!Validator::default().validate_file(&path, &mut report));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors[0].message,
            "'jobs' must contain at least one job"
        );
    }

    #[test]
    fn test_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing.yml");

        let mut report = Report::new();
        assert!(!Validator::default().validate_file(&path, &mut report));
        assert_eq!(report.errors[0].message, "File does not exist");
    }

    #[test]
    fn test_unusual_extension_warns_but_validates() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), "ci.txt", VALID);

        let mut report = Report::new();
        assert!(Validator::default().validate_file(&path, &mut report));
        assert_eq!(
            report.warnings[0].message,
            "File extension should be .yml or .yaml"
        );
    }

    #[test]
    fn test_uppercase_extension_is_recognised() {
        assert!(has_workflow_extension(Path::new("CI.YML")));
        assert!(has_workflow_extension(Path::new("ci.Yaml")));
        assert!(!has_workflow_extension(Path::new("ci.json")));
        assert!(!has_workflow_extension(Path::new("yml")));
    }

    #[test]
    fn test_syntax_error_short_circuits_structure() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), "bad.yml", "on: push\njobs: [unclosed\n");

        let mut report = Report::new();
        assert!(!Validator::default().validate_file(&path, &mut report));
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.starts_with("YAML syntax error:"));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_check_structure_reports_decode_failure() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), "bad.yml", "key: [oops\n");

        let mut report = Report::new();
        assert!(!Validator::default().check_structure(&path, &mut report));
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0]
            .message
            .starts_with("Error validating structure:"));
    }

    #[test]
    fn test_check_syntax_unreadable_path() {
        let temp = tempfile::tempdir().unwrap();

        let mut report = Report::new();
        // A directory cannot be read as a file
        assert!(!Validator::default().check_syntax(temp.path(), &mut report));
        assert!(report.errors[0].message.starts_with("Error reading file:"));
    }

    #[test]
    fn test_steps_not_a_list_fails() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(
            temp.path(),
            "ci.yml",
            "name: X\non: push\njobs:\n  build:\n    runs-on: ubuntu-latest\n    steps:\n      run: make\n",
        );

        let mut report = Report::new();
        assert!(!Validator::default().validate_file(&path, &mut report));
        assert_eq!(report.errors[0].message, "Job 'build' 'steps' must be a list");
    }

    #[test]
    fn test_validate_file_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), "ci.yml", "name: X\n");
        let validator = Validator::default();

        let mut first = Report::new();
        let mut second = Report::new();
        let a = validator.validate_file(&path, &mut first);
        let b = validator.validate_file(&path, &mut second);

        assert_eq!(a, b);
        assert_eq!(first, second);
    }

    #[test]
    fn test_directory_is_validated_in_lexicographic_order() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "b.yml", VALID);
        write(temp.path(), "a.yaml", "name: broken\n");

        let seen = Rc::new(RefCell::new(Vec::new()));
        let validator = Validator::new(ValidatorOptions::default().with_verbose(true))
            .with_observer(Recorder(seen.clone()));

        let mut report = Report::new();
        assert!(!validator.validate_directory(temp.path(), &mut report));
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].path.ends_with("a.yaml"));

        let order: Vec<String> = seen
            .borrow()
            .iter()
            .filter(|(_, check)| check.is_none())
            .map(|(p, _)| p.clone())
            .collect();
        assert_eq!(order, vec!["a.yaml", "b.yml"]);
    }

    #[test]
    fn test_empty_directory_is_a_warning() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "README.md", "# not a workflow");

        let mut report = Report::new();
        assert!(Validator::default().validate_directory(temp.path(), &mut report));
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].message, "No workflow files found");
    }

    #[test]
    fn test_directory_on_a_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), "ci.yml", VALID);

        let mut report = Report::new();
        assert!(!Validator::default().validate_directory(&path, &mut report));
        assert_eq!(report.errors[0].message, "Not a directory");
    }

    #[test]
    fn test_subdirectories_only_walked_when_recursive() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("nested");
        fs::create_dir(&nested).unwrap();
        write(&nested, "bad.yml", "name: broken\n");
        write(temp.path(), "ok.yml", VALID);

        let mut flat = Report::new();
        assert!(Validator::default().validate_directory(temp.path(), &mut flat));
        assert!(flat.errors.is_empty());

        let recursive = Validator::new(ValidatorOptions::default().with_recursive(true));
        let mut deep = Report::new();
        assert!(!recursive.validate_directory(temp.path(), &mut deep));
        assert_eq!(deep.errors.len(), 1);
        assert!(deep.errors[0].path.ends_with("nested/bad.yml"));
    }

    #[cfg(unix)]
    #[test]
    fn test_recursive_walk_ignores_symlink_cycles() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "ok.yml", VALID_NO_NAME);
        std::os::unix::fs::symlink(temp.path(), temp.path().join("loop")).unwrap();

        let validator = Validator::new(ValidatorOptions::default().with_recursive(true));
        let mut report = Report::new();
        assert!(validator.validate_directory(temp.path(), &mut report));
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].path.ends_with("ok.yml"));
    }

    #[test]
    fn test_validate_paths_attempts_every_path() {
        let temp = tempfile::tempdir().unwrap();
        let good = write(temp.path(), "good.yml", VALID);
        let missing = temp.path().join("nope");

        let summary = Validator::default().validate_paths(&[missing.clone(), good]);
        assert!(!summary.all_valid);
        assert_eq!(summary.exit_code(), 1);
        assert_eq!(
            messages(&summary.report.errors),
            vec![format!("\u{2717} {}: Not found", missing.display())]
        );
    }

    #[test]
    fn test_observer_silent_without_verbose() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), "ci.yml", VALID);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let validator = Validator::default().with_observer(Recorder(seen.clone()));
        assert!(validator.validate_file(&path, &mut Report::new()));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_observer_sees_both_confirmations() {
        let temp = tempfile::tempdir().unwrap();
        let path = write(temp.path(), "ci.yml", VALID);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let validator = Validator::new(ValidatorOptions::default().with_verbose(true))
            .with_observer(Recorder(seen.clone()));
        assert!(validator.validate_file(&path, &mut Report::new()));

        let checks: Vec<CheckPassed> = seen.borrow().iter().filter_map(|(_, c)| *c).collect();
        assert_eq!(checks, vec![CheckPassed::Syntax, CheckPassed::Structure]);
    }

    /// Records (file name, check) pairs; `None` marks a file start
    struct Recorder(Rc<RefCell<Vec<(String, Option<CheckPassed>)>>>);

    impl Recorder {
        fn name(path: &Path) -> String {
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        }
    }

    impl ValidationObserver for Recorder {
        fn file_started(&self, path: &Path) {
            self.0.borrow_mut().push((Self::name(path), None));
        }

        fn check_passed(&self, path: &Path, check: CheckPassed) {
            self.0.borrow_mut().push((Self::name(path), Some(check)));
        }
    }
}
