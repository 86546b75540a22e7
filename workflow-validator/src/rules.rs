// Structural rules
// Ordered, fail-fast shape checks over a decoded workflow document

use crate::document::Document;

use tracing::debug;

/// What a rule decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Fail(String),
}

/// A named structural check.
///
/// Rules may push advisory warnings and then continue; a `Fail` stops
/// evaluation of every later rule.
pub struct Rule {
    pub name: &'static str,
    check: fn(&Document, &mut Vec<String>) -> Flow,
}

impl Rule {
    pub fn apply(&self, doc: &Document, warnings: &mut Vec<String>) -> Flow {
        (self.check)(doc, warnings)
    }
}

/// Rules in evaluation order
pub const RULES: &[Rule] = &[
    Rule {
        name: "document-is-mapping",
        check: document_is_mapping,
    },
    Rule {
        name: "name-present",
        check: name_present,
    },
    Rule {
        name: "on-present",
        check: on_present,
    },
    Rule {
        name: "jobs-present",
        check: jobs_present,
    },
    Rule {
        name: "jobs-is-mapping",
        check: jobs_is_mapping,
    },
    Rule {
        name: "jobs-not-empty",
        check: jobs_not_empty,
    },
    Rule {
        name: "jobs-well-formed",
        check: jobs_well_formed,
    },
];

/// Outcome of running [`RULES`] over one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureOutcome {
    /// Name of the rule that failed, if any
    pub failed_rule: Option<&'static str>,
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

impl StructureOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Check a document against the minimal workflow shape.
///
/// Pure: no I/O, no logging beyond tracing. Warnings collected before a
/// failure are kept.
pub fn check_document(doc: &Document) -> StructureOutcome {
    let mut outcome = StructureOutcome::default();

    for rule in RULES {
        if let Flow::Fail(message) = rule.apply(doc, &mut outcome.warnings) {
            debug!(rule = rule.name, %message, "structural rule failed");
            outcome.failed_rule = Some(rule.name);
            outcome.error = Some(message);
            break;
        }
    }

    outcome
}

fn document_is_mapping(doc: &Document, _: &mut Vec<String>) -> Flow {
    if doc.is_mapping() {
        Flow::Continue
    } else {
        Flow::Fail("Workflow must be a YAML mapping".to_string())
    }
}

fn name_present(doc: &Document, warnings: &mut Vec<String>) -> Flow {
    if !doc.contains_key("name") {
        warnings.push("Missing 'name' field (recommended)".to_string());
    }
    Flow::Continue
}

fn on_present(doc: &Document, _: &mut Vec<String>) -> Flow {
    require_key(doc, "on")
}

fn jobs_present(doc: &Document, _: &mut Vec<String>) -> Flow {
    require_key(doc, "jobs")
}

fn require_key(doc: &Document, key: &str) -> Flow {
    if doc.contains_key(key) {
        Flow::Continue
    } else {
        Flow::Fail(format!("Missing required '{}' field", key))
    }
}

fn jobs_is_mapping(doc: &Document, _: &mut Vec<String>) -> Flow {
    match doc.get("jobs") {
        Some(jobs) if jobs.is_mapping() => Flow::Continue,
        _ => Flow::Fail("'jobs' must be a mapping".to_string()),
    }
}

fn jobs_not_empty(doc: &Document, _: &mut Vec<String>) -> Flow {
    match doc.get("jobs").and_then(Document::as_mapping) {
        Some(jobs) if !jobs.is_empty() => Flow::Continue,
        _ => Flow::Fail("'jobs' must contain at least one job".to_string()),
    }
}

// Stops at the first malformed job; later jobs are not inspected.
fn jobs_well_formed(doc: &Document, warnings: &mut Vec<String>) -> Flow {
    let Some(jobs) = doc.get("jobs").and_then(Document::as_mapping) else {
        return Flow::Fail("'jobs' must be a mapping".to_string());
    };

    for (job_id, job) in jobs {
        if !job.is_mapping() {
            return Flow::Fail(format!("Job '{}' must be a mapping", job_id));
        }

        if !job.contains_key("runs-on") {
            return Flow::Fail(format!(
                "Job '{}' missing required 'runs-on' field",
                job_id
            ));
        }

        let Some(steps) = job.get("steps") else {
            return Flow::Fail(format!("Job '{}' missing required 'steps' field", job_id));
        };

        match steps.as_sequence() {
            Some(items) if items.is_empty() => {
                warnings.push(format!("Job '{}' has no steps", job_id));
            }
            Some(_) => {}
            None => {
                debug!(job = %job_id, found = %steps.kind(), "steps is not a sequence");
                return Flow::Fail(format!("Job '{}' 'steps' must be a list", job_id));
            }
        }
    }

    Flow::Continue
}
