// Workflow Document Tree
// Loosely-typed view of a decoded workflow file with non-failing accessors

use serde_yaml::Value;

use std::fmt;

/// A decoded workflow document.
///
/// Mappings keep their source order so jobs are visited the way they were
/// written. Every accessor returns `None`/`false` on a shape mismatch instead
/// of failing, which is what the structural rules rely on when probing for
/// required and optional keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Mapping(Vec<(String, Document)>),
    Sequence(Vec<Document>),
    Scalar(String),
    Null,
}

/// Shape of a document node, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Mapping,
    Sequence,
    Scalar,
    Null,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Mapping => write!(f, "mapping"),
            NodeKind::Sequence => write!(f, "sequence"),
            NodeKind::Scalar => write!(f, "scalar"),
            NodeKind::Null => write!(f, "null"),
        }
    }
}

impl Document {
    /// Decode a YAML string into a document tree.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        let value: Value = serde_yaml::from_str(content)?;
        Ok(Self::from(value))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Document::Mapping(_) => NodeKind::Mapping,
            Document::Sequence(_) => NodeKind::Sequence,
            Document::Scalar(_) => NodeKind::Scalar,
            Document::Null => NodeKind::Null,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Document::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Document::Sequence(_))
    }

    pub fn as_mapping(&self) -> Option<&[(String, Document)]> {
        match self {
            Document::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Document]> {
        match self {
            Document::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Document::Scalar(text) => Some(text),
            _ => None,
        }
    }

    /// Look up a key in a mapping node. Non-mappings have no keys.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Whether a mapping node carries `key`, even when its value is null.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Scalar(b.to_string()),
            Value::Number(n) => Document::Scalar(n.to_string()),
            Value::String(s) => Document::Scalar(s),
            Value::Sequence(items) => {
                Document::Sequence(items.into_iter().map(Document::from).collect())
            }
            Value::Mapping(mapping) => Document::Mapping(
                mapping
                    .into_iter()
                    .map(|(k, v)| (key_text(k), Document::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Document::from(tagged.value),
        }
    }
}

/// Render a mapping key as text. Keys are normally strings, but YAML allows
/// any node as a key.
fn key_text(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        Value::Tagged(tagged) => key_text(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
