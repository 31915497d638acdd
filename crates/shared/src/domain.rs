use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::SessionError;

/// Extensions accepted for submission, compared against the lower-cased file name.
pub const ALLOWED_EXTENSIONS: [&str; 2] = [".fasta", ".csv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPhase {
    Idle,
    Selected,
    Analyzing,
    Shown,
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AnalysisPhase::Idle => "idle",
            AnalysisPhase::Selected => "selected",
            AnalysisPhase::Analyzing => "analyzing",
            AnalysisPhase::Shown => "shown",
        };
        f.write_str(label)
    }
}

/// A file offered by the host, either picked from a dialog or dropped on the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCandidate {
    pub path: String,
    pub name: String,
}

impl FileCandidate {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Lower-cased extension of `name`, including the leading period.
pub fn file_extension(name: &str) -> Option<String> {
    name.rfind('.').map(|idx| name[idx..].to_lowercase())
}

pub fn is_allowed_extension(name: &str) -> bool {
    file_extension(name)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// A validated file choice. Only constructible from a candidate with an allowed extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSelection {
    path: String,
    name: String,
}

impl FileSelection {
    pub fn from_candidate(candidate: FileCandidate) -> Result<Self, SessionError> {
        if !is_allowed_extension(&candidate.name) {
            return Err(SessionError::InvalidFileType {
                name: candidate.name,
            });
        }
        Ok(Self {
            path: candidate.path,
            name: candidate.name,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One row of a batch submission as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: String,
    pub sequence: String,
    pub classification: String,
}

impl BatchRecord {
    /// Lenient decode of one array element: missing fields become empty text and
    /// non-string scalars keep their JSON spelling.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| match value.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        };
        Self {
            id: field("id"),
            sequence: field("sequence"),
            classification: field("classification"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    Single { label: String },
    Batch { records: Vec<BatchRecord> },
}

impl AnalysisResult {
    /// Discriminates a raw backend payload. Anything that parses as a JSON array is a
    /// batch; everything else, including text that fails to parse, is a single label.
    ///
    /// A single label that happens to be valid array syntax (for example `[]`) is
    /// decoded as an empty batch. The backend contract carries no tag to tell the two
    /// apart, so the ambiguity is kept as-is.
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => AnalysisResult::Batch {
                records: items.iter().map(BatchRecord::from_value).collect(),
            },
            _ => AnalysisResult::Single {
                label: raw.to_string(),
            },
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, AnalysisResult::Batch { .. })
    }
}
