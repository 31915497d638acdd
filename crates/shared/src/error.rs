use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{AnalysisPhase, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Backend,
    HostUnavailable,
}

/// Failures surfaced by the analysis session. The display text is what the status
/// line shows to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("✗ Invalid file type. Only .fasta and .csv files are allowed.")]
    InvalidFileType { name: String },
    #[error("No file selected")]
    NoFileSelected,
    #[error("Analysis cannot start while {0}")]
    NotSelected(AnalysisPhase),
    #[error("Reset the session before selecting another file")]
    SelectionLocked(AnalysisPhase),
    #[error("Analysis already running for session {0}")]
    AnalysisInFlight(SessionId),
    #[error("Session {0} was reset before its analysis settled")]
    Superseded(SessionId),
    #[error("No CSV data available for download")]
    NoBatchCached,
    #[error("✗ Error reading file: {0}")]
    PreviewRead(String),
    #[error("Error opening file: {0}")]
    OpenDialog(String),
    #[error("Save failed: {0}")]
    Export(String),
    #[error("{0} not available")]
    HostUnavailable(&'static str),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::InvalidFileType { .. }
            | SessionError::NoFileSelected
            | SessionError::NotSelected(_)
            | SessionError::SelectionLocked(_)
            | SessionError::AnalysisInFlight(_)
            | SessionError::Superseded(_)
            | SessionError::NoBatchCached => ErrorKind::Validation,
            SessionError::PreviewRead(_)
            | SessionError::OpenDialog(_)
            | SessionError::Export(_) => ErrorKind::Backend,
            SessionError::HostUnavailable(_) => ErrorKind::HostUnavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_matches_user_facing_wording() {
        assert_eq!(
            SessionError::HostUnavailable("Save dialog").to_string(),
            "Save dialog not available"
        );
        assert_eq!(
            SessionError::PreviewRead("permission denied".into()).to_string(),
            "✗ Error reading file: permission denied"
        );
        assert_eq!(SessionError::NoBatchCached.kind(), ErrorKind::Validation);
        assert_eq!(
            SessionError::SelectionLocked(AnalysisPhase::Shown).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            SessionError::Export("disk full".into()).kind(),
            ErrorKind::Backend
        );
    }
}
