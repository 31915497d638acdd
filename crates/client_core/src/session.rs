//! Session-scoped state shared by the orchestrator and the result presenter.

use std::sync::Arc;

use shared::domain::{AnalysisPhase, FileSelection, SessionId};
use tokio::sync::Mutex;

pub type SharedSession = Arc<Mutex<SessionState>>;

#[derive(Debug, Clone)]
pub struct SessionState {
    session_id: SessionId,
    phase: AnalysisPhase,
    selection: Option<FileSelection>,
    last_batch_payload: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session_id: SessionId::new(),
            phase: AnalysisPhase::Idle,
            selection: None,
            last_batch_payload: None,
        }
    }

    pub fn shared() -> SharedSession {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn is_current(&self, session_id: SessionId) -> bool {
        self.session_id == session_id
    }

    pub fn phase(&self) -> AnalysisPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: AnalysisPhase) {
        self.phase = phase;
    }

    pub fn selection(&self) -> Option<&FileSelection> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: FileSelection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn last_batch_payload(&self) -> Option<&str> {
        self.last_batch_payload.as_deref()
    }

    pub fn set_last_batch_payload(&mut self, raw: impl Into<String>) {
        self.last_batch_payload = Some(raw.into());
    }

    pub fn clear_last_batch_payload(&mut self) {
        self.last_batch_payload = None;
    }

    /// Returns to `Idle` under a fresh session id so late results from the previous
    /// session can be told apart.
    pub fn reset(&mut self) {
        self.session_id = SessionId::new();
        self.phase = AnalysisPhase::Idle;
        self.selection = None;
        self.last_batch_payload = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::FileCandidate;

    fn selection() -> FileSelection {
        FileSelection::from_candidate(FileCandidate::new("/data/samples.csv", "samples.csv"))
            .expect("valid selection")
    }

    #[test]
    fn reset_twice_leaves_idle_and_empty() {
        let mut state = SessionState::new();
        state.set_selection(selection());
        state.set_last_batch_payload("[]");
        state.set_phase(AnalysisPhase::Shown);

        state.reset();
        let first = state.session_id();
        state.reset();

        assert_eq!(state.phase(), AnalysisPhase::Idle);
        assert!(state.selection().is_none());
        assert!(state.last_batch_payload().is_none());
        assert!(!state.is_current(first));
    }
}
