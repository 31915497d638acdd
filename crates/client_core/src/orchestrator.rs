//! Drives one analysis session: `Idle → Selected → Analyzing → Shown`, with resets back
//! to `Idle` from anywhere.

use std::sync::Arc;

use shared::{
    domain::{AnalysisPhase, AnalysisResult, FileCandidate, FileSelection, SessionId},
    error::{ErrorKind, SessionError},
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::{
    events::{Page, SessionEvent, SessionView},
    host::{HostLink, HostShell, OpenDialogOptions},
    presenter::{ExportOutcome, ResultPresenter},
    session::{SessionState, SharedSession},
    surface::SessionSurface,
    timing::PresentationPolicy,
    AnalysisBackend,
};

pub struct AnalysisOrchestrator {
    state: SharedSession,
    backend: Arc<dyn AnalysisBackend>,
    host: Arc<HostLink>,
    surface: Arc<SessionSurface>,
    presenter: ResultPresenter,
    policy: PresentationPolicy,
}

impl AnalysisOrchestrator {
    pub fn new(
        backend: Arc<dyn AnalysisBackend>,
        shell: Arc<dyn HostShell>,
        policy: PresentationPolicy,
    ) -> Self {
        let state = SessionState::shared();
        let host = Arc::new(HostLink::new(shell));
        let surface = Arc::new(SessionSurface::new());
        let presenter =
            ResultPresenter::new(state.clone(), backend.clone(), host.clone(), surface.clone());
        Self {
            state,
            backend,
            host,
            surface,
            presenter,
            policy,
        }
    }

    pub fn with_export_file_name(mut self, name: impl Into<String>) -> Self {
        self.presenter = self.presenter.with_export_file_name(name);
        self
    }

    /// Awaits the host shell once. Dialog-backed operations refuse to run until this
    /// has succeeded.
    pub async fn initialize(&self) -> bool {
        match self.host.initialize().await {
            Ok(()) => {
                info!("host shell ready");
                true
            }
            Err(err) => {
                error!("host shell initialization failed: {err:#}");
                self.surface.error(format!("Host shell unavailable: {err}"));
                false
            }
        }
    }

    pub fn is_host_ready(&self) -> bool {
        self.host.is_ready()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.surface.subscribe()
    }

    pub fn view(&self) -> SessionView {
        self.surface.snapshot()
    }

    pub async fn phase(&self) -> AnalysisPhase {
        self.state.lock().await.phase()
    }

    pub async fn session_id(&self) -> SessionId {
        self.state.lock().await.session_id()
    }

    pub async fn selection(&self) -> Option<FileSelection> {
        self.state.lock().await.selection().cloned()
    }

    pub async fn cached_batch_payload(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .last_batch_payload()
            .map(str::to_owned)
    }

    /// Opens the host's file dialog and selects the picked file. A dismissed dialog
    /// yields `Ok(None)`.
    pub async fn open_file(&self) -> Result<Option<FileSelection>, SessionError> {
        if !self.host.is_ready() {
            let err = SessionError::HostUnavailable("File dialog");
            self.report(&err);
            return Err(err);
        }

        let picked = match self
            .host
            .shell()
            .pick_file(&OpenDialogOptions::sequence_files())
            .await
        {
            Ok(picked) => picked,
            Err(e) => {
                let err = SessionError::OpenDialog(e.to_string());
                self.report(&err);
                return Err(err);
            }
        };
        let Some(path) = picked else {
            info!("file dialog dismissed without a selection");
            return Ok(None);
        };

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        self.select_file(FileCandidate::new(path.to_string_lossy(), name))
            .await
            .map(Some)
    }

    /// Drag-and-drop entry point. Hosts that cannot resolve a path deliver only a name.
    pub async fn drop_file(
        &self,
        name: &str,
        path: Option<&str>,
    ) -> Result<FileSelection, SessionError> {
        let path = path.filter(|path| !path.is_empty()).unwrap_or(name);
        info!(name, "file dropped");
        self.select_file(FileCandidate::new(path, name)).await
    }

    pub async fn select_file(
        &self,
        candidate: FileCandidate,
    ) -> Result<FileSelection, SessionError> {
        let outcome = self.try_select(candidate).await;
        if let Err(err) = &outcome {
            self.report(err);
        }
        outcome
    }

    async fn try_select(&self, candidate: FileCandidate) -> Result<FileSelection, SessionError> {
        let selection = FileSelection::from_candidate(candidate)?;
        self.ensure_selectable().await?;

        info!(path = selection.path(), "reading file preview");
        let prefix = self
            .backend
            .preview_read(selection.path())
            .await
            .map_err(|e| SessionError::PreviewRead(e.to_string()))?;

        {
            let mut state = self.state.lock().await;
            Self::check_selectable(&state)?;
            state.set_selection(selection.clone());
            state.clear_last_batch_payload();
            state.set_phase(AnalysisPhase::Selected);
        }

        self.surface.set_file_preview(Some(format!(
            "Selected: {} | First 2 chars: \"{}\"",
            selection.name(),
            prefix
        )));
        self.surface
            .success(format!("✓ File loaded: {}", selection.name()));
        self.surface.show_download_action(false);
        self.surface.show_analyze_action(true);
        info!(path = selection.path(), "file selected");
        Ok(selection)
    }

    async fn ensure_selectable(&self) -> Result<(), SessionError> {
        let state = self.state.lock().await;
        Self::check_selectable(&state)
    }

    /// Selection is open in `Idle` and `Selected` only; a shown result must be reset first.
    fn check_selectable(state: &SessionState) -> Result<(), SessionError> {
        match state.phase() {
            AnalysisPhase::Idle | AnalysisPhase::Selected => Ok(()),
            AnalysisPhase::Analyzing => Err(SessionError::AnalysisInFlight(state.session_id())),
            phase @ AnalysisPhase::Shown => Err(SessionError::SelectionLocked(phase)),
        }
    }

    /// Classifies the selected file and reveals the result once the presentation
    /// policy's minimum duration has passed. Backend failures come back as a single
    /// result carrying the error text.
    pub async fn start_analysis(&self) -> Result<AnalysisResult, SessionError> {
        let (session_id, selection) = {
            let mut state = self.state.lock().await;
            let phase = state.phase();
            if phase == AnalysisPhase::Analyzing {
                let err = SessionError::AnalysisInFlight(state.session_id());
                self.report(&err);
                return Err(err);
            }
            let Some(selection) = state.selection().cloned() else {
                let err = SessionError::NoFileSelected;
                self.report(&err);
                return Err(err);
            };
            if phase != AnalysisPhase::Selected {
                let err = SessionError::NotSelected(phase);
                self.report(&err);
                return Err(err);
            }
            state.clear_last_batch_payload();
            state.set_phase(AnalysisPhase::Analyzing);
            (state.session_id(), selection)
        };

        self.surface.show_download_action(false);
        self.surface.switch_page(Page::Analysis);
        self.surface.set_loading(true);

        info!(path = selection.path(), session = %session_id, "starting analysis");
        let raw = match self.backend.classify(selection.path()).await {
            Ok(payload) => payload,
            Err(err) => {
                error!(path = selection.path(), "analysis failed: {err:#}");
                format!("Error during analysis: {err:#}")
            }
        };

        if !self.state.lock().await.is_current(session_id) {
            return Err(self.superseded(session_id));
        }
        let presentation = self.presenter.present(&raw);

        self.policy.hold().await;

        {
            let mut state = self.state.lock().await;
            if !state.is_current(session_id) {
                return Err(self.superseded(session_id));
            }
            self.presenter.retain_for_export(&mut state, &presentation, &raw);
            state.set_phase(AnalysisPhase::Shown);
        }
        self.surface.show_result(presentation.view);
        info!(session = %session_id, batch = presentation.result.is_batch(), "analysis shown");
        Ok(presentation.result)
    }

    fn superseded(&self, session_id: SessionId) -> SessionError {
        info!(session = %session_id, "discarding result of a reset session");
        SessionError::Superseded(session_id)
    }

    pub async fn export_batch(&self) -> Result<ExportOutcome, SessionError> {
        self.presenter.export_batch().await
    }

    /// Back to the selection page with nothing selected or cached. Valid from any phase;
    /// an analysis still in flight is discarded when it settles.
    pub async fn reset(&self) {
        let previous = {
            let mut state = self.state.lock().await;
            let previous = state.session_id();
            state.reset();
            previous
        };
        self.surface.show_analyze_action(false);
        self.surface.show_download_action(false);
        self.surface.set_file_preview(None);
        self.surface.set_loading(false);
        self.surface.info("");
        self.surface.switch_page(Page::Selection);
        debug!(session = %previous, "session reset");
    }

    /// Duplicate dispatches are dropped silently; everything else lands on the status line.
    fn report(&self, err: &SessionError) {
        if let SessionError::AnalysisInFlight(session) = err {
            warn!(session = %session, "ignoring request while analysis is in flight");
            return;
        }
        match err.kind() {
            ErrorKind::Validation => warn!("{err}"),
            ErrorKind::Backend | ErrorKind::HostUnavailable => error!("{err}"),
        }
        self.surface.error(err.to_string());
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
