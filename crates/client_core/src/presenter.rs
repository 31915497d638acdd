//! Result shape discrimination, rendering and export of batch results.

use std::{path::PathBuf, sync::Arc};

use shared::{
    domain::{AnalysisPhase, AnalysisResult, BatchRecord},
    error::SessionError,
};

use tracing::{debug, info, warn};

use crate::{
    events::{BatchRow, Presentation, ResultView},
    host::{HostLink, SaveDialogOptions},
    session::{SessionState, SharedSession},
    surface::SessionSurface,
    AnalysisBackend,
};

/// Characters of a sequence shown in a batch row before truncation.
pub const SEQUENCE_PREVIEW_LIMIT: usize = 100;
pub const ELLIPSIS: &str = "...";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "nat2_analysis_results.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    Cancelled,
}

pub struct ResultPresenter {
    state: SharedSession,
    backend: Arc<dyn AnalysisBackend>,
    host: Arc<HostLink>,
    surface: Arc<SessionSurface>,
    export_file_name: String,
}

impl ResultPresenter {
    pub fn new(
        state: SharedSession,
        backend: Arc<dyn AnalysisBackend>,
        host: Arc<HostLink>,
        surface: Arc<SessionSurface>,
    ) -> Self {
        Self {
            state,
            backend,
            host,
            surface,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }

    pub fn with_export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = name.into();
        self
    }

    /// Decodes `raw` and renders it without touching the session.
    pub fn present(&self, raw: &str) -> Presentation {
        let result = AnalysisResult::decode(raw);
        let view = match &result {
            AnalysisResult::Batch { records } => ResultView::Batch {
                rows: self.render_batch(records),
            },
            AnalysisResult::Single { label } => ResultView::Single {
                label: label.clone(),
            },
        };
        debug!(batch = result.is_batch(), "presented analysis payload");
        Presentation { result, view }
    }

    /// Keeps the untouched payload of a batch for export; any other result clears it.
    /// Called under the session lock at the moment the result is revealed.
    pub fn retain_for_export(
        &self,
        state: &mut SessionState,
        presentation: &Presentation,
        raw: &str,
    ) {
        if presentation.result.is_batch() {
            state.set_last_batch_payload(raw);
        } else {
            state.clear_last_batch_payload();
        }
    }

    pub fn render_batch(&self, records: &[BatchRecord]) -> Vec<BatchRow> {
        records
            .iter()
            .map(|record| BatchRow {
                id: record.id.clone(),
                sequence_preview: sequence_preview(&record.sequence),
                full_sequence: record.sequence.clone(),
                classification: record.classification.clone(),
            })
            .collect()
    }

    /// Transforms the cached batch payload, asks the host where to save it and persists
    /// it there. Only a revealed batch can be exported. Failures only touch the status
    /// line, never the session.
    pub async fn export_batch(&self) -> Result<ExportOutcome, SessionError> {
        let outcome = self.run_export().await;
        match &outcome {
            Ok(ExportOutcome::Saved(path)) => {
                info!(path = %path.display(), "exported batch results");
                self.surface.success("CSV results saved successfully");
            }
            Ok(ExportOutcome::Cancelled) => {
                info!("export cancelled at save prompt");
                self.surface.info("Save cancelled");
            }
            Err(err) => {
                warn!("export failed: {err}");
                self.surface.error(err.to_string());
            }
        }
        outcome
    }

    async fn run_export(&self) -> Result<ExportOutcome, SessionError> {
        let payload = {
            let state = self.state.lock().await;
            if state.phase() != AnalysisPhase::Shown {
                return Err(SessionError::NoBatchCached);
            }
            state.last_batch_payload().map(str::to_owned)
        };
        let Some(payload) = payload else {
            return Err(SessionError::NoBatchCached);
        };

        let content = self
            .backend
            .export_transform(&payload)
            .await
            .map_err(|e| SessionError::Export(e.to_string()))?;

        if !self.host.is_ready() {
            return Err(SessionError::HostUnavailable("Save dialog"));
        }
        let options = SaveDialogOptions::csv(&self.export_file_name);
        let destination = self
            .host
            .shell()
            .pick_save_destination(&options)
            .await
            .map_err(|e| SessionError::Export(e.to_string()))?;
        let Some(destination) = destination else {
            return Ok(ExportOutcome::Cancelled);
        };

        self.backend
            .persist(&destination.to_string_lossy(), &content)
            .await
            .map_err(|e| SessionError::Export(e.to_string()))?;
        Ok(ExportOutcome::Saved(destination))
    }
}

fn sequence_preview(sequence: &str) -> String {
    if sequence.chars().count() > SEQUENCE_PREVIEW_LIMIT {
        let head: String = sequence.chars().take(SEQUENCE_PREVIEW_LIMIT).collect();
        format!("{head}{ELLIPSIS}")
    } else {
        sequence.to_string()
    }
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
