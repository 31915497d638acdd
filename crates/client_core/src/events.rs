//! Session events and the view model they fold into.

use shared::domain::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Selection,
    Analysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusSeverity {
    #[default]
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusLine {
    pub severity: StatusSeverity,
    pub message: String,
}

impl StatusLine {
    pub fn new(severity: StatusSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    pub id: String,
    pub sequence_preview: String,
    /// Shown on demand (hover/expand) next to the truncated preview.
    pub full_sequence: String,
    pub classification: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    Single { label: String },
    Batch { rows: Vec<BatchRow> },
}

impl ResultView {
    pub fn is_batch(&self) -> bool {
        matches!(self, ResultView::Batch { .. })
    }
}

/// A rendered result together with the decoded form it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub result: AnalysisResult,
    pub view: ResultView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    PageChanged(Page),
    Status(StatusLine),
    AnalyzeActionVisible(bool),
    DownloadActionVisible(bool),
    FilePreview(Option<String>),
    Loading(bool),
    ResultReady(ResultView),
}

/// Snapshot of everything a host needs to draw the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub page: Page,
    pub status: StatusLine,
    pub analyze_visible: bool,
    pub download_visible: bool,
    pub file_preview: Option<String>,
    pub loading: bool,
    pub result: Option<ResultView>,
}

impl SessionView {
    pub fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::PageChanged(page) => self.page = *page,
            SessionEvent::Status(status) => self.status = status.clone(),
            SessionEvent::AnalyzeActionVisible(visible) => self.analyze_visible = *visible,
            SessionEvent::DownloadActionVisible(visible) => self.download_visible = *visible,
            SessionEvent::FilePreview(preview) => self.file_preview = preview.clone(),
            SessionEvent::Loading(loading) => {
                self.loading = *loading;
                if *loading {
                    self.result = None;
                }
            }
            SessionEvent::ResultReady(view) => {
                self.loading = false;
                self.result = Some(view.clone());
            }
        }
    }
}
