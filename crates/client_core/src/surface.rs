//! Page switcher and status line the core drives; hosts subscribe to its events.

use std::sync::Mutex;

use tokio::sync::broadcast;

use crate::events::{Page, ResultView, SessionEvent, SessionView, StatusLine, StatusSeverity};

pub struct SessionSurface {
    view: Mutex<SessionView>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for SessionSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionSurface {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            view: Mutex::new(SessionView::default()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> SessionView {
        self.view
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn emit(&self, event: SessionEvent) {
        self.view
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .apply(&event);
        // No subscribers is fine; the snapshot still tracks the view.
        let _ = self.events.send(event);
    }

    pub fn switch_page(&self, page: Page) {
        self.emit(SessionEvent::PageChanged(page));
    }

    pub fn set_status(&self, severity: StatusSeverity, message: impl Into<String>) {
        self.emit(SessionEvent::Status(StatusLine::new(severity, message)));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.set_status(StatusSeverity::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.set_status(StatusSeverity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.set_status(StatusSeverity::Error, message);
    }

    pub fn show_analyze_action(&self, visible: bool) {
        self.emit(SessionEvent::AnalyzeActionVisible(visible));
    }

    pub fn show_download_action(&self, visible: bool) {
        self.emit(SessionEvent::DownloadActionVisible(visible));
    }

    pub fn set_file_preview(&self, preview: Option<String>) {
        self.emit(SessionEvent::FilePreview(preview));
    }

    pub fn set_loading(&self, loading: bool) {
        self.emit(SessionEvent::Loading(loading));
    }

    pub fn show_result(&self, view: ResultView) {
        let batch = view.is_batch();
        self.emit(SessionEvent::ResultReady(view));
        self.show_download_action(batch);
    }
}
