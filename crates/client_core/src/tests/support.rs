use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::domain::AnalysisResult;
use tokio::sync::Notify;

use crate::{
    host::{HostShell, OpenDialogOptions, SaveDialogOptions},
    AnalysisBackend,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    PreviewRead(String),
    Classify(String),
    ExportTransform(String),
    Persist { destination: String, content: String },
}

pub struct FakeBackend {
    preview: std::result::Result<String, String>,
    classify: std::result::Result<String, String>,
    classify_context: Option<String>,
    persist_error: Option<String>,
    classify_gate: Option<Arc<Notify>>,
    pub calls: Arc<Mutex<Vec<BackendCall>>>,
}

impl FakeBackend {
    pub fn classifying(payload: impl Into<String>) -> Self {
        Self {
            preview: Ok(">N".to_string()),
            classify: Ok(payload.into()),
            classify_context: None,
            persist_error: None,
            classify_gate: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_classify(message: impl Into<String>) -> Self {
        let mut backend = Self::classifying("");
        backend.classify = Err(message.into());
        backend
    }

    /// Wraps the classify failure in an outer context, like a transport error would be.
    pub fn with_classify_context(mut self, context: impl Into<String>) -> Self {
        self.classify_context = Some(context.into());
        self
    }

    pub fn with_preview_error(mut self, message: impl Into<String>) -> Self {
        self.preview = Err(message.into());
        self
    }

    pub fn with_persist_error(mut self, message: impl Into<String>) -> Self {
        self.persist_error = Some(message.into());
        self
    }

    /// `classify` blocks until the returned notifier fires.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.classify_gate = Some(gate.clone());
        (self, gate)
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().expect("calls").clone()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().expect("calls").push(call);
    }
}

#[async_trait]
impl AnalysisBackend for FakeBackend {
    async fn preview_read(&self, path: &str) -> Result<String> {
        self.record(BackendCall::PreviewRead(path.to_string()));
        self.preview.clone().map_err(|e| anyhow!(e))
    }

    async fn classify(&self, path: &str) -> Result<String> {
        self.record(BackendCall::Classify(path.to_string()));
        if let Some(gate) = &self.classify_gate {
            gate.notified().await;
        }
        self.classify.clone().map_err(|e| match &self.classify_context {
            Some(context) => anyhow!(e).context(context.clone()),
            None => anyhow!(e),
        })
    }

    async fn export_transform(&self, payload: &str) -> Result<String> {
        self.record(BackendCall::ExportTransform(payload.to_string()));
        let AnalysisResult::Batch { records } = AnalysisResult::decode(payload) else {
            return Err(anyhow!("Failed to parse results: expected a sequence"));
        };
        let mut csv = String::from("id,sequence,classification\n");
        for record in records {
            csv.push_str(&format!(
                "{},{},{}\n",
                record.id, record.sequence, record.classification
            ));
        }
        Ok(csv)
    }

    async fn persist(&self, destination: &str, content: &str) -> Result<()> {
        self.record(BackendCall::Persist {
            destination: destination.to_string(),
            content: content.to_string(),
        });
        match &self.persist_error {
            Some(err) => Err(anyhow!(err.clone())),
            None => Ok(()),
        }
    }
}

pub struct FakeShell {
    ready: bool,
    pick: std::result::Result<Option<PathBuf>, String>,
    save: std::result::Result<Option<PathBuf>, String>,
    pub save_requests: Arc<Mutex<Vec<SaveDialogOptions>>>,
}

impl FakeShell {
    pub fn ready() -> Self {
        Self {
            ready: true,
            pick: Ok(None),
            save: Ok(Some(PathBuf::from("/exports/nat2_analysis_results.csv"))),
            save_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            ready: false,
            ..Self::ready()
        }
    }

    pub fn picking(mut self, path: impl Into<PathBuf>) -> Self {
        self.pick = Ok(Some(path.into()));
        self
    }

    pub fn with_pick_error(mut self, message: impl Into<String>) -> Self {
        self.pick = Err(message.into());
        self
    }

    pub fn cancelling_save(mut self) -> Self {
        self.save = Ok(None);
        self
    }
}

#[async_trait]
impl HostShell for FakeShell {
    async fn initialize(&self) -> Result<()> {
        if self.ready {
            Ok(())
        } else {
            Err(anyhow!("dialog plugin not loaded"))
        }
    }

    async fn pick_file(&self, options: &OpenDialogOptions) -> Result<Option<PathBuf>> {
        assert!(!options.multiple && !options.directory);
        self.pick.clone().map_err(|e| anyhow!(e))
    }

    async fn pick_save_destination(&self, options: &SaveDialogOptions) -> Result<Option<PathBuf>> {
        self.save_requests
            .lock()
            .expect("save requests")
            .push(options.clone());
        self.save.clone().map_err(|e| anyhow!(e))
    }
}
