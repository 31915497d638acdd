//! Host shell capabilities: file dialogs and the readiness flag guarding them.

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl DialogFilter {
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDialogOptions {
    pub multiple: bool,
    pub directory: bool,
    pub filters: Vec<DialogFilter>,
}

impl OpenDialogOptions {
    /// Single, non-directory pick restricted to sequence files.
    pub fn sequence_files() -> Self {
        Self {
            multiple: false,
            directory: false,
            filters: vec![DialogFilter::new("Supported Files", &["fasta", "csv"])],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDialogOptions {
    pub title: String,
    pub default_file_name: String,
    pub filters: Vec<DialogFilter>,
}

impl SaveDialogOptions {
    pub fn csv(default_file_name: impl Into<String>) -> Self {
        Self {
            title: "Save CSV Results".to_string(),
            default_file_name: default_file_name.into(),
            filters: vec![DialogFilter::new("CSV Files", &["csv"])],
        }
    }
}

#[async_trait]
pub trait HostShell: Send + Sync {
    /// Resolves once the shell's dialog capabilities can be used.
    async fn initialize(&self) -> Result<()>;
    /// `Ok(None)` when the user dismisses the dialog.
    async fn pick_file(&self, options: &OpenDialogOptions) -> Result<Option<PathBuf>>;
    /// `Ok(None)` when the user cancels the save prompt.
    async fn pick_save_destination(&self, options: &SaveDialogOptions) -> Result<Option<PathBuf>>;
}

pub struct MissingHostShell;

#[async_trait]
impl HostShell for MissingHostShell {
    async fn initialize(&self) -> Result<()> {
        Err(anyhow!("host shell is unavailable"))
    }

    async fn pick_file(&self, _options: &OpenDialogOptions) -> Result<Option<PathBuf>> {
        Err(anyhow!("host shell is unavailable"))
    }

    async fn pick_save_destination(
        &self,
        _options: &SaveDialogOptions,
    ) -> Result<Option<PathBuf>> {
        Err(anyhow!("host shell is unavailable"))
    }
}

/// A host shell plus whether its one-time initialization has completed.
pub struct HostLink {
    shell: Arc<dyn HostShell>,
    ready: AtomicBool,
}

impl HostLink {
    pub fn new(shell: Arc<dyn HostShell>) -> Self {
        Self {
            shell,
            ready: AtomicBool::new(false),
        }
    }

    pub async fn initialize(&self) -> Result<()> {
        let outcome = self.shell.initialize().await;
        self.ready.store(outcome.is_ok(), Ordering::Release);
        outcome
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn shell(&self) -> &dyn HostShell {
        self.shell.as_ref()
    }
}
