use std::path::PathBuf;

use anyhow::{bail, Result};
use async_trait::async_trait;
use client_core::{HostShell, OpenDialogOptions, SaveDialogOptions};
use tracing::debug;

/// Host shell for non-interactive runs: the "dialogs" answer with paths given on the
/// command line.
pub struct ScriptedShell {
    pick: PathBuf,
    save_destination: Option<PathBuf>,
}

impl ScriptedShell {
    pub fn new(pick: PathBuf, save_destination: Option<PathBuf>) -> Self {
        Self {
            pick,
            save_destination,
        }
    }
}

#[async_trait]
impl HostShell for ScriptedShell {
    async fn initialize(&self) -> Result<()> {
        if self.pick.as_os_str().is_empty() {
            bail!("no input file configured");
        }
        debug!(pick = %self.pick.display(), "scripted host shell ready");
        Ok(())
    }

    async fn pick_file(&self, options: &OpenDialogOptions) -> Result<Option<PathBuf>> {
        debug!(filters = ?options.filters, "open dialog answered from command line");
        Ok(Some(self.pick.clone()))
    }

    async fn pick_save_destination(&self, options: &SaveDialogOptions) -> Result<Option<PathBuf>> {
        let Some(destination) = &self.save_destination else {
            return Ok(None);
        };
        // A directory target gets the dialog's suggested file name.
        if destination.is_dir() {
            return Ok(Some(destination.join(&options.default_file_name)));
        }
        Ok(Some(destination.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn directory_destination_uses_suggested_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let shell = ScriptedShell::new("samples.fasta".into(), Some(dir.path().to_path_buf()));

        let picked = shell
            .pick_save_destination(&SaveDialogOptions::csv("nat2_analysis_results.csv"))
            .await
            .expect("pick");

        assert_eq!(picked, Some(dir.path().join("nat2_analysis_results.csv")));
    }

    #[tokio::test]
    async fn file_destination_is_used_verbatim() {
        let shell = ScriptedShell::new("samples.csv".into(), Some("/tmp/out/batch.csv".into()));
        let picked = shell
            .pick_save_destination(&SaveDialogOptions::csv("nat2_analysis_results.csv"))
            .await
            .expect("pick");
        assert_eq!(picked, Some(PathBuf::from("/tmp/out/batch.csv")));
    }

    #[tokio::test]
    async fn missing_destination_cancels_the_save() {
        let shell = ScriptedShell::new("samples.csv".into(), None);
        let picked = shell
            .pick_save_destination(&SaveDialogOptions::csv("nat2_analysis_results.csv"))
            .await
            .expect("pick");
        assert_eq!(picked, None);
    }

    #[tokio::test]
    async fn open_dialog_returns_configured_file() {
        let shell = ScriptedShell::new("/data/samples.fasta".into(), None);
        shell.initialize().await.expect("ready");
        let picked = shell
            .pick_file(&OpenDialogOptions::sequence_files())
            .await
            .expect("pick");
        assert_eq!(picked, Some(PathBuf::from("/data/samples.fasta")));
    }
}
