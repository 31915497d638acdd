use client_core::{ResultView, SessionEvent, StatusLine, StatusSeverity};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

pub fn format_status(status: &StatusLine) -> Option<String> {
    if status.message.is_empty() {
        return None;
    }
    let tag = match status.severity {
        StatusSeverity::Info => "info",
        StatusSeverity::Success => "ok",
        StatusSeverity::Error => "error",
    };
    Some(format!("[{tag}] {}", status.message))
}

pub fn format_result(view: &ResultView) -> Vec<String> {
    match view {
        ResultView::Single { label } => vec![format!("Result: {label}")],
        ResultView::Batch { rows } => {
            let mut lines = Vec::with_capacity(rows.len() + 1);
            lines.push("id\tsequence\tclassification".to_string());
            lines.extend(rows.iter().map(|row| {
                format!(
                    "{}\t{}\t{}",
                    row.id, row.sequence_preview, row.classification
                )
            }));
            lines
        }
    }
}

/// Mirrors session events onto the terminal until the surface is dropped. Results go to
/// stdout, everything else to stderr.
pub async fn print_events(mut rx: broadcast::Receiver<SessionEvent>) {
    loop {
        match rx.recv().await {
            Ok(SessionEvent::Status(status)) => {
                if let Some(line) = format_status(&status) {
                    eprintln!("{line}");
                }
            }
            Ok(SessionEvent::FilePreview(Some(preview))) => eprintln!("{preview}"),
            Ok(SessionEvent::Loading(true)) => eprintln!("Analyzing..."),
            Ok(SessionEvent::ResultReady(view)) => {
                for line in format_result(&view) {
                    println!("{line}");
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "event printer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
