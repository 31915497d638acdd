//! Invoke-style command surface exposed by the classification backend.

use serde::Serialize;

/// One backend command. Serializes to the command's argument object only; the command
/// name travels separately (see [`BackendCommand::name`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BackendCommand {
    ReadFileStart {
        path: String,
    },
    AnalyzeNat2 {
        path: String,
    },
    DownloadCsvResults {
        #[serde(rename = "resultsJson")]
        results_json: String,
    },
    WriteFile {
        path: String,
        content: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::ReadFileStart { .. } => "read_file_start",
            BackendCommand::AnalyzeNat2 { .. } => "analyze_nat2",
            BackendCommand::DownloadCsvResults { .. } => "download_csv_results",
            BackendCommand::WriteFile { .. } => "write_file",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_arguments_use_camel_case_results_key() {
        let cmd = BackendCommand::DownloadCsvResults {
            results_json: "[]".into(),
        };
        assert_eq!(cmd.name(), "download_csv_results");
        assert_eq!(
            serde_json::to_value(&cmd).expect("serialize"),
            serde_json::json!({ "resultsJson": "[]" })
        );
    }

    #[test]
    fn write_file_carries_path_and_content() {
        let cmd = BackendCommand::WriteFile {
            path: "/tmp/out.csv".into(),
            content: "id\n".into(),
        };
        assert_eq!(
            serde_json::to_value(&cmd).expect("serialize"),
            serde_json::json!({ "path": "/tmp/out.csv", "content": "id\n" })
        );
    }
}
