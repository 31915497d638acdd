use std::{
    fs,
    path::{Path, PathBuf},
};

use client_core::{PresentationPolicy, DEFAULT_EXPORT_FILE_NAME};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_SETTINGS_FILE: &str = "nat2.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopSettings {
    pub backend_url: String,
    pub presentation_min_ms: u64,
    pub presentation_max_ms: u64,
    pub export_file_name: String,
}

impl Default for DesktopSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:1420".into(),
            presentation_min_ms: PresentationPolicy::DEFAULT_MIN_MS,
            presentation_max_ms: PresentationPolicy::DEFAULT_MAX_MS,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.into(),
        }
    }
}

impl DesktopSettings {
    pub fn presentation_policy(&self) -> PresentationPolicy {
        PresentationPolicy::from_millis(self.presentation_min_ms, self.presentation_max_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    backend_url: Option<String>,
    presentation_min_ms: Option<u64>,
    presentation_max_ms: Option<u64>,
    export_file_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Defaults, then the settings file, then environment overrides. An explicit path must
/// exist; the default `nat2.toml` is optional.
pub fn load_settings(explicit: Option<&Path>) -> Result<DesktopSettings, SettingsError> {
    let mut settings = DesktopSettings::default();

    match explicit {
        Some(path) => apply_file(&mut settings, path)?,
        None => {
            let path = Path::new(DEFAULT_SETTINGS_FILE);
            if path.exists() {
                apply_file(&mut settings, path)?;
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut DesktopSettings, path: &Path) -> Result<(), SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file_cfg: FileSettings = toml::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(v) = file_cfg.backend_url {
        settings.backend_url = v;
    }
    if let Some(v) = file_cfg.presentation_min_ms {
        settings.presentation_min_ms = v;
    }
    if let Some(v) = file_cfg.presentation_max_ms {
        settings.presentation_max_ms = v;
    }
    if let Some(v) = file_cfg.export_file_name {
        settings.export_file_name = v;
    }
    debug!(path = %path.display(), "loaded settings file");
    Ok(())
}

fn apply_env(
    settings: &mut DesktopSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), SettingsError> {
    if let Some(v) = lookup("NAT2_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = lookup("APP__BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = lookup("APP__PRESENTATION_MIN_MS") {
        settings.presentation_min_ms = parse_millis("APP__PRESENTATION_MIN_MS", v)?;
    }
    if let Some(v) = lookup("APP__PRESENTATION_MAX_MS") {
        settings.presentation_max_ms = parse_millis("APP__PRESENTATION_MAX_MS", v)?;
    }
    if let Some(v) = lookup("APP__EXPORT_FILE_NAME") {
        settings.export_file_name = v;
    }
    Ok(())
}

fn parse_millis(key: &'static str, value: String) -> Result<u64, SettingsError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| SettingsError::InvalidValue { key, value })
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nat2.toml");
        fs::write(
            &path,
            "backend_url = \"http://lab.internal:9000\"\npresentation_min_ms = 0\npresentation_max_ms = 0\n",
        )
        .expect("write settings");

        let settings = load_settings(Some(&path)).expect("load");

        assert_eq!(settings.backend_url, "http://lab.internal:9000");
        assert_eq!(settings.presentation_policy().max(), Duration::ZERO);
        assert_eq!(settings.export_file_name, DEFAULT_EXPORT_FILE_NAME);
    }

    #[test]
    fn env_overrides_win_over_file_values() {
        let mut settings = DesktopSettings {
            backend_url: "http://from-file".into(),
            ..DesktopSettings::default()
        };

        apply_env(
            &mut settings,
            env(&[
                ("NAT2_BACKEND_URL", "http://legacy"),
                ("APP__BACKEND_URL", "http://preferred"),
                ("APP__PRESENTATION_MIN_MS", " 250 "),
                ("APP__EXPORT_FILE_NAME", "batch.csv"),
            ]),
        )
        .expect("apply env");

        assert_eq!(settings.backend_url, "http://preferred");
        assert_eq!(settings.presentation_min_ms, 250);
        assert_eq!(settings.export_file_name, "batch.csv");
    }

    #[test]
    fn non_numeric_delay_is_rejected() {
        let mut settings = DesktopSettings::default();
        let err = apply_env(&mut settings, env(&[("APP__PRESENTATION_MAX_MS", "soon")]))
            .expect_err("must fail");
        assert!(matches!(
            err,
            SettingsError::InvalidValue {
                key: "APP__PRESENTATION_MAX_MS",
                ..
            }
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_settings(Some(&dir.path().join("absent.toml"))).expect_err("missing");
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn unknown_keys_are_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nat2.toml");
        fs::write(&path, "backend = \"http://typo\"\n").expect("write settings");

        let err = load_settings(Some(&path)).expect_err("unknown key");
        assert!(err.to_string().contains("failed to parse settings file"));
    }
}
