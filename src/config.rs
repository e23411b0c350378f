// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration loaded from YAML.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How the preview panel shows a project's media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewMode {
    /// Image first; the video starts when the viewer asks for it.
    #[default]
    ClickToPlay,
    /// Video shown as playing as soon as the panel opens.
    Autoplay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the project API the viewer talks to.
    pub api_url: String,
    /// Listen address for `serve` and the embedded server.
    pub bind_addr: String,
    /// Start the API inside the viewer process.
    pub embedded_server: bool,
    /// Minimum window width (points) for hover previews.
    pub pointer_breakpoint: f32,
    pub preview_mode: PreviewMode,
    /// Project list to seed the store with instead of the samples.
    pub seed_file: Option<PathBuf>,
    pub settings_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5174".to_string(),
            bind_addr: "127.0.0.1:5174".to_string(),
            embedded_server: true,
            pointer_breakpoint: 768.0,
            preview_mode: PreviewMode::ClickToPlay,
            seed_file: None,
            settings_path: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config = serde_yaml::from_str(&yaml)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig = serde_yaml::from_str("preview_mode: autoplay\npointer_breakpoint: 1024\n").unwrap();
        assert_eq!(config.preview_mode, PreviewMode::Autoplay);
        assert_eq!(config.pointer_breakpoint, 1024.0);
        assert_eq!(config.bind_addr, "127.0.0.1:5174");
        assert!(config.embedded_server);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(AppConfig::load(Path::new("/no/such/folio.yaml")).is_err());
        assert_eq!(AppConfig::load_or_default(None).unwrap(), AppConfig::default());
    }
}
