use devbox_generate::GenerationConfig;
use devbox_preview::{PreviewSettings, RefreshPolicy, ViewMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "devbox.config.json";

/// Devbox configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Quiet period before an auto refresh commits
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Start with auto refresh on (false starts in manual mode)
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,

    #[serde(default)]
    pub initial_view: ViewMode,

    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_port() -> u16 {
    3030
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_debounce_ms() -> u64 {
    800
}

fn default_auto_refresh() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn preview_settings(&self) -> PreviewSettings {
        let policy = if self.auto_refresh {
            RefreshPolicy::Auto
        } else {
            RefreshPolicy::Manual
        };

        PreviewSettings::default()
            .with_view_mode(self.initial_view)
            .with_policy(policy)
            .with_quiescence_window(Duration::from_millis(self.debounce_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            debounce_ms: default_debounce_ms(),
            auto_refresh: default_auto_refresh(),
            initial_view: ViewMode::default(),
            generation: GenerationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "port": 8080,
            "debounceMs": 250,
            "autoRefresh": false,
            "initialView": "PREVIEW",
            "generation": { "model": "gemini-2.5-pro", "temperature": 0.7 }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.debounce_ms, 250);
        assert!(!config.auto_refresh);
        assert_eq!(config.initial_view, ViewMode::Preview);
        assert_eq!(config.generation.model, "gemini-2.5-pro");
        assert_eq!(config.generation.api_key_env, "API_KEY");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 3030);
        assert_eq!(config.debounce_ms, 800);

        let settings = config.preview_settings();
        assert_eq!(settings, PreviewSettings::default());
    }

    #[test]
    fn test_manual_settings() {
        let config = Config {
            auto_refresh: false,
            debounce_ms: 100,
            ..Config::default()
        };

        let settings = config.preview_settings();
        assert_eq!(settings.policy, RefreshPolicy::Manual);
        assert_eq!(settings.quiescence_window, Duration::from_millis(100));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config.port, 3030);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "port": 4000 }"#).unwrap();

        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config.port, 4000);
        assert!(config.auto_refresh);
    }
}
