//! Configuration handling for the TUI

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the project URL from the config file
pub const ENV_SUPABASE_URL: &str = "LISTING_TUI_SUPABASE_URL";
/// Overrides the anon key from the config file
pub const ENV_SUPABASE_ANON_KEY: &str = "LISTING_TUI_SUPABASE_ANON_KEY";

const DEFAULT_LISTINGS_TABLE: &str = "listings";

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Project URL of the remote data store
    pub supabase_url: Option<String>,
    /// Public anon key sent with every request
    pub supabase_anon_key: Option<String>,
    /// Table listings are inserted into
    pub listings_table: Option<String>,
    /// Where drafts and the session are kept
    pub data_dir: Option<PathBuf>,
    /// Also gate the two data-entry steps on a signed-in session
    pub require_login_for_wizard: Option<bool>,
}

impl TuiConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("ie", "marketplace", "listing-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the platform config directory, then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(
            env::var(ENV_SUPABASE_URL).ok(),
            env::var(ENV_SUPABASE_ANON_KEY).ok(),
        );
        Ok(config)
    }

    /// Load from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    fn apply_overrides(&mut self, url: Option<String>, anon_key: Option<String>) {
        if let Some(url) = url.filter(|v| !v.trim().is_empty()) {
            self.supabase_url = Some(url);
        }
        if let Some(key) = anon_key.filter(|v| !v.trim().is_empty()) {
            self.supabase_anon_key = Some(key);
        }
    }

    pub fn listings_table(&self) -> &str {
        self.listings_table
            .as_deref()
            .unwrap_or(DEFAULT_LISTINGS_TABLE)
    }

    pub fn require_login_for_wizard(&self) -> bool {
        self.require_login_for_wizard.unwrap_or(false)
    }

    /// Data directory: configured, platform default, or the working directory
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".listing-tui"))
    }

    pub fn drafts_dir(&self) -> PathBuf {
        self.data_dir().join("drafts")
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert!(config.supabase_url.is_none());
        assert!(config.supabase_anon_key.is_none());
        assert_eq!(config.listings_table(), "listings");
        assert!(!config.require_login_for_wizard());
    }

    #[test]
    fn test_serialization() {
        let config = TuiConfig {
            supabase_url: Some("https://abc.supabase.co".to_string()),
            supabase_anon_key: Some("anon".to_string()),
            listings_table: Some("parts".to_string()),
            data_dir: Some(PathBuf::from("/tmp/listing")),
            require_login_for_wizard: Some(true),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: TuiConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.supabase_url.as_deref(), Some("https://abc.supabase.co"));
        assert_eq!(parsed.listings_table(), "parts");
        assert_eq!(parsed.session_path(), PathBuf::from("/tmp/listing/session.json"));
        assert_eq!(parsed.drafts_dir(), PathBuf::from("/tmp/listing/drafts"));
        assert!(parsed.require_login_for_wizard());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"listings_table": "parts", "unknown_field": "value"}"#;
        let parsed: TuiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.listings_table(), "parts");
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = TuiConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.supabase_url.is_none());
    }

    #[test]
    fn test_load_from_malformed_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(TuiConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides_win() {
        let mut config = TuiConfig {
            supabase_url: Some("https://file.example".to_string()),
            ..Default::default()
        };
        config.apply_overrides(
            Some("https://env.example".to_string()),
            Some("env-key".to_string()),
        );
        assert_eq!(config.supabase_url.as_deref(), Some("https://env.example"));
        assert_eq!(config.supabase_anon_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_blank_env_overrides_ignored() {
        let mut config = TuiConfig {
            supabase_url: Some("https://file.example".to_string()),
            ..Default::default()
        };
        config.apply_overrides(Some("  ".to_string()), None);
        assert_eq!(config.supabase_url.as_deref(), Some("https://file.example"));
    }
}
