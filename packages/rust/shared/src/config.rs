//! Application configuration for qatidy.
//!
//! User config lives at `~/.qatidy/qatidy.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QaTidyError, Result};
use crate::types::{FluffProfile, Numbering, UnansweredPolicy};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "qatidy.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".qatidy";

// ---------------------------------------------------------------------------
// Config structs (matching qatidy.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cleaning defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// User-supplied filler patterns.
    #[serde(default)]
    pub fluff: FluffConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Built-in fluff pattern set.
    #[serde(default)]
    pub profile: FluffProfile,

    /// Topic headings must be longer than this many characters.
    #[serde(default = "default_min_topic_len")]
    pub min_topic_len: usize,

    /// Handling of questions without an answer.
    #[serde(default)]
    pub unanswered: UnansweredPolicy,

    /// Question numbering scope.
    #[serde(default)]
    pub numbering: Numbering,

    /// Emit unclassified lines verbatim instead of dropping them.
    #[serde(default)]
    pub passthrough: bool,

    /// Remove mojibake arrow tokens from answers.
    #[serde(default = "default_true")]
    pub strip_arrows: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            profile: FluffProfile::default(),
            min_topic_len: default_min_topic_len(),
            unanswered: UnansweredPolicy::default(),
            numbering: Numbering::default(),
            passthrough: false,
            strip_arrows: true,
        }
    }
}

fn default_min_topic_len() -> usize {
    15
}
fn default_true() -> bool {
    true
}

/// `[fluff]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FluffConfig {
    /// Regexes removed from the whole text after the profile's built-ins.
    #[serde(default)]
    pub extra_patterns: Vec<String>,

    /// Line-start regexes marking whole lines as noise.
    #[serde(default)]
    pub noise_patterns: Vec<String>,
}

// ---------------------------------------------------------------------------
// Clean config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime cleaning configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct CleanConfig {
    /// Built-in fluff pattern set.
    pub profile: FluffProfile,
    /// Extra fluff regexes, applied in order after the profile's.
    pub extra_patterns: Vec<String>,
    /// Extra noise-line regexes.
    pub noise_patterns: Vec<String>,
    /// Minimum topic heading length (exclusive).
    pub min_topic_len: usize,
    /// Handling of questions without an answer.
    pub unanswered: UnansweredPolicy,
    /// Question numbering scope.
    pub numbering: Numbering,
    /// Emit unclassified lines verbatim.
    pub passthrough: bool,
    /// Remove mojibake arrow tokens from answers.
    pub strip_arrows: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for CleanConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            profile: config.defaults.profile,
            extra_patterns: config.fluff.extra_patterns.clone(),
            noise_patterns: config.fluff.noise_patterns.clone(),
            min_topic_len: config.defaults.min_topic_len,
            unanswered: config.defaults.unanswered,
            numbering: config.defaults.numbering,
            passthrough: config.defaults.passthrough,
            strip_arrows: config.defaults.strip_arrows,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.qatidy/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| QaTidyError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.qatidy/qatidy.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| QaTidyError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| QaTidyError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_file_path()?;
    init_config_at(&path)?;
    Ok(path)
}

/// Write a default config file at `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| QaTidyError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| QaTidyError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| QaTidyError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("min_topic_len = 15"));
        assert!(toml_str.contains("profile = \"transcript\""));
        assert!(toml_str.contains("numbering = \"per-topic\""));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.min_topic_len, 15);
        assert_eq!(parsed.defaults.unanswered, UnansweredPolicy::Keep);
        assert!(parsed.defaults.strip_arrows);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
profile = "cicd"
unanswered = "drop"

[fluff]
extra_patterns = ['Want a PDF version\?']
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.profile, FluffProfile::Cicd);
        assert_eq!(config.defaults.unanswered, UnansweredPolicy::Drop);
        assert_eq!(config.defaults.min_topic_len, 15);
        assert!(config.defaults.strip_arrows);
        assert_eq!(config.fluff.extra_patterns.len(), 1);
        assert!(config.fluff.noise_patterns.is_empty());
    }

    #[test]
    fn unknown_profile_is_rejected() {
        let toml_str = "[defaults]\nprofile = \"chatty\"\n";
        assert!(toml::from_str::<AppConfig>(toml_str).is_err());
    }

    #[test]
    fn clean_config_from_app_config() {
        let mut app = AppConfig::default();
        app.defaults.numbering = Numbering::Global;
        app.fluff.noise_patterns.push("^Sure".into());

        let clean = CleanConfig::from(&app);
        assert_eq!(clean.numbering, Numbering::Global);
        assert_eq!(clean.min_topic_len, 15);
        assert_eq!(clean.noise_patterns, vec!["^Sure".to_string()]);
        assert!(!clean.passthrough);
    }

    #[test]
    fn load_config_from_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("qatidy-definitely-missing.toml");
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, QaTidyError::Io { .. }));
    }

    #[test]
    fn init_config_at_writes_loadable_file() {
        let dir = std::env::temp_dir().join(format!("qatidy-config-{}", std::process::id()));
        let path = dir.join("nested").join(CONFIG_FILE_NAME);
        init_config_at(&path).expect("init config");
        let loaded = load_config_from(&path).expect("load config");
        assert_eq!(loaded.defaults.min_topic_len, 15);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
