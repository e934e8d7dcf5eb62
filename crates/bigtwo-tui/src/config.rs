// Configuration loading and parsing (client.toml).

use bigtwo_core::sort::SortPreference;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "client.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// client.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// WebSocket endpoint, e.g. `ws://localhost:8080/ws`.
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    /// Where alias and sort preference are stored. When omitted the platform
    /// config directory is used.
    #[serde(default)]
    pub prefs_path: Option<PathBuf>,
    /// Hand order used until the user picks one.
    #[serde(default)]
    pub default_sort: SortPreference,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            dir: default_log_dir(),
        }
    }
}

fn default_log_dir() -> String {
    "logs".to_string()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/client.toml` relative to `base_dir`.
///
/// Does not auto-copy defaults; `load_config()` does.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the client directory or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first. `url_override` (the first CLI argument) replaces `server.url` and
/// is validated like the file value.
pub fn load_config(url_override: Option<String>) -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    let mut config = load_config_from(&cwd)?;
    if let Some(url) = url_override {
        config.server.url = url;
        validate(&config)?;
    }
    Ok(config)
}

impl Config {
    /// Resolve the preferences file: the configured path, else the platform
    /// config directory, else the working directory.
    pub fn prefs_path(&self) -> PathBuf {
        if let Some(path) = &self.client.prefs_path {
            return path.clone();
        }
        directories::ProjectDirs::from("", "", "bigtwo")
            .map(|dirs| dirs.config_dir().join("prefs.toml"))
            .unwrap_or_else(|| PathBuf::from("bigtwo-prefs.toml"))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = config.server.url.trim();
    let Some(rest) = url
        .strip_prefix("ws://")
        .or_else(|| url.strip_prefix("wss://"))
    else {
        return Err(ConfigError::ValidationError {
            field: "server.url".into(),
            message: format!("must start with ws:// or wss://, got `{url}`"),
        });
    };
    if rest.is_empty() || rest.starts_with('/') {
        return Err(ConfigError::ValidationError {
            field: "server.url".into(),
            message: "missing host".into(),
        });
    }

    if config.logging.dir.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.dir".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn crate_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    /// Fresh temp dir with a `config/client.toml` holding `contents`.
    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), contents).unwrap();
        tmp
    }

    #[test]
    fn shipped_defaults_load() {
        let tmp = std::env::temp_dir().join("bigtwo_config_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            crate_root().join("defaults").join(CONFIG_FILE),
            tmp.join("defaults").join(CONFIG_FILE),
        )
        .unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied, vec![tmp.join("config").join(CONFIG_FILE)]);

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.server.url, "ws://localhost:8080/ws");
        assert_eq!(config.client.default_sort, SortPreference::ByRank);
        assert!(config.client.prefs_path.is_none());
        assert_eq!(config.logging.dir, "logs");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn existing_config_is_not_overwritten() {
        let tmp = temp_config(
            "bigtwo_config_keep",
            "[server]\nurl = \"ws://example.org:9000/ws\"\n",
        );
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(
            tmp.join("defaults").join(CONFIG_FILE),
            "[server]\nurl = \"ws://other/ws\"\n",
        )
        .unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert!(copied.is_empty());
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.server.url, "ws://example.org:9000/ws");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn optional_sections_default() {
        let tmp = temp_config("bigtwo_config_minimal", "[server]\nurl = \"wss://cards.example/ws\"\n");
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.client.default_sort, SortPreference::ByRank);
        assert_eq!(config.logging.dir, "logs");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn suit_default_sort_parses() {
        let tmp = temp_config(
            "bigtwo_config_suit",
            "[server]\nurl = \"ws://localhost:8080/ws\"\n\n[client]\ndefault_sort = \"suit\"\nprefs_path = \"/tmp/p.toml\"\n",
        );
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.client.default_sort, SortPreference::BySuit);
        assert_eq!(config.prefs_path(), PathBuf::from("/tmp/p.toml"));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_non_websocket_url() {
        let tmp = temp_config("bigtwo_config_http", "[server]\nurl = \"http://localhost:8080\"\n");
        let err = load_config_from(&tmp).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "server.url"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_log_dir() {
        let tmp = temp_config(
            "bigtwo_config_logdir",
            "[server]\nurl = \"ws://localhost/ws\"\n\n[logging]\ndir = \"  \"\n",
        );
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "logging.dir"));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let tmp = temp_config("bigtwo_config_bad", "[server\nurl = ");
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::ParseError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_file_is_reported() {
        let tmp = std::env::temp_dir().join("bigtwo_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::FileNotFound { .. })
        ));
        assert!(matches!(
            ensure_config_files(&tmp),
            Err(ConfigError::DefaultsCopyError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }
}
