// Durable user preferences: alias and hand sort order.

use std::path::{Path, PathBuf};

use bigtwo_core::client::ClientPrefs;
use bigtwo_core::sort::SortPreference;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to read preferences {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse preferences {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write preferences {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// On-disk shape of the preferences file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortPreference>,
}

impl Prefs {
    /// Values for a new client; `default_sort` applies when none is stored.
    pub fn to_client_prefs(&self, default_sort: SortPreference) -> ClientPrefs {
        ClientPrefs {
            alias: self.alias.clone(),
            sort_preference: self.sort.unwrap_or(default_sort),
        }
    }
}

/// Reads and writes [`Prefs`] at a fixed path.
#[derive(Debug, Clone)]
pub struct PrefsStore {
    path: PathBuf,
    current: Prefs,
}

impl PrefsStore {
    /// Open the store. A missing file yields empty preferences.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let current = load(&path)?;
        Ok(PrefsStore { path, current })
    }

    /// Open the store, falling back to empty preferences if the file is
    /// unreadable. The broken file is overwritten on the next save.
    pub fn open_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match load(&path) {
            Ok(current) => PrefsStore { path, current },
            Err(e) => {
                warn!("Ignoring unreadable preferences: {}", e);
                PrefsStore {
                    path,
                    current: Prefs::default(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn prefs(&self) -> &Prefs {
        &self.current
    }

    pub fn set_alias(&mut self, alias: &str) -> Result<(), PrefsError> {
        self.current.alias = Some(alias.to_string());
        self.save()
    }

    pub fn set_sort(&mut self, sort: SortPreference) -> Result<(), PrefsError> {
        self.current.sort = Some(sort);
        self.save()
    }

    fn save(&self) -> Result<(), PrefsError> {
        let text = toml::to_string(&self.current)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| PrefsError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, text).map_err(|source| PrefsError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!("Preferences saved to {}", self.path.display());
        Ok(())
    }
}

fn load(path: &Path) -> Result<Prefs, PrefsError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Prefs::default()),
        Err(source) => {
            return Err(PrefsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str(&text).map_err(|source| PrefsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
