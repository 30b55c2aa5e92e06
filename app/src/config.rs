//! Configuration management for the todolist binary.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::reducer::DEFAULT_STORAGE_KEY;
use std::env;
use std::path::PathBuf;

/// File used for durable storage when `TODOLIST_STORAGE_PATH` is unset
pub const DEFAULT_STORAGE_PATH: &str = "todos.json";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File backing the durable key-value store
    pub storage_path: PathBuf,
    /// Key the task list is stored under
    pub storage_key: String,
    /// Answer every delete confirmation with yes
    pub assume_yes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            assume_yes: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            storage_path: lookup("TODOLIST_STORAGE_PATH")
                .filter(|s| !s.trim().is_empty())
                .map_or(defaults.storage_path, PathBuf::from),
            storage_key: lookup("TODOLIST_STORAGE_KEY")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.storage_key),
            assume_yes: lookup("TODOLIST_ASSUME_YES")
                .map_or(defaults.assume_yes, |s| {
                    matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
                }),
        }
    }
}
