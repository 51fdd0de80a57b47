//! Where data and logs live, and how chatty logging is.

use std::{path::PathBuf, sync::LazyLock};

use directories::ProjectDirs;

use crate::error::ConfigError;

static PROJECT_DIR: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("fyi", "angelo", "hydrate-tracker"));

pub const DATA_DIR_VAR: &str = "HYDRATE_DATA_DIR";
pub const LOG_DIR_VAR: &str = "HYDRATE_LOG_DIR";
pub const LOG_FILTER_VAR: &str = "HYDRATE_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one file per stored key
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive for the log file
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok(), (*PROJECT_DIR).as_ref())
    }

    /// Resolves the config from `lookup` (an environment) with the platform
    /// directories as fallback.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        project_dirs: Option<&ProjectDirs>,
    ) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let data_dir = match non_empty(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => project_dirs
                .ok_or(ConfigError::NoProjectDirs)?
                .data_dir()
                .to_path_buf(),
        };

        let log_dir = non_empty(LOG_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("logs"));

        let log_filter = non_empty(LOG_FILTER_VAR)
            .or_else(|| non_empty("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            data_dir,
            log_dir,
            log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn overrides_win() {
        let config = Config::from_lookup(
            env(&[
                (DATA_DIR_VAR, "/tmp/water"),
                (LOG_DIR_VAR, "/tmp/water-logs"),
                (LOG_FILTER_VAR, "hydrate_tracker=debug"),
                ("RUST_LOG", "trace"),
            ]),
            None,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/water"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/water-logs"));
        assert_eq!(config.log_filter, "hydrate_tracker=debug");
    }

    #[test]
    fn logs_default_under_data_dir() {
        let config = Config::from_lookup(
            env(&[(DATA_DIR_VAR, "/tmp/water"), ("RUST_LOG", "warn")]),
            None,
        )
        .unwrap();

        assert_eq!(config.log_dir, PathBuf::from("/tmp/water/logs"));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn needs_some_data_dir() {
        let result = Config::from_lookup(env(&[(DATA_DIR_VAR, "  ")]), None);
        assert!(matches!(result, Err(ConfigError::NoProjectDirs)));
    }

    #[test]
    fn falls_back_to_project_dirs() {
        let Some(dirs) = ProjectDirs::from("fyi", "angelo", "hydrate-tracker") else {
            // No home directory in this environment
            return;
        };
        let config = Config::from_lookup(env(&[]), Some(&dirs)).unwrap();

        assert_eq!(config.data_dir, dirs.data_dir());
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }
}
