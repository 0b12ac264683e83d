//! Configuration management module.
//!
//! This module handles loading, saving, and managing application configuration,
//! including the record API location, access token and sync timeout.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/intake-wizard";
const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_SYNC_TIMEOUT_SECS: u64 = 30;

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub access_token: Option<String>,
    pub sync_timeout_secs: u64,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default = "default_sync_timeout_secs")]
    pub sync_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_sync_timeout_secs() -> u64 {
    DEFAULT_SYNC_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance with default settings.
    ///
    pub fn new() -> Config {
        Config {
            api_base_url: default_api_base_url(),
            access_token: None,
            sync_timeout_secs: default_sync_timeout_secs(),
            file_path: None,
        }
    }

    /// Bound on a single record sync call.
    ///
    pub fn sync_timeout(&self) -> Duration {
        Duration::from_secs(self.sync_timeout_secs.max(1))
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Try to load an existing configuration from the disk using the custom
    /// path if provided. A missing file leaves the defaults in place and
    /// creates the directory so `save` can write there later.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectory {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        let file_path = dir_path.join(Path::new(FILE_NAME));
        self.file_path = Some(file_path.clone());

        if file_path.exists() {
            let contents = fs::read_to_string(&file_path).map_err(|e| ConfigError::Read {
                path: file_path.clone(),
                source: e,
            })?;
            let data: FileSpec =
                serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
                    path: file_path.clone(),
                    source: e,
                })?;
            if data.api_base_url.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "api_base_url".to_string(),
                    message: "must not be empty".to_string(),
                }
                .into());
            }
            self.api_base_url = data.api_base_url;
            self.access_token = data.access_token;
            self.sync_timeout_secs = data.sync_timeout_secs;
        }

        Ok(())
    }

    /// Attempt to serialize the configuration data and write it to the disk,
    /// returning any unrecoverable errors.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::NotLoaded)?;
        let data = FileSpec {
            api_base_url: self.api_base_url.clone(),
            access_token: self.access_token.clone(),
            sync_timeout_secs: self.sync_timeout_secs,
        };
        let content = serde_yaml::to_string(&data).map_err(ConfigError::Encode)?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let write_failed = |e| ConfigError::Write {
            path: file_path.clone(),
            source: e,
        };
        let mut file = fs::File::create(file_path).map_err(write_failed)?;
        write!(file, "{}", content).map_err(write_failed)?;
        file.flush().map_err(write_failed)?;
        Ok(())
    }

    /// Returns the path buffer for the default path to the configuration file
    /// or an error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::uuid::UUIDv4;
    use fake::Fake;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        let id: Uuid = UUIDv4.fake();
        std::env::temp_dir().join(format!("intake-wizard-test-{}", id))
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.access_token, None);
        assert_eq!(config.sync_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_missing_file_keeps_defaults() {
        let dir = scratch_dir();
        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        assert!(dir.exists());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.file_path(), Some(dir.join(FILE_NAME).as_path()));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir();
        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        config.api_base_url = "https://records.example.com/v1".to_string();
        config.access_token = Some("secret".to_string());
        config.sync_timeout_secs = 5;
        config.save().unwrap();

        let mut reloaded = Config::new();
        reloaded.load(dir.to_str()).unwrap();
        assert_eq!(reloaded.api_base_url, "https://records.example.com/v1");
        assert_eq!(reloaded.access_token.as_deref(), Some("secret"));
        assert_eq!(reloaded.sync_timeout(), Duration::from_secs(5));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(FILE_NAME), "access_token: abc\n").unwrap();
        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        assert_eq!(config.access_token.as_deref(), Some("abc"));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.sync_timeout_secs, DEFAULT_SYNC_TIMEOUT_SECS);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(FILE_NAME), "api_base_url: ''\n").unwrap();
        let mut config = Config::new();
        let result = config.load(dir.to_str());
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_without_path_fails() {
        let config = Config::new();
        assert!(matches!(
            config.save(),
            Err(AppError::Config(ConfigError::NotLoaded))
        ));
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(FILE_NAME), "sync_timeout_secs: [soon\n").unwrap();
        let mut config = Config::new();
        let result = config.load(dir.to_str());
        match result {
            Err(AppError::Config(ConfigError::Parse { path, .. })) => {
                assert_eq!(path, dir.join(FILE_NAME));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        let _ = fs::remove_dir_all(&dir);
    }
}
