//! Configuration for the classifier.
//!
//! Read from `--config FILE`, otherwise from `<config dir>/waste-classifier/config.toml`
//! when present, otherwise defaults. Command line flags override file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_MODEL_PATH: &str = "waste_classification_model.onnx";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config
{
    /// Path to the pretrained model artifact.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Upper bound on a single inference, in milliseconds. Unbounded if absent.
    #[serde(default)]
    pub inference_timeout_ms: Option<u64>,
}

fn default_model_path() -> PathBuf
{
    PathBuf::from(DEFAULT_MODEL_PATH)
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            model_path: default_model_path(),
            inference_timeout_ms: None,
        }
    }
}

impl Config
{
    /// The default config file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf>
    {
        dirs::config_dir().map(|dir| dir.join("waste-classifier").join("config.toml"))
    }

    pub fn from_toml(content: &str) -> Result<Self>
    {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Loads an explicit config file. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self>
    {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {:?}: {}", path, e)))?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Loads the given file, or the default file if present, or defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self>
    {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    pub fn with_overrides(mut self, model_path: Option<PathBuf>, inference_timeout_ms: Option<u64>) -> Self
    {
        if let Some(model_path) = model_path {
            self.model_path = model_path;
        }
        if inference_timeout_ms.is_some() {
            self.inference_timeout_ms = inference_timeout_ms;
        }
        self
    }

    pub fn inference_timeout(&self) -> Option<Duration>
    {
        self.inference_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn empty_file_gives_defaults()
    {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(config.inference_timeout(), None);
    }

    #[test]
    fn reads_file_values()
    {
        let config = Config::from_toml(r#"
            model_path = "/opt/models/waste.onnx"
            inference_timeout_ms = 1500
        "#).unwrap();
        assert_eq!(config.model_path, PathBuf::from("/opt/models/waste.onnx"));
        assert_eq!(config.inference_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn rejects_unknown_and_malformed_values()
    {
        assert!(matches!(Config::from_toml("model = \"x.onnx\""), Err(Error::Config(_))));
        assert!(matches!(Config::from_toml("inference_timeout_ms = \"soon\""), Err(Error::Config(_))));
    }

    #[test]
    fn flags_override_file_values()
    {
        let config = Config {
            model_path: PathBuf::from("file.onnx"),
            inference_timeout_ms: Some(100),
        };

        let unchanged = config.clone().with_overrides(None, None);
        assert_eq!(unchanged, config);

        let overridden = config.with_overrides(Some(PathBuf::from("flag.onnx")), Some(5));
        assert_eq!(overridden.model_path, PathBuf::from("flag.onnx"));
        assert_eq!(overridden.inference_timeout_ms, Some(5));
    }

    #[test]
    fn explicit_file_must_exist()
    {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.toml");
        assert!(matches!(Config::load(Some(&missing)), Err(Error::Config(_))));

        std::fs::write(&missing, "model_path = \"m.onnx\"\n").unwrap();
        assert_eq!(Config::load(Some(&missing)).unwrap().model_path, PathBuf::from("m.onnx"));
    }
}
