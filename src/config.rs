use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
  /// Base URL shared by the project, task and todo resources.
  pub api_url: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api_url: DEFAULT_API_URL.to_owned(),
    }
  }
}

impl Config {
  /// Reads `TASKSTORE_CONFIG` (a JSON file) and `API_URL` from the environment.
  pub fn load() -> Result<Self> {
    let config_file_path = std::env::var("TASKSTORE_CONFIG").ok().map(PathBuf::from);
    let api_url = std::env::var("API_URL").ok();
    return Self::from_sources(config_file_path.as_deref(), api_url);
  }

  /// An explicit `api_url` wins over the file, which wins over the default.
  pub fn from_sources(config_file_path: Option<&Path>, api_url: Option<String>) -> Result<Self> {
    let mut config = match config_file_path {
      Some(path) => {
        let file = std::fs::File::open(path)?;
        serde_json::from_reader(file)
          .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))?
      }
      None => Self::default(),
    };

    if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
      config.api_url = url;
    }

    config.api_url = config.api_url.trim().trim_end_matches('/').to_owned();
    if config.api_url.is_empty() {
      return Err(Error::Config("api_url is empty".to_owned()));
    }
    return Ok(config);
  }
}
