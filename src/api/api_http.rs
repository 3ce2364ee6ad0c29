use log::debug;
use serde_json::Value;

use super::api::Api;
use crate::{
  config::Config,
  error::{Error, Result},
};

pub struct HttpApi {
  base_url: String,
  agent: ureq::Agent,
}

impl HttpApi {
  pub fn new(config: &Config) -> Self {
    Self {
      base_url: config.api_url.clone(),
      agent: ureq::AgentBuilder::new().build(),
    }
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }
}

impl Api for HttpApi {
  fn get(&self, path: &str) -> Result<Value> {
    let url = self.url(path);
    debug!("GET {}", url);
    let response = self.agent.get(&url).call().map_err(from_ureq)?;
    Ok(response.into_json()?)
  }

  fn post(&self, path: &str, body: &Value) -> Result<Value> {
    let url = self.url(path);
    debug!("POST {}", url);
    let response = self.agent.post(&url).send_json(body).map_err(from_ureq)?;
    Ok(response.into_json()?)
  }

  fn put(&self, path: &str, body: &Value) -> Result<Value> {
    let url = self.url(path);
    debug!("PUT {}", url);
    let response = self.agent.put(&url).send_json(body).map_err(from_ureq)?;
    Ok(response.into_json()?)
  }

  fn delete(&self, path: &str) -> Result<()> {
    let url = self.url(path);
    debug!("DELETE {}", url);
    self.agent.delete(&url).call().map_err(from_ureq)?;
    Ok(())
  }
}

fn from_ureq(err: ureq::Error) -> Error {
  match err {
    ureq::Error::Status(code, response) => {
      let status_text = response.status_text().to_owned();
      let body = response.into_string().unwrap_or_default();
      let message = match body.trim().is_empty() {
        true => status_text,
        false => body,
      };
      Error::Status { code, message }
    }
    ureq::Error::Transport(transport) => Error::Transport(transport.to_string()),
  }
}
