use serde_json::Value;

use crate::error::Result;

/// CRUD surface of the backend. Paths are relative to the configured base URL
/// (`/projects`, `/tasks/project/1`, ...).
pub trait Api {
  fn get(&self, path: &str) -> Result<Value>;
  fn post(&self, path: &str, body: &Value) -> Result<Value>;
  fn put(&self, path: &str, body: &Value) -> Result<Value>;
  fn delete(&self, path: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  Get,
  Post,
  Put,
  Delete,
}

impl std::fmt::Display for Method {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      Method::Get => "GET",
      Method::Post => "POST",
      Method::Put => "PUT",
      Method::Delete => "DELETE",
    };
    write!(f, "{}", name)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
  pub method: Method,
  pub path: String,
  pub body: Option<Value>,
}
