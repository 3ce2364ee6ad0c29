use std::{cell::RefCell, collections::VecDeque};

use serde_json::Value;

use super::api::{Api, Method, Request};
use crate::error::{Error, Result};

/// Stand-in backend that answers with queued responses, in order, and keeps
/// a log of every request it received.
#[derive(Default)]
pub struct ScriptedApi {
  responses: RefCell<VecDeque<Result<Value>>>,
  requests: RefCell<Vec<Request>>,
}

impl ScriptedApi {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn respond(&self, value: Value) -> &Self {
    self.responses.borrow_mut().push_back(Ok(value));
    self
  }

  pub fn fail(&self, err: Error) -> &Self {
    self.responses.borrow_mut().push_back(Err(err));
    self
  }

  pub fn requests(&self) -> Vec<Request> {
    self.requests.borrow().clone()
  }

  pub fn last_request(&self) -> Option<Request> {
    self.requests.borrow().last().cloned()
  }

  fn answer(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
    self.requests.borrow_mut().push(Request {
      method,
      path: path.to_owned(),
      body: body.cloned(),
    });

    match self.responses.borrow_mut().pop_front() {
      Some(response) => response,
      None => Err(Error::Transport(format!(
        "no scripted response for {} {}",
        method, path
      ))),
    }
  }
}

impl Api for ScriptedApi {
  fn get(&self, path: &str) -> Result<Value> {
    self.answer(Method::Get, path, None)
  }

  fn post(&self, path: &str, body: &Value) -> Result<Value> {
    self.answer(Method::Post, path, Some(body))
  }

  fn put(&self, path: &str, body: &Value) -> Result<Value> {
    self.answer(Method::Put, path, Some(body))
  }

  fn delete(&self, path: &str) -> Result<()> {
    self.answer(Method::Delete, path, None).map(|_| ())
  }
}
