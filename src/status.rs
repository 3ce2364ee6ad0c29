use std::{cell::Cell, rc::Rc};

use log::error;

use crate::error::{Error, Result};

/// Handle on a cache's `loading` flag. It stays readable while the cache is
/// borrowed by the request it reports on.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Rc<Cell<bool>>);

impl LoadingFlag {
  pub fn get(&self) -> bool {
    self.0.get()
  }

  fn set(&self, loading: bool) {
    self.0.set(loading);
  }
}

/// In-flight state shared by every operation of one cache.
///
/// Overlapping operations overwrite each other's flag and message; the last
/// one to finish wins.
#[derive(Debug, Default)]
pub struct RequestStatus {
  loading: LoadingFlag,
  error: Option<String>,
}

impl RequestStatus {
  pub fn loading(&self) -> bool {
    self.loading.get()
  }

  pub fn loading_flag(&self) -> LoadingFlag {
    self.loading.clone()
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Runs one remote operation: raises `loading` and clears `error`, records
  /// a failure message, and always lowers `loading` afterwards.
  pub(crate) fn track<T, F>(&mut self, fallback: &str, op: F) -> Result<T>
  where
    F: FnOnce() -> Result<T>,
  {
    self.loading.set(true);
    self.error = None;

    let result = op();
    if let Err(err) = &result {
      error!("{}: {}", fallback, err);
      self.error = Some(describe(err, fallback));
    }

    self.loading.set(false);
    return result;
  }
}

fn describe(err: &Error, fallback: &str) -> String {
  let message = err.to_string();
  match message.trim().is_empty() {
    true => fallback.to_owned(),
    false => message,
  }
}
