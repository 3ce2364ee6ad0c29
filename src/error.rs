#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The server answered with a non-success status.
  #[error("{message}")]
  Status { code: u16, message: String },

  #[error("{0}")]
  Transport(String),

  #[error("unexpected payload: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("record has no id")]
  MissingId,

  #[error("config: {0}")]
  Config(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
