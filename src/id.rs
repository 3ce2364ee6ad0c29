use std::hash::{Hash, Hasher};

/// Identifier of a server-owned record.
///
/// The backend is not consistent about id types: the same logical id may show
/// up as `42` in one payload and `"42"` in another. Equality and hashing go
/// through a canonical key, so both spellings refer to the same record.
/// Only the canonical decimal spelling of an integer matches it: `"07"` is a
/// text id of its own and equals neither `7` nor `"7"`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RecordId {
  Int(i64),
  Text(String),
}

#[derive(PartialEq, Eq, Hash)]
enum Key<'a> {
  Int(i64),
  Text(&'a str),
}

impl RecordId {
  fn key(&self) -> Key<'_> {
    match self {
      RecordId::Int(number) => Key::Int(*number),
      RecordId::Text(text) => match text.parse::<i64>() {
        Ok(number) if number.to_string() == *text => Key::Int(number),
        _ => Key::Text(text.as_str()),
      },
    }
  }
}

impl PartialEq for RecordId {
  fn eq(&self, other: &Self) -> bool {
    self.key() == other.key()
  }
}

impl Eq for RecordId {}

impl Hash for RecordId {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.key().hash(state);
  }
}

impl std::fmt::Display for RecordId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      RecordId::Int(number) => write!(f, "{}", number),
      RecordId::Text(text) => write!(f, "{}", text),
    }
  }
}

impl From<i64> for RecordId {
  fn from(number: i64) -> Self {
    RecordId::Int(number)
  }
}

impl From<&str> for RecordId {
  fn from(text: &str) -> Self {
    RecordId::Text(text.to_owned())
  }
}

impl From<String> for RecordId {
  fn from(text: String) -> Self {
    RecordId::Text(text)
  }
}
