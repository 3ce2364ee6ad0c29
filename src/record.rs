use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{error::Result, id::RecordId, traits::Indexable};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<RecordId>,
  #[serde(flatten)]
  pub fields: Map<String, Value>,
}

impl Indexable for Project {
  fn id(&self) -> Option<&RecordId> {
    self.id.as_ref()
  }
}

impl Project {
  pub fn new(name: &str) -> Self {
    let mut fields = Map::new();
    fields.insert("name".to_owned(), Value::from(name));
    Self { id: None, fields }
  }

  pub fn name(&self) -> Option<&str> {
    self.fields.get("name").and_then(Value::as_str)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<RecordId>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project: Option<RecordId>,
  #[serde(default, deserialize_with = "lenient_bool")]
  pub completed: bool,
  #[serde(default, deserialize_with = "lenient_bool")]
  pub archived: bool,
  #[serde(flatten)]
  pub fields: Map<String, Value>,
}

impl Indexable for Task {
  fn id(&self) -> Option<&RecordId> {
    self.id.as_ref()
  }
}

impl Task {
  pub fn new(project: RecordId, title: &str) -> Self {
    let mut fields = Map::new();
    fields.insert("title".to_owned(), Value::from(title));
    Self {
      id: None,
      project: Some(project),
      completed: false,
      archived: false,
      fields,
    }
  }

  pub fn title(&self) -> Option<&str> {
    self.fields.get("title").and_then(Value::as_str)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Todo {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<RecordId>,
  #[serde(default)]
  pub task: Option<RecordId>,
  #[serde(default, deserialize_with = "lenient_bool")]
  pub completed: bool,
  #[serde(flatten)]
  pub fields: Map<String, Value>,
}

impl Indexable for Todo {
  fn id(&self) -> Option<&RecordId> {
    self.id.as_ref()
  }
}

impl Todo {
  pub fn new(task: RecordId, title: &str) -> Self {
    let mut fields = Map::new();
    fields.insert("title".to_owned(), Value::from(title));
    Self {
      id: None,
      task: Some(task),
      completed: false,
      fields,
    }
  }

  pub fn title(&self) -> Option<&str> {
    self.fields.get("title").and_then(Value::as_str)
  }
}

/// JSON flags from SQL-backed servers often arrive as `0`/`1`, so flags
/// follow the usual truthiness rules instead of requiring a boolean.
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(truthy(&Value::deserialize(deserializer)?))
}

/// `null`, `false`, `0` and `""` are falsy; everything else is truthy.
pub fn truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(flag) => *flag,
    Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0 && !n.is_nan()),
    Value::String(text) => !text.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

/// Unwraps an `id` the backend sent as a sequence (`[42]`) to its first element.
pub fn normalize_id(record: &mut Value) {
  let first = match record.get_mut("id") {
    Some(Value::Array(items)) if !items.is_empty() => items.swap_remove(0),
    _ => return,
  };
  record["id"] = first;
}

/// Fills the fields a todo response may omit: a falsy or missing
/// `completed` becomes `false` and a falsy or missing `task` becomes `null`.
/// Truthy values are kept as sent.
pub fn apply_todo_defaults(record: &mut Value) {
  let Some(fields) = record.as_object_mut() else {
    return;
  };
  if !fields.get("completed").map_or(false, truthy) {
    fields.insert("completed".to_owned(), Value::Bool(false));
  }
  if !fields.get("task").map_or(false, truthy) {
    fields.insert("task".to_owned(), Value::Null);
  }
}

/// Lays `incoming` over `base`; keys present in both take the incoming value.
pub fn overlay(base: Value, incoming: Value) -> Value {
  match (base, incoming) {
    (Value::Object(mut fields), Value::Object(incoming)) => {
      fields.extend(incoming);
      Value::Object(fields)
    }
    (_, incoming) => incoming,
  }
}

pub(crate) fn encode<T: Serialize>(record: &T) -> Result<Value> {
  Ok(serde_json::to_value(record)?)
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
  Ok(serde_json::from_value(value)?)
}

/// Decodes a list response, unwrapping sequence ids of every element first.
pub(crate) fn decode_list<T: DeserializeOwned>(mut value: Value) -> Result<Vec<T>> {
  if let Value::Array(items) = &mut value {
    for item in items.iter_mut() {
      normalize_id(item);
    }
  }
  decode(value)
}
