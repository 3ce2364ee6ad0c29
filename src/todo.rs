use std::rc::Rc;

use log::{debug, error};
use serde_json::Value;

use crate::{
  api::Api,
  collection::Collection,
  error::{Error, Result},
  id::RecordId,
  record::{apply_todo_defaults, decode, decode_list, encode, normalize_id, overlay, Todo},
  status::{LoadingFlag, RequestStatus},
  traits::Indexable,
};

const TODOS_PATH: &str = "/todos";

/// Todos of any number of tasks. Unlike projects and tasks, a fetch only
/// refreshes the todos of the task it was made for.
pub struct TodoCache {
  api: Rc<dyn Api>,
  todos: Collection<Todo>,
  status: RequestStatus,
}

/// Builds the record to cache from what was sent and what came back.
fn incoming(local: Value, mut response: Value) -> Result<Todo> {
  normalize_id(&mut response);
  apply_todo_defaults(&mut response);
  decode(overlay(local, response))
}

impl TodoCache {
  pub fn new(api: Rc<dyn Api>) -> Self {
    Self {
      api,
      todos: Collection::new(),
      status: RequestStatus::default(),
    }
  }

  /// Swaps the cached todos of `task_id` for the server's list and returns
  /// it; todos of other tasks stay. `None` when the fetch failed.
  pub fn fetch_for_task(&mut self, task_id: &RecordId) -> Option<Vec<Todo>> {
    self
      .status
      .track("Failed to fetch todos", || {
        let path = format!("{}/task/{}", TODOS_PATH, task_id);
        let fetched: Vec<Todo> = decode_list(self.api.get(&path)?)?;

        self.todos.retain(|todo| todo.task.as_ref() != Some(task_id));
        for todo in fetched.iter() {
          self.todos.add(todo.clone());
        }

        debug!("fetched {} todos for task {}", fetched.len(), task_id);
        Ok(fetched)
      })
      .ok()
  }

  pub fn create(&mut self, todo: &Todo) -> Result<Todo> {
    self.status.track("Failed to create todo", || {
      let local = encode(todo)?;
      let response = self.api.post(TODOS_PATH, &local)?;
      let created = incoming(local, response)?;
      self.todos.add(created.clone());

      debug!("created todo {:?}", created.id);
      Ok(created)
    })
  }

  pub fn update(&mut self, todo: &Todo) -> Result<Todo> {
    self.status.track("Failed to update todo", || {
      let id = todo.id().cloned().ok_or(Error::MissingId)?;
      let local = encode(todo)?;
      let response = self.api.put(&format!("{}/{}", TODOS_PATH, id), &local)?;
      let updated = incoming(local, response)?;
      self.todos.replace(&id, updated.clone());

      debug!("updated todo {}", id);
      Ok(updated)
    })
  }

  pub fn delete(&mut self, id: &RecordId) -> Result<()> {
    self.status.track("Failed to delete todo", || {
      self.api.delete(&format!("{}/{}", TODOS_PATH, id))?;
      self.todos.remove(id);

      debug!("deleted todo {}", id);
      Ok(())
    })
  }

  /// Re-sends the todo with `completed` flipped. Unknown ids are ignored
  /// without a request.
  pub fn toggle_completed(&mut self, id: &RecordId) -> Result<Option<Todo>> {
    let Some(todo) = self.todos.get_by_id(id) else {
      debug!("toggle skipped, todo {} is not cached", id);
      return Ok(None);
    };

    let mut toggled = todo.clone();
    toggled.completed = !toggled.completed;

    match self.update(&toggled) {
      Ok(updated) => Ok(Some(updated)),
      Err(err) => {
        error!("error toggling todo completion: {}", err);
        Err(err)
      }
    }
  }

  pub fn todos_for_task(&self, task_id: &RecordId) -> Vec<&Todo> {
    self
      .todos
      .all()
      .iter()
      .filter(|todo| todo.task.as_ref() == Some(task_id))
      .collect()
  }

  pub fn by_id(&self, id: &RecordId) -> Option<&Todo> {
    self.todos.get_by_id(id)
  }

  pub fn todos(&self) -> &[Todo] {
    self.todos.all()
  }

  pub fn loading(&self) -> bool {
    self.status.loading()
  }

  /// Readable while a request on this cache is still running.
  pub fn loading_flag(&self) -> LoadingFlag {
    self.status.loading_flag()
  }

  pub fn error(&self) -> Option<&str> {
    self.status.error()
  }
}
