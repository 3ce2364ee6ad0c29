use std::{cell::RefCell, rc::Rc};

use log::debug;

use crate::{
  api::Api,
  collection::Collection,
  error::{Error, Result},
  id::RecordId,
  project::ProjectCache,
  record::{decode, decode_list, encode, normalize_id, overlay, Task},
  status::{LoadingFlag, RequestStatus},
  traits::Indexable,
};

const TASKS_PATH: &str = "/tasks";

/// Which tasks the filtered view leaves out. A task is hidden when any
/// active filter matches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TaskFilters {
  pub hide_completed: bool,
  pub hide_archived: bool,
}

impl Default for TaskFilters {
  fn default() -> Self {
    Self {
      hide_completed: true,
      hide_archived: true,
    }
  }
}

impl TaskFilters {
  pub fn hides(&self, task: &Task) -> bool {
    (self.hide_completed && task.completed) || (self.hide_archived && task.archived)
  }
}

/// Tasks whose `project` matches `project_id`, in collection order.
/// Without a project there is nothing to show.
pub fn project_tasks<'a>(tasks: &'a [Task], project_id: Option<&RecordId>) -> Vec<&'a Task> {
  let Some(project_id) = project_id else {
    return Vec::new();
  };
  tasks
    .iter()
    .filter(|task| task.project.as_ref() == Some(project_id))
    .collect()
}

pub fn visible_tasks<'a>(
  tasks: &'a [Task],
  project_id: Option<&RecordId>,
  filters: &TaskFilters,
) -> Vec<&'a Task> {
  project_tasks(tasks, project_id)
    .into_iter()
    .filter(|task| !filters.hides(task))
    .collect()
}

pub fn hidden_count(tasks: &[Task], project_id: Option<&RecordId>, filters: &TaskFilters) -> usize {
  project_tasks(tasks, project_id).len() - visible_tasks(tasks, project_id, filters).len()
}

/// Task cache for the selected project.
///
/// Views read the project selection through the shared `ProjectCache` handle
/// each time they are evaluated, so they never lag behind it. They are
/// recomputed on every call and hold no state of their own.
pub struct TaskCache {
  api: Rc<dyn Api>,
  projects: Rc<RefCell<ProjectCache>>,
  tasks: Collection<Task>,
  selected_id: Option<RecordId>,
  filters: TaskFilters,
  status: RequestStatus,
}

impl TaskCache {
  pub fn new(api: Rc<dyn Api>, projects: Rc<RefCell<ProjectCache>>) -> Self {
    Self {
      api,
      projects,
      tasks: Collection::new(),
      selected_id: None,
      filters: TaskFilters::default(),
      status: RequestStatus::default(),
    }
  }

  /// Replaces the whole cache with the tasks of one project and clears the
  /// task selection. Failures end up in `error()`.
  pub fn fetch_for_project(&mut self, project_id: &RecordId) {
    let _ = self.status.track("Failed to fetch tasks", || {
      let path = format!("{}/project/{}", TASKS_PATH, project_id);
      let tasks: Vec<Task> = decode_list(self.api.get(&path)?)?;
      self.tasks.replace_all(tasks);
      self.selected_id = None;

      debug!("fetched {} tasks for project {}", self.tasks.len(), project_id);
      Ok(())
    });
  }

  pub fn create(&mut self, task: &Task) -> Result<Task> {
    self.status.track("Failed to create task", || {
      let mut response = self.api.post(TASKS_PATH, &encode(task)?)?;
      normalize_id(&mut response);
      let created: Task = decode(response)?;
      self.tasks.add(created.clone());

      debug!("created task {:?}", created.id);
      Ok(created)
    })
  }

  /// Stores the local record with the server's response laid over it.
  pub fn update(&mut self, task: &Task) -> Result<Task> {
    self.status.track("Failed to update task", || {
      let id = task.id().cloned().ok_or(Error::MissingId)?;
      let local = encode(task)?;
      let mut response = self.api.put(&format!("{}/{}", TASKS_PATH, id), &local)?;
      normalize_id(&mut response);
      let updated: Task = decode(overlay(local, response))?;
      self.tasks.replace(&id, updated.clone());

      debug!("updated task {}", id);
      Ok(updated)
    })
  }

  pub fn delete(&mut self, id: &RecordId) -> Result<()> {
    self.status.track("Failed to delete task", || {
      self.api.delete(&format!("{}/{}", TASKS_PATH, id))?;
      self.tasks.remove(id);

      if self.selected_id.as_ref() == Some(id) {
        self.selected_id = None;
      }

      debug!("deleted task {}", id);
      Ok(())
    })
  }

  pub fn select(&mut self, id: Option<RecordId>) {
    self.selected_id = id;
  }

  pub fn by_id(&self, id: &RecordId) -> Option<&Task> {
    self.tasks.get_by_id(id)
  }

  pub fn selected(&self) -> Option<&Task> {
    self
      .selected_id
      .as_ref()
      .and_then(|id| self.tasks.get_by_id(id))
  }

  pub fn selected_id(&self) -> Option<&RecordId> {
    self.selected_id.as_ref()
  }

  pub fn tasks(&self) -> &[Task] {
    self.tasks.all()
  }

  fn selected_project_id(&self) -> Option<RecordId> {
    self.projects.borrow().selected_id().cloned()
  }

  pub fn current_project_tasks(&self) -> Vec<&Task> {
    let project_id = self.selected_project_id();
    project_tasks(self.tasks.all(), project_id.as_ref())
  }

  pub fn filtered_tasks(&self) -> Vec<&Task> {
    let project_id = self.selected_project_id();
    visible_tasks(self.tasks.all(), project_id.as_ref(), &self.filters)
  }

  pub fn hidden_count(&self) -> usize {
    let project_id = self.selected_project_id();
    hidden_count(self.tasks.all(), project_id.as_ref(), &self.filters)
  }

  pub fn filters(&self) -> TaskFilters {
    self.filters
  }

  pub fn toggle_hide_completed(&mut self) {
    self.filters.hide_completed = !self.filters.hide_completed;
  }

  pub fn toggle_hide_archived(&mut self) {
    self.filters.hide_archived = !self.filters.hide_archived;
  }

  /// Turns both filters off. This is not the same as the defaults, which
  /// hide completed and archived tasks.
  pub fn reset_filters(&mut self) {
    self.filters.hide_completed = false;
    self.filters.hide_archived = false;
  }

  /// Fetches tasks for the project currently selected in the project cache.
  /// With no selection the cache is left as it is.
  pub fn sync_with_selected_project(&mut self) {
    match self.selected_project_id() {
      Some(project_id) => self.fetch_for_project(&project_id),
      None => debug!(
        "no project selected, keeping {} cached tasks",
        self.tasks.len()
      ),
    }
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
