use std::{cell::RefCell, rc::Rc};

use crate::{
  api::{Api, HttpApi},
  config::Config,
  project::ProjectCache,
  task::TaskCache,
  todo::TodoCache,
};

/// The three caches of one client session, sharing a single backend.
pub struct Stores {
  pub projects: Rc<RefCell<ProjectCache>>,
  pub tasks: Rc<RefCell<TaskCache>>,
  pub todos: Rc<RefCell<TodoCache>>,
}

impl Stores {
  pub fn new(config: &Config) -> Self {
    Self::with_api(Rc::new(HttpApi::new(config)))
  }

  pub fn with_api(api: Rc<dyn Api>) -> Self {
    let projects = Rc::new(RefCell::new(ProjectCache::new(Rc::clone(&api))));
    let tasks = Rc::new(RefCell::new(TaskCache::new(
      Rc::clone(&api),
      Rc::clone(&projects),
    )));
    let todos = Rc::new(RefCell::new(TodoCache::new(api)));

    Self {
      projects,
      tasks,
      todos,
    }
  }

  /// Loads the tasks of whichever project is selected right now.
  pub fn sync_tasks(&self) {
    self.tasks.borrow_mut().sync_with_selected_project();
  }
}
