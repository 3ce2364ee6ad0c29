use std::rc::Rc;

use log::debug;

use crate::{
  api::Api,
  collection::Collection,
  error::Result,
  id::RecordId,
  record::{decode, decode_list, encode, Project},
  status::{LoadingFlag, RequestStatus},
  traits::Indexable,
};

const PROJECTS_PATH: &str = "/projects";

/// Cached project list plus the currently selected project.
pub struct ProjectCache {
  api: Rc<dyn Api>,
  projects: Collection<Project>,
  selected_id: Option<RecordId>,
  status: RequestStatus,
}

impl ProjectCache {
  pub fn new(api: Rc<dyn Api>) -> Self {
    Self {
      api,
      projects: Collection::new(),
      selected_id: None,
      status: RequestStatus::default(),
    }
  }

  /// Replaces the cache with the server's list. Selects the first project
  /// when nothing is selected yet. Failures end up in `error()`.
  pub fn fetch_all(&mut self) {
    let _ = self.status.track("Failed to fetch projects", || {
      let projects: Vec<Project> = decode_list(self.api.get(PROJECTS_PATH)?)?;
      self.projects.replace_all(projects);

      if self.selected_id.is_none() {
        self.selected_id = self.projects.first().and_then(|p| p.id().cloned());
      }

      debug!(
        "fetched {} projects, selected: {:?}",
        self.projects.len(),
        self.selected_id
      );
      Ok(())
    });
  }

  pub fn create(&mut self, project: &Project) -> Result<Project> {
    self.status.track("Failed to create project", || {
      let created: Project = decode(self.api.post(PROJECTS_PATH, &encode(project)?)?)?;
      self.projects.add(created.clone());

      debug!("created project {:?}", created.id);
      Ok(created)
    })
  }

  /// Sends the full record and stores the server's copy in place of the
  /// entry with the same id.
  pub fn update(&mut self, project: &Project) -> Result<Project> {
    self.status.track("Failed to update project", || {
      let updated: Project = decode(self.api.put(PROJECTS_PATH, &encode(project)?)?)?;
      if let Some(id) = project.id() {
        self.projects.replace(id, updated.clone());
      }

      debug!("updated project {:?}", project.id);
      Ok(updated)
    })
  }

  /// Removes the project remotely and locally. A deleted selection falls
  /// back to the first remaining project, or to none.
  pub fn delete(&mut self, id: &RecordId) -> Result<()> {
    self.status.track("Failed to delete project", || {
      self.api.delete(&format!("{}/{}", PROJECTS_PATH, id))?;
      self.projects.remove(id);

      if self.selected_id.as_ref() == Some(id) {
        self.selected_id = self.projects.first().and_then(|p| p.id().cloned());
      }

      debug!("deleted project {}, selected: {:?}", id, self.selected_id);
      Ok(())
    })
  }

  /// Unchecked: an id that is not cached simply selects nothing.
  pub fn select(&mut self, id: Option<RecordId>) {
    self.selected_id = id;
  }

  pub fn by_id(&self, id: &RecordId) -> Option<&Project> {
    self.projects.get_by_id(id)
  }

  pub fn selected(&self) -> Option<&Project> {
    self
      .selected_id
      .as_ref()
      .and_then(|id| self.projects.get_by_id(id))
  }

  pub fn selected_id(&self) -> Option<&RecordId> {
    self.selected_id.as_ref()
  }

  pub fn projects(&self) -> &[Project] {
    self.projects.all()
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

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use serde_json::{json, Value};

  use super::ProjectCache;
  use crate::{
    api::{Api, Method, ScriptedApi},
    error::Error,
    id::RecordId,
    record::Project,
    status::LoadingFlag,
  };

  fn cache_with(api: &Rc<ScriptedApi>) -> ProjectCache {
    ProjectCache::new(api.clone())
  }

  fn fetched(api: &Rc<ScriptedApi>, projects: serde_json::Value) -> ProjectCache {
    api.respond(projects);
    let mut cache = cache_with(api);
    cache.fetch_all();
    cache
  }

  #[test]
  fn fetch_selects_first_project() {
    let api = Rc::new(ScriptedApi::new());
    let cache = fetched(&api, json!([{"id": 1}, {"id": 2}]));

    assert_eq!(cache.selected_id(), Some(&RecordId::from(1)));
    assert_eq!(cache.projects().len(), 2);
    assert_eq!(api.last_request().unwrap().path, "/projects");
    assert!(!cache.loading());
    assert_eq!(cache.error(), None);
  }

  #[test]
  fn fetch_keeps_existing_selection() {
    let api = Rc::new(ScriptedApi::new());
    api.respond(json!([{"id": 1}, {"id": 2}]));
    let mut cache = cache_with(&api);
    cache.select(Some(RecordId::from(2)));
    cache.fetch_all();

    assert_eq!(cache.selected_id(), Some(&RecordId::from(2)));
  }

  #[test]
  fn fetch_empty_list_selects_nothing() {
    let api = Rc::new(ScriptedApi::new());
    let cache = fetched(&api, json!([]));
    assert_eq!(cache.selected_id(), None);
  }

  #[test]
  fn fetch_failure_is_captured() {
    let api = Rc::new(ScriptedApi::new());
    let mut cache = fetched(&api, json!([{"id": 1}]));

    api.fail(Error::Transport("connection refused".to_owned()));
    cache.fetch_all();

    assert_eq!(cache.error(), Some("connection refused"));
    assert_eq!(cache.projects().len(), 1);
    assert!(!cache.loading());
  }

  #[test]
  fn fetch_failure_without_message_uses_default() {
    let api = Rc::new(ScriptedApi::new());
    api.fail(Error::Status {
      code: 502,
      message: String::new(),
    });
    let mut cache = cache_with(&api);
    cache.fetch_all();

    assert_eq!(cache.error(), Some("Failed to fetch projects"));
  }

  #[test]
  fn create_appends_server_record() {
    let api = Rc::new(ScriptedApi::new());
    let mut cache = fetched(&api, json!([{"id": 1, "name": "home"}]));

    api.respond(json!({"id": 2, "name": "work", "created": "today"}));
    let created = cache.create(&Project::new("work")).unwrap();

    assert_eq!(created.id, Some(RecordId::from(2)));
    assert_eq!(cache.projects().len(), 2);
    assert_eq!(cache.by_id(&RecordId::from(2)).unwrap().fields["created"], json!("today"));

    let request = api.last_request().unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.body, Some(json!({"name": "work"})));
  }

  #[test]
  fn create_failure_propagates() {
    let api = Rc::new(ScriptedApi::new());
    let mut cache = cache_with(&api);
    api.fail(Error::Status {
      code: 400,
      message: "name is required".to_owned(),
    });

    assert!(cache.create(&Project::new("")).is_err());
    assert_eq!(cache.error(), Some("name is required"));
    assert!(cache.projects().is_empty());
  }

  #[test]
  fn update_replaces_matching_entry() {
    let api = Rc::new(ScriptedApi::new());
    let mut cache = fetched(&api, json!([{"id": 1, "name": "home"}, {"id": 2, "name": "work"}]));

    let mut project = cache.by_id(&RecordId::from(1)).unwrap().clone();
    project.fields.insert("name".to_owned(), json!("house"));
    api.respond(json!({"id": 1, "name": "House"}));
    let updated = cache.update(&project).unwrap();

    assert_eq!(updated.name(), Some("House"));
    assert_eq!(cache.projects()[0].name(), Some("House"));
    assert_eq!(cache.projects()[1].name(), Some("work"));

    let request = api.last_request().unwrap();
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.path, "/projects");
  }

  #[test]
  fn delete_selected_falls_back_to_first_remaining() {
    let api = Rc::new(ScriptedApi::new());
    let mut cache = fetched(&api, json!([{"id": 1}, {"id": 2}]));

    api.respond(json!(null));
    cache.delete(&RecordId::from(1)).unwrap();

    assert!(cache.by_id(&RecordId::from(1)).is_none());
    assert_eq!(cache.selected_id(), Some(&RecordId::from(2)));
    assert_eq!(api.last_request().unwrap().path, "/projects/1");
  }

  #[test]
  fn delete_last_project_clears_selection() {
    let api = Rc::new(ScriptedApi::new());
    let mut cache = fetched(&api, json!([{"id": 1}]));

    api.respond(json!(null));
    cache.delete(&RecordId::from("1")).unwrap();

    assert!(cache.projects().is_empty());
    assert_eq!(cache.selected_id(), None);
  }

  #[test]
  fn delete_unselected_keeps_selection() {
    let api = Rc::new(ScriptedApi::new());
    let mut cache = fetched(&api, json!([{"id": 1}, {"id": 2}]));

    api.respond(json!(null));
    cache.delete(&RecordId::from(2)).unwrap();

    assert_eq!(cache.selected_id(), Some(&RecordId::from(1)));
  }

  #[test]
  fn delete_failure_keeps_cache() {
    let api = Rc::new(ScriptedApi::new());
    let mut cache = fetched(&api, json!([{"id": 1}]));

    api.fail(Error::Transport("timeout".to_owned()));
    assert!(cache.delete(&RecordId::from(1)).is_err());

    assert_eq!(cache.projects().len(), 1);
    assert_eq!(cache.error(), Some("timeout"));
  }

  #[test]
  fn lookups_are_loose() {
    let api = Rc::new(ScriptedApi::new());
    let mut cache = fetched(&api, json!([{"id": "1"}, {"id": 2}]));

    assert!(cache.by_id(&RecordId::from(1)).is_some());
    cache.select(Some(RecordId::from("2")));
    assert_eq!(cache.selected().unwrap().id, Some(RecordId::from(2)));
  }

  #[test]
  fn select_unknown_id_yields_no_project() {
    let api = Rc::new(ScriptedApi::new());
    let mut cache = fetched(&api, json!([{"id": 1}]));

    cache.select(Some(RecordId::from(99)));
    assert_eq!(cache.selected_id(), Some(&RecordId::from(99)));
    assert!(cache.selected().is_none());
  }

  #[test]
  fn fetch_unwraps_sequence_ids() {
    let api = Rc::new(ScriptedApi::new());
    let cache = fetched(&api, json!([{"id": [1], "name": "home"}, {"id": 2}]));

    assert_eq!(cache.error(), None);
    assert_eq!(cache.projects().len(), 2);
    assert_eq!(cache.selected_id(), Some(&RecordId::from(1)));
    assert_eq!(cache.by_id(&RecordId::from(1)).unwrap().name(), Some("home"));
  }

  #[test]
  fn update_failure_propagates() {
    let api = Rc::new(ScriptedApi::new());
    let mut cache = fetched(&api, json!([{"id": 1, "name": "home"}]));

    let mut project = cache.by_id(&RecordId::from(1)).unwrap().clone();
    project.fields.insert("name".to_owned(), json!("house"));
    api.fail(Error::Status {
      code: 409,
      message: "name taken".to_owned(),
    });

    assert!(cache.update(&project).is_err());
    assert_eq!(cache.error(), Some("name taken"));
    assert_eq!(cache.projects()[0].name(), Some("home"));
    assert!(!cache.loading());
  }

  struct WatchingApi {
    flag: RefCell<Option<LoadingFlag>>,
    seen: Cell<Option<bool>>,
  }

  impl Api for WatchingApi {
    fn get(&self, _path: &str) -> crate::error::Result<Value> {
      self.seen.set(self.flag.borrow().as_ref().map(LoadingFlag::get));
      Ok(json!([{"id": 1}]))
    }

    fn post(&self, path: &str, _body: &Value) -> crate::error::Result<Value> {
      Err(Error::Transport(format!("unexpected POST {}", path)))
    }

    fn put(&self, path: &str, _body: &Value) -> crate::error::Result<Value> {
      Err(Error::Transport(format!("unexpected PUT {}", path)))
    }

    fn delete(&self, path: &str) -> crate::error::Result<()> {
      Err(Error::Transport(format!("unexpected DELETE {}", path)))
    }
  }

  #[test]
  fn loading_is_visible_during_fetch() {
    let api = Rc::new(WatchingApi {
      flag: RefCell::new(None),
      seen: Cell::new(None),
    });
    let mut cache = ProjectCache::new(api.clone());
    *api.flag.borrow_mut() = Some(cache.loading_flag());

    cache.fetch_all();

    assert_eq!(api.seen.get(), Some(true));
    assert!(!cache.loading());
    assert!(!cache.loading_flag().get());
  }
}
