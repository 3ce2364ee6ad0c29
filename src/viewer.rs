use std::rc::Rc;

use colored::Colorize;

use crate::{
  id::RecordId,
  record::{Project, Task, Todo},
  stores::Stores,
};

const UNTITLED: &str = "<untitled>";

pub struct Viewer {
  stores: Rc<Stores>,
}

impl Viewer {
  pub fn new(stores: Rc<Stores>) -> Self {
    Self { stores }
  }

  pub fn print_projects(&self) {
    let projects = self.stores.projects.borrow();
    if projects.projects().is_empty() {
      println!("no projects to show");
      return;
    }

    let selected_id = projects.selected_id();
    for project in projects.projects() {
      let is_selected = selected_id.is_some() && project.id.as_ref() == selected_id;
      println!("{}", format_project(project, is_selected));
    }
  }

  pub fn print_tasks(&self) {
    let projects = self.stores.projects.borrow();
    let tasks = self.stores.tasks.borrow();

    match projects.selected() {
      Some(project) => println!("{}", format_project(project, true)),
      None => {
        println!("no project selected");
        return;
      }
    }

    let visible = tasks.filtered_tasks();
    if visible.is_empty() {
      println!("    no tasks to show");
    }
    for task in visible {
      println!("    {}", format_task(task));
    }

    let hidden = tasks.hidden_count();
    if hidden > 0 {
      println!("{}", format!("    {} hidden", hidden).dimmed());
    }
  }

  pub fn print_todos(&self, task_id: &RecordId) {
    let todos = self.stores.todos.borrow();
    let for_task = todos.todos_for_task(task_id);
    if for_task.is_empty() {
      println!("no todos for task {}", task_id);
      return;
    }
    for todo in for_task {
      println!("{}", format_todo(todo));
    }
  }
}

fn format_id(id: Option<&RecordId>) -> String {
  match id {
    Some(id) => id.to_string(),
    None => "-".to_owned(),
  }
}

pub fn format_project(project: &Project, is_selected: bool) -> String {
  let marker = match is_selected {
    true => "*",
    false => " ",
  };
  let name = project.name().unwrap_or(UNTITLED);
  let name = match is_selected {
    true => name.bold().cyan(),
    false => name.normal(),
  };
  format!("{} {:>6}  {}", marker, format_id(project.id.as_ref()), name)
}

pub fn format_task(task: &Task) -> String {
  let mut line = format!(
    "{} {:>6}  {}",
    checkbox(task.completed),
    format_id(task.id.as_ref()),
    task.title().unwrap_or(UNTITLED)
  );
  if task.archived {
    line = format!("{} {}", line, "(archived)".yellow());
  }
  return line;
}

pub fn format_todo(todo: &Todo) -> String {
  let line = format!(
    "{} {:>6}  {}",
    checkbox(todo.completed),
    format_id(todo.id.as_ref()),
    todo.title().unwrap_or(UNTITLED)
  );
  match todo.completed {
    true => line.dimmed().to_string(),
    false => line,
  }
}

fn checkbox(completed: bool) -> &'static str {
  match completed {
    true => "[x]",
    false => "[ ]",
  }
}
