use std::rc::Rc;

use clap::ArgMatches;
use taskstore::{viewer::Viewer, Config, Project, RecordId, Stores, Task, Todo};

fn main() {
  env_logger::init();

  let matches = clap::Command::new("taskstore")
    .arg_required_else_help(true)
    .subcommand(clap::Command::new("projects"))
    .subcommand(clap::Command::new("tasks").args(&[
      clap::Arg::new("project").long("project").takes_value(true),
      clap::Arg::new("show-completed").long("show-completed"),
      clap::Arg::new("show-archived").long("show-archived"),
    ]))
    .subcommand(clap::Command::new("todos").arg(clap::Arg::new("task_id").required(true).index(1)))
    .subcommand(clap::Command::new("add-project").arg(clap::Arg::new("name").required(true).index(1)))
    .subcommand(clap::Command::new("add-task").args(&[
      clap::Arg::new("project_id").required(true).index(1),
      clap::Arg::new("title").required(true).index(2),
    ]))
    .subcommand(clap::Command::new("add-todo").args(&[
      clap::Arg::new("task_id").required(true).index(1),
      clap::Arg::new("title").required(true).index(2),
    ]))
    .subcommand(clap::Command::new("toggle-todo").args(&[
      clap::Arg::new("task_id").required(true).index(1),
      clap::Arg::new("id").required(true).index(2),
    ]))
    .subcommand(clap::Command::new("delete-project").arg(clap::Arg::new("id").required(true).index(1)))
    .subcommand(clap::Command::new("delete-task").arg(clap::Arg::new("id").required(true).index(1)))
    .subcommand(clap::Command::new("delete-todo").arg(clap::Arg::new("id").required(true).index(1)))
    .get_matches();

  let config = match Config::load() {
    Ok(config) => config,
    Err(err) => {
      eprintln!("config err: {}", err);
      std::process::exit(1);
    }
  };

  let stores = Rc::new(Stores::new(&config));
  let viewer = Viewer::new(Rc::clone(&stores));

  if let Err(err) = run(&matches, &stores, &viewer) {
    eprintln!("{}", err);
    std::process::exit(1);
  }
}

fn run(matches: &ArgMatches, stores: &Stores, viewer: &Viewer) -> Result<(), String> {
  match matches.subcommand() {
    Some(("projects", _)) => {
      fetch_projects(stores)?;
      viewer.print_projects();
    }

    Some(("tasks", command_matches)) => {
      fetch_projects(stores)?;
      if let Some(project_id) = command_matches.value_of("project") {
        stores
          .projects
          .borrow_mut()
          .select(Some(RecordId::from(project_id)));
      }

      stores.sync_tasks();
      {
        let mut tasks = stores.tasks.borrow_mut();
        if let Some(err) = tasks.error() {
          return Err(format!("fetch tasks err: {}", err));
        }
        if command_matches.is_present("show-completed") {
          tasks.toggle_hide_completed();
        }
        if command_matches.is_present("show-archived") {
          tasks.toggle_hide_archived();
        }
      }
      viewer.print_tasks();
    }

    Some(("todos", command_matches)) => {
      let task_id = id_arg(command_matches, "task_id")?;
      fetch_todos(stores, &task_id)?;
      viewer.print_todos(&task_id);
    }

    Some(("add-project", command_matches)) => {
      let name = arg(command_matches, "name")?;
      let project = stores
        .projects
        .borrow_mut()
        .create(&Project::new(name))
        .map_err(|err| format!("create project err: {}", err))?;
      println!("project created:");
      println!("{}", taskstore::viewer::format_project(&project, false));
    }

    Some(("add-task", command_matches)) => {
      let project_id = id_arg(command_matches, "project_id")?;
      let title = arg(command_matches, "title")?;
      let task = stores
        .tasks
        .borrow_mut()
        .create(&Task::new(project_id, title))
        .map_err(|err| format!("create task err: {}", err))?;
      println!("task created:");
      println!("{}", taskstore::viewer::format_task(&task));
    }

    Some(("add-todo", command_matches)) => {
      let task_id = id_arg(command_matches, "task_id")?;
      let title = arg(command_matches, "title")?;
      let todo = stores
        .todos
        .borrow_mut()
        .create(&Todo::new(task_id, title))
        .map_err(|err| format!("create todo err: {}", err))?;
      println!("todo created:");
      println!("{}", taskstore::viewer::format_todo(&todo));
    }

    Some(("toggle-todo", command_matches)) => {
      let task_id = id_arg(command_matches, "task_id")?;
      let id = id_arg(command_matches, "id")?;
      fetch_todos(stores, &task_id)?;
      let toggled = stores
        .todos
        .borrow_mut()
        .toggle_completed(&id)
        .map_err(|err| format!("toggle todo err: {}", err))?;
      match toggled {
        Some(todo) => println!("{}", taskstore::viewer::format_todo(&todo)),
        None => return Err(format!("todo with id: {} not found", id)),
      }
    }

    Some(("delete-project", command_matches)) => {
      let id = id_arg(command_matches, "id")?;
      stores
        .projects
        .borrow_mut()
        .delete(&id)
        .map_err(|err| format!("delete project err: {}", err))?;
      println!("project {} deleted", id);
    }

    Some(("delete-task", command_matches)) => {
      let id = id_arg(command_matches, "id")?;
      stores
        .tasks
        .borrow_mut()
        .delete(&id)
        .map_err(|err| format!("delete task err: {}", err))?;
      println!("task {} deleted", id);
    }

    Some(("delete-todo", command_matches)) => {
      let id = id_arg(command_matches, "id")?;
      stores
        .todos
        .borrow_mut()
        .delete(&id)
        .map_err(|err| format!("delete todo err: {}", err))?;
      println!("todo {} deleted", id);
    }

    Some((subcmd, _)) => return Err(format!("unknown subcommand {}", subcmd)),
    None => return Err("subcommand not found".to_owned()),
  };

  return Ok(());
}

fn fetch_projects(stores: &Stores) -> Result<(), String> {
  let mut projects = stores.projects.borrow_mut();
  projects.fetch_all();
  match projects.error() {
    Some(err) => Err(format!("fetch projects err: {}", err)),
    None => Ok(()),
  }
}

fn fetch_todos(stores: &Stores, task_id: &RecordId) -> Result<(), String> {
  let mut todos = stores.todos.borrow_mut();
  match todos.fetch_for_task(task_id) {
    Some(_) => Ok(()),
    None => Err(format!(
      "fetch todos err: {}",
      todos.error().unwrap_or("unknown error")
    )),
  }
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, String> {
  matches
    .value_of(name)
    .ok_or(format!("missing argument: {}", name))
}

fn id_arg(matches: &ArgMatches, name: &str) -> Result<RecordId, String> {
  arg(matches, name).map(RecordId::from)
}
