pub mod api;
pub mod collection;
pub mod config;
pub mod error;
pub mod id;
pub mod project;
pub mod record;
pub mod status;
pub mod stores;
pub mod task;
pub mod todo;
pub mod traits;
pub mod viewer;

pub use config::Config;
pub use error::{Error, Result};
pub use id::RecordId;
pub use record::{Project, Task, Todo};
pub use stores::Stores;
