mod api;
mod api_http;
mod api_scripted;

pub use api::{Api, Method, Request};
pub use api_http::HttpApi;
pub use api_scripted::ScriptedApi;
