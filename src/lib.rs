#![doc = "The `planboard` library crate."]
#![doc = ""]
#![doc = "Projects and tasks behind a JSON API. Callers authenticate with a signed bearer"]
#![doc = "token; every operation on a project or task is then checked against ownership,"]
#![doc = "with admins allowed everywhere. The binary (`main.rs`) only wires configuration,"]
#![doc = "stores and the HTTP server together."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod response;
pub mod routes;
pub mod store;

pub use crate::error::AppError;
pub use crate::routes::AppState;
