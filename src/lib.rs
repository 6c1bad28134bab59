#![doc = "The `task_manager_server` library crate."]
#![doc = ""]
#![doc = "This crate contains the document-store adapters, token authentication,"]
#![doc = "route handlers and error handling of the task manager backend."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

// The App itself is assembled in main.rs (and in tests) rather than exposed
// as a factory function here: the middleware stack changes the App's body
// type, which makes a named return type impractical.

pub use crate::error::AppError;
pub use crate::store::Store;
