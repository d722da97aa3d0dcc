//! Client library for the OnlyOffice project-management REST API.
//!
//! The [`Client`] logs in with a username and password, caches the issued
//! token and refreshes it when it expires, and exposes typed calls for
//! projects, milestones, tasks and users.
//!
//! ```no_run
//! use onlyoffice::{Client, Credentials};
//!
//! # fn main() -> onlyoffice::Result<()> {
//! let client = Client::new(Credentials::from_env())?;
//! for project in client.get_projects()?.iter() {
//!     println!("{}", project);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use api::{ApiError, ApiTime, Client, Credentials, Request, Result, Token};
