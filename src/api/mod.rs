//! OnlyOffice API client and types.
//!
//! This module provides the interface for communicating with the OnlyOffice
//! project-management REST API.

mod auth;
mod client;
pub mod error;
mod people;
mod projects;
mod request;
mod tasks;
pub mod time;
pub mod types;

pub use auth::{Credentials, Token, ENV_PASSWORD, ENV_URL, ENV_USER};
pub use client::{Client, ClientBuilder, AUTH_PATH};
pub use error::{ApiError, Result};
pub use request::{Body, Method, Request};
pub use time::{ApiTime, TimeParseError};
pub use types::{
    Contact, Envelope, Group, Milestone, NewProjectRequest, Permissions, Project, ProjectGetTasksRequest,
    ProjectOwner, ProjectTaskUpdateRequest, Projects, Task, TaskPriority, TaskStatus, User,
    NewProjectTaskRequest, ProjectUpdateRequest,
};
