//! OnlyOffice API request and response types.
//!
//! These types model the project-management part of the OnlyOffice REST API
//! (`/api/2.0/project`, `/api/2.0/people`). The server omits fields freely, so
//! every field of a response record is optional and a missing field decodes
//! to `None`.

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::time::ApiTime;

/// Timestamp carried inside response records (RFC 3339 with offset).
pub type Timestamp = DateTime<FixedOffset>;

/// The wrapper around every API response.
///
/// The metadata is decoded but callers normally only look at `response`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub status_code: Option<i64>,
    /// The actual payload.
    pub response: T,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, dropping the metadata.
    pub fn into_inner(self) -> T {
        self.response
    }
}

/// Edit and delete rights of the current user on a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Permissions {
    pub can_edit: Option<bool>,
    pub can_delete: Option<bool>,
}

/// An OnlyOffice project.
///
/// Returned by `GET /api/2.0/project/filter.json` and the project mutation
/// endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub security: Option<HashMap<String, bool>>,
    pub project_folder: Option<serde_json::Number>,
    pub description: Option<String>,
    pub status: Option<i64>,

    pub responsible_id: Option<String>,
    pub responsible: Option<User>,

    pub is_private: Option<bool>,

    pub task_count: Option<i64>,
    pub task_count_total: Option<i64>,
    pub milestone_count: Option<i64>,
    pub discussion_count: Option<i64>,
    pub participant_count: Option<i64>,
    pub time_tracking_total: Option<String>,
    pub documents_count: Option<i64>,

    pub is_follow: Option<bool>,

    pub created: Option<Timestamp>,
    pub created_by: Option<User>,
    pub created_by_id: Option<String>,
    pub updated: Option<Timestamp>,
    pub updated_by_id: Option<String>,

    #[serde(flatten)]
    pub permissions: Permissions,
}

/// Displays the project title.
impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title.as_deref().unwrap_or_default())
    }
}

/// A list of projects, as returned by the project filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Projects(pub Vec<Project>);

impl Projects {
    /// Find the first project with exactly this title.
    pub fn get(&self, title: &str) -> Option<&Project> {
        self.0.iter().find(|p| p.title.as_deref() == Some(title))
    }

    /// The projects as a plain vector.
    pub fn into_vec(self) -> Vec<Project> {
        self.0
    }
}

impl Deref for Projects {
    type Target = [Project];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Projects {
    type Item = Project;
    type IntoIter = std::vec::IntoIter<Project>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The project a task or milestone belongs to, in abbreviated form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectOwner {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub status: Option<i64>,
    pub is_private: Option<bool>,
}

/// A project milestone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Milestone {
    pub id: Option<i64>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub deadline: Option<Timestamp>,

    pub is_key: Option<bool>,
    pub is_notify: Option<bool>,

    pub project_owner: Option<ProjectOwner>,
    pub responsible: Option<User>,

    pub active_task_count: Option<i64>,
    pub closed_task_count: Option<i64>,
    pub status: Option<i64>,

    pub created: Option<Timestamp>,
    pub created_by: Option<User>,
    pub updated: Option<Timestamp>,

    #[serde(flatten)]
    pub permissions: Permissions,
}

/// A portal user.
///
/// Returned by `GET /api/2.0/people/filter.json` and embedded in projects,
/// tasks and milestones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub id: Option<String>,
    pub user_name: Option<String>,
    pub is_visitor: Option<bool>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub status: Option<i64>,
    pub activation_status: Option<i64>,
    /// Either a date or a flag depending on the portal version.
    pub terminated: Option<serde_json::Value>,
    pub department: Option<String>,
    pub work_from: Option<Timestamp>,
    pub display_name: Option<String>,
    pub avatar_medium: Option<String>,
    pub avatar: Option<String>,
    pub is_admin: Option<bool>,
    #[serde(rename = "isLDAP")]
    pub is_ldap: Option<bool>,
    pub list_admin_modules: Option<Vec<String>>,
    pub is_owner: Option<bool>,
    pub culture_name: Option<String>,
    #[serde(rename = "isSSO")]
    pub is_sso: Option<bool>,
    pub avatar_small: Option<String>,
    pub quota_limit: Option<i64>,
    pub used_space: Option<i64>,
    pub docs_space: Option<i64>,
    pub mail_space: Option<i64>,
    pub talk_space: Option<i64>,
    pub profile_url: Option<String>,
    pub title: Option<String>,
    pub sex: Option<String>,
    pub lead: Option<String>,
    pub birthday: Option<Timestamp>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub contacts: Option<Vec<Contact>>,
    pub groups: Option<Vec<Group>>,
}

/// A user contact entry (phone, skype, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub value: Option<String>,
}

/// A user group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub id: Option<String>,
    pub name: Option<String>,
    pub manager: Option<serde_json::Value>,
}

/// A project task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub start_date: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub description: Option<String>,
    /// High = 1, Normal = 0, Low = -1.
    pub priority: Option<i64>,
    pub project_owner: Option<ProjectOwner>,

    pub subtasks: Option<Vec<serde_json::Value>>,

    pub status: Option<TaskStatus>,

    pub created: Option<Timestamp>,
    pub created_by: Option<User>,
    pub created_by_id: Option<String>,

    pub updated: Option<Timestamp>,
    pub updated_by: Option<User>,
    pub updated_by_id: Option<String>,

    pub responsibles: Option<Vec<User>>,
    pub responsible_ids: Option<Vec<String>>,

    pub can_edit: Option<bool>,
    pub can_create_subtask: Option<bool>,
    pub can_create_time_spend: Option<bool>,
    pub can_delete: Option<bool>,
    pub can_read_files: Option<bool>,

    pub milestone_id: Option<i64>,
    pub milestone: Option<Milestone>,
}

/// Marker used to link a task to an issue in an external tracker.
const ISSUE_LINK_MARKER: &str = "URL:";

impl Task {
    /// The external issue link recorded on the last line of the description
    /// as `URL:<link>`, if any.
    pub fn issue_link(&self) -> Option<&str> {
        let description = self.description.as_deref()?;
        let last_line = description.rsplit('\n').next()?;
        let start = last_line.find(ISSUE_LINK_MARKER)?;
        let link = last_line[start + ISSUE_LINK_MARKER.len()..].trim();
        (!link.is_empty()).then_some(link)
    }

    /// The priority as a [`TaskPriority`], if it is one of the known levels.
    pub fn priority_level(&self) -> Option<TaskPriority> {
        self.priority.and_then(|p| TaskPriority::try_from(p).ok())
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum TaskPriority {
    High,
    #[default]
    Normal,
    Low,
}

impl From<TaskPriority> for i64 {
    fn from(priority: TaskPriority) -> Self {
        match priority {
            TaskPriority::High => 1,
            TaskPriority::Normal => 0,
            TaskPriority::Low => -1,
        }
    }
}

impl TryFrom<i64> for TaskPriority {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TaskPriority::High),
            0 => Ok(TaskPriority::Normal),
            -1 => Ok(TaskPriority::Low),
            other => Err(format!("unknown task priority {other}")),
        }
    }
}

/// Task status.
///
/// Portals can define custom statuses, which decode as `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TaskStatus {
    #[default]
    NotAccept,
    Open,
    Closed,
    Disable,
    Unclassified,
    NotInMilestone,
    Other(i64),
}

impl From<i64> for TaskStatus {
    fn from(value: i64) -> Self {
        match value {
            0 => TaskStatus::NotAccept,
            1 => TaskStatus::Open,
            2 => TaskStatus::Closed,
            3 => TaskStatus::Disable,
            4 => TaskStatus::Unclassified,
            5 => TaskStatus::NotInMilestone,
            other => TaskStatus::Other(other),
        }
    }
}

impl From<TaskStatus> for i64 {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::NotAccept => 0,
            TaskStatus::Open => 1,
            TaskStatus::Closed => 2,
            TaskStatus::Disable => 3,
            TaskStatus::Unclassified => 4,
            TaskStatus::NotInMilestone => 5,
            TaskStatus::Other(n) => n,
        }
    }
}

/// Body of `POST /api/2.0/project.json`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectRequest {
    pub title: String,
    pub description: String,
    /// Filled in from the user list by `create_project` when empty.
    pub responsible_id: String,
}

/// Body of `PUT /api/2.0/project/{id}.json`. Empty fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdateRequest {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub responsible_id: String,
}

/// Body of `POST /api/2.0/project/{projectId}/task.json`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectTaskRequest {
    pub title: String,
    pub description: String,
    pub notify: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<i64>,
    pub priority: TaskPriority,
    pub project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<ApiTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<ApiTime>,
    pub status: TaskStatus,
}

/// Body of `PUT /api/2.0/project/task/{id}.json`. Unset fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectTaskUpdateRequest {
    pub id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<ApiTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<ApiTime>,
    #[serde(rename = "projectID", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(rename = "milestoneid", skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<i64>,
    /// User IDs of the new responsibles.
    #[serde(rename = "responsibles", skip_serializing_if = "Vec::is_empty")]
    pub responsible_ids: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub notify: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// Query parameters of `GET /api/2.0/project/task/filter.json`.
///
/// Every field is sent, zero values included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGetTasksRequest {
    pub project_id: i64,
    pub count: i64,
    pub start_index: i64,
    pub sort_by: String,
    pub sort_order: String,
    pub simple: bool,
}

impl ProjectGetTasksRequest {
    /// A simple listing of up to 1000 tasks of a project, sorted by title.
    pub fn new(project_id: i64) -> Self {
        Self {
            project_id,
            count: 1000,
            start_index: 0,
            sort_by: "title".to_string(),
            sort_order: "ascending".to_string(),
            simple: true,
        }
    }
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}
