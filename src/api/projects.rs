//! Project and milestone operations.

use tracing::{debug, info, instrument};

use super::client::Client;
use super::error::{ApiError, Result};
use super::request::{Method, Request};
use super::types::{Envelope, Milestone, NewProjectRequest, Project, ProjectUpdateRequest, Projects, User};

impl Client {
    /// Get all projects, private ones included.
    ///
    /// Calls `GET /api/2.0/project/filter.json?simple=true`.
    #[instrument(skip(self))]
    pub fn get_projects(&self) -> Result<Projects> {
        let projects = self
            .query::<Envelope<Projects>>(Request::new("/api/2.0/project/filter.json?simple=true"))?
            .into_inner();
        debug!("Fetched {} projects", projects.len());
        Ok(projects)
    }

    /// Get the milestones of a project.
    #[instrument(skip(self))]
    pub fn get_project_milestones(&self, project_id: i64) -> Result<Vec<Milestone>> {
        let path = format!("/api/2.0/project/{}/milestone", project_id);
        Ok(self.query::<Envelope<Vec<Milestone>>>(Request::new(path))?.into_inner())
    }

    /// Create a project.
    ///
    /// A project needs a responsible user. When `responsible_id` is empty the
    /// user whose email equals the login name is chosen, or the first listed
    /// user if nobody matches. Users without an ID are never chosen.
    #[instrument(skip(self, project), fields(title = %project.title))]
    pub fn create_project(&self, mut project: NewProjectRequest) -> Result<Project> {
        if project.responsible_id.is_empty() {
            let users = self.get_users()?;
            project.responsible_id = default_responsible(&users, &self.credentials().user)
                .ok_or(ApiError::NoUsers)?
                .to_string();
            debug!(responsible_id = %project.responsible_id, "Defaulted responsible user");
        }

        let request = Request::new("/api/2.0/project.json")
            .method(Method::Post)
            .json(&project)?;
        let created = self.query::<Envelope<Project>>(request)?.into_inner();
        info!(id = ?created.id, "Created project");
        Ok(created)
    }

    /// Update a project. Only the non-empty fields of `update` are changed.
    #[instrument(skip(self, update), fields(id = update.id))]
    pub fn update_project(&self, update: ProjectUpdateRequest) -> Result<Project> {
        let request = Request::new(format!("/api/2.0/project/{}.json", update.id))
            .method(Method::Put)
            .json(&update)?;
        Ok(self.query::<Envelope<Project>>(request)?.into_inner())
    }

    /// Delete a project, returning it as it was before deletion.
    #[instrument(skip(self))]
    pub fn delete_project(&self, id: i64) -> Result<Project> {
        let request = Request::new(format!("/api/2.0/project/{}.json", id)).method(Method::Delete);
        let deleted = self.query::<Envelope<Project>>(request)?.into_inner();
        info!("Deleted project");
        Ok(deleted)
    }
}

/// Pick the ID of the user whose email is `user_name`, falling back to the
/// first user.
/// The logged-in user if listed, else the first user. Users without an ID
/// cannot be assigned and are skipped.
fn default_responsible<'a>(users: &'a [User], user_name: &str) -> Option<&'a str> {
    let mut assignable = users.iter().filter_map(|u| u.id.as_deref().map(|id| (u, id)));
    let first = assignable.clone().next();
    assignable
        .find(|(u, _)| u.email.as_deref() == Some(user_name))
        .or(first)
        .map(|(_, id)| id)
}
