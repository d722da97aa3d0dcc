//! Task operations.

use tracing::{debug, instrument};

use super::client::Client;
use super::error::Result;
use super::request::{Method, Request};
use super::types::{Envelope, NewProjectTaskRequest, ProjectGetTasksRequest, ProjectTaskUpdateRequest, Task};

impl Client {
    /// Get the tasks of the project named in `filter`.
    ///
    /// Calls `GET /api/2.0/project/task/filter.json` with `filter` as query
    /// parameters.
    #[instrument(skip(self, filter), fields(project_id = filter.project_id))]
    pub fn get_tasks(&self, filter: &ProjectGetTasksRequest) -> Result<Vec<Task>> {
        let request = Request::new("/api/2.0/project/task/filter.json")
            .params(filter)?
            .debug();
        let tasks = self.query::<Envelope<Vec<Task>>>(request)?.into_inner();
        debug!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    /// Create a task in `task.project_id`.
    #[instrument(skip(self, task), fields(project_id = task.project_id))]
    pub fn create_project_task(&self, task: NewProjectTaskRequest) -> Result<Task> {
        let request = Request::new(format!("/api/2.0/project/{}/task.json", task.project_id))
            .method(Method::Post)
            .json(&task)?;
        Ok(self.query::<Envelope<Task>>(request)?.into_inner())
    }

    /// Update a task. Unset fields of `update` are left unchanged.
    #[instrument(skip(self, update), fields(id = update.id))]
    pub fn update_project_task(&self, update: ProjectTaskUpdateRequest) -> Result<Task> {
        let request = Request::new(format!("/api/2.0/project/task/{}.json", update.id))
            .method(Method::Put)
            .json(&update)?
            .debug();
        Ok(self.query::<Envelope<Task>>(request)?.into_inner())
    }
}
