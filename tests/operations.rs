//! Domain operations against a live mock portal.

mod common;

use chrono::{TimeZone, Utc};
use serde_json::json;

use onlyoffice::api::{
    NewProjectRequest, NewProjectTaskRequest, ProjectGetTasksRequest, ProjectTaskUpdateRequest,
    ProjectUpdateRequest, TaskPriority, TaskStatus,
};
use onlyoffice::{ApiError, ApiTime};

use common::{MockPortal, USER};

const USERS_PATH: &str = "/api/2.0/people/filter.json";

fn users() -> serde_json::Value {
    json!([
        {"id": "u-1", "displayName": "First", "email": "first@example.com"},
        {"id": "u-2", "displayName": "Me", "email": USER},
    ])
}

#[test]
fn get_projects_decodes_list() {
    let portal = MockPortal::start();
    portal.respond(
        "GET",
        "/api/2.0/project/filter.json",
        json!([
            {"id": 1, "title": "X", "canEdit": true},
            {"id": 2, "title": "Y", "created": "2024-03-05T10:20:30.0000000+01:00"},
        ]),
    );

    let client = portal.client();
    let projects = client.get_projects().unwrap();

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].id, Some(1));
    assert_eq!(projects[0].permissions.can_edit, Some(true));
    assert_eq!(projects.get("Y").and_then(|p| p.id), Some(2));
    assert!(projects.get("Z").is_none());

    let request = &portal.api_requests()[0];
    assert_eq!(request.method, "GET");
    assert_eq!(request.query.as_deref(), Some("simple=true"));
}

#[test]
fn get_projects_empty_list() {
    let portal = MockPortal::start();
    portal.respond("GET", "/api/2.0/project/filter.json", json!([]));

    let projects = portal.client().get_projects().unwrap();
    assert!(projects.is_empty());
}

#[test]
fn get_project_milestones() {
    let portal = MockPortal::start();
    portal.respond(
        "GET",
        "/api/2.0/project/7/milestone",
        json!([{"id": 3, "title": "Beta", "isKey": true, "projectOwner": {"id": 7, "title": "X"}}]),
    );

    let milestones = portal.client().get_project_milestones(7).unwrap();

    assert_eq!(milestones.len(), 1);
    assert_eq!(milestones[0].title.as_deref(), Some("Beta"));
    assert_eq!(milestones[0].is_key, Some(true));
    assert_eq!(
        milestones[0].project_owner.as_ref().and_then(|o| o.id),
        Some(7)
    );
}

#[test]
fn get_users_decodes_list() {
    let portal = MockPortal::start();
    portal.respond("GET", USERS_PATH, users());

    let users = portal.client().get_users().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].email.as_deref(), Some(USER));
    assert_eq!(users[1].display_name.as_deref(), Some("Me"));
}

#[test]
fn create_project_defaults_to_matching_user() {
    let portal = MockPortal::start();
    portal.respond("GET", USERS_PATH, users());
    portal.respond("POST", "/api/2.0/project.json", json!({"id": 9, "title": "New"}));

    let created = portal
        .client()
        .create_project(NewProjectRequest {
            title: "New".to_string(),
            description: "Desc".to_string(),
            ..NewProjectRequest::default()
        })
        .unwrap();
    assert_eq!(created.id, Some(9));

    let requests = portal.api_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, USERS_PATH);
    assert_eq!(
        requests[1].json(),
        json!({"title": "New", "description": "Desc", "responsibleId": "u-2"})
    );
}

#[test]
fn create_project_falls_back_to_first_user() {
    let portal = MockPortal::start();
    portal.respond("GET", USERS_PATH, json!([{"id": "u-1"}, {"id": "u-3"}]));
    portal.respond("POST", "/api/2.0/project.json", json!({"id": 9}));

    portal
        .client()
        .create_project(NewProjectRequest {
            title: "New".to_string(),
            ..NewProjectRequest::default()
        })
        .unwrap();

    let post = &portal.api_requests()[1];
    assert_eq!(post.json()["responsibleId"], "u-1");
}

#[test]
fn create_project_without_users_fails() {
    let portal = MockPortal::start();
    portal.respond("GET", USERS_PATH, json!([]));
    portal.respond("POST", "/api/2.0/project.json", json!({"id": 9}));

    let err = portal
        .client()
        .create_project(NewProjectRequest {
            title: "New".to_string(),
            ..NewProjectRequest::default()
        })
        .unwrap_err();

    assert!(matches!(err, ApiError::NoUsers));
    assert!(portal.api_requests().iter().all(|r| r.method != "POST"));
}

#[test]
fn create_project_keeps_explicit_responsible() {
    let portal = MockPortal::start();
    portal.respond("POST", "/api/2.0/project.json", json!({"id": 9}));

    portal
        .client()
        .create_project(NewProjectRequest {
            title: "New".to_string(),
            description: String::new(),
            responsible_id: "u-7".to_string(),
        })
        .unwrap();

    let requests = portal.api_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].json()["responsibleId"], "u-7");
}

#[test]
fn update_project_sends_only_set_fields() {
    let portal = MockPortal::start();
    portal.respond("PUT", "/api/2.0/project/5.json", json!({"id": 5, "title": "Renamed"}));

    let updated = portal
        .client()
        .update_project(ProjectUpdateRequest {
            id: 5,
            title: "Renamed".to_string(),
            ..ProjectUpdateRequest::default()
        })
        .unwrap();
    assert_eq!(updated.title.as_deref(), Some("Renamed"));

    let request = &portal.api_requests()[0];
    assert_eq!(request.json(), json!({"id": 5, "title": "Renamed"}));
}

#[test]
fn delete_project_returns_removed_project() {
    let portal = MockPortal::start();
    portal.respond("DELETE", "/api/2.0/project/5.json", json!({"id": 5, "title": "Gone"}));

    let deleted = portal.client().delete_project(5).unwrap();
    assert_eq!(deleted.title.as_deref(), Some("Gone"));
    assert_eq!(portal.api_requests()[0].method, "DELETE");
}

#[test]
fn delete_missing_project_reports_status() {
    let portal = MockPortal::start();

    let err = portal.client().delete_project(404).unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
}

#[test]
fn get_tasks_sends_filter_as_query() {
    let portal = MockPortal::start();
    portal.respond(
        "GET",
        "/api/2.0/project/task/filter.json",
        json!([{"id": 100, "title": "Fix", "status": 1, "priority": 1}]),
    );

    let tasks = portal
        .client()
        .get_tasks(&ProjectGetTasksRequest::new(12))
        .unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, Some(TaskStatus::Open));
    assert_eq!(tasks[0].priority_level(), Some(TaskPriority::High));
    assert_eq!(
        portal.api_requests()[0].query.as_deref(),
        Some("projectId=12&count=1000&startIndex=0&sortBy=title&sortOrder=ascending&simple=true")
    );
}

#[test]
fn create_project_task_posts_to_project() {
    let portal = MockPortal::start();
    portal.respond("POST", "/api/2.0/project/12/task.json", json!({"id": 100, "title": "Fix"}));

    let deadline = ApiTime::from(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    let task = portal
        .client()
        .create_project_task(NewProjectTaskRequest {
            title: "Fix".to_string(),
            project_id: 12,
            priority: TaskPriority::Low,
            deadline: Some(deadline),
            ..NewProjectTaskRequest::default()
        })
        .unwrap();
    assert_eq!(task.id, Some(100));

    let body = portal.api_requests()[0].json();
    assert_eq!(body["title"], "Fix");
    assert_eq!(body["projectId"], 12);
    assert_eq!(body["priority"], -1);
    assert_eq!(body["status"], 0);
    assert_eq!(body["deadline"], "2024-06-01T00:00:00");
    assert!(body.get("milestoneId").is_none());
    assert!(body.get("startDate").is_none());
}

#[test]
fn update_project_task_uses_portal_field_names() {
    let portal = MockPortal::start();
    portal.respond("PUT", "/api/2.0/project/task/100.json", json!({"id": 100, "status": 2}));

    let task = portal
        .client()
        .update_project_task(ProjectTaskUpdateRequest {
            id: 100,
            project_id: Some(12),
            milestone_id: Some(3),
            responsible_ids: vec!["u-2".to_string()],
            status: Some(TaskStatus::Closed),
            ..ProjectTaskUpdateRequest::default()
        })
        .unwrap();
    assert_eq!(task.status, Some(TaskStatus::Closed));

    let request = &portal.api_requests()[0];
    assert_eq!(request.method, "PUT");
    assert_eq!(
        request.json(),
        json!({
            "id": 100,
            "projectID": 12,
            "milestoneid": 3,
            "responsibles": ["u-2"],
            "status": 2,
        })
    );
}

#[test]
fn malformed_record_timestamp_is_decode_error() {
    let portal = MockPortal::start();
    portal.respond(
        "GET",
        "/api/2.0/project/filter.json",
        json!([{"id": 1, "created": "yesterday"}]),
    );

    let err = portal.client().get_projects().unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}
