//! CLI definitions and command execution

use std::io::{self, Write};

use chrono::{NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use onlyoffice::api::{
    ApiTime, Milestone, NewProjectRequest, NewProjectTaskRequest, Project, ProjectGetTasksRequest,
    ProjectTaskUpdateRequest, ProjectUpdateRequest, Task, TaskPriority, User,
};
use onlyoffice::config::Settings;
use onlyoffice::error::{AppError, Result};

/// onlyoffice - work with OnlyOffice projects from the terminal
#[derive(Parser, Debug)]
#[command(
    name = "onlyoffice",
    version,
    about = "Work with OnlyOffice projects, tasks and users",
    long_about = "Work with OnlyOffice projects, tasks and users.\n\n\
                  Connection details are read from ONLYOFFICE_URL, ONLYOFFICE_USER and\n\
                  ONLYOFFICE_PASS, falling back to the settings file."
)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List projects
    Projects,

    /// List portal users
    Users,

    /// List the milestones of a project
    Milestones {
        /// Project ID
        project_id: i64,
    },

    /// List the tasks of a project
    Tasks {
        /// Project ID
        project_id: i64,

        /// Maximum number of tasks
        #[arg(long, default_value_t = 1000)]
        count: i64,

        /// Index of the first task
        #[arg(long, default_value_t = 0)]
        start_index: i64,
    },

    /// Create a project
    CreateProject {
        /// Project title
        #[arg(short, long)]
        title: String,

        /// Project description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Responsible user ID (defaults to the logged-in user)
        #[arg(short, long, default_value = "")]
        responsible: String,
    },

    /// Update a project
    UpdateProject {
        /// Project ID
        id: i64,

        /// New title
        #[arg(short, long, default_value = "")]
        title: String,

        /// New description
        #[arg(short, long, default_value = "")]
        description: String,

        /// New responsible user ID
        #[arg(short, long, default_value = "")]
        responsible: String,
    },

    /// Delete a project
    DeleteProject {
        /// Project ID
        id: i64,
    },

    /// Create a task in a project
    CreateTask {
        /// Project ID
        project_id: i64,

        /// Task title
        #[arg(short, long)]
        title: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Priority
        #[arg(short, long, value_enum, default_value_t = Priority::Normal)]
        priority: Priority,

        /// Milestone ID
        #[arg(long)]
        milestone: Option<i64>,

        /// Start date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: Option<ApiTime>,

        /// Deadline (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        deadline: Option<ApiTime>,

        /// Notify the responsibles
        #[arg(long)]
        notify: bool,
    },

    /// Update a task
    UpdateTask {
        /// Task ID
        id: i64,

        /// New title
        #[arg(short, long, default_value = "")]
        title: String,

        /// New description
        #[arg(short, long, default_value = "")]
        description: String,

        /// New priority
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,

        /// New start date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: Option<ApiTime>,

        /// New deadline (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        deadline: Option<ApiTime>,

        /// New responsible user IDs
        #[arg(short, long = "responsible")]
        responsibles: Vec<String>,

        /// Notify the responsibles
        #[arg(long)]
        notify: bool,
    },

    /// Show the settings file location and resolved connection details
    Config,
}

/// Task priority as given on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Priority {
    High,
    Normal,
    Low,
}

impl From<Priority> for TaskPriority {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::High => TaskPriority::High,
            Priority::Normal => TaskPriority::Normal,
            Priority::Low => TaskPriority::Low,
        }
    }
}

/// Parse a `YYYY-MM-DD` date as midnight.
fn parse_date(value: &str) -> std::result::Result<ApiTime, String> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("invalid date {value}"))?;
    Ok(Utc.from_utc_datetime(&midnight).into())
}

/// Execute the parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?;
    let mut out = io::stdout().lock();

    let client = settings.client()?;
    let json = cli.json;

    match cli.command {
        Command::Projects => {
            let projects = client.get_projects()?;
            if json {
                return print_json(&mut out, &projects);
            }
            writeln!(out, "Found {} projects:", projects.len())?;
            for project in projects.iter() {
                write_project(&mut out, project)?;
            }
        }
        Command::Users => {
            let users = client.get_users()?;
            if json {
                return print_json(&mut out, &users);
            }
            writeln!(out, "Found {} users:", users.len())?;
            for user in &users {
                write_user(&mut out, user)?;
            }
        }
        Command::Milestones { project_id } => {
            let milestones = client.get_project_milestones(project_id)?;
            if json {
                return print_json(&mut out, &milestones);
            }
            for milestone in &milestones {
                write_milestone(&mut out, milestone)?;
            }
        }
        Command::Tasks {
            project_id,
            count,
            start_index,
        } => {
            let filter = ProjectGetTasksRequest {
                count,
                start_index,
                ..ProjectGetTasksRequest::new(project_id)
            };
            let tasks = client.get_tasks(&filter)?;
            if json {
                return print_json(&mut out, &tasks);
            }
            for task in &tasks {
                write_task(&mut out, task)?;
            }
        }
        Command::CreateProject {
            title,
            description,
            responsible,
        } => {
            let project = client.create_project(NewProjectRequest {
                title,
                description,
                responsible_id: responsible,
            })?;
            emit_project(&mut out, json, "Created project", &project)?;
        }
        Command::UpdateProject {
            id,
            title,
            description,
            responsible,
        } => {
            let project = client.update_project(ProjectUpdateRequest {
                id,
                title,
                description,
                responsible_id: responsible,
            })?;
            emit_project(&mut out, json, "Updated project", &project)?;
        }
        Command::DeleteProject { id } => {
            let project = client.delete_project(id)?;
            emit_project(&mut out, json, "Deleted project", &project)?;
        }
        Command::CreateTask {
            project_id,
            title,
            description,
            priority,
            milestone,
            start,
            deadline,
            notify,
        } => {
            let task = client.create_project_task(NewProjectTaskRequest {
                title,
                description,
                notify,
                milestone_id: milestone,
                priority: priority.into(),
                project_id,
                start_date: start,
                deadline,
                ..NewProjectTaskRequest::default()
            })?;
            emit_task(&mut out, json, "Created task", &task)?;
        }
        Command::UpdateTask {
            id,
            title,
            description,
            priority,
            start,
            deadline,
            responsibles,
            notify,
        } => {
            let task = client.update_project_task(ProjectTaskUpdateRequest {
                id,
                title,
                description,
                priority: priority.map(TaskPriority::from),
                start_date: start,
                deadline,
                responsible_ids: responsibles,
                notify,
                ..ProjectTaskUpdateRequest::default()
            })?;
            emit_task(&mut out, json, "Updated task", &task)?;
        }
        Command::Config => show_config(&mut out, &settings)?,
    }

    Ok(())
}

fn show_config(out: &mut impl Write, settings: &Settings) -> Result<()> {
    let path = Settings::config_path()?;
    let credentials = settings.credentials();
    writeln!(out, "Settings file: {}", path.display())?;
    writeln!(out, "URL:          {}", or_unset(&credentials.url))?;
    writeln!(out, "User:         {}", or_unset(&credentials.user))?;
    let password = if credentials.password.is_empty() { "<unset>" } else { "<set>" };
    writeln!(out, "Password:     {}", password)?;
    Ok(())
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "<unset>"
    } else {
        value
    }
}

fn print_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)
        .map_err(|e| AppError::other(format!("Failed to write JSON: {e}")))?;
    writeln!(out)?;
    Ok(())
}

fn emit_project(out: &mut impl Write, json: bool, action: &str, project: &Project) -> Result<()> {
    if json {
        return print_json(out, project);
    }
    write!(out, "{}: ", action)?;
    write_project(out, project)
}

fn emit_task(out: &mut impl Write, json: bool, action: &str, task: &Task) -> Result<()> {
    if json {
        return print_json(out, task);
    }
    write!(out, "{}: ", action)?;
    write_task(out, task)
}

fn write_project(out: &mut impl Write, project: &Project) -> Result<()> {
    writeln!(
        out,
        "  - [{}] {} (tasks: {})",
        project.id.unwrap_or_default(),
        project,
        project.task_count_total.unwrap_or_default()
    )?;
    Ok(())
}

fn write_user(out: &mut impl Write, user: &User) -> Result<()> {
    writeln!(
        out,
        "  - {} ({})",
        user.display_name.as_deref().unwrap_or("<nil>"),
        user.email.as_deref().unwrap_or("<nil>")
    )?;
    Ok(())
}

fn write_milestone(out: &mut impl Write, milestone: &Milestone) -> Result<()> {
    let deadline = milestone
        .deadline
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        out,
        "  - [{}] {} (deadline: {})",
        milestone.id.unwrap_or_default(),
        milestone.title.as_deref().unwrap_or_default(),
        deadline
    )?;
    Ok(())
}

fn write_task(out: &mut impl Write, task: &Task) -> Result<()> {
    let deadline = task
        .deadline
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        out,
        "  - [{}] {} (status: {}, deadline: {})",
        task.id.unwrap_or_default(),
        task.title.as_deref().unwrap_or_default(),
        task.status.map(i64::from).unwrap_or_default(),
        deadline
    )?;
    Ok(())
}
