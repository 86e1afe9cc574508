use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Represents the priority of a task.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Represents the status of a task.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Pending,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Completed,
}

/// Input structure for creating or updating a task.
///
/// `project_id` is required: a task only exists inside a project, and that project
/// decides who may see or change it.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Defaults to `pending` on creation; left unchanged on update when omitted.
    pub status: Option<TaskStatus>,

    /// Defaults to `medium` on creation; left unchanged on update when omitted.
    pub priority: Option<TaskPriority>,

    pub project_id: Uuid,

    pub assignee_id: Option<Uuid>,

    pub due_date: Option<DateTime<Utc>>,
}

impl TaskInput {
    /// A blank title is a missing field (400); length limits are left to `validate` (422).
    pub fn check_required(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("Title is required".into()));
        }
        Ok(())
    }
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// The owning project. Tasks have no owner of their own.
    pub project_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `Task` from `TaskInput`, filling in defaults and a fresh id.
    pub fn new(input: TaskInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            project_id: input.project_id,
            assignee_id: input.assignee_id,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an update in place; `id` and `created_at` are preserved.
    pub fn apply(&mut self, input: TaskInput) {
        self.title = input.title;
        self.description = input.description;
        if let Some(status) = input.status {
            self.status = status;
        }
        if let Some(priority) = input.priority {
            self.priority = priority;
        }
        self.project_id = input.project_id;
        self.assignee_id = input.assignee_id;
        self.due_date = input.due_date;
        self.updated_at = Utc::now();
    }
}
