use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Status given to projects created without one.
pub const DEFAULT_PROJECT_STATUS: &str = "active";

/// Input structure for creating or updating a project.
///
/// There is deliberately no owner field: the owner is always the authenticated caller.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ProjectInput {
    /// Must be between 1 and 100 characters.
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Free-form status, `"active"` when omitted.
    #[validate(length(min = 1, max = 20))]
    pub status: Option<String>,
}

impl ProjectInput {
    /// A blank name is a missing field (400); length limits are left to `validate` (422).
    pub fn check_required(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Project name is required".into()));
        }
        Ok(())
    }
}

/// A project as stored and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    /// The user that owns this project and, transitively, its tasks.
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(input: ProjectInput, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            status: input
                .status
                .unwrap_or_else(|| DEFAULT_PROJECT_STATUS.to_string()),
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an update in place. Ownership and creation time are preserved.
    pub fn apply(&mut self, input: ProjectInput) {
        self.name = input.name;
        self.description = input.description;
        if let Some(status) = input.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}
