//! Persistence seams.
//!
//! Handlers only see these traits. `postgres::PgStore` backs them with sqlx and
//! `memory::MemoryStore` with process-local maps; both implement all three so a single
//! value can be shared behind the three trait objects in `AppState`.
//!
//! Absence is always `Ok(None)` (or `Ok(false)` for deletes), never an error.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::password;
use crate::error::AppError;
use crate::models::{NewUser, Project, Task, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// The credential store. Passwords go in as plaintext and are hashed here.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Hashes the password and stores the account.
    ///
    /// Fails with `Conflict` when the username or email is already taken.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;

    fn verify_password(&self, user: &User, password: &str) -> bool {
        password::verify_password(password, &user.password_hash)
    }
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Project>, AppError>;

    /// Projects owned by `owner_id`, newest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Project>, AppError>;

    /// Every project, newest first.
    async fn list_all(&self) -> Result<Vec<Project>, AppError>;

    async fn create(&self, project: Project) -> Result<Project, AppError>;

    /// Persists `project` over the stored row; `Ok(None)` if it no longer exists.
    async fn update(&self, project: Project) -> Result<Option<Project>, AppError>;

    /// Deletes the project together with its tasks.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Every task, newest first.
    async fn list_all(&self) -> Result<Vec<Task>, AppError>;

    async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<Task>, AppError>;

    /// Fails with `BadRequest` when `task.project_id` names no project, checked atomically
    /// with respect to project deletion.
    async fn create(&self, task: Task) -> Result<Task, AppError>;

    /// Same project check as `create`.
    async fn update(&self, task: Task) -> Result<Option<Task>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
