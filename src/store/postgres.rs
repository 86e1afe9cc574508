use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ProjectStore, TaskStore, UserStore};
use crate::auth::password::hash_password;
use crate::error::AppError;
use crate::models::{NewUser, Project, Task, User};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, first_name, last_name, role, created_at, updated_at";
const PROJECT_COLUMNS: &str = "id, name, description, status, owner_id, created_at, updated_at";
const TASK_COLUMNS: &str = "id, title, description, status, priority, project_id, assignee_id, \
                            due_date, created_at, updated_at";

/// Tables are created at startup when missing. Roles and task enums are stored as text.
const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT UNIQUE NOT NULL,
        email TEXT UNIQUE NOT NULL,
        password_hash TEXT NOT NULL,
        first_name TEXT,
        last_name TEXT,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS projects (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'active',
        owner_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL,
        priority TEXT NOT NULL,
        project_id UUID NOT NULL REFERENCES projects (id) ON DELETE CASCADE,
        assignee_id UUID,
        due_date TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
];

/// PostgreSQL-backed store. All statements are parameterized.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    bcrypt_cost: u32,
}

impl PgStore {
    pub fn new(pool: PgPool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    pub async fn connect(database_url: &str, bcrypt_cost: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool, bcrypt_cost))
    }

    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// Unique violations on `users` become 409s; everything else stays a database error.
fn user_insert_error(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            let message = match db_error.constraint() {
                Some(constraint) if constraint.contains("email") => "Email is already registered",
                _ => "Username is already taken",
            };
            return AppError::Conflict(message.into());
        }
    }
    error.into()
}

/// A task write that loses a race with its project's deletion trips the foreign key.
fn task_write_error(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_foreign_key_violation() {
            return AppError::BadRequest("Project not found".into());
        }
    }
    error.into()
}

#[async_trait]
impl UserStore for PgStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, input: NewUser) -> Result<User, AppError> {
        let password_hash = hash_password(&input.password, self.bcrypt_cost)?;
        let user = User::new(input, password_hash);

        let sql = format!(
            "INSERT INTO users ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {cols}",
            cols = USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.role)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(user_insert_error)
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let sql = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Project>, AppError> {
        let sql = format!(
            "SELECT {} FROM projects WHERE owner_id = $1 ORDER BY created_at DESC",
            PROJECT_COLUMNS
        );
        let projects = sqlx::query_as::<_, Project>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(projects)
    }

    async fn list_all(&self) -> Result<Vec<Project>, AppError> {
        let sql = format!(
            "SELECT {} FROM projects ORDER BY created_at DESC",
            PROJECT_COLUMNS
        );
        let projects = sqlx::query_as::<_, Project>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(projects)
    }

    async fn create(&self, project: Project) -> Result<Project, AppError> {
        let sql = format!(
            "INSERT INTO projects ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {cols}",
            cols = PROJECT_COLUMNS
        );
        let created = sqlx::query_as::<_, Project>(&sql)
            .bind(project.id)
            .bind(&project.name)
            .bind(&project.description)
            .bind(&project.status)
            .bind(project.owner_id)
            .bind(project.created_at)
            .bind(project.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update(&self, project: Project) -> Result<Option<Project>, AppError> {
        let sql = format!(
            "UPDATE projects SET name = $1, description = $2, status = $3, updated_at = $4 \
             WHERE id = $5 RETURNING {}",
            PROJECT_COLUMNS
        );
        let updated = sqlx::query_as::<_, Project>(&sql)
            .bind(&project.name)
            .bind(&project.description)
            .bind(&project.status)
            .bind(project.updated_at)
            .bind(project.id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list_all(&self) -> Result<Vec<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks ORDER BY created_at DESC", TASK_COLUMNS);
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE project_id = $1 ORDER BY created_at DESC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn create(&self, task: Task) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {cols}",
            cols = TASK_COLUMNS
        );
        let created = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.project_id)
            .bind(task.assignee_id)
            .bind(task.due_date)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(task_write_error)?;
        Ok(created)
    }

    async fn update(&self, task: Task) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "UPDATE tasks SET title = $1, description = $2, status = $3, priority = $4, \
             project_id = $5, assignee_id = $6, due_date = $7, updated_at = $8 \
             WHERE id = $9 RETURNING {}",
            TASK_COLUMNS
        );
        let updated = sqlx::query_as::<_, Task>(&sql)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.project_id)
            .bind(task.assignee_id)
            .bind(task.due_date)
            .bind(task.updated_at)
            .bind(task.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(task_write_error)?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
