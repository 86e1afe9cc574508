use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ProjectStore, TaskStore, UserStore};
use crate::auth::password::hash_password;
use crate::error::AppError;
use crate::models::{NewUser, Project, Role, Task, User};

/// In-process store used when no database is configured, and by the test suite.
///
/// Each table sits behind its own lock; when both are needed the project lock is taken
/// first. Deleting a project also removes its tasks, mirroring the `ON DELETE CASCADE` of
/// the PostgreSQL schema, and task writes hold the project lock so a task can never land
/// in a project that is being deleted.
#[derive(Debug)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    projects: RwLock<HashMap<Uuid, Project>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
    bcrypt_cost: u32,
}

impl MemoryStore {
    pub fn new(bcrypt_cost: u32) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            projects: RwLock::new(HashMap::new()),
            tasks: RwLock::new(HashMap::new()),
            bcrypt_cost,
        }
    }

    /// Overwrites the role of a stored user. There is no HTTP route for this;
    /// it exists for seeding admins.
    pub async fn set_role(&self, id: Uuid, role: Role) -> bool {
        match self.users.write().await.get_mut(&id) {
            Some(user) => {
                user.role = role;
                user.updated_at = chrono::Utc::now();
                true
            }
            None => false,
        }
    }
}

fn missing_project() -> AppError {
    AppError::BadRequest("Project not found".into())
}

fn newest_first<T, F>(mut rows: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    rows
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, input: NewUser) -> Result<User, AppError> {
        let password_hash = hash_password(&input.password, self.bcrypt_cost)?;
        let user = User::new(input, password_hash);

        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict("Username is already taken".into()));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email is already registered".into()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Project>, AppError> {
        let projects = self.projects.read().await;
        let owned = projects
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        Ok(newest_first(owned, |p: &Project| p.created_at))
    }

    async fn list_all(&self) -> Result<Vec<Project>, AppError> {
        let all = self.projects.read().await.values().cloned().collect();
        Ok(newest_first(all, |p: &Project| p.created_at))
    }

    async fn create(&self, project: Project) -> Result<Project, AppError> {
        self.projects
            .write()
            .await
            .insert(project.id, project.clone());
        Ok(project)
    }

    async fn update(&self, project: Project) -> Result<Option<Project>, AppError> {
        let mut projects = self.projects.write().await;
        match projects.get_mut(&project.id) {
            Some(stored) => {
                *stored = project.clone();
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut projects = self.projects.write().await;
        let removed = projects.remove(&id).is_some();
        if removed {
            self.tasks.write().await.retain(|_, t| t.project_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Task>, AppError> {
        let all = self.tasks.read().await.values().cloned().collect();
        Ok(newest_first(all, |t: &Task| t.created_at))
    }

    async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        let in_project = tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        Ok(newest_first(in_project, |t: &Task| t.created_at))
    }

    async fn create(&self, task: Task) -> Result<Task, AppError> {
        let projects = self.projects.read().await;
        if !projects.contains_key(&task.project_id) {
            return Err(missing_project());
        }
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, task: Task) -> Result<Option<Task>, AppError> {
        let projects = self.projects.read().await;
        if !projects.contains_key(&task.project_id) {
            return Err(missing_project());
        }
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&task.id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tasks.write().await.remove(&id).is_some())
    }
}
