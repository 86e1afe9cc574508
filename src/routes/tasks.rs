use crate::{
    auth::{authorize_project, authorize_task, visible_tasks, Identity},
    error::AppError,
    models::{Project, Task, TaskInput},
    response::ApiResponse,
    routes::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

async fn find_task(state: &AppState, id: Uuid) -> Result<Task, AppError> {
    state
        .tasks
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// 403 unless the caller can access the project `task` belongs to.
async fn require_task_access(
    state: &AppState,
    identity: &Identity,
    task: &Task,
) -> Result<(), AppError> {
    let parent = state.projects.get_by_id(task.project_id).await?;
    authorize_task(identity, task, parent.as_ref()).require()
}

/// Loads a task the caller may act on: 404 if it does not exist, then 403.
async fn accessible_task(state: &AppState, identity: &Identity, id: Uuid) -> Result<Task, AppError> {
    let task = find_task(state, id).await?;
    require_task_access(state, identity, &task).await?;
    Ok(task)
}

/// A project named in a request body. A dangling reference is a 400, not a 404.
async fn referenced_project(state: &AppState, id: Uuid) -> Result<Project, AppError> {
    state
        .projects
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Project not found".into()))
}

/// Retrieves the tasks visible to the caller.
///
/// Regular users see the tasks of the projects they own; admins see every task.
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Task` objects, newest first.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list_all().await?;
    let owned = if identity.is_admin() {
        Vec::new()
    } else {
        state.projects.list_by_owner(identity.id).await?
    };

    let tasks = visible_tasks(&identity, tasks, &owned);
    Ok(HttpResponse::Ok().json(ApiResponse::success("Tasks retrieved", tasks)))
}

/// Creates a task inside one of the caller's projects.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: `title` is blank or `project_id` names no project.
/// - `403 Forbidden`: the project belongs to someone else.
/// - `422 Unprocessable Entity`: a field is too long.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    identity: Identity,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.check_required()?;
    task_data.validate()?;

    let project = referenced_project(&state, task_data.project_id).await?;
    authorize_project(&identity, &project).require()?;

    let task = state.tasks.create(Task::new(task_data.into_inner())).await?;

    log::info!("user {} created task {} in project {}", identity.username, task.id, project.id);
    Ok(HttpResponse::Created().json(ApiResponse::success("Task created", task)))
}

#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    identity: Identity,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = accessible_task(&state, &identity, task_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Task retrieved", task)))
}

/// Updates a task. Moving it to another project requires that project to exist (400) and
/// to be accessible to the caller (403).
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    identity: Identity,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.check_required()?;
    task_data.validate()?;

    let mut task = find_task(&state, task_id.into_inner()).await?;
    let target = if task_data.project_id != task.project_id {
        Some(referenced_project(&state, task_data.project_id).await?)
    } else {
        None
    };

    require_task_access(&state, &identity, &task).await?;
    if let Some(target) = &target {
        authorize_project(&identity, target).require()?;
    }

    task.apply(task_data.into_inner());
    let task = state
        .tasks
        .update(task)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Task updated", task)))
}

#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    identity: Identity,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = accessible_task(&state, &identity, task_id.into_inner()).await?;

    if !state.tasks.delete(task.id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }

    log::info!("user {} deleted task {}", identity.username, task.id);
    Ok(HttpResponse::Ok().json(ApiResponse::message("Task deleted")))
}
