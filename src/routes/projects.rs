use crate::{
    auth::{authorize_project, Identity},
    error::AppError,
    models::{Project, ProjectInput},
    response::ApiResponse,
    routes::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Loads a project or fails with 404.
async fn find_project(state: &AppState, id: Uuid) -> Result<Project, AppError> {
    state
        .projects
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))
}

/// Loads a project the caller may act on: 404 if it does not exist, then 403.
async fn accessible_project(
    state: &AppState,
    identity: &Identity,
    id: Uuid,
) -> Result<Project, AppError> {
    let project = find_project(state, id).await?;
    authorize_project(identity, &project).require()?;
    Ok(project)
}

/// Lists the caller's projects, or every project for admins.
#[get("")]
pub async fn get_projects(
    state: web::Data<AppState>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let projects = if identity.is_admin() {
        state.projects.list_all().await?
    } else {
        state.projects.list_by_owner(identity.id).await?
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success("Projects retrieved", projects)))
}

/// Creates a project owned by the caller.
///
/// ## Responses:
/// - `201 Created`: the new `Project`.
/// - `400 Bad Request`: `name` is missing or blank.
/// - `422 Unprocessable Entity`: a field is too long.
#[post("")]
pub async fn create_project(
    state: web::Data<AppState>,
    identity: Identity,
    project_data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    project_data.check_required()?;
    project_data.validate()?;

    let project = Project::new(project_data.into_inner(), identity.id);
    let project = state.projects.create(project).await?;

    log::info!("user {} created project {}", identity.username, project.id);
    Ok(HttpResponse::Created().json(ApiResponse::success("Project created", project)))
}

#[get("/{id}")]
pub async fn get_project(
    state: web::Data<AppState>,
    identity: Identity,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = accessible_project(&state, &identity, project_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Project retrieved", project)))
}

/// Tasks belonging to one project, newest first.
#[get("/{project_id}/tasks")]
pub async fn get_project_tasks(
    state: web::Data<AppState>,
    identity: Identity,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = accessible_project(&state, &identity, project_id.into_inner()).await?;
    let tasks = state.tasks.list_by_project(project.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Tasks retrieved", tasks)))
}

/// Replaces name and description; status is only changed when supplied.
#[put("/{id}")]
pub async fn update_project(
    state: web::Data<AppState>,
    identity: Identity,
    project_id: web::Path<Uuid>,
    project_data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    project_data.check_required()?;
    project_data.validate()?;

    let mut project = accessible_project(&state, &identity, project_id.into_inner()).await?;
    project.apply(project_data.into_inner());

    let project = state
        .projects
        .update(project)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Project updated", project)))
}

/// Deletes the project and every task in it.
#[delete("/{id}")]
pub async fn delete_project(
    state: web::Data<AppState>,
    identity: Identity,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = accessible_project(&state, &identity, project_id.into_inner()).await?;

    if !state.projects.delete(project.id).await? {
        return Err(AppError::NotFound("Project not found".into()));
    }

    log::info!("user {} deleted project {}", identity.username, project.id);
    Ok(HttpResponse::Ok().json(ApiResponse::message("Project deleted")))
}
