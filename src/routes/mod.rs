pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use std::sync::Arc;

use actix_web::web;

use crate::auth::{AuthMiddleware, TokenService};
use crate::error::AppError;
use crate::store::{ProjectStore, TaskStore, UserStore};

/// Shared handler state. The three stores are usually the same value seen through
/// different traits.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, tokens: TokenService) -> Self
    where
        S: UserStore + ProjectStore + TaskStore + 'static,
    {
        Self {
            users: store.clone(),
            projects: store.clone(),
            tasks: store,
            tokens,
        }
    }
}

/// Registers every route: `/health`, the public auth endpoints, and the rest of `/api`
/// behind [`AuthMiddleware`].
///
/// Public endpoints are plain resources so that unmatched `/api/auth/*` paths still fall
/// through to the protected scope.
pub fn config(cfg: &mut web::ServiceConfig, tokens: TokenService) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::health)
        .service(
            web::scope("/api")
                .service(auth::register)
                .service(auth::login)
                .service(
                    web::scope("")
                        .wrap(AuthMiddleware::new(tokens))
                        .service(auth::verify_token)
                        .service(
                            web::scope("/projects")
                                .service(projects::get_projects)
                                .service(projects::create_project)
                                .service(projects::get_project_tasks)
                                .service(projects::get_project)
                                .service(projects::update_project)
                                .service(projects::delete_project),
                        )
                        .service(
                            web::scope("/tasks")
                                .service(tasks::get_tasks)
                                .service(tasks::create_task)
                                .service(tasks::get_task)
                                .service(tasks::update_task)
                                .service(tasks::delete_task),
                        ),
                ),
        );
}

/// Unreadable JSON bodies are a 400 in the usual envelope.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    })
}

/// Path segments that are not valid ids cannot name an existing resource.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        log::debug!("unparseable path {}: {}", req.path(), err);
        AppError::NotFound("Not found".into()).into()
    })
}
