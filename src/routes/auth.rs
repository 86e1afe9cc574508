use crate::{
    auth::{AuthResponse, Identity, LoginRequest, RegisterRequest},
    error::AppError,
    models::{NewUser, Role},
    response::ApiResponse,
    routes::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Register a new user
///
/// Creates a plain `user` account and returns it together with a token.
///
/// ## Responses:
/// - `201 Created`: `{token, user}`.
/// - `400 Bad Request`: a required field is missing or empty.
/// - `409 Conflict`: the username or email is already taken.
/// - `422 Unprocessable Entity`: a field is malformed (e.g. invalid email).
#[post("/auth/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let register_data = register_data.into_inner();
    register_data.check_required()?;
    register_data.validate()?;

    // Checked up front to skip hashing; `create` still enforces uniqueness.
    if state.users.get_by_username(&register_data.username).await?.is_some() {
        return Err(AppError::Conflict("Username is already taken".into()));
    }
    if state.users.get_by_email(&register_data.email).await?.is_some() {
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let user = state
        .users
        .create(NewUser {
            username: register_data.username,
            email: register_data.email,
            password: register_data.password,
            first_name: register_data.first_name,
            last_name: register_data.last_name,
            role: Role::User,
        })
        .await?;
    let token = state.tokens.issue(user.id, &user.username, user.role)?;

    log::info!("registered user {} ({})", user.username, user.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        "User registered successfully",
        AuthResponse { token, user },
    )))
}

/// Login user
///
/// Unknown usernames and wrong passwords get the same 401.
#[post("/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.check_required()?;

    let user = match state.users.get_by_username(&login_data.username).await? {
        Some(user) if state.users.verify_password(&user, &login_data.password) => user,
        _ => {
            log::info!("failed login for {}", login_data.username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };
    let token = state.tokens.issue(user.id, &user.username, user.role)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Login successful",
        AuthResponse { token, user },
    )))
}

/// Returns the account behind the presented token, reloaded from the store.
#[get("/auth/verify-token")]
pub async fn verify_token(
    state: web::Data<AppState>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let user = state
        .users
        .get_by_id(identity.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Token is valid", json!({ "user": user }))))
}
