//! Rutas de Users
//!
//! Registro y login son públicos; perfil requiere autenticación; el
//! listado y el borrado de usuarios son de admin.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::UserController;
use crate::dto::response::ApiResponse;
use crate::dto::user_dto::{
    AuthResponse, LoginRequest, RegisterUserRequest, UpdateProfileRequest, UserResponse,
};
use crate::middleware::auth::{auth_middleware, Actor};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/", get(list_users))
        .route("/:id", delete(delete_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let controller = UserController::new(&state);
    let response = controller.register(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let controller = UserController::new(&state);
    let response = controller.login(request).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn get_profile(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(&state);
    let response = controller.profile(&actor).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn update_profile(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(&state);
    let response = controller.update_profile(&actor, request).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn list_users(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let controller = UserController::new(&state);
    let response = controller.list(&actor).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn delete_user(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = UserController::new(&state);
    controller.delete(&actor, id).await?;
    Ok(Json(ApiResponse::message_only(
        "User deleted successfully".to_string(),
    )))
}
