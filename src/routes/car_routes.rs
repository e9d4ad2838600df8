//! Rutas de Cars
//!
//! Listado, búsqueda y detalle son públicos; crear, actualizar y borrar
//! requieren autenticación y rol admin.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::CarController;
use crate::dto::car_dto::{CarFilters, CreateCarRequest, SearchQuery, UpdateCarRequest};
use crate::dto::response::ApiResponse;
use crate::middleware::auth::{auth_middleware, Actor};
use crate::models::car::Car;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_router(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/", post(create_car))
        .route("/:id", put(update_car).delete(delete_car))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(list_cars))
        .route("/search", get(search_cars))
        .route("/:id", get(get_car))
        .merge(admin_routes)
}

async fn list_cars(
    State(state): State<AppState>,
    Query(filters): Query<CarFilters>,
) -> Result<Json<ApiResponse<Vec<Car>>>, AppError> {
    let controller = CarController::new(&state);
    let cars = controller.list(filters).await?;
    Ok(Json(ApiResponse::success(cars)))
}

async fn search_cars(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Car>>>, AppError> {
    let controller = CarController::new(&state);
    let cars = controller.search(search.query).await?;
    Ok(Json(ApiResponse::success(cars)))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Car>>, AppError> {
    let controller = CarController::new(&state);
    let car = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(car)))
}

async fn create_car(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Json(request): Json<CreateCarRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Car>>), AppError> {
    let controller = CarController::new(&state);
    let car = controller.create(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(car))))
}

async fn update_car(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<ApiResponse<Car>>, AppError> {
    let controller = CarController::new(&state);
    let car = controller.update(&actor, id, request).await?;
    Ok(Json(ApiResponse::success(car)))
}

async fn delete_car(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CarController::new(&state);
    controller.delete(&actor, id).await?;
    Ok(Json(ApiResponse::message_only(
        "Car deleted successfully".to_string(),
    )))
}
