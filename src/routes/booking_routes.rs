//! Rutas de Bookings
//!
//! Todas las rutas de reservas requieren autenticación; el listado
//! global y los cambios de estado exigen además rol admin (chequeado en
//! el servicio vía el predicado del Actor).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::BookingController;
use crate::dto::booking_dto::{BookingResponse, CreateBookingRequest, UpdateBookingStatusRequest};
use crate::dto::response::ApiResponse;
use crate::middleware::auth::{auth_middleware, Actor};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking).get(list_all_bookings))
        .route("/my-bookings", get(my_bookings))
        .route("/:id", get(get_booking))
        .route("/:id/cancel", put(cancel_booking))
        .route("/:id/status", put(update_booking_status))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_booking(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingResponse>>), AppError> {
    let controller = BookingController::new(&state);
    let response = controller.create(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

async fn my_bookings(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.my_bookings(&actor).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn list_all_bookings(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.list_all(&actor).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn get_booking(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.get_by_id(id, &actor).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn cancel_booking(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = BookingController::new(&state);
    controller.cancel(id, &actor).await?;
    Ok(Json(ApiResponse::message_only(
        "Booking cancelled successfully".to_string(),
    )))
}

async fn update_booking_status(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(&state);
    let response = controller.update_status(id, &actor, request).await?;
    Ok(Json(ApiResponse::success(response)))
}
