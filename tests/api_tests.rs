//! Tests de integración de la API
//!
//! Montan el router completo sobre los stores in-memory y lo atacan
//! request a request, incluyendo el flujo completo de reserva.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use car_rental::config::environment::EnvironmentConfig;
use car_rental::models::user::{User, UserRole};
use car_rental::repositories::memory::{
    MemoryBookingRepository, MemoryCarRepository, MemoryUserRepository,
};
use car_rental::repositories::UserStore;
use car_rental::routes::build_router;
use car_rental::state::AppState;
use car_rental::utils::jwt::generate_token;

fn test_state() -> AppState {
    let config = EnvironmentConfig {
        environment: "test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expiration: 3600,
        cors_origins: Vec::new(),
    };

    AppState::new(
        config,
        Arc::new(MemoryUserRepository::new()),
        Arc::new(MemoryCarRepository::new()),
        Arc::new(MemoryBookingRepository::new()),
    )
}

/// Sembrar un admin directamente en el store; no existe endpoint para
/// crear admins.
async fn seed_admin(state: &AppState) -> String {
    let now = Utc::now();
    let admin = User {
        id: Uuid::new_v4(),
        name: "Fleet Admin".to_string(),
        email: "admin@example.com".to_string(),
        password_hash: bcrypt::hash("admin-password", 4).unwrap(),
        phone: "+34 600 111 222".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 3, 14).unwrap(),
        license_number: "ADMIN-0001".to_string(),
        address: None,
        profile_image: None,
        role: UserRole::Admin,
        created_at: now,
        updated_at: now,
    };
    state.users.create(admin.clone()).await.unwrap();
    generate_token(admin.id, UserRole::Admin, &state.jwt).unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register_customer(app: &Router, name: &str, email: &str, license: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/users/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": "secret-password",
            "phone": "+34 600 333 444",
            "dateOfBirth": "1992-07-21",
            "licenseNumber": license,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let id = body["data"]["id"].as_str().unwrap().to_string();
    (token, id)
}

async fn create_car(app: &Router, admin_token: &str, plate: &str, price: i64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/cars",
        Some(admin_token),
        Some(json!({
            "brand": "Toyota",
            "model": "Corolla",
            "year": 2022,
            "color": "Blue",
            "pricePerDay": price,
            "category": "Compact",
            "fuelType": "Hybrid",
            "transmission": "Automatic",
            "seats": 5,
            "image": "https://example.com/corolla.jpg",
            "location": "Madrid",
            "licensePlate": plate,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create car failed: {}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

fn booking_body(car_id: &str, start: &str, end: &str) -> Value {
    json!({
        "car": car_id,
        "startDate": start,
        "endDate": end,
        "pickupLocation": "Madrid Centro",
        "dropoffLocation": "Madrid Aeropuerto",
    })
}

#[tokio::test]
async fn health_check_works() {
    let app = build_router(test_state());
    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_login_and_profile_flow() {
    let app = build_router(test_state());
    let (token, _) = register_customer(&app, "Carlos Ruiz", "carlos@example.com", "ES-123456").await;

    let (status, body) = send(&app, "GET", "/api/users/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "carlos@example.com");
    assert_eq!(body["data"]["role"], "customer");
    assert!(body["data"].get("passwordHash").is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({"email": "carlos@example.com", "password": "secret-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].as_str().is_some());

    let (status, _) = send(
        &app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({"email": "carlos@example.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = build_router(test_state());
    register_customer(&app, "Ana", "ana@example.com", "ES-111111").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/register",
        None,
        Some(json!({
            "name": "Ana Segunda",
            "email": "ana@example.com",
            "password": "secret-password",
            "phone": "+34 600 555 666",
            "dateOfBirth": "1994-02-02",
            "licenseNumber": "ES-222222",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = build_router(test_state());

    let (status, _) = send(&app, "GET", "/api/bookings/my-bookings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "GET",
        "/api/users/profile",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn car_crud_is_admin_only_but_reads_are_public() {
    let state = test_state();
    let admin_token = seed_admin(&state).await;
    let app = build_router(state);

    let (customer_token, _) =
        register_customer(&app, "Lucía", "lucia@example.com", "ES-333333").await;

    // un customer no puede crear coches
    let (status, _) = send(
        &app,
        "POST",
        "/api/cars",
        Some(&customer_token),
        Some(json!({
            "brand": "Seat", "model": "Ibiza", "year": 2021, "color": "Red",
            "pricePerDay": 35, "category": "Economy", "fuelType": "Petrol",
            "transmission": "Manual", "seats": 5,
            "image": "https://example.com/ibiza.jpg", "location": "Sevilla",
            "licensePlate": "SE-1234-AB",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let car_id = create_car(&app, &admin_token, "M-1111-AA", 50).await;

    // lectura pública, sin token
    let (status, body) = send(&app, "GET", "/api/cars", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/api/cars/search?query=toyo", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", &format!("/api/cars/{}", car_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["licensePlate"], "M-1111-AA");

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/cars/{}", Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // matrícula duplicada
    let (status, _) = send(
        &app,
        "POST",
        "/api/cars",
        Some(&admin_token),
        Some(json!({
            "brand": "Toyota", "model": "Yaris", "year": 2023, "color": "White",
            "pricePerDay": 40, "category": "Economy", "fuelType": "Hybrid",
            "transmission": "Automatic", "seats": 5,
            "image": "https://example.com/yaris.jpg", "location": "Madrid",
            "licensePlate": "M-1111-AA",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // filtros del listado
    let (status, body) = send(&app, "GET", "/api/cars?minPrice=60", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn booking_lifecycle_flow() {
    let state = test_state();
    let admin_token = seed_admin(&state).await;
    let app = build_router(state);

    let (alice_token, alice_id) =
        register_customer(&app, "Alice", "alice@example.com", "ES-444444").await;
    let (bob_token, _) = register_customer(&app, "Bob", "bob@example.com", "ES-555555").await;

    let car_id = create_car(&app, &admin_token, "M-2222-BB", 50).await;

    // coche a 50/día, 2024-01-10 a 2024-01-13 -> 3 días, 150
    let (status, body) = send(
        &app,
        "POST",
        "/api/bookings",
        Some(&alice_token),
        Some(booking_body(
            &car_id,
            "2024-01-10T00:00:00Z",
            "2024-01-13T00:00:00Z",
        )),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "booking failed: {}", body);
    let booking_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["totalDays"], 3);
    assert_eq!(body["data"]["totalAmount"], "150");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["car"]["licensePlate"], "M-2222-BB");
    assert_eq!(body["data"]["user"]["id"], alice_id);

    // round-trip como dueña
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/bookings/{}", booking_id),
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["startDate"], "2024-01-10T00:00:00Z");
    assert_eq!(body["data"]["totalAmount"], "150");
    assert_eq!(body["data"]["status"], "pending");

    // un extraño no puede verla ni cancelarla
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/bookings/{}", booking_id),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/bookings/{}/cancel", booking_id),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // el admin confirma la reserva
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/bookings/{}/status", booking_id),
        Some(&admin_token),
        Some(json!({"status": "confirmed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "confirmed");

    // un customer no puede cambiar estados
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/bookings/{}/status", booking_id),
        Some(&alice_token),
        Some(json!({"status": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // el intervalo de Bob toca el límite (empieza el día en que acaba
    // el de Alice): conflicto bajo intervalos cerrados
    let (status, body) = send(
        &app,
        "POST",
        "/api/bookings",
        Some(&bob_token),
        Some(booking_body(
            &car_id,
            "2024-01-13T00:00:00Z",
            "2024-01-15T00:00:00Z",
        )),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    // un intervalo disjunto sí entra
    let (status, _) = send(
        &app,
        "POST",
        "/api/bookings",
        Some(&bob_token),
        Some(booking_body(
            &car_id,
            "2024-01-20T00:00:00Z",
            "2024-01-22T00:00:00Z",
        )),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // listado global: solo admin
    let (status, _) = send(&app, "GET", "/api/bookings", Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/api/bookings", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // my-bookings solo ve lo propio
    let (status, body) = send(
        &app,
        "GET",
        "/api/bookings/my-bookings",
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // la dueña cancela su reserva confirmada
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/bookings/{}/cancel", booking_id),
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/bookings/{}", booking_id),
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");
}

#[tokio::test]
async fn booking_validation_errors() {
    let state = test_state();
    let admin_token = seed_admin(&state).await;
    let app = build_router(state);

    let (token, _) = register_customer(&app, "Eva", "eva@example.com", "ES-666666").await;
    let car_id = create_car(&app, &admin_token, "M-3333-CC", 50).await;

    // startDate == endDate
    let (status, _) = send(
        &app,
        "POST",
        "/api/bookings",
        Some(&token),
        Some(booking_body(
            &car_id,
            "2024-01-10T00:00:00Z",
            "2024-01-10T00:00:00Z",
        )),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // coche inexistente
    let (status, _) = send(
        &app,
        "POST",
        "/api/bookings",
        Some(&token),
        Some(booking_body(
            &Uuid::new_v4().to_string(),
            "2024-01-10T00:00:00Z",
            "2024-01-12T00:00:00Z",
        )),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // coche fuera de servicio
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/cars/{}", car_id),
        Some(&admin_token),
        Some(json!({"isAvailable": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/api/bookings",
        Some(&token),
        Some(booking_body(
            &car_id,
            "2024-01-10T00:00:00Z",
            "2024-01-12T00:00:00Z",
        )),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn users_with_live_bookings_cannot_be_deleted() {
    let state = test_state();
    let admin_token = seed_admin(&state).await;
    let app = build_router(state);

    let (token, user_id) = register_customer(&app, "Nico", "nico@example.com", "ES-777777").await;
    let car_id = create_car(&app, &admin_token, "M-4444-DD", 50).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/bookings",
        Some(&token),
        Some(booking_body(
            &car_id,
            "2024-01-10T00:00:00Z",
            "2024-01-12T00:00:00Z",
        )),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = body["data"]["id"].as_str().unwrap().to_string();

    // borrado admin bloqueado mientras la reserva siga viva
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{}", user_id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/bookings/{}/cancel", booking_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{}", user_id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // el token del usuario borrado deja de valer
    let (status, _) = send(&app, "GET", "/api/users/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
