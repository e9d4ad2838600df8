//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: configuración, stores, access guard y
//! el servicio de ciclo de vida de reservas.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::auth::{AccessGuard, JwtAccessGuard};
use crate::repositories::{
    BookingStore, CarStore, PgBookingRepository, PgCarRepository, PgUserRepository, UserStore,
};
use crate::services::BookingService;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
    pub users: Arc<dyn UserStore>,
    pub cars: Arc<dyn CarStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub guard: Arc<dyn AccessGuard>,
    pub booking_service: Arc<BookingService>,
}

impl AppState {
    /// Construir el estado sobre cualquier implementación del Entity
    /// Store; los tests pasan los stores in-memory.
    pub fn new(
        config: EnvironmentConfig,
        users: Arc<dyn UserStore>,
        cars: Arc<dyn CarStore>,
        bookings: Arc<dyn BookingStore>,
    ) -> Self {
        let jwt = JwtConfig::from(&config);
        let guard: Arc<dyn AccessGuard> =
            Arc::new(JwtAccessGuard::new(users.clone(), jwt.clone()));
        let booking_service = Arc::new(BookingService::new(cars.clone(), bookings.clone()));

        Self {
            config,
            jwt,
            users,
            cars,
            bookings,
            guard,
            booking_service,
        }
    }

    /// Estado de producción sobre PostgreSQL
    pub fn with_postgres(config: EnvironmentConfig, pool: PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgCarRepository::new(pool.clone())),
            Arc::new(PgBookingRepository::new(pool)),
        )
    }
}
