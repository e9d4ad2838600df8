//! Entity Store
//!
//! Contrato de persistencia por entidad (traits `CarStore`, `UserStore`,
//! `BookingStore`) con dos implementaciones: PostgreSQL (sqlx) y una
//! in-memory para tests.

pub mod booking_repository;
pub mod car_repository;
pub mod memory;
pub mod user_repository;

pub use booking_repository::{BookingFilter, BookingPatch, BookingStore, PgBookingRepository};
pub use car_repository::{CarFilter, CarPatch, CarStore, PgCarRepository};
pub use user_repository::{PgUserRepository, UserPatch, UserStore};

/// Violación de constraint UNIQUE (licensePlate, email, licenseNumber)
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// Violación del constraint de exclusión (car_id, tstzrange) de bookings
pub(crate) fn is_exclusion_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23P01"))
}
