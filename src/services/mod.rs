//! Services module
//!
//! Este módulo contiene la lógica de negocio: el chequeo de
//! disponibilidad y el ciclo de vida de reservas.

pub mod availability_service;
pub mod booking_service;

pub use availability_service::AvailabilityService;
pub use booking_service::{BookingService, NewBooking};
