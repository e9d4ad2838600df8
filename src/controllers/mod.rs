//! Controllers del sistema
//!
//! Orquestación por recurso entre los handlers HTTP y los
//! services/stores.

pub mod booking_controller;
pub mod car_controller;
pub mod user_controller;

pub use booking_controller::BookingController;
pub use car_controller::CarController;
pub use user_controller::UserController;
