//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de dominio que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod booking;
pub mod car;
pub mod user;
