//! DTOs de la API
//!
//! Requests y responses serializados en camelCase, más el envelope
//! genérico de respuesta.

pub mod booking_dto;
pub mod car_dto;
pub mod response;
pub mod user_dto;
