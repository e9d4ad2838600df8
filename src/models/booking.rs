//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking, la máquina de estados de la
//! reserva y los tipos auxiliares (pago, niveles de combustible, daños).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

/// Estado de la reserva - mapea al ENUM booking_status
///
/// Máquina de estados forward-only: pending es el estado inicial,
/// completed y cancelled son terminales.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Estados que bloquean el intervalo del coche frente a otras reservas
    pub const BLOCKING: [BookingStatus; 2] = [BookingStatus::Confirmed, BookingStatus::Active];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Una reserva solo puede cancelarse antes de entregar el coche
    pub fn is_cancellable(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Estado del pago - mapea al ENUM payment_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// Método de pago - mapea al ENUM payment_method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    Cash,
}

/// Nivel de combustible registrado en el parte de condición
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "fuel_level")]
pub enum FuelLevel {
    Empty,
    Quarter,
    Half,
    #[serde(rename = "Three-Quarter")]
    #[sqlx(rename = "Three-Quarter")]
    ThreeQuarter,
    Full,
}

/// Conductor adicional declarado en la reserva
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalDriver {
    pub name: String,
    pub license_number: String,
}

/// Parte de daños post-alquiler
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DamageReport {
    #[serde(default)]
    pub reported: bool,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub cost: Decimal,
}

/// Booking principal - mapea exactamente a la tabla bookings
///
/// `total_amount` es un snapshot del precio en el momento de crear la
/// reserva; no se recalcula si el precio del coche cambia después.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_days: i64,
    pub total_amount: Decimal,
    pub status: BookingStatus,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub additional_drivers: Vec<AdditionalDriver>,
    pub special_requests: Option<String>,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub mileage_before: Option<i32>,
    pub mileage_after: Option<i32>,
    pub fuel_level_before: Option<FuelLevel>,
    pub fuel_level_after: Option<FuelLevel>,
    pub damage: Option<DamageReport>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Días facturables de un intervalo: ceil de la duración en días,
    /// calculado sobre milisegundos.
    pub fn billable_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        const DAY_MS: i64 = 1000 * 3600 * 24;
        let ms = (end - start).num_milliseconds();
        let q = ms / DAY_MS;
        if ms % DAY_MS > 0 {
            q + 1
        } else {
            q
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn billable_days_whole_interval() {
        assert_eq!(
            Booking::billable_days(date(2024, 1, 10), date(2024, 1, 13)),
            3
        );
    }

    #[test]
    fn billable_days_rounds_partial_day_up() {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 11, 6, 0, 0).unwrap();
        assert_eq!(Booking::billable_days(start, end), 2);
    }

    #[test]
    fn cancellable_only_before_handover() {
        assert!(BookingStatus::Pending.is_cancellable());
        assert!(BookingStatus::Confirmed.is_cancellable());
        assert!(!BookingStatus::Active.is_cancellable());
        assert!(!BookingStatus::Completed.is_cancellable());
        assert!(!BookingStatus::Cancelled.is_cancellable());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Confirmed).unwrap(),
            "\"confirmed\""
        );
        assert_eq!(
            serde_json::from_str::<BookingStatus>("\"cancelled\"").unwrap(),
            BookingStatus::Cancelled
        );
    }
}
