//! DTOs de Bookings
//!
//! La response de reserva resuelve ("popula") los datos del coche y del
//! usuario referenciados para que el cliente no tenga que pedirlos aparte.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::booking::{
    AdditionalDriver, Booking, BookingStatus, DamageReport, FuelLevel, PaymentStatus,
};
use crate::models::car::Car;
use crate::models::user::User;

/// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub car: Uuid,

    pub start_date: DateTime<Utc>,

    pub end_date: DateTime<Utc>,

    #[validate(length(min = 1, max = 200))]
    pub pickup_location: String,

    #[validate(length(min = 1, max = 200))]
    pub dropoff_location: String,

    #[serde(default)]
    pub additional_drivers: Vec<AdditionalDriver>,

    #[validate(length(max = 500))]
    pub special_requests: Option<String>,
}

/// Patch admin de estado y parte de condición
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequest {
    pub status: Option<BookingStatus>,
    pub mileage_before: Option<i32>,
    pub mileage_after: Option<i32>,
    pub fuel_level_before: Option<FuelLevel>,
    pub fuel_level_after: Option<FuelLevel>,
    pub damage: Option<DamageReport>,
}

/// Resumen del coche incrustado en la response de reserva
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarSummary {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub image: String,
    pub price_per_day: Decimal,
    pub license_plate: String,
}

impl From<Car> for CarSummary {
    fn from(car: Car) -> Self {
        Self {
            id: car.id,
            brand: car.brand,
            model: car.model,
            year: car.year,
            image: car.image,
            price_per_day: car.price_per_day,
            license_plate: car.license_plate,
        }
    }
}

/// Resumen del usuario incrustado en la response de reserva
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            license_number: user.license_number,
        }
    }
}

/// Response de reserva con referencias resueltas
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub car: Option<CarSummary>,
    pub user: Option<UserSummary>,
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
    pub mileage_before: Option<i32>,
    pub mileage_after: Option<i32>,
    pub fuel_level_before: Option<FuelLevel>,
    pub fuel_level_after: Option<FuelLevel>,
    pub damage: Option<DamageReport>,
    pub created_at: DateTime<Utc>,
}

impl BookingResponse {
    pub fn from_parts(booking: Booking, car: Option<Car>, user: Option<User>) -> Self {
        Self {
            id: booking.id,
            car: car.map(CarSummary::from),
            user: user.map(UserSummary::from),
            start_date: booking.start_date,
            end_date: booking.end_date,
            total_days: booking.total_days,
            total_amount: booking.total_amount,
            status: booking.status,
            pickup_location: booking.pickup_location,
            dropoff_location: booking.dropoff_location,
            additional_drivers: booking.additional_drivers,
            special_requests: booking.special_requests,
            payment_status: booking.payment_status,
            mileage_before: booking.mileage_before,
            mileage_after: booking.mileage_after,
            fuel_level_before: booking.fuel_level_before,
            fuel_level_after: booking.fuel_level_after,
            damage: booking.damage,
            created_at: booking.created_at,
        }
    }
}
