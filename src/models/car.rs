//! Modelo de Car
//!
//! Este módulo contiene el struct Car y sus enums asociados.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Categoría del coche - mapea al ENUM car_category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "car_category")]
pub enum CarCategory {
    Economy,
    Compact,
    #[serde(rename = "Mid-size")]
    #[sqlx(rename = "Mid-size")]
    MidSize,
    #[serde(rename = "Full-size")]
    #[sqlx(rename = "Full-size")]
    FullSize,
    #[serde(rename = "SUV")]
    #[sqlx(rename = "SUV")]
    Suv,
    Luxury,
    Sports,
}

/// Tipo de combustible - mapea al ENUM fuel_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "fuel_type")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

/// Transmisión - mapea al ENUM transmission
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "transmission")]
pub enum Transmission {
    Manual,
    Automatic,
}

impl CarCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarCategory::Economy => "Economy",
            CarCategory::Compact => "Compact",
            CarCategory::MidSize => "Mid-size",
            CarCategory::FullSize => "Full-size",
            CarCategory::Suv => "SUV",
            CarCategory::Luxury => "Luxury",
            CarCategory::Sports => "Sports",
        }
    }
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Petrol => "Petrol",
            FuelType::Diesel => "Diesel",
            FuelType::Electric => "Electric",
            FuelType::Hybrid => "Hybrid",
        }
    }
}

impl Transmission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transmission::Manual => "Manual",
            Transmission::Automatic => "Automatic",
        }
    }
}

/// Car principal - mapea exactamente a la tabla cars
///
/// `is_available` es un flag informativo administrado por un admin
/// (modo mantenimiento). La detección de conflictos de reservas se
/// deriva siempre de la consulta de solapamiento, nunca de este flag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub price_per_day: Decimal,
    pub category: CarCategory,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub seats: i32,
    pub features: Vec<String>,
    pub image: String,
    pub is_available: bool,
    pub location: String,
    pub license_plate: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
