//! DTOs de Cars
//!
//! Requests de creación/actualización con validación declarativa y
//! filtros de búsqueda del listado público.

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::models::car::{CarCategory, FuelType, Transmission};
use crate::utils::validation::{validate_positive_price, LICENSE_PLATE_RE};

/// Request para crear un nuevo coche (solo admin)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1950, max = 2030))]
    pub year: i32,

    #[validate(length(min = 1, max = 50))]
    pub color: String,

    #[validate(custom = "validate_positive_price")]
    pub price_per_day: Decimal,

    pub category: CarCategory,

    pub fuel_type: FuelType,

    pub transmission: Transmission,

    #[validate(range(min = 1, max = 20))]
    pub seats: i32,

    #[serde(default)]
    pub features: Vec<String>,

    #[validate(length(min = 1))]
    pub image: String,

    #[validate(length(min = 1, max = 100))]
    pub location: String,

    #[validate(regex(path = "LICENSE_PLATE_RE", message = "invalid license plate"))]
    pub license_plate: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Request para actualizar un coche existente (solo admin)
///
/// La identidad (id, licensePlate) es inmutable una vez creado el coche.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1950, max = 2030))]
    pub year: Option<i32>,

    #[validate(length(min = 1, max = 50))]
    pub color: Option<String>,

    #[validate(custom = "validate_positive_price")]
    pub price_per_day: Option<Decimal>,

    pub category: Option<CarCategory>,

    pub fuel_type: Option<FuelType>,

    pub transmission: Option<Transmission>,

    #[validate(range(min = 1, max = 20))]
    pub seats: Option<i32>,

    pub features: Option<Vec<String>>,

    pub image: Option<String>,

    pub is_available: Option<bool>,

    #[validate(length(min = 1, max = 100))]
    pub location: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Filtros del listado público de coches
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarFilters {
    pub category: Option<CarCategory>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub location: Option<String>,
    pub available: Option<bool>,
}

/// Query de búsqueda por texto libre
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}
