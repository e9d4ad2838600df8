//! Utilidades de validación
//!
//! Este módulo contiene validadores custom usados por los DTOs y el
//! chequeo de intervalos del ciclo de vida de reservas.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

use crate::utils::errors::AppError;

lazy_static! {
    /// Matrículas: alfanumérico en mayúsculas, guiones y espacios internos
    pub static ref LICENSE_PLATE_RE: Regex =
        Regex::new(r"^[A-Z0-9][A-Z0-9 \-]{1,14}$").unwrap();
}

/// Validar que un precio sea estrictamente positivo
pub fn validate_positive_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut error = ValidationError::new("positive_price");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un intervalo de reserva sea estrictamente creciente
pub fn validate_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if start >= end {
        return Err(AppError::InvalidInterval(
            "End date must be after start date".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn license_plate_accepts_common_formats() {
        for plate in ["ABC-123", "1234 XYZ", "B 777 OK"] {
            assert!(LICENSE_PLATE_RE.is_match(plate), "rejected {}", plate);
        }
    }

    #[test]
    fn license_plate_rejects_lowercase_and_empty() {
        for plate in ["abc-123", "", "!"] {
            assert!(!LICENSE_PLATE_RE.is_match(plate), "accepted {}", plate);
        }
    }

    #[test]
    fn price_must_be_positive() {
        assert!(validate_positive_price(&Decimal::new(50, 0)).is_ok());
        assert!(validate_positive_price(&Decimal::ZERO).is_err());
        assert!(validate_positive_price(&Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn equal_dates_are_an_invalid_interval() {
        let day = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        assert!(matches!(
            validate_interval(day, day),
            Err(AppError::InvalidInterval(_))
        ));
        assert!(validate_interval(day, day + chrono::Duration::hours(1)).is_ok());
    }
}
