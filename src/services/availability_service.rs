//! Availability Checker
//!
//! Determina si un coche tiene alguna reserva activa que solape con un
//! intervalo candidato. Consulta pura sobre el store, sin mutación.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::booking::BookingStatus;
use crate::repositories::{BookingFilter, BookingStore};
use crate::utils::errors::AppResult;

pub struct AvailabilityService {
    bookings: Arc<dyn BookingStore>,
}

impl AvailabilityService {
    pub fn new(bookings: Arc<dyn BookingStore>) -> Self {
        Self { bookings }
    }

    /// Devuelve true si existe una reserva confirmed/active del coche
    /// cuyo intervalo cerrado `[s, e]` cumple `s <= end && e >= start`.
    /// Bajo intervalos cerrados, dos reservas que se tocan exactamente
    /// en la fecha límite cuentan como conflicto.
    ///
    /// `exclude_booking_id` permite que una actualización in-place no se
    /// compare contra sí misma.
    pub async fn has_conflict(
        &self,
        car_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<Uuid>,
    ) -> AppResult<bool> {
        let filter = BookingFilter {
            car_id: Some(car_id),
            statuses: BookingStatus::BLOCKING.to_vec(),
            overlaps: Some((start, end)),
            exclude_id: exclude_booking_id,
            ..Default::default()
        };

        let conflicting = self.bookings.find(&filter).await?;
        Ok(!conflicting.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{Booking, PaymentStatus};
    use crate::repositories::memory::MemoryBookingRepository;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn seed_booking(car_id: Uuid, start: u32, end: u32, status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            car_id,
            start_date: date(start),
            end_date: date(end),
            total_days: (end - start) as i64,
            total_amount: Decimal::new(100, 0),
            status,
            pickup_location: "Madrid".to_string(),
            dropoff_location: "Madrid".to_string(),
            additional_drivers: Vec::new(),
            special_requests: None,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            mileage_before: None,
            mileage_after: None,
            fuel_level_before: None,
            fuel_level_after: None,
            damage: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn service_with(bookings: Vec<Booking>) -> AvailabilityService {
        let store = Arc::new(MemoryBookingRepository::new());
        for booking in bookings {
            store.create(booking).await.unwrap();
        }
        AvailabilityService::new(store)
    }

    #[tokio::test]
    async fn overlapping_confirmed_booking_conflicts() {
        let car_id = Uuid::new_v4();
        let service =
            service_with(vec![seed_booking(car_id, 1, 5, BookingStatus::Confirmed)]).await;

        assert!(service
            .has_conflict(car_id, date(3), date(7), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn boundary_touch_counts_as_conflict() {
        let car_id = Uuid::new_v4();
        let service = service_with(vec![seed_booking(car_id, 1, 5, BookingStatus::Active)]).await;

        // la reserva existente termina el día 5 y la candidata empieza
        // el día 5: bajo intervalos cerrados hay conflicto
        assert!(service
            .has_conflict(car_id, date(5), date(8), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn disjoint_intervals_do_not_conflict() {
        let car_id = Uuid::new_v4();
        let service =
            service_with(vec![seed_booking(car_id, 1, 5, BookingStatus::Confirmed)]).await;

        assert!(!service
            .has_conflict(car_id, date(6), date(9), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn pending_and_cancelled_bookings_do_not_block() {
        let car_id = Uuid::new_v4();
        let service = service_with(vec![
            seed_booking(car_id, 1, 5, BookingStatus::Pending),
            seed_booking(car_id, 2, 6, BookingStatus::Cancelled),
            seed_booking(car_id, 3, 7, BookingStatus::Completed),
        ])
        .await;

        assert!(!service
            .has_conflict(car_id, date(1), date(9), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn other_cars_do_not_conflict() {
        let car_id = Uuid::new_v4();
        let service = service_with(vec![seed_booking(
            Uuid::new_v4(),
            1,
            5,
            BookingStatus::Confirmed,
        )])
        .await;

        assert!(!service
            .has_conflict(car_id, date(2), date(4), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn excluded_booking_is_skipped() {
        let car_id = Uuid::new_v4();
        let existing = seed_booking(car_id, 1, 5, BookingStatus::Confirmed);
        let existing_id = existing.id;
        let service = service_with(vec![existing]).await;

        assert!(!service
            .has_conflict(car_id, date(2), date(4), Some(existing_id))
            .await
            .unwrap());
    }
}
