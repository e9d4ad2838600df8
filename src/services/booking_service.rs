//! Booking Lifecycle Manager
//!
//! Gestiona la máquina de estados de la reserva: creación validada con
//! chequeo de disponibilidad, cancelación con reglas de propiedad y
//! transiciones/parte de condición restringidas a admin.
//!
//! La ventana check-then-act de la creación (consulta de solapamiento +
//! insert) se serializa con un mutex por coche, de modo que dos
//! peticiones concurrentes sobre el mismo coche no puedan colarse entre
//! la comprobación y la escritura.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::middleware::auth::Actor;
use crate::models::booking::{AdditionalDriver, Booking, BookingStatus, PaymentStatus};
use crate::repositories::{BookingFilter, BookingPatch, BookingStore, CarStore};
use crate::services::availability_service::AvailabilityService;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::validate_interval;

/// Datos de entrada para crear una reserva
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub car_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub additional_drivers: Vec<AdditionalDriver>,
    pub special_requests: Option<String>,
}

pub struct BookingService {
    cars: Arc<dyn CarStore>,
    bookings: Arc<dyn BookingStore>,
    availability: AvailabilityService,
    car_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl BookingService {
    pub fn new(cars: Arc<dyn CarStore>, bookings: Arc<dyn BookingStore>) -> Self {
        let availability = AvailabilityService::new(bookings.clone());
        Self {
            cars,
            bookings,
            availability,
            car_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Mutex por coche; serializa la creación de reservas de un mismo
    /// coche sin bloquear las del resto de la flota.
    async fn lock_for_car(&self, car_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.car_locks.lock().await;
        locks
            .entry(car_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Crear una reserva en estado pending.
    ///
    /// El flag `is_available` del coche actúa como override de admin
    /// (modo mantenimiento); la disponibilidad real frente a otras
    /// reservas se deriva siempre de la consulta de solapamiento.
    pub async fn create_booking(&self, actor: &Actor, input: NewBooking) -> AppResult<Booking> {
        let lock = self.lock_for_car(input.car_id).await;
        let _guard = lock.lock().await;

        let car = self
            .cars
            .find_by_id(input.car_id)
            .await?
            .ok_or_else(|| not_found_error("Car"))?;

        if !car.is_available {
            return Err(AppError::Unavailable("Car is not available".to_string()));
        }

        validate_interval(input.start_date, input.end_date)?;

        if self
            .availability
            .has_conflict(car.id, input.start_date, input.end_date, None)
            .await?
        {
            return Err(AppError::Conflict(
                "Car is already booked for the selected dates".to_string(),
            ));
        }

        let total_days = Booking::billable_days(input.start_date, input.end_date);
        let total_amount = Decimal::from(total_days) * car.price_per_day;

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: actor.id,
            car_id: car.id,
            start_date: input.start_date,
            end_date: input.end_date,
            total_days,
            total_amount,
            status: BookingStatus::Pending,
            pickup_location: input.pickup_location,
            dropoff_location: input.dropoff_location,
            additional_drivers: input.additional_drivers,
            special_requests: input.special_requests,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            mileage_before: None,
            mileage_after: None,
            fuel_level_before: None,
            fuel_level_after: None,
            damage: None,
            created_at: now,
            updated_at: now,
        };

        self.bookings.create(booking).await
    }

    /// Cancelar una reserva. Solo el dueño o un admin, y solo antes de
    /// entregar el coche (pending/confirmed).
    pub async fn cancel_booking(&self, booking_id: Uuid, actor: &Actor) -> AppResult<Booking> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| not_found_error("Booking"))?;

        if !actor.can_access(booking.user_id) {
            return Err(AppError::Forbidden(
                "Not authorized to cancel this booking".to_string(),
            ));
        }

        if !booking.status.is_cancellable() {
            return Err(AppError::InvalidTransition(
                "Cannot cancel an active or completed booking".to_string(),
            ));
        }

        let patch = BookingPatch {
            status: Some(BookingStatus::Cancelled),
            ..Default::default()
        };

        self.bookings
            .update(booking_id, patch)
            .await?
            .ok_or_else(|| not_found_error("Booking"))
    }

    /// Transición de estado y parte de condición, solo admin. Las
    /// transiciones de admin no tienen ordenación impuesta.
    pub async fn update_status(
        &self,
        booking_id: Uuid,
        actor: &Actor,
        patch: BookingPatch,
    ) -> AppResult<Booking> {
        actor.require_admin()?;

        self.bookings
            .update(booking_id, patch)
            .await?
            .ok_or_else(|| not_found_error("Booking"))
    }

    /// Obtener una reserva; solo el dueño o un admin
    pub async fn get_booking(&self, booking_id: Uuid, actor: &Actor) -> AppResult<Booking> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| not_found_error("Booking"))?;

        if !actor.can_access(booking.user_id) {
            return Err(AppError::Forbidden(
                "Not authorized to view this booking".to_string(),
            ));
        }

        Ok(booking)
    }

    /// Reservas del propio actor, más reciente primero
    pub async fn list_for_user(&self, actor: &Actor) -> AppResult<Vec<Booking>> {
        let filter = BookingFilter {
            user_id: Some(actor.id),
            ..Default::default()
        };
        self.bookings.find(&filter).await
    }

    /// Todas las reservas, solo admin, más reciente primero
    pub async fn list_all(&self, actor: &Actor) -> AppResult<Vec<Booking>> {
        actor.require_admin()?;
        self.bookings.find(&BookingFilter::default()).await
    }
}
