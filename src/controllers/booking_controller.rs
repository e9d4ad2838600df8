//! Controller de Bookings
//!
//! Orquesta las operaciones de reservas sobre el Booking Lifecycle
//! Manager y resuelve las referencias de coche/usuario en las responses.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::booking_dto::{BookingResponse, CreateBookingRequest, UpdateBookingStatusRequest};
use crate::middleware::auth::Actor;
use crate::models::booking::Booking;
use crate::repositories::{BookingPatch, CarStore, UserStore};
use crate::services::{BookingService, NewBooking};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct BookingController {
    service: Arc<BookingService>,
    cars: Arc<dyn CarStore>,
    users: Arc<dyn UserStore>,
}

impl BookingController {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: state.booking_service.clone(),
            cars: state.cars.clone(),
            users: state.users.clone(),
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateBookingRequest,
    ) -> AppResult<BookingResponse> {
        request.validate()?;

        let input = NewBooking {
            car_id: request.car,
            start_date: request.start_date,
            end_date: request.end_date,
            pickup_location: request.pickup_location,
            dropoff_location: request.dropoff_location,
            additional_drivers: request.additional_drivers,
            special_requests: request.special_requests,
        };

        let booking = self.service.create_booking(actor, input).await?;
        self.populate(booking).await
    }

    pub async fn my_bookings(&self, actor: &Actor) -> AppResult<Vec<BookingResponse>> {
        let bookings = self.service.list_for_user(actor).await?;
        self.populate_all(bookings).await
    }

    pub async fn list_all(&self, actor: &Actor) -> AppResult<Vec<BookingResponse>> {
        let bookings = self.service.list_all(actor).await?;
        self.populate_all(bookings).await
    }

    pub async fn get_by_id(&self, id: Uuid, actor: &Actor) -> AppResult<BookingResponse> {
        let booking = self.service.get_booking(id, actor).await?;
        self.populate(booking).await
    }

    pub async fn cancel(&self, id: Uuid, actor: &Actor) -> AppResult<()> {
        self.service.cancel_booking(id, actor).await?;
        Ok(())
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        actor: &Actor,
        request: UpdateBookingStatusRequest,
    ) -> AppResult<BookingResponse> {
        let patch = BookingPatch {
            status: request.status,
            mileage_before: request.mileage_before,
            mileage_after: request.mileage_after,
            fuel_level_before: request.fuel_level_before,
            fuel_level_after: request.fuel_level_after,
            damage: request.damage,
        };

        let booking = self.service.update_status(id, actor, patch).await?;
        self.populate(booking).await
    }

    /// Resolver las referencias de coche y usuario para display
    async fn populate(&self, booking: Booking) -> AppResult<BookingResponse> {
        let car = self.cars.find_by_id(booking.car_id).await?;
        let user = self.users.find_by_id(booking.user_id).await?;
        Ok(BookingResponse::from_parts(booking, car, user))
    }

    async fn populate_all(&self, bookings: Vec<Booking>) -> AppResult<Vec<BookingResponse>> {
        let mut responses = Vec::with_capacity(bookings.len());
        for booking in bookings {
            responses.push(self.populate(booking).await?);
        }
        Ok(responses)
    }
}
