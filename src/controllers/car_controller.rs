//! Controller de Cars
//!
//! CRUD de la flota. Las mutaciones son de admin; la identidad del
//! coche (id, licensePlate) es inmutable una vez creado.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::car_dto::{CarFilters, CreateCarRequest, UpdateCarRequest};
use crate::middleware::auth::Actor;
use crate::models::car::Car;
use crate::repositories::{CarFilter, CarPatch, CarStore};
use crate::state::AppState;
use crate::utils::errors::{duplicate_error, not_found_error, AppError, AppResult};

pub struct CarController {
    cars: Arc<dyn CarStore>,
}

impl CarController {
    pub fn new(state: &AppState) -> Self {
        Self {
            cars: state.cars.clone(),
        }
    }

    pub async fn list(&self, filters: CarFilters) -> AppResult<Vec<Car>> {
        let filter = CarFilter {
            category: filters.category,
            fuel_type: filters.fuel_type,
            transmission: filters.transmission,
            min_price: filters.min_price,
            max_price: filters.max_price,
            location: filters.location,
            available: filters.available,
        };
        self.cars.find(&filter).await
    }

    pub async fn search(&self, query: Option<String>) -> AppResult<Vec<Car>> {
        let query = query
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("Search query is required".to_string()))?;
        self.cars.search(query.trim()).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Car> {
        self.cars
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Car"))
    }

    pub async fn create(&self, actor: &Actor, request: CreateCarRequest) -> AppResult<Car> {
        actor.require_admin()?;
        request.validate()?;

        if self
            .cars
            .license_plate_exists(&request.license_plate)
            .await?
        {
            return Err(duplicate_error("License plate"));
        }

        let now = Utc::now();
        let car = Car {
            id: Uuid::new_v4(),
            brand: request.brand,
            model: request.model,
            year: request.year,
            color: request.color,
            price_per_day: request.price_per_day,
            category: request.category,
            fuel_type: request.fuel_type,
            transmission: request.transmission,
            seats: request.seats,
            features: request.features,
            image: request.image,
            is_available: true,
            location: request.location,
            license_plate: request.license_plate,
            description: request.description,
            created_at: now,
            updated_at: now,
        };

        self.cars.create(car).await
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        request: UpdateCarRequest,
    ) -> AppResult<Car> {
        actor.require_admin()?;
        request.validate()?;

        let patch = CarPatch {
            brand: request.brand,
            model: request.model,
            year: request.year,
            color: request.color,
            price_per_day: request.price_per_day,
            category: request.category,
            fuel_type: request.fuel_type,
            transmission: request.transmission,
            seats: request.seats,
            features: request.features,
            image: request.image,
            is_available: request.is_available,
            location: request.location,
            description: request.description,
        };

        self.cars
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found_error("Car"))
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        actor.require_admin()?;

        if !self.cars.delete(id).await? {
            return Err(not_found_error("Car"));
        }
        Ok(())
    }
}
