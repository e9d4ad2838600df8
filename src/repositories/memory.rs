//! Stores in-memory
//!
//! Implementaciones del Entity Store sobre HashMap para los tests.
//! Aplican las mismas reglas de unicidad y ordenación que PostgreSQL.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::booking::Booking;
use crate::models::car::Car;
use crate::models::user::User;
use crate::utils::errors::{duplicate_error, AppResult};

use super::{
    BookingFilter, BookingPatch, BookingStore, CarFilter, CarPatch, CarStore, UserPatch,
    UserStore,
};

#[derive(Default)]
pub struct MemoryCarRepository {
    cars: Arc<RwLock<HashMap<Uuid, Car>>>,
}

impl MemoryCarRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

#[async_trait]
impl CarStore for MemoryCarRepository {
    async fn find(&self, filter: &CarFilter) -> AppResult<Vec<Car>> {
        let cars = self.cars.read().await;
        let mut matches: Vec<Car> = cars
            .values()
            .filter(|car| {
                filter.category.map_or(true, |c| car.category == c)
                    && filter.fuel_type.map_or(true, |f| car.fuel_type == f)
                    && filter.transmission.map_or(true, |t| car.transmission == t)
                    && filter.min_price.map_or(true, |p| car.price_per_day >= p)
                    && filter.max_price.map_or(true, |p| car.price_per_day <= p)
                    && filter.location.as_ref().map_or(true, |l| {
                        car.location.to_lowercase().contains(&l.to_lowercase())
                    })
                    && filter.available.map_or(true, |a| car.is_available == a)
            })
            .cloned()
            .collect();
        sort_newest_first(&mut matches, |c| c.created_at);
        Ok(matches)
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Car>> {
        let needle = query.to_lowercase();
        let cars = self.cars.read().await;
        let mut matches: Vec<Car> = cars
            .values()
            .filter(|car| {
                car.brand.to_lowercase().contains(&needle)
                    || car.model.to_lowercase().contains(&needle)
                    || car.category.as_str().to_lowercase().contains(&needle)
                    || car.location.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        sort_newest_first(&mut matches, |c| c.created_at);
        Ok(matches)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>> {
        Ok(self.cars.read().await.get(&id).cloned())
    }

    async fn license_plate_exists(&self, license_plate: &str) -> AppResult<bool> {
        Ok(self
            .cars
            .read()
            .await
            .values()
            .any(|car| car.license_plate == license_plate))
    }

    async fn create(&self, car: Car) -> AppResult<Car> {
        let mut cars = self.cars.write().await;
        if cars
            .values()
            .any(|existing| existing.license_plate == car.license_plate)
        {
            return Err(duplicate_error("License plate"));
        }
        cars.insert(car.id, car.clone());
        Ok(car)
    }

    async fn update(&self, id: Uuid, patch: CarPatch) -> AppResult<Option<Car>> {
        let mut cars = self.cars.write().await;
        let Some(car) = cars.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(brand) = patch.brand {
            car.brand = brand;
        }
        if let Some(model) = patch.model {
            car.model = model;
        }
        if let Some(year) = patch.year {
            car.year = year;
        }
        if let Some(color) = patch.color {
            car.color = color;
        }
        if let Some(price) = patch.price_per_day {
            car.price_per_day = price;
        }
        if let Some(category) = patch.category {
            car.category = category;
        }
        if let Some(fuel_type) = patch.fuel_type {
            car.fuel_type = fuel_type;
        }
        if let Some(transmission) = patch.transmission {
            car.transmission = transmission;
        }
        if let Some(seats) = patch.seats {
            car.seats = seats;
        }
        if let Some(features) = patch.features {
            car.features = features;
        }
        if let Some(image) = patch.image {
            car.image = image;
        }
        if let Some(is_available) = patch.is_available {
            car.is_available = is_available;
        }
        if let Some(location) = patch.location {
            car.location = location;
        }
        if let Some(description) = patch.description {
            car.description = Some(description);
        }
        car.updated_at = chrono::Utc::now();

        Ok(Some(car.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.cars.write().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn find_all(&self) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        sort_newest_first(&mut all, |u| u.created_at);
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn license_number_exists(&self, license_number: &str) -> AppResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|user| user.license_number == license_number))
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(duplicate_error("Email"));
        }
        if users
            .values()
            .any(|existing| existing.license_number == user.license_number)
        {
            return Err(duplicate_error("License number"));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;

        if let Some(email) = &patch.email {
            if users
                .values()
                .any(|existing| existing.id != id && existing.email == *email)
            {
                return Err(duplicate_error("Email"));
            }
        }

        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(phone) = patch.phone {
            user.phone = phone;
        }
        if let Some(address) = patch.address {
            user.address = Some(address);
        }
        if let Some(profile_image) = patch.profile_image {
            user.profile_image = Some(profile_image);
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = chrono::Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryBookingRepository {
    bookings: Arc<RwLock<HashMap<Uuid, Booking>>>,
}

impl MemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingRepository {
    async fn find(&self, filter: &BookingFilter) -> AppResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut matches: Vec<Booking> = bookings
            .values()
            .filter(|booking| {
                filter.user_id.map_or(true, |u| booking.user_id == u)
                    && filter.car_id.map_or(true, |c| booking.car_id == c)
                    && (filter.statuses.is_empty() || filter.statuses.contains(&booking.status))
                    && filter.overlaps.map_or(true, |(start, end)| {
                        booking.start_date <= end && booking.end_date >= start
                    })
                    && filter.exclude_id.map_or(true, |ex| booking.id != ex)
            })
            .cloned()
            .collect();
        sort_newest_first(&mut matches, |b| b.created_at);
        Ok(matches)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn create(&self, booking: Booking) -> AppResult<Booking> {
        self.bookings
            .write()
            .await
            .insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn update(&self, id: Uuid, patch: BookingPatch) -> AppResult<Option<Booking>> {
        let mut bookings = self.bookings.write().await;
        let Some(booking) = bookings.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(status) = patch.status {
            booking.status = status;
        }
        if let Some(mileage_before) = patch.mileage_before {
            booking.mileage_before = Some(mileage_before);
        }
        if let Some(mileage_after) = patch.mileage_after {
            booking.mileage_after = Some(mileage_after);
        }
        if let Some(fuel_level_before) = patch.fuel_level_before {
            booking.fuel_level_before = Some(fuel_level_before);
        }
        if let Some(fuel_level_after) = patch.fuel_level_after {
            booking.fuel_level_after = Some(fuel_level_after);
        }
        if let Some(damage) = patch.damage {
            booking.damage = Some(damage);
        }
        booking.updated_at = chrono::Utc::now();

        Ok(Some(booking.clone()))
    }
}
