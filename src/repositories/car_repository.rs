//! Repositorio de Cars
//!
//! Contrato del store de coches y su implementación PostgreSQL.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::car::{Car, CarCategory, FuelType, Transmission};
use crate::utils::errors::{duplicate_error, AppError, AppResult};

use super::is_unique_violation;

/// Filtros del listado de coches
#[derive(Debug, Default, Clone)]
pub struct CarFilter {
    pub category: Option<CarCategory>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub location: Option<String>,
    pub available: Option<bool>,
}

/// Campos actualizables de un coche; la identidad (id, licensePlate)
/// queda fuera.
#[derive(Debug, Default, Clone)]
pub struct CarPatch {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub price_per_day: Option<Decimal>,
    pub category: Option<CarCategory>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub seats: Option<i32>,
    pub features: Option<Vec<String>>,
    pub image: Option<String>,
    pub is_available: Option<bool>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Store de coches
#[async_trait]
pub trait CarStore: Send + Sync {
    async fn find(&self, filter: &CarFilter) -> AppResult<Vec<Car>>;
    async fn search(&self, query: &str) -> AppResult<Vec<Car>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>>;
    async fn license_plate_exists(&self, license_plate: &str) -> AppResult<bool>;
    async fn create(&self, car: Car) -> AppResult<Car>;
    async fn update(&self, id: Uuid, patch: CarPatch) -> AppResult<Option<Car>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

pub struct PgCarRepository {
    pool: PgPool,
}

impl PgCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarStore for PgCarRepository {
    async fn find(&self, filter: &CarFilter) -> AppResult<Vec<Car>> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT * FROM cars
            WHERE ($1::car_category IS NULL OR category = $1)
            AND ($2::fuel_type IS NULL OR fuel_type = $2)
            AND ($3::transmission IS NULL OR transmission = $3)
            AND ($4::numeric IS NULL OR price_per_day >= $4)
            AND ($5::numeric IS NULL OR price_per_day <= $5)
            AND ($6::text IS NULL OR location ILIKE '%' || $6 || '%')
            AND ($7::boolean IS NULL OR is_available = $7)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.category)
        .bind(filter.fuel_type)
        .bind(filter.transmission)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.location.as_deref())
        .bind(filter.available)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Car>> {
        let pattern = format!("%{}%", query);
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT * FROM cars
            WHERE brand ILIKE $1
            OR model ILIKE $1
            OR category::text ILIKE $1
            OR location ILIKE $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    async fn license_plate_exists(&self, license_plate: &str) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM cars WHERE license_plate = $1)")
                .bind(license_plate)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    async fn create(&self, car: Car) -> AppResult<Car> {
        let created = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (
                id, brand, model, year, color, price_per_day, category,
                fuel_type, transmission, seats, features, image,
                is_available, location, license_plate, description,
                created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18
            )
            RETURNING *
            "#,
        )
        .bind(car.id)
        .bind(&car.brand)
        .bind(&car.model)
        .bind(car.year)
        .bind(&car.color)
        .bind(car.price_per_day)
        .bind(car.category)
        .bind(car.fuel_type)
        .bind(car.transmission)
        .bind(car.seats)
        .bind(&car.features)
        .bind(&car.image)
        .bind(car.is_available)
        .bind(&car.location)
        .bind(&car.license_plate)
        .bind(&car.description)
        .bind(car.created_at)
        .bind(car.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                duplicate_error("License plate")
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(created)
    }

    async fn update(&self, id: Uuid, patch: CarPatch) -> AppResult<Option<Car>> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars SET
                brand = COALESCE($2, brand),
                model = COALESCE($3, model),
                year = COALESCE($4, year),
                color = COALESCE($5, color),
                price_per_day = COALESCE($6, price_per_day),
                category = COALESCE($7, category),
                fuel_type = COALESCE($8, fuel_type),
                transmission = COALESCE($9, transmission),
                seats = COALESCE($10, seats),
                features = COALESCE($11, features),
                image = COALESCE($12, image),
                is_available = COALESCE($13, is_available),
                location = COALESCE($14, location),
                description = COALESCE($15, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.brand)
        .bind(patch.model)
        .bind(patch.year)
        .bind(patch.color)
        .bind(patch.price_per_day)
        .bind(patch.category)
        .bind(patch.fuel_type)
        .bind(patch.transmission)
        .bind(patch.seats)
        .bind(patch.features)
        .bind(patch.image)
        .bind(patch.is_available)
        .bind(patch.location)
        .bind(patch.description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(car)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
