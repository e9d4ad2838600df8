//! Repositorio de Bookings
//!
//! Contrato del store de reservas y su implementación PostgreSQL. El
//! filtro soporta la consulta de solapamiento de intervalos cerrados que
//! usa el Availability Checker. Las reservas nunca se borran físicamente.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::booking::{
    AdditionalDriver, Booking, BookingStatus, DamageReport, FuelLevel, PaymentMethod,
    PaymentStatus,
};
use crate::utils::errors::{AppError, AppResult};

use super::is_exclusion_violation;

/// Filtros de consulta de reservas
///
/// `overlaps` aplica el test de solapamiento de intervalos cerrados:
/// una reserva almacenada `[s, e]` matchea si `s <= end && e >= start`,
/// de modo que dos reservas que se tocan en el límite cuentan como
/// solapadas.
#[derive(Debug, Default, Clone)]
pub struct BookingFilter {
    pub user_id: Option<Uuid>,
    pub car_id: Option<Uuid>,
    pub statuses: Vec<BookingStatus>,
    pub overlaps: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub exclude_id: Option<Uuid>,
}

/// Campos mutables de una reserva: estado y parte de condición
#[derive(Debug, Default, Clone)]
pub struct BookingPatch {
    pub status: Option<BookingStatus>,
    pub mileage_before: Option<i32>,
    pub mileage_after: Option<i32>,
    pub fuel_level_before: Option<FuelLevel>,
    pub fuel_level_after: Option<FuelLevel>,
    pub damage: Option<DamageReport>,
}

/// Store de reservas
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn find(&self, filter: &BookingFilter) -> AppResult<Vec<Booking>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;
    async fn create(&self, booking: Booking) -> AppResult<Booking>;
    async fn update(&self, id: Uuid, patch: BookingPatch) -> AppResult<Option<Booking>>;
}

/// Row físico de la tabla bookings; los campos compuestos van en JSONB
#[derive(Debug, FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    car_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    total_days: i64,
    total_amount: rust_decimal::Decimal,
    status: BookingStatus,
    pickup_location: String,
    dropoff_location: String,
    additional_drivers: Json<Vec<AdditionalDriver>>,
    special_requests: Option<String>,
    payment_status: PaymentStatus,
    payment_method: Option<PaymentMethod>,
    mileage_before: Option<i32>,
    mileage_after: Option<i32>,
    fuel_level_before: Option<FuelLevel>,
    fuel_level_after: Option<FuelLevel>,
    damage: Option<Json<DamageReport>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            car_id: row.car_id,
            start_date: row.start_date,
            end_date: row.end_date,
            total_days: row.total_days,
            total_amount: row.total_amount,
            status: row.status,
            pickup_location: row.pickup_location,
            dropoff_location: row.dropoff_location,
            additional_drivers: row.additional_drivers.0,
            special_requests: row.special_requests,
            payment_status: row.payment_status,
            payment_method: row.payment_method,
            mileage_before: row.mileage_before,
            mileage_after: row.mileage_after,
            fuel_level_before: row.fuel_level_before,
            fuel_level_after: row.fuel_level_after,
            damage: row.damage.map(|d| d.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingRepository {
    async fn find(&self, filter: &BookingFilter) -> AppResult<Vec<Booking>> {
        let statuses: Option<Vec<String>> = if filter.statuses.is_empty() {
            None
        } else {
            Some(
                filter
                    .statuses
                    .iter()
                    .map(|s| s.as_str().to_string())
                    .collect(),
            )
        };
        let (overlap_start, overlap_end) = match filter.overlaps {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };

        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT * FROM bookings
            WHERE ($1::uuid IS NULL OR user_id = $1)
            AND ($2::uuid IS NULL OR car_id = $2)
            AND ($3::text[] IS NULL OR status::text = ANY($3))
            AND ($5::timestamptz IS NULL OR start_date <= $5)
            AND ($4::timestamptz IS NULL OR end_date >= $4)
            AND ($6::uuid IS NULL OR id <> $6)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.car_id)
        .bind(statuses)
        .bind(overlap_start)
        .bind(overlap_end)
        .bind(filter.exclude_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Booking::from))
    }

    async fn create(&self, booking: Booking) -> AppResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (
                id, user_id, car_id, start_date, end_date, total_days,
                total_amount, status, pickup_location, dropoff_location,
                additional_drivers, special_requests, payment_status,
                payment_method, mileage_before, mileage_after,
                fuel_level_before, fuel_level_after, damage,
                created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21
            )
            RETURNING *
            "#,
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(booking.car_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.total_days)
        .bind(booking.total_amount)
        .bind(booking.status)
        .bind(&booking.pickup_location)
        .bind(&booking.dropoff_location)
        .bind(Json(&booking.additional_drivers))
        .bind(&booking.special_requests)
        .bind(booking.payment_status)
        .bind(booking.payment_method)
        .bind(booking.mileage_before)
        .bind(booking.mileage_after)
        .bind(booking.fuel_level_before)
        .bind(booking.fuel_level_after)
        .bind(booking.damage.as_ref().map(Json))
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_booking_conflict)?;

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, patch: BookingPatch) -> AppResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            UPDATE bookings SET
                status = COALESCE($2, status),
                mileage_before = COALESCE($3, mileage_before),
                mileage_after = COALESCE($4, mileage_after),
                fuel_level_before = COALESCE($5, fuel_level_before),
                fuel_level_after = COALESCE($6, fuel_level_after),
                damage = COALESCE($7, damage),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.status)
        .bind(patch.mileage_before)
        .bind(patch.mileage_after)
        .bind(patch.fuel_level_before)
        .bind(patch.fuel_level_after)
        .bind(patch.damage.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_booking_conflict)?;

        Ok(row.map(Booking::from))
    }
}

/// El constraint de exclusión (car_id, tstzrange) dispara cuando una
/// transición deja dos reservas confirmed/active solapadas.
fn map_booking_conflict(e: sqlx::Error) -> AppError {
    if is_exclusion_violation(&e) {
        AppError::Conflict("Car is already booked for the selected dates".to_string())
    } else {
        AppError::Database(e)
    }
}
