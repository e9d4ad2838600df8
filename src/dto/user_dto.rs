//! DTOs de Users
//!
//! Registro, login y perfil. Las responses nunca incluyen el hash de
//! contraseña.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::{User, UserRole};

/// Request de registro de usuario
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(length(min = 5, max = 30))]
    pub phone: String,

    pub date_of_birth: NaiveDate,

    #[validate(length(min = 3, max = 30))]
    pub license_number: String,

    #[validate(length(max = 200))]
    pub address: Option<String>,
}

/// Request de login
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Request para actualizar el perfil propio
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 5, max = 30))]
    pub phone: Option<String>,

    #[validate(length(max = 200))]
    pub address: Option<String>,

    pub profile_image: Option<String>,

    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,
}

/// Response de registro/login: datos básicos más el bearer token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub token: String,
}

/// Response de usuario para perfil y listados admin
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub license_number: String,
    pub address: Option<String>,
    pub profile_image: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            date_of_birth: user.date_of_birth,
            license_number: user.license_number,
            address: user.address,
            profile_image: user.profile_image,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
