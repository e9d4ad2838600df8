//! Controller de Users
//!
//! Registro, login, perfil y administración de usuarios. Las contraseñas
//! se almacenan con bcrypt y nunca salen del Access Guard.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::user_dto::{
    AuthResponse, LoginRequest, RegisterUserRequest, UpdateProfileRequest, UserResponse,
};
use crate::middleware::auth::Actor;
use crate::models::booking::BookingStatus;
use crate::models::user::{User, UserRole};
use crate::repositories::{BookingFilter, BookingStore, UserPatch, UserStore};
use crate::state::AppState;
use crate::utils::errors::{duplicate_error, not_found_error, AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct UserController {
    users: Arc<dyn UserStore>,
    bookings: Arc<dyn BookingStore>,
    jwt: JwtConfig,
}

impl UserController {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.users.clone(),
            bookings: state.bookings.clone(),
            jwt: state.jwt.clone(),
        }
    }

    pub async fn register(&self, request: RegisterUserRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(duplicate_error("Email"));
        }
        if self
            .users
            .license_number_exists(&request.license_number)
            .await?
        {
            return Err(duplicate_error("License number"));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            password_hash,
            phone: request.phone,
            date_of_birth: request.date_of_birth,
            license_number: request.license_number,
            address: request.address,
            profile_image: None,
            role: UserRole::Customer,
            created_at: now,
            updated_at: now,
        };

        let user = self.users.create(user).await?;
        self.auth_response(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        let valid = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Error verifying password: {}", e)))?;
        if !valid {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        self.auth_response(user)
    }

    pub async fn profile(&self, actor: &Actor) -> AppResult<UserResponse> {
        let user = self
            .users
            .find_by_id(actor.id)
            .await?
            .ok_or_else(|| not_found_error("User"))?;

        Ok(user.into())
    }

    pub async fn update_profile(
        &self,
        actor: &Actor,
        request: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        request.validate()?;

        let password_hash = match request.password {
            Some(password) => Some(
                bcrypt::hash(&password, bcrypt::DEFAULT_COST)
                    .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))?,
            ),
            None => None,
        };

        let patch = UserPatch {
            name: request.name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            profile_image: request.profile_image,
            password_hash,
        };

        let user = self
            .users
            .update(actor.id, patch)
            .await?
            .ok_or_else(|| not_found_error("User"))?;

        Ok(user.into())
    }

    pub async fn list(&self, actor: &Actor) -> AppResult<Vec<UserResponse>> {
        actor.require_admin()?;

        let users = self.users.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Borrado admin. Un usuario con reservas vivas (pending, confirmed
    /// o active) no puede borrarse; sus reservas lo referencian.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        actor.require_admin()?;

        let live = self
            .bookings
            .find(&BookingFilter {
                user_id: Some(id),
                statuses: vec![
                    BookingStatus::Pending,
                    BookingStatus::Confirmed,
                    BookingStatus::Active,
                ],
                ..Default::default()
            })
            .await?;
        if !live.is_empty() {
            return Err(AppError::Conflict(
                "Cannot delete a user with active bookings".to_string(),
            ));
        }

        if !self.users.delete(id).await? {
            return Err(not_found_error("User"));
        }
        Ok(())
    }

    fn auth_response(&self, user: User) -> AppResult<AuthResponse> {
        let token = generate_token(user.id, user.role, &self.jwt)?;
        Ok(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token,
        })
    }
}
