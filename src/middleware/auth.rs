//! Middleware de autenticación
//!
//! Resuelve el bearer token del header Authorization a un `Actor`
//! {id, role} e inyecta ese actor como extension de la request. Toda
//! operación del dominio recibe el actor explícitamente; no hay estado
//! ambiente por request.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::models::user::UserRole;
use crate::repositories::UserStore;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{extract_bearer, verify_token, JwtConfig};

/// Identidad autenticada que viaja con cada request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Predicado único de autorización sobre recursos con dueño:
    /// el propio dueño o un admin.
    pub fn can_access(&self, owner: Uuid) -> bool {
        self.id == owner || self.is_admin()
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Not authorized as an admin".to_string(),
            ))
        }
    }
}

/// Resolver de identidad: de un bearer token a un Actor
#[async_trait]
pub trait AccessGuard: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Actor, AppError>;
}

/// Guard de producción: decodifica el JWT y verifica que el usuario
/// siga existiendo en el store. El rol sale del store, no del token.
pub struct JwtAccessGuard {
    users: Arc<dyn UserStore>,
    config: JwtConfig,
}

impl JwtAccessGuard {
    pub fn new(users: Arc<dyn UserStore>, config: JwtConfig) -> Self {
        Self { users, config }
    }
}

#[async_trait]
impl AccessGuard for JwtAccessGuard {
    async fn resolve(&self, token: &str) -> Result<Actor, AppError> {
        let claims = verify_token(token, &self.config)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        Ok(Actor {
            id: user.id,
            role: user.role,
        })
    }
}

/// Middleware de autenticación: requiere bearer token válido
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".to_string()))?;

    let token = extract_bearer(auth_header)?;
    let actor = state.guard.resolve(token).await?;

    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::MemoryUserRepository;
    use crate::utils::jwt::generate_token;
    use chrono::{NaiveDate, Utc};
    use crate::models::user::User;

    fn test_user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Marta López".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: "$2b$12$hash".to_string(),
            phone: "+34 600 000 000".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
            license_number: Uuid::new_v4().to_string(),
            address: None,
            profile_image: None,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        }
    }

    #[tokio::test]
    async fn guard_resolves_existing_user() {
        let users = Arc::new(MemoryUserRepository::new());
        let user = test_user(UserRole::Customer);
        users.create(user.clone()).await.unwrap();

        let config = test_jwt_config();
        let guard = JwtAccessGuard::new(users, config.clone());
        let token = generate_token(user.id, user.role, &config).unwrap();

        let actor = guard.resolve(&token).await.unwrap();
        assert_eq!(actor.id, user.id);
        assert_eq!(actor.role, UserRole::Customer);
    }

    #[tokio::test]
    async fn guard_rejects_token_for_deleted_user() {
        let users = Arc::new(MemoryUserRepository::new());
        let config = test_jwt_config();
        let guard = JwtAccessGuard::new(users, config.clone());

        let token = generate_token(Uuid::new_v4(), UserRole::Customer, &config).unwrap();
        assert!(matches!(
            guard.resolve(&token).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn admin_predicate_is_centralized() {
        let owner = Uuid::new_v4();
        let customer = Actor {
            id: owner,
            role: UserRole::Customer,
        };
        let stranger = Actor {
            id: Uuid::new_v4(),
            role: UserRole::Customer,
        };
        let admin = Actor {
            id: Uuid::new_v4(),
            role: UserRole::Admin,
        };

        assert!(customer.can_access(owner));
        assert!(!stranger.can_access(owner));
        assert!(admin.can_access(owner));
        assert!(stranger.require_admin().is_err());
        assert!(admin.require_admin().is_ok());
    }
}
