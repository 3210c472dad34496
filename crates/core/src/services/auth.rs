//! Identity service: registration, password login and access tokens.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use lms_common::{AppError, AppResult, config::AuthConfig};
use lms_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: i32,
    pub username: String,
    pub exp: usize,
    pub iat: usize,
}

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 150))]
    pub first_name: Option<String>,

    #[validate(length(max = 150))]
    pub last_name: Option<String>,
}

/// Input for password login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Identity service.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub fn new(user_repo: UserRepository, config: &AuthConfig) -> Self {
        Self {
            user_repo,
            jwt_secret: config.jwt_secret.clone(),
            token_ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    /// Register a new user.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        input.validate()?;

        if self.user_repo.find_by_username(&input.username).await?.is_some() {
            return Err(AppError::BadRequest("Username already taken".to_string()));
        }
        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let user = self
            .user_repo
            .create(user::ActiveModel {
                username: Set(input.username),
                email: Set(input.email),
                password_hash: Set(password_hash),
                first_name: Set(input.first_name.unwrap_or_default()),
                last_name: Set(input.last_name.unwrap_or_default()),
                is_staff: Set(false),
                is_superuser: Set(false),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "User registered");

        Ok(user)
    }

    /// Verify a username and password and issue an access token.
    pub async fn login(&self, input: LoginInput) -> AppResult<(user::Model, String)> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Issue an access token for a user.
    pub fn issue_token(&self, user: &user::Model) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            exp: (now + self.token_ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Resolve an access token to its user.
    pub async fn authenticate_token(&self, token: &str) -> AppResult<user::Model> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized)?;

        self.user_repo
            .find_by_id(data.claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

/// Hash a password into a PHC string.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_user(id: i32, password_hash: String) -> user::Model {
        user::Model {
            id,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash,
            first_name: String::new(),
            last_name: String::new(),
            is_staff: false,
            is_superuser: false,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: MockDatabase) -> AuthService {
        AuthService::new(
            UserRepository::new(Arc::new(db.into_connection())),
            &AuthConfig::default(),
        )
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_token_round_trip() {
        let user = test_user(7, String::new());
        let auth = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user.clone()]]),
        );

        let token = auth.issue_token(&user).unwrap();
        let resolved = auth.authenticate_token(&token).await.unwrap();

        assert_eq!(resolved.id, 7);
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let auth = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = auth.authenticate_token("not.a.jwt").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let user = test_user(1, hash_password("secret-password").unwrap());
        let auth = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user]]),
        );

        let result = auth
            .login(LoginInput {
                username: "alice".to_string(),
                password: "other-password".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let auth = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = auth
            .register(RegisterInput {
                email: "not-an-email".to_string(),
                username: "bob".to_string(),
                password: "long-enough".to_string(),
                first_name: None,
                last_name: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
