//! Credential service: registration, login, password hashing, token issuance

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, RegisterRequest, Role, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user and return a signed token
    pub async fn register(&self, request: RegisterRequest) -> AppResult<String> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.users.email_exists(&request.email).await? {
            return Err(AppError::Validation("User already exists".to_string()));
        }

        let password_hash = self.hash_password(&request.password)?;
        let role = request.role.unwrap_or(Role::Member);

        let user = self
            .repository
            .users
            .create(&request.name, &request.email, &password_hash, role)
            .await?;

        self.create_token_for_user(&user)
    }

    /// Authenticate by email and password and return a signed token
    pub async fn login(&self, request: &LoginRequest) -> AppResult<String> {
        let user = self
            .repository
            .users
            .get_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !self.verify_password(&user, &request.password)? {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        self.create_token_for_user(&user)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Create a JWT token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify a password against the stored hash
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
