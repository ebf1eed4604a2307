use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::geo::Coordinates;
use crate::models::{User, UserRole};
use crate::store::{StoreError, UserStore};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("email already registered")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("user not found")]
    UserNotFound,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token encoding failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }

    pub fn role(&self) -> Option<UserRole> {
        UserRole::from_db(&self.role)
    }
}

/// User Registration Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Sari Wulandari")]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    #[schema(example = "sari@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    #[schema(example = "password123")]
    pub password: String,
    #[schema(example = "081234567890")]
    pub phone: String,
    #[schema(example = "Jl. Kemang Raya 10, Jakarta")]
    pub address: String,
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
    /// `customer` (default) or `laundry_owner`
    #[schema(example = "customer")]
    pub role: Option<String>,
}

/// User Login Request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "sari@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLocationRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    #[schema(example = -6.2088)]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be between -180 and 180"))]
    #[schema(example = 106.8456)]
    pub longitude: f64,
}

/// Public profile
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub role: UserRole,
}

impl From<&User> for UserProfile {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            phone: u.phone.clone(),
            address: u.address.clone(),
            latitude: u.location.map(|c| c.latitude),
            longitude: u.location.map(|c| c.longitude),
            role: u.role,
        }
    }
}

/// Auth Response (JWT)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Flatten validator output into one stable message
fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("invalid {}", field),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

fn require(value: &str, field: &str) -> Result<String, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

pub struct UserAuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: String,
    expiry_hours: i64,
}

impl UserAuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: String, expiry_hours: i64) -> Self {
        Self {
            users,
            jwt_secret,
            expiry_hours,
        }
    }

    /// Register a new user and issue a token
    pub async fn register(&self, mut req: RegisterRequest) -> Result<AuthResponse, AuthError> {
        req.email = req.email.trim().to_lowercase();
        req.validate()
            .map_err(|e| AuthError::Validation(describe(&e)))?;

        let name = require(&req.name, "name")?;
        let phone = require(&req.phone, "phone")?;
        let address = require(&req.address, "address")?;
        let email = req.email.clone();
        let location = match (req.latitude, req.longitude) {
            (Some(lat), Some(lng)) => {
                Some(Coordinates::new(lat, lng).map_err(|e| AuthError::Validation(e.to_string()))?)
            }
            _ => None,
        };

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        // 1. Hash password
        let password_hash = hash_password(&req.password)?;

        // 2. Persist; the unique index still catches a concurrent duplicate
        let user = User {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            phone,
            address,
            location,
            role: UserRole::parse_or_default(req.role.as_deref()),
            created_at: Utc::now(),
        };
        match self.users.create_user(&user).await {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => return Err(AuthError::EmailTaken),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        self.respond(&user)
    }

    /// Login user and issue JWT
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = req.email.trim().to_lowercase();
        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed_hash =
            PasswordHash::new(&user.password_hash).map_err(|_| AuthError::InvalidCredentials)?;
        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        self.respond(&user)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, AuthError> {
        let user = self
            .users
            .find_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(UserProfile::from(&user))
    }

    /// Overwrite the stored location; repeatable
    pub async fn update_location(
        &self,
        user_id: Uuid,
        req: UpdateLocationRequest,
    ) -> Result<UserProfile, AuthError> {
        req.validate()
            .map_err(|e| AuthError::Validation(describe(&e)))?;
        let location = Coordinates::new(req.latitude, req.longitude)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        if !self.users.update_location(user_id, location).await? {
            return Err(AuthError::UserNotFound);
        }
        tracing::info!(user_id = %user_id, "user location updated");
        self.profile(user_id).await
    }

    fn respond(&self, user: &User) -> Result<AuthResponse, AuthError> {
        Ok(AuthResponse {
            token: self.issue_token(user)?,
            user: UserProfile::from(user),
        })
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.as_str().to_string(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?)
    }

    /// Verify JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// Argon2id PHC string with a fresh salt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn service() -> UserAuthService {
        UserAuthService::new(Arc::new(MemoryStore::new()), "test-secret".to_string(), 24)
    }

    fn register_req(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Sari".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            phone: "081234567890".to_string(),
            address: "Jl. Kemang Raya 10".to_string(),
            latitude: None,
            longitude: None,
            role: None,
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let svc = service();
        let registered = svc.register(register_req("Sari@Example.com ")).await.unwrap();
        assert_eq!(registered.user.email, "sari@example.com");
        assert_eq!(registered.user.role, UserRole::Customer);

        let claims = svc.verify_token(&registered.token).unwrap();
        assert_eq!(claims.user_id().unwrap(), registered.user.id);
        assert_eq!(claims.role(), Some(UserRole::Customer));

        let login = svc
            .login(LoginRequest {
                email: "sari@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(login.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let svc = service();

        let err = svc.register(register_req("not-an-email")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let mut req = register_req("a@example.com");
        req.password = "short".to_string();
        let err = svc.register(req).await.unwrap_err();
        assert_eq!(err.to_string(), "password must be at least 8 characters");

        let mut req = register_req("a@example.com");
        req.address = "  ".to_string();
        assert!(matches!(
            svc.register(req).await.unwrap_err(),
            AuthError::Validation(_)
        ));

        let mut req = register_req("a@example.com");
        req.latitude = Some(95.0);
        req.longitude = Some(106.0);
        assert!(matches!(
            svc.register(req).await.unwrap_err(),
            AuthError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_and_role_fallback() {
        let svc = service();
        let mut req = register_req("owner@example.com");
        req.role = Some("laundry_owner".to_string());
        let owner = svc.register(req).await.unwrap();
        assert_eq!(owner.user.role, UserRole::LaundryOwner);

        let err = svc
            .register(register_req("owner@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));

        let mut req = register_req("admin@example.com");
        req.role = Some("admin".to_string());
        assert_eq!(svc.register(req).await.unwrap().user.role, UserRole::Customer);
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let svc = service();
        svc.register(register_req("sari@example.com")).await.unwrap();

        let wrong_password = svc
            .login(LoginRequest {
                email: "sari@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        let unknown = svc
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_update_location() {
        let svc = service();
        let user = svc.register(register_req("sari@example.com")).await.unwrap().user;

        let profile = svc
            .update_location(
                user.id,
                UpdateLocationRequest {
                    latitude: -6.2088,
                    longitude: 106.8456,
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.latitude, Some(-6.2088));

        let err = svc
            .update_location(
                user.id,
                UpdateLocationRequest {
                    latitude: 0.0,
                    longitude: 200.0,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let svc = service();
        let other = UserAuthService::new(Arc::new(MemoryStore::new()), "other".to_string(), 24);
        let user = User {
            id: Uuid::new_v4(),
            name: "Sari".to_string(),
            email: "sari@example.com".to_string(),
            password_hash: String::new(),
            phone: String::new(),
            address: String::new(),
            location: None,
            role: UserRole::LaundryOwner,
            created_at: Utc::now(),
        };
        let token = other.issue_token(&user).unwrap();
        assert!(matches!(
            svc.verify_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }
}
