//! User identity: registration, login, JWT issuance and the bearer middleware

pub mod handlers;
pub mod middleware;
pub mod service;

pub use middleware::MaybeClaims;
pub use service::{
    AuthError, AuthResponse, Claims, LoginRequest, RegisterRequest, UpdateLocationRequest,
    UserAuthService, UserProfile, hash_password,
};
