//! Shared seeding for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use laundry_hub::geo::Coordinates;
use laundry_hub::models::{Laundry, OperatingHours, Service};
use laundry_hub::persistence::MemoryStore;
use laundry_hub::user_auth::{AuthResponse, RegisterRequest, UserAuthService};

pub const SECRET: &str = "integration-secret";

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn laundry(owner_id: Uuid, name: &str, rating: &str, location: Option<(f64, f64)>) -> Laundry {
    Laundry {
        id: Uuid::new_v4(),
        owner_id,
        name: name.to_string(),
        description: format!("{name} laundry"),
        address: format!("Jl. {name} No. 1, Jakarta"),
        location: location.map(|(lat, lng)| Coordinates::new(lat, lng).unwrap()),
        image_url: format!("https://img.example.com/{}.jpg", name.to_lowercase()),
        rating: dec(rating),
        review_count: 10,
        is_open: true,
        operating_hours: OperatingHours {
            open: "08:00".to_string(),
            close: "21:00".to_string(),
        },
        services: vec![],
        created_at: Utc::now(),
    }
}

pub fn service(laundry_id: Uuid, name: &str, price: &str, lead_time_hours: u32) -> Service {
    Service {
        id: Uuid::new_v4(),
        laundry_id,
        name: name.to_string(),
        description: String::new(),
        price: dec(price),
        unit: "kg".to_string(),
        lead_time_hours,
        category: "wash".to_string(),
        is_active: true,
    }
}

pub fn register_request(email: &str, role: Option<&str>) -> RegisterRequest {
    RegisterRequest {
        name: "Test User".to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        phone: "081234567890".to_string(),
        address: "Jl. Kemang Raya 10".to_string(),
        latitude: None,
        longitude: None,
        role: role.map(str::to_string),
    }
}

pub async fn register(auth: &UserAuthService, email: &str, role: Option<&str>) -> AuthResponse {
    auth.register(register_request(email, role)).await.unwrap()
}

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}
