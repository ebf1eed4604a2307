//! Demo dataset
//!
//! Three accounts, six Jakarta laundries owned by one laundry owner, their
//! service catalogs, and a few orders at different stages. Orders are priced
//! through [`quote`](crate::order::quote) so their totals always match the
//! line items.
//!
//! Loaded by the `seed` binary into PostgreSQL, or by `laundry_hub --seed`
//! into the in-memory store.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::geo::{Coordinates, GeoError};
use crate::models::{Laundry, OperatingHours, Order, Service, User, UserRole};
use crate::order::{OrderStatus, PricingError, quote};
use crate::user_auth::{AuthError, hash_password};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("password hashing failed: {0}")]
    Auth(#[from] AuthError),

    #[error("pricing failed: {0}")]
    Pricing(#[from] PricingError),

    #[error("invalid coordinates: {0}")]
    Geo(#[from] GeoError),

    #[error("laundry '{laundry}' has no service '{service}'")]
    MissingService { laundry: String, service: String },
}

/// Rows to insert, in foreign-key order
#[derive(Debug, Clone)]
pub struct SeedData {
    pub users: Vec<User>,
    /// Each laundry carries its services in `services`
    pub laundries: Vec<Laundry>,
    pub orders: Vec<Order>,
}

impl SeedData {
    pub fn service_count(&self) -> usize {
        self.laundries.iter().map(|l| l.services.len()).sum()
    }
}

struct LaundrySpec {
    name: &'static str,
    description: &'static str,
    address: &'static str,
    rating: Decimal,
    review_count: i32,
    is_open: bool,
    hours: (&'static str, &'static str),
    location: (f64, f64),
}

struct ServiceSpec {
    name: &'static str,
    description: &'static str,
    price: i64,
    unit: &'static str,
    lead_time_hours: u32,
    category: &'static str,
    /// Indexes into the laundry list
    offered_by: &'static [usize],
}

fn laundry_specs() -> Vec<LaundrySpec> {
    let spec = |name: &'static str,
                description: &'static str,
                address: &'static str,
                rating: i64,
                review_count: i32,
                is_open: bool,
                hours: (&'static str, &'static str),
                location: (f64, f64)| {
        LaundrySpec {
            name,
            description,
            address,
            rating: Decimal::new(rating, 1),
            review_count,
            is_open,
            hours,
            location,
        }
    };
    vec![
        spec(
            "Laundry Express Jakarta",
            "Laundry cepat dan berkualitas dengan layanan pick-up & delivery gratis",
            "Jl. Sudirman No. 123, Jakarta Pusat",
            48,
            234,
            true,
            ("08:00", "20:00"),
            (-6.2088, 106.8456),
        ),
        spec(
            "Clean & Fresh Laundry",
            "Spesialis dry clean dan cuci premium dengan teknologi terbaru",
            "Jl. Thamrin No. 45, Jakarta Pusat",
            49,
            189,
            true,
            ("07:00", "21:00"),
            (-6.1944, 106.8229),
        ),
        spec(
            "Quick Wash Laundry",
            "Layanan express 6 jam dengan harga terjangkau",
            "Jl. Gatot Subroto No. 78, Jakarta Selatan",
            46,
            156,
            true,
            ("08:00", "22:00"),
            (-6.2297, 106.7994),
        ),
        spec(
            "Premium Laundry Service",
            "Layanan premium dengan perawatan khusus untuk pakaian mahal",
            "Jl. Kemang Raya No. 12, Jakarta Selatan",
            47,
            98,
            false,
            ("09:00", "18:00"),
            (-6.2603, 106.8106),
        ),
        spec(
            "Eco Laundry",
            "Laundry ramah lingkungan dengan detergen organik",
            "Jl. Kebayoran Baru No. 56, Jakarta Selatan",
            45,
            201,
            true,
            ("07:30", "19:30"),
            (-6.2442, 106.7996),
        ),
        spec(
            "24/7 Laundry",
            "Buka 24 jam untuk kenyamanan Anda",
            "Jl. Senopati No. 34, Jakarta Selatan",
            44,
            312,
            true,
            ("00:00", "23:59"),
            (-6.2456, 106.8006),
        ),
    ]
}

const SERVICE_SPECS: &[ServiceSpec] = &[
    ServiceSpec {
        name: "Cuci Reguler",
        description: "Cuci dan setrika pakaian biasa",
        price: 8000,
        unit: "kg",
        lead_time_hours: 24,
        category: "regular",
        offered_by: &[0, 1, 2, 4, 5],
    },
    ServiceSpec {
        name: "Cuci Express",
        description: "Cuci cepat 6 jam",
        price: 12000,
        unit: "kg",
        lead_time_hours: 6,
        category: "express",
        offered_by: &[0, 2, 4, 5],
    },
    ServiceSpec {
        name: "Dry Clean",
        description: "Dry clean untuk pakaian khusus",
        price: 25000,
        unit: "pcs",
        lead_time_hours: 48,
        category: "dry-clean",
        offered_by: &[0, 1, 3],
    },
    ServiceSpec {
        name: "Setrika Saja",
        description: "Hanya setrika tanpa cuci",
        price: 5000,
        unit: "kg",
        lead_time_hours: 12,
        category: "ironing",
        offered_by: &[0, 1, 2, 4, 5],
    },
    ServiceSpec {
        name: "Cuci Karpet",
        description: "Cuci karpet ukuran kecil",
        price: 50000,
        unit: "pcs",
        lead_time_hours: 72,
        category: "regular",
        offered_by: &[1, 3],
    },
];

fn user(
    name: &str,
    email: &str,
    password: &str,
    phone: &str,
    address: &str,
    role: UserRole,
    now: DateTime<Utc>,
) -> Result<User, SeedError> {
    Ok(User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: hash_password(password)?,
        phone: phone.to_string(),
        address: address.to_string(),
        location: None,
        role,
        created_at: now,
    })
}

fn find_service<'a>(laundry: &'a Laundry, name: &str) -> Result<&'a Service, SeedError> {
    laundry
        .services
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| SeedError::MissingService {
            laundry: laundry.name.clone(),
            service: name.to_string(),
        })
}

struct OrderSpec<'a> {
    laundry: &'a Laundry,
    lines: &'a [(&'a str, i64)],
    status: OrderStatus,
    notes: Option<&'a str>,
    /// How long ago the order was placed
    age: Duration,
}

fn order(customer: &User, spec: OrderSpec<'_>, now: DateTime<Utc>) -> Result<Order, SeedError> {
    let lines = spec
        .lines
        .iter()
        .map(|(name, qty)| {
            let service = find_service(spec.laundry, name)?;
            Ok::<_, SeedError>((service, Decimal::from(*qty)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let priced = quote(&lines)?;

    let created_at = now - spec.age;
    let pickup = created_at + Duration::hours(2);
    let reached = |step: OrderStatus| spec.status == step || step.can_advance_to(spec.status);
    let picked_up = reached(OrderStatus::PickedUp);
    let delivered = reached(OrderStatus::Delivered);

    Ok(Order {
        id: Uuid::new_v4(),
        customer_id: customer.id,
        laundry_id: spec.laundry.id,
        laundry_name: spec.laundry.name.clone(),
        status: spec.status,
        total_price: priced.total,
        delivery_address: customer.address.clone(),
        notes: spec.notes.map(str::to_string),
        estimated_pickup_at: Some(pickup),
        estimated_delivery_at: priced.estimated_delivery(Some(pickup)),
        actual_pickup_at: picked_up.then_some(pickup),
        actual_delivery_at: delivered
            .then(|| pickup + Duration::hours(i64::from(priced.max_lead_time_hours))),
        line_items: priced.line_items,
        created_at,
        updated_at: now,
    })
}

/// Build the demo dataset. Ids are fresh on every call.
pub fn demo_data() -> Result<SeedData, SeedError> {
    let now = Utc::now();

    let customer = user(
        "John Doe",
        "user@laundryhub.com",
        "password123",
        "081234567890",
        "Jl. Sudirman No. 123, Jakarta Pusat",
        UserRole::Customer,
        now,
    )?;
    let owner = user(
        "Admin User",
        "admin@laundryhub.com",
        "admin123",
        "081987654321",
        "Jl. Thamrin No. 45, Jakarta Pusat",
        UserRole::LaundryOwner,
        now,
    )?;
    let tester = user(
        "Test User",
        "test@test.com",
        "test123",
        "081111111111",
        "Jl. Test No. 1, Jakarta",
        UserRole::Customer,
        now,
    )?;

    let mut laundries = laundry_specs()
        .into_iter()
        .map(|spec| {
            Ok::<_, SeedError>(Laundry {
                id: Uuid::new_v4(),
                owner_id: owner.id,
                name: spec.name.to_string(),
                description: spec.description.to_string(),
                address: spec.address.to_string(),
                location: Some(Coordinates::new(spec.location.0, spec.location.1)?),
                image_url: String::new(),
                rating: spec.rating,
                review_count: spec.review_count,
                is_open: spec.is_open,
                operating_hours: OperatingHours {
                    open: spec.hours.0.to_string(),
                    close: spec.hours.1.to_string(),
                },
                services: Vec::new(),
                created_at: now,
            })
        })
        .collect::<Result<Vec<_>, SeedError>>()?;

    for spec in SERVICE_SPECS {
        for &idx in spec.offered_by {
            let laundry = &mut laundries[idx];
            laundry.services.push(Service {
                id: Uuid::new_v4(),
                laundry_id: laundry.id,
                name: spec.name.to_string(),
                description: spec.description.to_string(),
                price: Decimal::from(spec.price),
                unit: spec.unit.to_string(),
                lead_time_hours: spec.lead_time_hours,
                category: spec.category.to_string(),
                is_active: true,
            });
        }
    }

    let orders = vec![
        order(
            &customer,
            OrderSpec {
                laundry: &laundries[0],
                lines: &[("Cuci Reguler", 3), ("Setrika Saja", 2)],
                status: OrderStatus::Washing,
                notes: Some("Mohon hati-hati dengan pakaian putih"),
                age: Duration::hours(20),
            },
            now,
        )?,
        order(
            &customer,
            OrderSpec {
                laundry: &laundries[1],
                lines: &[("Dry Clean", 1)],
                status: OrderStatus::Ready,
                notes: None,
                age: Duration::days(2),
            },
            now,
        )?,
        order(
            &customer,
            OrderSpec {
                laundry: &laundries[2],
                lines: &[("Cuci Express", 2)],
                status: OrderStatus::Delivered,
                notes: None,
                age: Duration::days(3),
            },
            now,
        )?,
        order(
            &tester,
            OrderSpec {
                laundry: &laundries[4],
                lines: &[("Cuci Reguler", 5)],
                status: OrderStatus::Pending,
                notes: None,
                age: Duration::minutes(30),
            },
            now,
        )?,
    ];

    Ok(SeedData {
        users: vec![customer, owner, tester],
        laundries,
        orders,
    })
}
