//! End-to-end flows through the library API on the in-memory store

mod common;

use std::sync::Arc;

use common::{dec, laundry, register, service, store, SECRET};
use laundry_hub::laundry::{LaundrySearch, SearchQuery};
use laundry_hub::order::{NewOrder, OrderService, OrderStatus, RequestedService, StatusPolicy};
use laundry_hub::pagination::PageRequest;
use laundry_hub::persistence::demo_data;
use laundry_hub::store::LaundryFilter;
use laundry_hub::user_auth::{LoginRequest, UpdateLocationRequest, UserAuthService};

#[tokio::test]
async fn customer_books_and_owner_delivers() {
    let store = store();
    let auth = UserAuthService::new(store.clone(), SECRET.to_string(), 24);
    let search = LaundrySearch::new(store.clone(), store.clone(), store.clone());
    let orders = OrderService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        StatusPolicy::ForwardOnly,
    );

    let owner = register(&auth, "owner@example.com", Some("laundry_owner")).await.user;
    let customer = register(&auth, "customer@example.com", None).await.user;

    let shop = laundry(owner.id, "Kilat", "4.8", Some((-6.1944, 106.8229)));
    let wash = service(shop.id, "Cuci Kering", "8000", 24);
    let bedcover = service(shop.id, "Bed Cover", "25000", 48);
    let (shop_id, wash_id, bedcover_id) = (shop.id, wash.id, bedcover.id);
    store.insert_laundry(shop);
    store.insert_service(wash);
    store.insert_service(bedcover);

    // Customer stores a location; listing without coordinates falls back to it
    auth.update_location(
        customer.id,
        UpdateLocationRequest {
            latitude: -6.2088,
            longitude: 106.8456,
        },
    )
    .await
    .unwrap();
    let page = search
        .list(SearchQuery {
            requester: Some(customer.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.laundries.len(), 1);
    assert_eq!(page.laundries[0].distance, Some(2.98));
    assert_eq!(page.laundries[0].price_range, "Rp 8000 - Rp 25000");
    assert!(page.user_location.is_some());

    let detail = search.get_by_id(shop_id, None).await.unwrap();
    assert_eq!(detail.services.len(), 2);
    assert_eq!(detail.listing.distance, None);

    // Book
    let order = orders
        .create(
            customer.id,
            NewOrder {
                laundry_id: shop_id,
                services: vec![
                    RequestedService {
                        service_id: wash_id,
                        quantity: dec("2.5"),
                    },
                    RequestedService {
                        service_id: bedcover_id,
                        quantity: dec("1"),
                    },
                ],
                delivery_address: "Jl. Sudirman 1".to_string(),
                notes: None,
                estimated_pickup_at: Some(chrono::Utc::now()),
            },
        )
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_price, dec("45000"));
    assert_eq!(order.total_price, order.line_item_total());
    assert_eq!(
        order.estimated_delivery_at.unwrap() - order.estimated_pickup_at.unwrap(),
        chrono::Duration::hours(48)
    );

    // Owner walks it forward
    for status in ["confirmed", "picked-up", "washing", "ready", "delivered", "completed"] {
        let updated = orders.update_status(owner.id, order.id, status).await.unwrap();
        assert_eq!(updated.status.as_str(), status);
    }

    let done = orders.get(customer.id, order.id).await.unwrap();
    assert_eq!(done.status, OrderStatus::Completed);
    assert!(done.actual_pickup_at.is_some());
    assert!(done.actual_delivery_at.is_some());

    // Terminal: neither side can move it again
    assert!(orders.cancel(customer.id, order.id).await.unwrap_err().is_conflict());
    assert!(
        orders
            .update_status(owner.id, order.id, "washing")
            .await
            .unwrap_err()
            .is_conflict()
    );
}

#[tokio::test]
async fn ranking_and_pagination_span_pages() {
    let store = store();
    let search = LaundrySearch::new(store.clone(), store.clone(), store.clone());
    let owner = uuid::Uuid::new_v4();

    // 12 located laundries at increasing distance plus one without a location
    for i in 0..12 {
        let lat = -6.20 - f64::from(i) * 0.01;
        store.insert_laundry(laundry(owner, &format!("Located{i:02}"), "3.0", Some((lat, 106.84))));
    }
    store.insert_laundry(laundry(owner, "Nowhere", "5.0", None));

    let origin = laundry_hub::geo::Coordinates::new(-6.20, 106.84).unwrap();
    let first = search
        .list(SearchQuery {
            coordinates: Some(origin),
            page: PageRequest::new(Some(1), Some(5)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(first.pagination.total, 13);
    assert_eq!(first.pagination.total_pages, 3);
    assert_eq!(first.laundries[0].name, "Located00");

    let last = search
        .list(SearchQuery {
            coordinates: Some(origin),
            page: PageRequest::new(Some(3), Some(5)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(last.laundries.len(), 3);
    assert_eq!(last.laundries[2].name, "Nowhere");
    assert_eq!(last.laundries[2].distance, None);

    let beyond = search
        .list(SearchQuery {
            page: PageRequest::new(Some(5), Some(10)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(beyond.laundries.is_empty());
    assert_eq!(beyond.pagination.total_pages, 2);

    // No geo-context: rating first
    let by_rating = search.list(SearchQuery::default()).await.unwrap();
    assert_eq!(by_rating.laundries[0].name, "Nowhere");
    assert_eq!(by_rating.laundries[0].price_range, "Rp 0");
    assert!(by_rating.user_location.is_none());

    let filtered = search
        .list(SearchQuery {
            filter: LaundryFilter::new(Some("located1".to_string()), None),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(filtered.pagination.total, 2);
}

#[tokio::test]
async fn failed_line_items_leave_nothing_behind() {
    let store = store();
    let orders = OrderService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        StatusPolicy::default(),
    );
    let shop = laundry(uuid::Uuid::new_v4(), "Kilat", "4.0", None);
    let wash = service(shop.id, "Cuci", "8000", 24);
    let (shop_id, wash_id) = (shop.id, wash.id);
    store.insert_laundry(shop);
    store.insert_service(wash);

    store.fail_line_item_writes(true);
    let err = orders
        .create(
            uuid::Uuid::new_v4(),
            NewOrder {
                laundry_id: shop_id,
                services: vec![RequestedService {
                    service_id: wash_id,
                    quantity: dec("1"),
                }],
                delivery_address: "Jl. Melati 3".to_string(),
                notes: None,
                estimated_pickup_at: None,
            },
        )
        .await
        .unwrap_err();
    assert!(!err.is_validation());
    assert_eq!(store.order_count(), 0);
    assert_eq!(store.line_item_count(), 0);
}

#[tokio::test]
async fn issued_token_identifies_registered_user() {
    let store = store();
    let auth = Arc::new(UserAuthService::new(store.clone(), SECRET.to_string(), 1));
    let resp = register(&auth, "sari@example.com", None).await;
    let claims = auth.verify_token(&resp.token).unwrap();
    assert_eq!(claims.user_id().unwrap(), resp.user.id);
}

#[tokio::test]
async fn sub_cent_products_keep_total_equal_to_line_items() {
    let store = store();
    let orders = OrderService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        StatusPolicy::default(),
    );
    let shop = laundry(uuid::Uuid::new_v4(), "Kilat", "4.0", None);
    let wash = service(shop.id, "Cuci", "8000.25", 24);
    let iron = service(shop.id, "Setrika", "4000.25", 12);
    let (shop_id, wash_id, iron_id) = (shop.id, wash.id, iron.id);
    store.insert_laundry(shop);
    store.insert_service(wash);
    store.insert_service(iron);

    let line = |service_id, quantity: &str| RequestedService {
        service_id,
        quantity: dec(quantity),
    };
    let new_order = |services| NewOrder {
        laundry_id: shop_id,
        services,
        delivery_address: "Jl. Melati 3".to_string(),
        notes: None,
        estimated_pickup_at: None,
    };

    let order = orders
        .create(
            uuid::Uuid::new_v4(),
            new_order(vec![line(wash_id, "0.5"), line(iron_id, "0.5")]),
        )
        .await
        .unwrap();
    assert_eq!(order.line_items[0].subtotal, dec("4000.125"));
    assert_eq!(order.line_items[1].subtotal, dec("2000.125"));
    assert_eq!(order.total_price, dec("6000.25"));
    assert_eq!(order.total_price, order.line_item_total());

    // Quantities finer than cents cannot be stored faithfully
    let err = orders
        .create(uuid::Uuid::new_v4(), new_order(vec![line(wash_id, "1.255")]))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(store.order_count(), 1);
}

#[tokio::test]
async fn demo_dataset_supports_login_search_and_booking() {
    let store = store();
    let data = demo_data().unwrap();
    store.load(&data).unwrap();

    let auth = UserAuthService::new(store.clone(), SECRET.to_string(), 24);
    let search = LaundrySearch::new(store.clone(), store.clone(), store.clone());
    let orders = OrderService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        StatusPolicy::default(),
    );

    let session = auth
        .login(LoginRequest {
            email: "user@laundryhub.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

    // Sudirman: the first seeded laundry sits on the origin
    let origin = laundry_hub::geo::Coordinates::new(-6.2088, 106.8456).unwrap();
    let page = search
        .list(SearchQuery {
            coordinates: Some(origin),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 6);
    assert_eq!(page.laundries[0].name, "Laundry Express Jakarta");
    assert_eq!(page.laundries[0].distance, Some(0.0));
    assert_eq!(page.laundries[0].price_range, "Rp 5000 - Rp 25000");

    let history = orders
        .list_for_customer(session.user.id, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(history.pagination.total, 3);

    let detail = search.get_by_id(page.laundries[0].id, None).await.unwrap();
    let order = orders
        .create(
            session.user.id,
            NewOrder {
                laundry_id: detail.listing.id,
                services: vec![RequestedService {
                    service_id: detail.services[0].id,
                    quantity: dec("2"),
                }],
                delivery_address: "Jl. Sudirman No. 123".to_string(),
                notes: None,
                estimated_pickup_at: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
}
