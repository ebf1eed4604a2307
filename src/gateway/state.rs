use std::sync::Arc;

use crate::db::Database;
use crate::laundry::LaundrySearch;
use crate::order::{OrderService, StatusPolicy};
use crate::store::{LaundryStore, OrderStore, ServiceStore, UserStore};
use crate::user_auth::UserAuthService;

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<LaundrySearch>,
    pub orders: Arc<OrderService>,
    pub user_auth: Arc<UserAuthService>,
    /// PostgreSQL pool, pinged by the health check; `None` on the in-memory store
    pub db: Option<Arc<Database>>,
}

impl AppState {
    /// Wire every service onto one store implementation
    pub fn new<S>(
        store: Arc<S>,
        db: Option<Arc<Database>>,
        jwt_secret: String,
        jwt_expiry_hours: i64,
        status_policy: StatusPolicy,
    ) -> Self
    where
        S: LaundryStore + ServiceStore + OrderStore + UserStore + 'static,
    {
        let search = LaundrySearch::new(store.clone(), store.clone(), store.clone());
        let orders = OrderService::new(store.clone(), store.clone(), store.clone(), status_policy);
        let user_auth = UserAuthService::new(store, jwt_secret, jwt_expiry_hours);
        Self {
            search: Arc::new(search),
            orders: Arc::new(orders),
            user_auth: Arc::new(user_auth),
            db,
        }
    }
}
