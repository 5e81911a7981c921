// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod middleware;

use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::{BcryptHasher, PasswordHasher};
use crate::domain::order::OrderService;
use crate::domain::product::ProductService;
use crate::domain::repositories::{OrderRepository, ProductRepository, UserRepository};
use crate::domain::user::UserService;
use crate::infrastructure::repositories::{
    InMemoryStore, PostgresOrderRepository, PostgresProductRepository, PostgresUserRepository,
};
use handlers::{admin, auth, orders, products, users};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub products: Arc<ProductService>,
    pub orders: Arc<OrderService>,
    pub jwt_secret: Arc<str>,
    pub token_ttl_hours: i64,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        hasher: Arc<dyn PasswordHasher>,
        jwt_secret: &str,
        token_ttl_hours: i64,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(users, hasher)),
            products: Arc::new(ProductService::new(products.clone())),
            orders: Arc::new(OrderService::new(orders, products)),
            jwt_secret: Arc::from(jwt_secret),
            token_ttl_hours,
        }
    }

    /// Wires the services to PostgreSQL repositories sharing one pool
    pub fn with_postgres(pool: PgPool, jwt_secret: &str, token_ttl_hours: i64) -> Self {
        Self::new(
            Arc::new(PostgresUserRepository::new(pool.clone())),
            Arc::new(PostgresProductRepository::new(pool.clone())),
            Arc::new(PostgresOrderRepository::new(pool)),
            Arc::new(BcryptHasher::default()),
            jwt_secret,
            token_ttl_hours,
        )
    }

    /// Wires the services to a fresh in-process store
    pub fn with_memory_store(
        hasher: Arc<dyn PasswordHasher>,
        jwt_secret: &str,
        token_ttl_hours: i64,
    ) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(
            store.clone(),
            store.clone(),
            store,
            hasher,
            jwt_secret,
            token_ttl_hours,
        )
    }
}

/// Builds the application routes
///
/// Cross-cutting layers (tracing, CORS) are added by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(auth::health_check))
        // Auth routes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        // Account routes
        .route("/api/users/me", get(users::me).put(users::update_me))
        // Catalog routes
        .route("/api/products", get(products::list_products))
        .route("/api/products/:id", get(products::get_product))
        // Order routes
        .route("/api/orders", post(orders::place_order).get(orders::list_orders))
        .route("/api/orders/summary", get(orders::order_summary))
        .route("/api/orders/:id", get(orders::get_order))
        // Admin routes
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/:id/role", put(admin::set_user_role))
        .route(
            "/api/admin/products",
            get(admin::list_products).post(admin::create_product),
        )
        .route(
            "/api/admin/products/:id",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/api/admin/orders", get(admin::list_orders))
        .route("/api/admin/orders/:id/status", put(admin::update_order_status))
        // Shared state
        .with_state(state)
}
