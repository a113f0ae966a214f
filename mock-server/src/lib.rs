//! In-memory stand-in for the UDS partner API.
//!
//! Serves the same routes and error bodies as `https://api.uds.app/partner/v2`
//! from a seeded [`Store`], guarded by Basic auth with [`COMPANY_ID`] and
//! [`API_KEY`].

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::{net::TcpListener, sync::RwLock};

mod error;
mod handlers;
mod store;

pub use error::{ApiFailure, FieldFailure};
pub use store::Store;

pub const COMPANY_ID: &str = "549755813888";
pub const API_KEY: &str = "mock-api-key";

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/customers", get(handlers::list_customers))
        .route("/customers/find", get(handlers::find_customer))
        .route("/customers/{id}", get(handlers::get_customer))
        .route(
            "/customers/{id}/tags",
            get(handlers::get_customer_tags).post(handlers::set_customer_tags),
        )
        .route(
            "/operations",
            get(handlers::list_operations).post(handlers::create_operation),
        )
        .route("/operations/calc", post(handlers::calc_operation))
        .route("/operations/reward", post(handlers::reward))
        .route("/operations/{id}", get(handlers::get_operation))
        .route("/operations/{id}/refund", post(handlers::refund_operation))
        .route(
            "/goods-orders/{id}",
            get(handlers::get_order).put(handlers::update_order),
        )
        .route("/goods-orders/{id}/complete", post(handlers::complete_order))
        .route("/goods-orders/{id}/code", post(handlers::order_code))
        .route("/settings", get(handlers::settings))
        .layer(middleware::from_fn(require_basic_auth))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_basic_auth(request: Request, next: Next) -> Result<Response, ApiFailure> {
    tracing::info!(method = %request.method(), uri = %request.uri(), "request");
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Basic "))
        .and_then(|encoded| STANDARD.decode(encoded).ok())
        .is_some_and(|decoded| decoded == format!("{COMPANY_ID}:{API_KEY}").as_bytes());
    if !authorized {
        tracing::warn!(uri = %request.uri(), "rejected credentials");
        return Err(ApiFailure::new(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Invalid company id or api key",
        ));
    }
    Ok(next.run(request).await)
}
