// Server module - HTTP server setup and routing
pub mod handlers;
pub mod state;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use ratings_ledger::RatingLedger;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use self::state::AppState;
use crate::errors::ServerError;

/// Create the Axum application router with all routes and middleware
pub fn create_app(ledger: Arc<dyn RatingLedger>, allowed_origins: &[String]) -> Router {
    let state = AppState { ledger };

    Router::new()
        .route("/ratings", get(handlers::ratings_handler))
        .route("/votes", post(handlers::votes_handler))
        .route("/health", get(handlers::health_check))
        .layer(create_cors_layer(allowed_origins))
        .with_state(state)
}

fn create_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

/// Serve `app` on an already bound listener until `shutdown` resolves.
pub async fn run_server<F>(app: Router, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = listener.local_addr()?;
    info!("Server listening on {}", addr);
    info!("- Ratings endpoint: http://{}/ratings", addr);
    info!("- Votes endpoint: http://{}/votes", addr);
    info!("- Health endpoint: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shut down");
    Ok(())
}
