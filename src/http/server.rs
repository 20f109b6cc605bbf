//! # API Server
//!
//! Router assembly, CORS, request tracing, and the serve loop with
//! graceful shutdown on SIGINT.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::store::DocumentStore;

use super::config::HttpConfig;
use super::tours;
use super::users;

/// Shared handler state.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

/// HTTP server for the tour catalog API.
pub struct ApiServer {
    config: HttpConfig,
    router: Router,
}

impl ApiServer {
    /// Create a server over a document store.
    pub fn new(config: HttpConfig, store: Arc<dyn DocumentStore>) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    /// Build the router with all endpoints.
    ///
    /// The fixed tour paths (`top-5-cheap`, `stats`, `monthly-plan`)
    /// are registered before the `:id` capture so they are never
    /// mistaken for identifiers.
    pub fn build_router(config: &HttpConfig, store: Arc<dyn DocumentStore>) -> Router {
        let state = Arc::new(AppState { store });

        let tours = Router::new()
            .route("/", get(tours::list_tours).post(tours::create_tour))
            .route("/top-5-cheap", get(tours::top_five_cheap))
            .route("/stats", get(tours::tour_stats))
            .route("/monthly-plan/:year", get(tours::monthly_plan))
            .route(
                "/:id",
                get(tours::get_tour)
                    .patch(tours::update_tour)
                    .delete(tours::delete_tour),
            );

        let users = Router::new()
            .route("/", get(users::list_users).post(users::create_user))
            .route("/:id", get(users::get_user));

        Router::new()
            .nest("/api/v1/tours", tours)
            .nest("/api/v1/users", users)
            .route("/health", get(health))
            .layer(Self::cors_layer(config))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    fn cors_layer(config: &HttpConfig) -> CorsLayer {
        if config.cors_origins.is_empty() {
            // No origins configured: permissive, for development.
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }

    /// Get the socket address string.
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for tests).
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until a shutdown signal arrives, then drain in-flight
    /// requests and return.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{}", e)))?;

        tracing::info!(%addr, "tour catalog API listening");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

/// GET /health — liveness probe.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({"status": "success", "data": {"message": "ok"}}))
}

/// Resolves when the process receives SIGINT.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received, draining in-flight requests");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn test_server() -> ApiServer {
        ApiServer::new(HttpConfig::with_port(8080), Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_server_reports_socket_addr() {
        assert_eq!(test_server().socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds() {
        let _router = test_server().router();
    }
}
