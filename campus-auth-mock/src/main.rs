//! Standalone mock backend for frontend development

use campus_auth_mock::{AppState, router};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let state = Arc::new(AppState::seeded());
    let app = router(state);

    let addr = std::env::var("CAMPUS_MOCK_ADDR").unwrap_or_else(|_| "127.0.0.1:8081".to_string());
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "failed to bind mock backend");
            return;
        }
    };

    tracing::info!(addr = %addr, "campus-auth-mock listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "mock backend exited with error");
    }
}
