//! TyphoonX Functions - the signup service.
//!
//! Serves the account-creation endpoint on port 3100. Holds the privileged
//! service-role key; the admin console never sees it.

#![cfg_attr(not(test), forbid(unsafe_code))]

use typhoonx_functions::config::FunctionsConfig;
use typhoonx_functions::signup::{self, ServiceState};

#[tokio::main]
async fn main() {
    // Missing endpoint/key configuration is fatal here, before anything binds.
    let config = FunctionsConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "typhoonx_functions=info,tower_http=debug".into());

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let state = ServiceState::new(&config).expect("Failed to initialize service state");
    let app = signup::router(&config, state);

    let addr = config.socket_addr();
    tracing::info!("signup service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
