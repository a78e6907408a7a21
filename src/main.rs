use library_ledger::{
    adapters::memory::InMemoryLedgerStore,
    api::{handlers::AppState, router::create_router},
    application::ledger::{Ledger, SharedLedger},
    config::Config,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_ledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    tracing::info!("Library administrator: {}", config.admin);

    // Create the ledger with an empty store
    let ledger = Ledger::new(config.admin.clone(), InMemoryLedgerStore::new());
    let app_state = Arc::new(AppState {
        ledger: SharedLedger::new(ledger),
    });

    // Create router
    let app = create_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
