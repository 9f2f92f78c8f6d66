pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod state;

pub use api::{
    envelope::ApiResponse,
    error::ApiError,
    error::Result as ApiResult,
    extractors::{
        admin_identity::AdminIdentity, auth_identity::AuthIdentity, client_meta::ClientMeta,
    },
    users::{
        change_password_request::ChangePasswordRequest,
        identity_dto::IdentityDto,
        login_request::LoginRequest,
        login_response::LoginResponse,
        refresh_request::RefreshRequest,
        refresh_response::RefreshResponse,
        register_request::RegisterRequest,
        update_details_request::UpdateDetailsRequest,
        usage_report_response::UsageReportDto,
        users::{
            change_password, get_profile, login, logout, refresh_access_token, register,
            update_details, usage_report,
        },
    },
};

pub use crate::routes::build_router;
pub use crate::state::AppState;

use wf_auth::TokenCodec;

use std::error::Error;
use std::sync::Arc;

use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = wf_config::Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let config_dir = wf_config::Config::config_dir()?;
        let log_dir = config_dir.join(&config.logging.dir);

        // Ensure log directory exists
        std::fs::create_dir_all(&log_dir)?;

        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting wf-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Initialize database pool
    let database_path = config.database_path()?;
    info!("Connecting to database: {}", database_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(database_path)
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .busy_timeout(std::time::Duration::from_secs(5)),
        )
        .await?;

    info!("Database connection established");

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../crates/wf-db/migrations")
        .run(&pool)
        .await?;
    info!("Migrations complete");

    // Token codec from validated secrets
    let (Some(access_secret), Some(refresh_secret)) = (
        config.auth.access_token_secret.as_deref(),
        config.auth.refresh_token_secret.as_deref(),
    ) else {
        unreachable!("validate() ensures both token secrets are set")
    };

    let tokens = Arc::new(TokenCodec::new(
        access_secret.as_bytes(),
        refresh_secret.as_bytes(),
        config.auth.access_token_ttl_secs,
        config.auth.refresh_token_ttl_secs,
    ));

    // Build application state
    let app_state = AppState {
        pool,
        tokens,
        cookie_secure: config.auth.cookie_secure,
        allowed_origin: config.cors.allowed_origin.clone(),
    };

    // Build router
    let app = build_router(app_state);

    // Create TCP listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    // Start server with graceful shutdown on Ctrl+C
    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received SIGINT (Ctrl+C), shutting down"),
                Err(e) => error!("Failed to listen for SIGINT: {}", e),
            }
        })
        .await?;

    info!("Graceful shutdown complete");

    Ok(())
}
