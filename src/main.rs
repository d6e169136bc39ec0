use axum::http::{HeaderValue, Method, header};
use church_server::core::telemetry::init_tracing;
use church_server::core::{AppState, Config};
use church_server::create_router;
use church_server::services::bootstrap_admin;
use church_server::storage::UploadStore;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    // Configurazione da .env / variabili d'ambiente
    let config = Config::from_env().inspect_err(|e| error!("Invalid configuration: {}", e))?;
    config.print_info();

    // Pool di connessioni e migrazioni
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    // Cartella delle foto profilo
    let uploads = UploadStore::new(config.upload_dir.clone(), config.max_upload_bytes);
    uploads.ensure_dir().await?;

    let state = Arc::new(AppState::new(pool, config.jwt_secret.clone(), uploads));

    // Primo amministratore, solo se la tabella staff è vuota
    match (config.admin_nickname.as_deref(), config.admin_pin.as_deref()) {
        (Some(nickname), Some(pin)) => {
            if let Err(e) = bootstrap_admin(&state, nickname, pin).await {
                error!("Admin bootstrap failed: {:?}", e);
            }
        }
        (None, None) => {}
        _ => warn!("ADMIN_NICKNAME and ADMIN_PIN must be set together, skipping admin bootstrap"),
    }

    let app = create_router(state).layer(cors_layer(config.cors_origin.as_deref())?);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// CORS aperto a tutti, oppure ristretto all'origine del client (con cookie)
fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, header::InvalidHeaderValue> {
    let layer = match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_str(origin)?))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };
    Ok(layer.expose_headers([header::AUTHORIZATION]))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Received Ctrl+C, shutting down"),
        _ = terminate => warn!("Received terminate signal, shutting down"),
    }
}
