//! Inizializzazione del subscriber `tracing` globale

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info,sqlx=warn,tower_http=info";

/// Installa il subscriber: filtro da `RUST_LOG` se presente, altrimenti [`DEFAULT_FILTER`].
/// Ritorna errore se un subscriber globale è già stato installato.
pub fn init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
}
