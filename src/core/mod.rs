//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Autenticazione staff (nickname + PIN) e JWT
//! - Configurazione
//! - Gestione errori
//! - Stato applicazione
//! - Logging

pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod telemetry;

// Re-exports per facilitare l'import
pub use auth::{Claims, authentication_middleware, decode_jwt, encode_jwt, require_role};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
