use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "un segreto meno bello";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub cors_origin: Option<String>,
    pub admin_nickname: Option<String>,
    pub admin_pin: Option<String>,
    pub app_env: String,
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://church.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using default (not secure for production!)");
            DEFAULT_JWT_SECRET.to_string()
        });

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = parse_var::<u16>("SERVER_PORT", "3000")
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let max_connections = parse_var::<u32>("MAX_DB_CONNECTIONS", "10")
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        let upload_dir = PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()));

        let max_upload_bytes = parse_var::<usize>("MAX_UPLOAD_BYTES", "5242880")
            .map_err(|_| "Invalid MAX_UPLOAD_BYTES: must be a positive number".to_string())?;

        let cors_origin = optional_var("CORS_ORIGIN");
        let admin_nickname = optional_var("ADMIN_NICKNAME");
        let admin_pin = optional_var("ADMIN_PIN");

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            database_url,
            jwt_secret,
            server_host,
            server_port,
            max_connections,
            upload_dir,
            max_upload_bytes,
            cors_origin,
            admin_nickname,
            admin_pin,
            app_env,
        })
    }

    /// Stampa la configurazione (nascondendo i segreti)
    pub fn print_info(&self) {
        info!("Server configuration:");
        info!("   Environment: {}", self.app_env);
        info!("   Server Address: {}:{}", self.server_host, self.server_port);
        info!("   Database: {}", Self::mask_url(&self.database_url));
        info!("   Max DB Connections: {}", self.max_connections);
        info!("   Upload Dir: {} (max {} bytes)", self.upload_dir.display(), self.max_upload_bytes);
        info!("   CORS Origin: {}", self.cors_origin.as_deref().unwrap_or("*"));
        info!(
            "   JWT Secret: {}",
            if self.jwt_secret == DEFAULT_JWT_SECRET {
                "USING DEFAULT (INSECURE!)"
            } else {
                "custom secret configured"
            }
        );
        if let Some(nickname) = &self.admin_nickname {
            info!("   Bootstrap admin: {}", nickname);
        }
    }

    /// Maschera le credenziali dell'URL del database per il logging
    fn mask_url(url: &str) -> String {
        if let (Some(at_pos), Some(scheme_end)) = (url.find('@'), url.find("://")) {
            let scheme = &url[..scheme_end + 3];
            let after_at = &url[at_pos..];
            return format!("{}***{}", scheme, after_at);
        }
        // sqlite non ha credenziali, il path si può mostrare
        if url.starts_with("sqlite:") {
            return url.to_string();
        }
        "***".to_string()
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, T::Err> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
