use std::{env, path::PathBuf, str::FromStr};

use anyhow::{Context, bail};
use sqlx::postgres::PgConnectOptions;

const DEV_SESSION_SECRET: &str = "dev_secret_min_32_chars_long";

/// Where the database lives: either a single URL or discrete connection parts.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        port: Option<u16>,
        user: String,
        password: String,
        database: String,
    },
}

impl DatabaseConfig {
    /// Build sqlx connect options. Discrete parts are passed through as-is,
    /// so passwords never need URL escaping.
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        match self {
            DatabaseConfig::Url(url) => {
                PgConnectOptions::from_str(url).context("DATABASE_URL is not a valid Postgres URL")
            }
            DatabaseConfig::Parts {
                host,
                port,
                user,
                password,
                database,
            } => {
                let mut options = PgConnectOptions::new()
                    .host(host)
                    .username(user)
                    .password(password)
                    .database(database);
                if let Some(port) = port {
                    options = options.port(*port);
                }
                Ok(options)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub session_secret: String,
    pub secure_cookies: bool,
    pub admin_email: String,
    pub admin_password: String,
    pub model_path: Option<PathBuf>,
    pub dataset_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = match get("DATABASE_URL") {
            Some(url) => DatabaseConfig::Url(url),
            None => {
                let (Some(host), Some(user), Some(password), Some(database)) = (
                    get("DB_HOST"),
                    get("DB_USER"),
                    get("DB_PASSWORD"),
                    get("DB_NAME"),
                ) else {
                    bail!("set DATABASE_URL or DB_HOST, DB_USER, DB_PASSWORD and DB_NAME");
                };
                let port = match get("DB_PORT") {
                    Some(p) => Some(p.parse::<u16>().context("DB_PORT must be a port number")?),
                    None => None,
                };
                DatabaseConfig::Parts {
                    host,
                    port,
                    user,
                    password,
                    database,
                }
            }
        };

        let host = get("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = get("APP_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let max_connections = get("DB_MAX_CONNECTIONS")
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(10);

        let session_secret = match get("SESSION_SECRET") {
            Some(secret) => secret,
            None => {
                tracing::warn!("SESSION_SECRET is not set, using the development secret");
                DEV_SESSION_SECRET.to_string()
            }
        };
        let secure_cookies = get("COOKIE_SECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database,
            max_connections,
            host,
            port,
            session_secret,
            secure_cookies,
            admin_email: get("ADMIN_EMAIL").unwrap_or_else(|| "admin@skinlab.com".to_string()),
            admin_password: get("ADMIN_PASSWORD").unwrap_or_else(|| "admin123".to_string()),
            model_path: get("MODEL_PATH").map(PathBuf::from),
            dataset_dir: get("DATASET_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public/dataset")),
        })
    }
}
