use std::{collections::HashMap, path::PathBuf};

use skinlab_api::config::{AppConfig, DatabaseConfig};

fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

#[tokio::test]
async fn defaults_apply_when_only_the_database_is_set() {
    let config = config_from(&[("DATABASE_URL", "postgres://localhost/skinlab")]).expect("config");

    assert_eq!(
        config.database,
        DatabaseConfig::Url("postgres://localhost/skinlab".into())
    );
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 3000);
    assert_eq!(config.max_connections, 10);
    assert!(!config.secure_cookies);
    assert!(config.session_secret.len() >= 16);
    assert_eq!(config.admin_email, "admin@skinlab.com");
    assert_eq!(config.admin_password, "admin123");
    assert_eq!(config.model_path, None);
    assert_eq!(config.dataset_dir, PathBuf::from("public/dataset"));
}

#[tokio::test]
async fn database_url_wins_over_parts() {
    let config = config_from(&[
        ("DATABASE_URL", "postgres://u:p@db/skinlab"),
        ("DB_HOST", "other"),
        ("DB_USER", "x"),
        ("DB_PASSWORD", "y"),
        ("DB_NAME", "z"),
    ])
    .expect("config");
    assert!(matches!(config.database, DatabaseConfig::Url(_)));
}

#[tokio::test]
async fn database_parts_are_collected() {
    let config = config_from(&[
        ("DB_HOST", "db.internal"),
        ("DB_PORT", "6543"),
        ("DB_USER", "skinlab"),
        ("DB_PASSWORD", "p@ss/word"),
        ("DB_NAME", "skinlab"),
    ])
    .expect("config");

    assert_eq!(
        config.database,
        DatabaseConfig::Parts {
            host: "db.internal".into(),
            port: Some(6543),
            user: "skinlab".into(),
            password: "p@ss/word".into(),
            database: "skinlab".into(),
        }
    );
    assert!(config.database.connect_options().is_ok());
}

#[tokio::test]
async fn missing_database_settings_fail() {
    assert!(config_from(&[]).is_err());
    assert!(config_from(&[("DB_HOST", "db"), ("DB_USER", "u")]).is_err());
    assert!(config_from(&[("DATABASE_URL", "   ")]).is_err());
}

#[tokio::test]
async fn bad_port_is_an_error() {
    let result = config_from(&[
        ("DB_HOST", "db"),
        ("DB_PORT", "not-a-port"),
        ("DB_USER", "u"),
        ("DB_PASSWORD", "p"),
        ("DB_NAME", "n"),
    ]);
    assert!(result.is_err());
}

#[tokio::test]
async fn overrides_are_read() {
    let config = config_from(&[
        ("DATABASE_URL", "postgres://localhost/skinlab"),
        ("APP_HOST", "0.0.0.0"),
        ("APP_PORT", "8080"),
        ("SESSION_SECRET", "a-very-long-production-secret-value"),
        ("COOKIE_SECURE", "true"),
        ("MODEL_PATH", "models/skin.onnx"),
        ("DATASET_DIR", "/data/faces"),
        ("ADMIN_EMAIL", "ops@skinlab.com"),
    ])
    .expect("config");

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8080);
    assert_eq!(config.session_secret, "a-very-long-production-secret-value");
    assert!(config.secure_cookies);
    assert_eq!(config.model_path, Some(PathBuf::from("models/skin.onnx")));
    assert_eq!(config.dataset_dir, PathBuf::from("/data/faces"));
    assert_eq!(config.admin_email, "ops@skinlab.com");
}
