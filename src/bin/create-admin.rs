use skinlab_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    services::auth_service::upsert_admin,
};

/// Create or reset the bootstrap admin from `ADMIN_EMAIL` / `ADMIN_PASSWORD`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;

    let id = upsert_admin(&pool, &config.admin_email, &config.admin_password)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    println!("Admin ready: {} (id {id})", config.admin_email);
    Ok(())
}
