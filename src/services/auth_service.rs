use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    db::DbPool,
    dto::auth::{Claims, LoginRequest, SessionUser},
    error::{AppError, AppResult},
    models::AdminUser,
};

pub const SESSION_TTL_DAYS: i64 = 7;

const BCRYPT_COST: u32 = 10;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to hash password: {e}")))
}

/// A malformed hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

pub fn issue_token(user: &SessionUser, secret: &str) -> AppResult<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::days(SESSION_TTL_DAYS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        id: user.id,
        email: user.email.clone(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Verify signature and expiry. Any failure reads as "no session".
pub fn verify_token(token: &str, secret: &str) -> Option<SessionUser> {
    let validation = Validation::new(Algorithm::HS256);
    match decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation) {
        Ok(data) => Some(SessionUser {
            id: data.claims.id,
            email: data.claims.email,
        }),
        Err(err) => {
            tracing::debug!(error = %err, "rejected session token");
            None
        }
    }
}

/// Check credentials and return the admin together with a fresh token.
pub async fn login(
    pool: &DbPool,
    secret: &str,
    payload: LoginRequest,
) -> AppResult<(SessionUser, String)> {
    let (Some(email), Some(password)) = (
        payload.email.filter(|e| !e.trim().is_empty()),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::BadRequest("Email and password are required".into()));
    };
    let email = normalize_email(&email);

    let admin = sqlx::query_as::<_, AdminUser>(
        "SELECT id, email, password_hash, created_at FROM admin_users WHERE email = $1",
    )
    .bind(email.as_str())
    .fetch_optional(pool)
    .await?;

    let admin = match admin {
        Some(a) if verify_password(&password, &a.password_hash) => a,
        _ => {
            tracing::info!(email = %email, "failed admin login");
            return Err(AppError::Unauthorized("Invalid email or password".into()));
        }
    };

    let user = SessionUser {
        id: admin.id,
        email: admin.email,
    };
    let token = issue_token(&user, secret)?;
    tracing::info!(admin = %user.email, "admin logged in");
    Ok((user, token))
}

/// Create the admin or reset its password.
pub async fn upsert_admin(pool: &DbPool, email: &str, password: &str) -> AppResult<i64> {
    let hash = hash_password(password)?;
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO admin_users (email, password_hash)
        VALUES ($1, $2)
        ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash
        RETURNING id
        "#,
    )
    .bind(normalize_email(email))
    .bind(hash)
    .fetch_one(pool)
    .await?;
    Ok(id)
}
