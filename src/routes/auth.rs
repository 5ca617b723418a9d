use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, header},
    response::Redirect,
    routing::{get, post},
};

use crate::{
    dto::auth::{LoginRequest, SessionResponse},
    error::AppResult,
    middleware::auth::{current_session, removal_cookie, session_cookie},
    response::{ApiResponse, Meta},
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/auth/session", get(session))
        .route("/logout", post(logout))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; sets the session cookie", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<([(header::HeaderName, String); 1], Json<ApiResponse<SessionResponse>>)> {
    let (user, token) = auth_service::login(&state.pool, &state.config.session_secret, payload).await?;
    let cookie = session_cookie(&token, state.config.secure_cookies);
    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Json(ApiResponse::success(
            "Login successful",
            SessionResponse { user },
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session, or null when signed out", body = SessionResponse)
    ),
    tag = "Auth"
)]
pub async fn session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<Option<SessionResponse>> {
    Json(
        current_session(&headers, &state.config.session_secret)
            .map(|user| SessionResponse { user }),
    )
}

#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 303, description = "Session cleared, redirect to the login page")
    ),
    tag = "Auth"
)]
pub async fn logout(State(state): State<AppState>) -> ([(header::HeaderName, String); 1], Redirect) {
    let cookie = removal_cookie(state.config.secure_cookies);
    ([(header::SET_COOKIE, cookie.to_string())], Redirect::to("/login"))
}
