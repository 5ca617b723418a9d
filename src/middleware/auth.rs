use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{HeaderMap, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use cookie::{Cookie, SameSite, time::Duration};

use crate::{
    dto::auth::SessionUser,
    services::auth_service::{SESSION_TTL_DAYS, verify_token},
    state::AppState,
};

pub const SESSION_COOKIE: &str = "admin_session";

pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(SESSION_TTL_DAYS))
        .secure(secure)
        .build()
}

/// A cookie that makes the browser drop the session.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .build();
    cookie.make_removal();
    cookie
}

/// Raw session token from the request's `Cookie` headers.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

pub fn current_session(headers: &HeaderMap, secret: &str) -> Option<SessionUser> {
    let token = session_token(headers)?;
    verify_token(&token, secret)
}

/// Redirect to the login page, remembering where the visitor was going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub callback: String,
}

impl LoginRedirect {
    pub fn location(&self) -> String {
        format!("/login?callbackUrl={}", encode_query_value(&self.callback))
    }
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.location()).into_response()
    }
}

fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Full request path. Nested routers strip their prefix from `parts.uri`,
/// so the untouched `OriginalUri` wins when the router recorded it.
fn request_path(parts: &Parts) -> String {
    parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| original.0.path())
        .unwrap_or_else(|| parts.uri.path())
        .to_string()
}

/// The admin behind a valid session cookie. Missing, forged and expired
/// tokens all redirect to the login page.
#[derive(Debug, Clone)]
pub struct AdminSession(pub SessionUser);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match current_session(&parts.headers, &state.config.session_secret) {
            Some(user) => Ok(AdminSession(user)),
            None => Err(LoginRedirect {
                callback: request_path(parts),
            }),
        }
    }
}
