//! Session extractors.
//!
//! The session is a signed token kept in an HttpOnly cookie. A Bearer token in
//! the `Authorization` header is accepted as well.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::{FutureExt, LocalBoxFuture};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use yatube_core::ports::AuthError;

use crate::middleware::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "yatube_session";
pub const LOGIN_URL: &str = "/auth/login/";

/// Escaped in `next`: everything but unreserved characters and `/`.
const NEXT_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Authenticated user identity extractor.
///
/// Handlers that take an `Identity` require a logged-in user; anonymous
/// requests are redirected to the login page with a `next` parameter:
/// ```ignore
/// async fn follow_index(identity: Identity) -> AppResult<HttpResponse> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
}

fn session_token(req: &HttpRequest) -> Result<String, AuthError> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Ok(cookie.value().to_string());
    }

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

/// The logged-in user behind `req`, if any.
///
/// A valid token whose account no longer exists counts as no session.
async fn resolve(req: &HttpRequest) -> Result<Option<Identity>, AppError> {
    let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
        tracing::error!("AppState not found in app data");
        return Err(AppError::Internal("Server configuration error".to_string()));
    };

    let claims = match session_token(req).and_then(|token| state.tokens.validate_token(&token)) {
        Ok(claims) => claims,
        Err(AuthError::MissingAuth) => return Ok(None),
        Err(e) => {
            tracing::debug!(error = %e, path = %req.path(), "Rejected session");
            return Ok(None);
        }
    };

    match state.accounts.find_by_id(claims.user_id).await? {
        Some(user) => Ok(Some(Identity {
            user_id: user.id,
            username: user.username,
        })),
        None => {
            tracing::debug!(user_id = %claims.user_id, "Session of a deleted account");
            Ok(None)
        }
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        async move {
            if let Some(identity) = resolve(&req).await? {
                return Ok(identity);
            }
            let next = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or_else(|| req.path());
            Err(AppError::LoginRequired(login_redirect(next)))
        }
        .boxed_local()
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        async move { resolve(&req).await.map(OptionalIdentity) }.boxed_local()
    }
}

/// Login page URL that returns to `next` afterwards.
pub fn login_redirect(next: &str) -> String {
    format!("{LOGIN_URL}?next={}", utf8_percent_encode(next, NEXT_ESCAPE))
}

/// Session cookie carrying `token`.
pub fn session_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

/// Cookie that clears the session in the browser.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}
