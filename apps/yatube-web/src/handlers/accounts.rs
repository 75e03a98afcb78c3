//! Signup, login, logout and password change.

use actix_web::{HttpResponse, http::header, web};
use serde::Deserialize;

use yatube_core::domain::User;
use yatube_core::error::DomainError;
use yatube_shared::forms::{BAD_CREDENTIALS, NON_FIELD};
use yatube_shared::{FormErrors, LoginForm, PasswordChangeForm, SignupForm, safe_next};

use super::{html, redirect};
use crate::middleware::auth::{Identity, removal_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::render;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Redirect to `location` with a fresh session for `user`.
fn start_session(state: &AppState, user: &User, location: &str) -> AppResult<HttpResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let cookie = session_cookie(
        token,
        state.tokens.expiration_seconds(),
        state.site.session_cookie_secure,
    );

    tracing::info!(user_id = %user.id, "Session started");
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish())
}

/// GET /auth/signup/
pub async fn signup_form() -> HttpResponse {
    html(render::accounts::signup(
        &SignupForm::default(),
        &FormErrors::new(),
    ))
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    form: web::Form<SignupForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let errors = match form.clean() {
        Ok(new_user) => match state.accounts.signup(new_user).await {
            Ok(user) => return start_session(&state, &user, "/"),
            Err(DomainError::Validation { field, messages }) => FormErrors::field(field, messages),
            Err(e) => return Err(e.into()),
        },
        Err(errors) => errors,
    };

    Ok(html(render::accounts::signup(&form, &errors)))
}

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    html(render::accounts::login(
        "",
        safe_next(query.next.as_deref()),
        &FormErrors::new(),
    ))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let next = safe_next(form.next.as_deref());

    let errors = match form.clean() {
        Ok((username, password)) => match state.accounts.authenticate(username, password).await {
            Ok(user) => return start_session(&state, &user, next.unwrap_or("/")),
            Err(DomainError::Unauthorized) => FormErrors::single(NON_FIELD, BAD_CREDENTIALS),
            Err(e) => return Err(e.into()),
        },
        Err(errors) => errors,
    };

    Ok(html(render::accounts::login(&form.username, next, &errors)))
}

/// GET /auth/logout/
pub async fn logout() -> HttpResponse {
    let mut response = html(render::accounts::logged_out());
    if let Err(e) = response.add_cookie(&removal_cookie()) {
        tracing::warn!(error = %e, "Failed to clear session cookie");
    }
    response
}

/// GET /auth/password_change/
pub async fn password_change_form(identity: Identity) -> HttpResponse {
    html(render::accounts::password_change(
        &FormErrors::new(),
        Some(&identity),
    ))
}

/// POST /auth/password_change/
pub async fn password_change(
    identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<PasswordChangeForm>,
) -> AppResult<HttpResponse> {
    let errors = match form.clean() {
        Ok((old_password, new_password)) => match state
            .accounts
            .change_password(identity.user_id, old_password, new_password)
            .await
        {
            Ok(()) => return Ok(redirect("/auth/password_change/done/")),
            Err(DomainError::Validation { field, messages }) => FormErrors::field(field, messages),
            Err(e) => return Err(e.into()),
        },
        Err(errors) => errors,
    };

    Ok(html(render::accounts::password_change(
        &errors,
        Some(&identity),
    )))
}

/// GET /auth/password_change/done/
pub async fn password_change_done(identity: Identity) -> HttpResponse {
    html(render::accounts::password_change_done(Some(&identity)))
}
