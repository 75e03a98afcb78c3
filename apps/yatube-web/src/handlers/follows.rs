//! Follow feed and subscription handlers.

use actix_web::{HttpResponse, web};

use super::posts::PageQuery;
use super::{html, redirect};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::render;
use crate::state::AppState;

/// GET /follow/
pub async fn follow_index(
    identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .feed
        .follow_index(identity.user_id, query.page.as_deref())
        .await?;
    Ok(html(render::posts::follow_index(&page, Some(&identity))))
}

/// GET /profile/{username}/follow/
pub async fn profile_follow(
    identity: Identity,
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let outcome = state.follows.follow(identity.user_id, &username).await?;
    tracing::debug!(?outcome, author = %username, "Follow request handled");
    Ok(redirect(&format!("/profile/{}/", username)))
}

/// GET /profile/{username}/unfollow/
pub async fn profile_unfollow(
    identity: Identity,
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.follows.unfollow(identity.user_id, &username).await?;
    Ok(redirect(&format!("/profile/{}/", username)))
}
