//! Feed, post detail, post create/edit and comment handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use yatube_core::error::DomainError;
use yatube_shared::{CommentForm, FormErrors, PostForm};

use super::{html, parse_post_id, redirect};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::page_cache::PageCache;
use crate::render;
use crate::state::AppState;

/// `?page=` query parameter, kept raw so malformed values fall back to page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let viewer = viewer.0;
    let window = state.feed.index_window(query.page.as_deref()).await?;
    let key = PageCache::index_key(window.number, viewer.as_ref().map(|v| v.user_id));

    if let Some(cached) = state.index_cache.get(&key).await {
        tracing::debug!(key = %key, "Serving index from cache");
        return Ok(html(cached));
    }

    let feed = state.feed.index_at(window).await?;
    let body = render::posts::index(&feed, viewer.as_ref());
    state.index_cache.put(&key, &body).await;

    Ok(html(body))
}

/// GET /group/{slug}/
pub async fn group_list(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state.feed.group_posts(&slug, query.page.as_deref()).await?;
    Ok(html(render::posts::group(&feed, viewer.0.as_ref())))
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let viewer = viewer.0;
    let feed = state
        .feed
        .profile(
            &username,
            viewer.as_ref().map(|v| v.user_id),
            query.page.as_deref(),
        )
        .await?;
    Ok(html(render::posts::profile(&feed, viewer.as_ref())))
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    post_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&post_id)?;
    let detail = state.posts.detail(post_id).await?;
    Ok(html(render::posts::detail(&detail, viewer.0.as_ref())))
}

/// GET /create/
pub async fn post_create_form(
    identity: Identity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let groups = state.posts.groups().await?;
    Ok(html(render::posts::post_form(
        &PostForm::default(),
        &FormErrors::new(),
        &groups,
        None,
        Some(&identity),
    )))
}

/// POST /create/
pub async fn post_create(
    identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let errors = match form.clean() {
        Ok(draft) => match state.posts.create(identity.user_id, draft).await {
            Ok(_) => return Ok(redirect(&format!("/profile/{}/", identity.username))),
            Err(DomainError::Validation { field, messages }) => FormErrors::field(field, messages),
            Err(e) => return Err(e.into()),
        },
        Err(errors) => errors,
    };

    let groups = state.posts.groups().await?;
    Ok(html(render::posts::post_form(
        &form,
        &errors,
        &groups,
        None,
        Some(&identity),
    )))
}

/// GET /posts/{post_id}/edit/
pub async fn post_edit_form(
    identity: Identity,
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&post_id)?;

    let post = match state.posts.editable(post_id, identity.user_id).await {
        Ok(post) => post,
        Err(DomainError::Forbidden(_)) => return Ok(redirect(&format!("/posts/{post_id}/"))),
        Err(e) => return Err(e.into()),
    };

    let form = PostForm::from_post(&post.text, post.group_id, post.image.as_deref());
    let groups = state.posts.groups().await?;
    Ok(html(render::posts::post_form(
        &form,
        &FormErrors::new(),
        &groups,
        Some(post.id),
        Some(&identity),
    )))
}

/// POST /posts/{post_id}/edit/
pub async fn post_edit(
    identity: Identity,
    state: web::Data<AppState>,
    post_id: web::Path<String>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&post_id)?;
    let detail_url = format!("/posts/{post_id}/");

    let current = match state.posts.editable(post_id, identity.user_id).await {
        Ok(post) => post,
        Err(DomainError::Forbidden(_)) => {
            tracing::debug!(post_id = %post_id, user_id = %identity.user_id, "Edit by non-author refused");
            return Ok(redirect(&detail_url));
        }
        Err(e) => return Err(e.into()),
    };

    let mut form = form.into_inner();
    let errors = match form.clean() {
        Ok(draft) => match state.posts.edit(post_id, identity.user_id, draft).await {
            Ok(_) => return Ok(redirect(&detail_url)),
            Err(DomainError::Validation { field, messages }) => FormErrors::field(field, messages),
            Err(e) => return Err(e.into()),
        },
        Err(errors) => errors,
    };

    // the re-rendered form still shows the stored image
    form.image = current.image.unwrap_or_default();
    let groups = state.posts.groups().await?;
    Ok(html(render::posts::post_form(
        &form,
        &errors,
        &groups,
        Some(post_id),
        Some(&identity),
    )))
}

/// POST /posts/{post_id}/comment/
pub async fn add_comment(
    identity: Identity,
    state: web::Data<AppState>,
    post_id: web::Path<String>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&post_id)?;

    state
        .posts
        .add_comment(post_id, identity.user_id, form.clean().unwrap_or_default())
        .await?;

    Ok(redirect(&format!("/posts/{post_id}/")))
}
