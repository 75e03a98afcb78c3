//! Static pages.

use actix_web::HttpResponse;

use super::html;
use crate::middleware::auth::OptionalIdentity;
use crate::render;

/// GET /about/author/
pub async fn author(viewer: OptionalIdentity) -> HttpResponse {
    html(render::about::author(viewer.0.as_ref()))
}

/// GET /about/tech/
pub async fn tech(viewer: OptionalIdentity) -> HttpResponse {
    html(render::about::tech(viewer.0.as_ref()))
}
