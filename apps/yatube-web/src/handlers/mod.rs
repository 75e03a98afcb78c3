//! HTTP handlers and route configuration.

mod about;
mod accounts;
mod follows;
mod health;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use uuid::Uuid;

use crate::middleware::error::{AppError, AppResult, HTML};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_list))
        .route("/profile/{username}/", web::get().to(posts::profile))
        .route(
            "/profile/{username}/follow/",
            web::get().to(follows::profile_follow),
        )
        .route(
            "/profile/{username}/unfollow/",
            web::get().to(follows::profile_unfollow),
        )
        .route("/posts/{post_id}/", web::get().to(posts::post_detail))
        .service(
            web::resource("/create/")
                .route(web::get().to(posts::post_create_form))
                .route(web::post().to(posts::post_create)),
        )
        .service(
            web::resource("/posts/{post_id}/edit/")
                .route(web::get().to(posts::post_edit_form))
                .route(web::post().to(posts::post_edit)),
        )
        .route(
            "/posts/{post_id}/comment/",
            web::post().to(posts::add_comment),
        )
        .route("/follow/", web::get().to(follows::follow_index))
        .service(
            web::scope("/about")
                .route("/author/", web::get().to(about::author))
                .route("/tech/", web::get().to(about::tech)),
        )
        .service(
            web::scope("/auth")
                .service(
                    web::resource("/signup/")
                        .route(web::get().to(accounts::signup_form))
                        .route(web::post().to(accounts::signup)),
                )
                .service(
                    web::resource("/login/")
                        .route(web::get().to(accounts::login_form))
                        .route(web::post().to(accounts::login)),
                )
                .route("/logout/", web::get().to(accounts::logout))
                .service(
                    web::resource("/password_change/")
                        .route(web::get().to(accounts::password_change_form))
                        .route(web::post().to(accounts::password_change)),
                )
                .route(
                    "/password_change/done/",
                    web::get().to(accounts::password_change_done),
                ),
        )
        .route("/health", web::get().to(health::health_check))
        .default_service(web::to(not_found));
}

/// Fallback for every unmatched URL.
async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::NotFound(req.path().to_string()))
}

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(HTML).body(body)
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Post ids in URLs that are not UUIDs name no post.
pub(crate) fn parse_post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("post {raw}")))
}
