//! HTTP handlers and route configuration.

mod about;
mod auth;
mod context;
mod health;
mod posts;


use actix_web::{HttpRequest, HttpResponse, web};
use yatube_shared::ErrorResponse;

use crate::middleware::error::AppError;

/// Configure all application routes.
///
/// Paths end in `/`; wrap the app in `NormalizePath` so requests without the
/// trailing slash still match.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, req| {
        tracing::debug!(path = %req.path(), error = %err, "Unmatched path parameter");
        AppError::NotFound(format!("No page at {}", req.path())).into()
    }))
    .route("/", web::get().to(posts::index))
    .route("/group/{slug}/", web::get().to(posts::group_posts))
    .route("/profile/{username}/", web::get().to(posts::profile))
    .route("/posts/{post_id}/", web::get().to(posts::post_detail))
    .service(
        web::resource("/create/")
            .route(web::get().to(posts::create_form))
            .route(web::post().to(posts::create_submit)),
    )
    .service(
        web::resource("/posts/{post_id}/edit/")
            .route(web::get().to(posts::edit_form))
            .route(web::post().to(posts::edit_submit)),
    )
    .service(
        web::scope("/auth")
            .route("/signup/", web::post().to(auth::signup))
            .service(
                web::resource("/login/")
                    .route(web::get().to(auth::login_page))
                    .route(web::post().to(auth::login)),
            )
            .route("/me/", web::get().to(auth::me)),
    )
    .service(
        web::scope("/about")
            .route("/author/", web::get().to(about::author))
            .route("/tech/", web::get().to(about::tech)),
    )
    .route("/health/", web::get().to(health::health_check));
}

/// Fallback for every unmatched route.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(
        ErrorResponse::not_found(format!("No page at {}", req.path())).with_instance(req.path()),
    )
}
