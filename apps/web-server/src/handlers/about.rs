//! Static "about" pages.

use actix_web::HttpResponse;

use yatube_shared::dto::StaticPage;

/// GET /about/author/
pub async fn author() -> HttpResponse {
    HttpResponse::Ok().json(StaticPage {
        title: "About the author".to_string(),
        body: "Yatube is a small blog where people share short posts and group them by topic."
            .to_string(),
    })
}

/// GET /about/tech/
pub async fn tech() -> HttpResponse {
    HttpResponse::Ok().json(StaticPage {
        title: "Technologies".to_string(),
        body: "Rust, actix-web, SeaORM on PostgreSQL, JWT sessions and Argon2 password hashes."
            .to_string(),
    })
}
