//! HTTP handlers and route configuration.

mod comments;
mod feed;
mod health;
mod posts;
mod search;
mod share;


use actix_web::{HttpRequest, web};

use blog_core::domain::Post;
use blog_core::error::DomainError;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/", web::get().to(posts::post_list))
        .route("/feed/", web::get().to(feed::latest_posts))
        .route("/search/", web::get().to(search::post_search))
        .route("/tag/{tag_slug}/", web::get().to(posts::post_list_by_tag))
        .route(
            r"/{year:\d+}/{month:\d+}/{day:\d+}/{slug}/",
            web::get().to(posts::post_detail),
        )
        .service(
            web::resource(r"/{post_id:\d+}/share/")
                .route(web::get().to(share::share_form))
                .route(web::post().to(share::share_submit)),
        )
        // POST only; other methods get 405 from the resource.
        .service(
            web::resource(r"/{post_id:\d+}").route(web::post().to(comments::post_comment)),
        );
}

/// Load a post that is visible to the public, or 404.
async fn published_post(state: &AppState, post_id: i64) -> AppResult<Post> {
    let post = state
        .posts
        .find_published(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id))?;
    Ok(post)
}

/// Absolute URL for `path` on the host the request came in on.
fn absolute_uri(req: &HttpRequest, path: &str) -> String {
    let info = req.connection_info();
    format!("{}://{}{}", info.scheme(), info.host(), path)
}
