//! Server-side HTML rendering with maud.

pub mod comment;
pub mod error;
pub mod layout;
pub mod markdown;
pub mod post;
pub mod search;
pub mod share;

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use maud::Markup;

/// Wrap rendered markup in a 200 HTML response.
pub fn html(markup: Markup) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(markup.into_string())
}
