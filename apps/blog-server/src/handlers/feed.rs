//! RSS feed of the latest posts.

use actix_web::{HttpRequest, HttpResponse, web};
use rss::{ChannelBuilder, GuidBuilder, Item, ItemBuilder};

use super::absolute_uri;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::templates::markdown::summary;

const FEED_ITEMS: u64 = 5;
const FEED_SUMMARY_WORDS: usize = 30;

/// GET /feed/
pub async fn latest_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_published(None, 0, FEED_ITEMS).await?;

    let items: Vec<Item> = posts
        .iter()
        .map(|post| {
            let link = absolute_uri(&req, &post.absolute_url());
            ItemBuilder::default()
                .title(Some(post.title.clone()))
                .link(Some(link.clone()))
                .guid(Some(GuidBuilder::default().value(link).permalink(true).build()))
                .pub_date(Some(post.publish.to_rfc2822()))
                .description(Some(summary(&post.body, FEED_SUMMARY_WORDS)))
                .build()
        })
        .collect();

    let channel = ChannelBuilder::default()
        .title(state.site.title.clone())
        .link(absolute_uri(&req, "/"))
        .description(state.site.description.clone())
        .items(items)
        .build();

    Ok(HttpResponse::Ok()
        .content_type("application/rss+xml; charset=utf-8")
        .body(channel.to_string()))
}
