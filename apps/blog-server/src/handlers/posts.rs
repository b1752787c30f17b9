//! Post list and detail pages.

use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;

use blog_core::domain::{Paginator, SIMILAR_POSTS_LIMIT, Tag};
use blog_core::error::DomainError;
use blog_shared::CommentForm;

use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::templates;
use crate::templates::post::DetailContext;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Kept raw: bad values are normalised by the paginator, not rejected.
    pub page: Option<String>,
}

/// GET /
pub async fn post_list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    render_list(&state, None, query.page.as_deref()).await
}

/// GET /tag/{tag_slug}/
pub async fn post_list_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let tag = state
        .tags
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| DomainError::not_found("Tag", &slug))?;

    render_list(&state, Some(tag), query.page.as_deref()).await
}

async fn render_list(
    state: &AppState,
    tag: Option<Tag>,
    raw_page: Option<&str>,
) -> AppResult<HttpResponse> {
    let tag_id = tag.as_ref().map(|t| t.id);

    let count = state.posts.count_published(tag_id).await?;
    let paginator = Paginator::new(count, state.site.posts_per_page);
    let number = paginator.resolve(raw_page);

    let items = state
        .posts
        .list_published(tag_id, paginator.offset(number), paginator.per_page())
        .await?;
    let page = paginator.page(number, items);

    Ok(templates::html(templates::post::list(
        &state.site,
        &page,
        tag.as_ref(),
    )))
}

/// GET /{year}/{month}/{day}/{slug}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let not_found = || DomainError::not_found("Post", &slug);

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(not_found)?;
    let post = state
        .posts
        .find_published_by_date(date, &slug)
        .await?
        .ok_or_else(not_found)?;

    let comments = state.comments.active_for_post(post.id).await?;
    let similar_posts = state.posts.similar_to(&post, SIMILAR_POSTS_LIMIT).await?;
    let form = CommentForm::default();

    Ok(templates::html(templates::post::detail(
        &state.site,
        DetailContext {
            post: &post,
            comments: &comments,
            similar_posts: &similar_posts,
            form: &form,
        },
    )))
}
