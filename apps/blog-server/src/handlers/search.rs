//! Post search.

use actix_web::{HttpResponse, web};

use blog_shared::{FormErrors, SearchForm};

use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::templates;

/// GET /search/
pub async fn post_search(
    state: web::Data<AppState>,
    query: web::Query<SearchForm>,
) -> AppResult<HttpResponse> {
    let mut form = query.into_inner();
    let mut errors = FormErrors::default();
    let mut query = None;
    let mut results = Vec::new();

    if form.is_submitted() {
        match form.clean() {
            Ok(cleaned) => {
                results = state.posts.search(&cleaned, state.site.search_mode).await?;
                tracing::debug!(query = %cleaned, hits = results.len(), "Search");
                query = Some(cleaned);
            }
            Err(e) => errors = e,
        }
    }

    Ok(templates::html(templates::search::page_for(
        &state.site,
        &form,
        &errors,
        query.as_deref(),
        &results,
    )))
}
