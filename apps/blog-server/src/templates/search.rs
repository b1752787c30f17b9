use maud::{Markup, html};

use blog_core::domain::SearchHit;
use blog_shared::{FormErrors, SearchForm};

use super::layout::{input, page};
use super::markdown::summary;
use crate::config::SiteConfig;

const RESULT_SUMMARY_WORDS: usize = 12;

/// Search page. `query` is set only once a valid query has run.
pub fn page_for(
    site: &SiteConfig,
    form: &SearchForm,
    errors: &FormErrors,
    query: Option<&str>,
    results: &[SearchHit],
) -> Markup {
    let value = form.query.as_deref().unwrap_or_default();
    let content = html! {
        @if let Some(query) = query {
            h1 { "Posts containing \"" (query) "\"" }
            h3 {
                "Found " (results.len()) " result" @if results.len() != 1 { "s" }
            }
            @for hit in results {
                h4 { a href=(hit.post.absolute_url()) { (hit.post.title) } }
                p { (summary(&hit.post.body, RESULT_SUMMARY_WORDS)) }
            }
            @if results.is_empty() {
                p { "There are no results for your query." }
            }
            p { a href="/search/" { "Search again" } }
        } @else {
            h1 { "Search for posts" }
            form method="get" {
                (input("Query", "query", "text", value, errors))
                input type="submit" value="Search";
            }
        }
    };

    page(site, "Search", content)
}
