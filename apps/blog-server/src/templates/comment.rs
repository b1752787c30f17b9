use maud::{Markup, html};

use blog_core::domain::{Comment, Post};
use blog_shared::{CommentForm, FormErrors};

use super::layout::page;
use super::post::comment_form;
use crate::config::SiteConfig;

/// Result of a comment submission: confirmation, or the form with errors.
pub fn page_for(
    site: &SiteConfig,
    post: &Post,
    form: &CommentForm,
    errors: &FormErrors,
    comment: Option<&Comment>,
) -> Markup {
    let content = html! {
        @if comment.is_some() {
            h2 { "Your comment has been added." }
            p { a href=(post.absolute_url()) { "Back to the post" } }
        } @else {
            h2 { "Add a new comment" }
            (comment_form(post, form, errors))
        }
    };

    page(site, "Add a comment", content)
}
