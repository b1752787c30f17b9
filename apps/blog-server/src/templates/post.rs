//! Post list and post detail pages.

use maud::{Markup, PreEscaped, html};

use blog_core::domain::{Comment, Page, Post, Tag};
use blog_shared::{CommentForm, FormErrors};

use super::layout::{byline, input, page, pagination, tag_links, textarea};
use super::markdown::{render_markdown, summary};
use crate::config::SiteConfig;

/// Words of body text shown per post on list pages.
const LIST_SUMMARY_WORDS: usize = 30;

pub fn list(site: &SiteConfig, posts: &Page<Post>, tag: Option<&Tag>) -> Markup {
    let content = html! {
        h1 { (site.title) }
        @if let Some(tag) = tag {
            h2 { "Posts tagged with \"" (tag.name) "\"" }
        }
        @for post in &posts.items {
            h2 {
                a href=(post.absolute_url()) { (post.title) }
            }
            (tag_links(post))
            (byline(post))
            p { (summary(&post.body, LIST_SUMMARY_WORDS)) }
        }
        @if posts.is_empty() {
            p { "There are no posts yet." }
        }
        (pagination(posts))
    };

    page(site, &site.title, content)
}

/// Comment form posting to the post's comment endpoint.
pub fn comment_form(post: &Post, form: &CommentForm, errors: &FormErrors) -> Markup {
    html! {
        form action=(post.comment_url()) method="post" {
            (input("Name", "name", "text", &form.name, errors))
            (input("Email", "email", "email", &form.email, errors))
            (textarea("Body", "body", &form.body, errors))
            p { input type="submit" value="Add comment"; }
        }
    }
}

pub struct DetailContext<'a> {
    pub post: &'a Post,
    pub comments: &'a [Comment],
    pub similar_posts: &'a [Post],
    pub form: &'a CommentForm,
}

pub fn detail(site: &SiteConfig, ctx: DetailContext<'_>) -> Markup {
    let post = ctx.post;
    let content = html! {
        h1 { (post.title) }
        (byline(post))
        div class="body" { (PreEscaped(render_markdown(&post.body))) }
        p {
            a href=(post.share_url()) { "Share this post" }
        }

        h2 { "Similar posts" }
        @for similar in ctx.similar_posts {
            p {
                a href=(similar.absolute_url()) { (similar.title) }
            }
        }
        @if ctx.similar_posts.is_empty() {
            p { "There are no similar posts yet." }
        }

        @let total = ctx.comments.len();
        h2 { (total) " comment" @if total != 1 { "s" } }
        @for (i, comment) in ctx.comments.iter().enumerate() {
            div class="comment" {
                p class="info" {
                    "Comment " (i + 1) " by " (comment.name) " "
                    (comment.created.format("%b %-d, %Y, %H:%M"))
                }
                p { (comment.body) }
            }
        }
        @if ctx.comments.is_empty() {
            p { "There are no comments." }
        }

        h2 { "Add a new comment" }
        (comment_form(post, ctx.form, &FormErrors::default()))
    };

    page(site, &post.title, content)
}
