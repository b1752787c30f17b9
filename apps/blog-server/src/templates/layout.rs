//! Page shell and components shared by every blog page.

use maud::{DOCTYPE, Markup, html};

use blog_core::domain::{Page, Post};
use blog_shared::FormErrors;

use crate::config::SiteConfig;

/// Inline CSS for all blog pages.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:Georgia,"Times New Roman",serif;line-height:1.6;color:#222;background:#fff;display:flex;justify-content:center;padding:2rem 1rem}
.wrapper{display:flex;gap:3rem;max-width:960px;width:100%}
#content{flex:1;min-width:0}
#sidebar{width:240px;flex-shrink:0;font-size:.95rem;color:#555}
#sidebar h2{font-size:1.2rem;margin-bottom:.5rem;color:#222}
#sidebar p{margin-bottom:.75rem}
h1{font-size:2rem;margin-bottom:1rem}
h1 a{color:#222;text-decoration:none}
h2{font-size:1.3rem;margin:1rem 0 .5rem}
a{color:#00abff;text-decoration:none}
a:hover{text-decoration:underline}
.date,.tags{color:#888;font-size:.9rem;margin-bottom:.5rem}
.body p{margin:.75rem 0}
.body pre{background:#f6f6f6;padding:.75rem;overflow-x:auto}
.pagination{margin:1.5rem 0;color:#555}
.comment{border-top:1px solid #eee;padding:.75rem 0}
.comment .info{color:#888;font-size:.9rem}
form p{margin:.5rem 0}
form label{display:block;font-weight:bold}
form input[type=text],form input[type=email],form textarea{width:100%;max-width:480px;padding:.4rem;border:1px solid #ccc;font:inherit}
form textarea{min-height:120px}
.errorlist{color:#c00;list-style:none;font-size:.9rem}
input[type=submit]{margin-top:.75rem;padding:.4rem 1rem;background:#00abff;color:#fff;border:0;cursor:pointer}
"#;

/// Render the full HTML page shell with header, content and sidebar.
pub fn page(site: &SiteConfig, title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                meta name="description" content=(site.description);
                link rel="alternate" type="application/rss+xml" title=(site.title) href="/feed/";
                style { (maud::PreEscaped(PAGE_CSS)) }
            }
            body {
                div class="wrapper" {
                    div id="content" { (content) }
                    div id="sidebar" {
                        h2 { a href="/" { (site.title) } }
                        p { (site.description) }
                        p { a href="/feed/" { "Subscribe to my RSS feed" } }
                        p { a href="/search/" { "Search posts" } }
                    }
                }
            }
        }
    }
}

/// Previous/next navigation for a page of posts.
pub fn pagination(page: &Page<Post>) -> Markup {
    html! {
        div class="pagination" {
            span class="step-links" {
                @if let Some(previous) = page.previous_page_number() {
                    a href={ "?page=" (previous) } { "Previous" }
                    " "
                }
                span class="current" {
                    "Page " (page.number) " of " (page.num_pages) "."
                }
                @if let Some(next) = page.next_page_number() {
                    " "
                    a href={ "?page=" (next) } { "Next" }
                }
            }
        }
    }
}

/// "Tags: a, b" line linking each tag to its listing.
pub fn tag_links(post: &Post) -> Markup {
    html! {
        @if !post.tags.is_empty() {
            p class="tags" {
                "Tags: "
                @for (i, tag) in post.tags.iter().enumerate() {
                    @if i > 0 { ", " }
                    a href=(tag.url()) { (tag.name) }
                }
            }
        }
    }
}

/// Published date and author byline.
pub fn byline(post: &Post) -> Markup {
    html! {
        p class="date" {
            "Published " (post.publish.format("%b %-d, %Y")) " by " (post.author)
        }
    }
}

fn field_errors(errors: &FormErrors, name: &str) -> Markup {
    html! {
        @let messages = errors.field(name);
        @if !messages.is_empty() {
            ul class="errorlist" {
                @for message in messages {
                    li { (message) }
                }
            }
        }
    }
}

/// Labelled `<input>` with its validation messages.
pub fn input(
    label: &str,
    name: &str,
    kind: &str,
    value: &str,
    errors: &FormErrors,
) -> Markup {
    html! {
        p {
            label for={ "id_" (name) } { (label) ":" }
            (field_errors(errors, name))
            input type=(kind) name=(name) id={ "id_" (name) } value=(value);
        }
    }
}

/// Labelled `<textarea>` with its validation messages.
pub fn textarea(label: &str, name: &str, value: &str, errors: &FormErrors) -> Markup {
    html! {
        p {
            label for={ "id_" (name) } { (label) ":" }
            (field_errors(errors, name))
            textarea name=(name) id={ "id_" (name) } { (value) }
        }
    }
}
