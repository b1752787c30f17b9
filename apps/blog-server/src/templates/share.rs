use maud::{Markup, html};

use blog_core::domain::Post;
use blog_shared::{EmailPostForm, FormErrors};

use super::layout::{input, page, textarea};
use crate::config::SiteConfig;

pub fn page_for(
    site: &SiteConfig,
    post: &Post,
    form: &EmailPostForm,
    errors: &FormErrors,
    sent: bool,
) -> Markup {
    let content = html! {
        @if sent {
            h1 { "E-mail successfully sent" }
            p {
                "\"" (post.title) "\" was successfully sent to " (form.to) "."
            }
        } @else {
            h1 { "Share \"" (post.title) "\" by e-mail" }
            form method="post" {
                (input("Name", "name", "text", &form.name, errors))
                (input("Email", "email", "email", &form.email, errors))
                (input("To", "to", "email", &form.to, errors))
                (textarea("Comments", "comments", &form.comments, errors))
                p { input type="submit" value="Send e-mail"; }
            }
        }
    };

    page(site, &format!("Share {}", post.title), content)
}
