//! Standalone error page. Needs no application state.

use actix_web::http::StatusCode;
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Inline CSS for error pages.
pub const ERROR_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:Georgia,"Times New Roman",serif;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#fff;color:#222;padding:1rem}
.error-page{text-align:center;max-width:420px}
.error-page h1{font-size:1.5rem;margin-bottom:.75rem}
.error-page p{color:#666;margin-bottom:1rem;line-height:1.5}
.error-page a{color:#00abff}
"#;

pub fn page(status: StatusCode, detail: &str) -> Markup {
    let heading = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (heading) }
                style { (PreEscaped(ERROR_CSS)) }
            }
            body {
                div class="error-page" {
                    h1 { (heading) }
                    p { (detail) }
                    a href="/" { "Back to the blog" }
                }
            }
        }
    }
}
