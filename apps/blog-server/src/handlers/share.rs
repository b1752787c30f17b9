//! Recommend-a-post-by-email form.

use actix_web::{HttpRequest, HttpResponse, web};

use blog_core::domain::EmailMessage;
use blog_shared::{EmailPostForm, FormErrors};

use super::{absolute_uri, published_post};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::templates;

/// GET /{post_id}/share/
pub async fn share_form(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = published_post(&state, path.into_inner()).await?;

    Ok(templates::html(templates::share::page_for(
        &state.site,
        &post,
        &EmailPostForm::default(),
        &FormErrors::default(),
        false,
    )))
}

/// POST /{post_id}/share/
pub async fn share_submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    form: web::Form<EmailPostForm>,
) -> AppResult<HttpResponse> {
    let post = published_post(&state, path.into_inner()).await?;
    let mut form = form.into_inner();

    let (errors, sent) = match form.clean() {
        Ok(()) => {
            let post_url = absolute_uri(&req, &post.absolute_url());
            let message = EmailMessage::recommendation(
                &post.title,
                &post_url,
                &form.name,
                &form.comments,
                state.site.from_email.clone(),
                form.to.clone(),
            );
            state.mailer.send(&message).await?;

            tracing::info!(post_id = post.id, "Post recommended by email");
            (FormErrors::default(), true)
        }
        Err(errors) => (errors, false),
    };

    Ok(templates::html(templates::share::page_for(
        &state.site,
        &post,
        &form,
        &errors,
        sent,
    )))
}
