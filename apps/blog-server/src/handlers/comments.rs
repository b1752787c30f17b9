//! Comment submission.

use actix_web::{HttpResponse, web};

use blog_core::domain::NewComment;
use blog_shared::{CommentForm, FormErrors};

use super::published_post;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::templates;

/// POST /{post_id}
pub async fn post_comment(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let post = published_post(&state, path.into_inner()).await?;
    let mut form = form.into_inner();

    let (errors, comment) = match form.clean() {
        Ok(()) => {
            let comment = state
                .comments
                .create(NewComment {
                    post_id: post.id,
                    name: form.name.clone(),
                    email: form.email.clone(),
                    body: form.body.clone(),
                })
                .await?;

            tracing::info!(post_id = post.id, comment_id = comment.id, "Comment added");
            (FormErrors::default(), Some(comment))
        }
        Err(errors) => (errors, None),
    };

    Ok(templates::html(templates::comment::page_for(
        &state.site,
        &post,
        &form,
        &errors,
        comment.as_ref(),
    )))
}
