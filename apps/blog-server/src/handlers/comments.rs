//! Comment lifecycle. Every outcome lands back on the post's detail page.

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use blog_core::input::CommentInput;
use blog_core::ownership::Authorization;
use blog_shared::dto::CommentForm;

use super::views::{self, see_other};
use crate::middleware::auth::{OptionalIdentity, require_login, session_error};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /posts/{id}/comment/
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let identity = require_login(identity, &req)?;
    let form: CommentForm = views::form(&body)?;

    let redirect = state
        .blog
        .create_comment(
            path.into_inner(),
            identity.user_id,
            CommentInput { text: form.text },
            Utc::now(),
        )
        .await
        .map_err(session_error(&req))?;

    Ok(see_other(redirect))
}

/// POST /comments/{id}/edit/
pub async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let identity = require_login(identity, &req)?;
    let id = path.into_inner();

    let ownership = state.blog.check_comment_author(id, identity.user_id).await?;
    if let Authorization::Deny(redirect) = ownership {
        return Ok(see_other(redirect));
    }
    let form: CommentForm = views::form(&body)?;

    let redirect = state
        .blog
        .update_comment(id, identity.user_id, CommentInput { text: form.text })
        .await
        .map_err(session_error(&req))?;

    Ok(see_other(redirect))
}

/// POST /comments/{id}/delete/
pub async fn delete(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let identity = require_login(identity, &req)?;

    let redirect = state
        .blog
        .delete_comment(path.into_inner(), identity.user_id)
        .await
        .map_err(session_error(&req))?;

    Ok(see_other(redirect))
}
