//! Post pages: the index, a post's detail and the post lifecycle.

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use blog_core::input::PostInput;
use blog_core::ownership::Authorization;
use blog_shared::dto::PostForm;

use super::views::{self, PageQuery, see_other};
use crate::middleware::auth::{OptionalIdentity, require_login, session_error};
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn post_input(form: PostForm) -> PostInput {
    PostInput {
        title: form.title,
        text: form.text,
        pub_date: form.pub_date,
        is_published: form.is_published,
        category_id: form.category_id,
        location_id: form.location_id,
    }
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .blog
        .list_index(identity.viewer(), Utc::now(), query.request())
        .await?;

    Ok(HttpResponse::Ok().json(views::page(page)))
}

/// GET /posts/{id}/
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = state
        .blog
        .get_post_detail(path.into_inner(), identity.viewer(), Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(views::post_detail(detail)))
}

/// POST /posts/new/
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let identity = require_login(identity, &req)?;
    let form: PostForm = views::form(&body)?;

    let redirect = state
        .blog
        .create_post(identity.user_id, post_input(form))
        .await
        .map_err(session_error(&req))?;

    Ok(see_other(redirect))
}

/// POST /posts/{id}/edit/
///
/// A non-author is sent back to the post whatever the body holds.
pub async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let identity = require_login(identity, &req)?;
    let id = path.into_inner();

    let ownership = state.blog.check_post_author(id, identity.user_id).await?;
    if let Authorization::Deny(redirect) = ownership {
        return Ok(see_other(redirect));
    }
    let form: PostForm = views::form(&body)?;

    let redirect = state
        .blog
        .update_post(id, identity.user_id, post_input(form))
        .await
        .map_err(session_error(&req))?;

    Ok(see_other(redirect))
}

/// POST /posts/{id}/delete/
pub async fn delete(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let identity = require_login(identity, &req)?;

    let redirect = state
        .blog
        .delete_post(path.into_inner(), identity.user_id)
        .await
        .map_err(session_error(&req))?;

    Ok(see_other(redirect))
}
