//! Public profiles and editing one's own.

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;

use blog_core::domain::User;
use blog_core::input::UserInput;
use blog_shared::dto::{ProfileForm, ProfilePageResponse};

use super::views::{self, PageQuery, see_other};
use crate::middleware::auth::{OptionalIdentity, require_login, session_error};
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn profile_form(user: User) -> ProfileForm {
    ProfileForm {
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
    }
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let listing = state
        .blog
        .get_profile(&path, identity.viewer(), Utc::now(), query.request())
        .await?;

    Ok(HttpResponse::Ok().json(ProfilePageResponse {
        profile: views::user(listing.profile),
        posts: views::page(listing.page),
    }))
}

/// GET /profile/{username}/edit/
///
/// Always the signed-in user's own fields, whichever name is in the path.
pub async fn edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let identity = require_login(identity, &req)?;

    let user = state
        .blog
        .get_profile_form(identity.user_id)
        .await
        .map_err(session_error(&req))?;

    Ok(HttpResponse::Ok().json(profile_form(user)))
}

/// POST /profile/{username}/edit/
pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let identity = require_login(identity, &req)?;
    let form: ProfileForm = views::form(&body)?;
    let input = UserInput {
        username: form.username,
        first_name: form.first_name,
        last_name: form.last_name,
        email: form.email,
    };

    let redirect = state
        .blog
        .update_profile(identity.user_id, input)
        .await
        .map_err(session_error(&req))?;

    Ok(see_other(redirect))
}
