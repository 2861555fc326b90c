//! Back-office endpoints. Admin role only.

use actix_web::{HttpResponse, web};

use blog_core::error::DomainError;
use blog_core::input::{CategoryInput, LocationInput};
use blog_shared::ApiResponse;
use blog_shared::dto::{CategoryForm, LocationForm, LocationResponse};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn require_admin(identity: &Identity) -> AppResult<()> {
    if identity.has_role("admin") {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %identity.user_id,
            username = %identity.username,
            "Admin access refused"
        );
        Err(DomainError::Unauthorized.into())
    }
}

/// GET /admin/
pub async fn site(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    require_admin(&identity)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(state.admin.as_ref())))
}

/// POST /admin/categories/
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryForm>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let form = body.into_inner();
    let input = CategoryInput {
        title: form.title,
        description: form.description,
        slug: form.slug,
        is_published: form.is_published,
    };

    let category = state.blog.create_category(input).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        views::category(category),
        "Category created",
    )))
}

/// POST /admin/locations/
pub async fn create_location(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<LocationForm>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;
    let form = body.into_inner();
    let input = LocationInput {
        name: form.name,
        is_published: form.is_published,
    };

    let location = state.blog.create_location(input).await?;
    tracing::info!(location_id = %location.id, "Location created");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        LocationResponse {
            id: location.id,
            name: location.name,
            is_published: location.is_published,
        },
        "Location created",
    )))
}
