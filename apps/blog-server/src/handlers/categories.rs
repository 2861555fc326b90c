use actix_web::{HttpResponse, web};
use chrono::Utc;

use blog_shared::dto::CategoryPageResponse;

use super::views::{self, PageQuery};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /category/{slug}/
pub async fn category_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let listing = state
        .blog
        .list_category(&path, identity.viewer(), Utc::now(), query.request())
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPageResponse {
        category: views::category(listing.category),
        posts: views::page(listing.page),
    }))
}
