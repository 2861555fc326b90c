//! Listing assembly: which posts a listing covers, in what order, and how a
//! page of them is fetched.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, PostEntry, Viewer};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest, Paginator};
use crate::ports::PostRepository;

/// The set of posts a listing draws from, before visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    All,
    Category(Uuid),
    Author(Uuid),
}

impl PostScope {
    pub fn contains(&self, post: &Post) -> bool {
        match self {
            PostScope::All => true,
            PostScope::Category(id) => post.category_id == Some(*id),
            PostScope::Author(id) => post.author_id == *id,
        }
    }
}

/// A listing request: scope plus the viewer and instant visibility is judged at.
#[derive(Debug, Clone, Copy)]
pub struct PostQuery {
    pub scope: PostScope,
    pub viewer: Viewer,
    pub now: DateTime<Utc>,
}

impl PostQuery {
    pub fn new(scope: PostScope, viewer: Viewer, now: DateTime<Utc>) -> Self {
        Self { scope, viewer, now }
    }

    /// Whether `entry` belongs in this listing.
    pub fn matches(&self, entry: &PostEntry) -> bool {
        self.scope.contains(&entry.post) && entry.is_visible_to(&self.viewer, self.now)
    }
}

/// Listing order: newest `pub_date` first, then newest `created_at`, then id.
/// Total, so equal publication dates never swap places between requests.
pub fn listing_order(a: &Post, b: &Post) -> Ordering {
    b.pub_date
        .cmp(&a.pub_date)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Count, clamp, then fetch one page of the listing.
pub async fn assemble(
    posts: &dyn PostRepository,
    query: &PostQuery,
    paginator: Paginator,
    request: PageRequest,
) -> Result<Page<PostEntry>, RepoError> {
    let total = posts.count_visible(query).await?;
    let window = paginator.window(total, request);
    let items = posts
        .list_visible(query, window.offset, window.limit)
        .await?;

    tracing::debug!(
        scope = ?query.scope,
        total,
        page = window.number,
        returned = items.len(),
        "Assembled post listing"
    );

    Ok(window.into_page(items))
}
