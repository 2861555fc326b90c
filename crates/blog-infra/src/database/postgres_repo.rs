//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use blog_core::domain::{Category, CommentEntry, PostEntry, User};
use blog_core::error::RepoError;
use blog_core::listing::{PostQuery, PostScope};
use blog_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

const COMMENT_COUNT: &str =
    r#"(SELECT COUNT(*) FROM "comments" WHERE "comments"."post_id" = "posts"."id")"#;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {}

/// The visibility predicate from `blog_core::visibility` as a SQL condition,
/// restricted to the listing's scope. Needs `categories` joined.
fn listing_condition(query: &PostQuery) -> Condition {
    let public = Condition::all()
        .add(post::Column::IsPublished.eq(true))
        .add(post::Column::PubDate.lte(query.now))
        .add(
            Condition::any()
                .add(post::Column::CategoryId.is_null())
                .add(category::Column::IsPublished.eq(true)),
        );

    let visible = match query.viewer.id() {
        Some(viewer) => Condition::any()
            .add(post::Column::AuthorId.eq(viewer))
            .add(public),
        None => public,
    };

    match query.scope {
        PostScope::All => visible,
        PostScope::Category(id) => Condition::all()
            .add(post::Column::CategoryId.eq(id))
            .add(visible),
        PostScope::Author(id) => Condition::all()
            .add(post::Column::AuthorId.eq(id))
            .add(visible),
    }
}

/// Posts joined with author, category and location, with a live comment count.
fn entry_select() -> Select<PostEntity> {
    PostEntity::find()
        .select_only()
        .columns([
            post::Column::Id,
            post::Column::AuthorId,
            post::Column::Title,
            post::Column::Text,
            post::Column::PubDate,
            post::Column::IsPublished,
            post::Column::CategoryId,
            post::Column::LocationId,
            post::Column::CreatedAt,
        ])
        .column_as(user::Column::Username, "author_username")
        .column_as(category::Column::Title, "category_title")
        .column_as(category::Column::Slug, "category_slug")
        .column_as(category::Column::IsPublished, "category_is_published")
        .column_as(location::Column::Name, "location_name")
        .column_as(location::Column::IsPublished, "location_is_published")
        .column_as(Expr::cust(COMMENT_COUNT), "comment_count")
        .join(JoinType::InnerJoin, post::Relation::Author.def())
        .join(JoinType::LeftJoin, post::Relation::Category.def())
        .join(JoinType::LeftJoin, post::Relation::Location.def())
}

/// Rows a listing counts toward its page total.
pub(crate) fn count_select(query: &PostQuery) -> Select<PostEntity> {
    PostEntity::find()
        .join(JoinType::LeftJoin, post::Relation::Category.def())
        .filter(listing_condition(query))
}

/// One page of a listing in canonical order: newest `pub_date` first, ties
/// broken by `created_at` then `id`.
pub(crate) fn page_select(query: &PostQuery, offset: u64, limit: u64) -> Select<PostEntity> {
    entry_select()
        .filter(listing_condition(query))
        .order_by_desc(post::Column::PubDate)
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
        .offset(offset)
        .limit(limit)
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_entry(&self, id: Uuid) -> Result<Option<PostEntry>, RepoError> {
        let row = entry_select()
            .filter(post::Column::Id.eq(id))
            .into_model::<post::EntryRow>()
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(row.map(Into::into))
    }

    async fn count_visible(&self, query: &PostQuery) -> Result<u64, RepoError> {
        count_select(query).count(&self.db).await.map_err(repo_error)
    }

    async fn list_visible(
        &self,
        query: &PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostEntry>, RepoError> {
        let rows = page_select(query, offset, limit)
            .into_model::<post::EntryRow>()
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentEntry>, RepoError> {
        let rows = CommentEntity::find()
            .select_only()
            .columns([
                comment::Column::Id,
                comment::Column::PostId,
                comment::Column::AuthorId,
                comment::Column::Text,
                comment::Column::CreatedAt,
            ])
            .column_as(user::Column::Username, "author_username")
            .join(JoinType::InnerJoin, comment::Relation::Author.def())
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .into_model::<comment::EntryRow>()
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
