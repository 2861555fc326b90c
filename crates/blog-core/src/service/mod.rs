//! Blog operations: listings, post and comment lifecycle, profiles.
//!
//! Every operation calls the visibility filter or the ownership guard
//! explicitly. Refused mutations come back as `Ok(Redirect)` pointing at the
//! public view; they never touch the store.

mod accounts;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Category, Comment, CommentEntry, Location, Post, PostEntry, User, Viewer};
use crate::error::{DomainError, RepoError};
use crate::input::{CategoryInput, CommentInput, LocationInput, PostInput, UserInput};
use crate::listing::{self, PostQuery, PostScope};
use crate::ownership::{Authorization, authorize_mutation};
use crate::pagination::{Page, PageRequest, Paginator};
use crate::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use crate::redirect::{Redirect, comment_form_path};
use crate::visibility;

pub use accounts::AccountService;

/// The store, one port per entity.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

/// A visible post with all of its comments.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: PostEntry,
    pub comments: Vec<CommentEntry>,
    /// Where a new comment is submitted.
    pub comment_form_action: String,
}

#[derive(Debug, Clone)]
pub struct CategoryPage {
    pub category: Category,
    pub page: Page<PostEntry>,
}

#[derive(Debug, Clone)]
pub struct ProfilePage {
    pub profile: User,
    pub page: Page<PostEntry>,
}

#[derive(Clone)]
pub struct BlogService {
    repos: Repositories,
    paginator: Paginator,
}

impl BlogService {
    pub fn new(repos: Repositories, paginator: Paginator) -> Self {
        Self { repos, paginator }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    /// Posts visible to `viewer`, newest first.
    pub async fn list_index(
        &self,
        viewer: Viewer,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, DomainError> {
        let query = PostQuery::new(PostScope::All, viewer, now);
        Ok(listing::assemble(self.repos.posts.as_ref(), &query, self.paginator, page).await?)
    }

    pub async fn get_post_detail(
        &self,
        id: Uuid,
        viewer: Viewer,
        now: DateTime<Utc>,
    ) -> Result<PostDetail, DomainError> {
        let post = self.visible_post(id, &viewer, now).await?;
        let comments = self.repos.comments.list_for_post(id).await?;

        Ok(PostDetail {
            post,
            comments,
            comment_form_action: comment_form_path(id),
        })
    }

    /// Posts of one published category. Unpublished categories do not exist
    /// as far as readers are concerned, authors included.
    pub async fn list_category(
        &self,
        slug: &str,
        viewer: Viewer,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<CategoryPage, DomainError> {
        let category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .filter(visibility::is_category_visible)
            .ok_or_else(|| DomainError::not_found("Category", slug))?;

        let query = PostQuery::new(PostScope::Category(category.id), viewer, now);
        let page =
            listing::assemble(self.repos.posts.as_ref(), &query, self.paginator, page).await?;

        Ok(CategoryPage { category, page })
    }

    /// A user's posts. The owner sees drafts and scheduled posts too.
    pub async fn get_profile(
        &self,
        username: &str,
        viewer: Viewer,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<ProfilePage, DomainError> {
        let profile = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", username))?;

        let query = PostQuery::new(PostScope::Author(profile.id), viewer, now);
        let page =
            listing::assemble(self.repos.posts.as_ref(), &query, self.paginator, page).await?;

        Ok(ProfilePage { profile, page })
    }

    pub async fn create_post(&self, author: Uuid, input: PostInput) -> Result<Redirect, DomainError> {
        let user = self.session_user(author).await?;
        input.validate()?;
        self.check_references(&input).await?;

        let post = self.repos.posts.create(input.into_post(author)).await?;
        tracing::info!(post_id = %post.id, author_id = %author, "Post created");

        Ok(Redirect::Profile(user.username))
    }

    pub async fn update_post(
        &self,
        id: Uuid,
        requester: Uuid,
        input: PostInput,
    ) -> Result<Redirect, DomainError> {
        let mut post = self.existing_post(id).await?;
        if let Authorization::Deny(redirect) = authorize_mutation(&post, requester) {
            tracing::warn!(post_id = %id, requester_id = %requester, "Post update refused: not the author");
            return Ok(redirect);
        }

        input.validate()?;
        self.check_references(&input).await?;
        input.apply_to(&mut post);
        self.repos.posts.update(post).await?;
        tracing::info!(post_id = %id, "Post updated");

        Ok(Redirect::PostDetail(id))
    }

    pub async fn delete_post(&self, id: Uuid, requester: Uuid) -> Result<Redirect, DomainError> {
        let post = self.existing_post(id).await?;
        if let Authorization::Deny(redirect) = authorize_mutation(&post, requester) {
            tracing::warn!(post_id = %id, requester_id = %requester, "Post deletion refused: not the author");
            return Ok(redirect);
        }

        let user = self.session_user(requester).await?;
        self.repos.posts.delete(id).await?;
        tracing::info!(post_id = %id, "Post deleted with its comments");

        Ok(Redirect::Profile(user.username))
    }

    /// Any signed-in user may comment on a post they can see.
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        author: Uuid,
        input: CommentInput,
        now: DateTime<Utc>,
    ) -> Result<Redirect, DomainError> {
        self.session_user(author).await?;
        self.visible_post(post_id, &Viewer::User(author), now).await?;
        input.validate()?;

        let comment = self
            .repos
            .comments
            .create(Comment::new(post_id, author, input.text))
            .await?;
        tracing::info!(comment_id = %comment.id, post_id = %post_id, "Comment created");

        Ok(Redirect::PostDetail(post_id))
    }

    pub async fn update_comment(
        &self,
        id: Uuid,
        requester: Uuid,
        input: CommentInput,
    ) -> Result<Redirect, DomainError> {
        let mut comment = self.existing_comment(id).await?;
        if let Authorization::Deny(redirect) = authorize_mutation(&comment, requester) {
            tracing::warn!(comment_id = %id, requester_id = %requester, "Comment update refused: not the author");
            return Ok(redirect);
        }

        input.validate()?;
        comment.text = input.text;
        let comment = self.repos.comments.update(comment).await?;

        Ok(Redirect::PostDetail(comment.post_id))
    }

    pub async fn delete_comment(&self, id: Uuid, requester: Uuid) -> Result<Redirect, DomainError> {
        let comment = self.existing_comment(id).await?;
        if let Authorization::Deny(redirect) = authorize_mutation(&comment, requester) {
            tracing::warn!(comment_id = %id, requester_id = %requester, "Comment deletion refused: not the author");
            return Ok(redirect);
        }

        self.repos.comments.delete(id).await?;
        Ok(Redirect::PostDetail(comment.post_id))
    }

    /// Ownership check for a post edit, decided before the submitted form is read.
    pub async fn check_post_author(
        &self,
        id: Uuid,
        requester: Uuid,
    ) -> Result<Authorization, DomainError> {
        let post = self.existing_post(id).await?;
        let outcome = authorize_mutation(&post, requester);
        if !outcome.is_allowed() {
            tracing::warn!(post_id = %id, requester_id = %requester, "Post edit refused: not the author");
        }
        Ok(outcome)
    }

    /// Ownership check for a comment edit, decided before the submitted form is read.
    pub async fn check_comment_author(
        &self,
        id: Uuid,
        requester: Uuid,
    ) -> Result<Authorization, DomainError> {
        let comment = self.existing_comment(id).await?;
        let outcome = authorize_mutation(&comment, requester);
        if !outcome.is_allowed() {
            tracing::warn!(comment_id = %id, requester_id = %requester, "Comment edit refused: not the author");
        }
        Ok(outcome)
    }

    /// Current values of the signed-in user's editable fields.
    pub async fn get_profile_form(&self, requester: Uuid) -> Result<User, DomainError> {
        self.session_user(requester).await
    }

    /// Edit the signed-in user's own profile.
    pub async fn update_profile(
        &self,
        requester: Uuid,
        input: UserInput,
    ) -> Result<Redirect, DomainError> {
        let mut user = self.session_user(requester).await?;
        input.validate()?;

        if input.username != user.username {
            let taken = self.repos.users.find_by_username(&input.username).await?;
            if taken.is_some_and(|other| other.id != user.id) {
                return Err(DomainError::invalid(
                    "username: a user with that username already exists",
                ));
            }
        }

        input.apply_to(&mut user);
        let user = self
            .repos
            .users
            .update(user)
            .await
            .map_err(|e| unique_violation(e, "username: a user with that username already exists"))?;

        Ok(Redirect::Profile(user.username))
    }

    pub async fn create_category(&self, input: CategoryInput) -> Result<Category, DomainError> {
        input.validate()?;
        if self.repos.categories.find_by_slug(&input.slug).await?.is_some() {
            return Err(DomainError::invalid("slug: a category with that slug already exists"));
        }

        let category = self
            .repos
            .categories
            .create(input.into_category())
            .await
            .map_err(|e| unique_violation(e, "slug: a category with that slug already exists"))?;
        tracing::info!(category = %category.slug, "Category created");

        Ok(category)
    }

    pub async fn create_location(&self, input: LocationInput) -> Result<Location, DomainError> {
        input.validate()?;
        Ok(self.repos.locations.create(input.into_location()).await?)
    }

    async fn session_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.repos
            .users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::Unauthenticated)
    }

    async fn visible_post(
        &self,
        id: Uuid,
        viewer: &Viewer,
        now: DateTime<Utc>,
    ) -> Result<PostEntry, DomainError> {
        self.repos
            .posts
            .find_entry(id)
            .await?
            .filter(|entry| entry.is_visible_to(viewer, now))
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    async fn existing_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    async fn existing_comment(&self, id: Uuid) -> Result<Comment, DomainError> {
        self.repos
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", id))
    }

    async fn check_references(&self, input: &PostInput) -> Result<(), DomainError> {
        let mut errors = Vec::new();
        if let Some(id) = input.category_id {
            if self.repos.categories.find_by_id(id).await?.is_none() {
                errors.push("category: select a valid choice".to_string());
            }
        }
        if let Some(id) = input.location_id {
            if self.repos.locations.find_by_id(id).await?.is_none() {
                errors.push("location: select a valid choice".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(errors))
        }
    }
}

/// A unique constraint hit between our check and the write is still the user's to fix.
fn unique_violation(err: RepoError, message: &str) -> DomainError {
    match err {
        RepoError::Constraint(_) => DomainError::invalid(message),
        other => DomainError::Store(other),
    }
}
