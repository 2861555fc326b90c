//! Domain values rendered as wire types.

use actix_web::{HttpResponse, http::header};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use blog_core::domain::{Category, CommentEntry, PostEntry, User};
use blog_core::pagination::{Page, PageRequest};
use blog_core::redirect::Redirect;
use blog_core::service::PostDetail;
use blog_shared::dto::{
    CategoryLink, CategoryResponse, CommentResponse, PageResponse, PostDetailResponse,
    PostResponse, UserResponse,
};

use crate::middleware::error::{AppError, AppResult};

/// `?page=N` on listings. Anything unparsable means the first page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref())
    }
}

/// Decode a submitted form. Mutating handlers read the raw body so that the
/// session and ownership checks run first; an empty or malformed body is
/// invalid input.
pub fn form<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body).map_err(|err| AppError::Validation(vec![format!("form: {err}")]))
}

/// `303 See Other` to wherever the operation sent us.
pub fn see_other(redirect: Redirect) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, redirect.location()))
        .finish()
}

pub fn post(entry: PostEntry) -> PostResponse {
    PostResponse {
        id: entry.post.id,
        title: entry.post.title,
        text: entry.post.text,
        pub_date: entry.post.pub_date,
        is_published: entry.post.is_published,
        author: entry.author_username,
        category: entry.category.map(|c| CategoryLink {
            title: c.title,
            slug: c.slug,
        }),
        location: entry
            .location
            .filter(|l| l.is_published)
            .map(|l| l.name),
        comment_count: entry.comment_count,
    }
}

pub fn comment(entry: CommentEntry) -> CommentResponse {
    CommentResponse {
        id: entry.comment.id,
        author: entry.author_username,
        text: entry.comment.text,
        created_at: entry.comment.created_at,
    }
}

pub fn page(page: Page<PostEntry>) -> PageResponse<PostResponse> {
    let page = page.map(post);
    PageResponse {
        items: page.items,
        page: page.page_number,
        total_pages: page.total_pages,
        has_next: page.has_next,
        has_previous: page.has_previous,
    }
}

pub fn post_detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(detail.post),
        comments: detail.comments.into_iter().map(comment).collect(),
        comment_form_action: detail.comment_form_action,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
        is_published: category.is_published,
    }
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        date_joined: user.created_at,
    }
}
