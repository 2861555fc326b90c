//! Redirect targets produced by mutations and ownership denials.

use uuid::Uuid;

/// Where the client should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    PostDetail(Uuid),
    Profile(String),
}

impl Redirect {
    /// The path used in the `Location` header.
    pub fn location(&self) -> String {
        match self {
            Redirect::PostDetail(id) => post_detail_path(*id),
            Redirect::Profile(username) => format!("/profile/{username}/"),
        }
    }
}

pub fn post_detail_path(id: Uuid) -> String {
    format!("/posts/{id}/")
}

/// Target of the comment submission form on a post detail page.
pub fn comment_form_path(post_id: Uuid) -> String {
    format!("/posts/{post_id}/comment/")
}
