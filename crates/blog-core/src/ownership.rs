//! Ownership guard for mutations.
//!
//! Only the author of a post or comment may change it. A refused request is
//! not an error: the requester is sent back to the public detail page.

use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::redirect::Redirect;

/// A resource with a single owning author.
pub trait Authored {
    fn author_id(&self) -> Uuid;

    /// Where a non-owner lands after a refused mutation.
    fn public_view(&self) -> Redirect;
}

impl Authored for Post {
    fn author_id(&self) -> Uuid {
        self.author_id
    }

    fn public_view(&self) -> Redirect {
        Redirect::PostDetail(self.id)
    }
}

impl Authored for Comment {
    fn author_id(&self) -> Uuid {
        self.author_id
    }

    fn public_view(&self) -> Redirect {
        Redirect::PostDetail(self.post_id)
    }
}

/// Outcome of the ownership check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Allow,
    Deny(Redirect),
}

impl Authorization {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Authorization::Allow)
    }
}

pub fn authorize_mutation<R: Authored>(resource: &R, requester: Uuid) -> Authorization {
    if resource.author_id() == requester {
        Authorization::Allow
    } else {
        Authorization::Deny(resource.public_view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_post_author_allowed() {
        let author = Uuid::new_v4();
        let post = Post::new(author, "T".into(), "B".into(), Utc::now());
        assert_eq!(authorize_mutation(&post, author), Authorization::Allow);
    }

    #[test]
    fn test_post_non_author_redirected_to_detail() {
        let post = Post::new(Uuid::new_v4(), "T".into(), "B".into(), Utc::now());
        let outcome = authorize_mutation(&post, Uuid::new_v4());
        assert_eq!(outcome, Authorization::Deny(Redirect::PostDetail(post.id)));
        assert!(!outcome.is_allowed());
    }

    #[test]
    fn test_comment_non_author_redirected_to_parent_post() {
        let post_id = Uuid::new_v4();
        let comment = Comment::new(post_id, Uuid::new_v4(), "Nice".into());

        assert_eq!(
            authorize_mutation(&comment, Uuid::new_v4()),
            Authorization::Deny(Redirect::PostDetail(post_id))
        );
        assert!(authorize_mutation(&comment, comment.author_id).is_allowed());
    }
}
