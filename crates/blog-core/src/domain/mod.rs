//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod user;
mod viewer;

pub use category::{Category, CategoryRef};
pub use comment::{Comment, CommentEntry};
pub use location::{Location, LocationRef};
pub use post::{Post, PostEntry};
pub use user::User;
pub use viewer::Viewer;
