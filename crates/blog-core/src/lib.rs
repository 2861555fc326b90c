//! # Blog Core
//!
//! The domain layer of Blogicum.
//! Entities, the visibility and ownership rules, listing assembly and the
//! `BlogService` operations. No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod input;
pub mod listing;
pub mod ownership;
pub mod pagination;
pub mod ports;
pub mod redirect;
pub mod service;
pub mod visibility;

pub use error::DomainError;
pub use redirect::Redirect;
pub use service::BlogService;
