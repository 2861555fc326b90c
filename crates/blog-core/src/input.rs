//! Validated user input for write operations.
//!
//! Author and ownership fields never appear here: they come from the
//! authenticated session.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Location, Post, User};
use crate::error::DomainError;

pub const TITLE_MAX_LEN: usize = 256;
pub const SLUG_MAX_LEN: usize = 64;
pub const USERNAME_MAX_LEN: usize = 150;
pub const NAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Collects field errors so a form reports all of them at once.
#[derive(Debug, Default)]
struct Errors(Vec<String>);

impl Errors {
    fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.0.push(message.into());
        }
    }

    fn required(&mut self, field: &str, value: &str) {
        self.check(!value.trim().is_empty(), format!("{field}: this field is required"));
    }

    fn max_len(&mut self, field: &str, value: &str, max: usize) {
        self.check(
            value.chars().count() <= max,
            format!("{field}: at most {max} characters"),
        );
    }

    fn finish(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.0))
        }
    }
}

/// Letters, digits and `@ . + - _`.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// ASCII letters, digits, hyphens and underscores.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn check_email(errors: &mut Errors, email: &str) {
    if !email.is_empty() {
        errors.check(email.contains('@'), "email: enter a valid email address");
        errors.max_len("email", email, EMAIL_MAX_LEN);
    }
}

fn check_username(errors: &mut Errors, username: &str) {
    errors.required("username", username);
    errors.max_len("username", username, USERNAME_MAX_LEN);
    if !username.is_empty() {
        errors.check(
            is_valid_username(username),
            "username: only letters, digits and @/./+/-/_ are allowed",
        );
    }
}

#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
}

impl PostInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Errors::default();
        errors.required("title", &self.title);
        errors.max_len("title", &self.title, TITLE_MAX_LEN);
        errors.required("text", &self.text);
        errors.finish()
    }

    pub fn into_post(self, author_id: Uuid) -> Post {
        let mut post = Post::new(author_id, self.title, self.text, self.pub_date);
        post.is_published = self.is_published;
        post.category_id = self.category_id;
        post.location_id = self.location_id;
        post
    }

    /// Overwrite the editable fields; id, author and `created_at` stay.
    pub fn apply_to(self, post: &mut Post) {
        post.title = self.title;
        post.text = self.text;
        post.pub_date = self.pub_date;
        post.is_published = self.is_published;
        post.category_id = self.category_id;
        post.location_id = self.location_id;
    }
}

#[derive(Debug, Clone)]
pub struct CommentInput {
    pub text: String,
}

impl CommentInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Errors::default();
        errors.required("text", &self.text);
        errors.finish()
    }
}

/// Editable profile fields.
#[derive(Debug, Clone)]
pub struct UserInput {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UserInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Errors::default();
        check_username(&mut errors, &self.username);
        errors.max_len("first_name", &self.first_name, NAME_MAX_LEN);
        errors.max_len("last_name", &self.last_name, NAME_MAX_LEN);
        check_email(&mut errors, &self.email);
        errors.finish()
    }

    pub fn apply_to(self, user: &mut User) {
        user.username = self.username;
        user.first_name = self.first_name;
        user.last_name = self.last_name;
        user.email = self.email;
        user.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegistrationInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Errors::default();
        check_username(&mut errors, &self.username);
        check_email(&mut errors, &self.email);
        errors.max_len("first_name", &self.first_name, NAME_MAX_LEN);
        errors.max_len("last_name", &self.last_name, NAME_MAX_LEN);
        errors.check(
            self.password.chars().count() >= PASSWORD_MIN_LEN,
            format!("password: at least {PASSWORD_MIN_LEN} characters"),
        );
        errors.finish()
    }
}

#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
}

impl CategoryInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Errors::default();
        errors.required("title", &self.title);
        errors.max_len("title", &self.title, TITLE_MAX_LEN);
        errors.required("description", &self.description);
        errors.max_len("slug", &self.slug, SLUG_MAX_LEN);
        errors.check(
            is_valid_slug(&self.slug),
            "slug: use only latin letters, digits, hyphens and underscores",
        );
        errors.finish()
    }

    pub fn into_category(self) -> Category {
        let mut category = Category::new(self.title, self.description, self.slug);
        category.is_published = self.is_published;
        category
    }
}

#[derive(Debug, Clone)]
pub struct LocationInput {
    pub name: String,
    pub is_published: bool,
}

impl LocationInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = Errors::default();
        errors.required("name", &self.name);
        errors.max_len("name", &self.name, TITLE_MAX_LEN);
        errors.finish()
    }

    pub fn into_location(self) -> Location {
        let mut location = Location::new(self.name);
        location.is_published = self.is_published;
        location
    }
}
