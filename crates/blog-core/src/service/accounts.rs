//! Registration and credential checks.

use std::sync::Arc;

use crate::domain::User;
use crate::error::{DomainError, RepoError};
use crate::input::RegistrationInput;
use crate::ports::{PasswordService, UserRepository};

const USERNAME_TAKEN: &str = "username: a user with that username already exists";

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    pub async fn register(&self, input: RegistrationInput) -> Result<User, DomainError> {
        input.validate()?;
        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(DomainError::invalid(USERNAME_TAKEN));
        }

        let password_hash = self
            .passwords
            .hash(&input.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = User::new(input.username, input.email, password_hash)
            .with_names(input.first_name, input.last_name);
        let user = self.users.create(user).await.map_err(|e| match e {
            RepoError::Constraint(_) => DomainError::invalid(USERNAME_TAKEN),
            other => DomainError::Store(other),
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// The user behind a username/password pair, or `Unauthenticated`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(DomainError::Unauthenticated)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            tracing::debug!(username = %username, "Rejected login: wrong password");
            return Err(DomainError::Unauthenticated);
        }

        Ok(user)
    }
}
