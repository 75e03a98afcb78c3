use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{NewUser, User};
use crate::error::{DomainError, RepoError};
use crate::messages::{USERNAME_TAKEN, WRONG_OLD_PASSWORD};
use crate::ports::{AuthError, PasswordService, UserRepository};

/// Form field that carries password rule violations on signup.
const SIGNUP_PASSWORD_FIELD: &str = "password2";
/// Form field that carries password rule violations on password change.
const NEW_PASSWORD_FIELD: &str = "new_password2";

/// Registration, login and password changes.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Register a new account. The username must be free.
    pub async fn signup(&self, new_user: NewUser) -> Result<User, DomainError> {
        if self.users.find_by_username(&new_user.username).await?.is_some() {
            return Err(DomainError::validation("username", USERNAME_TAKEN));
        }
        self.check_strength(SIGNUP_PASSWORD_FIELD, &new_user.password)?;

        let password_hash = self.passwords.hash(&new_user.password).map_err(internal)?;
        let user = User::new(new_user, password_hash);

        let user = self.users.insert(user).await.map_err(|e| match e {
            RepoError::Constraint(_) => DomainError::validation("username", USERNAME_TAKEN),
            other => other.into(),
        })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check credentials. Unknown users and wrong passwords look the same.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if !self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(internal)?
        {
            tracing::debug!(username = %username, "Rejected login");
            return Err(DomainError::Unauthorized);
        }

        Ok(user)
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))?;

        if !self
            .passwords
            .verify(old_password, &user.password_hash)
            .map_err(internal)?
        {
            return Err(DomainError::validation("old_password", WRONG_OLD_PASSWORD));
        }
        self.check_strength(NEW_PASSWORD_FIELD, new_password)?;

        user.password_hash = self.passwords.hash(new_password).map_err(internal)?;
        user.updated_at = Utc::now();
        self.users.update(user).await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Look up an account by id.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_id(user_id).await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }

    fn check_strength(&self, field: &'static str, password: &str) -> Result<(), DomainError> {
        match self.passwords.validate(password) {
            Ok(()) => Ok(()),
            Err(AuthError::WeakPassword(messages)) => {
                Err(DomainError::Validation { field, messages })
            }
            Err(e) => Err(internal(e)),
        }
    }
}

fn internal(err: AuthError) -> DomainError {
    DomainError::Internal(err.to_string())
}
