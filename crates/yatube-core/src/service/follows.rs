use uuid::Uuid;

use crate::domain::{Follow, User};
use crate::error::{DomainError, RepoError};
use crate::ports::Repositories;

/// What a follow request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Created,
    AlreadyFollowing,
    SelfFollow,
}

/// Follow and unfollow authors.
#[derive(Clone)]
pub struct FollowService {
    repos: Repositories,
}

impl FollowService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Subscribe `user_id` to `author_username`. Following twice or following
    /// yourself leaves the data unchanged.
    pub async fn follow(
        &self,
        user_id: Uuid,
        author_username: &str,
    ) -> Result<FollowOutcome, DomainError> {
        let author = self.author(author_username).await?;

        if author.id == user_id {
            return Ok(FollowOutcome::SelfFollow);
        }
        if self.repos.follows.exists(user_id, author.id).await? {
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        match self.repos.follows.insert(Follow::new(user_id, author.id)).await {
            Ok(_) => {
                tracing::info!(user_id = %user_id, author_id = %author.id, "Follow created");
                Ok(FollowOutcome::Created)
            }
            // a concurrent request inserted the same pair first
            Err(RepoError::Constraint(_)) => Ok(FollowOutcome::AlreadyFollowing),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the subscription if there is one. Returns whether a row was deleted.
    pub async fn unfollow(
        &self,
        user_id: Uuid,
        author_username: &str,
    ) -> Result<bool, DomainError> {
        let author = self.author(author_username).await?;
        let deleted = self.repos.follows.delete_pair(user_id, author.id).await?;

        if deleted > 0 {
            tracing::info!(user_id = %user_id, author_id = %author.id, "Follow removed");
        }
        Ok(deleted > 0)
    }

    pub async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.repos.follows.exists(user_id, author_id).await?)
    }

    async fn author(&self, username: &str) -> Result<User, DomainError> {
        self.repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }
}
