use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Follow entity - `user_id` subscribes to the posts of `author_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_id: Uuid,
}

impl Follow {
    pub fn new(user_id: Uuid, author_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            author_id,
        }
    }
}
