use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest slug a group may carry.
pub const SLUG_MAX_LEN: usize = 50;

/// Group entity - a topic community that posts can belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    pub fn new(title: String, slug: String, description: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            title,
            slug,
            description,
        }
    }

    /// Slugs are ASCII letters, digits, hyphens and underscores.
    pub fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug.len() <= SLUG_MAX_LEN
            && slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
