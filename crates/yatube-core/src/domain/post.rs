use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorSummary, Group};

/// Number of characters a post or comment shows as its string form.
pub const POST_TEXT_STR: usize = 15;

const IMAGE_EXTENSIONS: &[&str] = &["gif", "png", "jpg", "jpeg", "webp", "bmp"];

/// Post entity - a user-authored text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    /// Media path of the attached image, relative to the media root.
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
}

impl Post {
    /// Create a new post authored by `author_id`.
    pub fn new(author_id: Uuid, draft: PostDraft) -> Self {
        Self {
            id: Uuid::now_v7(),
            author_id,
            group_id: draft.group_id,
            text: draft.text,
            image: draft.image,
            pub_date: Utc::now(),
        }
    }

    /// Apply an edit. Author and publication date never change.
    pub fn apply(&mut self, draft: PostDraft) {
        self.text = draft.text;
        self.group_id = draft.group_id;
        match draft.image {
            Some(image) => self.image = Some(image),
            None if draft.clear_image => self.image = None,
            None => {}
        }
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&excerpt(&self.text, POST_TEXT_STR))
    }
}

/// Validated input of the create and edit flows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    pub group_id: Option<Uuid>,
    /// New image; `None` keeps the current one unless `clear_image` is set.
    pub image: Option<String>,
    pub clear_image: bool,
}

/// A post hydrated with its author and group, as shown in feeds.
#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    pub post: Post,
    pub author: AuthorSummary,
    pub group: Option<Group>,
}

/// First `limit` characters of `text`.
pub fn excerpt(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Whether `path` names an image file by extension.
pub fn is_image_path(path: &str) -> bool {
    path.rsplit_once('.')
        .map(|(stem, ext)| {
            !stem.is_empty()
                && IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}
