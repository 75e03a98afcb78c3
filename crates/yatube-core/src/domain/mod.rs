//! Domain entities - the core business objects.

mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::{Comment, CommentEntry};
pub use follow::Follow;
pub use group::Group;
pub use post::{FeedItem, POST_TEXT_STR, Post, PostDraft, excerpt, is_image_path};
pub use user::{AuthorSummary, NewUser, User};
