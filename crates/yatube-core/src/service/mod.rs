//! Services - the business rules behind every page and action.
//!
//! Services are cheap to clone and hold only `Arc`s to ports.

mod accounts;
mod feed;
mod follows;
mod posts;

pub use accounts::AccountService;
pub use feed::{FeedService, GroupFeed, ProfileFeed};
pub use follows::{FollowOutcome, FollowService};
pub use posts::{PostDetail, PostService};
