//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::pagination::Paginator;
use yatube_core::ports::{PasswordService, Repositories, TokenService};
use yatube_core::service::{AccountService, FeedService, FollowService, PostService};
use yatube_infra::InMemoryCache;

use crate::config::SiteConfig;
use crate::page_cache::PageCache;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub feed: FeedService,
    pub posts: PostService,
    pub follows: FollowService,
    pub accounts: AccountService,
    pub index_cache: PageCache,
    pub tokens: Arc<dyn TokenService>,
    pub site: SiteConfig,
}

impl AppState {
    /// Wire the services over the given repositories.
    pub fn new(
        repos: Repositories,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        site: SiteConfig,
    ) -> Self {
        let paginator = Paginator::new(site.posts_per_page);
        let index_cache = PageCache::new(Arc::new(InMemoryCache::new()), site.index_cache_ttl);

        tracing::info!(
            posts_per_page = paginator.per_page(),
            index_cache_ttl_secs = site.index_cache_ttl.as_secs(),
            "Application state initialized"
        );

        Self {
            feed: FeedService::new(repos.clone(), paginator),
            posts: PostService::new(repos.clone()),
            follows: FollowService::new(repos.clone()),
            accounts: AccountService::new(repos.users.clone(), passwords),
            index_cache,
            tokens,
            site,
        }
    }
}
