use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{AuthorSummary, FeedItem, Group, Post};
use crate::error::DomainError;
use crate::pagination::{Page, PageWindow, Paginator};
use crate::ports::{PostFilter, Repositories};

/// A group page: the group and one page of its posts.
#[derive(Debug, Clone)]
pub struct GroupFeed {
    pub group: Group,
    pub page: Page<FeedItem>,
}

/// A profile page: the author, one page of their posts and whether the
/// viewer follows them.
#[derive(Debug, Clone)]
pub struct ProfileFeed {
    pub author: AuthorSummary,
    pub page: Page<FeedItem>,
    pub following: bool,
}

/// Read side of the post feeds.
#[derive(Clone)]
pub struct FeedService {
    repos: Repositories,
    paginator: Paginator,
}

impl FeedService {
    pub fn new(repos: Repositories, paginator: Paginator) -> Self {
        Self { repos, paginator }
    }

    /// Every post, newest first.
    pub async fn index(&self, page: Option<&str>) -> Result<Page<FeedItem>, DomainError> {
        self.load(PostFilter::All, page).await
    }

    /// Resolve the raw `page` value of the index against the current post count.
    pub async fn index_window(&self, page: Option<&str>) -> Result<PageWindow, DomainError> {
        let total = self.repos.posts.count(PostFilter::All).await?;
        Ok(self.paginator.window(total, page))
    }

    /// Load an index page already resolved by [`FeedService::index_window`].
    pub async fn index_at(&self, window: PageWindow) -> Result<Page<FeedItem>, DomainError> {
        self.load_window(PostFilter::All, window).await
    }

    /// Posts of the group with `slug`.
    pub async fn group_posts(
        &self,
        slug: &str,
        page: Option<&str>,
    ) -> Result<GroupFeed, DomainError> {
        let group = self
            .repos
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))?;

        let page = self.load(PostFilter::Group(group.id), page).await?;
        Ok(GroupFeed { group, page })
    }

    /// Posts of `username`, plus the follow flag for `viewer`.
    pub async fn profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        page: Option<&str>,
    ) -> Result<ProfileFeed, DomainError> {
        let author = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let following = match viewer {
            Some(viewer) if viewer != author.id => {
                self.repos.follows.exists(viewer, author.id).await?
            }
            _ => false,
        };

        let page = self.load(PostFilter::Author(author.id), page).await?;
        Ok(ProfileFeed {
            author: author.summary(),
            page,
            following,
        })
    }

    /// Posts by the authors `viewer` follows.
    pub async fn follow_index(
        &self,
        viewer: Uuid,
        page: Option<&str>,
    ) -> Result<Page<FeedItem>, DomainError> {
        self.load(PostFilter::FollowedBy(viewer), page).await
    }

    async fn load(
        &self,
        filter: PostFilter,
        page: Option<&str>,
    ) -> Result<Page<FeedItem>, DomainError> {
        let total = self.repos.posts.count(filter).await?;
        let window = self.paginator.window(total, page);
        self.load_window(filter, window).await
    }

    async fn load_window(
        &self,
        filter: PostFilter,
        window: PageWindow,
    ) -> Result<Page<FeedItem>, DomainError> {
        let posts = self
            .repos
            .posts
            .list(filter, window.offset(), window.limit())
            .await?;

        tracing::debug!(?filter, page = window.number, total = window.total, "Loaded feed page");

        let items = hydrate(&self.repos, posts).await?;
        Ok(window.into_page(items))
    }
}

/// Attach authors and groups to posts, keeping the posts' order.
pub(crate) async fn hydrate(
    repos: &Repositories,
    posts: Vec<Post>,
) -> Result<Vec<FeedItem>, DomainError> {
    let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let mut group_ids: Vec<Uuid> = posts.iter().filter_map(|p| p.group_id).collect();
    group_ids.sort_unstable();
    group_ids.dedup();

    let authors: HashMap<Uuid, AuthorSummary> = repos
        .users
        .find_summaries(&author_ids)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    let groups: HashMap<Uuid, Group> = if group_ids.is_empty() {
        HashMap::new()
    } else {
        repos
            .groups
            .find_many(&group_ids)
            .await?
            .into_iter()
            .map(|g| (g.id, g))
            .collect()
    };

    let items = posts
        .into_iter()
        .filter_map(|post| {
            let Some(author) = authors.get(&post.author_id).cloned() else {
                tracing::warn!(post_id = %post.id, "Post author missing, skipping");
                return None;
            };
            let group = post.group_id.and_then(|id| groups.get(&id).cloned());
            Some(FeedItem {
                post,
                author,
                group,
            })
        })
        .collect();

    Ok(items)
}
