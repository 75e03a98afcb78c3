use uuid::Uuid;

use crate::domain::{Comment, CommentEntry, FeedItem, Group, Post, PostDraft, is_image_path};
use crate::error::DomainError;
use crate::messages::{INVALID_CHOICE, INVALID_IMAGE, REQUIRED};
use crate::ports::{PostFilter, Repositories};

use super::feed::hydrate;

/// A post page: the post, its comments and the author's post count.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub item: FeedItem,
    pub comments: Vec<CommentEntry>,
    pub author_posts: u64,
}

/// Write side of posts and comments.
#[derive(Clone)]
pub struct PostService {
    repos: Repositories,
}

impl PostService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn get(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// The post with its author, group and comments.
    pub async fn detail(&self, post_id: Uuid) -> Result<PostDetail, DomainError> {
        let post = self.get(post_id).await?;
        let author_posts = self
            .repos
            .posts
            .count(PostFilter::Author(post.author_id))
            .await?;

        let item = hydrate(&self.repos, vec![post])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal(format!("post {post_id} has no author")))?;

        let comments = self.repos.comments.list_for_post(post_id).await?;
        let mut author_ids: Vec<Uuid> = comments.iter().map(|c| c.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors = self.repos.users.find_summaries(&author_ids).await?;

        let comments = comments
            .into_iter()
            .filter_map(|comment| {
                let author = authors.iter().find(|a| a.id == comment.author_id)?.clone();
                Some(CommentEntry { comment, author })
            })
            .collect();

        Ok(PostDetail {
            item,
            comments,
            author_posts,
        })
    }

    /// Groups a post may be tagged with.
    pub async fn groups(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.repos.groups.list_all().await?)
    }

    /// Publish a new post as `author_id`.
    pub async fn create(&self, author_id: Uuid, draft: PostDraft) -> Result<Post, DomainError> {
        self.validate(&draft).await?;

        let post = self.repos.posts.insert(Post::new(author_id, draft)).await?;
        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");
        Ok(post)
    }

    /// The post, if `user_id` is allowed to edit it.
    pub async fn editable(&self, post_id: Uuid, user_id: Uuid) -> Result<Post, DomainError> {
        let post = self.get(post_id).await?;
        if post.author_id != user_id {
            return Err(DomainError::Forbidden("post"));
        }
        Ok(post)
    }

    /// Apply an edit by the post's author.
    pub async fn edit(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        let mut post = self.editable(post_id, user_id).await?;
        self.validate(&draft).await?;

        post.apply(draft);
        let post = self.repos.posts.update(post).await?;
        tracing::info!(post_id = %post.id, "Post edited");
        Ok(post)
    }

    /// Comment on a post. Blank text is dropped without an error.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>, DomainError> {
        let post = self.get(post_id).await?;

        if text.trim().is_empty() {
            tracing::debug!(post_id = %post.id, "Discarding blank comment");
            return Ok(None);
        }

        let comment = self
            .repos
            .comments
            .insert(Comment::new(post.id, author_id, text.to_string()))
            .await?;
        tracing::info!(post_id = %post.id, comment_id = %comment.id, "Comment added");
        Ok(Some(comment))
    }

    async fn validate(&self, draft: &PostDraft) -> Result<(), DomainError> {
        if draft.text.trim().is_empty() {
            return Err(DomainError::validation("text", REQUIRED));
        }

        if let Some(image) = &draft.image {
            if !is_image_path(image) {
                return Err(DomainError::validation("image", INVALID_IMAGE));
            }
        }

        if let Some(group_id) = draft.group_id {
            if self.repos.groups.find_by_id(group_id).await?.is_none() {
                return Err(DomainError::validation("group", INVALID_CHOICE));
            }
        }

        Ok(())
    }
}
