use anyhow::{Context, bail};

use yatube_core::RepoError;
use yatube_core::domain::Group;
use yatube_core::ports::Repositories;

pub async fn create_group(
    repos: &Repositories,
    title: String,
    slug: String,
    description: String,
) -> anyhow::Result<Group> {
    if title.trim().is_empty() {
        bail!("group title must not be empty");
    }
    if !Group::is_valid_slug(&slug) {
        bail!("invalid slug {slug:?}: use letters, digits, hyphens and underscores");
    }

    match repos.groups.insert(Group::new(title, slug.clone(), description)).await {
        Ok(group) => {
            tracing::info!(group_id = %group.id, slug = %group.slug, "Group created");
            Ok(group)
        }
        Err(RepoError::Constraint(_)) => bail!("a group with slug {slug:?} already exists"),
        Err(e) => Err(e).context("failed to create group"),
    }
}

pub async fn list_groups(repos: &Repositories) -> anyhow::Result<Vec<Group>> {
    repos.groups.list_all().await.context("failed to list groups")
}

pub async fn delete_group(repos: &Repositories, slug: &str) -> anyhow::Result<()> {
    let group = repos
        .groups
        .find_by_slug(slug)
        .await?
        .with_context(|| format!("no group with slug {slug:?}"))?;

    repos.groups.delete(group.id).await?;
    tracing::info!(group_id = %group.id, "Group deleted");
    Ok(())
}

pub async fn delete_user(repos: &Repositories, username: &str) -> anyhow::Result<()> {
    let user = repos
        .users
        .find_by_username(username)
        .await?
        .with_context(|| format!("no user named {username:?}"))?;

    repos.users.delete(user.id).await?;
    tracing::info!(user_id = %user.id, "User deleted");
    Ok(())
}
