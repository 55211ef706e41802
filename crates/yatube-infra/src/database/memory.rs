//! In-memory repositories - used when no database is configured, and in tests.
//!
//! All three repositories share one set of tables behind a single async lock,
//! so the foreign-key rules of the relational schema hold here too: deleting a
//! user deletes their posts, deleting a group detaches its posts.
//! Note: data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use yatube_core::domain::{Group, Post, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    BaseRepository, GroupRepository, PostFilter, PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    groups: HashMap<Uuid, Group>,
    posts: HashMap<Uuid, Post>,
}

impl Tables {
    fn check_post_refs(&self, post: &Post) -> Result<(), RepoError> {
        if !self.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint(format!(
                "author {} does not exist",
                post.author_id
            )));
        }
        if let Some(group_id) = post.group_id {
            if !self.groups.contains_key(&group_id) {
                return Err(RepoError::Constraint(format!(
                    "group {group_id} does not exist"
                )));
            }
        }
        Ok(())
    }
}

/// Shared in-memory tables. Hand out repositories with [`users`](Self::users),
/// [`groups`](Self::groups) and [`posts`](Self::posts).
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository(self.clone())
    }

    pub fn groups(&self) -> InMemoryGroupRepository {
        InMemoryGroupRepository(self.clone())
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository(self.clone())
    }
}

pub struct InMemoryUserRepository(InMemoryStore);

pub struct InMemoryGroupRepository(InMemoryStore);

pub struct InMemoryPostRepository(InMemoryStore);

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.0.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.0.tables.write().await;

        if tables.users.contains_key(&user.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(format!(
                "username {} already taken",
                user.username
            )));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.0.tables.write().await;

        if tables
            .users
            .values()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(RepoError::Constraint(format!(
                "username {} already taken",
                user.username
            )));
        }

        let slot = tables.users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.0.tables.write().await;

        tables.users.remove(&id).ok_or(RepoError::NotFound)?;
        tables.posts.retain(|_, post| post.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Group, Uuid> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        Ok(self.0.tables.read().await.groups.get(&id).cloned())
    }

    async fn insert(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.0.tables.write().await;

        if tables.groups.contains_key(&group.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        if tables.groups.values().any(|g| g.slug == group.slug) {
            return Err(RepoError::Constraint(format!(
                "slug {} already taken",
                group.slug
            )));
        }

        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn update(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.0.tables.write().await;

        if tables
            .groups
            .values()
            .any(|g| g.slug == group.slug && g.id != group.id)
        {
            return Err(RepoError::Constraint(format!(
                "slug {} already taken",
                group.slug
            )));
        }

        let slot = tables.groups.get_mut(&group.id).ok_or(RepoError::NotFound)?;
        *slot = group.clone();
        Ok(group)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.0.tables.write().await;

        tables.groups.remove(&id).ok_or(RepoError::NotFound)?;
        for post in tables.posts.values_mut() {
            if post.group_id == Some(id) {
                post.group_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables.groups.values().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.groups.get(id).cloned())
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Group>, RepoError> {
        let tables = self.0.tables.read().await;
        let mut groups: Vec<Group> = tables.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.0.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.0.tables.write().await;

        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.check_post_refs(&post)?;

        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.0.tables.write().await;

        if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_post_refs(&post)?;

        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.0.tables.write().await;
        tables.posts.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables.posts.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.0.tables.read().await;

        let mut posts: Vec<&Post> = tables.posts.values().filter(|p| filter.matches(p)).collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then_with(|| b.id.cmp(&a.id)));

        Ok(posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use yatube_core::Paginator;

    use super::*;

    async fn seed() -> (InMemoryStore, User, Group) {
        let store = InMemoryStore::new();
        let user = store
            .users()
            .insert(User::new("wtf".to_string(), "hash".to_string()))
            .await
            .unwrap();
        let group = store
            .groups()
            .insert(Group::new("test-group", "test-slug", "test description"))
            .await
            .unwrap();
        (store, user, group)
    }

    #[tokio::test]
    async fn test_listing_is_newest_first() {
        let (store, user, _) = seed().await;
        let posts = store.posts();
        let base = Utc::now();

        for i in 0..3 {
            let mut post = Post::new(user.id, format!("post {i}"), None);
            post.pub_date = base + Duration::seconds(i);
            posts.insert(post).await.unwrap();
        }

        let listed = posts.list(PostFilter::All, 0, 10).await.unwrap();
        let texts: Vec<&str> = listed.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["post 2", "post 1", "post 0"]);
    }

    #[tokio::test]
    async fn test_second_page_of_thirteen_per_filter() {
        let (store, user, group) = seed().await;
        let posts = store.posts();
        for i in 0..13 {
            posts
                .insert(Post::new(user.id, format!("text {i}"), Some(group.id)))
                .await
                .unwrap();
        }

        for filter in [
            PostFilter::All,
            PostFilter::Group(group.id),
            PostFilter::Author(user.id),
        ] {
            let first = posts.page(filter, Paginator::default(), None).await.unwrap();
            let second = posts
                .page(filter, Paginator::default(), Some("2"))
                .await
                .unwrap();
            assert_eq!(first.len(), 10);
            assert_eq!(second.len(), 3);
            assert_eq!(second.num_pages, 2);
        }

        let other_group = posts
            .page(PostFilter::Group(Uuid::new_v4()), Paginator::default(), None)
            .await
            .unwrap();
        assert!(other_group.is_empty());
    }

    #[tokio::test]
    async fn test_deleting_group_detaches_posts() {
        let (store, user, group) = seed().await;
        let post = store
            .posts()
            .insert(Post::new(user.id, "grouped".to_string(), Some(group.id)))
            .await
            .unwrap();

        store.groups().delete(group.id).await.unwrap();

        let kept = store.posts().find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(kept.group_id, None);
        assert_eq!(kept.text, "grouped");
        assert_eq!(store.posts().count(PostFilter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_deleting_user_deletes_posts() {
        let (store, user, _) = seed().await;
        let other = store
            .users()
            .insert(User::new("other".to_string(), "hash".to_string()))
            .await
            .unwrap();
        store
            .posts()
            .insert(Post::new(user.id, "mine".to_string(), None))
            .await
            .unwrap();
        store
            .posts()
            .insert(Post::new(other.id, "theirs".to_string(), None))
            .await
            .unwrap();

        store.users().delete(user.id).await.unwrap();

        let remaining = store.posts().list(PostFilter::All, 0, 10).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].author_id, other.id);
    }

    #[tokio::test]
    async fn test_unique_and_foreign_keys_enforced() {
        let (store, user, group) = seed().await;

        let dup_user = store
            .users()
            .insert(User::new("wtf".to_string(), "hash".to_string()))
            .await;
        assert!(matches!(dup_user, Err(RepoError::Constraint(_))));

        let dup_slug = store
            .groups()
            .insert(Group::new("another", group.slug.clone(), ""))
            .await;
        assert!(matches!(dup_slug, Err(RepoError::Constraint(_))));

        let orphan = store
            .posts()
            .insert(Post::new(Uuid::new_v4(), "orphan".to_string(), None))
            .await;
        assert!(matches!(orphan, Err(RepoError::Constraint(_))));

        let bad_group = store
            .posts()
            .insert(Post::new(user.id, "lost".to_string(), Some(Uuid::new_v4())))
            .await;
        assert!(matches!(bad_group, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_update_missing_post_is_not_found() {
        let (store, user, _) = seed().await;

        let result = store
            .posts()
            .update(Post::new(user.id, "ghost".to_string(), None))
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
