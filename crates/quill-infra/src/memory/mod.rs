//! In-memory post store - used when no database is configured, and in tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::domain::{Post, PostFields, PostFilter, PostId};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

/// Post store kept in insertion order behind an async RwLock.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, PostId> for InMemoryPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn delete_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let mut posts = self.posts.write().await;
        let removed = posts
            .iter()
            .position(|p| p.id == id)
            .map(|index| posts.remove(index));
        Ok(removed)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, fields: PostFields) -> Result<Post, RepoError> {
        fields.check().map_err(RepoError::Validation)?;

        let post = Post::new(fields);
        self.posts.write().await.push(post.clone());
        tracing::debug!(post_id = %post.id, "Post stored in memory");
        Ok(post)
    }

    async fn find_many(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        // Newest insert first, so equal timestamps still come out newest-first.
        let mut found: Vec<Post> = posts
            .iter()
            .rev()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn replace(&self, id: PostId, fields: PostFields) -> Result<Option<Post>, RepoError> {
        fields.check().map_err(RepoError::Validation)?;

        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.replace(fields);
        Ok(Some(post.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, category: &str) -> PostFields {
        PostFields::new(title, "content", category, vec![])
    }

    #[tokio::test]
    async fn insert_then_find() {
        let repo = InMemoryPostRepository::new();
        let post = repo.insert(fields("A", "C")).await.unwrap();

        let found = repo.find_by_id(post.id).await.unwrap();
        assert_eq!(found, Some(post));
    }

    #[tokio::test]
    async fn insert_rejects_empty_fields() {
        let repo = InMemoryPostRepository::new();
        let err = repo.insert(fields("", "C")).await.unwrap_err();

        assert!(matches!(err, RepoError::Validation(v) if v[0].field == "title"));
        assert!(repo.find_many(&PostFilter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_many_is_newest_first() {
        let repo = InMemoryPostRepository::new();
        let first = repo.insert(fields("first", "C")).await.unwrap();
        let second = repo.insert(fields("second", "C")).await.unwrap();

        let all = repo.find_many(&PostFilter::all()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn find_many_applies_filter() {
        let repo = InMemoryPostRepository::new();
        repo.insert(fields("A", "Tech")).await.unwrap();
        repo.insert(fields("B", "Food")).await.unwrap();

        let found = repo
            .find_many(&PostFilter::from_term(Some("tech")))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, "Tech");
    }

    #[tokio::test]
    async fn replace_missing_post_is_none() {
        let repo = InMemoryPostRepository::new();
        let result = repo.replace(PostId::new(), fields("A", "C")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn replace_updates_fields() {
        let repo = InMemoryPostRepository::new();
        let post = repo.insert(fields("A", "C")).await.unwrap();

        let updated = repo
            .replace(post.id, fields("B", "D"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, post.id);
        assert_eq!(updated.title, "B");
        assert_eq!(updated.created_at, post.created_at);
        assert!(updated.updated_at >= post.updated_at);
    }

    #[tokio::test]
    async fn replace_rejects_empty_fields() {
        let repo = InMemoryPostRepository::new();
        let post = repo.insert(fields("A", "C")).await.unwrap();

        let err = repo
            .replace(post.id, PostFields::new("", "content", "", vec![]))
            .await
            .unwrap_err();

        assert!(matches!(&err, RepoError::Validation(v) if v.len() == 2 && v[0].field == "title"));
        assert_eq!(repo.find_by_id(post.id).await.unwrap(), Some(post));
    }

    #[tokio::test]
    async fn delete_removes_post() {
        let repo = InMemoryPostRepository::new();
        let post = repo.insert(fields("A", "C")).await.unwrap();

        assert_eq!(repo.delete_by_id(post.id).await.unwrap(), Some(post.clone()));
        assert!(repo.find_by_id(post.id).await.unwrap().is_none());
        assert!(repo.delete_by_id(post.id).await.unwrap().is_none());
    }
}
