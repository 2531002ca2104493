use async_trait::async_trait;

use crate::domain::{Post, PostFields, PostFilter, PostId};
use crate::error::RepoError;

/// Lookup and removal by primary key.
///
/// Both operations report a missing record as `Ok(None)`.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID, returning what was removed.
    async fn delete_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;
}

/// Post storage.
///
/// Implementations assign ids and timestamps, and refuse fields that fail
/// [`PostFields::check`] with [`RepoError::Validation`].
#[async_trait]
pub trait PostRepository: BaseRepository<Post, PostId> {
    /// Store a new post.
    async fn insert(&self, fields: PostFields) -> Result<Post, RepoError>;

    /// All posts matching `filter`, newest first.
    async fn find_many(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError>;

    /// Replace the editable fields of an existing post.
    async fn replace(&self, id: PostId, fields: PostFields) -> Result<Option<Post>, RepoError>;
}
