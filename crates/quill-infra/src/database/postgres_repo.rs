//! PostgreSQL post repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, Condition, DbErr, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use quill_core::domain::{Post, PostFields, PostFilter, PostId};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Escape LIKE metacharacters so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring match over title, content, category and tags.
///
/// `term` is expected to be lowercased already.
pub(crate) fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(term));
    let text = |column: post::Column| {
        Expr::expr(Func::lower(Expr::col((PostEntity, column)))).like(pattern.clone())
    };

    Condition::any()
        .add(text(post::Column::Title))
        .add(text(post::Column::Content))
        .add(text(post::Column::Category))
        .add(Expr::cust_with_values(
            r#"EXISTS (SELECT 1 FROM unnest("posts"."tags") AS tag WHERE lower(tag) LIKE $1)"#,
            [pattern],
        ))
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, fields: PostFields) -> Result<Post, RepoError> {
        fields.check().map_err(RepoError::Validation)?;

        let active: post::ActiveModel = Post::new(fields).into();
        let model = active.insert(&self.db).await.map_err(query_error)?;

        tracing::debug!(post_id = %model.id, "Post inserted");
        Ok(model.into())
    }

    async fn find_many(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let mut select = PostEntity::find();
        if let Some(term) = filter.term() {
            tracing::debug!(term, "Searching posts");
            select = select.filter(search_condition(term));
        }

        let models = select
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn replace(&self, id: PostId, fields: PostFields) -> Result<Option<Post>, RepoError> {
        fields.check().map_err(RepoError::Validation)?;

        let Some(model) = PostEntity::find_by_id(Uuid::from(id))
            .one(&self.db)
            .await
            .map_err(query_error)?
        else {
            return Ok(None);
        };

        let now = Utc::now().max(DateTime::<Utc>::from(model.updated_at));
        let mut active = model.into_active_model();
        active.apply(fields, now.into());

        match active.update(&self.db).await {
            Ok(model) => {
                tracing::debug!(post_id = %model.id, "Post replaced");
                Ok(Some(model.into()))
            }
            // Deleted between the lookup and the update.
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(query_error(e)),
        }
    }
}
