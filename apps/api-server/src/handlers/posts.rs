//! Post handlers.
//!
//! Each handler makes exactly one repository call.

use std::time::Instant;

use actix_web::{HttpResponse, web};

use quill_core::domain::{Post, PostFilter, PostId};
use quill_shared::dto::{ListPostsQuery, PostResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::validate::ValidPost;
use crate::state::AppState;

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        title: post.title,
        content: post.content,
        category: post.category,
        tags: post.tags,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// Malformed ids cannot name a stored post.
fn parse_id(raw: &str) -> AppResult<PostId> {
    raw.parse().map_err(|_| AppError::post_not_found())
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    ValidPost(fields): ValidPost,
) -> AppResult<HttpResponse> {
    let started = Instant::now();

    let post = state.posts.insert(fields).await?;

    tracing::debug!(post_id = %post.id, elapsed = ?started.elapsed(), "create_post");
    Ok(HttpResponse::Created().json(to_response(post)))
}

/// GET /posts?term=
///
/// Read as raw pairs so a repeated `term` narrows to the first one instead of
/// failing.
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> AppResult<HttpResponse> {
    let started = Instant::now();
    let query = ListPostsQuery::from_pairs(query.into_inner());
    let filter = PostFilter::from_term(query.term.as_deref());

    let posts = state.posts.find_many(&filter).await?;

    tracing::debug!(count = posts.len(), elapsed = ?started.elapsed(), "list_posts");
    let body: Vec<PostResponse> = posts.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let started = Instant::now();
    let id = parse_id(&path)?;

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(AppError::post_not_found)?;

    tracing::debug!(post_id = %id, elapsed = ?started.elapsed(), "get_post");
    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// PUT /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    ValidPost(fields): ValidPost,
) -> AppResult<HttpResponse> {
    let started = Instant::now();
    let id = parse_id(&path)?;

    let post = state
        .posts
        .replace(id, fields)
        .await?
        .ok_or_else(AppError::post_not_found)?;

    tracing::debug!(post_id = %id, elapsed = ?started.elapsed(), "update_post");
    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let started = Instant::now();
    let id = parse_id(&path)?;

    state
        .posts
        .delete_by_id(id)
        .await?
        .ok_or_else(AppError::post_not_found)?;

    tracing::debug!(post_id = %id, elapsed = ?started.elapsed(), "delete_post");
    Ok(HttpResponse::NoContent().finish())
}
