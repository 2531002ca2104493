//! Payload validation extractor for create and update.

use std::sync::LazyLock;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;
use serde_json::Value;

use quill_core::domain::PostFields;
use quill_core::validation::Validator;
use quill_shared::dto::PostRequest;

use crate::middleware::error::AppError;

static POST_RULES: LazyLock<Validator> = LazyLock::new(PostFields::validator);

/// A request body that passed the post rules.
///
/// Taking this as a handler argument runs validation before the handler;
/// a failing body is answered with 400 and the list of violations.
#[derive(Debug)]
pub struct ValidPost(pub PostFields);

impl FromRequest for ValidPost {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Value>::from_request(req, payload);

        Box::pin(async move {
            let body = body.await?.into_inner();
            POST_RULES.validate(&body).map_err(AppError::Validation)?;

            let request: PostRequest =
                serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))?;

            Ok(Self(PostFields::new(
                request.title,
                request.content,
                request.category,
                request.tags,
            )))
        })
    }
}
