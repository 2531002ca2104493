//! HTTP handlers and route configuration.

mod posts;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, web};
use quill_shared::ErrorResponse;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());
    let query_config = web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());

    cfg.app_data(json_config)
        .app_data(query_config)
        .service(
            web::scope("/posts")
                .service(
                    web::resource(["", "/"])
                        .route(web::post().to(posts::create_post))
                        .route(web::get().to(posts::list_posts))
                        .default_service(web::to(route_not_found)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(posts::get_post))
                        .route(web::put().to(posts::update_post))
                        .route(web::delete().to(posts::delete_post))
                        .default_service(web::to(route_not_found)),
                ),
        )
        .default_service(web::to(route_not_found));
}

/// Fallback for unknown paths and methods.
async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Route not found"))
}
