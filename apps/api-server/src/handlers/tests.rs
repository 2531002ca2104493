use actix_web::http::StatusCode;
use actix_web::middleware::from_fn;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use quill_shared::dto::PostResponse;

use super::configure_routes;
use crate::observability::{REQUEST_ID_HEADER, request_id};
use crate::state::AppState;

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .wrap(from_fn(request_id))
                .app_data(web::Data::new(AppState::in_memory()))
                .configure(configure_routes),
        )
        .await
    };
}

fn post_body(title: &str, content: &str, category: &str) -> Value {
    json!({ "title": title, "content": content, "category": category })
}

#[actix_web::test]
async fn create_get_delete_scenario() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(post_body("A", "B", "C"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: PostResponse = test::read_body_json(resp).await;
    assert_eq!(created.title, "A");
    assert_eq!(created.content, "B");
    assert_eq!(created.category, "C");
    assert!(created.tags.is_empty());
    assert_eq!(created.created_at, created.updated_at);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: PostResponse = test::read_body_json(resp).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let body = test::read_body(resp).await;
    assert!(body.is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Post not found" }));
}

#[actix_web::test]
async fn created_post_has_camel_case_shape() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "title": "A", "content": "B", "category": "C", "tags": ["x", "y"] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    for key in ["id", "title", "content", "category", "tags", "createdAt", "updatedAt"] {
        assert!(body.get(key).is_some(), "missing {key}");
    }
    assert_eq!(body["tags"], json!(["x", "y"]));
}

#[actix_web::test]
async fn create_without_content_names_content() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "title": "A", "category": "C" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "content");
    assert_eq!(errors[0]["message"], "Content is required");
}

#[actix_web::test]
async fn create_rejects_non_array_tags() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "title": "A", "content": "B", "category": "C", "tags": "rust" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "tags");
}

#[actix_web::test]
async fn create_rejects_empty_strings() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(post_body("", "", ""))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["title", "content", "category"]);
}

#[actix_web::test]
async fn malformed_json_is_bad_request() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn list_is_newest_first_and_stable() {
    let app = app!();

    let mut ids = Vec::new();
    for title in ["first", "second", "third"] {
        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(post_body(title, "body", "misc"))
            .to_request();
        let created: PostResponse = test::call_and_read_body_json(&app, req).await;
        ids.push(created.id);
    }

    let req = test::TestRequest::get().uri("/posts").to_request();
    let listed: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
    let listed_ids: Vec<_> = listed.iter().map(|p| p.id.clone()).collect();
    ids.reverse();
    assert_eq!(listed_ids, ids);
    assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let req = test::TestRequest::get().uri("/posts").to_request();
    let again: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(again, listed);
}

#[actix_web::test]
async fn list_empty_store() {
    let app = app!();

    let req = test::TestRequest::get().uri("/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn list_term_matches_case_insensitively() {
    let app = app!();

    for (title, category) in [("Hello", "Tech"), ("Dinner", "Food")] {
        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(post_body(title, "body", category))
            .to_request();
        test::call_service(&app, req).await;
    }
    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "title": "Notes", "content": "x", "category": "misc", "tags": ["TECHNICAL"] }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/posts?term=tech").to_request();
    let found: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
    let titles: Vec<_> = found.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Notes", "Hello"]);

    let req = test::TestRequest::get().uri("/posts?term=").to_request();
    let all: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 3);
}

#[actix_web::test]
async fn repeated_term_uses_the_first() {
    let app = app!();

    for (title, category) in [("Hello", "Tech"), ("Dinner", "Food")] {
        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(post_body(title, "body", category))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/posts?term=food&term=tech")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let found: Vec<PostResponse> = test::read_body_json(resp).await;
    let titles: Vec<_> = found.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Dinner"]);
}

#[actix_web::test]
async fn update_replaces_fields() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "title": "A", "content": "B", "category": "C", "tags": ["old"] }))
        .to_request();
    let created: PostResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", created.id))
        .set_json(post_body("X", "Y", "Z"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: PostResponse = test::read_body_json(resp).await;

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "X");
    assert!(updated.tags.is_empty());
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", created.id))
        .to_request();
    let fetched: PostResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, updated);
}

#[actix_web::test]
async fn update_requires_all_fields() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(post_body("A", "B", "C"))
        .to_request();
    let created: PostResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", created.id))
        .set_json(json!({ "title": "only title" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn update_missing_post_is_not_found() {
    let app = app!();

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", uuid::Uuid::new_v4()))
        .set_json(post_body("A", "B", "C"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Post not found");
}

#[actix_web::test]
async fn malformed_id_is_not_found() {
    let app = app!();

    for req in [
        test::TestRequest::get().uri("/posts/not-an-id"),
        test::TestRequest::delete().uri("/posts/12345"),
        test::TestRequest::put()
            .uri("/posts/xyz")
            .set_json(post_body("A", "B", "C")),
    ] {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Post not found");
    }
}

#[actix_web::test]
async fn delete_missing_post_is_not_found() {
    let app = app!();

    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{}", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unknown_routes_return_json_404() {
    let app = app!();

    for req in [
        test::TestRequest::get().uri("/nowhere"),
        test::TestRequest::patch().uri("/posts/abc"),
        test::TestRequest::delete().uri("/posts"),
    ] {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Route not found");
    }
}

#[actix_web::test]
async fn request_id_is_echoed() {
    let app = app!();

    let req = test::TestRequest::get()
        .uri("/posts")
        .insert_header((REQUEST_ID_HEADER, "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");

    let req = test::TestRequest::get().uri("/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
}
