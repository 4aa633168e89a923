use super::*;
use crate::config::ServerConfig;
use axum::body::{self, Body};
use axum::http::Request;
use std::path::Path;
use tower::ServiceExt;

const PRODUCTS: &str = r#"[
  {"id":"professortocat","name":"Professortocat","description":"The scholarly Octocat ready to teach you the ways of code","price":4.99,"image":"/images/products/Professortocat_v2.png","category":"academic"},
  {"id":"terracottocat","name":"Terracottocat","description":"A warm, earthy Octocat with rustic charm","price":3.99,"image":"/images/products/Terracottocat_Single.png","category":"artistic"}
]"#;

fn app_for(path: &Path) -> axum::Router {
    crate::routes::app(AppState::new(ServerConfig { port: 0, products_path: path.to_path_buf() }))
}

async fn get_products(path: &Path) -> (StatusCode, serde_json::Value) {
    let request = Request::get("/api/products").body(Body::empty()).expect("request");
    let response = app_for(path).oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).expect("json"))
}

#[tokio::test]
async fn returns_products_successfully() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    std::fs::write(&path, PRODUCTS).unwrap();

    let (status, body) = get_products(&path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::from_str::<serde_json::Value>(PRODUCTS).unwrap());
}

#[tokio::test]
async fn missing_file_returns_500_and_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get_products(&dir.path().join("missing.json")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn invalid_json_returns_500_and_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    std::fs::write(&path, "invalid json").unwrap();

    let (status, body) = get_products(&path).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn empty_document_returns_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    std::fs::write(&path, "[]").unwrap();

    let (status, body) = get_products(&path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn healthz_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::get("/healthz").body(Body::empty()).expect("request");
    let response = app_for(dir.path()).oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn catalog_errors_map_to_internal_server_error() {
    let parse = CatalogError::Parse(serde_json::from_str::<Vec<Product>>("nope").unwrap_err());
    assert_eq!(catalog_error_to_status(&parse), StatusCode::INTERNAL_SERVER_ERROR);

    let read = CatalogError::Read { path: "x".into(), source: std::io::Error::other("boom") };
    assert_eq!(catalog_error_to_status(&read), StatusCode::INTERNAL_SERVER_ERROR);
}
