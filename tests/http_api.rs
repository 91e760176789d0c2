mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use base64::{prelude::BASE64_STANDARD, Engine};
use serde_json::Value;
use tower::ServiceExt;

use common::*;

async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn root_request() -> Request<Body> {
    Request::builder().uri("/").body(Body::empty()).unwrap()
}

#[tokio::test]
async fn root_reports_service_alive() {
    let (status, json) = send(app_with(vec![], false), root_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "message": "API Deteksi Kucing Aktif!" }));
}

#[tokio::test]
async fn root_is_unaffected_by_previous_requests() {
    let app = app_with(vec![detection(0, 0.9)], false);
    let body = multipart_body("file", "kucing.png", "image/png", &png_bytes(64, 48));
    let (status, _) = send(app.clone(), detect_request(body)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(app, root_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "API Deteksi Kucing Aktif!");
}

#[tokio::test]
async fn detect_returns_labels_and_annotated_jpeg() {
    let app = app_with(vec![detection(1, 0.87654), detection(2, 1.0)], false);
    let body = multipart_body("file", "kucing.png", "image/png", &png_bytes(64, 48));

    let (status, json) = send(app, detect_request(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["hasil_teks"],
        serde_json::json!([
            { "jenis": "persian", "akurasi": "87.65%" },
            { "jenis": "sphynx", "akurasi": "100.00%" }
        ])
    );

    let jpeg = BASE64_STANDARD
        .decode(json["gambar_hasil"].as_str().unwrap())
        .unwrap();
    let img = image::load_from_memory_with_format(&jpeg, image::ImageFormat::Jpeg).unwrap();
    assert_eq!((img.width(), img.height()), (64, 48));
}

#[tokio::test]
async fn detect_without_boxes_keeps_image_size() {
    let app = app_with(vec![], false);
    let body = multipart_body("file", "kosong.png", "image/png", &png_bytes(33, 17));

    let (status, json) = send(app, detect_request(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hasil_teks"], serde_json::json!([]));

    let jpeg = BASE64_STANDARD
        .decode(json["gambar_hasil"].as_str().unwrap())
        .unwrap();
    let img = image::load_from_memory(&jpeg).unwrap();
    assert_eq!((img.width(), img.height()), (33, 17));
}

#[tokio::test]
async fn non_image_upload_is_a_client_error() {
    let app = app_with(vec![detection(0, 0.5)], false);
    let body = multipart_body("file", "catatan.txt", "text/plain", b"ini bukan gambar kucing");

    let (status, json) = send(app, detect_request(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().contains("Imagen inválida"));
}

#[tokio::test]
async fn missing_file_field_is_unprocessable() {
    let app = app_with(vec![], false);
    let body = multipart_body("foto", "kucing.png", "image/png", &png_bytes(8, 8));

    let (status, json) = send(app, detect_request(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].as_str().unwrap().contains("file"));
}

#[tokio::test]
async fn inference_failure_is_a_server_error() {
    let app = app_with(vec![], true);
    let body = multipart_body("file", "kucing.png", "image/png", &png_bytes(8, 8));

    let (status, json) = send(app, detect_request(body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json.get("hasil_teks").is_none());
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = app_from(service_with(vec![], false, 1024));
    let payload = vec![0u8; 200 * 1024];
    let body = multipart_body("file", "besar.png", "image/png", &payload);

    let (status, _) = send(app, detect_request(body)).await;
    assert!(status.is_client_error(), "status inesperado: {}", status);
}

#[tokio::test]
async fn identical_requests_yield_identical_results() {
    let app = app_with(vec![detection(0, 0.42), detection(1, 0.33)], false);
    let png = png_bytes(40, 40);

    let (_, first) = send(
        app.clone(),
        detect_request(multipart_body("file", "a.png", "image/png", &png)),
    )
    .await;
    let (_, second) = send(
        app,
        detect_request(multipart_body("file", "a.png", "image/png", &png)),
    )
    .await;

    assert_eq!(first["hasil_teks"], second["hasil_teks"]);
    assert_eq!(first["gambar_hasil"], second["gambar_hasil"]);
}

#[tokio::test]
async fn cors_allows_any_origin_with_credentials() {
    let app = app_with(vec![], false);
    let req = Request::builder()
        .uri("/")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    let headers = resp.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(headers.get("access-control-allow-credentials").unwrap(), "true");
}

#[tokio::test]
async fn non_multipart_body_is_unprocessable_json() {
    let app = app_with(vec![], false);
    let req = Request::builder()
        .method("POST")
        .uri("/detect")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"file": "kucing.png"}"#))
        .unwrap();

    let (status, json) = send(app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].is_string(), "cuerpo inesperado: {}", json);
}

#[tokio::test]
async fn truncated_multipart_body_is_unprocessable_json() {
    let app = app_with(vec![], false);
    let mut body = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"kucing.png\"\r\nContent-Type: image/png\r\n\r\n",
        BOUNDARY
    )
    .into_bytes();
    body.extend_from_slice(&png_bytes(8, 8));

    let (status, json) = send(app, detect_request(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].is_string(), "cuerpo inesperado: {}", json);
}

#[tokio::test]
async fn garbage_multipart_framing_is_unprocessable_json() {
    let app = app_with(vec![], false);
    let body = b"--garbage-without-proper-framing".to_vec();

    let (status, json) = send(app, detect_request(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].is_string(), "cuerpo inesperado: {}", json);
}

#[tokio::test]
async fn unbounded_upload_limit_does_not_overflow() {
    let app = app_from(service_with(vec![detection(0, 0.6)], false, usize::MAX));

    let (status, _) = send(app.clone(), root_request()).await;
    assert_eq!(status, StatusCode::OK);

    let body = multipart_body("file", "kucing.png", "image/png", &png_bytes(16, 16));
    let (status, json) = send(app, detect_request(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hasil_teks"][0]["akurasi"], "60.00%");
}
