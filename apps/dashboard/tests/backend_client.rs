use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{Multipart, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Url;
use serde_json::{json, Value};

use dashboard::api_client::{ApiError, BackendClient, Collaborator, Tone, Upload};

async fn recommend(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let skill = params.get("skill").cloned().unwrap_or_default();
    if skill == "nothing" {
        return Json(json!({ "status": "ok" }));
    }
    Json(json!({
        "jobs": [
            {
                "id": 42,
                "title": format!("{skill} Developer"),
                "company": "Acme",
                "location": "Berlin",
                "platform": "LinkedIn",
                "link": "https://jobs.example/42"
            },
            {
                "title": format!("Senior {skill} Engineer"),
                "company": "Globex",
                "link": "https://jobs.example/senior"
            },
            "not a job"
        ]
    }))
}

async fn generate(Json(body): Json<Value>) -> Json<Value> {
    let topic = body["topic"].as_str().unwrap_or_default();
    let tone = body["tone"].as_str().unwrap_or_default();
    match topic {
        "quota" => Json(json!({ "content": "Error: 429 quota exceeded" })),
        "blank" => Json(json!({ "content": "   " })),
        _ => Json(json!({ "content": format!("[{tone}] Thoughts on {topic}") })),
    }
}

async fn publish(Json(body): Json<Value>) -> Response {
    if body["text"] == "duplicate" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "LinkedIn Rejected: Duplicate Post" })),
        )
            .into_response();
    }
    Json(json!({ "status": "success", "id": "urn:li:share:1" })).into_response()
}

async fn profile_pdf(mut multipart: Multipart) -> Json<Value> {
    let mut received = json!({});
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        received = json!({
            "field": name,
            "file_name": file_name,
            "content_type": content_type,
            "size": bytes.len(),
            "score": 75,
            "skills": ["Rust", "Tokio"],
        });
    }
    Json(received)
}

async fn scrape() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "selenium crashed").into_response()
}

async fn spawn_backend() -> SocketAddr {
    let app = Router::new()
        .route("/api/jobs/recommend", get(recommend))
        .route("/api/generate/post", post(generate))
        .route("/api/publish/linkedin", post(publish))
        .route("/api/analyze/profile-pdf", post(profile_pdf))
        .route("/api/analyze/scrape-url", post(scrape));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn client() -> BackendClient {
    let addr = spawn_backend().await;
    let base = Url::parse(&format!("http://{addr}")).unwrap();
    BackendClient::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_recommend_jobs_parses_listings() {
    let client = client().await;
    let jobs = client.recommend_jobs("Rust").await.unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id, "42");
    assert_eq!(jobs[0].title, "Rust Developer");
    assert_eq!(jobs[0].location, "Berlin");
    assert!(!jobs[1].id.is_empty());
    assert_eq!(jobs[1].location, "Remote");
    assert_eq!(jobs[1].platform, "Job Board");
}

#[tokio::test]
async fn test_recommend_jobs_without_jobs_field_is_empty() {
    let client = client().await;
    let jobs = client.recommend_jobs("nothing").await.unwrap();
    assert!(jobs.is_empty());
}

#[tokio::test]
async fn test_generate_post_returns_content() {
    let client = client().await;
    let text = client
        .generate_post("async Rust", Tone::Educational)
        .await
        .unwrap();
    assert_eq!(text, "[Educational] Thoughts on async Rust");
}

#[tokio::test]
async fn test_generate_post_rejects_in_band_errors_and_blank_content() {
    let client = client().await;
    assert!(matches!(
        client.generate_post("quota", Tone::Professional).await,
        Err(ApiError::Shape(_))
    ));
    assert!(matches!(
        client.generate_post("blank", Tone::Professional).await,
        Err(ApiError::Shape(_))
    ));
}

#[tokio::test]
async fn test_publish_error_carries_detail() {
    let client = client().await;
    client.publish("tok", "fresh post").await.unwrap();

    let err = client.publish("tok", "duplicate").await.unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 400, .. }));
    assert_eq!(err.detail(), Some("LinkedIn Rejected: Duplicate Post"));
}

#[tokio::test]
async fn test_profile_pdf_is_sent_as_multipart_file() {
    let client = client().await;
    let payload = client
        .analyze_profile_pdf(Upload::new("resume.pdf", b"%PDF-1.7 fake".to_vec()))
        .await
        .unwrap();

    assert_eq!(payload["field"], "file");
    assert_eq!(payload["file_name"], "resume.pdf");
    assert_eq!(payload["content_type"], "application/pdf");
    assert_eq!(payload["size"], 13);
    assert_eq!(payload["score"], 75);
}

#[tokio::test]
async fn test_non_json_error_body_has_no_detail() {
    let client = client().await;
    let err = client
        .scrape_url("https://www.linkedin.com/in/someone")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 500, detail: None }));
}
