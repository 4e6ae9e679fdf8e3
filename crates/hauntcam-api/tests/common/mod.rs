//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use hauntcam_core::clock::Clock;
use hauntcam_core::generative::ModelConfig;
use hauntcam_core::model::GameMode;
use hauntcam_core::repository::{GameRepository, PhotoRepository};
use hauntcam_scenario::ScenarioStore;
use hauntcam_scenario::loader::ScenarioSources;
use hauntcam_store::{PgGameRepository, PgPhotoRepository};
use hauntcam_test_support::{
    FixedClock, InMemoryBlobStore, InMemoryGameRepository, InMemoryPhotoRepository,
    ScriptedGenerativeClient, image_response, text_response,
};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use hauntcam_api::build_router;
use hauntcam_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Three chapters with one item each, sentinels, and one suspect row.
pub fn scenario() -> ScenarioStore {
    let chapter = |n: u32, keyword: &str, item: &str| {
        (
            format!("{n:02}.md"),
            format!(
                "---\nchapter: {n}\ntitle: Room {n}\nhints:\n  - Look closer.\nanswer_keyword: {keyword}\nitem: {item}\n---\nChapter {n}.\n"
            ),
        )
    };
    ScenarioStore::from_sources(&ScenarioSources {
        chapters: vec![
            chapter(1, "tea", "cup"),
            chapter(2, "time", "clock"),
            chapter(3, "cold", "air_conditioner"),
        ],
        items: "- key: cup\n  label: teacup\n  message: The tea is still warm.\n\
                - key: clock\n  message: The hands stopped at midnight.\n\
                - key: air_conditioner\n  label: air conditioner\n  message: It was set to freezing.\n\
                - key: none\n  message: The ghost sobs quietly.\n\
                - key: final\n  message: Everything points to one person.\n"
            .to_owned(),
        suspects: "- chapter: 1\n  correct_suspect: Butler\n  scoring_criteria: The tea was poured after midnight.\n"
            .to_owned(),
    })
    .unwrap()
}

/// Handles to the in-memory collaborators behind a test app.
pub struct Mocks {
    pub client: Arc<ScriptedGenerativeClient>,
    pub blobs: Arc<InMemoryBlobStore>,
}

impl Mocks {
    pub fn detection(&self, item: Option<&str>, confidence: &str) {
        let item = item.map_or("null".to_owned(), |item| format!("\"{item}\""));
        self.client.push(Ok(text_response(&format!(
            r#"{{"detected_item": {item}, "confidence": "{confidence}", "explanation": "seen"}}"#
        ))));
    }

    pub fn overlay(&self) {
        self.client
            .push(Ok(image_response(&[0x89, 0x50], "image/png", Some("Boo."))));
    }

    pub fn text(&self, text: &str) {
        self.client.push(Ok(text_response(text)));
    }
}

fn state_with(
    games: Arc<dyn GameRepository>,
    photos: Arc<dyn PhotoRepository>,
    mode: GameMode,
) -> (AppState, Mocks) {
    let client = Arc::new(ScriptedGenerativeClient::new(Vec::new()));
    let blobs = Arc::new(InMemoryBlobStore::new());
    let state = AppState {
        clock: fixed_clock(),
        games,
        photos,
        blobs: blobs.clone(),
        generative: client.clone(),
        scenario: Arc::new(scenario()),
        models: Arc::new(ModelConfig::default()),
        default_mode: mode,
    };
    (state, Mocks { client, blobs })
}

/// Builds the full app router over in-memory repositories.
pub fn build_test_app(mode: GameMode) -> (AppState, Mocks) {
    state_with(
        Arc::new(InMemoryGameRepository::new()),
        Arc::new(InMemoryPhotoRepository::new()),
        mode,
    )
}

/// Builds the full app router over the `PostgreSQL` repositories.
pub fn build_pg_test_app(pool: PgPool) -> (AppState, Mocks) {
    state_with(
        Arc::new(PgGameRepository::new(pool.clone())),
        Arc::new(PgPhotoRepository::new(pool)),
        GameMode::ItemCatalog,
    )
}

async fn into_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    state: &AppState,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    into_json(build_router(state.clone()), request).await
}

/// Send a GET request and return the response.
pub async fn get_json(state: &AppState, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    into_json(build_router(state.clone()), request).await
}

/// Upload a photo as the `file` field of a multipart body.
pub async fn post_photo(state: &AppState, uri: &str) -> (StatusCode, serde_json::Value) {
    let boundary = "hauntcam-it-boundary";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"shot.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(&[0xff, 0xd8, 0xff, 0xe0]);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    into_json(build_router(state.clone()), request).await
}
