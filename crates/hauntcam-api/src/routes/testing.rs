//! Shared fixtures for the route tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use hauntcam_core::generative::ModelConfig;
use hauntcam_core::model::{GameMode, GamePatch, GameStatus, NewGame};
use hauntcam_core::repository::GameRepository;
use hauntcam_scenario::ScenarioStore;
use hauntcam_scenario::loader::ScenarioSources;
use hauntcam_test_support::{
    FixedClock, InMemoryBlobStore, InMemoryGameRepository, InMemoryPhotoRepository,
    ScriptedGenerativeClient, image_response, text_response,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::state::AppState;

pub(crate) fn scenario() -> ScenarioStore {
    let sources = ScenarioSources {
        chapters: vec![
            (
                "01.md".to_owned(),
                "---\nchapter: 1\ntitle: The Tea Room\nhints:\n  - Something you drink from.\nanswer_keyword: cup\nitem: cup\n---\nA *cold* draft.\n".to_owned(),
            ),
            (
                "02.md".to_owned(),
                "---\nchapter: 2\ntitle: The Hall\nanswer_keyword: clock\nitem: clock\n---\nTicking.\n".to_owned(),
            ),
        ],
        items: "- key: cup\n  label: teacup\n  message: The tea is still warm.\n- key: clock\n  message: The hands stopped at midnight.\n- key: none\n  message: The ghost sobs quietly.\n- key: final\n  message: Everything points to one person.\n".to_owned(),
        suspects: "- chapter: 1\n  correct_suspect: Butler\n  scoring_criteria: The tea was poured after midnight.\n".to_owned(),
    };
    ScenarioStore::from_sources(&sources).unwrap()
}

pub(crate) struct TestApp {
    pub(crate) clock: Arc<FixedClock>,
    pub(crate) games: Arc<InMemoryGameRepository>,
    pub(crate) photos: Arc<InMemoryPhotoRepository>,
    pub(crate) blobs: Arc<InMemoryBlobStore>,
    pub(crate) client: Arc<ScriptedGenerativeClient>,
    pub(crate) scenario: Arc<ScenarioStore>,
}

impl TestApp {
    pub(crate) fn new() -> Self {
        Self {
            clock: Arc::new(FixedClock::standard()),
            games: Arc::new(InMemoryGameRepository::new()),
            photos: Arc::new(InMemoryPhotoRepository::new()),
            blobs: Arc::new(InMemoryBlobStore::new()),
            client: Arc::new(ScriptedGenerativeClient::new(Vec::new())),
            scenario: Arc::new(scenario()),
        }
    }

    pub(crate) fn state(&self) -> AppState {
        AppState {
            clock: self.clock.clone(),
            games: self.games.clone(),
            photos: self.photos.clone(),
            blobs: self.blobs.clone(),
            generative: self.client.clone(),
            scenario: self.scenario.clone(),
            models: Arc::new(ModelConfig::default()),
            default_mode: GameMode::ItemCatalog,
        }
    }

    pub(crate) async fn game(&self, mode: GameMode) -> Uuid {
        self.games
            .create(
                NewGame {
                    player_name: "Aki".to_owned(),
                    mode,
                    persona: None,
                },
                self.clock.0,
            )
            .await
            .unwrap()
            .id
    }

    pub(crate) async fn set_status(&self, game_id: Uuid, status: GameStatus) {
        let patch = GamePatch {
            status: Some(status),
            ..GamePatch::default()
        };
        self.games.update(game_id, &patch, self.clock.0).await.unwrap();
    }

    pub(crate) fn script_detection(&self, item: &str, confidence: &str) {
        self.client.push(Ok(text_response(&format!(
            r#"{{"detected_item": "{item}", "confidence": "{confidence}", "explanation": "x"}}"#
        ))));
    }

    pub(crate) fn script_overlay(&self) {
        self.client
            .push(Ok(image_response(&[0x89, 0x50], "image/png", Some("Boo."))));
    }

    pub(crate) fn script_image(&self) {
        self.client
            .push(Ok(image_response(&[0x89, 0x50], "image/png", None)));
    }

    pub(crate) fn script_text(&self, text: &str) {
        self.client.push(Ok(text_response(text)));
    }
}

pub(crate) async fn read_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
    (status, json)
}

pub(crate) async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    read_json(app, request).await
}

/// A one-field multipart body and its boundary.
pub(crate) fn multipart_body(field: &str, content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "hauntcam-test-boundary".to_owned();
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"photo.jpg\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (boundary, body)
}
