//! Shared fixtures for the play flow tests.

use hauntcam_core::generative::ModelConfig;
use hauntcam_core::model::{GameMode, NewGame};
use hauntcam_core::repository::GameRepository;
use hauntcam_scenario::ScenarioStore;
use hauntcam_scenario::domain::chapter::{Chapter, ItemEntry, SuspectEntry};
use hauntcam_test_support::{
    FixedClock, InMemoryBlobStore, InMemoryGameRepository, InMemoryPhotoRepository,
    ScriptedGenerativeClient, image_response, text_response,
};
use uuid::Uuid;

use crate::application::PlayServices;

/// Two chapters (`cup`, then `clock`), hint rows with both sentinels, and a
/// suspect row for chapter 1.
pub(crate) fn scenario() -> ScenarioStore {
    let item = |key: &str, label: Option<&str>, message: &str| ItemEntry {
        key: key.to_owned(),
        label: label.map(str::to_owned),
        message: message.to_owned(),
    };
    let chapter = |number: u32, item: &str| Chapter {
        number,
        title: format!("Chapter {number}"),
        story: String::new(),
        story_html: String::new(),
        hints: Vec::new(),
        answer_keyword: "answer".to_owned(),
        ghost_prompt_template: String::new(),
        item: Some(item.to_owned()),
    };
    ScenarioStore::from_parts(
        vec![chapter(1, "cup"), chapter(2, "clock")],
        vec![
            item("cup", Some("teacup"), "The tea is still warm."),
            item("clock", None, "The hands stopped at midnight."),
            item("none", None, "The ghost sobs quietly."),
            item("final", None, "Everything points to one person."),
        ],
        vec![SuspectEntry {
            chapter: 1,
            correct_suspect: "Butler".to_owned(),
            scoring_criteria: "The tea was poured after midnight.".to_owned(),
        }],
        String::new(),
    )
    .unwrap()
}

pub(crate) struct Harness {
    pub(crate) clock: FixedClock,
    pub(crate) games: InMemoryGameRepository,
    pub(crate) photos: InMemoryPhotoRepository,
    pub(crate) blobs: InMemoryBlobStore,
    pub(crate) client: ScriptedGenerativeClient,
    pub(crate) scenario: ScenarioStore,
    pub(crate) models: ModelConfig,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self {
            clock: FixedClock::standard(),
            games: InMemoryGameRepository::new(),
            photos: InMemoryPhotoRepository::new(),
            blobs: InMemoryBlobStore::new(),
            client: ScriptedGenerativeClient::new(Vec::new()),
            scenario: scenario(),
            models: ModelConfig::default(),
        }
    }

    pub(crate) fn services(&self) -> PlayServices<'_> {
        PlayServices {
            clock: &self.clock,
            games: &self.games,
            photos: &self.photos,
            blobs: &self.blobs,
            generative: &self.client,
            scenario: &self.scenario,
            models: &self.models,
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

    pub(crate) async fn game_with(&self, cleared: &[&str]) -> Uuid {
        let game_id = self.game(GameMode::ItemCatalog).await;
        for item in cleared {
            self.games
                .add_cleared_item(game_id, item, self.clock.0)
                .await
                .unwrap();
        }
        game_id
    }

    pub(crate) fn script_detection(&self, item: Option<&str>, confidence: &str) {
        let item = item.map_or("null".to_owned(), |item| format!("\"{item}\""));
        self.client.push(Ok(text_response(&format!(
            r#"{{"detected_item": {item}, "confidence": "{confidence}", "explanation": "x"}}"#
        ))));
    }

    pub(crate) fn script_overlay(&self) {
        self.client
            .push(Ok(image_response(&[0x89, 0x50], "image/png", Some("Boo."))));
    }

    pub(crate) fn script_text(&self, text: &str) {
        self.client.push(Ok(text_response(text)));
    }
}
