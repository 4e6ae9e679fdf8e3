//! The read-only scenario store.
//!
//! Built once at start-up and shared by reference (`Arc<ScenarioStore>`) with
//! every component that needs scenario content; there is no global cache.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use hauntcam_core::error::DomainError;
use hauntcam_core::model::GameMode;
use tracing::info;

use crate::domain::catalog::ItemCatalog;
use crate::domain::chapter::{ALL_CLEARED_KEY, Chapter, ItemEntry, NO_DETECTION_KEY, SuspectEntry};
use crate::loader::{self, ScenarioSources};

/// Chapters, item hints, and suspects keyed for lookup.
#[derive(Debug, Clone)]
pub struct ScenarioStore {
    chapters: BTreeMap<u32, Chapter>,
    items: BTreeMap<String, ItemEntry>,
    suspects: BTreeMap<u32, SuspectEntry>,
    version_hash: String,
}

impl ScenarioStore {
    /// Loads and validates the scenario below `dir`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` on I/O failure and
    /// `DomainError::Validation` on malformed or inconsistent content.
    pub fn load(dir: &Path) -> Result<Self, DomainError> {
        let sources = loader::read_sources(dir)?;
        let store = Self::from_sources(&sources)?;
        info!(
            chapters = store.chapters.len(),
            items = store.items.len(),
            version = %store.version_hash,
            "scenario loaded"
        );
        Ok(store)
    }

    /// Parses and validates in-memory sources.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` on malformed or inconsistent content.
    pub fn from_sources(sources: &ScenarioSources) -> Result<Self, DomainError> {
        let chapters = sources
            .chapters
            .iter()
            .map(|(name, contents)| loader::parse_chapter(name, contents))
            .collect::<Result<Vec<_>, _>>()?;
        let items = loader::parse_items(&sources.items)?;
        let suspects = loader::parse_suspects(&sources.suspects)?;
        Self::from_parts(chapters, items, suspects, loader::version_hash(sources))
    }

    /// Assembles a store from already-parsed parts.
    ///
    /// Chapter numbers must be unique and contiguous from 1.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` on duplicate or gapped chapter
    /// numbers, duplicate item keys, or duplicate suspect rows.
    pub fn from_parts(
        chapters: Vec<Chapter>,
        items: Vec<ItemEntry>,
        suspects: Vec<SuspectEntry>,
        version_hash: String,
    ) -> Result<Self, DomainError> {
        let mut chapter_map = BTreeMap::new();
        for chapter in chapters {
            let number = chapter.number;
            if chapter_map.insert(number, chapter).is_some() {
                return Err(DomainError::Validation(format!(
                    "duplicate chapter number {number}"
                )));
            }
        }
        for (expected, number) in (1..).zip(chapter_map.keys()) {
            if *number != expected {
                return Err(DomainError::Validation(format!(
                    "chapter numbers must be contiguous from 1; found {number} where {expected} was expected"
                )));
            }
        }

        let mut item_map = BTreeMap::new();
        for item in items {
            let key = item.key.trim().to_owned();
            if item_map.insert(key.clone(), item).is_some() {
                return Err(DomainError::Validation(format!("duplicate item key {key}")));
            }
        }

        let mut suspect_map = BTreeMap::new();
        for suspect in suspects {
            let chapter = suspect.chapter;
            if suspect_map.insert(chapter, suspect).is_some() {
                return Err(DomainError::Validation(format!(
                    "duplicate suspect row for chapter {chapter}"
                )));
            }
        }

        Ok(Self {
            chapters: chapter_map,
            items: item_map,
            suspects: suspect_map,
            version_hash,
        })
    }

    /// Content version (SHA-256 of the sources).
    #[must_use]
    pub fn version_hash(&self) -> &str {
        &self.version_hash
    }

    /// Chapters in ascending order.
    pub fn chapters(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.values()
    }

    /// Looks up a chapter.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` when the chapter does not exist.
    pub fn chapter(&self, number: u32) -> Result<&Chapter, DomainError> {
        self.chapters
            .get(&number)
            .ok_or_else(|| DomainError::not_found("chapter", number))
    }

    /// Whether a chapter follows `number`.
    #[must_use]
    pub fn has_next_chapter(&self, number: u32) -> bool {
        number
            .checked_add(1)
            .is_some_and(|next| self.chapters.contains_key(&next))
    }

    /// Hint message for an item key (or sentinel key).
    #[must_use]
    pub fn hint_message(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(|entry| entry.message.as_str())
    }

    /// Hint message used when nothing was detected.
    #[must_use]
    pub fn no_detection_message(&self) -> &str {
        self.hint_message(NO_DETECTION_KEY).unwrap_or_default()
    }

    /// Hint message used once every item is cleared.
    #[must_use]
    pub fn all_cleared_message(&self) -> Option<&str> {
        self.hint_message(ALL_CLEARED_KEY)
    }

    /// Display label for an item key; the key itself when unlabelled.
    #[must_use]
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.items
            .get(key)
            .and_then(|entry| entry.label.as_deref())
            .unwrap_or(key)
    }

    /// The item catalog for a game mode.
    ///
    /// `ItemCatalog` mode uses every row of the hint table except the two
    /// sentinels. `ChapterLinear` mode uses the item of each chapter, and the
    /// last chapter's item is the one that ends the game.
    #[must_use]
    pub fn catalog(&self, mode: GameMode) -> ItemCatalog {
        match mode {
            GameMode::ItemCatalog => {
                let items: BTreeSet<String> = self
                    .items
                    .keys()
                    .filter(|key| key.as_str() != NO_DETECTION_KEY && key.as_str() != ALL_CLEARED_KEY)
                    .cloned()
                    .collect();
                ItemCatalog::new(items, None)
            }
            GameMode::ChapterLinear => {
                let items: BTreeSet<String> = self
                    .chapters
                    .values()
                    .filter_map(|chapter| chapter.item.clone())
                    .collect();
                let final_item = self
                    .chapters
                    .values()
                    .next_back()
                    .and_then(|chapter| chapter.item.clone());
                ItemCatalog::new(items, final_item)
            }
        }
    }

    /// Catalog items a game of `mode` may find while on `chapter`.
    ///
    /// `ChapterLinear` games only reach the items of chapters up to and
    /// including the current one.
    #[must_use]
    pub fn reachable_items(&self, mode: GameMode, chapter: u32) -> BTreeSet<String> {
        match mode {
            GameMode::ItemCatalog => self.catalog(mode).items().clone(),
            GameMode::ChapterLinear => self
                .chapters
                .range(..=chapter)
                .filter_map(|(_, entry)| entry.item.clone())
                .collect(),
        }
    }

    /// Canonical solution for `chapter`, falling back to chapter 1's row.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` when neither row exists.
    pub fn suspect(&self, chapter: u32) -> Result<&SuspectEntry, DomainError> {
        self.suspects
            .get(&chapter)
            .or_else(|| self.suspects.get(&1))
            .ok_or_else(|| DomainError::not_found("suspect data for chapter", chapter))
    }
}
