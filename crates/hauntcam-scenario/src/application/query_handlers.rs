//! Query handlers for scenario content.
//!
//! These return read-only view DTOs over the [`ScenarioStore`].

use hauntcam_core::error::DomainError;
use serde::Serialize;

use crate::domain::chapter::Chapter;
use crate::store::ScenarioStore;

/// Read-only view of a chapter.
#[derive(Debug, Serialize)]
pub struct ChapterView {
    /// Chapter number.
    pub chapter: u32,
    /// Title.
    pub title: String,
    /// Narrative text (Markdown).
    pub story: String,
    /// Narrative text rendered to HTML.
    pub story_html: String,
    /// Hints in unlock order.
    pub hints: Vec<String>,
    /// Keyword that completes the chapter.
    pub answer_keyword: String,
    /// Ghost behaviour template.
    pub ghost_prompt_template: String,
}

impl From<&Chapter> for ChapterView {
    fn from(chapter: &Chapter) -> Self {
        Self {
            chapter: chapter.number,
            title: chapter.title.clone(),
            story: chapter.story.clone(),
            story_html: chapter.story_html.clone(),
            hints: chapter.hints.clone(),
            answer_keyword: chapter.answer_keyword.clone(),
            ghost_prompt_template: chapter.ghost_prompt_template.clone(),
        }
    }
}

/// Lists every chapter in ascending order.
#[must_use]
pub fn list_chapters(store: &ScenarioStore) -> Vec<ChapterView> {
    store.chapters().map(ChapterView::from).collect()
}

/// Retrieves one chapter.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the chapter does not exist.
pub fn get_chapter(store: &ScenarioStore, number: u32) -> Result<ChapterView, DomainError> {
    store.chapter(number).map(ChapterView::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ScenarioSources;

    fn store() -> ScenarioStore {
        let sources = ScenarioSources {
            chapters: vec![
                (
                    "02.md".to_owned(),
                    "---\nchapter: 2\ntitle: Second\nanswer_keyword: b\n---\nTwo.\n".to_owned(),
                ),
                (
                    "01.md".to_owned(),
                    "---\nchapter: 1\ntitle: First\nanswer_keyword: a\n---\nOne.\n".to_owned(),
                ),
            ],
            items: "[]".to_owned(),
            suspects: "[]".to_owned(),
        };
        ScenarioStore::from_sources(&sources).unwrap()
    }

    #[test]
    fn test_list_chapters_is_sorted_by_number() {
        // Act
        let views = list_chapters(&store());

        // Assert
        let numbers: Vec<u32> = views.iter().map(|v| v.chapter).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(views[0].title, "First");
    }

    #[test]
    fn test_get_chapter_returns_not_found_for_unknown_number() {
        // Act
        let result = get_chapter(&store(), 9);

        // Assert
        match result.unwrap_err() {
            DomainError::NotFound { entity, id } => {
                assert_eq!(entity, "chapter");
                assert_eq!(id, "9");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_view_serializes_chapter_field_name() {
        let view = get_chapter(&store(), 1).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["chapter"], 1);
        assert_eq!(json["story"], "One.");
    }
}
