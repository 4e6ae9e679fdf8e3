//! Chapters, item hint entries, and suspect entries.

use serde::{Deserialize, Serialize};

/// Item key whose hint message is used when nothing was detected.
pub const NO_DETECTION_KEY: &str = "none";

/// Item key whose hint message is used once every item is cleared.
pub const ALL_CLEARED_KEY: &str = "final";

/// One narrative chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    /// Chapter number, starting at 1.
    pub number: u32,
    /// Title.
    pub title: String,
    /// Narrative text as authored (Markdown).
    pub story: String,
    /// Narrative text rendered to HTML.
    pub story_html: String,
    /// Hints in unlock order.
    pub hints: Vec<String>,
    /// Keyword that completes the chapter.
    pub answer_keyword: String,
    /// Gesture/behaviour template for the ghost in this chapter.
    pub ghost_prompt_template: String,
    /// Item tied to this chapter in chapter-linear games.
    pub item: Option<String>,
}

impl Chapter {
    /// Hint text at `index`, if in range.
    #[must_use]
    pub fn hint(&self, index: u32) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.hints.get(i))
            .map(String::as_str)
    }
}

/// One row of the item hint table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    /// Item key, or one of the sentinel keys.
    pub key: String,
    /// Human-readable item name; defaults to the key.
    #[serde(default)]
    pub label: Option<String>,
    /// Message the ghost conveys when this item is found.
    pub message: String,
}

/// Canonical solution for a chapter's accusation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspectEntry {
    /// Chapter the solution belongs to.
    pub chapter: u32,
    /// Name of the culprit.
    pub correct_suspect: String,
    /// What a convincing line of reasoning must cover.
    pub scoring_criteria: String,
}

impl SuspectEntry {
    /// The solution text handed to the judge.
    #[must_use]
    pub fn solution_text(&self) -> String {
        format!(
            "Culprit: {}\nReasoning criteria: {}",
            self.correct_suspect, self.scoring_criteria
        )
    }
}
