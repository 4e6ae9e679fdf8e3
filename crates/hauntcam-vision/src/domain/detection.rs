//! Item detection results.
//!
//! The classifier answers with [`RawDetection`] JSON. [`Detection::normalize`]
//! turns that into the result the game acts on: only `high`/`medium`
//! confidence counts, and only labels from the supplied candidate set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Classifier confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Clearly visible.
    High,
    /// Probably visible.
    Medium,
    /// Possibly visible.
    Low,
    /// Not visible.
    None,
}

impl Confidence {
    /// Whether this confidence level counts as a detection.
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::High | Self::Medium)
    }
}

/// Classifier output as decoded from structured JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDetection {
    /// Reported item key; `null`, empty, or `"null"` for nothing.
    #[serde(default)]
    pub detected_item: Option<String>,
    /// Reported confidence.
    pub confidence: Confidence,
    /// Reasoning.
    #[serde(default, alias = "rationale")]
    pub explanation: String,
}

/// A candidate item offered to the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Item key.
    pub key: String,
    /// Human-readable label shown to the classifier.
    pub label: String,
}

/// Normalized detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    /// Accepted item key, if any.
    pub detected_item: Option<String>,
    /// Confidence after normalization.
    pub confidence: Confidence,
    /// Classifier reasoning, or why the result was discarded.
    pub rationale: String,
}

impl Detection {
    /// "No detection" with the given reason.
    #[must_use]
    pub fn none(rationale: impl Into<String>) -> Self {
        Self {
            detected_item: None,
            confidence: Confidence::None,
            rationale: rationale.into(),
        }
    }

    /// Applies the acceptance policy to a raw result.
    ///
    /// A label outside `remaining` becomes "no detection" with confidence
    /// `none` regardless of the reported confidence. A `low`/`none` result
    /// keeps its confidence but carries no item.
    #[must_use]
    pub fn normalize(raw: RawDetection, remaining: &BTreeSet<String>) -> Self {
        let item = raw
            .detected_item
            .map(|item| item.trim().to_owned())
            .filter(|item| !item.is_empty() && !item.eq_ignore_ascii_case("null"));

        let Some(item) = item else {
            return Self {
                detected_item: None,
                confidence: raw.confidence,
                rationale: raw.explanation,
            };
        };
        if !remaining.contains(&item) {
            return Self::none(format!("discarded label outside candidates: {item}"));
        }
        Self {
            detected_item: raw.confidence.is_accepted().then_some(item),
            confidence: raw.confidence,
            rationale: raw.explanation,
        }
    }

    /// The accepted item key.
    #[must_use]
    pub fn accepted_item(&self) -> Option<&str> {
        self.detected_item.as_deref()
    }
}

/// Response schema for the classifier call.
#[must_use]
pub fn detection_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "detected_item": { "type": "STRING", "nullable": true },
            "confidence": {
                "type": "STRING",
                "enum": ["high", "medium", "low", "none"]
            },
            "explanation": { "type": "STRING" }
        },
        "required": ["detected_item", "confidence", "explanation"]
    })
}
