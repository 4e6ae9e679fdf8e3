//! Parsing of scenario source files.
//!
//! A scenario directory contains:
//!
//! - `chapters/*.md` — one chapter per file, YAML front matter between `---`
//!   fences followed by the Markdown story;
//! - `items.yaml` — the item hint table, including the `none` and `final`
//!   sentinel rows;
//! - `suspects.yaml` — the canonical solution per chapter.

use std::fs;
use std::path::Path;

use hauntcam_core::error::DomainError;
use pulldown_cmark::{Parser, html};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::domain::chapter::{Chapter, ItemEntry, SuspectEntry};

/// Raw sources of a scenario, as read from disk.
#[derive(Debug, Clone, Default)]
pub struct ScenarioSources {
    /// `(file name, contents)` of every chapter file, sorted by file name.
    pub chapters: Vec<(String, String)>,
    /// Contents of `items.yaml`.
    pub items: String,
    /// Contents of `suspects.yaml`.
    pub suspects: String,
}

#[derive(Debug, Deserialize)]
struct ChapterFrontMatter {
    chapter: u32,
    title: String,
    #[serde(default)]
    hints: Vec<String>,
    answer_keyword: String,
    #[serde(default)]
    ghost_prompt_template: String,
    #[serde(default)]
    item: Option<String>,
}

/// Reads every scenario source below `dir`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if a file cannot be read.
pub fn read_sources(dir: &Path) -> Result<ScenarioSources, DomainError> {
    let io_err = |path: &Path, e: std::io::Error| {
        DomainError::Infrastructure(format!("failed to read {}: {e}", path.display()))
    };

    let chapters_dir = dir.join("chapters");
    let mut chapters = Vec::new();
    for entry in fs::read_dir(&chapters_dir).map_err(|e| io_err(&chapters_dir, e))? {
        let path = entry.map_err(|e| io_err(&chapters_dir, e))?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
            continue;
        }
        let contents = fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        chapters.push((name, contents));
    }
    chapters.sort_by(|a, b| a.0.cmp(&b.0));

    let items_path = dir.join("items.yaml");
    let items = fs::read_to_string(&items_path).map_err(|e| io_err(&items_path, e))?;
    let suspects_path = dir.join("suspects.yaml");
    let suspects = fs::read_to_string(&suspects_path).map_err(|e| io_err(&suspects_path, e))?;

    Ok(ScenarioSources {
        chapters,
        items,
        suspects,
    })
}

/// Splits a document into its YAML front matter and body.
fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let rest = source
        .strip_prefix("---\r\n")
        .or_else(|| source.strip_prefix("---\n"))?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parses one chapter file.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the front matter is missing or
/// malformed, or the answer keyword is blank.
pub fn parse_chapter(name: &str, source: &str) -> Result<Chapter, DomainError> {
    let (front, body) = split_front_matter(source).ok_or_else(|| {
        DomainError::Validation(format!("chapter file {name} has no front matter"))
    })?;
    let meta: ChapterFrontMatter = serde_yaml::from_str(front)
        .map_err(|e| DomainError::Validation(format!("chapter file {name}: {e}")))?;
    if meta.answer_keyword.trim().is_empty() {
        return Err(DomainError::Validation(format!(
            "chapter file {name} has an empty answer keyword"
        )));
    }

    let story = body.trim().to_owned();
    let mut story_html = String::new();
    html::push_html(&mut story_html, Parser::new(&story));

    Ok(Chapter {
        number: meta.chapter,
        title: meta.title,
        story,
        story_html,
        hints: meta.hints,
        answer_keyword: meta.answer_keyword,
        ghost_prompt_template: meta.ghost_prompt_template,
        item: meta.item.map(|item| item.trim().to_owned()),
    })
}

/// Parses the item hint table.
///
/// # Errors
///
/// Returns `DomainError::Validation` on malformed YAML.
pub fn parse_items(source: &str) -> Result<Vec<ItemEntry>, DomainError> {
    serde_yaml::from_str(source)
        .map_err(|e| DomainError::Validation(format!("items.yaml: {e}")))
}

/// Parses the suspect table.
///
/// # Errors
///
/// Returns `DomainError::Validation` on malformed YAML.
pub fn parse_suspects(source: &str) -> Result<Vec<SuspectEntry>, DomainError> {
    serde_yaml::from_str(source)
        .map_err(|e| DomainError::Validation(format!("suspects.yaml: {e}")))
}

/// SHA-256 over every source, used as the scenario content version.
#[must_use]
pub fn version_hash(sources: &ScenarioSources) -> String {
    let mut hasher = Sha256::new();
    for (name, contents) in &sources.chapters {
        hasher.update(name.as_bytes());
        hasher.update([0]);
        hasher.update(contents.as_bytes());
        hasher.update([0]);
    }
    hasher.update(sources.items.as_bytes());
    hasher.update([0]);
    hasher.update(sources.suspects.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAPTER_ONE: &str = "---\nchapter: 1\ntitle: The Tea Room\nhints:\n  - Something you drink from.\nanswer_keyword: Cup\nitem: cup\n---\n\nA *cold* draft.\n";

    #[test]
    fn test_parse_chapter_reads_front_matter_and_renders_story() {
        let chapter = parse_chapter("01.md", CHAPTER_ONE).unwrap();

        assert_eq!(chapter.number, 1);
        assert_eq!(chapter.title, "The Tea Room");
        assert_eq!(chapter.hints, vec!["Something you drink from.".to_owned()]);
        assert_eq!(chapter.answer_keyword, "Cup");
        assert_eq!(chapter.item.as_deref(), Some("cup"));
        assert_eq!(chapter.story, "A *cold* draft.");
        assert!(chapter.story_html.contains("<em>cold</em>"));
    }

    #[test]
    fn test_parse_chapter_without_front_matter_is_rejected() {
        let result = parse_chapter("bad.md", "# just markdown\n");
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_parse_chapter_with_blank_keyword_is_rejected() {
        let source = "---\nchapter: 2\ntitle: T\nanswer_keyword: '  '\n---\nbody\n";
        assert!(matches!(
            parse_chapter("02.md", source),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_items_defaults_label() {
        let items = parse_items("- key: cup\n  message: warm tea\n- key: none\n  message: sobbing\n")
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, None);
    }

    #[test]
    fn test_version_hash_changes_with_content() {
        let mut sources = ScenarioSources {
            chapters: vec![("01.md".to_owned(), CHAPTER_ONE.to_owned())],
            items: String::new(),
            suspects: String::new(),
        };
        let before = version_hash(&sources);
        sources.items.push_str("- key: cup\n  message: m\n");
        let after = version_hash(&sources);

        assert_eq!(before.len(), 64);
        assert_ne!(before, after);
    }
}
