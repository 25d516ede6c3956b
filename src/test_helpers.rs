//! Shared fixture builders for unit tests.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let dir = write_story(tmp.path(), "tale", "A Tale");
//! let info = load_story_info(&dir).unwrap();
//! assert_eq!(read_record(&dir).entry_point, "scenes/start.json");
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::story::{StoryInfo, StoryRecord};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `json` as `<dir>/info.json`, creating `dir`.
pub fn write_descriptor(dir: &Path, json: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("info.json"), json).unwrap();
}

/// Write a complete story at `<parent>/<name>`: descriptor, a thumbnail and
/// a start scene that ends the story.
pub fn write_story(parent: &Path, name: &str, title: &str) -> PathBuf {
    let dir = parent.join(name);
    write_descriptor(
        &dir,
        &format!(
            r#"{{
    "title": "{title}",
    "description": "fixture",
    "author": "Tester",
    "creation_date": "2024-05-01T10:00:00Z",
    "thumbnail": "resources/thumbnail.png",
    "entry_point": "scenes/start.json",
    "base_dir": ""
}}"#
        ),
    );
    fs::create_dir_all(dir.join("resources")).unwrap();
    fs::write(dir.join("resources/thumbnail.png"), "png").unwrap();
    fs::create_dir_all(dir.join("scenes")).unwrap();
    fs::write(
        dir.join("scenes/start.json"),
        r#"{"center_text": "Hello", "actions": {"single_choice": "<end>"}}"#,
    )
    .unwrap();
    dir
}

// =========================================================================
// Lookups
// =========================================================================

/// Parse `<dir>/info.json` without resolving anything.
pub fn read_record(dir: &Path) -> StoryRecord {
    let content = fs::read_to_string(dir.join("info.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Titles in listing order.
pub fn story_titles(stories: &[StoryInfo]) -> Vec<&str> {
    stories.iter().map(|s| s.title.as_str()).collect()
}
