//! CLI output formatting.
//!
//! Every entity is shown as a header line (positional index + title) followed
//! by indented context lines. Paths are displayed in their stored, relative
//! form, the way they appear in the JSON files.
//!
//! ## `list`
//!
//! ```text
//! Workspace (2 stories)
//! 001 The Lighthouse
//!     Author: Ada
//!     Created: 2024-05-01
//!     Source: 3f2a…/
//! ```
//!
//! ## `show`
//!
//! ```text
//! The Lighthouse
//!     Author: Ada
//!     Entry point: scenes/start.json
//!     2 scenes, 1 resources
//!
//! Scenes
//! 001 end (ending)
//!     Text: The End
//!     → (end)
//! 002 start (entry)
//!     Text: Once upon a time...
//!     → end.json
//! ```
//!
//! Each `format_*` function is pure and returns lines; `print_*` writes them
//! to stdout.

use crate::collection::Shelf;
use crate::paths::{self, SCENES_DIR};
use crate::router::View;
use crate::scene::{Destination, ExtraSceneInfo};
use crate::story::{ExtraStoryInfo, StoryInfo};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Render a destination relative to the story's `scenes/` folder.
fn destination_label(story_dir: &Path, dest: &Destination) -> String {
    match dest {
        Destination::End => "(end)".to_string(),
        Destination::Scene(abs) => paths::to_relative(&story_dir.join(SCENES_DIR), abs),
    }
}

// ============================================================================
// list
// ============================================================================

pub fn format_story_list(shelf: Shelf, stories: &[StoryInfo]) -> Vec<String> {
    let heading = match shelf {
        Shelf::Collections => "Collections",
        Shelf::Workspace => "Workspace",
    };
    let mut lines = vec![format!("{} ({} stories)", heading, stories.len())];
    for (i, story) in stories.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), story.title));
        if !story.author.is_empty() {
            lines.push(format!("    Author: {}", story.author));
        }
        lines.push(format!(
            "    Created: {}",
            story.creation_date.format("%Y-%m-%d")
        ));
        lines.push(format!("    Source: {}/", story.dir_name()));
    }
    lines
}

pub fn print_story_list(shelf: Shelf, stories: &[StoryInfo]) {
    for line in format_story_list(shelf, stories) {
        println!("{}", line);
    }
}

// ============================================================================
// show
// ============================================================================

pub fn format_story_detail(extra: &ExtraStoryInfo, scenes: &[ExtraSceneInfo]) -> Vec<String> {
    let info = &extra.info;
    let record = info.to_record();
    let mut lines = vec![info.title.clone()];

    if !info.description.trim().is_empty() {
        lines.push(format!("    {}", truncate(info.description.trim(), 60)));
    }
    if !info.author.is_empty() {
        lines.push(format!("    Author: {}", info.author));
    }
    lines.push(format!(
        "    Created: {}",
        info.creation_date.format("%Y-%m-%d %H:%M")
    ));
    lines.push(format!("    Entry point: {}", record.entry_point));
    if let Some(thumb) = &record.thumbnail {
        lines.push(format!("    Thumbnail: {}", thumb));
    }
    lines.push(format!(
        "    {} scenes, {} resources",
        extra.scene_count, extra.resource_count
    ));

    if scenes.is_empty() {
        return lines;
    }
    lines.push(String::new());
    lines.push("Scenes".to_string());
    for (i, scene) in scenes.iter().enumerate() {
        let mut header = format!("{} {}", format_index(i + 1), scene.name);
        if scene.path == info.entry_point {
            header.push_str(" (entry)");
        }
        if scene.scene.actions.is_terminal() {
            header.push_str(" (ending)");
        }
        lines.push(header);
        if scene.id != format!("{}.json", scene.name) {
            lines.push(format!("    Source: {}", scene.id));
        }
        if let Some(text) = &scene.scene.center_text {
            lines.push(format!("    Text: {}", truncate(text, 60)));
        }
        if let Some(dest) = &scene.scene.actions.single_choice {
            lines.push(format!("    → {}", destination_label(&info.base_dir, dest)));
        }
        for choice in &scene.scene.actions.multiple_choice {
            let target = choice
                .destination
                .as_ref()
                .map(|d| destination_label(&info.base_dir, d))
                .unwrap_or_else(|| "(none)".to_string());
            lines.push(format!("    \"{}\" → {}", choice.action, target));
        }
    }
    lines
}

pub fn print_story_detail(extra: &ExtraStoryInfo, scenes: &[ExtraSceneInfo]) {
    for line in format_story_detail(extra, scenes) {
        println!("{}", line);
    }
}

// ============================================================================
// new / publish
// ============================================================================

pub fn format_story_written(verb: &str, info: &StoryInfo) -> Vec<String> {
    vec![
        format!("{} {}", verb, info.title),
        format!("    Source: {}", info.base_dir.display()),
    ]
}

// ============================================================================
// route
// ============================================================================

pub fn format_route(path: &str, view: Option<&View>) -> Vec<String> {
    match view {
        None => vec![format!("{} → (no route)", path)],
        Some(view) => {
            let mut lines = vec![format!("{} → {}", path, view.name())];
            if let View::Player { dir } | View::StoryEditor { dir } = view {
                lines.push(format!("    dir: {}", dir.display()));
            }
            lines
        }
    }
}

pub fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}
