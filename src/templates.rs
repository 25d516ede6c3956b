//! Default payloads for newly scaffolded stories.
//!
//! A new story starts with a descriptor, two scenes wired start → end, and a
//! placeholder thumbnail. The JSON below is what lands on disk before the
//! title, author and creation date are stamped in.

use crate::scene::SceneRecord;
use crate::story::StoryRecord;

/// Relative path of the thumbnail copied into every new story.
pub const THUMBNAIL_PATH: &str = "resources/thumbnail.png";
/// Relative path of the opening scene.
pub const START_SCENE_PATH: &str = "scenes/start.json";
/// Relative path of the closing scene.
pub const END_SCENE_PATH: &str = "scenes/end.json";

/// Bundled placeholder thumbnail (64×64 PNG).
pub const DEFAULT_THUMBNAIL: &[u8] = include_bytes!("../assets/default_thumbnail.png");

pub const STORY_TEMPLATE: &str = r##"{
    "title": "Untitled Story",
    "description": "",
    "author": "",
    "creation_date": "1970-01-01T00:00:00Z",
    "thumbnail": "resources/thumbnail.png",
    "entry_point": "scenes/start.json",
    "base_dir": ""
}"##;

pub const START_SCENE_TEMPLATE: &str = r##"{
    "center_text": "Once upon a time...",
    "narration_text": null,
    "background_color": "#000000",
    "media": null,
    "actions": {
        "single_choice": "scenes/end.json"
    }
}"##;

pub const END_SCENE_TEMPLATE: &str = r##"{
    "center_text": "The End",
    "narration_text": null,
    "background_color": "#000000",
    "media": null,
    "actions": {
        "single_choice": "<end>"
    }
}"##;

pub fn story_record() -> StoryRecord {
    serde_json::from_str(STORY_TEMPLATE).expect("story template must parse")
}

/// The two seed scenes as `(relative path, record)` pairs.
pub fn seed_scenes() -> [(&'static str, SceneRecord); 2] {
    [
        (START_SCENE_PATH, parse_scene(START_SCENE_TEMPLATE)),
        (END_SCENE_PATH, parse_scene(END_SCENE_TEMPLATE)),
    ]
}

fn parse_scene(json: &str) -> SceneRecord {
    serde_json::from_str(json).expect("scene template must parse")
}
