//! Scene files: loading, saving and listing.
//!
//! A scene lives at `<story>/scenes/<id>.json`. Its identity is that path
//! relative to the `scenes/` folder (`forest/clearing.json` for a nested
//! scene). On disk, `media` and every navigation destination are relative to
//! the story base directory; [`SceneInfo`] holds them as absolute paths.
//!
//! Destinations have three shapes, and only the last one is rewritten:
//!
//! | On disk               | In memory                        |
//! |-----------------------|----------------------------------|
//! | `null`                | `None`                           |
//! | `"<end>"`             | `Some(Destination::End)`         |
//! | `"scenes/end.json"`   | `Some(Destination::Scene(abs))`  |

use crate::paths::{self, SCENES_DIR};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Reserved destination marking the end of the story.
pub const END_SENTINEL: &str = "<end>";

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid scene name: {0:?}")]
    InvalidName(String),
    #[error("Scene already exists: {0}")]
    AlreadyExists(PathBuf),
}

// ============================================================================
// On-disk form
// ============================================================================

/// A scene file exactly as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneRecord {
    pub center_text: Option<String>,
    pub narration_text: Option<String>,
    pub background_color: Option<String>,
    pub media: Option<String>,
    pub actions: ActionsRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsRecord {
    pub single_choice: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub multiple_choice: Vec<ChoiceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    pub action: String,
    #[serde(default)]
    pub destination: Option<String>,
}

// ============================================================================
// In-memory form
// ============================================================================

/// Where a choice leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The story ends here.
    End,
    /// Absolute path of the next scene file.
    Scene(PathBuf),
}

impl Destination {
    /// Resolve a stored destination. `null`, `""` and the end sentinel are
    /// never joined to the base directory.
    pub fn resolve(base: &Path, raw: Option<&str>) -> Option<Self> {
        match raw {
            None | Some("") => None,
            Some(END_SENTINEL) => Some(Self::End),
            Some(rel) => Some(Self::Scene(paths::to_absolute(base, rel))),
        }
    }

    /// Inverse of [`Destination::resolve`].
    pub fn store(dest: Option<&Self>, base: &Path) -> Option<String> {
        dest.map(|d| match d {
            Self::End => END_SENTINEL.to_string(),
            Self::Scene(abs) => paths::to_relative(base, abs),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleChoice {
    /// Label shown to the player.
    pub action: String,
    pub destination: Option<Destination>,
}

/// Navigation out of a scene: a single "continue" target, a list of labelled
/// choices, both, or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneActions {
    pub single_choice: Option<Destination>,
    pub multiple_choice: Vec<MultipleChoice>,
}

impl SceneActions {
    /// Every destination in declaration order, single choice first.
    pub fn destinations(&self) -> impl Iterator<Item = &Destination> {
        self.single_choice
            .iter()
            .chain(self.multiple_choice.iter().filter_map(|c| c.destination.as_ref()))
    }

    /// True when no choice leads to another scene.
    pub fn is_terminal(&self) -> bool {
        self.destinations().all(|d| *d == Destination::End)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneInfo {
    pub center_text: Option<String>,
    pub narration_text: Option<String>,
    pub background_color: Option<String>,
    /// Absolute path of the scene's image, audio or video asset.
    pub media: Option<PathBuf>,
    pub actions: SceneActions,
}

impl SceneInfo {
    pub fn from_record(base: &Path, record: SceneRecord) -> Self {
        let actions = SceneActions {
            single_choice: Destination::resolve(base, record.actions.single_choice.as_deref()),
            multiple_choice: record
                .actions
                .multiple_choice
                .into_iter()
                .map(|c| MultipleChoice {
                    destination: Destination::resolve(base, c.destination.as_deref()),
                    action: c.action,
                })
                .collect(),
        };
        Self {
            center_text: record.center_text,
            narration_text: record.narration_text,
            background_color: record.background_color,
            media: record.media.map(|m| paths::to_absolute(base, &m)),
            actions,
        }
    }

    pub fn to_record(&self, base: &Path) -> SceneRecord {
        SceneRecord {
            center_text: self.center_text.clone(),
            narration_text: self.narration_text.clone(),
            background_color: self.background_color.clone(),
            media: self.media.as_deref().map(|m| paths::to_relative(base, m)),
            actions: ActionsRecord {
                single_choice: Destination::store(self.actions.single_choice.as_ref(), base),
                multiple_choice: self
                    .actions
                    .multiple_choice
                    .iter()
                    .map(|c| ChoiceRecord {
                        action: c.action.clone(),
                        destination: Destination::store(c.destination.as_ref(), base),
                    })
                    .collect(),
            },
        }
    }
}

/// A scene plus the fields editor views list it by.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraSceneInfo {
    /// File stem, e.g. `clearing`.
    pub name: String,
    /// Path relative to `scenes/`, e.g. `forest/clearing.json`.
    pub id: String,
    /// Absolute path of the scene file.
    pub path: PathBuf,
    pub scene: SceneInfo,
}

// ============================================================================
// Operations
// ============================================================================

/// Read and resolve the scene at `scene_path`.
///
/// `scene_path` may be absolute or relative to `story_dir`.
pub fn load_scene_info(story_dir: &Path, scene_path: &Path) -> Result<SceneInfo, SceneError> {
    let content = fs::read_to_string(story_dir.join(scene_path))?;
    let record: SceneRecord = serde_json::from_str(&content)?;
    Ok(SceneInfo::from_record(story_dir, record))
}

/// Overwrite the scene file with `scene` in base-relative form.
pub fn write_scene_info(
    story_dir: &Path,
    scene_path: &Path,
    scene: &SceneInfo,
) -> Result<(), SceneError> {
    let target = story_dir.join(scene_path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&scene.to_record(story_dir))?;
    fs::write(&target, json)?;
    info!(scene = %target.display(), "wrote scene");
    Ok(())
}

/// Create an empty scene `scenes/<name>.json` and return its absolute path.
pub fn create_scene(story_dir: &Path, name: &str) -> Result<PathBuf, SceneError> {
    let stem = name.strip_suffix(".json").unwrap_or(name);
    if !paths::is_plain_segment(stem) {
        return Err(SceneError::InvalidName(name.to_string()));
    }
    let target = story_dir.join(SCENES_DIR).join(format!("{stem}.json"));
    if target.exists() {
        return Err(SceneError::AlreadyExists(target));
    }
    write_scene_info(story_dir, &target, &SceneInfo::default())?;
    Ok(target)
}

/// All `*.json` files under `<story>/scenes/`, sorted by path.
///
/// A missing `scenes/` folder yields an empty list.
pub fn scene_files(story_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(story_dir.join(SCENES_DIR))
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|e| e.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .collect()
}

/// Every readable scene in the story. Files that fail to load are skipped.
pub fn list_scenes(story_dir: &Path) -> Vec<ExtraSceneInfo> {
    let scenes_dir = story_dir.join(SCENES_DIR);
    scene_files(story_dir)
        .into_iter()
        .filter_map(|path| match load_scene_info(story_dir, &path) {
            Ok(scene) => Some(ExtraSceneInfo {
                name: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                id: paths::to_relative(&scenes_dir, &path),
                path,
                scene,
            }),
            Err(err) => {
                debug!(scene = %path.display(), %err, "skipping unreadable scene");
                None
            }
        })
        .collect()
}
