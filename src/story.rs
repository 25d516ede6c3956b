//! Story descriptors: loading, saving and scaffolding.
//!
//! A story is a directory holding `info.json`, a `scenes/` folder and a
//! `resources/` folder. The descriptor stores `thumbnail` and `entry_point`
//! relative to the story directory and leaves `base_dir` blank; loading fills
//! `base_dir` with the directory the file was read from and makes the other
//! two absolute. Writing reverses both steps, so load → write reproduces the
//! file it was read from.

use crate::config::StoryDefaults;
use crate::paths::{self, RESOURCES_DIR, SCENES_DIR, STORY_FILE};
use crate::scene::{self, SceneError};
use crate::templates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("Not a story directory (no info.json): {0}")]
    MissingDescriptor(PathBuf),
    #[error("Story already exists: {0}")]
    AlreadyExists(PathBuf),
}

/// `info.json` exactly as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(with = "creation_date")]
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub entry_point: String,
    #[serde(default)]
    pub base_dir: String,
}

/// A resolved story descriptor. Identity is `base_dir`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryInfo {
    pub title: String,
    pub description: String,
    pub author: String,
    pub creation_date: DateTime<Utc>,
    /// Absolute path of the cover image.
    pub thumbnail: Option<PathBuf>,
    /// Absolute path of the first scene.
    pub entry_point: PathBuf,
    /// The story directory itself.
    pub base_dir: PathBuf,
}

impl StoryInfo {
    pub fn from_record(dir: &Path, record: StoryRecord) -> Self {
        Self {
            title: record.title,
            description: record.description,
            author: record.author,
            creation_date: record.creation_date,
            thumbnail: record.thumbnail.map(|t| paths::to_absolute(dir, &t)),
            entry_point: paths::to_absolute(dir, &record.entry_point),
            base_dir: dir.to_path_buf(),
        }
    }

    /// The on-disk form. `base_dir` is always written blank.
    pub fn to_record(&self) -> StoryRecord {
        StoryRecord {
            title: self.title.clone(),
            description: self.description.clone(),
            author: self.author.clone(),
            creation_date: self.creation_date,
            thumbnail: self
                .thumbnail
                .as_deref()
                .map(|t| paths::to_relative(&self.base_dir, t)),
            entry_point: paths::to_relative(&self.base_dir, &self.entry_point),
            base_dir: String::new(),
        }
    }

    /// Directory name, which doubles as the story identifier.
    pub fn dir_name(&self) -> String {
        self.base_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A story plus the counts editor views show next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraStoryInfo {
    pub info: StoryInfo,
    pub scene_count: usize,
    pub resource_count: usize,
}

/// Read and resolve `<dir>/info.json`.
pub fn load_story_info(dir: &Path) -> Result<StoryInfo, StoryError> {
    let descriptor = dir.join(STORY_FILE);
    if !descriptor.is_file() {
        return Err(StoryError::MissingDescriptor(dir.to_path_buf()));
    }
    let content = fs::read_to_string(&descriptor)?;
    let record: StoryRecord = serde_json::from_str(&content)?;
    Ok(StoryInfo::from_record(dir, record))
}

pub fn load_extra_story_info(dir: &Path) -> Result<ExtraStoryInfo, StoryError> {
    let info = load_story_info(dir)?;
    Ok(ExtraStoryInfo {
        scene_count: scene::scene_files(dir).len(),
        resource_count: resource_files(dir).len(),
        info,
    })
}

/// Overwrite `<base_dir>/info.json` with `info` in relative form.
pub fn write_story_info(info: &StoryInfo) -> Result<(), StoryError> {
    let json = serde_json::to_string_pretty(&info.to_record())?;
    let target = info.base_dir.join(STORY_FILE);
    fs::write(&target, json)?;
    info!(story = %target.display(), "wrote story descriptor");
    Ok(())
}

/// Scaffold a new story under `parent` and return it resolved.
///
/// The directory is named with a fresh random identifier and receives the
/// templated descriptor, the placeholder thumbnail and the two seed scenes.
pub fn create_new_story(parent: &Path, defaults: &StoryDefaults) -> Result<StoryInfo, StoryError> {
    let id = Uuid::new_v4().simple().to_string();
    let dir = parent.join(&id);
    if dir.exists() {
        return Err(StoryError::AlreadyExists(dir));
    }
    if let Err(err) = scaffold_story(&dir, defaults) {
        remove_partial(&dir);
        return Err(err);
    }

    info!(story = %dir.display(), "created story");
    load_story_info(&dir)
}

fn scaffold_story(dir: &Path, defaults: &StoryDefaults) -> Result<(), StoryError> {
    fs::create_dir_all(dir.join(SCENES_DIR))?;
    fs::create_dir_all(dir.join(RESOURCES_DIR))?;

    let mut record = templates::story_record();
    record.title = defaults.default_title.clone();
    record.author = defaults.default_author.clone();
    record.creation_date = Utc::now();
    fs::write(dir.join(STORY_FILE), serde_json::to_string_pretty(&record)?)?;

    fs::write(
        paths::to_absolute(dir, templates::THUMBNAIL_PATH),
        templates::DEFAULT_THUMBNAIL,
    )?;

    for (rel, scene) in templates::seed_scenes() {
        fs::write(
            paths::to_absolute(dir, rel),
            serde_json::to_string_pretty(&scene)?,
        )?;
    }
    Ok(())
}

/// Delete a story directory left half-written by a failed operation.
pub(crate) fn remove_partial(dir: &Path) {
    match fs::remove_dir_all(dir) {
        Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
            warn!(story = %dir.display(), %err, "could not remove partial story");
        }
        _ => {}
    }
}

/// Every file under `<story>/resources/`, sorted by path.
pub fn resource_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir.join(RESOURCES_DIR))
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

/// `creation_date` is written as RFC 3339. Reading also accepts an integer
/// millisecond timestamp.
mod creation_date {
    use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Millis(i64),
    }

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(D::Error::custom),
            Raw::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {ms}"))),
        }
    }
}
