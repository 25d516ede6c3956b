//! Path conventions and the relative ⇄ absolute conversion.
//!
//! Story files on disk never contain absolute paths. Every asset and scene
//! reference is stored relative to the story's base directory, always with
//! forward slashes, so a story directory can be copied, published or synced
//! between machines without rewriting its JSON:
//!
//! ```text
//! <story>/
//! ├── info.json                 # "thumbnail": "resources/thumbnail.png"
//! ├── scenes/
//! │   ├── start.json            # "single_choice": "scenes/end.json"
//! │   └── end.json
//! └── resources/
//!     └── thumbnail.png
//! ```
//!
//! In memory the same references are absolute [`PathBuf`]s. [`to_absolute`]
//! and [`to_relative`] convert between the two and are exact inverses for any
//! path under the base directory: `to_relative(b, &to_absolute(b, r)) ==
//! sanitize(r)`.

use std::path::{Component, Path, PathBuf};

/// Story descriptor file name inside a story directory.
pub const STORY_FILE: &str = "info.json";
/// Folder holding per-scene JSON files.
pub const SCENES_DIR: &str = "scenes";
/// Folder holding media assets.
pub const RESOURCES_DIR: &str = "resources";
/// Application folder name under the platform data directory.
pub const APP_DIR_NAME: &str = "talebook";
/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TALEBOOK_DATA_DIR";

/// Normalize a stored relative path.
///
/// - backslashes become forward slashes
/// - empty and `.` segments are dropped (`./scenes//a.json` → `scenes/a.json`)
/// - `..` segments are kept verbatim; resolution is the filesystem's job
pub fn sanitize(rel: &str) -> String {
    rel.replace('\\', "/")
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolve a stored relative path against `base`.
///
/// Values that are already absolute are returned unchanged, so a file edited
/// by hand with an absolute path still loads.
pub fn to_absolute(base: &Path, rel: &str) -> PathBuf {
    let candidate = Path::new(rel);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    let mut out = base.to_path_buf();
    for seg in sanitize(rel).split('/').filter(|s| !s.is_empty()) {
        out.push(seg);
    }
    out
}

/// Express `abs` relative to `base` using forward slashes.
///
/// Paths outside `base` cannot be made relative and pass through as their
/// lossy string form.
pub fn to_relative(base: &Path, abs: &Path) -> String {
    match abs.strip_prefix(base) {
        Ok(rest) => rest
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => abs.to_string_lossy().into_owned(),
    }
}

/// Whether `name` is usable as a single path segment (no separators, not
/// `.`/`..`, not empty).
pub fn is_plain_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

/// Resolve the application data directory from the environment.
///
/// First match wins: `TALEBOOK_DATA_DIR`, `$APPDATA/talebook`,
/// `$XDG_DATA_HOME/talebook`, `$HOME/.local/share/talebook`.
pub fn default_data_dir() -> Option<PathBuf> {
    data_dir_from(|key| std::env::var(key).ok())
}

fn data_dir_from(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
    if let Some(dir) = var(DATA_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    if let Some(appdata) = var("APPDATA") {
        return Some(Path::new(&appdata).join(APP_DIR_NAME));
    }
    if let Some(xdg) = var("XDG_DATA_HOME") {
        return Some(Path::new(&xdg).join(APP_DIR_NAME));
    }
    var("HOME").map(|home| {
        Path::new(&home)
            .join(".local")
            .join("share")
            .join(APP_DIR_NAME)
    })
}
