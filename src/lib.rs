//! # Talebook
//!
//! Storage, scaffolding and routing for branching narrative stories.
//!
//! A story is a directory of JSON: a descriptor, one file per scene, and a
//! folder of media. Finished stories sit on the *collections* shelf, stories
//! being written sit in the *workspace*:
//!
//! ```text
//! <data dir>/
//! ├── config.toml
//! ├── collections/
//! │   └── 3f2a9c…/
//! │       ├── info.json
//! │       ├── scenes/
//! │       │   ├── start.json
//! │       │   └── end.json
//! │       └── resources/
//! │           └── thumbnail.png
//! └── workspace/
//!     └── …
//! ```
//!
//! # Relative on disk, absolute in memory
//!
//! The one contract that matters across the crate: JSON files store asset and
//! scene references relative to the story directory, while [`story::StoryInfo`]
//! and [`scene::SceneInfo`] hold absolute paths. Loading rewrites relative to
//! absolute, writing rewrites back, and the two are exact inverses. Stories
//! can therefore be moved, published or synced as plain directories.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`paths`] | Path joining, sanitizing, relativizing; data directory lookup |
//! | [`templates`] | Default descriptor, seed scenes and thumbnail for new stories |
//! | [`story`] | Load, write and scaffold story descriptors |
//! | [`scene`] | Load, write, create and list scenes |
//! | [`collection`] | Shelves: scanning, publishing, locating stories |
//! | [`router`] | Route table mapping paths to views |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |

pub mod collection;
pub mod config;
pub mod output;
pub mod paths;
pub mod router;
pub mod scene;
pub mod story;
pub mod templates;

#[cfg(test)]
pub(crate) mod test_helpers;
