//! Shelves of stories under the data directory.
//!
//! ```text
//! <data dir>/
//! ├── config.toml          # optional, see [`crate::config`]
//! ├── collections/         # finished stories, opened by the player
//! │   └── <story>/
//! └── workspace/           # stories being edited
//!     └── <story>/
//! ```
//!
//! Scanning a shelf is deliberately forgiving: anything that does not load as
//! a story (stray files, half-written directories, malformed descriptors) is
//! left out of the result instead of failing the whole listing.

use crate::config::AppConfig;
use crate::story::{self, StoryError, StoryInfo};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Which of the two story folders to look in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shelf {
    Collections,
    Workspace,
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shelf::Collections => f.write_str("collections"),
            Shelf::Workspace => f.write_str("workspace"),
        }
    }
}

impl FromStr for Shelf {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collections" | "library" => Ok(Shelf::Collections),
            "workspace" => Ok(Shelf::Workspace),
            other => Err(format!(
                "unknown shelf {other:?} (expected collections or workspace)"
            )),
        }
    }
}

/// The data directory together with the config that names its shelves.
#[derive(Debug, Clone)]
pub struct Library {
    pub root: PathBuf,
    pub config: AppConfig,
}

impl Library {
    pub fn new(root: impl Into<PathBuf>, config: AppConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn shelf_dir(&self, shelf: Shelf) -> PathBuf {
        match shelf {
            Shelf::Collections => self.root.join(&self.config.library.collections_dir),
            Shelf::Workspace => self.root.join(&self.config.library.workspace_dir),
        }
    }

    pub fn list(&self, shelf: Shelf) -> Vec<StoryInfo> {
        scan_stories(&self.shelf_dir(shelf))
    }

    /// Scaffold a new story in the workspace.
    pub fn create_story(&self) -> Result<StoryInfo, StoryError> {
        story::create_new_story(&self.shelf_dir(Shelf::Workspace), &self.config.story)
    }

    /// Copy a workspace story into collections.
    pub fn publish(&self, story_dir: &Path) -> Result<StoryInfo, StoryError> {
        publish_story(story_dir, &self.shelf_dir(Shelf::Collections))
    }

    /// Resolve a story argument: an existing path is used as-is, anything
    /// else is looked up by directory name in the workspace, then in
    /// collections.
    pub fn locate(&self, story: &str) -> Option<PathBuf> {
        let direct = PathBuf::from(story);
        if direct.join(crate::paths::STORY_FILE).is_file() {
            return Some(direct);
        }
        [Shelf::Workspace, Shelf::Collections]
            .into_iter()
            .map(|shelf| self.shelf_dir(shelf).join(story))
            .find(|dir| dir.join(crate::paths::STORY_FILE).is_file())
    }
}

/// Load every story directly under `dir`, ordered by directory name.
///
/// Entries that fail to load are skipped. A missing `dir` yields nothing.
pub fn scan_stories(dir: &Path) -> Vec<StoryInfo> {
    let mut entries: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(read) => read.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(err) => {
            debug!(shelf = %dir.display(), %err, "shelf not readable");
            return Vec::new();
        }
    };
    entries.sort();

    entries
        .into_iter()
        .filter(|p| p.is_dir())
        .filter_map(|p| match story::load_story_info(&p) {
            Ok(info) => Some(info),
            Err(err) => {
                debug!(entry = %p.display(), %err, "skipping entry");
                None
            }
        })
        .collect()
}

/// Copy the story at `story_dir` into `collections_dir` under the same
/// directory name and return the published copy.
///
/// Stored paths are relative, so the copy needs no rewriting.
pub fn publish_story(story_dir: &Path, collections_dir: &Path) -> Result<StoryInfo, StoryError> {
    // Refuse anything that is not a loadable story before copying.
    let source = story::load_story_info(story_dir)?;
    let target = collections_dir.join(source.dir_name());
    if target.exists() {
        return Err(StoryError::AlreadyExists(target));
    }

    if let Err(err) = copy_tree(story_dir, &target) {
        story::remove_partial(&target);
        return Err(err);
    }

    info!(from = %story_dir.display(), to = %target.display(), "published story");
    story::load_story_info(&target)
}

fn copy_tree(from: &Path, to: &Path) -> Result<(), StoryError> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(std::io::Error::from)?;
        let Ok(rel) = entry.path().strip_prefix(from) else {
            continue;
        };
        let dest = to.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn skips_malformed_entry() {
        let tmp = TempDir::new().unwrap();
        write_story(tmp.path(), "good", "Good Story");
        write_descriptor(&tmp.path().join("bad"), "{ this is not json");

        let stories = scan_stories(tmp.path());
        assert_eq!(story_titles(&stories), vec!["Good Story"]);
    }

    #[test]
    fn skips_files_and_bare_directories() {
        let tmp = TempDir::new().unwrap();
        write_story(tmp.path(), "good", "Good Story");
        fs::write(tmp.path().join("notes.txt"), "hello").unwrap();
        fs::create_dir_all(tmp.path().join("empty")).unwrap();

        assert_eq!(scan_stories(tmp.path()).len(), 1);
    }

    #[test]
    fn ordered_by_directory_name() {
        let tmp = TempDir::new().unwrap();
        write_story(tmp.path(), "b", "Second");
        write_story(tmp.path(), "a", "First");
        write_story(tmp.path(), "c", "Third");

        assert_eq!(
            story_titles(&scan_stories(tmp.path())),
            vec!["First", "Second", "Third"]
        );
    }

    #[test]
    fn missing_shelf_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_stories(&tmp.path().join("nope")).is_empty());
    }

    #[test]
    fn shelves_follow_config() {
        let mut config = AppConfig::default();
        config.library.workspace_dir = "drafts".into();
        let library = Library::new("/data", config);

        assert_eq!(library.shelf_dir(Shelf::Workspace), Path::new("/data/drafts"));
        assert_eq!(
            library.shelf_dir(Shelf::Collections),
            Path::new("/data/collections")
        );
    }

    #[test]
    fn create_lands_in_workspace() {
        let tmp = TempDir::new().unwrap();
        let library = Library::new(tmp.path(), AppConfig::default());

        let created = library.create_story().unwrap();

        assert!(created.base_dir.starts_with(tmp.path().join("workspace")));
        assert_eq!(library.list(Shelf::Workspace), vec![created]);
        assert!(library.list(Shelf::Collections).is_empty());
    }

    #[test]
    fn publish_copies_tree_and_resolves_in_new_home() {
        let tmp = TempDir::new().unwrap();
        let library = Library::new(tmp.path(), AppConfig::default());
        let draft = library.create_story().unwrap();

        let published = library.publish(&draft.base_dir).unwrap();

        assert_eq!(published.dir_name(), draft.dir_name());
        assert!(published.base_dir.starts_with(tmp.path().join("collections")));
        assert!(published.entry_point.is_file());
        assert!(published.thumbnail.as_ref().unwrap().is_file());
        assert_eq!(published.title, draft.title);
        assert_eq!(library.list(Shelf::Collections).len(), 1);
    }

    #[test]
    fn publish_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let library = Library::new(tmp.path(), AppConfig::default());
        let draft = library.create_story().unwrap();

        library.publish(&draft.base_dir).unwrap();
        assert!(matches!(
            library.publish(&draft.base_dir),
            Err(StoryError::AlreadyExists(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn failed_publish_leaves_nothing_behind() {
        let tmp = TempDir::new().unwrap();
        let library = Library::new(tmp.path(), AppConfig::default());
        let draft = library.create_story().unwrap();
        let dangling = draft.base_dir.join("resources").join("missing.ogg");
        std::os::unix::fs::symlink(tmp.path().join("nowhere.ogg"), &dangling).unwrap();

        assert!(matches!(
            library.publish(&draft.base_dir),
            Err(StoryError::Io(_))
        ));
        assert!(
            !library
                .shelf_dir(Shelf::Collections)
                .join(draft.dir_name())
                .exists()
        );
        assert!(library.list(Shelf::Collections).is_empty());

        fs::remove_file(&dangling).unwrap();
        let published = library.publish(&draft.base_dir).unwrap();
        assert_eq!(library.list(Shelf::Collections), vec![published]);
    }

    #[test]
    fn publish_rejects_non_story() {
        let tmp = TempDir::new().unwrap();
        let library = Library::new(tmp.path(), AppConfig::default());
        assert!(matches!(
            library.publish(tmp.path()),
            Err(StoryError::MissingDescriptor(_))
        ));
    }

    #[test]
    fn locate_by_name_or_path() {
        let tmp = TempDir::new().unwrap();
        let library = Library::new(tmp.path(), AppConfig::default());
        let draft = library.create_story().unwrap();
        let name = draft.dir_name();

        assert_eq!(library.locate(&name), Some(draft.base_dir.clone()));
        assert_eq!(
            library.locate(&draft.base_dir.to_string_lossy()),
            Some(draft.base_dir.clone())
        );
        assert_eq!(library.locate("missing"), None);
    }

    #[test]
    fn shelf_names_parse() {
        assert_eq!("workspace".parse::<Shelf>(), Ok(Shelf::Workspace));
        assert_eq!("collections".parse::<Shelf>(), Ok(Shelf::Collections));
        assert_eq!("library".parse::<Shelf>(), Ok(Shelf::Collections));
        assert!("attic".parse::<Shelf>().is_err());
    }
}
