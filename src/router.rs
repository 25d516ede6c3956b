//! Application routes.
//!
//! Six paths map to the application's views:
//!
//! | Pattern         | View                      |
//! |-----------------|---------------------------|
//! | `/`             | [`View::Home`]            |
//! | `/library`      | [`View::Library`]         |
//! | `/play/*dir`    | [`View::Player`]          |
//! | `/workspace`    | [`View::Workspace`]       |
//! | `/editor/*dir`  | [`View::StoryEditor`]     |
//! | `/settings`     | [`View::Settings`]        |
//!
//! Patterns are made of literal segments, `:name` (one segment) and `*name`
//! (everything that is left, slashes included). Story directories travel in
//! a `*dir` capture, so `/play//home/me/stories/abc` carries the absolute
//! path `/home/me/stories/abc` with its slashes intact. Only `%`, `?` and `#`
//! are escaped (as `%25`, `%3F` and `%23`), since unescaped `?` and `#` start
//! a query string or fragment.
//!
//! [`Router`] is generic over what a route produces. Each route owns a loader
//! closure that runs only when its pattern matches and receives the captured
//! parameters as props; a front-end plugs in loaders that build its own
//! components, and [`app_router`] is the stock table producing [`View`]s.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Captured route parameters, by name.
pub type Params = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Rest(String),
}

/// A parsed route pattern such as `/editor/*dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    /// Parse a pattern. A `*name` segment must come last.
    pub fn parse(pattern: &str) -> Self {
        let segments: Vec<Segment> = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(name) = s.strip_prefix(':') {
                    Segment::Param(name.to_string())
                } else if let Some(name) = s.strip_prefix('*') {
                    Segment::Rest(name.to_string())
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        debug_assert!(
            segments
                .iter()
                .rev()
                .skip(1)
                .all(|s| !matches!(s, Segment::Rest(_))),
            "rest segment must be last in {pattern}"
        );
        Self { segments }
    }

    /// Match `path`, returning the captured parameters on success.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let mut rest = normalize(path);
        let mut params = Params::new();
        for segment in &self.segments {
            rest = rest.strip_prefix('/')?;
            match segment {
                Segment::Literal(lit) => {
                    let (head, tail) = split_segment(rest);
                    if head != lit {
                        return None;
                    }
                    rest = tail;
                }
                Segment::Param(name) => {
                    let (head, tail) = split_segment(rest);
                    if head.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), unescape(head));
                    rest = tail;
                }
                Segment::Rest(name) => {
                    if rest.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), unescape(rest));
                    rest = "";
                }
            }
        }
        rest.is_empty().then_some(params)
    }
}

/// Drop query string, fragment and trailing slashes. `/` becomes empty.
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].trim_end_matches('/')
}

/// Escape the characters [`normalize`] treats as delimiters.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '%' => out.push_str("%25"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            c => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape`]. Other `%` sequences are kept as written.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(i) = rest.find('%') {
        out.push_str(&rest[..i]);
        let tail = &rest[i..];
        let decoded = match tail.get(..3).map(str::to_ascii_uppercase).as_deref() {
            Some("%25") => Some('%'),
            Some("%3F") => Some('?'),
            Some("%23") => Some('#'),
            _ => None,
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[3..];
            }
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn split_segment(s: &str) -> (&str, &str) {
    match s.find('/') {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    }
}

type Loader<V> = Box<dyn Fn(&Params) -> V>;

/// Ordered route table. The first matching pattern wins.
pub struct Router<V> {
    routes: Vec<(Pattern, Loader<V>)>,
}

impl<V> Default for Router<V> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<V> Router<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, pattern: &str, load: impl Fn(&Params) -> V + 'static) -> Self {
        self.routes.push((Pattern::parse(pattern), Box::new(load)));
        self
    }

    /// Run the loader of the first route matching `path`.
    pub fn resolve(&self, path: &str) -> Option<V> {
        self.routes
            .iter()
            .find_map(|(pattern, load)| pattern.matches(path).map(|params| load(&params)))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// The application's views, with their props.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Landing page.
    Home,
    /// Finished stories (the collections shelf).
    Library,
    /// Plays the story in `dir`.
    Player { dir: PathBuf },
    /// Stories being edited (the workspace shelf).
    Workspace,
    /// Edits the story in `dir` and its scenes.
    StoryEditor { dir: PathBuf },
    Settings,
}

impl View {
    /// The path that routes back to this view.
    pub fn to_path(&self) -> String {
        match self {
            View::Home => "/".to_string(),
            View::Library => "/library".to_string(),
            View::Player { dir } => format!("/play/{}", escape(&dir.to_string_lossy())),
            View::Workspace => "/workspace".to_string(),
            View::StoryEditor { dir } => {
                format!("/editor/{}", escape(&dir.to_string_lossy()))
            }
            View::Settings => "/settings".to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Library => "Library",
            View::Player { .. } => "Player",
            View::Workspace => "Workspace",
            View::StoryEditor { .. } => "StoryEditor",
            View::Settings => "Settings",
        }
    }
}

fn dir_prop(params: &Params) -> PathBuf {
    params.get("dir").map(PathBuf::from).unwrap_or_default()
}

/// The stock route table.
pub fn app_router() -> Router<View> {
    Router::new()
        .route("/", |_| View::Home)
        .route("/library", |_| View::Library)
        .route("/play/*dir", |p| View::Player { dir: dir_prop(p) })
        .route("/workspace", |_| View::Workspace)
        .route("/editor/*dir", |p| View::StoryEditor { dir: dir_prop(p) })
        .route("/settings", |_| View::Settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn six_routes() {
        assert_eq!(app_router().len(), 6);
    }

    #[test]
    fn static_routes_resolve() {
        let router = app_router();
        assert_eq!(router.resolve("/"), Some(View::Home));
        assert_eq!(router.resolve("/library"), Some(View::Library));
        assert_eq!(router.resolve("/workspace"), Some(View::Workspace));
        assert_eq!(router.resolve("/settings"), Some(View::Settings));
    }

    #[test]
    fn dir_param_keeps_slashes() {
        let router = app_router();
        assert_eq!(
            router.resolve("/play//home/me/stories/abc"),
            Some(View::Player {
                dir: PathBuf::from("/home/me/stories/abc")
            })
        );
        assert_eq!(
            router.resolve("/editor/workspace/abc"),
            Some(View::StoryEditor {
                dir: PathBuf::from("workspace/abc")
            })
        );
    }

    #[test]
    fn dir_param_required() {
        let router = app_router();
        assert_eq!(router.resolve("/play"), None);
        assert_eq!(router.resolve("/play/"), None);
    }

    #[test]
    fn trailing_slash_query_and_fragment_ignored() {
        let router = app_router();
        assert_eq!(router.resolve("/library/"), Some(View::Library));
        assert_eq!(router.resolve("/settings?tab=2"), Some(View::Settings));
        assert_eq!(router.resolve("/workspace#top"), Some(View::Workspace));
        assert_eq!(router.resolve(""), Some(View::Home));
    }

    #[test]
    fn unknown_paths_do_not_resolve() {
        let router = app_router();
        assert_eq!(router.resolve("/nope"), None);
        assert_eq!(router.resolve("/library/extra"), None);
        assert_eq!(router.resolve("/librarian"), None);
    }

    #[test]
    fn to_path_round_trips() {
        let router = app_router();
        for view in [
            View::Home,
            View::Library,
            View::Player {
                dir: PathBuf::from("/data/collections/abc"),
            },
            View::Workspace,
            View::StoryEditor {
                dir: PathBuf::from("/data/workspace/def"),
            },
            View::Player {
                dir: PathBuf::from("/home/me/C# stories/abc"),
            },
            View::StoryEditor {
                dir: PathBuf::from("/data/what?/100%/def"),
            },
            View::Settings,
        ] {
            assert_eq!(router.resolve(&view.to_path()), Some(view.clone()), "{view:?}");
        }
    }

    #[test]
    fn delimiters_in_dir_are_escaped() {
        let view = View::Player {
            dir: PathBuf::from("/home/me/C# stories/abc"),
        };
        assert_eq!(view.to_path(), "/play//home/me/C%23 stories/abc");
        assert_eq!(
            app_router().resolve("/play//srv/50%25 done/x?autoplay=1"),
            Some(View::Player {
                dir: PathBuf::from("/srv/50% done/x")
            })
        );
    }

    #[test]
    fn unknown_escapes_kept_verbatim() {
        assert_eq!(unescape("a%20b%"), "a%20b%");
        assert_eq!(unescape("%3f%23"), "?#");
    }

    #[test]
    fn single_segment_param() {
        let pattern = Pattern::parse("/scene/:id/edit");
        let params = pattern.matches("/scene/forest/edit").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("forest"));
        assert!(pattern.matches("/scene//edit").is_none());
        assert!(pattern.matches("/scene/a/b/edit").is_none());
    }

    #[test]
    fn loaders_run_only_on_match() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let router = Router::new()
            .route("/a", |_| "a")
            .route("/b", move |_| {
                counter.set(counter.get() + 1);
                "b"
            });

        assert_eq!(router.resolve("/a"), Some("a"));
        assert_eq!(router.resolve("/c"), None);
        assert_eq!(calls.get(), 0);
        assert_eq!(router.resolve("/b"), Some("b"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn first_match_wins() {
        let router = Router::new()
            .route("/x/*rest", |p| p["rest"].clone())
            .route("/x/:one", |_| "never".to_string());
        assert_eq!(router.resolve("/x/y"), Some("y".to_string()));
    }
}
