use clap::{Parser, Subcommand};
use std::path::PathBuf;
use talebook::collection::{Library, Shelf};
use talebook::{config, output, paths, router, scene, story};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "talebook")]
#[command(about = "Manage branching narrative stories")]
#[command(long_about = "\
Manage branching narrative stories

Stories are directories of JSON kept under a data directory:

  <data dir>/
  ├── config.toml                  # Optional settings (see gen-config)
  ├── collections/                 # Finished stories
  │   └── <story>/
  │       ├── info.json            # Title, author, thumbnail, entry point
  │       ├── scenes/              # One JSON file per scene
  │       └── resources/           # Images, audio, video
  └── workspace/                   # Stories being edited

Paths inside the JSON files are relative to the story directory, so a story
can be moved or published by copying its folder.

Run 'talebook gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Data directory (defaults to the platform data folder)
    #[arg(long, env = paths::DATA_DIR_ENV, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the stories on a shelf
    List {
        /// collections or workspace
        #[arg(default_value = "workspace")]
        shelf: Shelf,
    },
    /// Create a new story in the workspace
    New,
    /// Show a story and its scenes
    Show {
        /// Story directory, or its name in the workspace or collections
        story: String,
    },
    /// Copy a workspace story into collections
    Publish {
        /// Story directory, or its name in the workspace
        story: String,
    },
    /// Resolve an application route to its view
    Route {
        /// Path such as /play/<dir>
        path: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Route { path } => {
            let view = router::app_router().resolve(&path);
            output::print_lines(output::format_route(&path, view.as_ref()));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        command => {
            let library = open_library(cli.data_dir)?;
            run_library_command(&library, command)?;
        }
    }

    Ok(())
}

fn open_library(data_dir: Option<PathBuf>) -> Result<Library, Box<dyn std::error::Error>> {
    let root = data_dir
        .or_else(paths::default_data_dir)
        .ok_or("cannot determine data directory; pass --data-dir")?;
    let config = config::load_config(&root)?;
    tracing::debug!(root = %root.display(), "opened library");
    Ok(Library::new(root, config))
}

fn run_library_command(
    library: &Library,
    command: Command,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::List { shelf } => {
            output::print_story_list(shelf, &library.list(shelf));
        }
        Command::New => {
            let info = library.create_story()?;
            output::print_lines(output::format_story_written("Created", &info));
        }
        Command::Show { story: name } => {
            let dir = library
                .locate(&name)
                .ok_or_else(|| format!("story not found: {name}"))?;
            let extra = story::load_extra_story_info(&dir)?;
            let scenes = scene::list_scenes(&dir);
            output::print_story_detail(&extra, &scenes);
        }
        Command::Publish { story: name } => {
            let dir = library
                .locate(&name)
                .ok_or_else(|| format!("story not found: {name}"))?;
            let info = library.publish(&dir)?;
            output::print_lines(output::format_story_written("Published", &info));
        }
        Command::Route { .. } | Command::GenConfig => {}
    }
    Ok(())
}
