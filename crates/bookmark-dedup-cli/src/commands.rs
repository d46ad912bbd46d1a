use bookmark_dedup_core::storage::models::MatchOptions;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookmark-dedup")]
#[command(about = "Find and remove duplicate bookmarks", long_about = None)]
pub struct Cli {
    /// Bookmark tree JSON file (overrides `bookmarks_path` from Config.toml)
    #[arg(long, global = true)]
    pub bookmarks: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List duplicate groups
    Scan {
        #[command(flatten)]
        matching: MatchArgs,
        /// Print the findDuplicates response as JSON
        #[arg(long)]
        json: bool,
    },
    /// List folders usable with --folder
    Folders,
    /// Remove bookmarks by id
    Remove {
        #[arg(required = true)]
        ids: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Review duplicate groups interactively and delete the selected copies
    Review {
        #[command(flatten)]
        matching: MatchArgs,
    },
    /// Answer newline-delimited JSON messages on stdin
    Serve,
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Clone, Args)]
pub struct MatchArgs {
    /// Match on title
    #[arg(long)]
    pub match_title: bool,
    /// Match on URL without query string and fragment
    #[arg(long)]
    pub match_base_url: bool,
    /// Only consider bookmarks inside this folder id
    #[arg(long)]
    pub folder: Option<String>,
}

impl From<MatchArgs> for MatchOptions {
    fn from(args: MatchArgs) -> Self {
        MatchOptions {
            match_title: args.match_title,
            match_base_url: args.match_base_url,
            folder_id: args.folder,
        }
    }
}
