mod commands;
mod logging;
mod progress;
mod review;
mod serve;

use std::io::{self, Write};
use std::process;

use bookmark_dedup_core::analysis::deletion_plan::select_redundant;
use bookmark_dedup_core::analysis::review::{header_label, summary_line};
use bookmark_dedup_core::protocol::Response;
use bookmark_dedup_core::session::MemoryTabs;
use bookmark_dedup_core::storage::models::MatchOptions;
use bookmark_dedup_core::storage::JsonFileStore;
use bookmark_dedup_core::DedupEngine;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use tracing::{error, info};

type Engine = DedupEngine<JsonFileStore, MemoryTabs>;

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args = Cli::parse();
    let serving = matches!(args.command, Some(Commands::Serve));
    let _guard = logging::init_logger(serving);

    let mut config = match bookmark_dedup_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };
    if let Some(path) = args.bookmarks {
        config.bookmarks_path = path;
    }

    let store = JsonFileStore::new(&config.bookmarks_path);
    let mut engine = DedupEngine::new(config, store, MemoryTabs::new());

    match args.command {
        Some(Commands::Scan { matching, json }) => {
            if let Err(err) = run_scan(&engine, &matching.into(), json) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::Folders) => {
            if let Err(err) = run_folders(&engine) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::Remove { ids, yes }) => {
            let prompt = format!("Are you sure you want to delete {} bookmarks?", ids.len());
            if yes || prompt_confirm(&prompt, Some(false))? {
                match engine.remove_selected(&ids, &CliReporter::new()) {
                    Ok(count) => info!("Successfully deleted {} bookmarks", count),
                    Err(err) => error!("Error: {}", err),
                }
            }
        }
        Some(Commands::Review { matching }) => {
            if let Err(err) = review::run_review(&mut engine, &matching.into()) {
                error!("Error: {}", err);
            }
        }
        Some(Commands::Serve) => {
            serve::run_serve(&mut engine)?;
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", engine.config());
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn run_scan(engine: &Engine, options: &MatchOptions, json: bool) -> anyhow::Result<()> {
    if json {
        let response = Response::duplicates(engine.find_duplicates(options, &CliReporter::new()));
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let report = engine.find_duplicates(options, &CliReporter::new())?;
    let separator = &engine.config().key_separator;
    println!("{}", summary_line(&report).bold());

    for group in &report.groups {
        println!();
        println!("{}", header_label(&group.key, options, separator).cyan());
        for (i, bookmark) in group.bookmarks.iter().enumerate() {
            let label = if i == 0 {
                "✓ KEEP".green().to_string()
            } else {
                format!("{:<6}", bookmark.id).red().to_string()
            };
            review::print_bookmark(&label, bookmark);
        }
    }

    if report.count() > 0 {
        info!(
            "{} duplicate groups, {} removable bookmarks",
            format!("{}", report.count()).red(),
            format!("{}", report.total_duplicates()).red(),
        );
        println!();
        println!("Removable: {}", select_redundant(&report).join(" "));
    }
    Ok(())
}

fn run_folders(engine: &Engine) -> anyhow::Result<()> {
    let folders = engine.get_folders()?;
    for folder in &folders {
        println!("{:>8}  {}", folder.id.cyan(), folder.path);
    }
    info!("{} folders", folders.len());
    Ok(())
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(default.unwrap_or(false));
        }

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
