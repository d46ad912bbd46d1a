use std::io::{self, BufRead, Write};

use bookmark_dedup_core::analysis::review::ReviewState;
use bookmark_dedup_core::session::TabManager;
use bookmark_dedup_core::storage::models::{FlatBookmark, MatchOptions};
use bookmark_dedup_core::storage::BookmarkStore;
use bookmark_dedup_core::DedupEngine;
use colored::*;
use tracing::error;

use crate::progress::CliReporter;
use crate::prompt_confirm;

const HELP: &str = "t G M: toggle | k G M: keep | d: delete selected | r: rescan | q: quit";

pub fn print_bookmark(label: &str, bookmark: &FlatBookmark) {
    let added = bookmark
        .added_at()
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    println!("    {} {}", label, bookmark.title.bold());
    println!("          {}", bookmark.url.blue());
    if !bookmark.path.is_empty() {
        println!("          in {}", bookmark.path.dimmed());
    }
    println!("          Added: {}", added.dimmed());
}

fn render(state: &ReviewState) {
    println!();
    println!("{}", state.summary().bold());
    for (g, group) in state.groups().iter().enumerate() {
        println!();
        println!("  {} {}", format!("[{}]", g + 1).cyan(), group.header);
        for (m, bookmark) in group.bookmarks.iter().enumerate() {
            let label = if m == group.keeper() {
                format!("{:>2}. {}", m + 1, "✓ KEEP".green())
            } else if group.is_selected(m) {
                format!("{:>2}. {}", m + 1, "[x]".red())
            } else {
                format!("{:>2}. [ ]", m + 1)
            };
            print_bookmark(&label, bookmark);
        }
    }
    println!();
}

/// Parse "G M" as 1-based group and member numbers.
fn parse_target(args: &[&str]) -> Option<(usize, usize)> {
    match args {
        [g, m] => {
            let g: usize = g.parse().ok()?;
            let m: usize = m.parse().ok()?;
            Some((g.checked_sub(1)?, m.checked_sub(1)?))
        }
        _ => None,
    }
}

pub fn run_review<S, T>(
    engine: &mut DedupEngine<S, T>,
    options: &MatchOptions,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: BookmarkStore,
    T: TabManager,
{
    let reporter = CliReporter::new();
    let separator = engine.config().key_separator.clone();
    let report = engine.find_duplicates(options, &reporter)?;
    let mut state = ReviewState::new(&report, options, &separator);
    render(&state);
    if state.groups().is_empty() {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        let select_all = if state.all_selected() { "deselect all" } else { "select all" };
        println!("{}", format!("a: {} | {}", select_all, HELP).dimmed());
        let delete_hint = if state.can_delete() { "" } else { " (nothing selected)" };
        print!("review{}> ", delete_hint);
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            return Ok(());
        }
        let words: Vec<&str> = input.split_whitespace().collect();
        let Some((command, args)) = words.split_first() else {
            continue;
        };

        match *command {
            "q" => return Ok(()),
            "a" => {
                state.toggle_select_all();
            }
            "t" => match parse_target(args) {
                Some((g, m)) => {
                    state.toggle(g, m);
                }
                None => println!("Expected a group and a member number, e.g. `t 1 2`"),
            },
            "k" => match parse_target(args) {
                Some((g, m)) => {
                    if !state.set_keeper(g, m) {
                        println!("No such bookmark");
                    }
                }
                None => println!("Expected a group and a member number, e.g. `k 1 2`"),
            },
            "d" => {
                if !state.can_delete() {
                    println!("Please select at least one bookmark to delete");
                    continue;
                }
                let ids = state.selected_ids();
                let prompt = format!(
                    "Are you sure you want to delete {} selected bookmarks?",
                    ids.len()
                );
                if !prompt_confirm(&prompt, Some(false))? {
                    continue;
                }
                match engine.remove_selected(&ids, &reporter) {
                    Ok(count) => println!("Successfully deleted {} bookmarks!", count),
                    Err(e) => {
                        error!("Error removing bookmarks: {}", e);
                        println!("{} {}", "Error:".red(), e);
                    }
                }
                let report = engine.find_duplicates(options, &reporter)?;
                state = ReviewState::new(&report, options, &separator);
            }
            "r" => {
                let report = engine.find_duplicates(options, &reporter)?;
                state = ReviewState::new(&report, options, &separator);
            }
            _ => {
                println!("Unknown command `{}`", command);
                continue;
            }
        }

        render(&state);
        if state.groups().is_empty() {
            return Ok(());
        }
    }
}
