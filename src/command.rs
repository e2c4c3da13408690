//! One-shot subcommands run against a loaded board.
//!
//! Each command returns the text it would print, so the binary only decides
//! where output and errors go.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use mockable::Clock;
use tracing::debug;

use crate::error::{BoardError, BoardResult};
use crate::kanban_board::KanbanBoard;
use crate::notify::clear_all_message;
use crate::storage::KeyValueStore;
use crate::task::{Status, TaskId};
use crate::view::BoardView;

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Add a task to the to do column
    Add {
        title: String,
        #[arg(short = 'm', long, default_value = "")]
        description: String,
    },

    /// List tasks grouped by column
    List,

    /// Show task counts
    Stats,

    /// Move a task to another column
    Move {
        id: TaskId,
        /// todo, inprogress or done
        status: Status,
    },

    /// Delete a task
    Delete { id: TaskId },

    /// Delete every task
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export the board as kanban-board-<date>.json
    Export,

    /// Render the board as HTML
    Html {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Runs `command` and returns its output, newline terminated.
///
/// `confirm` is asked before `clear` unless `--yes` was given.
pub fn run_command<S, C, F>(
    command: Command,
    board: &mut KanbanBoard<S, C>,
    export_dir: &Path,
    confirm: F,
) -> BoardResult<String>
where
    S: KeyValueStore,
    C: Clock,
    F: FnOnce(&str) -> io::Result<bool>,
{
    debug!(?command, "Running command");
    let lines = match command {
        Command::Add { title, description } => {
            let task = board.add_task(&title, &description)?;
            vec![format!("Added [#{}] {}", task.id, task.title)]
        }
        Command::List => list_lines(board),
        Command::Stats => {
            let stats = board.stats();
            vec![
                format!("Total:       {}", stats.total),
                format!("To Do:       {}", stats.todo),
                format!("In Progress: {}", stats.in_progress),
                format!("Done:        {}", stats.done),
            ]
        }
        Command::Move { id, status } => {
            if board.set_status(id, status) {
                vec![format!("Moved [#{id}] to {}", status.title())]
            } else {
                vec![format!("No task with id {id}")]
            }
        }
        Command::Delete { id } => match board.delete_task(id) {
            Some(task) => vec![format!("Deleted [#{}] {}", task.id, task.title)],
            None => vec![format!("No task with id {id}")],
        },
        Command::Clear { yes } => {
            if board.is_empty() {
                return Err(BoardError::EmptyCollection);
            }
            if !yes && !confirm(&clear_all_message(board.len()))? {
                vec!["Cancelled".to_string()]
            } else {
                board.clear_all()?;
                vec!["All tasks cleared".to_string()]
            }
        }
        Command::Export => {
            let path = board.export_to(export_dir)?;
            vec![format!("Exported to {}", path.display())]
        }
        Command::Html { output } => {
            let html = crate::html::render_board(
                &BoardView::build(board.tasks(), None),
                &board.stats(),
            );
            match output {
                Some(path) => {
                    fs::write(&path, html)?;
                    vec![format!("Wrote {}", path.display())]
                }
                None => return Ok(html),
            }
        }
    };
    Ok(lines.into_iter().map(|line| line + "\n").collect())
}

fn list_lines<S: KeyValueStore, C: Clock>(board: &KanbanBoard<S, C>) -> Vec<String> {
    let mut lines = Vec::new();
    for column in &BoardView::build(board.tasks(), None).columns {
        lines.push(format!("{} ({}):", column.title, column.count));
        for card in column.cards() {
            lines.push(format!("  [#{}] {} ({})", card.id, card.title, card.created_at));
            if let Some(description) = &card.description {
                lines.push(format!("      {description}"));
            }
        }
    }
    lines
}
