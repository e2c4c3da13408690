//! One-way JSON export of the board.

use chrono::NaiveDate;
use serde::Serialize;

use crate::task::Task;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    pub export_date: String,
    pub total_tasks: usize,
    pub tasks: &'a [Task],
}

impl<'a> ExportDocument<'a> {
    pub fn new(export_date: impl Into<String>, tasks: &'a [Task]) -> Self {
        Self {
            export_date: export_date.into(),
            total_tasks: tasks.len(),
            tasks,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `kanban-board-<YYYY-MM-DD>.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("kanban-board-{}.json", date.format("%Y-%m-%d"))
}
