use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Identifier of a task: the creation time in milliseconds, bumped past the
/// largest id already on the board so two tasks never share one. When the
/// largest id is `u64::MAX` the smallest unused id is taken instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Next free id given the current time and the ids already in use.
    pub fn next<'a>(now_millis: i64, existing: impl IntoIterator<Item = &'a TaskId>) -> Self {
        let now = u64::try_from(now_millis).unwrap_or(0);
        let used: BTreeSet<u64> = existing.into_iter().map(|id| id.0).collect();
        match used.last() {
            Some(&largest) if largest >= now => match largest.checked_add(1) {
                Some(id) => TaskId(id),
                None => Self::smallest_unused(&used),
            },
            _ => TaskId(now),
        }
    }

    fn smallest_unused(used: &BTreeSet<u64>) -> Self {
        let mut candidate = 0;
        for &id in used {
            if id != candidate {
                break;
            }
            candidate += 1;
        }
        TaskId(candidate)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TaskId)
    }
}

/// The column a task lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    /// Columns in board order.
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    pub fn index(self) -> usize {
        match self {
            Status::Todo => 0,
            Status::InProgress => 1,
            Status::Done => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Status> {
        Self::ALL.get(index).copied()
    }

    /// Wire name, as stored in `status` and in the column `data-status` tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "inprogress",
            Status::Done => "done",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }

    pub fn empty_icon(self) -> &'static str {
        match self {
            Status::Todo => "inbox",
            Status::InProgress => "spinner",
            Status::Done => "check",
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            Status::Todo => "No tasks yet",
            Status::InProgress => "No tasks in progress",
            Status::Done => "No tasks completed yet",
        }
    }

    pub fn prev(self) -> Status {
        Self::from_index(self.index().saturating_sub(1)).unwrap_or(self)
    }

    pub fn next(self) -> Status {
        Self::from_index(self.index() + 1).unwrap_or(self)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Status::Todo),
            "inprogress" | "in-progress" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            other => Err(format!("unknown status '{other}' (expected todo, inprogress or done)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    pub created_at: String,
}
