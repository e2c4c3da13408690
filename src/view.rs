//! Pure board-to-view-model transform.
//!
//! The view model carries raw user text; each output layer escapes it for its
//! own medium (see `html` and `ui`).

use crate::task::{Status, Task, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub columns: [ColumnView; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub status: Status,
    pub title: &'static str,
    pub count: usize,
    pub body: ColumnBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnBody {
    Empty(EmptyState),
    Cards(Vec<CardView>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyState {
    pub icon: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: TaskId,
    pub title: String,
    /// `None` when the task has no description.
    pub description: Option<String>,
    pub created_at: String,
    pub dragging: bool,
}

impl BoardView {
    pub fn build(tasks: &[Task], dragging: Option<TaskId>) -> Self {
        Self {
            columns: Status::ALL.map(|status| ColumnView::build(status, tasks, dragging)),
        }
    }

    pub fn column(&self, status: Status) -> &ColumnView {
        &self.columns[status.index()]
    }
}

impl ColumnView {
    fn build(status: Status, tasks: &[Task], dragging: Option<TaskId>) -> Self {
        let cards: Vec<CardView> = tasks
            .iter()
            .filter(|t| t.status == status)
            .map(|t| CardView::build(t, dragging))
            .collect();
        let count = cards.len();
        let body = if cards.is_empty() {
            ColumnBody::Empty(EmptyState {
                icon: status.empty_icon(),
                message: status.empty_message(),
            })
        } else {
            ColumnBody::Cards(cards)
        };
        Self {
            status,
            title: status.title(),
            count,
            body,
        }
    }

    pub fn cards(&self) -> &[CardView] {
        match &self.body {
            ColumnBody::Cards(cards) => cards,
            ColumnBody::Empty(_) => &[],
        }
    }
}

impl CardView {
    fn build(task: &Task, dragging: Option<TaskId>) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: (!task.description.is_empty()).then(|| task.description.clone()),
            created_at: task.created_at.clone(),
            dragging: dragging == Some(task.id),
        }
    }
}
