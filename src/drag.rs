//! Drag-and-drop state machine.
//!
//! One owned slot tracks the task being dragged. It is set on drag-start and
//! cleared on drag-end whether or not a drop happened. Column highlights live
//! here too and are only removed by a leave whose target is the column itself.

use crate::task::{Status, TaskId};

/// Element under the pointer for a drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// The column container itself.
    Column(Status),
    /// A card (or anything else) nested inside a column.
    Card { status: Status, id: TaskId },
    /// Outside every column.
    Outside,
}

impl HitTarget {
    /// The column enclosing the target, if any.
    pub fn closest_column(self) -> Option<Status> {
        match self {
            HitTarget::Column(status) | HitTarget::Card { status, .. } => Some(status),
            HitTarget::Outside => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { task: TaskId },
}

/// A completed drop: move `task` into `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropAction {
    pub task: TaskId,
    pub status: Status,
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    highlighted: [bool; 3],
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn dragged_task(&self) -> Option<TaskId> {
        match self.state {
            DragState::Dragging { task } => Some(task),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged_task().is_some()
    }

    pub fn is_highlighted(&self, status: Status) -> bool {
        self.highlighted[status.index()]
    }

    pub fn drag_start(&mut self, task: TaskId) {
        self.state = DragState::Dragging { task };
    }

    pub fn drag_enter(&mut self, target: HitTarget) {
        if !self.is_dragging() {
            return;
        }
        if let Some(status) = target.closest_column() {
            self.highlighted[status.index()] = true;
        }
    }

    pub fn drag_leave(&mut self, target: HitTarget) {
        // Leaving a card inside the column is not leaving the column.
        if let HitTarget::Column(status) = target {
            self.highlighted[status.index()] = false;
        }
    }

    /// Whether `target` accepts a move drop.
    pub fn drag_over(&self, target: HitTarget) -> bool {
        self.is_dragging() && target.closest_column().is_some()
    }

    pub fn drop_on(&mut self, target: HitTarget) -> Option<DropAction> {
        let status = target.closest_column()?;
        self.highlighted[status.index()] = false;
        let task = self.dragged_task()?;
        Some(DropAction { task, status })
    }

    pub fn drag_end(&mut self) {
        self.state = DragState::Idle;
        self.highlighted = [false; 3];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const TASK: TaskId = TaskId(1);

    #[fixture]
    fn dragging() -> DragController {
        let mut drag = DragController::new();
        drag.drag_start(TASK);
        drag
    }

    #[rstest]
    fn starts_idle() {
        let drag = DragController::new();
        assert_eq!(drag.state(), DragState::Idle);
        assert!(!drag.drag_over(HitTarget::Column(Status::Done)));
    }

    #[rstest]
    fn drop_on_column_moves_dragged_task(mut dragging: DragController) {
        let action = dragging.drop_on(HitTarget::Column(Status::Done));
        assert_eq!(
            action,
            Some(DropAction {
                task: TASK,
                status: Status::Done
            })
        );
    }

    #[rstest]
    fn drop_on_card_uses_enclosing_column(mut dragging: DragController) {
        let action = dragging.drop_on(HitTarget::Card {
            status: Status::InProgress,
            id: TaskId(9),
        });
        assert_eq!(action.map(|a| a.status), Some(Status::InProgress));
    }

    #[rstest]
    fn drop_outside_columns_is_ignored(mut dragging: DragController) {
        assert_eq!(dragging.drop_on(HitTarget::Outside), None);
        assert!(dragging.is_dragging());
    }

    #[rstest]
    fn drop_without_drag_is_ignored() {
        let mut drag = DragController::new();
        assert_eq!(drag.drop_on(HitTarget::Column(Status::Done)), None);
    }

    #[rstest]
    fn enter_highlights_only_while_dragging(mut dragging: DragController) {
        let mut idle = DragController::new();
        idle.drag_enter(HitTarget::Column(Status::Done));
        assert!(!idle.is_highlighted(Status::Done));

        dragging.drag_enter(HitTarget::Card {
            status: Status::Done,
            id: TaskId(3),
        });
        assert!(dragging.is_highlighted(Status::Done));
    }

    #[rstest]
    fn leaving_a_child_keeps_highlight(mut dragging: DragController) {
        dragging.drag_enter(HitTarget::Column(Status::Todo));
        dragging.drag_enter(HitTarget::Card {
            status: Status::Todo,
            id: TaskId(4),
        });
        dragging.drag_leave(HitTarget::Card {
            status: Status::Todo,
            id: TaskId(4),
        });
        assert!(dragging.is_highlighted(Status::Todo));

        dragging.drag_leave(HitTarget::Column(Status::Todo));
        assert!(!dragging.is_highlighted(Status::Todo));
    }

    #[rstest]
    fn drop_clears_target_highlight(mut dragging: DragController) {
        dragging.drag_enter(HitTarget::Column(Status::Done));
        dragging.drop_on(HitTarget::Column(Status::Done));
        assert!(!dragging.is_highlighted(Status::Done));
    }

    #[rstest]
    fn drag_end_resets_everything(mut dragging: DragController) {
        dragging.drag_enter(HitTarget::Column(Status::Todo));
        dragging.drag_enter(HitTarget::Column(Status::Done));
        dragging.drag_end();
        assert_eq!(dragging.state(), DragState::Idle);
        assert!(Status::ALL.iter().all(|s| !dragging.is_highlighted(*s)));
        assert_eq!(dragging.drop_on(HitTarget::Column(Status::Done)), None);
    }
}
