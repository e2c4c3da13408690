//! Application state and input handling.
//!
//! Every user intent goes through the board, and the typed result is turned
//! into toasts here; the board itself never talks to the presentation layer.

use std::path::PathBuf;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use mockable::Clock;
use tracing::{debug, warn};

use crate::drag::{DragController, DropAction, HitTarget};
use crate::error::BoardError;
use crate::kanban_board::KanbanBoard;
use crate::notify::{clear_all_message, ConfirmModal, PendingAction, Toasts};
use crate::storage::KeyValueStore;
use crate::task::{Status, TaskId};
use crate::ui::BoardLayout;
use crate::view::BoardView;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Board,
    Form,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Title,
    Description,
}

/// The add-task form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub focus: FormField,
}

impl TaskForm {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Title,
        };
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

pub struct App<S, C> {
    pub board: KanbanBoard<S, C>,
    pub drag: DragController,
    pub toasts: Toasts,
    pub modal: ConfirmModal,
    pub form: TaskForm,
    pub mode: Mode,
    pub selected_status: Status,
    pub selected_task: usize,
    export_dir: PathBuf,
    layout: BoardLayout,
    /// Element under the pointer during a drag.
    hover: HitTarget,
    /// Card under a pressed mouse button that has not started dragging yet.
    pressed: Option<TaskId>,
}

impl<S: KeyValueStore, C: Clock> App<S, C> {
    pub fn new(board: KanbanBoard<S, C>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            board,
            drag: DragController::new(),
            toasts: Toasts::new(),
            modal: ConfirmModal::new(),
            form: TaskForm::default(),
            mode: Mode::Board,
            selected_status: Status::Todo,
            selected_task: 0,
            export_dir: export_dir.into(),
            layout: BoardLayout::default(),
            hover: HitTarget::Outside,
            pressed: None,
        }
    }

    pub fn view(&self) -> BoardView {
        BoardView::build(self.board.tasks(), self.drag.dragged_task())
    }

    pub fn set_layout(&mut self, layout: BoardLayout) {
        self.layout = layout;
    }

    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.board
            .tasks_by_status(self.selected_status)
            .get(self.selected_task)
            .map(|t| t.id)
    }

    /// Column the current drag would drop into, if any.
    pub fn drop_hint(&self) -> Option<Status> {
        self.drag
            .drag_over(self.hover)
            .then(|| self.hover.closest_column())
            .flatten()
    }

    pub fn tick(&mut self, now: Instant) {
        self.toasts.prune(now);
    }

    // Board operations.

    pub fn open_form(&mut self) {
        self.mode = Mode::Form;
        self.form.focus = FormField::Title;
    }

    pub fn submit_form(&mut self, now: Instant) {
        match self.board.add_task(&self.form.title, &self.form.description) {
            Ok(task) => {
                self.form.reset();
                self.mode = Mode::Board;
                self.select_task(task.id);
            }
            Err(err) => {
                // Keep the form as typed so it can be corrected.
                self.form.focus = FormField::Title;
                self.toasts.error(err.to_string(), now);
            }
        }
    }

    pub fn delete_task(&mut self, id: TaskId) {
        self.board.delete_task(id);
        self.clamp_selection();
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.delete_task(id);
        }
    }

    pub fn request_clear_all(&mut self, now: Instant) {
        if self.board.is_empty() {
            self.toasts.error("No tasks to clear", now);
            return;
        }
        self.modal
            .open(PendingAction::ClearAll, clear_all_message(self.board.len()));
    }

    pub fn confirm_modal(&mut self, now: Instant) {
        match self.modal.confirm() {
            Some(PendingAction::ClearAll) => match self.board.clear_all() {
                Ok(()) => {
                    self.clamp_selection();
                    self.toasts.success("All tasks cleared", now);
                }
                Err(err) => self.toasts.error(err.to_string(), now),
            },
            None => debug!("Confirm with no pending action ignored"),
        }
    }

    pub fn cancel_modal(&mut self) {
        self.modal.cancel();
    }

    pub fn export(&mut self, now: Instant) {
        match self.board.export_to(&self.export_dir) {
            Ok(_) => self.toasts.success("Data exported successfully", now),
            Err(BoardError::EmptyCollection) => self.toasts.error("No tasks to export", now),
            Err(err) => {
                warn!(error = %err, "Export failed");
                self.toasts.error(format!("Export failed: {err}"), now);
            }
        }
    }

    // Drag and drop.

    pub fn begin_drag(&mut self, task: TaskId, target: HitTarget) {
        self.drag.drag_start(task);
        self.hover = target;
        self.drag.drag_enter(target);
        debug!(task = %task, "Drag started");
    }

    /// Moves the pointer of an active drag onto `target`, firing the enter and
    /// leave events a pointer crossing element boundaries would.
    pub fn drag_hover(&mut self, target: HitTarget) {
        let previous = std::mem::replace(&mut self.hover, target);
        if previous == target || !self.drag.is_dragging() {
            return;
        }
        self.drag.drag_enter(target);
        match previous {
            HitTarget::Card { status, .. } => {
                self.drag.drag_leave(previous);
                if target.closest_column() != Some(status) {
                    self.drag.drag_leave(HitTarget::Column(status));
                }
            }
            HitTarget::Column(status) if target.closest_column() != Some(status) => {
                self.drag.drag_leave(previous);
            }
            _ => {}
        }
    }

    /// Drops on `target` and ends the drag whatever the outcome.
    pub fn finish_drag(&mut self, target: HitTarget) {
        if let Some(DropAction { task, status }) = self.drag.drop_on(target) {
            if self.board.set_status(task, status) {
                self.select_task(task);
            }
        }
        self.end_drag();
    }

    pub fn end_drag(&mut self) {
        self.drag.drag_end();
        self.hover = HitTarget::Outside;
        self.pressed = None;
        self.clamp_selection();
    }

    // Input mapping.

    /// Handles a key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        if self.modal.is_open() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.confirm_modal(now),
                KeyCode::Char('n') | KeyCode::Esc => self.cancel_modal(),
                _ => {}
            }
            return false;
        }
        match self.mode {
            Mode::Form => self.handle_form_key(key.code, now),
            Mode::Board if self.drag.is_dragging() => self.handle_drag_key(key.code),
            Mode::Board => return self.handle_board_key(key.code, now),
        }
        false
    }

    fn handle_form_key(&mut self, code: KeyCode, now: Instant) {
        match code {
            KeyCode::Esc => self.mode = Mode::Board,
            KeyCode::Tab | KeyCode::BackTab => self.form.toggle_focus(),
            KeyCode::Enter => self.submit_form(now),
            KeyCode::Backspace => {
                self.form.focused_mut().pop();
            }
            KeyCode::Char(c) => self.form.focused_mut().push(c),
            _ => {}
        }
    }

    fn handle_drag_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_status = self.selected_status.prev();
                self.drag_hover(HitTarget::Column(self.selected_status));
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_status = self.selected_status.next();
                self.drag_hover(HitTarget::Column(self.selected_status));
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.finish_drag(HitTarget::Column(self.selected_status));
            }
            KeyCode::Esc => self.end_drag(),
            _ => {}
        }
    }

    fn handle_board_key(&mut self, code: KeyCode, now: Instant) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('a') | KeyCode::Char('n') => self.open_form(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('c') => self.request_clear_all(now),
            KeyCode::Char('e') => self.export(now),
            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_task_id() {
                    self.begin_drag(id, HitTarget::Column(self.selected_status));
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_status = self.selected_status.prev();
                self.clamp_selection();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_status = self.selected_status.next();
                self.clamp_selection();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_task = self.selected_task.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_task += 1;
                self.clamp_selection();
            }
            _ => {}
        }
        false
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.modal.is_open() || self.mode != Mode::Board {
            return;
        }
        let target = self.layout.hit_test(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(id) = self.layout.delete_button_at(mouse.column, mouse.row) {
                    self.delete_task(id);
                    return;
                }
                if let HitTarget::Card { id, .. } = target {
                    self.select_task(id);
                    self.pressed = Some(id);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.drag.is_dragging() {
                    self.drag_hover(target);
                } else if let Some(id) = self.pressed.take() {
                    self.begin_drag(id, target);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag.is_dragging() {
                    self.finish_drag(target);
                }
                self.pressed = None;
            }
            _ => {}
        }
    }

    // Selection.

    fn select_task(&mut self, id: TaskId) {
        if let Some(task) = self.board.get(id) {
            let status = task.status;
            self.selected_status = status;
            self.selected_task = self
                .board
                .tasks_by_status(status)
                .iter()
                .position(|t| t.id == id)
                .unwrap_or(0);
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.board.tasks_by_status(self.selected_status).len();
        self.selected_task = self.selected_task.min(count.saturating_sub(1));
    }
}
