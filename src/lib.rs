//! Single-board kanban task tracker.
//!
//! Tasks move between three fixed columns (to do, in progress, done). The
//! board is persisted as a JSON array under one key of a key-value store and
//! can be exported as a dated JSON document.

pub mod app;
pub mod command;
pub mod config;
pub mod drag;
pub mod error;
pub mod export;
pub mod html;
pub mod kanban_board;
pub mod notify;
pub mod stats;
pub mod storage;
pub mod task;
pub mod ui;
pub mod view;

pub use app::App;
pub use command::{run_command, Command};
pub use config::Config;
pub use drag::{DragController, DragState, DropAction, HitTarget};
pub use error::{BoardError, BoardResult};
pub use kanban_board::{KanbanBoard, LoadOutcome};
pub use notify::{ConfirmModal, PendingAction, Toast, ToastKind, Toasts};
pub use stats::Stats;
pub use storage::{FileStore, KeyValueStore, MemoryStore, TASKS_KEY};
pub use task::{Status, Task, TaskId};
pub use view::BoardView;
