//! Toast notifications and the confirm modal.

use std::time::{Duration, Instant};

/// How long a toast stays up before its exit animation starts.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Length of the entry and exit animations.
pub const TOAST_ANIMATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Entering,
    Visible,
    Leaving,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
}

impl Toast {
    pub fn phase(&self, now: Instant) -> ToastPhase {
        let age = now.saturating_duration_since(self.shown_at);
        if age < TOAST_ANIMATION {
            ToastPhase::Entering
        } else if age < TOAST_DURATION {
            ToastPhase::Visible
        } else if age < TOAST_DURATION + TOAST_ANIMATION {
            ToastPhase::Leaving
        } else {
            ToastPhase::Expired
        }
    }

    /// How far the toast is slid in, from 0.0 (off-screen) to 1.0.
    pub fn slide(&self, now: Instant) -> f64 {
        let age = now.saturating_duration_since(self.shown_at);
        let animation = TOAST_ANIMATION.as_secs_f64();
        match self.phase(now) {
            ToastPhase::Entering => age.as_secs_f64() / animation,
            ToastPhase::Visible => 1.0,
            ToastPhase::Leaving => {
                1.0 - (age.saturating_sub(TOAST_DURATION)).as_secs_f64() / animation
            }
            ToastPhase::Expired => 0.0,
        }
    }
}

/// Independently timed toasts, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) {
        self.push(ToastKind::Error, message, now);
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.push(ToastKind::Success, message, now);
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) {
        self.items.push(Toast {
            kind,
            message: message.into(),
            shown_at: now,
        });
    }

    /// Drops toasts whose exit animation has finished.
    pub fn prune(&mut self, now: Instant) {
        self.items
            .retain(|toast| toast.phase(now) != ToastPhase::Expired);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Actions that need confirmation before they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    ClearAll,
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmModal {
    pending: Option<PendingAction>,
    message: String,
}

impl ConfirmModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, action: PendingAction, message: impl Into<String>) {
        self.pending = Some(action);
        self.message = message.into();
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Closes the modal and hands back the action to run.
    pub fn confirm(&mut self) -> Option<PendingAction> {
        let action = self.pending.take();
        self.message.clear();
        action
    }

    pub fn cancel(&mut self) {
        self.pending = None;
        self.message.clear();
    }
}

pub fn clear_all_message(count: usize) -> String {
    format!("Are you sure you want to delete all {count} tasks? This action cannot be undone.")
}
