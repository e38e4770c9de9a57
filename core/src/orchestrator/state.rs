use serde::{Deserialize, Serialize};

/// The two independently tracked views.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Single,
    Comparison,
}

/// Lifecycle of one view's latest fetch.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    /// Carries the user-facing message only.
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Idle and failed views fetch again when they become visible.
    pub fn needs_fetch(&self) -> bool {
        matches!(self, ViewState::Idle | ViewState::Failed(_))
    }
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

/// Identifies one issued request. `seq` is unique and increasing across both views.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Ticket {
    pub mode: ViewMode,
    pub seq: u64,
}

/// A view's state plus the sequence number of its most recently issued request.
#[derive(Debug)]
pub(crate) struct Slot<T> {
    pub(crate) state: ViewState<T>,
    latest: Option<u64>,
}

impl<T> Slot<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: ViewState::Idle,
            latest: None,
        }
    }

    /// Enters `Loading`, dropping whatever the view held before.
    pub(crate) fn begin(&mut self, seq: u64) {
        self.state = ViewState::Loading;
        self.latest = Some(seq);
    }

    pub(crate) fn accepts(&self, seq: u64) -> bool {
        self.latest == Some(seq)
    }
}
