//! Core dialog types
//!
//! Identifiers, close outcomes, lifecycle events and the dialog error type
//! shared by the lifecycle traits and the host.

use std::any::Any;
use uuid::Uuid;

/// Unique identifier for dialog instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogId(Uuid);

impl DialogId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DialogId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value carried by a close request.
///
/// Typed dialogs put their `Output` here; the receiving side downcasts it back.
pub type Payload = Box<dyn Any + Send>;

/// What happened to a close request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The dialog was removed and its pending show resolved
    Closed,
    /// `on_closing` returned false; the dialog stays open
    Vetoed,
    /// The dialog was not open on the host
    NotOpen,
}

impl CloseOutcome {
    pub fn is_closed(self) -> bool {
        self == Self::Closed
    }
}

/// Attachment phase of a dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogPhase {
    #[default]
    Detached,
    Attached,
}

/// Dialog events published by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// Dialog was attached and laid out
    Opened(DialogId),
    /// Dialog was detached
    Closed { id: DialogId, with_payload: bool },
    /// A close request was refused by `on_closing`
    CloseVetoed(DialogId),
}

/// Result type for dialog operations
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Dialog-specific error types
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    /// The host closed a typed dialog with a payload of another type. This is
    /// a bug in the calling code, not a runtime condition to recover from.
    #[error("Dialog result has the wrong type (expected {expected})")]
    ResultTypeMismatch { expected: &'static str },

    #[error("Dialog host is no longer available")]
    HostUnavailable,

    #[error("Dialog with ID '{0}' is already open")]
    AlreadyOpen(DialogId),

    /// Close requests from the dialog would go to the host it was built with
    #[error("Dialog with ID '{0}' belongs to another host")]
    ForeignHost(DialogId),
}
