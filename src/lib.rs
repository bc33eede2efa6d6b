//! Modal dialog lifecycle for terminal UIs
//!
//! - [`dialogs`]: the [`Dialog`] focus lifecycle, awaitable [`ResultDialog`]s,
//!   and the stack-based [`DialogHost`]
//! - [`focus`]: focus manager, subtree search and UI elements
//! - [`dispatch`]: the idle queue used for deferred UI work
//! - [`config`]: host and logging configuration

pub mod config;
pub mod dialogs;
pub mod dispatch;
pub mod focus;

pub use dialogs::{
    CloseOutcome, ConfirmDialog, Dialog, DialogCore, DialogError, DialogHost, DialogId,
    DialogResult, Host, ResultDialog,
};
