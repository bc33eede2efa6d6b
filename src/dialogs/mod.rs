//! Modal dialogs
//!
//! [`Dialog`] is the base capability: it takes keyboard focus away from the
//! background while it is attached and gives it back afterwards, and it can
//! veto close requests through [`Dialog::on_closing`]. [`ResultDialog`] adds
//! an awaitable show that resolves to `Some(result)` or `None`.
//!
//! ```ignore
//! let host = Arc::new(DialogHost::new(focus));
//! let dialog = Arc::new(ConfirmDialog::new(host.clone(), "Discard changes?"));
//! match dialog.show_async().await? {
//!     Some(true) => discard(),
//!     Some(false) | None => {}
//! }
//! ```

pub mod base;
pub mod confirm;
pub mod host;
pub mod result;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use base::{Dialog, DialogCore, LifecycleContext};
pub use confirm::ConfirmDialog;
pub use host::{DialogHost, Host};
pub use result::ResultDialog;
pub use types::*;
