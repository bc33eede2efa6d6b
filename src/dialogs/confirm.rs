//! Yes/No confirmation dialog
//!
//! Asks a single question and answers `true` for "Yes" and `false` for "No".
//! A dismissal without an answer (Escape, backdrop) shows up as `None` from
//! `show_async`. Focus starts on "No" so an accidental Enter is harmless.

use super::base::{Dialog, DialogCore};
use super::host::Host;
use super::result::ResultDialog;
use super::types::CloseOutcome;
use crate::focus::{ElementRef, Node};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Confirmation dialog with "Yes" and "No" buttons
pub struct ConfirmDialog {
    core: DialogCore,
    root: ElementRef,
    question: String,
    yes_button: ElementRef,
    no_button: ElementRef,
    /// While set, every close request is refused
    locked: AtomicBool,
}

impl ConfirmDialog {
    pub fn new(host: Arc<dyn Host>, question: impl Into<String>) -> Self {
        Self::with_labels(host, question, "Yes", "No")
    }

    /// Create a confirmation dialog with custom button labels
    pub fn with_labels(
        host: Arc<dyn Host>,
        question: impl Into<String>,
        yes_label: impl Into<String>,
        no_label: impl Into<String>,
    ) -> Self {
        let question = question.into();
        let no_button = Node::new(no_label).focusable(true).into_ref();
        let yes_button = Node::new(yes_label).focusable(true).into_ref();
        let buttons = Node::new("buttons")
            .with_children([Arc::clone(&no_button), Arc::clone(&yes_button)])
            .into_ref();
        let root = Node::new("confirm")
            .with_children([Node::new(question.clone()).into_ref(), buttons])
            .into_ref();

        Self {
            core: DialogCore::new(host),
            root,
            question,
            yes_button,
            no_button,
            locked: AtomicBool::new(false),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn yes_button(&self) -> &ElementRef {
        &self.yes_button
    }

    pub fn no_button(&self) -> &ElementRef {
        &self.no_button
    }

    /// Answer "Yes"
    pub fn confirm(&self) -> CloseOutcome {
        self.close_with(true)
    }

    /// Answer "No"
    pub fn decline(&self) -> CloseOutcome {
        self.close_with(false)
    }

    /// Refuse every close request until [`ConfirmDialog::unlock`]
    pub fn lock(&self) {
        self.locked.store(true, Ordering::SeqCst);
    }

    pub fn unlock(&self) {
        self.locked.store(false, Ordering::SeqCst);
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }
}

impl Dialog for ConfirmDialog {
    fn core(&self) -> &DialogCore {
        &self.core
    }

    fn root(&self) -> &ElementRef {
        &self.root
    }

    fn on_closing(&self) -> bool {
        !self.is_locked()
    }
}

impl ResultDialog for ConfirmDialog {
    type Output = bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::test_support::Fixture;
    use crate::focus::{Element, FocusManager};

    #[tokio::test]
    async fn test_focus_starts_on_no() {
        let fixture = Fixture::new();
        let dialog = Arc::new(ConfirmDialog::new(fixture.host.clone(), "Delete file?"));
        let pending = tokio::spawn(Arc::clone(&dialog).show_async());
        fixture.host.opened(dialog.id()).await;
        fixture.host.pump();

        let focused = fixture.focus.focused_element().unwrap();
        assert_eq!(focused.id(), dialog.no_button().id());

        dialog.decline();
        assert_eq!(pending.await.unwrap().unwrap(), Some(false));
    }

    #[tokio::test]
    async fn test_confirm_answers_true() {
        let fixture = Fixture::new();
        let dialog = Arc::new(ConfirmDialog::new(fixture.host.clone(), "Overwrite?"));
        let pending = tokio::spawn(Arc::clone(&dialog).show_async());
        fixture.host.opened(dialog.id()).await;

        assert_eq!(dialog.confirm(), CloseOutcome::Closed);
        assert_eq!(pending.await.unwrap().unwrap(), Some(true));
        assert_eq!(fixture.focused_name().as_deref(), Some("editor"));
    }

    #[tokio::test]
    async fn test_lock_refuses_every_close() {
        let fixture = Fixture::new();
        let dialog = Arc::new(ConfirmDialog::new(fixture.host.clone(), "Quit?"));
        let pending = tokio::spawn(Arc::clone(&dialog).show_async());
        fixture.host.opened(dialog.id()).await;

        dialog.lock();
        assert_eq!(dialog.confirm(), CloseOutcome::Vetoed);
        assert_eq!(dialog.close(), CloseOutcome::Vetoed);
        assert_eq!(fixture.host.dismiss_top(), Some(CloseOutcome::Vetoed));
        assert!(fixture.host.is_open(dialog.id()));

        dialog.unlock();
        assert_eq!(fixture.host.dismiss_top(), Some(CloseOutcome::Closed));
        assert_eq!(pending.await.unwrap().unwrap(), None);
    }

    #[test]
    fn test_custom_labels() {
        let fixture = Fixture::new();
        let dialog = ConfirmDialog::with_labels(fixture.host.clone(), "Save?", "Save", "Discard");

        assert_eq!(dialog.question(), "Save?");
        assert_eq!(dialog.yes_button().name(), "Save");
        assert_eq!(dialog.no_button().name(), "Discard");
        assert!(!dialog.is_locked());
    }
}
