//! Dialog host
//!
//! The [`Host`] trait is what dialogs talk to when they want to be shown or
//! closed. [`DialogHost`] is an in-process implementation that:
//! - Keeps the open dialogs in a stack (last = topmost)
//! - Drives the attach/detach lifecycle hooks
//! - Consults `on_closing` before every close
//! - Resolves each pending show exactly once, and detaches the dialog if
//!   the show is dropped before that
//! - Dismisses the topmost dialog on Escape or a backdrop click

use super::base::{Dialog, LifecycleContext};
use super::types::{CloseOutcome, DialogError, DialogEvent, DialogId, DialogResult, Payload};
use crate::config::Config;
use crate::dispatch::IdleQueue;
use crate::focus::{
    attach_subtree, detach_subtree, realize_subtree, DepthFirstFinder, DescendantFinder,
    FocusManager,
};
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot, Notify};
use tracing::{debug, info, warn};

/// Places dialogs on screen and delivers their close signals
#[async_trait]
pub trait Host: Send + Sync {
    /// Show `dialog` and wait until it is closed. Resolves to the payload of
    /// the close request that closed it, or `None` for a dismissal without one.
    async fn show(&self, dialog: Arc<dyn Dialog>) -> DialogResult<Option<Payload>>;

    /// Close the dialog `id`, delivering `payload` to its pending show.
    ///
    /// Closing a dialog that is not open is answered with
    /// [`CloseOutcome::NotOpen`]; a second close for the same show lands there.
    fn close(&self, id: DialogId, payload: Option<Payload>) -> CloseOutcome;
}

struct OpenDialog {
    dialog: Arc<dyn Dialog>,
    ticket: u64,
    responder: oneshot::Sender<Option<Payload>>,
}

/// Detaches a dialog whose show future was dropped before it closed
struct ShowGuard<'a> {
    host: &'a DialogHost,
    id: DialogId,
    ticket: u64,
}

impl Drop for ShowGuard<'_> {
    fn drop(&mut self) {
        self.host.abandon(self.id, self.ticket);
    }
}

/// Stack-based dialog host
pub struct DialogHost {
    focus: Arc<dyn FocusManager>,
    finder: Arc<dyn DescendantFinder>,
    idle: IdleQueue,
    stack: Mutex<Vec<OpenDialog>>,
    next_ticket: AtomicU64,
    opened: Notify,
    close_on_escape: bool,
    close_on_backdrop: bool,
    event_sender: Option<mpsc::UnboundedSender<DialogEvent>>,
}

impl DialogHost {
    pub fn new(focus: Arc<dyn FocusManager>) -> Self {
        Self {
            focus,
            finder: Arc::new(DepthFirstFinder),
            idle: IdleQueue::new(),
            stack: Mutex::new(Vec::new()),
            next_ticket: AtomicU64::new(0),
            opened: Notify::new(),
            close_on_escape: true,
            close_on_backdrop: true,
            event_sender: None,
        }
    }

    /// Apply the host-related configuration fields
    pub fn with_config(mut self, config: &Config) -> Self {
        self.close_on_escape = config.close_on_escape;
        self.close_on_backdrop = config.close_on_backdrop;
        self
    }

    pub fn with_finder(mut self, finder: Arc<dyn DescendantFinder>) -> Self {
        self.finder = finder;
        self
    }

    pub fn close_on_escape(mut self, enabled: bool) -> Self {
        self.close_on_escape = enabled;
        self
    }

    pub fn close_on_backdrop(mut self, enabled: bool) -> Self {
        self.close_on_backdrop = enabled;
        self
    }

    /// Set the event sender for dialog events
    pub fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<DialogEvent>) {
        self.event_sender = Some(sender);
    }

    pub fn focus_manager(&self) -> &Arc<dyn FocusManager> {
        &self.focus
    }

    pub fn idle(&self) -> &IdleQueue {
        &self.idle
    }

    /// Run the work deferred to the idle tick, such as initial dialog focus
    pub fn pump(&self) -> usize {
        self.idle.run_pending()
    }

    pub fn is_open(&self, id: DialogId) -> bool {
        self.stack().iter().any(|open| open.dialog.id() == id)
    }

    pub fn open_count(&self) -> usize {
        self.stack().len()
    }

    pub fn topmost_id(&self) -> Option<DialogId> {
        self.stack().last().map(|open| open.dialog.id())
    }

    /// Wait until dialog `id` has been attached
    pub async fn opened(&self, id: DialogId) {
        loop {
            let notified = self.opened.notified();
            if self.is_open(id) {
                return;
            }
            notified.await;
        }
    }

    /// Handle a key press. Deferred idle work always runs before the key is
    /// dispatched. Returns whether the key was consumed by the dialog layer.
    pub fn handle_key_event(&self, key: KeyEvent) -> bool {
        self.pump();

        let Some(id) = self.topmost_id() else {
            return false;
        };
        if key.code == KeyCode::Esc && key.modifiers.is_empty() && self.close_on_escape {
            debug!("Escape pressed, dismissing dialog {}", id);
            self.close(id, None);
        }
        true
    }

    /// Dismiss the topmost dialog as if its backdrop had been clicked.
    /// Returns `None` when backdrop dismissal is disabled or nothing is open.
    pub fn dismiss_top(&self) -> Option<CloseOutcome> {
        if !self.close_on_backdrop {
            return None;
        }
        let id = self.topmost_id()?;
        Some(self.close(id, None))
    }

    /// Dismiss dialogs from the top down until the stack is empty or a dialog
    /// refuses to close. Returns how many were closed.
    pub fn close_all(&self) -> usize {
        let mut closed = 0;
        while let Some(id) = self.topmost_id() {
            if !self.close(id, None).is_closed() {
                break;
            }
            closed += 1;
        }
        closed
    }

    fn stack(&self) -> MutexGuard<'_, Vec<OpenDialog>> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn context(&self) -> LifecycleContext<'_> {
        LifecycleContext::new(&self.focus, self.finder.as_ref(), &self.idle)
    }

    fn find(&self, id: DialogId) -> Option<Arc<dyn Dialog>> {
        self.stack()
            .iter()
            .find(|open| open.dialog.id() == id)
            .map(|open| Arc::clone(&open.dialog))
    }

    fn open(
        &self,
        dialog: Arc<dyn Dialog>,
    ) -> DialogResult<(u64, oneshot::Receiver<Option<Payload>>)> {
        let id = dialog.id();
        if !dialog.core().is_bound_to(self) {
            return Err(DialogError::ForeignHost(id));
        }

        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let (responder, receiver) = oneshot::channel();
        {
            let mut stack = self.stack();
            if stack.iter().any(|open| open.dialog.id() == id) {
                return Err(DialogError::AlreadyOpen(id));
            }
            stack.push(OpenDialog {
                dialog: Arc::clone(&dialog),
                ticket,
                responder,
            });
        }

        // Hooks run without the stack lock held.
        attach_subtree(dialog.root());
        dialog.on_attached(&self.context());
        realize_subtree(dialog.root());

        info!("Dialog {} opened", id);
        self.send_event(DialogEvent::Opened(id));
        self.opened.notify_waiters();
        Ok((ticket, receiver))
    }

    /// Detach the entry opened with `ticket` if it is still on the stack.
    /// `on_closing` is not consulted; nobody is left to receive a result.
    fn abandon(&self, id: DialogId, ticket: u64) {
        let entry = {
            let mut stack = self.stack();
            match stack
                .iter()
                .position(|open| open.dialog.id() == id && open.ticket == ticket)
            {
                Some(index) => stack.remove(index),
                None => return,
            }
        };

        warn!("Show of dialog {} was dropped while open; detaching it", id);
        detach_subtree(entry.dialog.root());
        entry.dialog.on_detached(&self.context());
        self.send_event(DialogEvent::Closed {
            id,
            with_payload: false,
        });
    }

    /// Send an event if event sender is configured
    fn send_event(&self, event: DialogEvent) {
        if let Some(sender) = &self.event_sender {
            let _ = sender.send(event);
        }
    }
}

#[async_trait]
impl Host for DialogHost {
    async fn show(&self, dialog: Arc<dyn Dialog>) -> DialogResult<Option<Payload>> {
        let id = dialog.id();
        let (ticket, receiver) = self.open(dialog)?;
        let _guard = ShowGuard {
            host: self,
            id,
            ticket,
        };
        // Entries leave the stack only through `close` or the guard, and
        // `close` always sends.
        Ok(receiver.await.unwrap_or(None))
    }

    fn close(&self, id: DialogId, payload: Option<Payload>) -> CloseOutcome {
        let Some(dialog) = self.find(id) else {
            debug!("Close requested for dialog {} which is not open", id);
            return CloseOutcome::NotOpen;
        };

        if !dialog.on_closing() {
            info!("Dialog {} refused to close", id);
            self.send_event(DialogEvent::CloseVetoed(id));
            return CloseOutcome::Vetoed;
        }

        let entry = {
            let mut stack = self.stack();
            match stack.iter().position(|open| open.dialog.id() == id) {
                Some(index) => stack.remove(index),
                None => return CloseOutcome::NotOpen,
            }
        };

        detach_subtree(entry.dialog.root());
        entry.dialog.on_detached(&self.context());

        let with_payload = payload.is_some();
        if entry.responder.send(payload).is_err() {
            debug!("Dialog {} closed after its show was abandoned", id);
        }

        info!("Dialog {} closed", id);
        self.send_event(DialogEvent::Closed { id, with_payload });
        CloseOutcome::Closed
    }
}

impl std::fmt::Debug for DialogHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogHost")
            .field("open", &self.open_count())
            .field("close_on_escape", &self.close_on_escape)
            .field("close_on_backdrop", &self.close_on_backdrop)
            .field("idle", &self.idle)
            .finish()
    }
}
