//! Base dialog lifecycle
//!
//! A dialog captures the application's focus when the host attaches it, moves
//! focus into its own content so background widgets stop receiving keys, and
//! hands focus back when it is detached.

use super::host::Host;
use super::types::{CloseOutcome, DialogError, DialogId, DialogPhase, DialogResult, Payload};
use crate::dispatch::IdleQueue;
use crate::focus::{DescendantFinder, Element, ElementRef, FocusManager, WeakElement};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, warn};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Collaborators handed to the attach/detach hooks by the host
pub struct LifecycleContext<'a> {
    focus: &'a Arc<dyn FocusManager>,
    finder: &'a dyn DescendantFinder,
    idle: &'a IdleQueue,
}

impl<'a> LifecycleContext<'a> {
    pub fn new(
        focus: &'a Arc<dyn FocusManager>,
        finder: &'a dyn DescendantFinder,
        idle: &'a IdleQueue,
    ) -> Self {
        Self { focus, finder, idle }
    }

    pub fn focus_manager(&self) -> &dyn FocusManager {
        self.focus.as_ref()
    }

    pub fn finder(&self) -> &dyn DescendantFinder {
        self.finder
    }

    pub fn idle(&self) -> &IdleQueue {
        self.idle
    }

    /// Request focus on `element` at the next idle tick.
    ///
    /// Elements found during attach have not been laid out yet, so a direct
    /// focus request would be refused. The posted task holds the element
    /// weakly and does nothing if it is gone by then.
    pub fn focus_eventually(&self, element: &ElementRef) {
        let focus = Arc::clone(self.focus);
        let target = WeakElement::new(element);
        self.idle.post(move || match target.live() {
            Some(element) => {
                if !focus.focus(&element) {
                    debug!("Deferred focus on '{}' was refused", element.name());
                }
            }
            None => debug!("Deferred focus target {} is gone", target.id()),
        });
    }
}

/// State every dialog carries: identity, host binding and the focus to restore
pub struct DialogCore {
    id: DialogId,
    host: Weak<dyn Host>,
    previous_focus: Mutex<Option<WeakElement>>,
    phase: Mutex<DialogPhase>,
}

impl DialogCore {
    /// Bind a new dialog to `host`. Only a weak reference is kept.
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            id: DialogId::new(),
            host: Arc::downgrade(&host),
            previous_focus: Mutex::new(None),
            phase: Mutex::new(DialogPhase::Detached),
        }
    }

    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn host(&self) -> DialogResult<Arc<dyn Host>> {
        self.host.upgrade().ok_or(DialogError::HostUnavailable)
    }

    /// Whether close requests from this dialog are delivered to `host`
    pub fn is_bound_to(&self, host: &dyn Host) -> bool {
        self.host.as_ptr() as *const () == host as *const dyn Host as *const ()
    }

    pub fn phase(&self) -> DialogPhase {
        *lock(&self.phase)
    }

    pub fn is_attached(&self) -> bool {
        self.phase() == DialogPhase::Attached
    }

    /// The element that had focus when this dialog was last attached
    pub fn previous_focus(&self) -> Option<WeakElement> {
        lock(&self.previous_focus).clone()
    }

    /// Send a close request for this dialog to its host
    pub fn request_close(&self, payload: Option<Payload>) -> CloseOutcome {
        match self.host() {
            Ok(host) => host.close(self.id, payload),
            Err(_) => {
                warn!("Close requested for dialog {} but its host is gone", self.id);
                CloseOutcome::NotOpen
            }
        }
    }

    fn capture_focus(&self, focus: &dyn FocusManager) {
        let captured = focus.focused_element().map(|element| WeakElement::new(&element));
        match &captured {
            Some(element) => debug!("Dialog {} captured focus {}", self.id, element.id()),
            None => debug!("Dialog {} attached with nothing focused", self.id),
        }
        *lock(&self.previous_focus) = captured;
    }

    fn take_previous_focus(&self) -> Option<WeakElement> {
        lock(&self.previous_focus).take()
    }

    fn set_phase(&self, phase: DialogPhase) {
        *lock(&self.phase) = phase;
    }
}

impl std::fmt::Debug for DialogCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogCore")
            .field("id", &self.id)
            .field("phase", &self.phase())
            .field("previous_focus", &self.previous_focus())
            .finish()
    }
}

/// A transient modal UI unit.
///
/// Implementors supply their [`DialogCore`] and content root; every other
/// method has a default. Override [`Dialog::on_closing`] for confirmation
/// flows and [`Dialog::assign_initial_focus`] to pick a different first
/// focus target.
pub trait Dialog: Send + Sync + 'static {
    fn core(&self) -> &DialogCore;

    /// Root of the dialog's content subtree
    fn root(&self) -> &ElementRef;

    fn id(&self) -> DialogId {
        self.core().id()
    }

    /// Asked by the host before honoring any close request. Return `false` to
    /// keep the dialog open. The host may ask more than once per attempt, so
    /// this must not have side effects that matter.
    fn on_closing(&self) -> bool {
        true
    }

    /// Ask the host to close this dialog without a result
    fn close(&self) -> CloseOutcome {
        self.core().request_close(None)
    }

    /// Called by the host once the dialog is part of the live tree
    fn on_attached(&self, ctx: &LifecycleContext<'_>) {
        let core = self.core();
        core.capture_focus(ctx.focus_manager());
        core.set_phase(DialogPhase::Attached);
        self.assign_initial_focus(ctx);
    }

    /// Move focus off the background.
    ///
    /// The default focuses the first focusable, enabled descendant in
    /// depth-first order. If there is none, nothing is focused and background
    /// widgets stay reachable from the keyboard.
    fn assign_initial_focus(&self, ctx: &LifecycleContext<'_>) {
        let accepts_focus = |element: &dyn Element| element.accepts_focus();
        match ctx.finder().first_match(self.root(), &accepts_focus) {
            Some(target) => {
                debug!("Dialog {} will focus '{}'", self.id(), target.name());
                ctx.focus_eventually(&target);
            }
            None => debug!("Dialog {} has no focusable descendant", self.id()),
        }
    }

    /// Called by the host after the dialog left the live tree
    fn on_detached(&self, ctx: &LifecycleContext<'_>) {
        let core = self.core();
        core.set_phase(DialogPhase::Detached);

        let Some(previous) = core.take_previous_focus() else {
            return;
        };
        match previous.live() {
            Some(element) => {
                if ctx.focus_manager().focus(&element) {
                    debug!("Dialog {} restored focus to '{}'", self.id(), element.name());
                } else {
                    debug!("Dialog {} could not restore focus to '{}'", self.id(), element.name());
                }
            }
            None => debug!(
                "Dialog {} skipped focus restore: {} is gone",
                self.id(),
                previous.id()
            ),
        }
    }
}
