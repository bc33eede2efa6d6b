//! Application-wide keyboard focus

use super::element::{Element, ElementRef, WeakElement};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Query and move the application's keyboard focus
pub trait FocusManager: Send + Sync {
    /// The element that currently has focus, if it is still live
    fn focused_element(&self) -> Option<ElementRef>;

    /// Ask for `element` to receive focus. Returns `false` when the request
    /// was refused, e.g. the element is not laid out yet.
    fn focus(&self, element: &ElementRef) -> bool;
}

/// In-process focus tracker.
///
/// Holds the focus target weakly so a focused element can still be dropped.
#[derive(Default)]
pub struct FocusState {
    focused: Mutex<Option<WeakElement>>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        *self.focused.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl FocusManager for FocusState {
    fn focused_element(&self) -> Option<ElementRef> {
        self.focused
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(WeakElement::live)
    }

    fn focus(&self, element: &ElementRef) -> bool {
        if !element.is_realized() {
            debug!("Focus refused for '{}': not laid out", element.name());
            return false;
        }
        if !element.accepts_focus() {
            debug!("Focus refused for '{}': not focusable", element.name());
            return false;
        }

        *self.focused.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(WeakElement::new(element));
        debug!("Focused '{}' ({})", element.name(), element.id());
        true
    }
}

impl std::fmt::Debug for FocusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusState")
            .field(
                "focused",
                &*self.focused.lock().unwrap_or_else(PoisonError::into_inner),
            )
            .finish()
    }
}
