//! Focus collaborators used by dialogs
//!
//! The dialog lifecycle only talks to the [`FocusManager`] and
//! [`DescendantFinder`] traits. [`FocusState`], [`DepthFirstFinder`] and
//! [`Node`] are in-process implementations good enough to drive a terminal UI
//! or a test.

pub mod element;
pub mod finder;
pub mod state;

pub use element::{
    attach_subtree, detach_subtree, mount, realize_subtree, Element, ElementId, ElementRef, Node,
    WeakElement,
};
pub use finder::{DepthFirstFinder, DescendantFinder};
pub use state::{FocusManager, FocusState};
