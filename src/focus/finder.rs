//! Subtree search

use super::element::{Element, ElementRef};
use std::sync::Arc;

/// Searches a UI subtree for an element matching a predicate
pub trait DescendantFinder: Send + Sync {
    /// First descendant of `root` (excluding `root`) matching `predicate`
    fn first_match(
        &self,
        root: &ElementRef,
        predicate: &dyn Fn(&dyn Element) -> bool,
    ) -> Option<ElementRef>;
}

/// Pre-order depth-first search in construction order.
///
/// The search stops at the first match anywhere in the subtree, so a match deep
/// inside an early branch wins over a shallow match in a later one.
#[derive(Debug, Default, Clone, Copy)]
pub struct DepthFirstFinder;

impl DescendantFinder for DepthFirstFinder {
    fn first_match(
        &self,
        root: &ElementRef,
        predicate: &dyn Fn(&dyn Element) -> bool,
    ) -> Option<ElementRef> {
        for child in root.children() {
            if predicate(&**child) {
                return Some(Arc::clone(child));
            }
            if let Some(found) = self.first_match(child, predicate) {
                return Some(found);
            }
        }
        None
    }
}
