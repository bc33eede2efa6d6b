//! UI elements and non-owning element references

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Process-unique element identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared handle to a live UI element
pub type ElementRef = Arc<dyn Element>;

/// A node of the UI tree as seen by focus handling.
///
/// `attached` means the node is part of the live tree. `realized` means it has
/// been through a layout pass and can actually take focus.
pub trait Element: Send + Sync {
    fn id(&self) -> ElementId;

    /// Debug name
    fn name(&self) -> &str;

    fn is_focusable(&self) -> bool;

    fn is_enabled(&self) -> bool {
        true
    }

    /// Children in construction order
    fn children(&self) -> &[ElementRef];

    fn is_attached(&self) -> bool;

    fn set_attached(&self, attached: bool);

    /// Elements without their own layout state count as realized while
    /// attached.
    fn is_realized(&self) -> bool {
        self.is_attached()
    }

    /// Record the result of a layout pass. Elements that derive realization
    /// from attachment have nothing to store.
    fn set_realized(&self, _realized: bool) {}

    /// Whether this element can receive keyboard focus right now
    fn accepts_focus(&self) -> bool {
        self.is_focusable() && self.is_enabled()
    }
}

/// Back-reference to an element that never extends its lifetime
#[derive(Clone)]
pub struct WeakElement {
    id: ElementId,
    inner: Weak<dyn Element>,
}

impl WeakElement {
    pub fn new(element: &ElementRef) -> Self {
        Self {
            id: element.id(),
            inner: Arc::downgrade(element),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The element, if it has not been dropped
    pub fn upgrade(&self) -> Option<ElementRef> {
        self.inner.upgrade()
    }

    /// The element, if it is still alive and attached to the tree
    pub fn live(&self) -> Option<ElementRef> {
        self.upgrade().filter(|element| element.is_attached())
    }

    pub fn refers_to(&self, element: &ElementRef) -> bool {
        self.id == element.id()
    }
}

impl std::fmt::Debug for WeakElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakElement")
            .field("id", &self.id)
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Basic element used for dialog content and background widgets
pub struct Node {
    id: ElementId,
    name: String,
    focusable: bool,
    enabled: AtomicBool,
    attached: AtomicBool,
    realized: AtomicBool,
    children: Vec<ElementRef>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ElementId::next(),
            name: name.into(),
            focusable: false,
            enabled: AtomicBool::new(true),
            attached: AtomicBool::new(false),
            realized: AtomicBool::new(false),
            children: Vec::new(),
        }
    }

    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    pub fn enabled(self, enabled: bool) -> Self {
        self.set_enabled(enabled);
        self
    }

    pub fn with_child(mut self, child: ElementRef) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = ElementRef>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn into_ref(self) -> ElementRef {
        Arc::new(self)
    }
}

impl Element for Node {
    fn id(&self) -> ElementId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_focusable(&self) -> bool {
        self.focusable
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn children(&self) -> &[ElementRef] {
        &self.children
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    fn set_attached(&self, attached: bool) {
        self.attached.store(attached, Ordering::SeqCst);
    }

    fn is_realized(&self) -> bool {
        self.is_attached() && self.realized.load(Ordering::SeqCst)
    }

    fn set_realized(&self, realized: bool) {
        self.realized.store(realized, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("focusable", &self.focusable)
            .field("enabled", &self.is_enabled())
            .field("attached", &self.is_attached())
            .field("children", &self.children.len())
            .finish()
    }
}

fn visit(root: &ElementRef, f: &dyn Fn(&dyn Element)) {
    f(&**root);
    for child in root.children() {
        visit(child, f);
    }
}

/// Mark a subtree as part of the live tree
pub fn attach_subtree(root: &ElementRef) {
    visit(root, &|element: &dyn Element| element.set_attached(true));
}

/// Mark a subtree as laid out
pub fn realize_subtree(root: &ElementRef) {
    visit(root, &|element: &dyn Element| element.set_realized(true));
}

/// Remove a subtree from the live tree
pub fn detach_subtree(root: &ElementRef) {
    visit(root, &|element: &dyn Element| {
        element.set_realized(false);
        element.set_attached(false);
    });
}

/// Attach and realize a subtree in one step
pub fn mount(root: &ElementRef) {
    attach_subtree(root);
    realize_subtree(root);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids_are_unique() {
        let a = Node::new("a");
        let b = Node::new("b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_weak_element_does_not_keep_element_alive() {
        let element = Node::new("button").focusable(true).into_ref();
        let weak = WeakElement::new(&element);
        mount(&element);

        assert!(weak.live().is_some());
        drop(element);
        assert!(weak.upgrade().is_none());
        assert!(weak.live().is_none());
    }

    #[test]
    fn test_weak_element_live_requires_attachment() {
        let element = Node::new("button").into_ref();
        let weak = WeakElement::new(&element);

        assert!(weak.upgrade().is_some());
        assert!(weak.live().is_none());

        mount(&element);
        assert!(weak.live().is_some());
        assert!(weak.refers_to(&element));

        detach_subtree(&element);
        assert!(weak.live().is_none());
    }

    #[test]
    fn test_mount_marks_whole_subtree() {
        let leaf = Node::new("leaf").into_ref();
        let branch = Node::new("branch").with_child(Arc::clone(&leaf)).into_ref();
        let root = Node::new("root").with_child(Arc::clone(&branch)).into_ref();

        attach_subtree(&root);
        assert!(leaf.is_attached());
        assert!(!leaf.is_realized());

        realize_subtree(&root);
        assert!(leaf.is_realized());

        detach_subtree(&root);
        assert!(!branch.is_attached());
        assert!(!leaf.is_realized());
    }

    #[test]
    fn test_accepts_focus_requires_enabled() {
        let node = Arc::new(Node::new("input").focusable(true));
        assert!(node.accepts_focus());

        node.set_enabled(false);
        assert!(!node.accepts_focus());
        assert!(!Node::new("label").accepts_focus());
    }

    struct Label {
        id: ElementId,
        attached: AtomicBool,
    }

    impl Element for Label {
        fn id(&self) -> ElementId {
            self.id
        }

        fn name(&self) -> &str {
            "label"
        }

        fn is_focusable(&self) -> bool {
            false
        }

        fn children(&self) -> &[ElementRef] {
            &[]
        }

        fn is_attached(&self) -> bool {
            self.attached.load(Ordering::SeqCst)
        }

        fn set_attached(&self, attached: bool) {
            self.attached.store(attached, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_default_realization_follows_attachment() {
        let label: ElementRef = Arc::new(Label {
            id: ElementId::next(),
            attached: AtomicBool::new(false),
        });

        attach_subtree(&label);
        assert!(label.is_realized());

        label.set_realized(false);
        assert!(label.is_realized());

        detach_subtree(&label);
        assert!(!label.is_realized());
    }
}
