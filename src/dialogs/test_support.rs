//! Shared fixtures for dialog tests

use super::base::{Dialog, DialogCore};
use super::host::{DialogHost, Host};
use super::result::ResultDialog;
use super::types::{CloseOutcome, DialogId, DialogResult, Payload};
use crate::focus::{mount, Element, ElementRef, FocusManager, FocusState, Node};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Responder = Box<dyn Fn() -> Payload + Send + Sync>;

/// Host that records requests instead of showing anything
#[derive(Default)]
pub(crate) struct RecordingHost {
    requests: Mutex<Vec<(DialogId, bool)>>,
    shown: Mutex<Vec<DialogId>>,
    responder: Mutex<Option<Responder>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `show` resolve immediately with the payload built by `responder`
    pub fn respond_with(&self, responder: impl Fn() -> Payload + Send + Sync + 'static) {
        *self.responder.lock().unwrap() = Some(Box::new(responder));
    }

    /// Close requests as `(dialog, had_payload)`
    pub fn requests(&self) -> Vec<(DialogId, bool)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn shown(&self) -> Vec<DialogId> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl Host for RecordingHost {
    async fn show(&self, dialog: Arc<dyn Dialog>) -> DialogResult<Option<Payload>> {
        self.shown.lock().unwrap().push(dialog.id());
        let payload = self.responder.lock().unwrap().as_ref().map(|respond| respond());
        Ok(payload)
    }

    fn close(&self, id: DialogId, payload: Option<Payload>) -> CloseOutcome {
        self.requests.lock().unwrap().push((id, payload.is_some()));
        CloseOutcome::Closed
    }
}

/// Dialog with a configurable veto and result type
pub(crate) struct TestDialog<T> {
    core: DialogCore,
    root: ElementRef,
    allow_close: AtomicBool,
    closing_queries: AtomicUsize,
    _output: PhantomData<fn() -> T>,
}

impl<T> TestDialog<T> {
    /// Dialog whose only child is a label
    pub fn empty(host: Arc<dyn Host>) -> Self {
        let root = Node::new("dialog")
            .with_child(Node::new("message").into_ref())
            .into_ref();
        Self::with_root(host, root)
    }

    /// Label followed by "ok" and "cancel" buttons
    pub fn with_buttons(host: Arc<dyn Host>) -> Self {
        let root = Node::new("dialog")
            .with_children([
                Node::new("message").into_ref(),
                Node::new("ok").focusable(true).into_ref(),
                Node::new("cancel").focusable(true).into_ref(),
            ])
            .into_ref();
        Self::with_root(host, root)
    }

    pub fn with_root(host: Arc<dyn Host>, root: ElementRef) -> Self {
        Self {
            core: DialogCore::new(host),
            root,
            allow_close: AtomicBool::new(true),
            closing_queries: AtomicUsize::new(0),
            _output: PhantomData,
        }
    }

    pub fn set_allow_close(&self, allow: bool) {
        self.allow_close.store(allow, Ordering::SeqCst);
    }

    /// How many times the host asked `on_closing`
    pub fn closing_queries(&self) -> usize {
        self.closing_queries.load(Ordering::SeqCst)
    }
}

impl<T: Send + 'static> Dialog for TestDialog<T> {
    fn core(&self) -> &DialogCore {
        &self.core
    }

    fn root(&self) -> &ElementRef {
        &self.root
    }

    fn on_closing(&self) -> bool {
        self.closing_queries.fetch_add(1, Ordering::SeqCst);
        self.allow_close.load(Ordering::SeqCst)
    }
}

impl<T: Send + 'static> ResultDialog for TestDialog<T> {
    type Output = T;
}

/// A host over a mounted background with "editor" focused
pub(crate) struct Fixture {
    pub focus: Arc<FocusState>,
    pub host: Arc<DialogHost>,
    pub editor: ElementRef,
    _background: ElementRef,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_host(|host| host)
    }

    pub fn with_host(configure: impl FnOnce(DialogHost) -> DialogHost) -> Self {
        let focus = Arc::new(FocusState::new());
        let host = Arc::new(configure(DialogHost::new(focus.clone())));

        let editor = Node::new("editor").focusable(true).into_ref();
        let background = Node::new("workspace")
            .with_children([Node::new("sidebar").into_ref(), Arc::clone(&editor)])
            .into_ref();
        mount(&background);
        assert!(focus.focus(&editor));

        Self {
            focus,
            host,
            editor,
            _background: background,
        }
    }

    pub fn focused_name(&self) -> Option<String> {
        self.focus
            .focused_element()
            .map(|element| element.name().to_string())
    }
}
