//! Deferred removal bookkeeping.
//!
//! Every removed element gets a private pending counter initialized to the
//! number of remove listeners (one per module plus the node's own hook, or
//! the engine's implicit completion when the node has none). Each listener
//! receives a [`RemoveCallback`]; when the counter reaches zero the removal
//! is queued as ready. Ready removals are detached and destroyed by the
//! engine at its next flush point.

use crate::error::VdomError;
use crate::vnode::VNode;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

pub(crate) type ReadyQueue = Rc<RefCell<Vec<Rc<Removal>>>>;

pub(crate) struct Removal {
    pub(crate) vnode: VNode,
    remaining: Cell<usize>,
    ready: Weak<RefCell<Vec<Rc<Removal>>>>,
}

impl Removal {
    pub(crate) fn new(vnode: VNode, listeners: usize, ready: &ReadyQueue) -> Rc<Self> {
        Rc::new(Self {
            vnode,
            remaining: Cell::new(listeners),
            ready: Rc::downgrade(ready),
        })
    }

    pub(crate) fn callback(self: &Rc<Self>) -> RemoveCallback {
        RemoveCallback {
            removal: Some(Rc::clone(self)),
        }
    }

    fn complete_one(self: Rc<Self>) {
        let left = self.remaining.get().saturating_sub(1);
        self.remaining.set(left);
        if left > 0 {
            return;
        }
        log::trace!(target: "vdom.remove", "removal of {} ready", self.vnode.describe());
        if let Some(ready) = self.ready.upgrade() {
            ready.borrow_mut().push(self);
        }
    }
}

/// Completion signal handed to `remove` hooks.
///
/// Consuming `done` signals that detachment may proceed. Dropping the
/// callback without calling `done` leaks the removal: the node stays
/// attached and `destroy` never fires. That case is logged.
pub struct RemoveCallback {
    removal: Option<Rc<Removal>>,
}

impl RemoveCallback {
    pub fn done(mut self) {
        if let Some(removal) = self.removal.take() {
            removal.complete_one();
        }
    }
}

impl Drop for RemoveCallback {
    fn drop(&mut self) {
        if let Some(removal) = self.removal.take() {
            log::warn!(
                target: "vdom.remove",
                "{} ({})",
                VdomError::RemovalCallbackNotInvoked,
                removal.vnode.describe()
            );
        }
    }
}

impl fmt::Debug for RemoveCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoveCallback")
            .field("pending", &self.removal.is_some())
            .finish()
    }
}

/// Removals started but not yet flushed, owned by one engine instance.
pub(crate) struct RemovalQueue {
    ready: ReadyQueue,
    started: Cell<usize>,
}

impl RemovalQueue {
    pub(crate) fn new() -> Self {
        Self {
            ready: Rc::new(RefCell::new(Vec::new())),
            started: Cell::new(0),
        }
    }

    pub(crate) fn start(&self, vnode: VNode, listeners: usize) -> Rc<Removal> {
        self.started.set(self.started.get() + 1);
        Removal::new(vnode, listeners, &self.ready)
    }

    pub(crate) fn take_ready(&self) -> Vec<Rc<Removal>> {
        let ready = std::mem::take(&mut *self.ready.borrow_mut());
        self.started
            .set(self.started.get().saturating_sub(ready.len()));
        ready
    }

    /// Removals whose callbacks have not all fired yet, plus ready ones not
    /// flushed yet.
    pub(crate) fn pending(&self) -> usize {
        self.started.get()
    }
}
