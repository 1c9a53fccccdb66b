#![allow(dead_code)]

use dom::{DomOp, DomTree};
use std::cell::RefCell;
use std::rc::Rc;
use vdom::{DomApi, Module, NodeId, RemoveCallback, VNode, VNodeData, Vdom, h, modules};

/// Engine with every bundled module over a fresh tree, plus an empty `div`
/// mount point attached to the root. The op log starts empty.
pub fn engine() -> (Vdom<DomTree>, NodeId) {
    engine_with(modules::all())
}

pub fn engine_with(modules: Vec<Box<dyn Module>>) -> (Vdom<DomTree>, NodeId) {
    let mut tree = DomTree::new();
    let mount = tree.mount_point("div");
    tree.clear_ops();
    (vdom::init(modules, tree), mount)
}

pub fn keyed_item(key: &str) -> VNode {
    h("li", VNodeData::new().key(key), key)
}

pub fn keyed_list(keys: &[&str]) -> VNode {
    h(
        "ul",
        VNodeData::new(),
        keys.iter().map(|key| keyed_item(key)).collect::<Vec<_>>(),
    )
}

/// Text content of every child of `node`, in live order.
pub fn child_texts(tree: &DomTree, node: NodeId) -> Vec<String> {
    tree.children(node)
        .iter()
        .map(|&child| tree.text_content(child).unwrap_or_default())
        .collect()
}

pub fn count_ops(ops: &[DomOp], pred: impl Fn(&DomOp) -> bool) -> usize {
    ops.iter().filter(|&op| pred(op)).count()
}

pub fn created_tags(ops: &[DomOp], tag: &str) -> usize {
    count_ops(ops, |op| matches!(op, DomOp::CreateElement { tag: t, .. } if t == tag))
}

/// Shared event log for hook and module ordering assertions.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Module that journals every hook it receives as `name:hook[:tag]`.
pub struct Recorder {
    pub name: &'static str,
    pub journal: Journal,
}

impl Recorder {
    fn tagged(&self, hook: &str, vnode: &VNode) {
        let tag = vnode.tag().unwrap_or("#text");
        self.journal.push(format!("{}:{hook}:{tag}", self.name));
    }
}

impl Module for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn pre(&self, _dom: &mut dyn DomApi) {
        self.journal.push(format!("{}:pre", self.name));
    }

    fn create(&self, _dom: &mut dyn DomApi, _empty: &VNode, vnode: &VNode) {
        self.tagged("create", vnode);
    }

    fn update(&self, _dom: &mut dyn DomApi, _old: &VNode, vnode: &VNode) {
        self.tagged("update", vnode);
    }

    fn remove(&self, _dom: &mut dyn DomApi, vnode: &VNode, done: RemoveCallback) {
        self.tagged("remove", vnode);
        done.done();
    }

    fn destroy(&self, _dom: &mut dyn DomApi, vnode: &VNode) {
        self.tagged("destroy", vnode);
    }

    fn post(&self, _dom: &mut dyn DomApi) {
        self.journal.push(format!("{}:post", self.name));
    }
}
