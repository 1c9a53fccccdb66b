//! Arena-backed live node tree.
//!
//! Invariants:
//! - `NodeId(n)` addresses `nodes[n - 1]`; handles are never reused and
//!   detached nodes stay in the arena.
//! - A node has at most one parent and appears once in that parent's
//!   children list.
//! - Only elements have children.
//! - Tree edits never create cycles.
//!
//! Misuse of the adapter protocol (unknown handles, a `before` that is not a
//! child of `parent`, cycles, content calls on the wrong node kind) trips a
//! `debug_assert!` and is otherwise logged and ignored.

use crate::op::DomOp;
use crate::snapshot::{DomSnapshot, DomSnapshotOptions};
use core_types::{NodeId, Value};
use indexmap::{IndexMap, IndexSet};
use vdom::{DomApi, DomEvent, Listener, NodeKind};

const ROOT_TAG: &str = "body";

pub struct DomTree {
    nodes: Vec<NodeRecord>,
    root: NodeId,
    ops: Vec<DomOp>,
}

struct NodeRecord {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

pub(crate) enum NodeData {
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Default)]
pub(crate) struct ElementData {
    pub(crate) tag: String,
    pub(crate) ns: Option<String>,
    pub(crate) attrs: IndexMap<String, Attr>,
    pub(crate) classes: IndexSet<String>,
    pub(crate) props: IndexMap<String, Value>,
    pub(crate) style: IndexMap<String, String>,
    pub(crate) listeners: IndexMap<String, Listener>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Attr {
    pub(crate) ns: Option<String>,
    pub(crate) value: String,
}

impl DomTree {
    /// Tree holding only its `body` root element.
    pub fn new() -> Self {
        let root = NodeRecord {
            data: NodeData::Element(ElementData {
                tag: ROOT_TAG.to_string(),
                ..ElementData::default()
            }),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: id_for(0),
            ops: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Creates an element and appends it to the root, returning it. Mirrors
    /// a page that provides a mount point.
    pub fn mount_point(&mut self, tag: &str) -> NodeId {
        let elm = self.create_element(tag);
        self.insert_before(self.root, elm, None);
        elm
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.record(node).is_some()
    }

    /// Nodes ever created, attached or not, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.record(node)
            .map(|record| record.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.record(current).and_then(|record| record.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.element(node)
            .map(|element| element.classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.classes.contains(class))
    }

    pub fn style(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|element| element.style.get(name))
            .map(String::as_str)
    }

    pub fn attribute_ns(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|element| element.attrs.get(name))
            .and_then(|attr| attr.ns.as_deref())
    }

    pub fn namespace(&self, node: NodeId) -> Option<&str> {
        self.element(node).and_then(|element| element.ns.as_deref())
    }

    pub fn has_listener(&self, node: NodeId, event: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.listeners.contains_key(event))
    }

    /// Delivers `event` to the listener registered on its target. Returns
    /// whether a listener ran.
    pub fn dispatch(&self, event: &DomEvent) -> bool {
        let listener = self
            .element(event.target)
            .and_then(|element| element.listeners.get(&event.name))
            .cloned();
        match listener {
            Some(listener) => {
                listener(event);
                true
            }
            None => false,
        }
    }

    pub fn ops(&self) -> &[DomOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DomOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn snapshot(&self, node: NodeId) -> DomSnapshot {
        DomSnapshot::new(self, node, DomSnapshotOptions::default())
    }

    /// Snapshot of the root's children, one line per node.
    pub fn render(&self) -> String {
        self.children(self.root)
            .iter()
            .map(|&child| self.snapshot(child).render())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(crate) fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.record(node).map(|record| &record.data)
    }

    fn record(&self, node: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(index_of(node))
    }

    fn record_mut(&mut self, node: NodeId) -> Option<&mut NodeRecord> {
        self.nodes.get_mut(index_of(node))
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.data(node)? {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId, call: &str) -> Option<&mut ElementData> {
        match self.record_mut(node).map(|record| &mut record.data) {
            Some(NodeData::Element(element)) => Some(element),
            Some(_) => {
                protocol_violation(call, node, "not an element");
                None
            }
            None => {
                protocol_violation(call, node, "unknown node");
                None
            }
        }
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let node = id_for(self.nodes.len());
        self.nodes.push(NodeRecord {
            data,
            parent: None,
            children: Vec::new(),
        });
        node
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.record_mut(child).and_then(|record| record.parent.take()) else {
            return;
        };
        if let Some(record) = self.record_mut(parent) {
            record.children.retain(|&sibling| sibling != child);
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.record(id).and_then(|record| record.parent);
        }
        false
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match self.data(node) {
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Element(_)) => {
                for &child in self.children(node) {
                    self.collect_text(child, out);
                }
            }
            Some(NodeData::Comment(_)) | None => {}
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DomTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomTree")
            .field("nodes", &self.nodes.len())
            .field("ops", &self.ops.len())
            .finish()
    }
}

impl DomApi for DomTree {
    fn create_element(&mut self, tag: &str) -> NodeId {
        let node = self.push_node(NodeData::Element(ElementData {
            tag: tag.to_string(),
            ..ElementData::default()
        }));
        self.ops.push(DomOp::CreateElement {
            node,
            tag: tag.to_string(),
            ns: None,
        });
        node
    }

    fn create_element_ns(&mut self, ns: &str, tag: &str) -> NodeId {
        let node = self.push_node(NodeData::Element(ElementData {
            tag: tag.to_string(),
            ns: Some(ns.to_string()),
            ..ElementData::default()
        }));
        self.ops.push(DomOp::CreateElement {
            node,
            tag: tag.to_string(),
            ns: Some(ns.to_string()),
        });
        node
    }

    fn create_text_node(&mut self, text: &str) -> NodeId {
        let node = self.push_node(NodeData::Text(text.to_string()));
        self.ops.push(DomOp::CreateText {
            node,
            text: text.to_string(),
        });
        node
    }

    fn create_comment(&mut self, text: &str) -> NodeId {
        let node = self.push_node(NodeData::Comment(text.to_string()));
        self.ops.push(DomOp::CreateComment {
            node,
            text: text.to_string(),
        });
        node
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) {
        const CALL: &str = "insert_before";
        if !self.contains(child) {
            protocol_violation(CALL, child, "unknown child");
            return;
        }
        match self.data(parent) {
            Some(NodeData::Element(_)) => {}
            Some(_) => return protocol_violation(CALL, parent, "parent cannot have children"),
            None => return protocol_violation(CALL, parent, "unknown parent"),
        }
        if self.is_ancestor_or_self(child, parent) {
            return protocol_violation(CALL, child, "insertion would create a cycle");
        }
        if let Some(before) = before {
            if before == child {
                return;
            }
            if self.record(before).and_then(|record| record.parent) != Some(parent) {
                return protocol_violation(CALL, before, "reference node is not a child of parent");
            }
        }

        let moved = self
            .record(child)
            .is_some_and(|record| record.parent.is_some());
        self.detach(child);
        let Some(record) = self.record_mut(parent) else {
            return;
        };
        let pos = before
            .and_then(|before| record.children.iter().position(|&sibling| sibling == before))
            .unwrap_or(record.children.len());
        record.children.insert(pos, child);
        if let Some(record) = self.record_mut(child) {
            record.parent = Some(parent);
        }
        self.ops.push(DomOp::InsertBefore {
            parent,
            child,
            before,
            moved,
        });
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.record(child).and_then(|record| record.parent) != Some(parent) {
            return protocol_violation("remove_child", child, "not a child of parent");
        }
        self.detach(child);
        self.ops.push(DomOp::RemoveChild { parent, child });
    }

    fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.record(node).and_then(|record| record.parent)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent_node(node)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&sibling| sibling == node)?;
        siblings.get(pos + 1).copied()
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).first().copied()
    }

    fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.data(node).map(|data| match data {
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
        })
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.element(node).map(|element| element.tag.clone())
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        match self.node_kind(node) {
            None => return protocol_violation("set_text_content", node, "unknown node"),
            Some(NodeKind::Element) => {
                let children = self
                    .record_mut(node)
                    .map(|record| std::mem::take(&mut record.children))
                    .unwrap_or_default();
                for child in children {
                    if let Some(record) = self.record_mut(child) {
                        record.parent = None;
                    }
                }
                if !text.is_empty() {
                    let text_node = self.push_node(NodeData::Text(text.to_string()));
                    if let Some(record) = self.record_mut(text_node) {
                        record.parent = Some(node);
                    }
                    if let Some(record) = self.record_mut(node) {
                        record.children.push(text_node);
                    }
                }
            }
            Some(NodeKind::Text | NodeKind::Comment) => {
                if let Some(NodeData::Text(existing) | NodeData::Comment(existing)) =
                    self.record_mut(node).map(|record| &mut record.data)
                {
                    existing.clear();
                    existing.push_str(text);
                }
            }
        }
        self.ops.push(DomOp::SetText {
            node,
            text: text.to_string(),
        });
    }

    fn text_content(&self, node: NodeId) -> Option<String> {
        match self.data(node)? {
            NodeData::Text(text) | NodeData::Comment(text) => Some(text.clone()),
            NodeData::Element(_) => {
                let mut out = String::new();
                self.collect_text(node, &mut out);
                Some(out)
            }
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self.element_mut(node, "set_attribute") else {
            return;
        };
        if name == "class" {
            element.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            element.attrs.insert(
                name.to_string(),
                Attr {
                    ns: None,
                    value: value.to_string(),
                },
            );
        }
        self.ops.push(DomOp::SetAttribute {
            node,
            ns: None,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn set_attribute_ns(&mut self, node: NodeId, ns: &str, name: &str, value: &str) {
        let Some(element) = self.element_mut(node, "set_attribute_ns") else {
            return;
        };
        element.attrs.insert(
            name.to_string(),
            Attr {
                ns: Some(ns.to_string()),
                value: value.to_string(),
            },
        );
        self.ops.push(DomOp::SetAttribute {
            node,
            ns: Some(ns.to_string()),
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let Some(element) = self.element_mut(node, "remove_attribute") else {
            return;
        };
        if name == "class" {
            element.classes.clear();
        } else {
            element.attrs.shift_remove(name);
        }
        self.ops.push(DomOp::RemoveAttribute {
            node,
            name: name.to_string(),
        });
    }

    fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let element = self.element(node)?;
        if name == "class" {
            if element.classes.is_empty() {
                return None;
            }
            let joined: Vec<&str> = element.classes.iter().map(String::as_str).collect();
            return Some(joined.join(" "));
        }
        element.attrs.get(name).map(|attr| attr.value.clone())
    }

    fn set_property(&mut self, node: NodeId, name: &str, value: &Value) {
        let Some(element) = self.element_mut(node, "set_property") else {
            return;
        };
        element.props.insert(name.to_string(), value.clone());
        self.ops.push(DomOp::SetProperty {
            node,
            name: name.to_string(),
            value: value.clone(),
        });
    }

    fn remove_property(&mut self, node: NodeId, name: &str) {
        let Some(element) = self.element_mut(node, "remove_property") else {
            return;
        };
        element.props.shift_remove(name);
        self.ops.push(DomOp::RemoveProperty {
            node,
            name: name.to_string(),
        });
    }

    fn get_property(&self, node: NodeId, name: &str) -> Option<Value> {
        self.element(node)?.props.get(name).cloned()
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let Some(element) = self.element_mut(node, "add_class") else {
            return;
        };
        element.classes.insert(class.to_string());
        self.ops.push(DomOp::AddClass {
            node,
            class: class.to_string(),
        });
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        let Some(element) = self.element_mut(node, "remove_class") else {
            return;
        };
        element.classes.shift_remove(class);
        self.ops.push(DomOp::RemoveClass {
            node,
            class: class.to_string(),
        });
    }

    fn set_style(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self.element_mut(node, "set_style") else {
            return;
        };
        if value.is_empty() {
            element.style.shift_remove(name);
        } else {
            element.style.insert(name.to_string(), value.to_string());
        }
        self.ops.push(DomOp::SetStyle {
            node,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn remove_style(&mut self, node: NodeId, name: &str) {
        let Some(element) = self.element_mut(node, "remove_style") else {
            return;
        };
        element.style.shift_remove(name);
        self.ops.push(DomOp::RemoveStyle {
            node,
            name: name.to_string(),
        });
    }

    fn add_event_listener(&mut self, node: NodeId, event: &str, listener: Listener) {
        let Some(element) = self.element_mut(node, "add_event_listener") else {
            return;
        };
        element.listeners.insert(event.to_string(), listener);
        self.ops.push(DomOp::AddListener {
            node,
            event: event.to_string(),
        });
    }

    fn remove_event_listener(&mut self, node: NodeId, event: &str) {
        let Some(element) = self.element_mut(node, "remove_event_listener") else {
            return;
        };
        element.listeners.shift_remove(event);
        self.ops.push(DomOp::RemoveListener {
            node,
            event: event.to_string(),
        });
    }
}

fn protocol_violation(call: &str, node: NodeId, what: &str) {
    log::warn!(target: "dom.tree", "{call}: {what} ({node})");
    debug_assert!(false, "{call}: {what} ({node})");
}

fn id_for(index: usize) -> NodeId {
    let raw = u32::try_from(index + 1).unwrap_or(u32::MAX);
    NodeId::from_raw(raw).unwrap_or(NodeId::MIN)
}

fn index_of(node: NodeId) -> usize {
    node.as_raw() as usize - 1
}
