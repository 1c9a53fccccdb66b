//! Descriptor builder.
//!
//! `h(sel, data, children)` parses the selector and, for `svg` trees,
//! assigns the SVG namespace. Selector classes stay on the selector and are
//! written when the element is created; `data.class` only toggles.

use crate::dom_api::SVG_NS;
use crate::error::{Result, VdomError};
use crate::selector::Selector;
use crate::vnode::{Key, RenderFn, Thunk, VNode, VNodeData, ensure_unique_keys};
use core_types::Value;

/// One entry of a children list.
#[derive(Debug)]
pub enum Child {
    Node(VNode),
    Text(String),
    Skip,
}

impl From<VNode> for Child {
    fn from(value: VNode) -> Self {
        Child::Node(value)
    }
}

impl From<Option<VNode>> for Child {
    fn from(value: Option<VNode>) -> Self {
        value.map_or(Child::Skip, Child::Node)
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child::Text(value.to_string())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child::Text(value)
    }
}

/// Third argument of [`h`].
#[derive(Debug)]
pub enum Children {
    Empty,
    Text(String),
    Nodes(Vec<VNode>),
}

impl Children {
    /// Flattens a list, dropping skipped entries and turning strings into
    /// text descriptors.
    pub fn list(items: impl IntoIterator<Item = Child>) -> Self {
        let nodes = items
            .into_iter()
            .filter_map(|child| match child {
                Child::Node(node) => Some(node),
                Child::Text(text) => Some(VNode::text_node(text)),
                Child::Skip => None,
            })
            .collect();
        Children::Nodes(nodes)
    }
}

impl From<()> for Children {
    fn from(_: ()) -> Self {
        Children::Empty
    }
}

impl From<&str> for Children {
    fn from(value: &str) -> Self {
        Children::Text(value.to_string())
    }
}

impl From<String> for Children {
    fn from(value: String) -> Self {
        Children::Text(value)
    }
}

impl From<i64> for Children {
    fn from(value: i64) -> Self {
        Children::Text(value.to_string())
    }
}

impl From<f64> for Children {
    fn from(value: f64) -> Self {
        Children::Text(Value::Float(value).to_string())
    }
}

impl From<VNode> for Children {
    fn from(value: VNode) -> Self {
        Children::Nodes(vec![value])
    }
}

impl From<Vec<VNode>> for Children {
    fn from(value: Vec<VNode>) -> Self {
        Children::Nodes(value)
    }
}

impl From<Vec<Option<VNode>>> for Children {
    fn from(value: Vec<Option<VNode>>) -> Self {
        Children::list(value.into_iter().map(Child::from))
    }
}

impl From<Vec<Child>> for Children {
    fn from(value: Vec<Child>) -> Self {
        Children::list(value)
    }
}

pub fn h(sel: &str, data: VNodeData, children: impl Into<Children>) -> VNode {
    let (children, text) = match children.into() {
        Children::Empty => (None, None),
        Children::Text(text) => (None, Some(text)),
        Children::Nodes(nodes) => (Some(nodes), None),
    };
    assemble(sel, data, children, text)
}

/// Fresh descriptor instance with the same content as `node`.
pub fn h_node(node: &VNode) -> VNode {
    node.clone()
}

/// Descriptor whose subtree is produced by `render(args)` on first use and
/// reused without any host work while later renders pass the same `render`
/// and equal `args`.
pub fn thunk(sel: &str, key: impl Into<Key>, args: Vec<Value>, render: RenderFn) -> VNode {
    let mut data = VNodeData::new().key(key);
    data.thunk = Some(Thunk {
        render,
        args,
        expanded: false,
    });
    VNode::new(Some(Selector::parse(sel)), data, None, None)
}

fn assemble(
    sel: &str,
    data: VNodeData,
    children: Option<Vec<VNode>>,
    text: Option<String>,
) -> VNode {
    let mut node = VNode::new(Some(Selector::parse(sel)), data, children, text);
    if node.tag() == Some("svg") {
        add_svg_ns(&mut node);
    }
    node
}

fn add_svg_ns(node: &mut VNode) {
    if node.is_text() {
        return;
    }
    node.data.ns = Some(SVG_NS.to_string());
    if node.tag() == Some("foreignObject") {
        return;
    }
    if let Some(children) = node.children.as_mut() {
        for child in children {
            add_svg_ns(child);
        }
    }
}

/// Fallible builder that rejects ill-shaped descriptors up front.
#[derive(Debug)]
pub struct VNodeBuilder {
    sel: String,
    data: VNodeData,
    text: Option<String>,
    children: Option<Vec<VNode>>,
}

impl VNodeBuilder {
    pub fn new(sel: impl Into<String>) -> Self {
        Self {
            sel: sel.into(),
            data: VNodeData::default(),
            text: None,
            children: None,
        }
    }

    pub fn data(mut self, data: VNodeData) -> Self {
        self.data = data;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: impl Into<Child>) -> Self {
        let node = match child.into() {
            Child::Node(node) => node,
            Child::Text(text) => VNode::text_node(text),
            Child::Skip => return self,
        };
        self.children.get_or_insert_with(Vec::new).push(node);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = VNode>) -> Self {
        self.children
            .get_or_insert_with(Vec::new)
            .extend(children);
        self
    }

    pub fn build(self) -> Result<VNode> {
        if self.text.is_some() && self.children.is_some() {
            return Err(VdomError::InvalidVNodeShape {
                reason: format!("{} given both text and children", self.sel),
            });
        }
        if let Some(children) = &self.children {
            ensure_unique_keys(children)?;
        }
        Ok(assemble(&self.sel, self.data, self.children, self.text))
    }
}
