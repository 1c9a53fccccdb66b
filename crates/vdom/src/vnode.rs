//! Node descriptors.
//!
//! Invariants:
//! - At most one of `children` and `text` is present; neither means an
//!   empty element.
//! - Keys are unique among siblings that declare one.
//! - `elm` is written by the reconciler once per descriptor instance and is
//!   a non-owning handle into the host. Cloning a descriptor produces a new
//!   instance with no live node.

use crate::dom_api::DomEvent;
use crate::error::{Result, VdomError};
use crate::hooks::Hooks;
use crate::selector::Selector;
use core_types::{NodeId, Value};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Caller-supplied identity hint. `Num(1)` and `Str("1")` are distinct keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Str(String),
    Num(i64),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) => f.write_str(s),
            Key::Num(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Num(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Num(i64::from(value))
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Key::Num(i64::from(value))
    }
}

/// Entry of the `on` namespace.
#[derive(Clone)]
pub enum EventHandler {
    Plain(Rc<dyn Fn(&DomEvent)>),
    /// Handler called with the bound arguments ahead of the event.
    Bound(Rc<dyn Fn(&[Value], &DomEvent)>, Vec<Value>),
}

impl EventHandler {
    pub fn invoke(&self, event: &DomEvent) {
        match self {
            EventHandler::Plain(f) => f(event),
            EventHandler::Bound(f, args) => f(args, event),
        }
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventHandler::Plain(_) => f.write_str("Plain(..)"),
            EventHandler::Bound(_, args) => f.debug_tuple("Bound").field(args).finish(),
        }
    }
}

/// The `style` namespace.
///
/// `delayed` entries are applied one frame after the main map, `remove`
/// entries when removal of the node starts, `destroy` entries when it is
/// destroyed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    pub props: IndexMap<String, String>,
    pub delayed: IndexMap<String, String>,
    pub remove: IndexMap<String, String>,
    pub destroy: IndexMap<String, String>,
}

impl Style {
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
            && self.delayed.is_empty()
            && self.remove.is_empty()
            && self.destroy.is_empty()
    }
}

pub type RenderFn = fn(&[Value]) -> VNode;

/// Lazily rendered subtree, reused as-is while `render` and `args` match.
#[derive(Clone)]
pub struct Thunk {
    pub(crate) render: RenderFn,
    pub args: Vec<Value>,
    pub(crate) expanded: bool,
}

impl Thunk {
    pub(crate) fn matches(&self, other: &Thunk) -> bool {
        self.render as usize == other.render as usize && self.args == other.args
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thunk")
            .field("args", &self.args)
            .field("expanded", &self.expanded)
            .finish()
    }
}

/// Namespaced data bag of a descriptor.
#[derive(Clone, Debug, Default)]
pub struct VNodeData {
    pub key: Option<Key>,
    pub ns: Option<String>,
    pub class: IndexMap<String, bool>,
    pub props: IndexMap<String, Value>,
    pub attrs: IndexMap<String, Value>,
    pub style: Style,
    pub on: IndexMap<String, EventHandler>,
    pub hook: Hooks,
    pub(crate) thunk: Option<Thunk>,
}

impl VNodeData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn ns(mut self, ns: impl Into<String>) -> Self {
        self.ns = Some(ns.into());
        self
    }

    pub fn class(mut self, name: impl Into<String>, active: bool) -> Self {
        self.class.insert(name.into(), active);
        self
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.props.insert(name.into(), value.into());
        self
    }

    pub fn delayed_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.delayed.insert(name.into(), value.into());
        self
    }

    pub fn remove_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.remove.insert(name.into(), value.into());
        self
    }

    pub fn destroy_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.destroy.insert(name.into(), value.into());
        self
    }

    pub fn on(mut self, event: impl Into<String>, f: impl Fn(&DomEvent) + 'static) -> Self {
        self.on.insert(event.into(), EventHandler::Plain(Rc::new(f)));
        self
    }

    pub fn on_bound(
        mut self,
        event: impl Into<String>,
        f: impl Fn(&[Value], &DomEvent) + 'static,
        args: Vec<Value>,
    ) -> Self {
        self.on
            .insert(event.into(), EventHandler::Bound(Rc::new(f), args));
        self
    }

    pub fn hook(mut self, hooks: Hooks) -> Self {
        self.hook = hooks;
        self
    }

    pub fn is_thunk(&self) -> bool {
        self.thunk.is_some()
    }
}

/// One point of the desired tree.
#[derive(Debug)]
pub struct VNode {
    /// `None` for text nodes.
    pub sel: Option<Selector>,
    pub data: VNodeData,
    pub children: Option<Vec<VNode>>,
    pub text: Option<String>,
    pub(crate) elm: Option<NodeId>,
    pub(crate) insert_pending: bool,
}

impl Clone for VNode {
    fn clone(&self) -> Self {
        Self {
            sel: self.sel.clone(),
            data: self.data.clone(),
            children: self.children.clone(),
            text: self.text.clone(),
            elm: None,
            insert_pending: false,
        }
    }
}

impl VNode {
    pub fn new(
        sel: Option<Selector>,
        data: VNodeData,
        children: Option<Vec<VNode>>,
        text: Option<String>,
    ) -> Self {
        Self {
            sel,
            data,
            children,
            text,
            elm: None,
            insert_pending: false,
        }
    }

    pub fn text_node(text: impl Into<String>) -> Self {
        Self::new(None, VNodeData::default(), None, Some(text.into()))
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(
            Some(Selector::parse(crate::selector::COMMENT_TAG)),
            VNodeData::default(),
            None,
            Some(text.into()),
        )
    }

    /// Descriptor for an already-live node, used as the old side of a patch.
    pub(crate) fn bound(sel: Option<Selector>, text: Option<String>, elm: NodeId) -> Self {
        let mut node = Self::new(sel, VNodeData::default(), None, text);
        node.elm = Some(elm);
        node
    }

    pub(crate) fn empty() -> Self {
        Self::new(
            Some(Selector {
                tag: String::new(),
                id: None,
                classes: Vec::new(),
            }),
            VNodeData::default(),
            None,
            None,
        )
    }

    /// Live node bound by the last patch that processed this descriptor.
    pub fn elm(&self) -> Option<NodeId> {
        self.elm
    }

    /// Identity hint, read from `data.key`.
    pub fn key(&self) -> Option<&Key> {
        self.data.key.as_ref()
    }

    pub fn is_text(&self) -> bool {
        self.sel.is_none()
    }

    pub fn is_comment(&self) -> bool {
        self.sel.as_ref().is_some_and(Selector::is_comment)
    }

    pub fn tag(&self) -> Option<&str> {
        self.sel.as_ref().map(|sel| sel.tag.as_str())
    }

    pub fn children(&self) -> &[VNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Checks text/children exclusivity and sibling key uniqueness for this
    /// node and its direct children.
    pub fn validate_shape(&self) -> Result<()> {
        if self.text.is_some() && self.children.is_some() {
            return Err(VdomError::shape(format!(
                "{} has both text and children",
                self.describe()
            )));
        }
        if self.is_text() && self.children.is_some() {
            return Err(VdomError::shape("text node with children"));
        }
        if let Some(children) = &self.children {
            ensure_unique_keys(children)?;
        }
        Ok(())
    }

    pub(crate) fn describe(&self) -> String {
        match (&self.sel, self.key()) {
            (Some(sel), Some(key)) => format!("<{sel} key={key}>"),
            (Some(sel), None) => format!("<{sel}>"),
            (None, _) => "#text".to_string(),
        }
    }

    /// Renders a thunk descriptor in place. No-op for plain descriptors and
    /// thunks that were already expanded.
    pub(crate) fn expand_thunk(&mut self) -> Result<()> {
        let Some(thunk) = self.data.thunk.take() else {
            return Ok(());
        };
        if thunk.expanded {
            self.data.thunk = Some(thunk);
            return Ok(());
        }
        let rendered = (thunk.render)(&thunk.args);
        let same = match (&self.sel, &rendered.sel) {
            (Some(ours), Some(theirs)) => ours.same_identity(theirs),
            _ => false,
        };
        if !same {
            return Err(VdomError::shape(format!(
                "thunk {} rendered {}",
                self.describe(),
                rendered.describe()
            )));
        }
        let key = self.data.key.take();
        self.data = rendered.data;
        self.data.key = key;
        self.data.thunk = Some(Thunk {
            expanded: true,
            ..thunk
        });
        self.sel = rendered.sel;
        self.children = rendered.children;
        self.text = rendered.text;
        Ok(())
    }
}

pub(crate) fn ensure_unique_keys(children: &[VNode]) -> Result<()> {
    let mut seen = HashSet::new();
    for child in children {
        if let Some(key) = child.key() {
            if !seen.insert(key) {
                return Err(VdomError::shape(format!("duplicate sibling key {key}")));
            }
        }
    }
    Ok(())
}

/// Whether `a` and `b` describe the same logical node: equal keys, and equal
/// tag and id. Text nodes are the same as any other text node.
pub fn same_vnode(a: &VNode, b: &VNode) -> bool {
    if a.key() != b.key() {
        return false;
    }
    match (&a.sel, &b.sel) {
        (None, None) => true,
        (Some(x), Some(y)) => x.same_identity(y),
        _ => false,
    }
}
