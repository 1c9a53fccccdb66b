//! Platform adapter consumed by the reconciler and the bundled modules.
//!
//! The reconciler never reads or writes a host tree except through this
//! trait. Implementations own the live nodes; `NodeId` values handed out by
//! an implementation are non-owning handles into it.
//!
//! Contract:
//! - `insert_before` with a child that already has a parent moves it
//!   (detach, then insert), matching DOM semantics.
//! - `insert_before(parent, child, None)` appends.
//! - `set_text_content` on an element replaces all of its children with a
//!   single text node (or none for an empty string).
//! - Mutators are infallible; hosts decide how to surface protocol misuse.

use core_types::{NodeId, Value};
use std::rc::Rc;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
}

/// Event delivered to listeners registered through [`DomApi::add_event_listener`].
#[derive(Clone, Debug, PartialEq)]
pub struct DomEvent {
    pub name: String,
    pub target: NodeId,
    pub detail: Option<Value>,
}

impl DomEvent {
    pub fn new(name: impl Into<String>, target: NodeId) -> Self {
        Self {
            name: name.into(),
            target,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<Value>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub type Listener = Rc<dyn Fn(&DomEvent)>;

pub trait DomApi {
    fn create_element(&mut self, tag: &str) -> NodeId;
    fn create_element_ns(&mut self, ns: &str, tag: &str) -> NodeId;
    fn create_text_node(&mut self, text: &str) -> NodeId;
    fn create_comment(&mut self, text: &str) -> NodeId;

    fn insert_before(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>);
    fn remove_child(&mut self, parent: NodeId, child: NodeId);

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    fn parent_node(&self, node: NodeId) -> Option<NodeId>;
    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;
    fn first_child(&self, node: NodeId) -> Option<NodeId>;

    /// `None` when the host does not know `node`.
    fn node_kind(&self, node: NodeId) -> Option<NodeKind>;
    fn tag_name(&self, node: NodeId) -> Option<String>;

    fn set_text_content(&mut self, node: NodeId, text: &str);
    fn text_content(&self, node: NodeId) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    fn set_attribute_ns(&mut self, node: NodeId, ns: &str, name: &str, value: &str);
    fn remove_attribute(&mut self, node: NodeId, name: &str);
    fn get_attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_property(&mut self, node: NodeId, name: &str, value: &Value);
    fn remove_property(&mut self, node: NodeId, name: &str);
    fn get_property(&self, node: NodeId, name: &str) -> Option<Value>;

    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);

    fn set_style(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_style(&mut self, node: NodeId, name: &str);

    /// Registers the single listener for `event` on `node`, replacing any
    /// previous one.
    fn add_event_listener(&mut self, node: NodeId, event: &str, listener: Listener);
    fn remove_event_listener(&mut self, node: NodeId, event: &str);
}
