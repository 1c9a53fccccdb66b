pub mod dom_api;
pub mod error;
pub mod h;
pub mod hooks;
pub mod module;
pub mod modules;
pub mod patch;
pub mod selector;
pub mod vnode;

mod children;
mod removal;

pub use dom_api::{DomApi, DomEvent, Listener, NodeKind, SVG_NS, XLINK_NS, XML_NS};
pub use error::{Result, VdomError};
pub use h::{Child, Children, VNodeBuilder, h, h_node, thunk};
pub use hooks::{HookKind, Hooks};
pub use module::{Config, Module};
pub use patch::{PatchStats, PatchTarget, Vdom, init};
pub use removal::RemoveCallback;
pub use selector::Selector;
pub use vnode::{EventHandler, Key, RenderFn, Style, VNode, VNodeData, same_vnode};

pub use core_types::{NodeId, Value};
