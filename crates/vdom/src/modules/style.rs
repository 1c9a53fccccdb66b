//! Inline style module.
//!
//! - `style.props` is diffed against the previous descriptor.
//! - `style.delayed` entries are queued and applied on the next frame.
//! - `style.remove` entries are applied when removal starts; the removal
//!   then completes on the next frame.
//! - `style.destroy` entries are applied when the node is destroyed.

use crate::dom_api::DomApi;
use crate::module::Module;
use crate::removal::RemoveCallback;
use crate::vnode::VNode;
use core_types::NodeId;
use std::cell::RefCell;

#[derive(Debug, Default)]
pub struct StyleModule {
    next_frame: RefCell<Vec<(NodeId, String, String)>>,
    removing: RefCell<Vec<RemoveCallback>>,
}

impl StyleModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delayed style writes waiting for the next frame.
    pub fn queued(&self) -> usize {
        self.next_frame.borrow().len()
    }
}

impl Module for StyleModule {
    fn name(&self) -> &'static str {
        "style"
    }

    fn create(&self, dom: &mut dyn DomApi, empty: &VNode, vnode: &VNode) {
        self.update_style(dom, empty, vnode);
    }

    fn update(&self, dom: &mut dyn DomApi, old: &VNode, vnode: &VNode) {
        self.update_style(dom, old, vnode);
    }

    fn remove(&self, dom: &mut dyn DomApi, vnode: &VNode, done: RemoveCallback) {
        let remove = &vnode.data.style.remove;
        let Some(elm) = vnode.elm().filter(|_| !remove.is_empty()) else {
            done.done();
            return;
        };
        for (name, value) in remove {
            dom.set_style(elm, name, value);
        }
        self.removing.borrow_mut().push(done);
    }

    fn destroy(&self, dom: &mut dyn DomApi, vnode: &VNode) {
        let Some(elm) = vnode.elm() else {
            return;
        };
        for (name, value) in &vnode.data.style.destroy {
            dom.set_style(elm, name, value);
        }
    }

    fn frame(&self, dom: &mut dyn DomApi) {
        let writes = std::mem::take(&mut *self.next_frame.borrow_mut());
        for (elm, name, value) in writes {
            dom.set_style(elm, &name, &value);
        }
        let removing = std::mem::take(&mut *self.removing.borrow_mut());
        for done in removing {
            done.done();
        }
    }
}

impl StyleModule {
    fn update_style(&self, dom: &mut dyn DomApi, old: &VNode, vnode: &VNode) {
        let Some(elm) = vnode.elm() else {
            return;
        };
        let old_style = &old.data.style;
        let style = &vnode.data.style;
        if old_style.is_empty() && style.is_empty() {
            return;
        }

        for name in old_style.props.keys() {
            if style.props.contains_key(name) {
                continue;
            }
            if is_custom_property(name) {
                dom.remove_style(elm, name);
            } else {
                dom.set_style(elm, name, "");
            }
        }
        for (name, value) in &style.props {
            if old_style.props.get(name) != Some(value) {
                dom.set_style(elm, name, value);
            }
        }

        let mut queue = self.next_frame.borrow_mut();
        for (name, value) in &style.delayed {
            if old_style.delayed.get(name) != Some(value) {
                queue.push((elm, name.clone(), value.clone()));
            }
        }
    }
}

fn is_custom_property(name: &str) -> bool {
    name.starts_with("--")
}
