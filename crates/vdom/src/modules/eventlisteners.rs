//! Event listener module.
//!
//! One host listener is registered per (node, event name) pair. It looks up
//! the handler in a table refreshed on every patch, so the listener stays
//! installed across patches while always dispatching to the handler of the
//! latest descriptor.

use crate::dom_api::{DomApi, DomEvent, Listener};
use crate::module::Module;
use crate::vnode::{EventHandler, VNode};
use core_types::NodeId;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

type HandlerTable = RefCell<HashMap<NodeId, IndexMap<String, EventHandler>>>;

#[derive(Default)]
pub struct EventListenersModule {
    handlers: Rc<HandlerTable>,
}

impl EventListenersModule {
    pub fn new() -> Self {
        Self::default()
    }

    fn listener(&self, elm: NodeId, event: &str) -> Listener {
        let table: Weak<HandlerTable> = Rc::downgrade(&self.handlers);
        let event = event.to_string();
        Rc::new(move |dom_event: &DomEvent| {
            let Some(table) = table.upgrade() else {
                return;
            };
            // Cloned out so the handler may patch or re-enter dispatch.
            let handler = table
                .borrow()
                .get(&elm)
                .and_then(|on| on.get(&event))
                .cloned();
            if let Some(handler) = handler {
                handler.invoke(dom_event);
            }
        })
    }

    fn update_listeners(&self, dom: &mut dyn DomApi, old: &VNode, vnode: &VNode) {
        let Some(elm) = vnode.elm() else {
            return;
        };
        let old_on = &old.data.on;
        let on = &vnode.data.on;
        if old_on.is_empty() && on.is_empty() {
            return;
        }

        for name in old_on.keys() {
            if !on.contains_key(name) {
                dom.remove_event_listener(elm, name);
            }
        }
        for name in on.keys() {
            if !old_on.contains_key(name) {
                dom.add_event_listener(elm, name, self.listener(elm, name));
            }
        }

        let mut handlers = self.handlers.borrow_mut();
        if on.is_empty() {
            handlers.remove(&elm);
        } else {
            handlers.insert(elm, on.clone());
        }
    }
}

impl Module for EventListenersModule {
    fn name(&self) -> &'static str {
        "eventlisteners"
    }

    fn create(&self, dom: &mut dyn DomApi, empty: &VNode, vnode: &VNode) {
        self.update_listeners(dom, empty, vnode);
    }

    fn update(&self, dom: &mut dyn DomApi, old: &VNode, vnode: &VNode) {
        self.update_listeners(dom, old, vnode);
    }

    fn destroy(&self, dom: &mut dyn DomApi, vnode: &VNode) {
        let Some(elm) = vnode.elm() else {
            return;
        };
        for name in vnode.data.on.keys() {
            dom.remove_event_listener(elm, name);
        }
        self.handlers.borrow_mut().remove(&elm);
    }
}

impl fmt::Debug for EventListenersModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListenersModule")
            .field("nodes", &self.handlers.borrow().len())
            .finish()
    }
}
