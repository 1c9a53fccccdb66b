//! Module extension point and engine configuration.

use crate::dom_api::DomApi;
use crate::removal::RemoveCallback;
use crate::vnode::VNode;
use std::fmt;

/// Cross-cutting hook bundle applied to every node.
///
/// All methods default to no-ops; `remove` defaults to completing at once.
/// Modules run in configuration order for each hook. A module keeps any
/// state it needs behind interior mutability since hooks take `&self`.
pub trait Module {
    fn name(&self) -> &'static str;

    /// Once per patch call, before any diffing.
    fn pre(&self, _dom: &mut dyn DomApi) {}

    /// After `vnode` was materialized; `empty` stands in for the old side.
    fn create(&self, _dom: &mut dyn DomApi, _empty: &VNode, _vnode: &VNode) {}

    /// When `old`'s live node is reused for `vnode`. Implementations apply
    /// only the entries that differ between the two descriptors.
    fn update(&self, _dom: &mut dyn DomApi, _old: &VNode, _vnode: &VNode) {}

    /// When `vnode` starts being removed. `done` must be consumed exactly
    /// once, possibly later, before the node is detached.
    fn remove(&self, _dom: &mut dyn DomApi, _vnode: &VNode, done: RemoveCallback) {
        done.done();
    }

    /// Once per node of a discarded subtree, after detachment.
    fn destroy(&self, _dom: &mut dyn DomApi, _vnode: &VNode) {}

    /// Once per patch call, after insert hooks.
    fn post(&self, _dom: &mut dyn DomApi) {}

    /// Animation-frame boundary signalled through `Vdom::frame`.
    fn frame(&self, _dom: &mut dyn DomApi) {}
}

/// Immutable engine configuration.
#[derive(Default)]
pub struct Config {
    modules: Vec<Box<dyn Module>>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn with_modules(mut self, modules: Vec<Box<dyn Module>>) -> Self {
        self.modules.extend(modules);
        self
    }

    pub fn modules(&self) -> &[Box<dyn Module>] {
        &self.modules
    }

    pub(crate) fn into_modules(self) -> Vec<Box<dyn Module>> {
        self.modules
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.modules.iter().map(|m| m.name()))
            .finish()
    }
}
