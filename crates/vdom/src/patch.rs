//! Reconciler entry point and per-node patch state machine.
//!
//! Contract:
//! - `patch(old, new)` returns `new` with every descriptor bound to a live
//!   node; the returned tree is the `old` argument of the next call.
//! - Nodes that are the same (`same_vnode`) keep their live node; others are
//!   materialized fresh and the old subtree is queued for removal.
//! - Hook order on update: `prepatch`, module `update`, hook `update`,
//!   children, `postpatch`. On creation: `init`, materialize (children
//!   included), module `create`, hook `create`, and `insert` once the whole
//!   patch call has attached everything.
//! - Selector classes are written when an element is created and diffed
//!   when it is reused; `data.class` toggles run after them.
//! - Shape errors abort the rest of the call; already issued mutations stay.

use crate::dom_api::{DomApi, NodeKind};
use crate::error::{Result, VdomError};
use crate::hooks::HookKind;
use crate::module::{Config, Module};
use crate::removal::RemovalQueue;
use crate::selector::{COMMENT_TAG, Selector};
use crate::vnode::{VNode, same_vnode};
use core_types::NodeId;

/// Old side of a patch call.
#[derive(Debug)]
pub enum PatchTarget {
    /// A live node not yet described by any descriptor.
    Live(NodeId),
    /// The tree returned by the previous patch call.
    VNode(VNode),
}

impl From<NodeId> for PatchTarget {
    fn from(value: NodeId) -> Self {
        PatchTarget::Live(value)
    }
}

impl From<VNode> for PatchTarget {
    fn from(value: VNode) -> Self {
        PatchTarget::VNode(value)
    }
}

/// Per-call counters, reset at the start of every patch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatchStats {
    pub created: usize,
    pub patched: usize,
    pub moved: usize,
    pub removed: usize,
}

/// Reconciliation engine bound to one host tree and one module list.
pub struct Vdom<D: DomApi> {
    dom: D,
    modules: Vec<Box<dyn Module>>,
    removals: RemovalQueue,
    last_stats: PatchStats,
}

/// Builds an engine running `modules` in order against `dom`.
pub fn init<D: DomApi>(modules: Vec<Box<dyn Module>>, dom: D) -> Vdom<D> {
    Vdom::new(Config::new().with_modules(modules), dom)
}

impl<D: DomApi> Vdom<D> {
    pub fn new(config: Config, dom: D) -> Self {
        Self {
            dom,
            modules: config.into_modules(),
            removals: RemovalQueue::new(),
            last_stats: PatchStats::default(),
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn into_dom(self) -> D {
        self.dom
    }

    pub fn last_stats(&self) -> PatchStats {
        self.last_stats
    }

    /// Removals started but not yet detached.
    pub fn pending_removals(&self) -> usize {
        self.removals.pending()
    }

    /// Reconciles the live tree behind `old` with `new` and returns `new`
    /// bound to its live nodes.
    ///
    /// On error both descriptor trees are consumed and the live tree keeps
    /// the mutations issued so far. To resume, patch from
    /// `PatchTarget::Live` of the root element: its live subtree is adopted
    /// node by node, so reusable nodes are kept and stale ones removed.
    pub fn patch(&mut self, old: impl Into<PatchTarget>, mut new: VNode) -> Result<VNode> {
        log::debug!(target: "vdom.patch", "patch begin: {}", new.describe());
        for module in &self.modules {
            module.pre(&mut self.dom);
        }

        let mut cx = Lifecycle {
            dom: &mut self.dom,
            modules: &self.modules,
            removals: &self.removals,
            empty: VNode::empty(),
            inserted: 0,
            stats: PatchStats::default(),
        };
        let result = cx.patch_root(old.into(), &mut new);
        let mut inserted = cx.inserted;
        let stats = cx.stats;

        if result.is_ok() && inserted > 0 {
            fire_insert_hooks(&mut new, &mut inserted);
        }
        for module in &self.modules {
            module.post(&mut self.dom);
        }
        self.flush_removals();
        self.last_stats = stats;

        match &result {
            Ok(()) => log::debug!(target: "vdom.patch", "patch end: {stats:?}"),
            Err(err) => log::debug!(target: "vdom.patch", "patch failed: {err}"),
        }
        result.map(|()| new)
    }

    /// Detaches and destroys every removal whose callbacks all fired.
    /// Returns the number of removals completed.
    pub fn flush_removals(&mut self) -> usize {
        flush_ready(&mut self.dom, &self.modules, &self.removals)
    }

    /// Signals an animation-frame boundary to every module, then flushes
    /// removals that completed because of it.
    pub fn frame(&mut self) -> usize {
        for module in &self.modules {
            module.frame(&mut self.dom);
        }
        self.flush_removals()
    }
}

impl<D: DomApi + std::fmt::Debug> std::fmt::Debug for Vdom<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vdom")
            .field("dom", &self.dom)
            .field("modules", &self.modules.iter().map(|m| m.name()).collect::<Vec<_>>())
            .field("pending_removals", &self.removals.pending())
            .finish()
    }
}

/// State of one patch call; discarded when the call returns.
pub(crate) struct Lifecycle<'a, D: DomApi> {
    pub(crate) dom: &'a mut D,
    pub(crate) modules: &'a [Box<dyn Module>],
    pub(crate) removals: &'a RemovalQueue,
    empty: VNode,
    inserted: usize,
    pub(crate) stats: PatchStats,
}

impl<D: DomApi> Lifecycle<'_, D> {
    fn patch_root(&mut self, target: PatchTarget, new: &mut VNode) -> Result<()> {
        let old = match target {
            PatchTarget::Live(elm) => self.bind_live(elm)?,
            PatchTarget::VNode(old) => old,
        };
        let Some(elm) = old.elm else {
            return Err(VdomError::MissingSameNodeTarget);
        };

        if same_vnode(&old, new) {
            return self.patch_vnode(old, new);
        }

        log::debug!(
            target: "vdom.patch",
            "root replaced: {} -> {}",
            old.describe(),
            new.describe()
        );
        let parent = self.dom.parent_node(elm);
        let new_elm = self.create_elm(new)?;
        if let Some(parent) = parent {
            let anchor = self.dom.next_sibling(elm);
            self.dom.insert_before(parent, new_elm, anchor);
            self.remove_vnodes(parent, vec![old]);
        }
        Ok(())
    }

    /// Describes a live node and its subtree the way an empty render of it
    /// would: tag, id and classes for elements, text for text and comment
    /// nodes, no data.
    fn bind_live(&self, elm: NodeId) -> Result<VNode> {
        match self.dom.node_kind(elm) {
            None => Err(VdomError::MissingSameNodeTarget),
            Some(NodeKind::Text) => Ok(VNode::bound(None, self.dom.text_content(elm), elm)),
            Some(NodeKind::Comment) => Ok(VNode::bound(
                Some(Selector::parse(COMMENT_TAG)),
                self.dom.text_content(elm),
                elm,
            )),
            Some(NodeKind::Element) => {
                let tag = self
                    .dom
                    .tag_name(elm)
                    .ok_or(VdomError::MissingSameNodeTarget)?;
                let id = self.dom.get_attribute(elm, "id").filter(|id| !id.is_empty());
                let classes = self
                    .dom
                    .get_attribute(elm, "class")
                    .map(|class| class.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default();
                let mut node = VNode::bound(Some(Selector { tag, id, classes }), None, elm);

                let mut children = Vec::new();
                let mut next = self.dom.first_child(elm);
                while let Some(child) = next {
                    children.push(self.bind_live(child)?);
                    next = self.dom.next_sibling(child);
                }
                if !children.is_empty() {
                    node.children = Some(children);
                }
                Ok(node)
            }
        }
    }

    pub(crate) fn create_elm(&mut self, vnode: &mut VNode) -> Result<NodeId> {
        vnode.expand_thunk()?;
        vnode.validate_shape()?;
        if let Some(init) = vnode.data.hook.init.clone() {
            trace_hook(HookKind::Init, vnode);
            init(&mut *vnode);
            vnode.validate_shape()?;
        }
        self.stats.created += 1;

        let elm = match &vnode.sel {
            None => {
                let elm = self
                    .dom
                    .create_text_node(vnode.text.as_deref().unwrap_or_default());
                vnode.elm = Some(elm);
                return Ok(elm);
            }
            Some(sel) if sel.is_comment() => {
                let elm = self
                    .dom
                    .create_comment(vnode.text.as_deref().unwrap_or_default());
                vnode.elm = Some(elm);
                return Ok(elm);
            }
            Some(sel) => {
                let elm = match vnode.data.ns.as_deref() {
                    Some(ns) => self.dom.create_element_ns(ns, &sel.tag),
                    None => self.dom.create_element(&sel.tag),
                };
                if let Some(id) = &sel.id {
                    self.dom.set_attribute(elm, "id", id);
                }
                if !sel.classes.is_empty() {
                    self.dom.set_attribute(elm, "class", &sel.classes.join(" "));
                }
                elm
            }
        };
        vnode.elm = Some(elm);

        if let Some(children) = vnode.children.as_mut() {
            for child in children {
                let child_elm = self.create_elm(child)?;
                self.dom.append_child(elm, child_elm);
            }
        } else if let Some(text) = vnode.text.as_deref() {
            let text_elm = self.dom.create_text_node(text);
            self.dom.append_child(elm, text_elm);
        }

        for module in self.modules {
            module.create(&mut *self.dom, &self.empty, vnode);
        }
        if let Some(create) = vnode.data.hook.create.clone() {
            trace_hook(HookKind::Create, vnode);
            create(&self.empty, &*vnode);
        }
        if vnode.data.hook.insert.is_some() {
            vnode.insert_pending = true;
            self.inserted += 1;
        }
        Ok(elm)
    }

    pub(crate) fn patch_vnode(&mut self, mut old: VNode, new: &mut VNode) -> Result<()> {
        let reuse = match (&old.data.thunk, &new.data.thunk) {
            (Some(previous), Some(next)) => previous.expanded && previous.matches(next),
            _ => false,
        };
        if reuse {
            log::trace!(target: "vdom.patch", "thunk reused: {}", new.describe());
            *new = old;
            return Ok(());
        }
        new.expand_thunk()?;
        new.validate_shape()?;
        let Some(elm) = old.elm else {
            return Err(VdomError::MissingSameNodeTarget);
        };
        self.stats.patched += 1;

        if let Some(prepatch) = new.data.hook.prepatch.clone() {
            trace_hook(HookKind::Prepatch, new);
            prepatch(&old, &*new);
        }
        new.elm = Some(elm);

        if !new.is_text() {
            self.update_selector_classes(elm, &old, new);
            for module in self.modules {
                module.update(&mut *self.dom, &old, new);
            }
            if let Some(update) = new.data.hook.update.clone() {
                trace_hook(HookKind::Update, new);
                update(&old, &*new);
            }
        }

        if new.text.is_none() {
            match (old.children.take(), new.children.as_mut()) {
                (Some(old_children), Some(new_children)) => {
                    self.update_children(elm, old_children, new_children)?;
                }
                (None, Some(new_children)) => {
                    if old.text.is_some() {
                        self.dom.set_text_content(elm, "");
                    }
                    self.add_vnodes(elm, None, new_children)?;
                }
                (Some(old_children), None) => {
                    self.remove_vnodes(elm, old_children);
                }
                (None, None) => {
                    if old.text.is_some() {
                        self.dom.set_text_content(elm, "");
                    }
                }
            }
        } else if old.text != new.text {
            if let Some(old_children) = old.children.take() {
                self.remove_vnodes(elm, old_children);
            }
            self.dom
                .set_text_content(elm, new.text.as_deref().unwrap_or_default());
        }

        if let Some(postpatch) = new.data.hook.postpatch.clone() {
            trace_hook(HookKind::Postpatch, new);
            postpatch(&old, &*new);
        }
        Ok(())
    }

    /// Classes named by the selector follow the selector. A class the new
    /// `data.class` switches on is left to the class module.
    fn update_selector_classes(&mut self, elm: NodeId, old: &VNode, new: &VNode) {
        let (Some(old_sel), Some(new_sel)) = (&old.sel, &new.sel) else {
            return;
        };
        if old_sel.classes == new_sel.classes {
            return;
        }
        for name in &old_sel.classes {
            let toggled_on = new.data.class.get(name).copied().unwrap_or(false);
            if !new_sel.classes.contains(name) && !toggled_on {
                self.dom.remove_class(elm, name);
            }
        }
        for name in &new_sel.classes {
            if !old_sel.classes.contains(name) {
                self.dom.add_class(elm, name);
            }
        }
    }

    pub(crate) fn add_vnodes(
        &mut self,
        parent: NodeId,
        before: Option<NodeId>,
        vnodes: &mut [VNode],
    ) -> Result<()> {
        for vnode in vnodes {
            let elm = self.create_elm(vnode)?;
            self.dom.insert_before(parent, elm, before);
        }
        Ok(())
    }

    /// Starts removal of every node in `vnodes`. Text nodes are detached at
    /// once; other nodes wait for their remove listeners.
    pub(crate) fn remove_vnodes(&mut self, parent: NodeId, vnodes: impl IntoIterator<Item = VNode>) {
        for vnode in vnodes {
            let Some(elm) = vnode.elm else {
                continue;
            };
            self.stats.removed += 1;
            if vnode.is_text() {
                self.dom.remove_child(parent, elm);
                continue;
            }

            let listeners = self.modules.len() + 1;
            log::trace!(
                target: "vdom.remove",
                "remove {} with {listeners} listeners",
                vnode.describe()
            );
            let removal = self.removals.start(vnode, listeners);
            for module in self.modules {
                module.remove(&mut *self.dom, &removal.vnode, removal.callback());
            }
            match removal.vnode.data.hook.remove.clone() {
                Some(remove) => {
                    trace_hook(HookKind::Remove, &removal.vnode);
                    remove(&removal.vnode, removal.callback());
                }
                None => removal.callback().done(),
            }
        }
        flush_ready(&mut *self.dom, self.modules, self.removals);
    }
}

fn flush_ready<D: DomApi>(dom: &mut D, modules: &[Box<dyn Module>], removals: &RemovalQueue) -> usize {
    let mut flushed = 0;
    loop {
        let ready = removals.take_ready();
        if ready.is_empty() {
            return flushed;
        }
        for removal in ready {
            let vnode = &removal.vnode;
            if let Some(elm) = vnode.elm {
                if let Some(parent) = dom.parent_node(elm) {
                    dom.remove_child(parent, elm);
                }
            }
            log::trace!(target: "vdom.remove", "detached {}", vnode.describe());
            invoke_destroy_hooks(dom, modules, vnode);
            flushed += 1;
        }
    }
}

fn invoke_destroy_hooks<D: DomApi>(dom: &mut D, modules: &[Box<dyn Module>], vnode: &VNode) {
    if vnode.is_text() {
        return;
    }
    if let Some(destroy) = vnode.data.hook.destroy.clone() {
        trace_hook(HookKind::Destroy, vnode);
        destroy(vnode);
    }
    for module in modules {
        module.destroy(&mut *dom, vnode);
    }
    for child in vnode.children() {
        invoke_destroy_hooks(dom, modules, child);
    }
}

/// Post-order walk firing `insert` for freshly attached descriptors.
fn fire_insert_hooks(vnode: &mut VNode, remaining: &mut usize) {
    if let Some(children) = vnode.children.as_mut() {
        for child in children {
            if *remaining == 0 {
                return;
            }
            fire_insert_hooks(child, remaining);
        }
    }
    if std::mem::take(&mut vnode.insert_pending) {
        *remaining = remaining.saturating_sub(1);
        if let Some(insert) = vnode.data.hook.insert.clone() {
            trace_hook(HookKind::Insert, vnode);
            insert(&*vnode);
        }
    }
}

fn trace_hook(kind: HookKind, vnode: &VNode) {
    log::trace!(target: "vdom.patch", "{kind} hook: {}", vnode.describe());
}
