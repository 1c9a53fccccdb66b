use crate::dom_api::DomApi;
use crate::module::Module;
use crate::vnode::VNode;

/// Toggles entries of `data.class` on the live node's class list.
///
/// Selector classes are written by the patcher. Dropping an entry hands a
/// class the new selector names back to the selector.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassModule;

impl Module for ClassModule {
    fn name(&self) -> &'static str {
        "class"
    }

    fn create(&self, dom: &mut dyn DomApi, empty: &VNode, vnode: &VNode) {
        update_class(dom, empty, vnode);
    }

    fn update(&self, dom: &mut dyn DomApi, old: &VNode, vnode: &VNode) {
        update_class(dom, old, vnode);
    }
}

fn update_class(dom: &mut dyn DomApi, old: &VNode, vnode: &VNode) {
    let Some(elm) = vnode.elm() else {
        return;
    };
    let old_class = &old.data.class;
    let class = &vnode.data.class;
    if old_class.is_empty() && class.is_empty() {
        return;
    }

    let in_selector = |name: &str| {
        vnode
            .sel
            .as_ref()
            .is_some_and(|sel| sel.classes.iter().any(|class| class == name))
    };
    for (name, &was_on) in old_class {
        if class.contains_key(name) {
            continue;
        }
        match (was_on, in_selector(name)) {
            (true, false) => dom.remove_class(elm, name),
            (false, true) => dom.add_class(elm, name),
            _ => {}
        }
    }
    for (name, &on) in class {
        match (old_class.get(name).copied(), on) {
            (Some(prev), on) if prev == on => {}
            (None, false) if !in_selector(name) => {}
            (_, true) => dom.add_class(elm, name),
            (_, false) => dom.remove_class(elm, name),
        }
    }
}
