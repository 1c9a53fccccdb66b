use crate::dom_api::DomApi;
use crate::module::Module;
use crate::vnode::VNode;

/// Assigns `data.props` as live node properties.
///
/// `value` is only written when the live property differs, so edits made
/// through the host since the last patch survive an unchanged descriptor.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropsModule;

impl Module for PropsModule {
    fn name(&self) -> &'static str {
        "props"
    }

    fn create(&self, dom: &mut dyn DomApi, empty: &VNode, vnode: &VNode) {
        update_props(dom, empty, vnode);
    }

    fn update(&self, dom: &mut dyn DomApi, old: &VNode, vnode: &VNode) {
        update_props(dom, old, vnode);
    }
}

fn update_props(dom: &mut dyn DomApi, old: &VNode, vnode: &VNode) {
    let Some(elm) = vnode.elm() else {
        return;
    };
    let old_props = &old.data.props;
    let props = &vnode.data.props;
    if old_props.is_empty() && props.is_empty() {
        return;
    }

    for name in old_props.keys() {
        if !props.contains_key(name) {
            dom.remove_property(elm, name);
        }
    }
    for (name, value) in props {
        if old_props.get(name) == Some(value) {
            continue;
        }
        if name == "value" && dom.get_property(elm, name).as_ref() == Some(value) {
            continue;
        }
        dom.set_property(elm, name, value);
    }
}
