use crate::dom_api::{DomApi, XLINK_NS, XML_NS};
use crate::module::Module;
use crate::vnode::VNode;
use core_types::Value;

/// Sets `data.attrs` as live node attributes.
///
/// `true` sets an empty attribute and `false` removes it. `xlink:*` and
/// `xml:*` names are set in their XML namespaces.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttributesModule;

impl Module for AttributesModule {
    fn name(&self) -> &'static str {
        "attributes"
    }

    fn create(&self, dom: &mut dyn DomApi, empty: &VNode, vnode: &VNode) {
        update_attrs(dom, empty, vnode);
    }

    fn update(&self, dom: &mut dyn DomApi, old: &VNode, vnode: &VNode) {
        update_attrs(dom, old, vnode);
    }
}

fn update_attrs(dom: &mut dyn DomApi, old: &VNode, vnode: &VNode) {
    let Some(elm) = vnode.elm() else {
        return;
    };
    let old_attrs = &old.data.attrs;
    let attrs = &vnode.data.attrs;
    if old_attrs.is_empty() && attrs.is_empty() {
        return;
    }

    for (name, value) in attrs {
        if old_attrs.get(name) == Some(value) {
            continue;
        }
        match value {
            Value::Bool(true) => dom.set_attribute(elm, name, ""),
            Value::Bool(false) => dom.remove_attribute(elm, name),
            value => {
                let text = value.to_string();
                match attr_namespace(name) {
                    Some(ns) => dom.set_attribute_ns(elm, ns, name, &text),
                    None => dom.set_attribute(elm, name, &text),
                }
            }
        }
    }
    for name in old_attrs.keys() {
        if !attrs.contains_key(name) {
            dom.remove_attribute(elm, name);
        }
    }
}

fn attr_namespace(name: &str) -> Option<&'static str> {
    if name.starts_with("xlink:") {
        Some(XLINK_NS)
    } else if name.starts_with("xml:") {
        Some(XML_NS)
    } else {
        None
    }
}
