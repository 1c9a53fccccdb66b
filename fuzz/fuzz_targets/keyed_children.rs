#![no_main]

use dom::{DomOp, DomTree};
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;
use vdom::{DomApi, NodeId, VNode, VNodeData, h, modules};

const MAX_KEYS: usize = 64;

/// Splits the input at the first zero byte into an old and a new key list.
/// Each byte is a key; repeats within one list are dropped.
fn key_lists(data: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let (old, new) = match data.iter().position(|&b| b == 0) {
        Some(at) => (&data[..at], &data[at + 1..]),
        None => (data, &[][..]),
    };
    (dedup(old), dedup(new))
}

fn dedup(bytes: &[u8]) -> Vec<u8> {
    let mut seen = [false; 256];
    bytes
        .iter()
        .copied()
        .filter(|&b| !std::mem::replace(&mut seen[usize::from(b)], true))
        .take(MAX_KEYS)
        .collect()
}

fn list(keys: &[u8]) -> VNode {
    h(
        "ul",
        VNodeData::new(),
        keys.iter()
            .map(|&key| h("li", VNodeData::new().key(u32::from(key)), u32::from(key).to_string()))
            .collect::<Vec<_>>(),
    )
}

fn live_by_key(list: &VNode) -> HashMap<String, NodeId> {
    list.children()
        .iter()
        .filter_map(|child| Some((child.key()?.to_string(), child.elm()?)))
        .collect()
}

fuzz_target!(|data: &[u8]| {
    let (old_keys, new_keys) = key_lists(data);

    let mut tree = DomTree::new();
    let mount = tree.mount_point("div");
    let mut vdom = vdom::init(modules::all(), tree);

    let old = vdom.patch(mount, list(&old_keys)).expect("mount");
    let ul = old.elm().expect("bound");
    let before = live_by_key(&old);
    vdom.dom_mut().clear_ops();

    let new = vdom.patch(old, list(&new_keys)).expect("reorder");
    assert_eq!(new.elm(), Some(ul));

    let tree = vdom.dom();
    let texts: Vec<String> = tree
        .children(ul)
        .iter()
        .map(|&child| tree.text_content(child).unwrap_or_default())
        .collect();
    let expected: Vec<String> = new_keys.iter().map(|key| key.to_string()).collect();
    assert_eq!(texts, expected);

    for (key, elm) in live_by_key(&new) {
        if let Some(previous) = before.get(&key) {
            assert_eq!(*previous, elm, "key {key} lost its live node");
        }
    }

    let removed = old_keys.iter().filter(|key| !new_keys.contains(key)).count();
    let removes = tree.ops().iter().filter(|op| op.is_remove()).count();
    assert_eq!(removes, removed);
    assert_eq!(vdom.pending_removals(), 0);
    assert!(tree.ops().iter().all(|op| !matches!(op, DomOp::RemoveChild { parent, .. } if *parent != ul)));
});
