//! Keyed children reconciliation.
//!
//! Four-pointer scan over the old and new sibling lists. Each step checks,
//! in this order: old start vs new start, old end vs new end, old start vs
//! new end (moved towards the back), old end vs new start (moved towards the
//! front). Only when none match is the new start child looked up by key in a
//! map of the remaining old range, built once on first use.
//!
//! Live nodes of matched old children are reused; unmatched new children are
//! materialized; whatever is left of the old range is removed.

use crate::dom_api::DomApi;
use crate::error::Result;
use crate::patch::Lifecycle;
use crate::vnode::{Key, VNode, same_vnode};
use core_types::NodeId;
use std::collections::HashMap;

impl<D: DomApi> Lifecycle<'_, D> {
    pub(crate) fn update_children(
        &mut self,
        parent: NodeId,
        old_children: Vec<VNode>,
        new_children: &mut [VNode],
    ) -> Result<()> {
        // Taken entries are the "already handled" placeholders.
        let mut old: Vec<Option<VNode>> = old_children.into_iter().map(Some).collect();
        let mut old_start = 0;
        let mut old_end = old.len();
        let mut new_start = 0;
        let mut new_end = new_children.len();
        let mut key_map: Option<HashMap<Key, usize>> = None;

        while old_start < old_end && new_start < new_end {
            let Some(old_first) = old[old_start].as_ref() else {
                old_start += 1;
                continue;
            };
            let Some(old_last) = old[old_end - 1].as_ref() else {
                old_end -= 1;
                continue;
            };
            let new_first = &new_children[new_start];
            let new_last = &new_children[new_end - 1];

            if same_vnode(old_first, new_first) {
                if let Some(node) = old[old_start].take() {
                    self.patch_vnode(node, &mut new_children[new_start])?;
                }
                old_start += 1;
                new_start += 1;
            } else if same_vnode(old_last, new_last) {
                if let Some(node) = old[old_end - 1].take() {
                    self.patch_vnode(node, &mut new_children[new_end - 1])?;
                }
                old_end -= 1;
                new_end -= 1;
            } else if same_vnode(old_first, new_last) {
                let anchor = old_last.elm().and_then(|elm| self.dom.next_sibling(elm));
                if let Some(node) = old[old_start].take() {
                    self.patch_vnode(node, &mut new_children[new_end - 1])?;
                }
                self.move_before(parent, &new_children[new_end - 1], anchor);
                old_start += 1;
                new_end -= 1;
            } else if same_vnode(old_last, new_first) {
                let anchor = old_first.elm();
                if let Some(node) = old[old_end - 1].take() {
                    self.patch_vnode(node, &mut new_children[new_start])?;
                }
                self.move_before(parent, &new_children[new_start], anchor);
                old_end -= 1;
                new_start += 1;
            } else {
                let anchor = old_first.elm();
                let map = key_map.get_or_insert_with(|| key_index(&old, old_start, old_end));
                let candidate = new_children[new_start]
                    .key()
                    .and_then(|key| map.get(key).copied())
                    .filter(|&idx| {
                        old[idx]
                            .as_ref()
                            .is_some_and(|node| same_vnode(node, &new_children[new_start]))
                    });
                match candidate.and_then(|idx| old[idx].take()) {
                    Some(node) => {
                        self.patch_vnode(node, &mut new_children[new_start])?;
                        self.move_before(parent, &new_children[new_start], anchor);
                    }
                    None => {
                        log::trace!(
                            target: "vdom.keyed",
                            "create {} before {anchor:?}",
                            new_children[new_start].describe()
                        );
                        let elm = self.create_elm(&mut new_children[new_start])?;
                        self.dom.insert_before(parent, elm, anchor);
                    }
                }
                new_start += 1;
            }
        }

        if old_start >= old_end {
            if new_start < new_end {
                let before = new_children.get(new_end).and_then(VNode::elm);
                self.add_vnodes(parent, before, &mut new_children[new_start..new_end])?;
            }
        } else if new_start >= new_end {
            let leftovers: Vec<VNode> = old[old_start..old_end]
                .iter_mut()
                .filter_map(Option::take)
                .collect();
            self.remove_vnodes(parent, leftovers);
        }
        Ok(())
    }

    fn move_before(&mut self, parent: NodeId, vnode: &VNode, anchor: Option<NodeId>) {
        let Some(elm) = vnode.elm() else {
            return;
        };
        log::trace!(
            target: "vdom.keyed",
            "move {} before {anchor:?}",
            vnode.describe()
        );
        self.stats.moved += 1;
        self.dom.insert_before(parent, elm, anchor);
    }
}

fn key_index(old: &[Option<VNode>], start: usize, end: usize) -> HashMap<Key, usize> {
    let mut map = HashMap::with_capacity(end - start);
    for (idx, node) in old.iter().enumerate().take(end).skip(start) {
        if let Some(key) = node.as_ref().and_then(|node| node.key().cloned()) {
            map.insert(key, idx);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Selector;
    use crate::vnode::VNodeData;

    fn keyed(key: i64) -> Option<VNode> {
        Some(VNode::new(
            Some(Selector::parse("li")),
            VNodeData::new().key(key),
            None,
            None,
        ))
    }

    #[test]
    fn key_index_covers_only_the_requested_range() {
        let old = vec![keyed(1), None, keyed(3), keyed(4), keyed(5)];
        let map = key_index(&old, 1, 4);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Key::Num(3)), Some(&2));
        assert_eq!(map.get(&Key::Num(4)), Some(&3));
        assert!(!map.contains_key(&Key::Num(1)));
        assert!(!map.contains_key(&Key::Num(5)));
    }
}
