mod common;

use common::{child_texts, engine, engine_with, keyed_item, keyed_list};
use dom::{DomOp, DomTree};
use vdom::{
    DomApi, NodeId, PatchTarget, SVG_NS, VNode, VNodeData, VdomError, h, modules,
};

fn page(title: &str) -> VNode {
    h(
        "div#app.page",
        VNodeData::new().attr("role", "main"),
        vec![
            h("h1", VNodeData::new(), title),
            h("p.lead", VNodeData::new().style("color", "red"), "body"),
            keyed_list(&["a", "b"]),
        ],
    )
}

#[test]
fn mount_replaces_unrelated_live_node() {
    let (mut vdom, mount) = engine();
    let root = vdom.patch(mount, page("hi")).expect("patch");
    let elm = root.elm().expect("bound");

    assert_ne!(elm, mount);
    let tree = vdom.dom();
    assert_eq!(tree.children(tree.root()), &[elm]);
    assert!(!tree.is_attached(mount));
    assert_eq!(
        tree.render(),
        [
            "<div class=\"page\" id=\"app\" role=\"main\">",
            "  <h1>",
            "    \"hi\"",
            "  <p class=\"lead\" style=[color: red]>",
            "    \"body\"",
            "  <ul>",
            "    <li>",
            "      \"a\"",
            "    <li>",
            "      \"b\"",
        ]
        .join("\n")
    );
}

#[test]
fn mount_reuses_matching_live_node() {
    let mut tree = DomTree::new();
    let mount = tree.mount_point("section");
    tree.set_attribute(mount, "id", "root");
    tree.set_attribute(mount, "class", "old");
    tree.clear_ops();
    let mut vdom = vdom::init(modules::all(), tree);

    let root = vdom
        .patch(mount, h("section#root.fresh", VNodeData::new(), "text"))
        .expect("patch");
    assert_eq!(root.elm(), Some(mount));
    let tree = vdom.dom();
    // Host classes are adopted into the old selector and diffed like any other.
    assert_eq!(tree.classes(mount), ["fresh"]);
    assert_eq!(tree.text_content(mount).as_deref(), Some("text"));
    assert!(tree.ops().iter().all(|op| !op.is_create()));
}

#[test]
fn reused_element_follows_selector_classes() {
    let (mut vdom, mount) = engine_with(Vec::new());
    let old = vdom
        .patch(mount, h("div#panel.open.wide", VNodeData::new(), ()))
        .expect("patch");
    let elm = old.elm().expect("bound");

    let new = vdom
        .patch(old, h("div#panel.closed.wide", VNodeData::new(), ()))
        .expect("patch");
    assert_eq!(new.elm(), Some(elm));
    assert_eq!(vdom.dom().classes(elm), ["wide", "closed"]);
}

#[test]
fn selector_classes_apply_without_modules() {
    let (mut vdom, mount) = engine_with(Vec::new());
    let root = vdom
        .patch(mount, h("div.with-hooks.wide", VNodeData::new(), "with hooks"))
        .expect("patch");
    let elm = root.elm().expect("bound");
    let tree = vdom.dom();
    assert_eq!(tree.classes(elm), ["with-hooks", "wide"]);
    assert_eq!(tree.text_content(elm).as_deref(), Some("with hooks"));
}

#[test]
fn mount_adopts_live_children() {
    let mut tree = DomTree::new();
    let list = tree.mount_point("ul");
    for text in ["stale a", "stale b", "stale c"] {
        let li = tree.create_element("li");
        let label = tree.create_text_node(text);
        tree.append_child(li, label);
        tree.append_child(list, li);
    }
    let adopted = tree.children(list).to_vec();
    tree.clear_ops();
    let mut vdom = vdom::init(modules::all(), tree);

    let root = vdom
        .patch(
            list,
            h(
                "ul",
                VNodeData::new(),
                vec![h("li", VNodeData::new(), "a"), h("li", VNodeData::new(), "b")],
            ),
        )
        .expect("patch");
    let tree = vdom.dom();
    assert_eq!(root.elm(), Some(list));
    assert_eq!(tree.children(list), &adopted[..2]);
    assert!(!tree.is_attached(adopted[2]));
    assert_eq!(child_texts(tree, list), ["a", "b"]);
    assert!(tree.ops().iter().all(|op| !matches!(op, DomOp::CreateElement { .. })));
}

#[test]
fn live_root_resumes_after_failed_patch() {
    let (mut vdom, mount) = engine();
    let old = vdom.patch(mount, keyed_list(&["a", "b"])).expect("patch");
    let ul = old.elm().expect("bound");

    let mut broken = keyed_list(&["a", "b"]);
    if let Some(children) = broken.children.as_mut() {
        children[1].text = None;
        children[1].children = Some(vec![
            h("b", VNodeData::new().key("dup"), ()),
            h("i", VNodeData::new().key("dup"), ()),
        ]);
    }
    let err = vdom.patch(old, broken).unwrap_err();
    assert!(matches!(err, VdomError::InvalidVNodeShape { .. }));

    let root = vdom
        .patch(PatchTarget::Live(ul), keyed_list(&["b", "c"]))
        .expect("resume");
    assert_eq!(root.elm(), Some(ul));
    assert_eq!(child_texts(vdom.dom(), ul), ["b", "c"]);
    assert_eq!(vdom.pending_removals(), 0);
}

#[test]
fn repatching_identical_tree_is_a_no_op() {
    let (mut vdom, mount) = engine();
    let first = vdom.patch(mount, page("same")).expect("first");
    vdom.dom_mut().clear_ops();

    let second = vdom.patch(first, page("same")).expect("second");
    assert!(vdom.dom().ops().is_empty(), "{:?}", vdom.dom().ops());
    assert_eq!(vdom.last_stats().created, 0);
    assert_eq!(vdom.last_stats().moved, 0);

    let again = vdom.patch(second, page("same")).expect("third");
    assert!(vdom.dom().ops().is_empty());
    assert!(again.elm().is_some());
}

#[test]
fn changed_text_is_written_once() {
    let (mut vdom, mount) = engine();
    let old = vdom.patch(mount, h("p", VNodeData::new(), "a")).expect("patch");
    let p = old.elm().expect("bound");
    vdom.dom_mut().clear_ops();

    vdom.patch(old, h("p", VNodeData::new(), "b")).expect("patch");
    assert_eq!(
        vdom.dom().ops(),
        &[DomOp::SetText {
            node: p,
            text: "b".to_string(),
        }]
    );
}

#[test]
fn text_and_children_swap() {
    let (mut vdom, mount) = engine();
    let old = vdom.patch(mount, h("div", VNodeData::new(), "plain")).expect("patch");
    let div = old.elm().expect("bound");

    let old = vdom
        .patch(old, h("div", VNodeData::new(), vec![h("b", VNodeData::new(), "bold")]))
        .expect("to children");
    assert_eq!(vdom.dom().snapshot(div).render(), "<div>\n  <b>\n    \"bold\"");

    vdom.patch(old, h("div", VNodeData::new(), "plain again"))
        .expect("to text");
    assert_eq!(vdom.dom().snapshot(div).render(), "<div>\n  \"plain again\"");
}

#[test]
fn different_tag_replaces_node_in_place() {
    let (mut vdom, mount) = engine();
    let old = vdom
        .patch(
            mount,
            h("div", VNodeData::new(), vec![keyed_item("a"), h("span", VNodeData::new(), "x"), keyed_item("c")]),
        )
        .expect("patch");
    let parent = old.elm().expect("bound");
    let span = old.children()[1].elm().expect("bound");

    let new = vdom
        .patch(
            old,
            h("div", VNodeData::new(), vec![keyed_item("a"), h("em", VNodeData::new(), "x"), keyed_item("c")]),
        )
        .expect("patch");
    let em = new.children()[1].elm().expect("bound");
    let tree = vdom.dom();
    assert_ne!(em, span);
    assert!(!tree.is_attached(span));
    assert_eq!(tree.children(parent)[1], em);
    assert_eq!(tree.tag_name(em).as_deref(), Some("em"));
}

#[test]
fn different_id_is_a_different_node() {
    let (mut vdom, mount) = engine();
    let old = vdom.patch(mount, h("div#a", VNodeData::new(), ())).expect("patch");
    let first = old.elm();
    let new = vdom.patch(old, h("div#b", VNodeData::new(), ())).expect("patch");
    assert_ne!(new.elm(), first);
    assert_eq!(
        vdom.dom().get_attribute(new.elm().expect("bound"), "id").as_deref(),
        Some("b")
    );
}

#[test]
fn comment_nodes_are_materialized() {
    let (mut vdom, mount) = engine();
    let root = vdom
        .patch(
            mount,
            h("div", VNodeData::new(), vec![VNode::comment("marker"), VNode::text_node("t")]),
        )
        .expect("patch");
    let elm = root.elm().expect("bound");
    assert_eq!(
        vdom.dom().snapshot(elm).render(),
        "<div>\n  <!-- marker -->\n  \"t\""
    );
}

#[test]
fn svg_subtree_is_namespaced() {
    let (mut vdom, mount) = engine();
    let root = vdom
        .patch(
            mount,
            h(
                "svg",
                VNodeData::new(),
                vec![
                    h("circle", VNodeData::new().attr("r", 4), ()),
                    h("foreignObject", VNodeData::new(), h("div", VNodeData::new(), ())),
                ],
            ),
        )
        .expect("patch");
    let tree = vdom.dom();
    let circle = root.children()[0].elm().expect("bound");
    let foreign = root.children()[1].elm().expect("bound");
    let inner = root.children()[1].children()[0].elm().expect("bound");
    assert_eq!(tree.namespace(root.elm().expect("bound")), Some(SVG_NS));
    assert_eq!(tree.namespace(circle), Some(SVG_NS));
    assert_eq!(tree.namespace(foreign), Some(SVG_NS));
    assert_eq!(tree.namespace(inner), None);
    assert_eq!(tree.get_attribute(circle, "r").as_deref(), Some("4"));
}

#[test]
fn unbound_old_root_is_rejected() {
    let (mut vdom, _mount) = engine();
    let never_patched = h("div", VNodeData::new(), ());
    let err = vdom
        .patch(never_patched, h("div", VNodeData::new(), ()))
        .unwrap_err();
    assert_eq!(err, VdomError::MissingSameNodeTarget);
    assert!(vdom.dom().ops().is_empty());
}

#[test]
fn unknown_live_node_is_rejected() {
    let (mut vdom, _mount) = engine();
    let stray = NodeId::from_raw(999).expect("non-zero");
    let err = vdom
        .patch(PatchTarget::Live(stray), h("div", VNodeData::new(), ()))
        .unwrap_err();
    assert_eq!(err, VdomError::MissingSameNodeTarget);
}

#[test]
fn bad_shape_fails_without_rolling_back_earlier_siblings() {
    let (mut vdom, mount) = engine();
    let old = vdom
        .patch(
            mount,
            h(
                "ul",
                VNodeData::new(),
                vec![
                    h("li", VNodeData::new().key(1), "before"),
                    h("li", VNodeData::new().key(2), ()),
                ],
            ),
        )
        .expect("patch");
    let first = old.children()[0].elm().expect("bound");

    let err = vdom
        .patch(
            old,
            h(
                "ul",
                VNodeData::new(),
                vec![
                    h("li", VNodeData::new().key(1), "after"),
                    h(
                        "li",
                        VNodeData::new().key(2),
                        vec![
                            h("b", VNodeData::new().key("dup"), ()),
                            h("i", VNodeData::new().key("dup"), ()),
                        ],
                    ),
                ],
            ),
        )
        .unwrap_err();
    assert!(matches!(err, VdomError::InvalidVNodeShape { .. }));
    assert_eq!(vdom.dom().text_content(first).as_deref(), Some("after"));
}

#[test]
fn text_with_children_fails_on_create() {
    let (mut vdom, mount) = engine();
    let mut bad = h("p", VNodeData::new(), "text");
    bad.children = Some(vec![h("b", VNodeData::new(), ())]);
    let err = vdom.patch(mount, bad).unwrap_err();
    assert!(matches!(err, VdomError::InvalidVNodeShape { .. }));
    assert_eq!(vdom.dom().children(mount), &[] as &[NodeId]);
}
