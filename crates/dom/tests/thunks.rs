mod common;

use common::engine;
use dom::DomOp;
use vdom::{DomApi, Value, VNode, VNodeBuilder, VNodeData, VdomError, h, thunk};

fn counter(args: &[Value]) -> VNode {
    let label = match args.first() {
        Some(Value::Int(n)) => format!("count {n}"),
        _ => "count ?".to_string(),
    };
    h("span.counter", VNodeData::new(), label)
}

fn wrong_tag(_: &[Value]) -> VNode {
    h("em", VNodeData::new(), ())
}

fn view(count: i64) -> VNode {
    h(
        "div",
        VNodeData::new(),
        vec![thunk("span", "counter", vec![Value::from(count)], counter)],
    )
}

#[test]
fn equal_arguments_reuse_rendered_subtree() {
    let (mut vdom, mount) = engine();
    let old = vdom.patch(mount, view(1)).expect("patch");
    let span = old.children()[0].elm().expect("bound");
    assert_eq!(vdom.dom().text_content(span).as_deref(), Some("count 1"));
    assert!(vdom.dom().has_class(span, "counter"));
    vdom.dom_mut().clear_ops();

    let new = vdom.patch(old, view(1)).expect("patch");
    assert!(vdom.dom().ops().is_empty(), "{:?}", vdom.dom().ops());
    assert_eq!(new.children()[0].elm(), Some(span));
    assert_eq!(new.children()[0].text.as_deref(), Some("count 1"));
}

#[test]
fn changed_arguments_rerender_in_place() {
    let (mut vdom, mount) = engine();
    let old = vdom.patch(mount, view(1)).expect("patch");
    let span = old.children()[0].elm().expect("bound");
    vdom.dom_mut().clear_ops();

    vdom.patch(old, view(2)).expect("patch");
    assert_eq!(
        vdom.dom().ops(),
        &[DomOp::SetText {
            node: span,
            text: "count 2".to_string(),
        }]
    );
}

#[test]
fn thunk_must_render_its_own_tag() {
    let (mut vdom, mount) = engine();
    let err = vdom
        .patch(
            mount,
            h(
                "div",
                VNodeData::new(),
                vec![thunk("span", "bad", Vec::new(), wrong_tag)],
            ),
        )
        .unwrap_err();
    assert!(matches!(err, VdomError::InvalidVNodeShape { .. }), "{err}");
}

#[test]
fn builder_rejects_text_with_children() {
    let err = VNodeBuilder::new("p")
        .text("both")
        .child(h("b", VNodeData::new(), ()))
        .build()
        .unwrap_err();
    assert!(matches!(err, VdomError::InvalidVNodeShape { .. }));

    let node = VNodeBuilder::new("ul.items")
        .children(["a", "b"].map(|key| h("li", VNodeData::new().key(key), key)))
        .build()
        .expect("valid");
    let (mut vdom, mount) = engine();
    let root = vdom.patch(mount, node).expect("patch");
    assert_eq!(
        vdom.dom().snapshot(root.elm().expect("bound")).render(),
        "<ul class=\"items\">\n  <li>\n    \"a\"\n  <li>\n    \"b\""
    );
}
