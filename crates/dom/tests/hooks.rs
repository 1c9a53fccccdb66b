mod common;

use common::{Journal, Recorder, engine, engine_with};
use std::cell::RefCell;
use std::rc::Rc;
use vdom::{Hooks, Module, RemoveCallback, VNode, VNodeData, h, modules};

fn journaled(journal: &Journal, label: &'static str) -> Hooks {
    let j = journal.clone();
    let init = move |_: &mut VNode| j.push(format!("init:{label}"));
    let j = journal.clone();
    let create = move |_: &VNode, _: &VNode| j.push(format!("create:{label}"));
    let j = journal.clone();
    let insert = move |_: &VNode| j.push(format!("insert:{label}"));
    let j = journal.clone();
    let prepatch = move |_: &VNode, _: &VNode| j.push(format!("prepatch:{label}"));
    let j = journal.clone();
    let update = move |_: &VNode, _: &VNode| j.push(format!("update:{label}"));
    let j = journal.clone();
    let postpatch = move |_: &VNode, _: &VNode| j.push(format!("postpatch:{label}"));
    let j = journal.clone();
    let destroy = move |_: &VNode| j.push(format!("destroy:{label}"));
    Hooks::new()
        .init(init)
        .create(create)
        .insert(insert)
        .prepatch(prepatch)
        .update(update)
        .postpatch(postpatch)
        .destroy(destroy)
}

fn tree(journal: &Journal, child_text: &str) -> VNode {
    h(
        "div",
        VNodeData::new().key("parent").hook(journaled(journal, "parent")),
        vec![h(
            "span",
            VNodeData::new().hook(journaled(journal, "child")),
            child_text,
        )],
    )
}

#[test]
fn creation_hooks_run_children_first_and_insert_last() {
    let journal = Journal::default();
    let (mut vdom, mount) = engine();
    vdom.patch(mount, tree(&journal, "x")).expect("patch");
    assert_eq!(
        journal.entries(),
        [
            "init:parent",
            "init:child",
            "create:child",
            "create:parent",
            "insert:child",
            "insert:parent",
        ]
    );
}

#[test]
fn update_hooks_bracket_children() {
    let journal = Journal::default();
    let (mut vdom, mount) = engine();
    let old = vdom.patch(mount, tree(&journal, "x")).expect("patch");
    journal.take();

    vdom.patch(old, tree(&journal, "y")).expect("patch");
    assert_eq!(
        journal.entries(),
        [
            "prepatch:parent",
            "update:parent",
            "prepatch:child",
            "update:child",
            "postpatch:child",
            "postpatch:parent",
        ]
    );
}

#[test]
fn init_may_rewrite_the_descriptor() {
    let (mut vdom, mount) = engine();
    let hooks = Hooks::new().init(|vnode: &mut VNode| {
        vnode.text = Some("from init".to_string());
    });
    let root = vdom
        .patch(mount, h("p", VNodeData::new().hook(hooks), ()))
        .expect("patch");
    let elm = root.elm().expect("bound");
    assert_eq!(vdom.dom().snapshot(elm).render(), "<p>\n  \"from init\"");
}

#[test]
fn destroy_runs_for_whole_subtree_after_detach() {
    let journal = Journal::default();
    let (mut vdom, mount) = engine();
    let old = vdom.patch(mount, tree(&journal, "x")).expect("patch");
    let parent = old.elm().expect("bound");
    journal.take();

    vdom.patch(old, h("div", VNodeData::new().key("other"), ()))
        .expect("patch");
    assert_eq!(journal.entries(), ["destroy:parent", "destroy:child"]);
    assert!(!vdom.dom().is_attached(parent));
    assert_eq!(vdom.pending_removals(), 0);
}

#[test]
fn remove_hook_defers_detach_until_done() {
    let held: Rc<RefCell<Option<RemoveCallback>>> = Rc::default();
    let destroyed = Journal::default();
    let slot = Rc::clone(&held);
    let log = destroyed.clone();
    let hooks = Hooks::new()
        .remove(move |_: &VNode, done: RemoveCallback| {
            *slot.borrow_mut() = Some(done);
        })
        .destroy(move |_: &VNode| log.push("destroy"));

    let (mut vdom, mount) = engine();
    let old = vdom
        .patch(
            mount,
            h(
                "ul",
                VNodeData::new(),
                vec![
                    h("li", VNodeData::new().key(1).hook(hooks), "leaving"),
                    h("li", VNodeData::new().key(2), "staying"),
                ],
            ),
        )
        .expect("patch");
    let leaving = old.children()[0].elm().expect("bound");
    let new = vdom
        .patch(
            old,
            h(
                "ul",
                VNodeData::new(),
                vec![h("li", VNodeData::new().key(2), "staying")],
            ),
        )
        .expect("patch");

    assert!(vdom.dom().is_attached(leaving));
    assert_eq!(vdom.pending_removals(), 1);
    assert!(destroyed.entries().is_empty());
    assert_eq!(vdom.flush_removals(), 0);

    let done = held.borrow_mut().take().expect("remove hook ran");
    done.done();
    assert_eq!(vdom.flush_removals(), 1);
    assert!(!vdom.dom().is_attached(leaving));
    assert_eq!(destroyed.entries(), ["destroy"]);
    assert_eq!(vdom.pending_removals(), 0);
    assert_eq!(vdom.dom().children(new.elm().expect("bound")).len(), 1);
}

#[test]
fn dropped_remove_callback_leaves_node_attached() {
    let hooks = Hooks::new().remove(|_: &VNode, done: RemoveCallback| drop(done));
    let (mut vdom, mount) = engine();
    let old = vdom
        .patch(
            mount,
            h(
                "div",
                VNodeData::new(),
                vec![h("span", VNodeData::new().key("s").hook(hooks), ())],
            ),
        )
        .expect("patch");
    let span = old.children()[0].elm().expect("bound");
    vdom.patch(old, h("div", VNodeData::new(), Vec::<VNode>::new()))
        .expect("patch");
    vdom.frame();
    assert!(vdom.dom().is_attached(span));
    assert_eq!(vdom.pending_removals(), 1);
}

#[test]
fn modules_run_in_configured_order_around_the_tree() {
    let journal = Journal::default();
    let recorders: Vec<Box<dyn Module>> = vec![
        Box::new(Recorder {
            name: "m1",
            journal: journal.clone(),
        }),
        Box::new(Recorder {
            name: "m2",
            journal: journal.clone(),
        }),
    ];
    let (mut vdom, mount) = engine_with(recorders);
    let old = vdom
        .patch(mount, h("div", VNodeData::new(), vec![h("b", VNodeData::new(), ())]))
        .expect("patch");
    assert_eq!(
        journal.take(),
        ["m1:pre", "m2:pre", "m1:update:div", "m2:update:div", "m1:create:b", "m2:create:b", "m1:post", "m2:post"]
    );

    vdom.patch(old, h("div", VNodeData::new(), ())).expect("patch");
    assert_eq!(
        journal.take(),
        [
            "m1:pre",
            "m2:pre",
            "m1:update:div",
            "m2:update:div",
            "m1:remove:b",
            "m2:remove:b",
            "m1:destroy:b",
            "m2:destroy:b",
            "m1:post",
            "m2:post",
        ]
    );
}

#[test]
fn post_and_flush_run_when_patch_fails() {
    let journal = Journal::default();
    let recorders: Vec<Box<dyn Module>> = vec![Box::new(Recorder {
        name: "m",
        journal: journal.clone(),
    })];
    let (mut vdom, mount) = engine_with(recorders);
    let mut bad = h("p", VNodeData::new(), "text");
    bad.children = Some(Vec::new());
    assert!(vdom.patch(mount, bad).is_err());
    assert_eq!(journal.entries(), ["m:pre", "m:post"]);
}

#[test]
fn bundled_modules_are_named() {
    let names: Vec<&str> = modules::all().iter().map(|m| m.name()).collect();
    assert_eq!(
        names,
        ["class", "props", "attributes", "style", "eventlisteners"]
    );
}
