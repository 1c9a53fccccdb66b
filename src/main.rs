use dom::{DomTree, OpCounts};
use mimalloc::MiMalloc;
use vdom::{DomEvent, VNode, VNodeData, Vdom, h, modules};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

struct Todo {
    id: i64,
    title: &'static str,
    done: bool,
}

fn view(todos: &[Todo]) -> VNode {
    let items: Vec<VNode> = todos
        .iter()
        .map(|todo| {
            h(
                "li.todo",
                VNodeData::new()
                    .key(todo.id)
                    .class("done", todo.done)
                    .on("click", |event: &DomEvent| {
                        println!("clicked {}", event.target);
                    }),
                todo.title,
            )
        })
        .collect();
    h(
        "div#app",
        VNodeData::new(),
        vec![
            h("h1", VNodeData::new(), format!("{} todos", todos.len())),
            h("ul", VNodeData::new(), items),
        ],
    )
}

fn report(step: &str, vdom: &mut Vdom<DomTree>) {
    let counts = OpCounts::of(vdom.dom().ops());
    println!(
        "== {step}: {} ops (created {}, inserted {}, moved {}, removed {}, content {})",
        counts.total(),
        counts.created,
        counts.inserted,
        counts.moved,
        counts.removed,
        counts.content
    );
    println!("{}", vdom.dom().render());
    vdom.dom_mut().clear_ops();
}

fn main() {
    let mut tree = DomTree::new();
    let mount = tree.mount_point("div");
    tree.clear_ops();
    let mut vdom = vdom::init(modules::all(), tree);

    let mut todos = vec![
        Todo { id: 1, title: "write reconciler", done: true },
        Todo { id: 2, title: "write modules", done: false },
        Todo { id: 3, title: "ship it", done: false },
    ];

    let result = vdom
        .patch(mount, view(&todos))
        .and_then(|current| {
            report("mount", &mut vdom);
            todos.rotate_right(1);
            todos[1].done = true;
            vdom.patch(current, view(&todos))
        })
        .and_then(|current| {
            report("reorder", &mut vdom);
            todos.retain(|todo| todo.id != 2);
            vdom.patch(current, view(&todos))
        });

    match result {
        Ok(current) => {
            report("remove", &mut vdom);
            if let Some(first) = current.children()[1].children().first().and_then(VNode::elm) {
                vdom.dom().dispatch(&DomEvent::new("click", first));
            }
        }
        Err(err) => {
            eprintln!("patch failed: {err}");
            std::process::exit(1);
        }
    }
}
