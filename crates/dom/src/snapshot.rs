use crate::tree::{DomTree, NodeData};
use core_types::NodeId;
use std::fmt::{self, Write};

/// Deterministic serialization of a live subtree for test comparisons.
/// Not a stable format.
///
/// Rendering rules:
/// - One line per node, indented two spaces per depth level.
/// - Elements list `class` first, then attributes in insertion order, then
///   inline style, properties and listener names when present.
/// - Text is quoted and escaped; comments render as `<!-- text -->`.
/// - Node ids and namespaces are included only on request.
#[derive(Clone, Copy, Debug)]
pub struct DomSnapshotOptions {
    pub ignore_ids: bool,
    pub include_ns: bool,
    pub include_props: bool,
    pub include_listeners: bool,
}

impl Default for DomSnapshotOptions {
    fn default() -> Self {
        Self {
            ignore_ids: true,
            include_ns: false,
            include_props: true,
            include_listeners: true,
        }
    }
}

#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(tree: &DomTree, root: NodeId, options: DomSnapshotOptions) -> Self {
        let mut lines = Vec::new();
        walk_snapshot(tree, root, &options, 0, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

fn walk_snapshot(
    tree: &DomTree,
    node: NodeId,
    options: &DomSnapshotOptions,
    depth: usize,
    out: &mut Vec<String>,
) {
    const INDENT_STEP: usize = 2;
    let Some(data) = tree.data(node) else {
        return;
    };
    let mut line = " ".repeat(depth.saturating_mul(INDENT_STEP));
    write_node_line(&mut line, node, data, options);
    out.push(line);
    if let NodeData::Element(_) = data {
        for &child in tree.children(node) {
            walk_snapshot(tree, child, options, depth + 1, out);
        }
    }
}

fn write_node_line(out: &mut String, node: NodeId, data: &NodeData, options: &DomSnapshotOptions) {
    match data {
        NodeData::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            if options.include_ns {
                if let Some(ns) = &element.ns {
                    out.push_str(" xmlns=\"");
                    write_escaped(out, ns);
                    out.push('"');
                }
            }
            if !element.classes.is_empty() {
                out.push_str(" class=\"");
                for (i, class) in element.classes.iter().enumerate() {
                    if i != 0 {
                        out.push(' ');
                    }
                    write_escaped(out, class);
                }
                out.push('"');
            }
            for (name, attr) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                if !attr.value.is_empty() {
                    out.push_str("=\"");
                    write_escaped(out, &attr.value);
                    out.push('"');
                }
            }
            if !options.ignore_ids {
                let _ = write!(out, " data-node-id=\"{}\"", node.as_raw());
            }
            if !element.style.is_empty() {
                out.push_str(" style=[");
                for (i, (name, value)) in element.style.iter().enumerate() {
                    if i != 0 {
                        out.push_str("; ");
                    }
                    out.push_str(name);
                    out.push_str(": ");
                    write_escaped(out, value);
                }
                out.push(']');
            }
            if options.include_props && !element.props.is_empty() {
                out.push_str(" props=[");
                for (i, (name, value)) in element.props.iter().enumerate() {
                    if i != 0 {
                        out.push_str("; ");
                    }
                    out.push_str(name);
                    out.push_str(": ");
                    write_escaped(out, &value.to_string());
                }
                out.push(']');
            }
            if options.include_listeners && !element.listeners.is_empty() {
                out.push_str(" on=[");
                for (i, event) in element.listeners.keys().enumerate() {
                    if i != 0 {
                        out.push_str(", ");
                    }
                    out.push_str(event);
                }
                out.push(']');
            }
            out.push('>');
        }
        NodeData::Text(text) => {
            out.push('"');
            write_escaped(out, text);
            out.push('"');
            if !options.ignore_ids {
                let _ = write!(out, " id={}", node.as_raw());
            }
        }
        NodeData::Comment(text) => {
            out.push_str("<!-- ");
            write_escaped(out, text);
            out.push_str(" -->");
            if !options.ignore_ids {
                let _ = write!(out, " id={}", node.as_raw());
            }
        }
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
}
