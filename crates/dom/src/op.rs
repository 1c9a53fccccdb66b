//! Recorded host mutations.
//!
//! Invariants:
//! - Every successful mutation through `DomApi` appends exactly one op.
//! - Reads never record.
//! - Rejected calls (protocol violations) record nothing.

use core_types::{NodeId, Value};

#[derive(Clone, Debug, PartialEq)]
pub enum DomOp {
    CreateElement {
        node: NodeId,
        tag: String,
        ns: Option<String>,
    },
    CreateText {
        node: NodeId,
        text: String,
    },
    CreateComment {
        node: NodeId,
        text: String,
    },
    /// `moved` is set when `child` was attached elsewhere (or at another
    /// position of the same parent) before the call.
    InsertBefore {
        parent: NodeId,
        child: NodeId,
        before: Option<NodeId>,
        moved: bool,
    },
    RemoveChild {
        parent: NodeId,
        child: NodeId,
    },
    SetText {
        node: NodeId,
        text: String,
    },
    SetAttribute {
        node: NodeId,
        ns: Option<String>,
        name: String,
        value: String,
    },
    RemoveAttribute {
        node: NodeId,
        name: String,
    },
    SetProperty {
        node: NodeId,
        name: String,
        value: Value,
    },
    RemoveProperty {
        node: NodeId,
        name: String,
    },
    AddClass {
        node: NodeId,
        class: String,
    },
    RemoveClass {
        node: NodeId,
        class: String,
    },
    SetStyle {
        node: NodeId,
        name: String,
        value: String,
    },
    RemoveStyle {
        node: NodeId,
        name: String,
    },
    AddListener {
        node: NodeId,
        event: String,
    },
    RemoveListener {
        node: NodeId,
        event: String,
    },
}

impl DomOp {
    /// Node the op mutates (the parent for tree edits).
    pub fn target(&self) -> NodeId {
        match self {
            DomOp::InsertBefore { parent, .. } | DomOp::RemoveChild { parent, .. } => *parent,
            DomOp::CreateElement { node, .. }
            | DomOp::CreateText { node, .. }
            | DomOp::CreateComment { node, .. }
            | DomOp::SetText { node, .. }
            | DomOp::SetAttribute { node, .. }
            | DomOp::RemoveAttribute { node, .. }
            | DomOp::SetProperty { node, .. }
            | DomOp::RemoveProperty { node, .. }
            | DomOp::AddClass { node, .. }
            | DomOp::RemoveClass { node, .. }
            | DomOp::SetStyle { node, .. }
            | DomOp::RemoveStyle { node, .. }
            | DomOp::AddListener { node, .. }
            | DomOp::RemoveListener { node, .. } => *node,
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(
            self,
            DomOp::CreateElement { .. } | DomOp::CreateText { .. } | DomOp::CreateComment { .. }
        )
    }

    pub fn is_move(&self) -> bool {
        matches!(self, DomOp::InsertBefore { moved: true, .. })
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, DomOp::RemoveChild { .. })
    }

    /// Ops that change tree shape rather than node content.
    pub fn is_structural(&self) -> bool {
        self.is_create() || self.is_remove() || matches!(self, DomOp::InsertBefore { .. })
    }
}

/// Summary of an op slice, for assertions that care about counts only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpCounts {
    pub created: usize,
    pub inserted: usize,
    pub moved: usize,
    pub removed: usize,
    pub content: usize,
}

impl OpCounts {
    pub fn of(ops: &[DomOp]) -> Self {
        let mut counts = Self::default();
        for op in ops {
            match op {
                op if op.is_create() => counts.created += 1,
                DomOp::InsertBefore { moved: true, .. } => counts.moved += 1,
                DomOp::InsertBefore { moved: false, .. } => counts.inserted += 1,
                DomOp::RemoveChild { .. } => counts.removed += 1,
                _ => counts.content += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.created + self.inserted + self.moved + self.removed + self.content
    }
}
