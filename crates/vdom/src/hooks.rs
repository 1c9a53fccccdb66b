//! Per-descriptor lifecycle hooks (`data.hook`).

use crate::removal::RemoveCallback;
use crate::vnode::VNode;
use std::fmt;
use std::rc::Rc;

pub type InitHook = Rc<dyn Fn(&mut VNode)>;
pub type CreateHook = Rc<dyn Fn(&VNode, &VNode)>;
pub type InsertHook = Rc<dyn Fn(&VNode)>;
pub type PatchHook = Rc<dyn Fn(&VNode, &VNode)>;
pub type DestroyHook = Rc<dyn Fn(&VNode)>;
pub type RemoveHook = Rc<dyn Fn(&VNode, RemoveCallback)>;

/// Every point of the patch lifecycle a module or descriptor can observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookKind {
    Pre,
    Init,
    Create,
    Insert,
    Prepatch,
    Update,
    Postpatch,
    Remove,
    Destroy,
    Post,
}

impl HookKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HookKind::Pre => "pre",
            HookKind::Init => "init",
            HookKind::Create => "create",
            HookKind::Insert => "insert",
            HookKind::Prepatch => "prepatch",
            HookKind::Update => "update",
            HookKind::Postpatch => "postpatch",
            HookKind::Remove => "remove",
            HookKind::Destroy => "destroy",
            HookKind::Post => "post",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callbacks scoped to one descriptor.
///
/// - `init` runs before a live node exists and may rewrite the descriptor.
/// - `create` runs after the node and its children are materialized, with an
///   empty descriptor as the old side.
/// - `insert` runs once the node and all descendants are attached, at the
///   end of the patch call.
/// - `prepatch`, `update` and `postpatch` bracket the reuse of a live node.
/// - `remove` may delay detachment; `destroy` runs once the subtree is gone.
#[derive(Clone, Default)]
pub struct Hooks {
    pub init: Option<InitHook>,
    pub create: Option<CreateHook>,
    pub insert: Option<InsertHook>,
    pub prepatch: Option<PatchHook>,
    pub update: Option<PatchHook>,
    pub postpatch: Option<PatchHook>,
    pub destroy: Option<DestroyHook>,
    pub remove: Option<RemoveHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(mut self, f: impl Fn(&mut VNode) + 'static) -> Self {
        self.init = Some(Rc::new(f));
        self
    }

    pub fn create(mut self, f: impl Fn(&VNode, &VNode) + 'static) -> Self {
        self.create = Some(Rc::new(f));
        self
    }

    pub fn insert(mut self, f: impl Fn(&VNode) + 'static) -> Self {
        self.insert = Some(Rc::new(f));
        self
    }

    pub fn prepatch(mut self, f: impl Fn(&VNode, &VNode) + 'static) -> Self {
        self.prepatch = Some(Rc::new(f));
        self
    }

    pub fn update(mut self, f: impl Fn(&VNode, &VNode) + 'static) -> Self {
        self.update = Some(Rc::new(f));
        self
    }

    pub fn postpatch(mut self, f: impl Fn(&VNode, &VNode) + 'static) -> Self {
        self.postpatch = Some(Rc::new(f));
        self
    }

    pub fn destroy(mut self, f: impl Fn(&VNode) + 'static) -> Self {
        self.destroy = Some(Rc::new(f));
        self
    }

    pub fn remove(mut self, f: impl Fn(&VNode, RemoveCallback) + 'static) -> Self {
        self.remove = Some(Rc::new(f));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.init.is_none()
            && self.create.is_none()
            && self.insert.is_none()
            && self.prepatch.is_none()
            && self.update.is_none()
            && self.postpatch.is_none()
            && self.destroy.is_none()
            && self.remove.is_none()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        let named = [
            (HookKind::Init, self.init.is_some()),
            (HookKind::Create, self.create.is_some()),
            (HookKind::Insert, self.insert.is_some()),
            (HookKind::Prepatch, self.prepatch.is_some()),
            (HookKind::Update, self.update.is_some()),
            (HookKind::Postpatch, self.postpatch.is_some()),
            (HookKind::Destroy, self.destroy.is_some()),
            (HookKind::Remove, self.remove.is_some()),
        ];
        for (kind, present) in named {
            if present {
                set.entry(&kind.as_str());
            }
        }
        set.finish()
    }
}
