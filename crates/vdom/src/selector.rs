//! Selector shorthand parsing (`tag#id.class1.class2`).

use memchr::{memchr, memchr2};
use std::fmt;

/// Tag name used for comment descriptors.
pub const COMMENT_TAG: &str = "!";

const DEFAULT_TAG: &str = "div";

/// Parsed form of a selector shorthand.
///
/// Only `tag` and `id` take part in node sameness. Classes are written when
/// the element is created and diffed when it is reused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Selector {
    pub fn parse(sel: &str) -> Self {
        let bytes = sel.as_bytes();
        let tag_end = memchr2(b'#', b'.', bytes).unwrap_or(bytes.len());
        let tag = if tag_end == 0 {
            DEFAULT_TAG.to_string()
        } else {
            sel[..tag_end].to_string()
        };

        let mut id = None;
        let mut rest = tag_end;
        if bytes.get(tag_end) == Some(&b'#') {
            let start = tag_end + 1;
            let end = memchr(b'.', &bytes[start..]).map_or(bytes.len(), |rel| start + rel);
            if end > start {
                id = Some(sel[start..end].to_string());
            }
            rest = end;
        }

        let classes = if rest < bytes.len() {
            sel[rest + 1..]
                .split('.')
                .filter(|class| !class.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };

        Self { tag, id, classes }
    }

    pub fn is_comment(&self) -> bool {
        self.tag == COMMENT_TAG
    }

    /// Tag and id equality, the selector half of node sameness.
    pub fn same_identity(&self, other: &Selector) -> bool {
        self.tag == other.tag && self.id == other.id
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)?;
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        Ok(())
    }
}
