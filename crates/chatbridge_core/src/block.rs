//! Block kinds and the open-block stack.
//!
//! Blocks are delimited in the chat stream by inline `<tag>` / `</tag>`
//! markers. Nesting is strictly LIFO: only the top of the stack can close.

use std::fmt;
use std::str::FromStr;

use crate::error::{BridgeError, Result};

/// Closed set of block kinds the host knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Model reasoning, rendered as a collapsible region.
    Think,
    /// Informational text that is not part of the chat answer.
    Meta,
}

impl BlockKind {
    /// Structural tag name written to the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::Think => "collapse",
            BlockKind::Meta => "metadata",
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            BlockKind::Think => "think",
            BlockKind::Meta => "meta",
        }
    }

    pub fn open_tag(&self) -> String {
        format!("<{}>", self.tag())
    }

    pub fn close_tag(&self) -> String {
        format!("</{}>", self.tag())
    }
}

impl FromStr for BlockKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "think" => Ok(BlockKind::Think),
            "meta" => Ok(BlockKind::Meta),
            other => Err(BridgeError::UnknownBlockKind(other.to_string())),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Stack of currently open blocks for one invocation.
#[derive(Debug, Default, Clone)]
pub struct BlockStack {
    open: Vec<BlockKind>,
}

impl BlockStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: BlockKind) {
        self.open.push(kind);
    }

    /// Pops the innermost open block. There is no way to close anything else.
    pub fn pop(&mut self) -> Option<BlockKind> {
        self.open.pop()
    }

    pub fn top(&self) -> Option<BlockKind> {
        self.open.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn open_tags(&self) -> Vec<&'static str> {
        self.open.iter().map(|k| k.tag()).collect()
    }

    pub fn ensure_empty(&self) -> Result<()> {
        if self.open.is_empty() {
            Ok(())
        } else {
            Err(BridgeError::UnbalancedBlocks {
                open: self.open_tags(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_table() {
        assert_eq!(BlockKind::Think.tag(), "collapse");
        assert_eq!(BlockKind::Meta.tag(), "metadata");
        assert_eq!(BlockKind::Think.open_tag(), "<collapse>");
        assert_eq!(BlockKind::Meta.close_tag(), "</metadata>");
    }

    #[test]
    fn test_parse_keyword() {
        assert_eq!("think".parse::<BlockKind>().unwrap(), BlockKind::Think);
        assert_eq!("meta".parse::<BlockKind>().unwrap(), BlockKind::Meta);
    }

    #[test]
    fn test_unknown_keyword_fails_fast() {
        let err = "collapse".parse::<BlockKind>().unwrap_err();
        assert!(matches!(err, BridgeError::UnknownBlockKind(ref k) if k == "collapse"));
    }

    #[test]
    fn test_stack_is_lifo() {
        let mut stack = BlockStack::new();
        stack.push(BlockKind::Think);
        stack.push(BlockKind::Meta);

        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top(), Some(BlockKind::Meta));
        assert_eq!(stack.pop(), Some(BlockKind::Meta));
        assert_eq!(stack.pop(), Some(BlockKind::Think));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_ensure_empty() {
        let mut stack = BlockStack::new();
        assert!(stack.ensure_empty().is_ok());

        stack.push(BlockKind::Think);
        let err = stack.ensure_empty().unwrap_err();
        assert!(matches!(err, BridgeError::UnbalancedBlocks { ref open } if open == &vec!["collapse"]));
    }
}
