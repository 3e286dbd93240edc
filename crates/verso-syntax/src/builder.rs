use text_size::TextSize;
use verso_text::LineIndex;

use crate::arena::Arena;
use crate::tree::NodeData;
use crate::{NodeId, NodeKind, SyntaxTree, Token};

/// Builds a `SyntaxTree` top-down while the parser walks the tokens.
///
/// Every started node must be finished in reverse order; the parser's markers
/// enforce this.
#[derive(Debug)]
pub struct TreeBuilder<'a> {
    nodes: Arena<NodeData>,
    root: NodeId,
    stack: Vec<NodeId>,
    tokens: Vec<Token>,
    line_index: &'a LineIndex,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(root_kind: NodeKind, tokens: Vec<Token>, line_index: &'a LineIndex) -> Self {
        let mut nodes = Arena::default();
        let root = nodes.alloc(NodeData::new(root_kind, None, 0, 0));
        Self { nodes, root, stack: Vec::new(), tokens, line_index }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn line_of(&self, offset: TextSize) -> u32 {
        self.line_index.line_of(offset) as u32
    }

    /// Opens a node whose first token is `token`, as a child of the innermost
    /// open node.
    pub fn start_node(&mut self, token: u32) -> NodeId {
        let parent = self.stack.last().copied().unwrap_or(self.root);
        let start_line = self.line_of(self.tokens[token as usize].start);
        let id = self.nodes.alloc(NodeData::new(NodeKind::Tombstone, Some(parent), token, start_line));
        self.nodes[parent].children.push(id);
        self.stack.push(id);
        id
    }

    /// Closes the innermost open node at `last_token`. `closed == false` marks
    /// a node cut short by error recovery.
    pub fn finish_node(&mut self, kind: NodeKind, last_token: u32, closed: bool) -> NodeId {
        let Some(id) = self.stack.pop() else {
            unreachable!("finish_node without a matching start_node");
        };
        let end = self.tokens[last_token as usize].end();
        let end_line = self.line_of(end - TextSize::from(1));

        let node = &mut self.nodes[id];
        debug_assert!(last_token >= node.token_base, "node finished before its first token");
        node.kind = kind;
        node.extent = last_token.saturating_sub(node.token_base);
        node.closed = closed;
        node.line_count = end_line.saturating_sub(node.start_line);
        id
    }

    pub fn finish(mut self) -> SyntaxTree {
        debug_assert!(self.stack.is_empty(), "unfinished nodes: {:?}", self.stack);

        let root = &mut self.nodes[self.root];
        root.extent = (self.tokens.len() as u32).saturating_sub(1);
        root.closed = true;
        root.line_count = (self.line_index.line_count() as u32).saturating_sub(1);

        SyntaxTree { nodes: self.nodes, root: self.root, tokens: self.tokens, text_len: self.line_index.len() }
    }
}
