use std::fmt::Write as _;

use text_size::{TextRange, TextSize};

use crate::arena::Arena;
use crate::cursor::Preorder;
use crate::{NodeId, NodeKind, Token};

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Absolute index of the first token.
    pub(crate) token_base: u32,
    /// Offset of the last token relative to `token_base`.
    pub(crate) extent: u32,
    pub(crate) closed: bool,
    pub(crate) start_line: u32,
    pub(crate) line_count: u32,
    pub(crate) folded: bool,
    pub(crate) expanded: bool,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind, parent: Option<NodeId>, token_base: u32, start_line: u32) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            token_base,
            extent: 0,
            closed: false,
            start_line,
            line_count: 0,
            folded: false,
            expanded: false,
        }
    }

    pub(crate) fn last_token(&self) -> u32 {
        self.token_base + self.extent
    }
}

/// A syntax tree that owns the token array of the pass that produced it.
#[derive(Debug)]
pub struct SyntaxTree {
    pub(crate) nodes: Arena<NodeData>,
    pub(crate) root: NodeId,
    pub(crate) tokens: Vec<Token>,
    pub(crate) text_len: TextSize,
}

impl SyntaxTree {
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode { tree: self, id: self.root }
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<SyntaxNode<'_>> {
        self.nodes.contains(id).then_some(SyntaxNode { tree: self, id })
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn text_len(&self) -> TextSize {
        self.text_len
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id]
    }

    /// Absolute index of the node's last token, or `None` for an empty root.
    pub(crate) fn last_token(&self, id: NodeId) -> Option<u32> {
        if id == self.root {
            return (self.tokens.len() as u32).checked_sub(1);
        }
        Some(self.nodes[id].last_token())
    }

    pub(crate) fn end_line(&self, id: NodeId) -> u32 {
        let node = &self.nodes[id];
        node.start_line + node.line_count
    }

    pub(crate) fn span(&self, id: NodeId) -> TextRange {
        if id == self.root {
            return TextRange::up_to(self.text_len);
        }
        let node = &self.nodes[id];
        let start = self.tokens[node.token_base as usize].start;
        let end = self.tokens[node.last_token() as usize].end();
        TextRange::new(start, end)
    }

    /// Closed, slots filled, structurally whole, and so is every descendant.
    pub(crate) fn is_complete(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        if !node.closed || !node.kind.slots_filled() {
            return false;
        }

        let kind_of = |child: Option<&NodeId>| child.map(|&child| self.nodes[child].kind);
        let whole = match node.kind {
            NodeKind::Element => match kind_of(node.children.first()) {
                Some(NodeKind::StartTag { self_closing: true, .. }) => true,
                Some(NodeKind::StartTag { .. }) => {
                    node.children.len() > 1
                        && matches!(kind_of(node.children.last()), Some(NodeKind::EndTag { .. }))
                }
                _ => false,
            },
            NodeKind::Rule => {
                matches!(kind_of(node.children.first()), Some(NodeKind::Selector))
                    && matches!(kind_of(node.children.last()), Some(NodeKind::DeclarationBlock { .. }))
            }
            _ => true,
        };

        whole && node.children.iter().all(|&child| self.is_complete(child))
    }

    pub fn find_token_including_position(&self, offset: TextSize) -> Option<usize> {
        match Token::find(&self.tokens, offset) {
            Some(index) => Some(index),
            None if offset == self.text_len => self.tokens.len().checked_sub(1),
            None => None,
        }
    }

    /// The deepest node whose span contains `offset`, or with `outermost` the
    /// top-level node under the root. Falls back to the root.
    pub fn find_node_including_position(&self, offset: TextSize, outermost: bool) -> NodeId {
        let mut current = self.root;
        while let Some(&child) =
            self.nodes[current].children.iter().find(|&&child| self.span(child).contains(offset))
        {
            current = child;
            if outermost {
                break;
            }
        }
        current
    }

    /// The deepest node whose span encloses `range`, ends included. When
    /// `range` touches two siblings the earlier one wins.
    pub fn find_node_including_span(&self, range: TextRange) -> NodeId {
        let mut current = self.root;
        while let Some(&child) = self.nodes[current]
            .children
            .iter()
            .find(|&&child| self.span(child).contains_range(range))
        {
            current = child;
        }
        current
    }

    pub fn set_folded(&mut self, id: NodeId, folded: bool) -> bool {
        self.nodes.get_mut(id).map(|node| node.folded = folded).is_some()
    }

    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> bool {
        self.nodes.get_mut(id).map(|node| node.expanded = expanded).is_some()
    }

    pub fn preorder(&self) -> Preorder<'_> {
        Preorder::new(self.root())
    }

    /// Indented outline of nodes and their non-trivia tokens.
    pub fn debug_dump(&self, text: &str) -> String {
        let mut out = String::new();
        self.dump_node(&mut out, text, self.root, 0);
        out
    }

    fn dump_node(&self, out: &mut String, text: &str, id: NodeId, depth: usize) {
        let node = &self.nodes[id];
        let span = self.span(id);
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}{}@{:?}", node.kind.name(), span);
        if !node.closed {
            out.push_str(" [unclosed]");
        }
        out.push('\n');

        let Some(last) = self.last_token(id) else {
            return;
        };
        let mut children = node.children.iter().peekable();
        let mut index = node.token_base;
        while index <= last {
            if let Some(&&child) = children.peek()
                && self.nodes[child].token_base == index
            {
                children.next();
                self.dump_node(out, text, child, depth + 1);
                index = self.nodes[child].last_token() + 1;
                continue;
            }

            let token = self.tokens[index as usize];
            if !token.kind.is_trivia() {
                let _ = writeln!(
                    out,
                    "{indent}  {:?}@{:?} {:?}",
                    token.kind,
                    token.range(),
                    token.text(text)
                );
            }
            index += 1;
        }
    }
}

/// Borrowed handle to a node of a `SyntaxTree`.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a SyntaxTree,
    id: NodeId,
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxNode<'_> {}

impl std::fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{:?}", self.kind().name(), self.span())
    }
}

impl<'a> SyntaxNode<'a> {
    fn data(&self) -> &'a NodeData {
        self.tree.data(self.id)
    }

    fn wrap(&self, id: NodeId) -> Self {
        Self { tree: self.tree, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn is_root(&self) -> bool {
        self.id == self.tree.root
    }

    pub fn parent(&self) -> Option<Self> {
        self.data().parent.map(|id| self.wrap(id))
    }

    pub fn children(&self) -> impl Iterator<Item = SyntaxNode<'a>> + 'a {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| SyntaxNode { tree, id })
    }

    pub fn first_child(&self) -> Option<Self> {
        self.data().children.first().map(|&id| self.wrap(id))
    }

    pub fn next_sibling(&self) -> Option<Self> {
        let siblings = &self.tree.data(self.data().parent?).children;
        let position = siblings.iter().position(|&id| id == self.id)?;
        siblings.get(position + 1).map(|&id| self.wrap(id))
    }

    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode<'a>> + 'a {
        std::iter::successors(Some(*self), SyntaxNode::parent)
    }

    pub fn span(&self) -> TextRange {
        self.tree.span(self.id)
    }

    pub fn token_base(&self) -> u32 {
        self.data().token_base
    }

    /// Offset of the last token from `token_base`, `None` while the node is
    /// incomplete.
    pub fn last_token_offset(&self) -> Option<u32> {
        if self.is_root() {
            return self.tree.last_token(self.id);
        }
        let data = self.data();
        data.closed.then_some(data.extent)
    }

    pub fn tokens(&self) -> &'a [Token] {
        match self.tree.last_token(self.id) {
            Some(last) => &self.tree.tokens[self.token_base() as usize..=last as usize],
            None => &[],
        }
    }

    pub fn start_line(&self) -> u32 {
        self.data().start_line
    }

    pub fn line_count(&self) -> u32 {
        self.data().line_count
    }

    pub fn end_line(&self) -> u32 {
        self.tree.end_line(self.id)
    }

    pub fn is_folded(&self) -> bool {
        self.data().folded
    }

    pub fn is_expanded(&self) -> bool {
        self.data().expanded
    }

    pub fn is_complete(&self) -> bool {
        self.tree.is_complete(self.id)
    }

    pub fn preorder(&self) -> Preorder<'a> {
        Preorder::new(*self)
    }

    pub fn text<'t>(&self, source: &'t str) -> &'t str {
        &source[self.span()]
    }
}
