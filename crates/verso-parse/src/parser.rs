use drop_bomb::DropBomb;
use text_size::{TextRange, TextSize};
use verso_syntax::{NodeKind, SyntaxKind, Token, TreeBuilder};
use verso_text::LineIndex;

use crate::{Analysis, SyntaxError};

/// Walks the significant tokens of a pass, building the tree as it goes.
/// Trivia is skipped and ends up inside whichever node encloses it.
pub(crate) struct Parser<'a> {
    text: &'a str,
    builder: TreeBuilder<'a>,
    /// Next significant token.
    pos: usize,
    /// Last consumed token.
    last: Option<u32>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(root: NodeKind, text: &'a str, tokens: Vec<Token>, line_index: &'a LineIndex) -> Self {
        let mut parser =
            Self { text, builder: TreeBuilder::new(root, tokens, line_index), pos: 0, last: None, errors: Vec::new() };
        parser.skip_trivia();
        parser
    }

    fn tokens(&self) -> &[Token] {
        self.builder.tokens()
    }

    fn skip_trivia(&mut self) {
        while self.tokens().get(self.pos).is_some_and(|token| token.kind.is_trivia()) {
            self.pos += 1;
        }
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.nth_kind(0)
    }

    /// Kind of the `n`-th significant token ahead.
    pub(crate) fn nth_kind(&self, n: usize) -> SyntaxKind {
        self.nth(n).map_or(SyntaxKind::EOF, |token| token.kind)
    }

    /// Text of the `n`-th significant token ahead.
    pub(crate) fn nth_text(&self, n: usize) -> Option<&'a str> {
        let text = self.text;
        self.nth(n).map(|token| token.text(text))
    }

    fn nth(&self, n: usize) -> Option<Token> {
        self.tokens()[self.pos.min(self.tokens().len())..]
            .iter()
            .filter(|token| !token.kind.is_trivia())
            .nth(n)
            .copied()
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.pos >= self.tokens().len()
    }

    pub(crate) fn advance(&mut self) {
        if self.at_eof() {
            return;
        }
        self.last = Some(self.pos as u32);
        self.pos += 1;
        self.skip_trivia();
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn start(&mut self) -> Marker {
        debug_assert!(!self.at_eof(), "node started at end of input");
        let base = self.pos as u32;
        self.builder.start_node(base);
        Marker::new(base)
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let (token, range) = match self.tokens().get(self.pos) {
            Some(token) => (Some(self.pos as u32), token.range()),
            None => (None, TextRange::empty(TextSize::of(self.text))),
        };
        self.errors.push(SyntaxError { message: message.into(), token, range });
    }

    /// Reports `message` and wraps the offending token in an `Error` node.
    pub(crate) fn error_and_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        if self.at_eof() {
            return;
        }
        let m = self.start();
        self.advance();
        m.complete(self, NodeKind::Error);
    }

    pub(crate) fn finish(self) -> Analysis {
        Analysis { tree: self.builder.finish(), errors: self.errors }
    }
}

pub(crate) struct Marker {
    base: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(base: u32) -> Self {
        Self { base, bomb: DropBomb::new("Marker must be either completed or force-closed") }
    }

    /// Offset of the last consumed token from the node's first token.
    pub(crate) fn slot(&self, p: &Parser<'_>) -> Option<u32> {
        p.last.and_then(|last| last.checked_sub(self.base))
    }

    fn last_token(&self, p: &Parser<'_>) -> u32 {
        let last = p.last.unwrap_or(self.base);
        debug_assert!(last >= self.base, "node finished before consuming a token");
        last.max(self.base)
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: NodeKind) {
        self.bomb.defuse();
        let last = self.last_token(p);
        p.builder.finish_node(kind, last, true);
    }

    /// Closes the node at the last consumed token, marked incomplete.
    pub(crate) fn force_close(mut self, p: &mut Parser<'_>, kind: NodeKind) {
        self.bomb.defuse();
        let last = self.last_token(p);
        p.builder.finish_node(kind, last, false);
    }
}
