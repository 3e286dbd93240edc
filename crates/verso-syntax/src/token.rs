use text_size::{TextRange, TextSize};

use crate::SyntaxKind;

/// A typed, non-empty slice of the source text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub start: TextSize,
    pub len: TextSize,
}

impl Token {
    pub fn new(kind: SyntaxKind, range: TextRange) -> Self {
        Self { kind, start: range.start(), len: range.len() }
    }

    pub fn end(&self) -> TextSize {
        self.start + self.len
    }

    pub fn range(&self) -> TextRange {
        TextRange::at(self.start, self.len)
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range()]
    }

    /// Index of the token containing `offset` in a sorted, gapless sequence.
    pub fn find(tokens: &[Self], offset: TextSize) -> Option<usize> {
        let index = tokens.partition_point(|token| token.start <= offset).checked_sub(1)?;
        tokens[index].range().contains(offset).then_some(index)
    }
}
