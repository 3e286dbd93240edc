//! Hand-written tokenizers producing a gapless token sequence, trivia
//! included.

mod cursor;
mod markup;
mod stylesheet;

use cursor::Cursor;
pub use markup::MarkupTokenizer;
pub use stylesheet::{StylesheetTokenizer, opens_rule_block};
use text_size::{TextRange, TextSize};
use verso_syntax::SyntaxKind::*;
pub use verso_syntax::{SyntaxKind, Token};

/// Splits a complete text into tokens. Tokens come out sorted, contiguous and
/// non-empty, covering every byte of `text`.
pub trait Tokenize: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset:?}")]
pub struct TokenizeError {
    pub offset: TextSize,
    pub message: String,
}

/// Shared machinery of the language tokenizers.
pub(crate) struct Lexer<'a> {
    cursor: Cursor<'a>,
    text: &'a str,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { cursor: Cursor::new(text), text, tokens: Vec::with_capacity(text.len() / 4) }
    }

    pub(crate) fn cursor(&mut self) -> &mut Cursor<'a> {
        &mut self.cursor
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.cursor.is_eof()
    }

    pub(crate) fn offset(&self) -> TextSize {
        TextSize::of(self.text) - self.cursor.len()
    }

    fn token_start(&self) -> TextSize {
        self.offset() - self.cursor.pos_within_token()
    }

    /// Text consumed since the last cut.
    pub(crate) fn current_text(&self) -> &'a str {
        &self.text[TextRange::new(self.token_start(), self.offset())]
    }

    /// Cuts the consumed input into a token of `kind`. Does nothing if
    /// nothing was consumed.
    pub(crate) fn add_token(&mut self, kind: SyntaxKind) {
        let len = self.cursor.pos_within_token();
        if len == TextSize::new(0) {
            return;
        }
        self.tokens.push(Token::new(kind, TextRange::at(self.token_start(), len)));
        self.cursor.reset_pos_within_token();
    }

    /// The kind of the last token emitted that is not trivia.
    pub(crate) fn last_significant(&self) -> Option<SyntaxKind> {
        self.tokens.iter().rev().map(|token| token.kind).find(|kind| !kind.is_trivia())
    }

    /// Emits whitespace runs as `WHITESPACE`, `TABULATION` and `LINE_BREAK`
    /// tokens.
    pub(crate) fn trivia(&mut self) {
        loop {
            let kind = match self.cursor.peek() {
                _ if self.cursor.is_eof() => break,
                '\t' => {
                    self.cursor.advance_while(|c| c == '\t');
                    TABULATION
                }
                '\r' => {
                    self.cursor.advance();
                    self.cursor.eat("\n");
                    LINE_BREAK
                }
                c if is_line_break(c) => {
                    self.cursor.advance();
                    LINE_BREAK
                }
                c if is_blank(c) => {
                    self.cursor.advance_while(is_blank);
                    WHITESPACE
                }
                _ => break,
            };
            self.add_token(kind);
        }
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> TokenizeError {
        TokenizeError { offset: self.offset(), message: message.into() }
    }

    pub(crate) fn finish(self) -> Vec<Token> {
        debug_assert!(self.cursor.is_eof());
        self.tokens
    }
}

pub(crate) fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

fn is_blank(c: char) -> bool {
    c.is_whitespace() && c != '\t' && !is_line_break(c)
}

#[cfg(test)]
mod tests;
