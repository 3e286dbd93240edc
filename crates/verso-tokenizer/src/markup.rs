use verso_syntax::SyntaxKind::*;
use verso_syntax::{SyntaxKind, Token};

use crate::{Lexer, Tokenize, TokenizeError};

/// Tokenizer for XML and HTML-like markup.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkupTokenizer;

impl Tokenize for MarkupTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        let mut lexer = MarkupLexer { lexer: Lexer::new(text), state: State::Content };
        while !lexer.lexer.is_eof() {
            lexer.step()?;
        }
        Ok(lexer.lexer.finish())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Content,
    TagName,
    InTag,
    AttributeValue(char),
}

struct MarkupLexer<'a> {
    lexer: Lexer<'a>,
    state: State,
}

impl MarkupLexer<'_> {
    fn step(&mut self) -> Result<(), TokenizeError> {
        match self.state {
            State::Content => self.content(),
            State::TagName => {
                if is_name_start(self.lexer.cursor().peek()) {
                    self.lexer.cursor().advance_while(is_name_char);
                    self.lexer.add_token(ELEMENT_NAME);
                }
                self.state = State::InTag;
                Ok(())
            }
            State::InTag => self.in_tag(),
            State::AttributeValue(quote) => {
                let cursor = self.lexer.cursor();
                cursor.advance_while(|c| c != quote);
                self.lexer.add_token(ATTRIBUTE_VALUE);
                if self.lexer.cursor().matches(quote) {
                    self.lexer.cursor().advance();
                    self.lexer.add_token(ATTRIBUTE_VALUE_CLOSE);
                    self.state = State::InTag;
                }
                Ok(())
            }
        }
    }

    fn content(&mut self) -> Result<(), TokenizeError> {
        self.lexer.trivia();
        let cursor = self.lexer.cursor();
        if cursor.is_eof() {
            return Ok(());
        }

        if cursor.eat("<!--") {
            self.delimited(COMMENT_OPEN, COMMENT_TEXT, "-->", COMMENT_CLOSE);
        } else if cursor.eat("<![CDATA[") {
            self.delimited(CDATA_OPEN, CDATA_TEXT, "]]>", CDATA_CLOSE);
        } else if cursor.eat("<!") {
            self.doctype();
        } else if cursor.eat("<?") {
            self.delimited(PI_OPEN, PI_TEXT, "?>", PI_CLOSE);
        } else if cursor.eat("</") {
            self.lexer.add_token(END_ELEMENT_OPEN);
            self.state = State::TagName;
        } else if cursor.matches('<') {
            if !is_name_start(cursor.second()) {
                return Err(self.lexer.error("expected a tag name after '<'"));
            }
            cursor.advance();
            self.lexer.add_token(ELEMENT_OPEN);
            self.state = State::TagName;
        } else if cursor.matches('&') && is_entity_start(cursor.second()) {
            cursor.advance();
            cursor.advance_while(|c| c == '#' || is_name_char(c));
            cursor.eat(";");
            self.lexer.add_token(ENTITY);
        } else {
            cursor.advance();
            cursor.advance_while(|c| c != '<' && c != '&' && !c.is_whitespace());
            self.lexer.add_token(TEXT);
        }
        Ok(())
    }

    /// `open` was consumed; the body runs up to `close` or the end of input.
    fn delimited(
        &mut self,
        open: SyntaxKind,
        body: SyntaxKind,
        close: &str,
        close_kind: SyntaxKind,
    ) {
        self.lexer.add_token(open);
        let found = self.lexer.cursor().advance_until(close);
        self.lexer.add_token(body);
        if found {
            self.lexer.cursor().eat(close);
            self.lexer.add_token(close_kind);
        }
    }

    /// `<!` was consumed. Internal subsets in brackets may contain `>`.
    fn doctype(&mut self) {
        let cursor = self.lexer.cursor();
        let mut depth = 0usize;
        while !cursor.is_eof() {
            match cursor.advance() {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                '>' if depth == 0 => break,
                _ => {}
            }
        }
        self.lexer.add_token(DOCTYPE);
    }

    fn in_tag(&mut self) -> Result<(), TokenizeError> {
        self.lexer.trivia();
        let after_equals = self.lexer.last_significant() == Some(EQUAL_SIGN);
        let cursor = self.lexer.cursor();
        if cursor.is_eof() {
            return Ok(());
        }

        let kind = match cursor.peek() {
            '>' => {
                cursor.advance();
                self.state = State::Content;
                ELEMENT_CLOSE
            }
            '/' if cursor.second() == '>' => {
                cursor.eat("/>");
                self.state = State::Content;
                EMPTY_ELEMENT_CLOSING
            }
            '=' => {
                cursor.advance();
                EQUAL_SIGN
            }
            quote @ ('"' | '\'') => {
                cursor.advance();
                self.state = State::AttributeValue(quote);
                ATTRIBUTE_VALUE_OPEN
            }
            '<' => {
                self.state = State::Content;
                return Ok(());
            }
            _ if after_equals => {
                while !cursor.is_eof() {
                    let c = cursor.peek();
                    if c.is_whitespace() || matches!(c, '>' | '<' | '"' | '\'') || cursor.starts_with("/>") {
                        break;
                    }
                    cursor.advance();
                }
                ATTRIBUTE_VALUE
            }
            c if is_name_start(c) => {
                cursor.advance_while(is_name_char);
                ATTRIBUTE_NAME
            }
            c => {
                return Err(self.lexer.error(format!("unexpected character {c:?} in tag")));
            }
        };
        self.lexer.add_token(kind);
        Ok(())
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.')
}

fn is_entity_start(c: char) -> bool {
    c == '#' || is_name_start(c)
}
