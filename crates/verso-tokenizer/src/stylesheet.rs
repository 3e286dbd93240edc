use verso_syntax::SyntaxKind::*;
use verso_syntax::{SyntaxKind, Token};

use crate::{Lexer, Tokenize, TokenizeError, is_line_break};

/// Tokenizer for CSS-like stylesheets.
#[derive(Clone, Copy, Debug, Default)]
pub struct StylesheetTokenizer;

impl Tokenize for StylesheetTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        let mut lexer = StylesheetLexer {
            lexer: Lexer::new(text),
            state: State::Selector,
            blocks: Vec::new(),
            nesting_prelude: false,
        };
        while !lexer.lexer.is_eof() {
            lexer.step()?;
        }
        Ok(lexer.lexer.finish())
    }
}

/// Whether the block after `at_keyword` (`@media`, with the `@`) holds rules
/// rather than declarations.
pub fn opens_rule_block(at_keyword: &str) -> bool {
    let name = at_keyword.trim_start_matches('@').to_ascii_lowercase();
    let name = name.strip_prefix("-webkit-").or_else(|| name.strip_prefix("-moz-")).unwrap_or(&name);
    matches!(name, "media" | "supports" | "document" | "layer" | "container" | "keyframes" | "scope")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Selector,
    AtPrelude,
    Property,
    Value,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Block {
    Rules,
    Declarations,
}

struct StylesheetLexer<'a> {
    lexer: Lexer<'a>,
    state: State,
    blocks: Vec<Block>,
    /// The at-rule prelude being lexed opens a block of rules.
    nesting_prelude: bool,
}

impl StylesheetLexer<'_> {
    fn step(&mut self) -> Result<(), TokenizeError> {
        self.trivia();
        if self.lexer.is_eof() {
            return Ok(());
        }

        let kind = match self.state {
            State::Selector => self.selector()?,
            State::AtPrelude => self.at_prelude()?,
            State::Property => self.property(),
            State::Value => self.value()?,
        };
        self.lexer.add_token(kind);
        Ok(())
    }

    /// Whitespace and `/* */` comments.
    fn trivia(&mut self) {
        loop {
            self.lexer.trivia();
            let cursor = self.lexer.cursor();
            if !cursor.eat("/*") {
                return;
            }
            if cursor.advance_until("*/") {
                cursor.eat("*/");
            }
            self.lexer.add_token(STYLE_COMMENT);
        }
    }

    fn state_for_block(&self) -> State {
        match self.blocks.last() {
            Some(Block::Declarations) => State::Property,
            Some(Block::Rules) | None => State::Selector,
        }
    }

    fn open_block(&mut self, block: Block) -> SyntaxKind {
        self.lexer.cursor().advance();
        self.blocks.push(block);
        self.state = self.state_for_block();
        BRACE_OPEN
    }

    fn close_block(&mut self) -> SyntaxKind {
        self.lexer.cursor().advance();
        self.blocks.pop();
        self.state = self.state_for_block();
        BRACE_CLOSE
    }

    fn at_keyword(&mut self) -> SyntaxKind {
        let cursor = self.lexer.cursor();
        cursor.advance();
        cursor.advance_while(is_ident_char);
        self.nesting_prelude = opens_rule_block(self.lexer.current_text());
        self.state = State::AtPrelude;
        AT_KEYWORD
    }

    fn selector(&mut self) -> Result<SyntaxKind, TokenizeError> {
        let cursor = self.lexer.cursor();
        let kind = match cursor.peek() {
            '@' => return Ok(self.at_keyword()),
            '{' => return Ok(self.open_block(Block::Declarations)),
            '}' => return Ok(self.close_block()),
            '.' if is_ident_start(cursor.second()) => {
                cursor.advance();
                cursor.advance_while(is_ident_char);
                CLASS_NAME
            }
            '#' => {
                cursor.advance();
                cursor.advance_while(is_ident_char);
                ID_NAME
            }
            ':' => {
                cursor.advance();
                cursor.eat(":");
                cursor.advance_while(is_ident_char);
                PSEUDO_CLASS
            }
            '[' => {
                cursor.advance();
                cursor.advance_while(|c| c != ']' && !is_line_break(c));
                cursor.eat("]");
                ATTRIBUTE_SELECTOR
            }
            '>' | '+' | '~' => {
                cursor.advance();
                COMBINATOR
            }
            '*' => {
                cursor.advance();
                SELECTOR_NAME
            }
            c if is_ident_start(c) || (c == '-' && is_ident_start(cursor.second())) => {
                cursor.advance();
                cursor.advance_while(is_ident_char);
                SELECTOR_NAME
            }
            _ => return self.common(),
        };
        Ok(kind)
    }

    fn at_prelude(&mut self) -> Result<SyntaxKind, TokenizeError> {
        match self.lexer.cursor().peek() {
            '{' if self.nesting_prelude => Ok(self.open_block(Block::Rules)),
            '{' => Ok(self.open_block(Block::Declarations)),
            ';' => {
                self.lexer.cursor().advance();
                self.state = self.state_for_block();
                Ok(SEMICOLON)
            }
            '}' => Ok(self.close_block()),
            _ => self.common(),
        }
    }

    fn property(&mut self) -> SyntaxKind {
        let cursor = self.lexer.cursor();
        match cursor.peek() {
            '@' => self.at_keyword(),
            '}' => self.close_block(),
            ':' => {
                cursor.advance();
                self.state = State::Value;
                COLON
            }
            ';' => {
                cursor.advance();
                SEMICOLON
            }
            c if is_ident_char(c) => {
                cursor.advance_while(is_ident_char);
                PROPERTY_NAME
            }
            _ => {
                cursor.advance();
                DELIMITER
            }
        }
    }

    fn value(&mut self) -> Result<SyntaxKind, TokenizeError> {
        let cursor = self.lexer.cursor();
        match cursor.peek() {
            ';' => {
                cursor.advance();
                self.state = State::Property;
                Ok(SEMICOLON)
            }
            '}' => Ok(self.close_block()),
            '!' if cursor.rest().get(1..10).is_some_and(|word| word.eq_ignore_ascii_case("important")) => {
                cursor.advance();
                cursor.advance_while(is_ident_char);
                Ok(IMPORTANT)
            }
            _ => self.common(),
        }
    }

    /// Value-like tokens shared by selectors, at-rule preludes and values.
    fn common(&mut self) -> Result<SyntaxKind, TokenizeError> {
        let cursor = self.lexer.cursor();
        let first = cursor.peek();
        let kind = match first {
            quote @ ('"' | '\'') => {
                cursor.advance();
                loop {
                    match cursor.peek() {
                        _ if cursor.is_eof() => return Err(self.lexer.error("unterminated string")),
                        c if is_line_break(c) => return Err(self.lexer.error("unterminated string")),
                        '\\' => {
                            cursor.advance();
                            cursor.advance();
                        }
                        c => {
                            cursor.advance();
                            if c == quote {
                                break;
                            }
                        }
                    }
                }
                STRING
            }
            c if c.is_ascii_digit()
                || (matches!(c, '.' | '+' | '-') && cursor.second().is_ascii_digit()) =>
            {
                cursor.advance();
                cursor.advance_while(|c| c.is_ascii_digit() || c == '.');
                cursor.advance_while(|c| c.is_ascii_alphabetic() || c == '%');
                NUMBER
            }
            '#' => {
                cursor.advance();
                cursor.advance_while(is_ident_char);
                HASH
            }
            c if is_ident_start(c) || (c == '-' && (is_ident_start(cursor.second()) || cursor.second() == '-')) => {
                cursor.advance();
                cursor.advance_while(is_ident_char);
                if cursor.matches('(') { FUNCTION_NAME } else { VALUE }
            }
            '(' => {
                cursor.advance();
                PAREN_OPEN
            }
            ')' => {
                cursor.advance();
                PAREN_CLOSE
            }
            ',' => {
                cursor.advance();
                COMMA
            }
            ':' => {
                cursor.advance();
                COLON
            }
            ';' => {
                cursor.advance();
                SEMICOLON
            }
            _ => {
                cursor.advance();
                DELIMITER
            }
        };
        Ok(kind)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || (!c.is_ascii() && !c.is_whitespace())
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}
