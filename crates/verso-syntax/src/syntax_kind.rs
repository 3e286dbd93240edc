use crate::TokenSet;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SyntaxKind {
    WHITESPACE,
    TABULATION,
    LINE_BREAK,
    STYLE_COMMENT,

    ELEMENT_OPEN,
    END_ELEMENT_OPEN,
    ELEMENT_NAME,
    ATTRIBUTE_NAME,
    EQUAL_SIGN,
    ATTRIBUTE_VALUE_OPEN,
    ATTRIBUTE_VALUE,
    ATTRIBUTE_VALUE_CLOSE,
    ELEMENT_CLOSE,
    EMPTY_ELEMENT_CLOSING,
    TEXT,
    ENTITY,
    COMMENT_OPEN,
    COMMENT_TEXT,
    COMMENT_CLOSE,
    CDATA_OPEN,
    CDATA_TEXT,
    CDATA_CLOSE,
    PI_OPEN,
    PI_TEXT,
    PI_CLOSE,
    DOCTYPE,

    SELECTOR_NAME,
    CLASS_NAME,
    ID_NAME,
    PSEUDO_CLASS,
    ATTRIBUTE_SELECTOR,
    COMBINATOR,
    AT_KEYWORD,
    PROPERTY_NAME,
    VALUE,
    FUNCTION_NAME,
    NUMBER,
    HASH,
    STRING,
    IMPORTANT,
    COLON,
    SEMICOLON,
    COMMA,
    BRACE_OPEN,
    BRACE_CLOSE,
    PAREN_OPEN,
    PAREN_CLOSE,
    DELIMITER,

    EOF,
}

impl SyntaxKind {
    pub const TRIVIA: TokenSet =
        TokenSet::new([Self::WHITESPACE, Self::TABULATION, Self::LINE_BREAK, Self::STYLE_COMMENT]);

    pub const fn is_trivia(self) -> bool {
        Self::TRIVIA.contains(self)
    }
}
