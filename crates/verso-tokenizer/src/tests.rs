use expect_test::{Expect, expect};

use crate::SyntaxKind::*;
use crate::{MarkupTokenizer, StylesheetTokenizer, Token, Tokenize, opens_rule_block};

fn assert_gapless(text: &str, tokens: &[Token]) {
    let mut offset = 0.into();
    for token in tokens {
        assert_eq!(token.start, offset, "gap before {token:?} in {text:?}");
        assert!(token.len > 0.into(), "empty token {token:?} in {text:?}");
        offset = token.end();
    }
    assert_eq!(u32::from(offset) as usize, text.len(), "tokens do not cover {text:?}");
}

fn check(tokenizer: &dyn Tokenize, text: &str, expect: Expect) {
    let tokens = tokenizer.tokenize(text).unwrap();
    assert_gapless(text, &tokens);

    let actual: String =
        tokens.iter().map(|token| format!("{:?} {:?}\n", token.kind, token.text(text))).collect();
    expect.assert_eq(&actual);
}

#[test]
fn empty_element_with_attribute() {
    let text = r#"<a b="1"/>"#;
    let kinds: Vec<_> = MarkupTokenizer.tokenize(text).unwrap().iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        [
            ELEMENT_OPEN,
            ELEMENT_NAME,
            WHITESPACE,
            ATTRIBUTE_NAME,
            EQUAL_SIGN,
            ATTRIBUTE_VALUE_OPEN,
            ATTRIBUTE_VALUE,
            ATTRIBUTE_VALUE_CLOSE,
            EMPTY_ELEMENT_CLOSING,
        ]
    );
}

#[test]
fn markup_document() {
    check(
        &MarkupTokenizer,
        "<?xml version=\"1.0\"?>\r\n<!DOCTYPE r [<!ENTITY e \"x\">]>\n<r>\n\t<!-- a b -->x &amp; y<![CDATA[<z>]]></r>",
        expect![[r#"
            PI_OPEN "<?"
            PI_TEXT "xml version=\"1.0\""
            PI_CLOSE "?>"
            LINE_BREAK "\r\n"
            DOCTYPE "<!DOCTYPE r [<!ENTITY e \"x\">]>"
            LINE_BREAK "\n"
            ELEMENT_OPEN "<"
            ELEMENT_NAME "r"
            ELEMENT_CLOSE ">"
            LINE_BREAK "\n"
            TABULATION "\t"
            COMMENT_OPEN "<!--"
            COMMENT_TEXT " a b "
            COMMENT_CLOSE "-->"
            TEXT "x"
            WHITESPACE " "
            ENTITY "&amp;"
            WHITESPACE " "
            TEXT "y"
            CDATA_OPEN "<![CDATA["
            CDATA_TEXT "<z>"
            CDATA_CLOSE "]]>"
            END_ELEMENT_OPEN "</"
            ELEMENT_NAME "r"
            ELEMENT_CLOSE ">"
        "#]],
    );
}

#[test]
fn attribute_values_keep_their_whitespace() {
    check(
        &MarkupTokenizer,
        "<a x='1\n 2' y=z>",
        expect![[r#"
            ELEMENT_OPEN "<"
            ELEMENT_NAME "a"
            WHITESPACE " "
            ATTRIBUTE_NAME "x"
            EQUAL_SIGN "="
            ATTRIBUTE_VALUE_OPEN "'"
            ATTRIBUTE_VALUE "1\n 2"
            ATTRIBUTE_VALUE_CLOSE "'"
            WHITESPACE " "
            ATTRIBUTE_NAME "y"
            EQUAL_SIGN "="
            ATTRIBUTE_VALUE "z"
            ELEMENT_CLOSE ">"
        "#]],
    );
}

#[test]
fn unfinished_markup_still_covers_the_text() {
    for text in ["<a", "<a b=\"1", "<!-- open", "</", "<a\n<b>", "<![CDATA[x", "<?pi"] {
        let tokens = MarkupTokenizer.tokenize(text).unwrap();
        assert_gapless(text, &tokens);
    }
}

#[test]
fn markup_lexical_errors() {
    let error = MarkupTokenizer.tokenize("<a>1 < 2</a>").unwrap_err();
    assert_eq!(error.offset, 5.into());

    let error = MarkupTokenizer.tokenize("<a !>").unwrap_err();
    assert_eq!(error.offset, 3.into());
    assert_eq!(error.to_string(), "unexpected character '!' in tag at offset 3");
}

#[test]
fn stylesheet_rules() {
    check(
        &StylesheetTokenizer,
        "a.b > #c:hover, [x] { color: #fff !important; margin: -1.5em auto }",
        expect![[r##"
            SELECTOR_NAME "a"
            CLASS_NAME ".b"
            WHITESPACE " "
            COMBINATOR ">"
            WHITESPACE " "
            ID_NAME "#c"
            PSEUDO_CLASS ":hover"
            COMMA ","
            WHITESPACE " "
            ATTRIBUTE_SELECTOR "[x]"
            WHITESPACE " "
            BRACE_OPEN "{"
            WHITESPACE " "
            PROPERTY_NAME "color"
            COLON ":"
            WHITESPACE " "
            HASH "#fff"
            WHITESPACE " "
            IMPORTANT "!important"
            SEMICOLON ";"
            WHITESPACE " "
            PROPERTY_NAME "margin"
            COLON ":"
            WHITESPACE " "
            NUMBER "-1.5em"
            WHITESPACE " "
            VALUE "auto"
            WHITESPACE " "
            BRACE_CLOSE "}"
        "##]],
    );
}

#[test]
fn stylesheet_at_rules() {
    check(
        &StylesheetTokenizer,
        "@import url(\"a.css\");\n@media (min-width: 10px) {\n  p { /* c */ top: 0 }\n}",
        expect![[r#"
            AT_KEYWORD "@import"
            WHITESPACE " "
            FUNCTION_NAME "url"
            PAREN_OPEN "("
            STRING "\"a.css\""
            PAREN_CLOSE ")"
            SEMICOLON ";"
            LINE_BREAK "\n"
            AT_KEYWORD "@media"
            WHITESPACE " "
            PAREN_OPEN "("
            VALUE "min-width"
            COLON ":"
            WHITESPACE " "
            NUMBER "10px"
            PAREN_CLOSE ")"
            WHITESPACE " "
            BRACE_OPEN "{"
            LINE_BREAK "\n"
            WHITESPACE "  "
            SELECTOR_NAME "p"
            WHITESPACE " "
            BRACE_OPEN "{"
            WHITESPACE " "
            STYLE_COMMENT "/* c */"
            WHITESPACE " "
            PROPERTY_NAME "top"
            COLON ":"
            WHITESPACE " "
            NUMBER "0"
            WHITESPACE " "
            BRACE_CLOSE "}"
            LINE_BREAK "\n"
            BRACE_CLOSE "}"
        "#]],
    );
}

#[test]
fn unterminated_string() {
    let error = StylesheetTokenizer.tokenize("a { content: \"x\n }").unwrap_err();
    assert_eq!(error.message, "unterminated string");
    assert_eq!(error.offset, 15.into());

    assert!(StylesheetTokenizer.tokenize("a { content: 'x").is_err());
}

#[test]
fn nesting_at_rules() {
    assert!(opens_rule_block("@media"));
    assert!(opens_rule_block("@-webkit-keyframes"));
    assert!(opens_rule_block("@SUPPORTS"));
    assert!(!opens_rule_block("@font-face"));
    assert!(!opens_rule_block("@page"));
}
