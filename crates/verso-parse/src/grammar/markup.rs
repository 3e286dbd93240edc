use verso_syntax::NodeKind;
use verso_syntax::SyntaxKind::{self, *};

use crate::parser::Parser;

pub(crate) fn document(p: &mut Parser<'_>) {
    let mut open = Vec::new();
    while !p.at_eof() {
        if p.at(END_ELEMENT_OPEN) {
            let name = p.nth_text(1).filter(|_| p.nth_kind(1) == ELEMENT_NAME);
            p.error(format!("unexpected end tag `{}`", name.unwrap_or_default()));
            end_tag(p, true);
        } else {
            content(p, &mut open);
        }
    }
}

fn content<'a>(p: &mut Parser<'a>, open: &mut Vec<&'a str>) {
    match p.peek_kind() {
        ELEMENT_OPEN => element(p, open),
        TEXT | ENTITY => {
            let m = p.start();
            while p.eat(TEXT) || p.eat(ENTITY) {}
            m.complete(p, NodeKind::Text);
        }
        COMMENT_OPEN => {
            delimited(p, COMMENT_TEXT, COMMENT_CLOSE, "unterminated comment", |close| NodeKind::Comment { close })
        }
        CDATA_OPEN => {
            delimited(p, CDATA_TEXT, CDATA_CLOSE, "unterminated CDATA section", |close| NodeKind::CData { close })
        }
        PI_OPEN => delimited(p, PI_TEXT, PI_CLOSE, "unterminated processing instruction", |close| {
            NodeKind::ProcessingInstruction { close }
        }),
        DOCTYPE => {
            let m = p.start();
            p.advance();
            m.complete(p, NodeKind::DocType);
        }
        _ => p.error_and_bump("expected markup content"),
    }
}

fn delimited(
    p: &mut Parser<'_>,
    body: SyntaxKind,
    close: SyntaxKind,
    unterminated: &str,
    kind: impl Fn(Option<u32>) -> NodeKind,
) {
    let m = p.start();
    p.advance();
    p.eat(body);
    if p.eat(close) {
        let slot = m.slot(p);
        m.complete(p, kind(slot));
    } else {
        p.error(unterminated);
        m.force_close(p, kind(None));
    }
}

/// Parses an element and its content. An end tag naming an enclosing element
/// closes this one early and is left for the ancestor to match.
fn element<'a>(p: &mut Parser<'a>, open: &mut Vec<&'a str>) {
    let m = p.start();
    let (name, self_closing) = start_tag(p);
    if self_closing {
        m.complete(p, NodeKind::Element);
        return;
    }

    let name = name.unwrap_or_default();
    open.push(name);
    loop {
        if p.at_eof() {
            p.error(format!("missing end tag for `{name}`"));
            open.pop();
            m.force_close(p, NodeKind::Element);
            return;
        }

        if !p.at(END_ELEMENT_OPEN) {
            content(p, open);
            continue;
        }

        let end_name = match p.nth_kind(1) {
            ELEMENT_NAME => p.nth_text(1),
            _ => None,
        };
        match end_name {
            Some(end_name) if end_name != name => {
                if open.contains(&end_name) {
                    p.error(format!("missing end tag for `{name}`"));
                    open.pop();
                    m.force_close(p, NodeKind::Element);
                    return;
                }
                p.error(format!("unexpected end tag `{end_name}`"));
                end_tag(p, true);
            }
            _ => {
                end_tag(p, false);
                open.pop();
                m.complete(p, NodeKind::Element);
                return;
            }
        }
    }
}

/// Returns the element name and whether the tag was `/>`-closed.
fn start_tag<'a>(p: &mut Parser<'a>) -> (Option<&'a str>, bool) {
    let m = p.start();
    p.advance();

    let mut name = None;
    let mut name_slot = None;
    if p.at(ELEMENT_NAME) {
        name = p.nth_text(0);
        p.advance();
        name_slot = m.slot(p);
    } else {
        p.error("expected element name");
    }

    loop {
        match p.peek_kind() {
            ATTRIBUTE_NAME => attribute(p),
            ELEMENT_CLOSE | EMPTY_ELEMENT_CLOSING => {
                let self_closing = p.at(EMPTY_ELEMENT_CLOSING);
                p.advance();
                let close = m.slot(p);
                m.complete(p, NodeKind::StartTag { name: name_slot, close, self_closing });
                return (name, self_closing);
            }
            EQUAL_SIGN | ATTRIBUTE_VALUE_OPEN | ATTRIBUTE_VALUE | ATTRIBUTE_VALUE_CLOSE => {
                p.error_and_bump("expected attribute name")
            }
            _ => {
                p.error("expected `>`");
                m.force_close(p, NodeKind::StartTag { name: name_slot, close: None, self_closing: false });
                return (name, false);
            }
        }
    }
}

fn attribute(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();

    if !p.eat(EQUAL_SIGN) {
        m.complete(p, NodeKind::Attribute { equals: None, value_close: None });
        return;
    }
    let equals = m.slot(p);

    match p.peek_kind() {
        ATTRIBUTE_VALUE_OPEN => {
            p.advance();
            p.eat(ATTRIBUTE_VALUE);
            if p.eat(ATTRIBUTE_VALUE_CLOSE) {
                let value_close = m.slot(p);
                m.complete(p, NodeKind::Attribute { equals, value_close });
            } else {
                p.error("unterminated attribute value");
                m.force_close(p, NodeKind::Attribute { equals, value_close: None });
            }
        }
        ATTRIBUTE_VALUE => {
            p.advance();
            let value_close = m.slot(p);
            m.complete(p, NodeKind::Attribute { equals, value_close });
        }
        _ => {
            p.error("expected attribute value");
            m.force_close(p, NodeKind::Attribute { equals, value_close: None });
        }
    }
}

/// `stray` end tags match no open element and are kept as incomplete nodes.
fn end_tag(p: &mut Parser<'_>, stray: bool) {
    let m = p.start();
    p.advance();

    let name = if p.eat(ELEMENT_NAME) {
        m.slot(p)
    } else {
        p.error("expected element name");
        None
    };

    while p.at(ATTRIBUTE_NAME) || p.at(EQUAL_SIGN) || p.at(ATTRIBUTE_VALUE) {
        p.error_and_bump("unexpected content in end tag");
    }

    if p.eat(ELEMENT_CLOSE) {
        let close = m.slot(p);
        let kind = NodeKind::EndTag { name, close };
        if stray { m.force_close(p, kind) } else { m.complete(p, kind) }
    } else {
        p.error("expected `>`");
        m.force_close(p, NodeKind::EndTag { name, close: None });
    }
}
