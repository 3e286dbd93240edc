use verso_syntax::NodeKind;
use verso_syntax::SyntaxKind::*;
use verso_tokenizer::opens_rule_block;

use super::bump_until;
use crate::parser::Parser;

pub(crate) fn stylesheet(p: &mut Parser<'_>) {
    while !p.at_eof() {
        if p.at(BRACE_CLOSE) {
            p.error_and_bump("unexpected `}`");
        } else {
            rule_item(p);
        }
    }
}

fn rule_item(p: &mut Parser<'_>) {
    match p.peek_kind() {
        AT_KEYWORD => at_rule(p),
        SEMICOLON => p.error_and_bump("expected a rule, found `;`"),
        _ => rule(p),
    }
}

fn rule(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(BRACE_OPEN) {
        p.error("expected selector");
    } else {
        selector(p);
    }

    if p.at(BRACE_OPEN) {
        declaration_block(p);
        m.complete(p, NodeKind::Rule);
    } else {
        p.error("expected `{`");
        m.force_close(p, NodeKind::Rule);
    }
}

fn selector(p: &mut Parser<'_>) {
    let m = p.start();
    bump_until(p, &[BRACE_OPEN, BRACE_CLOSE, SEMICOLON, AT_KEYWORD]);
    m.complete(p, NodeKind::Selector);
}

/// Returns whether the closing brace was found.
fn declaration_block(p: &mut Parser<'_>) -> bool {
    let m = p.start();
    p.advance();

    loop {
        match p.peek_kind() {
            BRACE_CLOSE => {
                p.advance();
                let close = m.slot(p);
                m.complete(p, NodeKind::DeclarationBlock { close });
                return true;
            }
            EOF => {
                p.error("expected `}`");
                m.force_close(p, NodeKind::DeclarationBlock { close: None });
                return false;
            }
            SEMICOLON => p.advance(),
            PROPERTY_NAME => declaration(p),
            AT_KEYWORD => at_rule(p),
            _ => p.error_and_bump("expected property name"),
        }
    }
}

fn declaration(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();

    if !p.eat(COLON) {
        p.error("expected `:`");
        m.force_close(p, NodeKind::Declaration { colon: None, value: None, semicolon: None });
        return;
    }
    let colon = m.slot(p);

    let value = match p.peek_kind() {
        SEMICOLON | BRACE_CLOSE | EOF => None,
        _ => {
            p.advance();
            let value = m.slot(p);
            bump_until(p, &[SEMICOLON, BRACE_CLOSE]);
            value
        }
    };
    let semicolon = if p.eat(SEMICOLON) { m.slot(p) } else { None };

    let kind = NodeKind::Declaration { colon, value, semicolon };
    if value.is_some() {
        m.complete(p, kind);
    } else {
        p.error("expected value");
        m.force_close(p, kind);
    }
}

fn at_rule(p: &mut Parser<'_>) {
    let m = p.start();
    let nested = p.nth_text(0).is_some_and(opens_rule_block);
    p.advance();
    bump_until(p, &[SEMICOLON, BRACE_OPEN, BRACE_CLOSE]);

    let closed = match p.peek_kind() {
        SEMICOLON => {
            p.advance();
            true
        }
        BRACE_OPEN if nested => rules_block(p),
        BRACE_OPEN => declaration_block(p),
        _ => {
            p.error("expected `;` or `{`");
            false
        }
    };

    if closed {
        let terminator = m.slot(p);
        m.complete(p, NodeKind::AtRule { terminator });
    } else {
        m.force_close(p, NodeKind::AtRule { terminator: None });
    }
}

fn rules_block(p: &mut Parser<'_>) -> bool {
    let m = p.start();
    p.advance();

    loop {
        match p.peek_kind() {
            BRACE_CLOSE => {
                p.advance();
                let close = m.slot(p);
                m.complete(p, NodeKind::RuleBlock { close });
                return true;
            }
            EOF => {
                p.error("expected `}`");
                m.force_close(p, NodeKind::RuleBlock { close: None });
                return false;
            }
            _ => rule_item(p),
        }
    }
}
