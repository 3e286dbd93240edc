use verso_syntax::SyntaxKind;

use crate::parser::Parser;

pub(crate) mod markup;
pub(crate) mod stylesheet;

/// Consumes tokens until one of `stop` or the end of input.
pub(crate) fn bump_until(p: &mut Parser<'_>, stop: &[SyntaxKind]) -> bool {
    let mut bumped = false;
    while !p.at_eof() && !stop.contains(&p.peek_kind()) {
        p.advance();
        bumped = true;
    }
    bumped
}
