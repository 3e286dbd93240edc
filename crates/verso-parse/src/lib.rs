//! Recursive-descent analysers turning a token sequence into a `SyntaxTree`.
//!
//! Analysis never fails: syntax errors are collected and the affected nodes
//! are closed early, marked incomplete.

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

use text_size::TextRange;
use verso_syntax::{NodeKind, SyntaxTree, Token};
use verso_text::LineIndex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    /// Index of the offending token, `None` at end of input.
    pub token: Option<u32>,
    pub range: TextRange,
}

#[derive(Debug)]
pub struct Analysis {
    pub tree: SyntaxTree,
    pub errors: Vec<SyntaxError>,
}

pub trait SyntaxAnalyser: Send + Sync {
    /// Builds the tree for `text`, whose complete token sequence is `tokens`.
    fn analyse(&self, text: &str, tokens: Vec<Token>, line_index: &LineIndex) -> Analysis;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MarkupAnalyser;

impl SyntaxAnalyser for MarkupAnalyser {
    fn analyse(&self, text: &str, tokens: Vec<Token>, line_index: &LineIndex) -> Analysis {
        let mut parser = parser::Parser::new(NodeKind::Document, text, tokens, line_index);
        grammar::markup::document(&mut parser);
        parser.finish()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StylesheetAnalyser;

impl SyntaxAnalyser for StylesheetAnalyser {
    fn analyse(&self, text: &str, tokens: Vec<Token>, line_index: &LineIndex) -> Analysis {
        let mut parser = parser::Parser::new(NodeKind::Stylesheet, text, tokens, line_index);
        grammar::stylesheet::stylesheet(&mut parser);
        parser.finish()
    }
}
