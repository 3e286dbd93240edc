use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn level(self) -> Level {
        match self {
            Self::Error => Level::Error,
            Self::Warning => Level::Warning,
        }
    }
}

/// A message attached to a byte range of a document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
    range: TextRange,
    label: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self { severity: Severity::Error, message: message.into(), range, label: None }
    }

    pub fn warning(message: impl Into<String>, range: TextRange) -> Self {
        Self { severity: Severity::Warning, message: message.into(), range, label: None }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Renders the diagnostic against `text`, the snapshot its range refers to.
    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let level = self.severity.level();
        let label = self.label.as_deref().unwrap_or("here");
        let message = level.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(level.span(self.clamped_range(text)).label(label))
                .fold(true),
        );
        renderer.render(message)
    }

    /// The range as a `usize` span that stays inside `text`, even when the
    /// text was edited after the diagnostic was produced.
    fn clamped_range(&self, text: &str) -> std::ops::Range<usize> {
        let end = usize::from(self.range.end()).min(text.len());
        let start = usize::from(self.range.start()).min(end);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use text_size::TextSize;

    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::new(start), TextSize::new(end))
    }

    #[test]
    fn plain_rendering_mentions_origin_and_message() {
        let text = "<a>\n  <b>\n</a>\n";
        let diagnostic = Diagnostic::error("missing end tag for `b`", range(6, 9));
        let rendered = diagnostic.render(&Renderer::plain(), "page.xml", text).to_string();

        assert!(rendered.starts_with("error: missing end tag for `b`"), "{rendered}");
        assert!(rendered.contains("page.xml:2:"), "{rendered}");
        assert!(rendered.contains("here"), "{rendered}");
    }

    #[test]
    fn labels_and_severity() {
        let diagnostic = Diagnostic::warning("mixed line breaks", range(0, 1)).with_label("first break");
        assert_eq!(diagnostic.severity(), Severity::Warning);

        let rendered = diagnostic.render(&Renderer::plain(), "a.css", "a\r\nb\n").to_string();
        assert!(rendered.starts_with("warning: mixed line breaks"), "{rendered}");
        assert!(rendered.contains("first break"), "{rendered}");
    }

    #[test]
    fn stale_ranges_are_clamped() {
        let diagnostic = Diagnostic::error("expected `}`", range(40, 44));
        assert_eq!(diagnostic.clamped_range("a {"), 3..3);
        assert_eq!(diagnostic.range(), range(40, 44));
    }
}
