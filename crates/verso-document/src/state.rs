use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};
use verso_errors::Diagnostic;
use verso_parse::SyntaxError;
use verso_syntax::{NodeId, PatchOutcome, SyntaxTree, Token};
use verso_text::{Encoding, LineIndex, TextBuffer, TextChange, TextRange, TextSize};
use verso_tokenizer::TokenizeError;

use crate::{DocumentError, DocumentOptions, LanguageKind};

/// Everything a document owns. Readers get it through
/// [`SourceDocument::read`](crate::SourceDocument::read); writers mutate it
/// under the document's write lock.
#[derive(Debug)]
pub struct DocumentState {
    pub(crate) path: Option<Utf8PathBuf>,
    pub(crate) language: LanguageKind,
    pub(crate) buffer: TextBuffer,
    pub(crate) tree: SyntaxTree,
    pub(crate) syntax_errors: Vec<SyntaxError>,
    pub(crate) lexical_error: Option<TokenizeError>,
    /// The text `tree` was last analysed from.
    pub(crate) tree_text: String,
}

impl DocumentState {
    pub(crate) fn new(
        text: String,
        encoding: Encoding,
        options: DocumentOptions,
        path: Option<Utf8PathBuf>,
    ) -> Self {
        let language = options.language;
        let buffer = TextBuffer::new(text, encoding, options.undo_limit);
        let text = buffer.text();

        let (analysis, lexical_error) = match language.tokenizer().tokenize(text) {
            Ok(tokens) => (language.analyser().analyse(text, tokens, buffer.line_index()), None),
            Err(error) => {
                warn!(%error, language = language.name(), "document starts without tokens");
                (language.analyser().analyse(text, Vec::new(), buffer.line_index()), Some(error))
            }
        };

        Self {
            path,
            language,
            tree: analysis.tree,
            syntax_errors: analysis.errors,
            lexical_error,
            tree_text: text.to_owned(),
            buffer,
        }
    }

    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    pub fn language(&self) -> LanguageKind {
        self.language
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// The text the tree's spans point into. Differs from [`text`](Self::text)
    /// while the document [is degraded](Self::is_degraded).
    pub fn tree_text(&self) -> &str {
        &self.tree_text
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn line_index(&self) -> &LineIndex {
        self.buffer.line_index()
    }

    pub fn encoding(&self) -> Encoding {
        self.buffer.encoding()
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn tokens(&self) -> &[Token] {
        self.tree.tokens()
    }

    pub fn syntax_errors(&self) -> &[SyntaxError] {
        &self.syntax_errors
    }

    pub fn lexical_error(&self) -> Option<&TokenizeError> {
        self.lexical_error.as_ref()
    }

    /// The last tokenization failed; the tree describes an older text.
    pub fn is_degraded(&self) -> bool {
        self.lexical_error.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    /// Lexical, syntax and line-break problems of the current text.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        if let Some(error) = &self.lexical_error {
            let range = TextRange::empty(error.offset);
            diagnostics.push(Diagnostic::error(error.message.clone(), range).with_label("tokenization stopped here"));
        }
        diagnostics
            .extend(self.syntax_errors.iter().map(|error| Diagnostic::error(error.message.clone(), error.range)));
        if self.line_index().has_mixed_line_breaks() {
            let dominant = self.line_index().line_break_style();
            let odd = self
                .line_index()
                .lines()
                .iter()
                .find(|line| line.line_break.is_some() && line.line_break != dominant)
                .map_or(TextRange::empty(TextSize::new(0)), |line| {
                    TextRange::new(line.start + line.content_len(), line.end())
                });
            diagnostics.push(Diagnostic::warning("mixed line breaks", odd).with_label("differs from the other lines"));
        }
        diagnostics
    }

    /// The node an edit of `change` falls into, located before the text moves.
    fn edited_node(&self, change: &TextChange) -> Option<NodeId> {
        (!self.is_degraded()).then(|| self.tree.find_node_including_span(change.removed_range()))
    }

    pub(crate) fn apply(&mut self, change: TextChange) -> Result<PatchOutcome, DocumentError> {
        change.validate(self.buffer.text())?;
        let edited = self.edited_node(&change);
        let applied = change.clone();
        self.buffer.apply_edit(change)?;
        Ok(self.reanalyse(edited, &applied))
    }

    pub(crate) fn undo(&mut self) -> Result<Option<PatchOutcome>, DocumentError> {
        let Some(change) = self.buffer.peek_undo() else {
            return Ok(None);
        };
        let edited = self.edited_node(change);
        let applied = self.buffer.undo()?;
        Ok(applied.map(|change| self.reanalyse(edited, &change)))
    }

    pub(crate) fn redo(&mut self) -> Result<Option<PatchOutcome>, DocumentError> {
        let Some(change) = self.buffer.peek_redo() else {
            return Ok(None);
        };
        let edited = self.edited_node(change);
        let applied = self.buffer.redo()?;
        Ok(applied.map(|change| self.reanalyse(edited, &change)))
    }

    /// Re-tokenizes and re-parses the whole text, then patches the tree.
    fn reanalyse(&mut self, edited: Option<NodeId>, change: &TextChange) -> PatchOutcome {
        let text = self.buffer.text();
        let tokens = match self.language.tokenizer().tokenize(text) {
            Ok(tokens) => tokens,
            Err(error) => {
                warn!(%error, "tokenization failed, keeping the previous tree");
                self.lexical_error = Some(error);
                return PatchOutcome::Retained;
            }
        };

        let analysis = self.language.analyser().analyse(text, tokens, self.buffer.line_index());
        self.syntax_errors = analysis.errors;
        let outcome = match edited {
            Some(edited) => self.tree.patch(edited, analysis.tree, change),
            None => {
                self.tree.replace(analysis.tree);
                PatchOutcome::Replaced
            }
        };
        self.lexical_error = None;
        self.tree_text.clear();
        self.tree_text.push_str(self.buffer.text());

        debug!(
            start = ?change.start(),
            removed = ?change.removed_len(),
            inserted = change.inserted().len(),
            ?outcome,
            errors = self.syntax_errors.len(),
            "edit applied"
        );
        outcome
    }

    pub(crate) fn write_to(&mut self, path: &Utf8Path) -> Result<(), DocumentError> {
        let bytes = self.buffer.encoding().encode(self.buffer.text());
        std::fs::write(path, bytes)
            .map_err(|source| DocumentError::Io { path: path.to_owned(), source })?;
        self.buffer.mark_saved();
        Ok(())
    }
}
