//! A source document: text buffer, tokenizer, analyser and the patched syntax
//! tree, kept consistent behind one reader/writer lock.
//!
//! Writers (`apply`, `undo`, `redo`, fold flags, saving) take the write lock
//! and run every nested step on the already borrowed state. Readers use
//! recursive read locks, so a caller holding [`SourceDocument::read`] may
//! still call the other query methods.

mod language;
mod state;

use camino::{Utf8Path, Utf8PathBuf};
pub use language::{DocumentOptions, LanguageKind};
use parking_lot::{RwLock, RwLockReadGuard};
pub use state::DocumentState;
use tracing::info;
pub use verso_errors::{Diagnostic, Renderer, Severity};
pub use verso_parse::SyntaxError;
pub use verso_syntax::{NodeId, NodeKind, PatchOutcome, SyntaxKind, SyntaxNode, SyntaxTree, Token};
pub use verso_text::{
    ClientId, Encoding, EncodingError, LineIndex, Location, Receiver, TextChange, TextError, TextRange, TextSize,
};
pub use verso_tokenizer::TokenizeError;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to access `{path}`")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode `{path}`")]
    Encoding {
        path: Utf8PathBuf,
        #[source]
        source: EncodingError,
    },
    #[error(transparent)]
    Text(#[from] TextError),
    #[error("no language is associated with `{path}`")]
    UnknownLanguage { path: Utf8PathBuf },
    #[error("the document has no path to save to")]
    NoPath,
}

#[derive(Debug)]
pub struct SourceDocument {
    state: RwLock<DocumentState>,
}

impl SourceDocument {
    pub fn new(text: impl Into<String>, options: DocumentOptions) -> Self {
        Self::from_state(DocumentState::new(text.into(), Encoding::Utf8, options, None))
    }

    fn from_state(state: DocumentState) -> Self {
        Self { state: RwLock::new(state) }
    }

    /// Reads and decodes `path`, picking the language from its extension.
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let language = LanguageKind::from_path(path)
            .ok_or_else(|| DocumentError::UnknownLanguage { path: path.to_owned() })?;
        Self::load_with(path, DocumentOptions::new(language))
    }

    pub fn load_with(path: impl AsRef<Utf8Path>, options: DocumentOptions) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).map_err(|source| DocumentError::Io { path: path.to_owned(), source })?;
        let (text, encoding) = Encoding::decode(&bytes)
            .map_err(|source| DocumentError::Encoding { path: path.to_owned(), source })?;

        let state = DocumentState::new(text, encoding, options, Some(path.to_owned()));
        info!(
            %path,
            language = options.language.name(),
            ?encoding,
            bytes = bytes.len(),
            nodes = state.tree().node_count(),
            "document loaded"
        );
        Ok(Self::from_state(state))
    }

    /// Writes the text back to the path it was loaded from or last saved as,
    /// in its original encoding.
    pub fn save(&self) -> Result<(), DocumentError> {
        let mut state = self.state.write();
        let path = state.path.clone().ok_or(DocumentError::NoPath)?;
        state.write_to(&path)?;
        info!(%path, "document saved");
        Ok(())
    }

    pub fn save_as(&self, path: impl AsRef<Utf8Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let mut state = self.state.write();
        state.write_to(path)?;
        state.path = Some(path.to_owned());
        info!(%path, "document saved");
        Ok(())
    }

    /// A read guard over the whole state. Other query methods may be called
    /// while it is held.
    pub fn read(&self) -> RwLockReadGuard<'_, DocumentState> {
        self.state.read_recursive()
    }

    pub fn apply(&self, change: TextChange) -> Result<PatchOutcome, DocumentError> {
        self.state.write().apply(change)
    }

    /// Reverts the latest edit; `None` when there is nothing to undo.
    pub fn undo(&self) -> Result<Option<PatchOutcome>, DocumentError> {
        self.state.write().undo()
    }

    pub fn redo(&self) -> Result<Option<PatchOutcome>, DocumentError> {
        self.state.write().redo()
    }

    pub fn text(&self) -> String {
        self.read().text().to_owned()
    }

    pub fn path(&self) -> Option<Utf8PathBuf> {
        self.read().path().map(Utf8Path::to_path_buf)
    }

    pub fn language(&self) -> LanguageKind {
        self.read().language()
    }

    pub fn is_dirty(&self) -> bool {
        self.read().is_dirty()
    }

    pub fn is_degraded(&self) -> bool {
        self.read().is_degraded()
    }

    pub fn lexical_error(&self) -> Option<TokenizeError> {
        self.read().lexical_error().cloned()
    }

    pub fn syntax_errors(&self) -> Vec<SyntaxError> {
        self.read().syntax_errors().to_vec()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.read().diagnostics()
    }

    pub fn root(&self) -> NodeId {
        self.read().tree().root_id()
    }

    /// The token covering `offset`; the end of the text maps to the last token.
    pub fn find_token_including_position(&self, offset: TextSize) -> Option<Token> {
        let state = self.read();
        let index = state.tree().find_token_including_position(offset)?;
        state.tokens().get(index).copied()
    }

    pub fn find_node_including_position(&self, offset: TextSize, outermost: bool) -> NodeId {
        self.read().tree().find_node_including_position(offset, outermost)
    }

    pub fn find_node_including_span(&self, range: TextRange) -> NodeId {
        self.read().tree().find_node_including_span(range)
    }

    /// Span of a live node.
    pub fn node_span(&self, id: NodeId) -> Option<TextRange> {
        self.read().tree().node(id).map(|node| node.span())
    }

    pub fn location(&self, offset: TextSize) -> Option<Location> {
        self.read().line_index().location(offset)
    }

    pub fn absolute_position(&self, location: Location) -> Option<TextSize> {
        self.read().line_index().offset(location)
    }

    /// Returns `false` when `id` no longer names a node.
    pub fn set_folded(&self, id: NodeId, folded: bool) -> bool {
        self.state.write().tree.set_folded(id, folded)
    }

    pub fn set_expanded(&self, id: NodeId, expanded: bool) -> bool {
        self.state.write().tree.set_expanded(id, expanded)
    }

    pub fn register_client(&self) -> ClientId {
        self.state.write().buffer.register_client()
    }

    pub fn unregister_client(&self, id: ClientId) -> bool {
        self.state.write().buffer.unregister_client(id)
    }

    /// Changes applied since `id` last asked; `None` when there are none or the
    /// client is unknown.
    pub fn try_get_state(&self, id: ClientId) -> Option<Vec<TextChange>> {
        self.read().buffer().try_get_state(id)
    }

    pub fn client_receiver(&self, id: ClientId) -> Option<Receiver<TextChange>> {
        self.read().buffer().client_receiver(id)
    }
}
