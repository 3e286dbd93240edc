use camino::Utf8Path;
use verso_parse::{MarkupAnalyser, StylesheetAnalyser, SyntaxAnalyser};
use verso_tokenizer::{MarkupTokenizer, StylesheetTokenizer, Tokenize};

/// The dialect a document is tokenized and analysed as.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LanguageKind {
    #[default]
    Markup,
    Stylesheet,
}

const MARKUP_EXTENSIONS: &[&str] = &[
    "xml", "html", "htm", "xhtml", "svg", "xaml", "axaml", "csproj", "vbproj", "fsproj", "props",
    "targets", "xsd", "xsl", "xslt", "resx", "nuspec", "plist", "config", "manifest",
];

impl LanguageKind {
    /// Picks the language from the file extension, ignoring case.
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        let extension = path.extension()?.to_ascii_lowercase();
        if extension == "css" {
            Some(Self::Stylesheet)
        } else if MARKUP_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Markup)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Stylesheet => "stylesheet",
        }
    }

    pub fn tokenizer(self) -> &'static dyn Tokenize {
        match self {
            Self::Markup => &MarkupTokenizer,
            Self::Stylesheet => &StylesheetTokenizer,
        }
    }

    pub fn analyser(self) -> &'static dyn SyntaxAnalyser {
        match self {
            Self::Markup => &MarkupAnalyser,
            Self::Stylesheet => &StylesheetAnalyser,
        }
    }
}

/// Settings a document is created with.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DocumentOptions {
    pub language: LanguageKind,
    /// Maximum number of undo steps kept; `None` keeps everything.
    pub undo_limit: Option<usize>,
}

impl DocumentOptions {
    pub fn new(language: LanguageKind) -> Self {
        Self { language, ..Self::default() }
    }

    #[must_use]
    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.undo_limit = Some(limit);
        self
    }
}
