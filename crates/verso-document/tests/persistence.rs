use camino::{Utf8Path, Utf8PathBuf};
use verso_document::{
    DocumentError, DocumentOptions, Encoding, LanguageKind, SourceDocument, TextChange, TextSize,
};

fn temp_path(dir: &tempfile::TempDir, name: &str) -> Utf8PathBuf {
    Utf8Path::from_path(dir.path()).unwrap().join(name)
}

#[test]
fn round_trip_keeps_the_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let cases = [
        ("plain.xml", Encoding::Utf8),
        ("bom.xml", Encoding::Utf8Bom),
        ("little.xml", Encoding::Utf16Le),
        ("big.xml", Encoding::Utf16Be),
    ];

    for (name, encoding) in cases {
        let path = temp_path(&dir, name);
        std::fs::write(&path, encoding.encode("<a>é</a>")).unwrap();

        let document = SourceDocument::load(&path).unwrap();
        assert_eq!(document.text(), "<a>é</a>", "{name}");
        assert_eq!(document.read().encoding(), encoding);
        assert_eq!(document.language(), LanguageKind::Markup);
        assert!(document.read().tree().root().is_complete());

        document.apply(TextChange::insert(TextSize::new(5), "!")).unwrap();
        assert!(document.is_dirty());
        document.save().unwrap();
        assert!(!document.is_dirty());

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes, encoding.encode("<a>é!</a>"), "{name}");
        assert_eq!(Encoding::decode(&bytes).unwrap(), ("<a>é!</a>".to_owned(), encoding));
    }
}

#[test]
fn language_follows_the_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "site.css");
    std::fs::write(&path, "a { color: red; }").unwrap();

    let document = SourceDocument::load(&path).unwrap();
    assert_eq!(document.language(), LanguageKind::Stylesheet);
    assert_eq!(document.path().as_deref(), Some(path.as_path()));
    assert!(document.syntax_errors().is_empty());

    let unknown = temp_path(&dir, "notes.txt");
    std::fs::write(&unknown, "<a/>").unwrap();
    assert!(matches!(SourceDocument::load(&unknown), Err(DocumentError::UnknownLanguage { .. })));

    let forced = SourceDocument::load_with(&unknown, DocumentOptions::new(LanguageKind::Markup)).unwrap();
    assert_eq!(forced.read().tree().root().first_child().unwrap().kind().name(), "Element");
}

#[test]
fn save_as_moves_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let document = SourceDocument::new("<a/>", DocumentOptions::default());
    assert!(matches!(document.save(), Err(DocumentError::NoPath)));

    let path = temp_path(&dir, "new.xml");
    document.save_as(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "<a/>");
    assert_eq!(document.path(), Some(path.clone()));

    document.apply(TextChange::insert(TextSize::new(2), " b")).unwrap();
    document.save().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "<a b/>");
}

#[test]
fn load_errors_name_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = temp_path(&dir, "missing.xml");
    let error = SourceDocument::load(&missing).unwrap_err();
    assert!(matches!(error, DocumentError::Io { .. }));
    assert_eq!(error.to_string(), format!("failed to access `{missing}`"));

    let broken = temp_path(&dir, "broken.xml");
    std::fs::write(&broken, [b'<', b'a', 0xFF, b'>']).unwrap();
    let error = SourceDocument::load(&broken).unwrap_err();
    assert!(matches!(error, DocumentError::Encoding { .. }));
}
