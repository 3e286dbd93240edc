use std::fs;
use std::path::{Path, PathBuf};

use expect_test::expect_file;
use verso_syntax::{NodeKind, SyntaxNode, SyntaxTree};
use verso_text::LineIndex;
use verso_tokenizer::{MarkupTokenizer, StylesheetTokenizer, Tokenize};

use crate::{Analysis, MarkupAnalyser, StylesheetAnalyser, SyntaxAnalyser};

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TestCase {
    input: PathBuf,
    expected: PathBuf,
    text: String,
}

impl TestCase {
    fn list() -> Vec<Self> {
        let test_data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data");

        let mut cases = fs::read_dir(&test_data_dir)
            .unwrap_or_else(|err| panic!("Cannot read directory {}: {err}", test_data_dir.display()))
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                let extension = path.extension()?.to_str()?;
                if matches!(extension, "xml" | "css") {
                    let expected = path.with_extension(format!("{extension}.tree"));
                    let text = fs::read_to_string(&path).ok()?;
                    Some(Self { input: path, expected, text })
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        cases.sort();
        cases
    }
}

fn analyse(tokenizer: &dyn Tokenize, analyser: &dyn SyntaxAnalyser, text: &str) -> Analysis {
    let tokens = tokenizer.tokenize(text).unwrap();
    analyser.analyse(text, tokens, &LineIndex::new(text))
}

fn markup(text: &str) -> Analysis {
    analyse(&MarkupTokenizer, &MarkupAnalyser, text)
}

fn stylesheet(text: &str) -> Analysis {
    analyse(&StylesheetTokenizer, &StylesheetAnalyser, text)
}

#[test]
fn parse() {
    let test_cases = TestCase::list();
    assert!(!test_cases.is_empty());

    for case in test_cases {
        let analysis = match case.input.extension().and_then(|ext| ext.to_str()) {
            Some("css") => stylesheet(&case.text),
            _ => markup(&case.text),
        };
        let errors = analysis
            .errors
            .iter()
            .map(|error| format!("  {:?} {}\n", error.range, error.message))
            .collect::<String>();

        let actual = format!("{}Errors:\n{errors}", analysis.tree.debug_dump(&case.text));
        expect_file![&case.expected].assert_eq(&actual);
    }
}

/// Children are ordered, disjoint and inside their parent.
fn assert_well_formed(tree: &SyntaxTree) {
    fn check(node: SyntaxNode<'_>) {
        let span = node.span();
        let mut previous_end = span.start();
        for child in node.children() {
            assert!(span.contains_range(child.span()), "{child:?} escapes {node:?}");
            assert!(child.span().start() >= previous_end, "{child:?} overlaps its sibling");
            assert_eq!(child.parent(), Some(node));
            previous_end = child.span().end();
            check(child);
        }
    }

    check(tree.root());
}

#[test]
fn attribute_slots() {
    let analysis = markup(r#"<a b="1"/>"#);
    assert!(analysis.errors.is_empty());

    let root = analysis.tree.root();
    let element = root.first_child().unwrap();
    let start_tag = element.first_child().unwrap();
    let attribute = start_tag.first_child().unwrap();

    assert_eq!(start_tag.kind(), NodeKind::StartTag { name: Some(1), close: Some(8), self_closing: true });
    assert_eq!(attribute.kind(), NodeKind::Attribute { equals: Some(1), value_close: Some(4) });
    assert_eq!(attribute.token_base(), 3);
    assert_eq!(attribute.last_token_offset(), Some(4));
    assert!(root.is_complete());
    assert_eq!(root.last_token_offset(), Some(8));
}

#[test]
fn unknown_end_tag_is_attached_as_stray_child() {
    let analysis = markup("<a></b></a>");
    assert_eq!(analysis.errors.len(), 1);
    assert_eq!(analysis.errors[0].message, "unexpected end tag `b`");

    let element = analysis.tree.root().first_child().unwrap();
    let kinds: Vec<_> = element.children().map(|child| (child.kind().name(), child.is_complete())).collect();
    assert_eq!(kinds, [("StartTag", true), ("EndTag", false), ("EndTag", true)]);
    assert!(!analysis.tree.root().is_complete());
}

#[test]
fn line_bookkeeping() {
    let analysis = markup("<a>\r\n  <b/>\n</a>\n");
    let element = analysis.tree.root().first_child().unwrap();
    let inner = element.children().nth(1).unwrap();

    assert_eq!((element.start_line(), element.line_count()), (0, 2));
    assert_eq!((inner.start_line(), inner.line_count()), (1, 0));
    assert_eq!(analysis.tree.root().line_count(), 3);
}

#[test]
fn multi_line_nodes() {
    let analysis = stylesheet("a {\n  color:\n    red;\n}");
    let rule = analysis.tree.root().first_child().unwrap();
    let block = rule.children().nth(1).unwrap();
    let declaration = block.first_child().unwrap();

    assert!(rule.is_complete());
    assert_eq!(declaration.kind(), NodeKind::Declaration { colon: Some(1), value: Some(4), semicolon: Some(5) });
    assert_eq!((declaration.start_line(), declaration.end_line()), (1, 2));
    assert_eq!(rule.end_line(), 3);
}

#[test]
fn at_rules() {
    let analysis = stylesheet("@import 'a.css';\n@font-face { font-family: x }\n@media screen { a { top: 0 } }");
    assert!(analysis.errors.is_empty(), "{:?}", analysis.errors);

    let blocks: Vec<_> = analysis
        .tree
        .root()
        .children()
        .map(|rule| rule.children().map(|child| child.kind().name()).collect::<Vec<_>>())
        .collect();
    assert_eq!(blocks, [vec![], vec!["DeclarationBlock"], vec!["RuleBlock"]]);
    assert!(analysis.tree.root().is_complete());
}

#[test]
fn rule_without_block_is_incomplete() {
    let analysis = stylesheet("a b");
    assert_eq!(analysis.errors[0].message, "expected `{`");
    let rule = analysis.tree.root().first_child().unwrap();
    assert_eq!(rule.last_token_offset(), None);
    assert!(!rule.is_complete());
}

#[test]
fn recovery_always_terminates() {
    let markup_inputs =
        ["", "   ", "</>", "<a", "<a b", "<a b=", "<a b='", "<a></b>", "</a></b>", "<a><b><c></a>", "x &y; z", "<a =1>"];
    for text in markup_inputs {
        let analysis = markup(text);
        assert_well_formed(&analysis.tree);
        assert_eq!(analysis.tree.root().span().len(), text.len().try_into().unwrap());
    }

    let stylesheet_inputs = ["", ";;", "}", "{", "a {", "a { b", "a { b: ", "@media {", "@x", "a { ; }", "{}{}"];
    for text in stylesheet_inputs {
        let analysis = stylesheet(text);
        assert_well_formed(&analysis.tree);
    }
}
