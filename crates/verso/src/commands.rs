use anyhow::Context;
use camino::Utf8Path;
use verso_document::{PatchOutcome, Renderer, Severity, SourceDocument, TextChange, TextRange, TextSize};

/// Prints the document's diagnostics and returns how many are errors.
pub(crate) fn check(document: &SourceDocument, path: &Utf8Path) -> usize {
    let state = document.read();
    let renderer = Renderer::styled();
    let diagnostics = state.diagnostics();

    for diagnostic in &diagnostics {
        eprintln!("{}", diagnostic.render(&renderer, path.as_str(), state.text()));
    }
    diagnostics.iter().filter(|diagnostic| diagnostic.severity() == Severity::Error).count()
}

pub(crate) fn tokens(document: &SourceDocument) {
    let state = document.read();
    for token in state.tokens() {
        println!("{:?}@{:?} {:?}", token.kind, token.range(), token.text(state.tree_text()));
    }
}

pub(crate) fn tree(document: &SourceDocument) {
    let state = document.read();
    print!("{}", state.tree().debug_dump(state.tree_text()));
}

pub(crate) fn edit(document: &SourceDocument, offset: u32, delete: u32, insert: &str) -> anyhow::Result<()> {
    let start = TextSize::new(offset);
    let range = TextRange::at(start, TextSize::new(delete));
    let outcome = document
        .apply(TextChange::replace(range, insert))
        .with_context(|| format!("cannot apply edit at {offset}"))?;

    let state = document.read();
    match outcome {
        PatchOutcome::Spliced { new, token_diff, line_diff, .. } => {
            let kind = state.tree().node(new).map_or("?", |node| node.kind().name());
            println!("spliced {kind} (tokens {token_diff:+}, lines {line_diff:+})");
        }
        PatchOutcome::Replaced => println!("replaced the whole tree"),
        PatchOutcome::Retained => {
            let message = state.lexical_error().map_or_else(String::new, ToString::to_string);
            println!("kept the previous tree: {message}");
        }
    }
    print!("{}", state.tree().debug_dump(state.tree_text()));
    Ok(())
}
