mod commands;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use verso_document::{DocumentOptions, LanguageKind, SourceDocument};

#[derive(Parser)]
#[command(version, about = "Inspect and edit markup and stylesheet documents")]
struct Options {
    /// Overrides the language picked from the file extension.
    #[arg(long, global = true, value_enum)]
    language: Option<Language>,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Reports lexical and syntax errors.
    Check { path: Utf8PathBuf },
    /// Lists every token with its span.
    Tokens { path: Utf8PathBuf },
    /// Prints the syntax tree.
    Tree { path: Utf8PathBuf },
    /// Applies one edit and reports how the tree was updated.
    Edit {
        path: Utf8PathBuf,
        /// Byte offset the edit starts at.
        #[arg(long)]
        offset: u32,
        /// Number of bytes removed at `offset`.
        #[arg(long, default_value_t = 0)]
        delete: u32,
        #[arg(long, default_value = "")]
        insert: String,
        /// Writes the result back to `path`.
        #[arg(long)]
        save: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Language {
    Markup,
    Stylesheet,
}

impl From<Language> for LanguageKind {
    fn from(language: Language) -> Self {
        match language {
            Language::Markup => Self::Markup,
            Language::Stylesheet => Self::Stylesheet,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("VERSO_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let options = Options::parse();
    let open = |path: &Utf8PathBuf| -> anyhow::Result<SourceDocument> {
        let document = match options.language {
            Some(language) => SourceDocument::load_with(path, DocumentOptions::new(language.into())),
            None => SourceDocument::load(path),
        };
        document.with_context(|| format!("failed to open `{path}`"))
    };

    match &options.command {
        Command::Check { path } => {
            let errors = commands::check(&open(path)?, path);
            if errors > 0 {
                anyhow::bail!("`{path}` has {errors} error(s)");
            }
        }
        Command::Tokens { path } => commands::tokens(&open(path)?),
        Command::Tree { path } => commands::tree(&open(path)?),
        Command::Edit { path, offset, delete, insert, save } => {
            let document = open(path)?;
            commands::edit(&document, *offset, *delete, insert)?;
            if *save {
                document.save().with_context(|| format!("failed to save `{path}`"))?;
            }
        }
    }

    Ok(())
}
