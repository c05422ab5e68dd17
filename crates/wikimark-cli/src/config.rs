//! Command line configuration.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use wikimark_core::{Article, slugify};
use wikimark_page::Theme;

/// Command line configuration for wikimark.
#[derive(Debug, Clone, Parser)]
#[command(name = "wikimark-cli", version, about = "Render wiki markup articles", long_about = None)]
pub struct Config {
    /// Markup file, or article JSON with --article; stdin when omitted
    pub input: Option<PathBuf>,

    /// Read the input as an article record ({id, title, description, content})
    #[arg(long)]
    pub article: bool,

    /// Output to produce
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Pass the HTML fragment through the allow-list sanitizer
    #[arg(long)]
    pub sanitized: bool,

    /// Article title when the input is raw markup
    #[arg(long)]
    pub title: Option<String>,

    /// Color theme for --format page
    #[arg(long, value_enum, default_value_t = ThemeArg::Auto)]
    pub theme: ThemeArg,

    /// Print markup diagnostics to stderr
    #[arg(long, value_enum)]
    pub diagnostics: Option<DiagnosticsMode>,

    /// Log filter, overrides RUST_LOG (e.g. "debug", "wikimark_core=trace")
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Article HTML fragment
    Html,
    /// Editor runs as JSON delta ops
    Runs,
    /// Standalone reading page
    Page,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum ThemeArg {
    Auto,
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Auto => Theme::Auto,
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum DiagnosticsMode {
    Json,
    Pretty,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Reads the raw input text from the input file or stdin.
    ///
    /// # Errors
    ///
    /// Returns error if the file or stdin cannot be read as UTF-8.
    pub fn read_input(&self) -> Result<String> {
        match &self.input {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
            None => {
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .context("failed to read stdin")?;
                Ok(buffer)
            }
        }
    }

    /// Builds the article to render from `source`.
    ///
    /// # Errors
    ///
    /// Returns error if `--article` is set and `source` is not a valid article record.
    pub fn load_article(&self, source: String) -> Result<Article> {
        if self.article {
            let mut article: Article =
                serde_json::from_str(&source).context("invalid article JSON")?;
            if let Some(title) = &self.title {
                article.title = title.clone();
            }
            return Ok(article);
        }

        let title = self.title.clone().unwrap_or_else(|| self.input_stem());
        Ok(Article {
            id: slugify(&title),
            title,
            description: String::new(),
            content: source,
        })
    }

    fn input_stem(&self) -> String {
        self.input
            .as_ref()
            .and_then(|path| path.file_stem())
            .and_then(|stem| stem.to_str())
            .map(String::from)
            .unwrap_or_default()
    }
}
