mod config;
mod diagnostics;

use anyhow::{Context, Result};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use wikimark_core::{HtmlEmitOptions, emit_html_sanitized_with_options, emit_html_with_options};
use wikimark_page::{PageOptions, Renderer};

use crate::config::{Config, OutputFormat};

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.log_level.as_deref());

    let source = config.read_input()?;
    let article = config.load_article(source)?;
    debug!(article = %article.id, format = ?config.format, "rendering");

    let parsed = article.parse();
    if let Some(mode) = config.diagnostics {
        let report = diagnostics::render(&parsed.diagnostics, &parsed.source_map, mode)
            .context("failed to format diagnostics")?;
        if !report.is_empty() {
            eprintln!("{}", report);
        }
    } else if !parsed.diagnostics.is_empty() {
        warn!(
            count = parsed.diagnostics.len(),
            "malformed markup rendered literally; pass --diagnostics for details"
        );
    }

    let output = match config.format {
        OutputFormat::Html => {
            let options = HtmlEmitOptions::default();
            if config.sanitized {
                emit_html_sanitized_with_options(&parsed.document, &options)
            } else {
                emit_html_with_options(&parsed.document, &options)
            }
        }
        OutputFormat::Runs => serde_json::to_string_pretty(&article.to_runs())
            .context("failed to serialize runs")?,
        OutputFormat::Page => {
            let options = PageOptions {
                sanitized: config.sanitized,
                ..PageOptions::default()
            };
            Renderer::new(config.theme.into()).render_article(&article, &options)
        }
    };

    println!("{}", output.trim_end_matches('\n'));
    Ok(())
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
