use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;
use wikimark_core::{Article, HtmlEmitOptions, OutlineEntry, outline};

const BASE_CSS: &str = include_str!("../assets/wikimark.css");

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

#[derive(Debug, Clone)]
pub struct PageOptions {
    pub inline_css: bool,
    pub table_of_contents: bool,
    pub sanitized: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            inline_css: true,
            table_of_contents: true,
            sanitized: false,
        }
    }
}

/// Builds standalone reading pages around article fragments.
#[derive(Debug, Clone)]
pub struct Renderer {
    theme: Theme,
    custom_vars: BTreeMap<String, String>,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            custom_vars: BTreeMap::new(),
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_vars.insert(key.into(), value.into());
        self
    }

    pub fn stylesheet(&self) -> String {
        let mut out = String::new();
        let (light_vars, dark_vars) = default_theme_vars();

        match self.theme {
            Theme::Auto => {
                out.push_str(&root_block(&light_vars, true));
                out.push_str("@media (prefers-color-scheme: dark) {\n");
                out.push_str(&indent_root_block(&dark_vars));
                out.push_str("}\n");
            }
            Theme::Light => out.push_str(&root_block(&light_vars, true)),
            Theme::Dark => out.push_str(&root_block(&dark_vars, true)),
        }

        if !self.custom_vars.is_empty() {
            out.push_str(&root_block(&self.custom_vars, false));
        }

        out.push_str(BASE_CSS);
        out
    }

    /// Wraps a fragment in a minimal HTML document.
    pub fn embed_html(&self, html: &str, with_inline_css: bool) -> String {
        self.document("Article", html, with_inline_css)
    }

    /// Renders the full reading page: heading, description, contents and body.
    pub fn render_article(&self, article: &Article, options: &PageOptions) -> String {
        let parsed = article.parse();
        let emit_options = HtmlEmitOptions { heading_ids: true };
        let body = if options.sanitized {
            wikimark_core::emit_html_sanitized_with_options(&parsed.document, &emit_options)
        } else {
            wikimark_core::emit_html_with_options(&parsed.document, &emit_options)
        };
        let entries = outline(&parsed.document);
        debug!(
            article = %article.id,
            headings = entries.len(),
            "rendering article page"
        );

        let mut page = String::new();
        page.push_str("<div class=\"page\">\n");
        if options.table_of_contents {
            page.push_str(&table_of_contents(&entries));
        }
        page.push_str("<main class=\"article\">\n");
        page.push_str(&format!(
            "<h1 class=\"firstHeading\">{}</h1>\n",
            escape_html(article.display_title())
        ));
        if !article.description.is_empty() {
            page.push_str(&format!(
                "<p class=\"article-description\">{}</p>\n",
                escape_html(&article.description)
            ));
        }
        page.push_str("<div id=\"articleBody\">\n");
        page.push_str(&body);
        page.push_str("\n</div>\n</main>\n</div>");

        self.document(article.display_title(), &page, options.inline_css)
    }

    pub fn generate_files(&self, out_dir: &Path) -> io::Result<()> {
        fs::create_dir_all(out_dir)?;
        fs::write(out_dir.join("wikimark.css"), self.stylesheet())?;
        Ok(())
    }

    fn document(&self, title: &str, body: &str, with_inline_css: bool) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n");
        out.push_str("<html lang=\"en\">\n");
        out.push_str("<head>\n");
        out.push_str("  <meta charset=\"utf-8\" />\n");
        out.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
        out.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
        if with_inline_css {
            out.push_str("  <style>\n");
            out.push_str(&self.stylesheet());
            out.push_str("\n  </style>\n");
        } else {
            out.push_str("  <link rel=\"stylesheet\" href=\"wikimark.css\" />\n");
        }
        out.push_str("</head>\n");
        out.push_str("<body>\n");
        out.push_str(body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("</body>\n");
        out.push_str("</html>\n");
        out
    }
}

/// Contents sidebar; empty when the article has no headings.
pub fn table_of_contents(entries: &[OutlineEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("<nav class=\"toc\" id=\"toc\">\n");
    out.push_str("  <div class=\"toc-title\">Contents</div>\n");
    for entry in entries {
        out.push_str(&format!(
            "  <a href=\"#{}\" class=\"toc-link toc-level-{}\">{}</a>\n",
            escape_html(&entry.slug),
            entry.level,
            escape_html(&entry.text)
        ));
    }
    out.push_str("</nav>\n");
    out
}

fn default_theme_vars() -> (BTreeMap<String, String>, BTreeMap<String, String>) {
    let light = BTreeMap::from([
        ("--wikimark-bg".to_string(), "#ffffff".to_string()),
        ("--wikimark-fg".to_string(), "#202122".to_string()),
        ("--wikimark-muted".to_string(), "#54595d".to_string()),
        ("--wikimark-border".to_string(), "#a2a9b1".to_string()),
        ("--wikimark-link".to_string(), "#3366cc".to_string()),
    ]);

    let dark = BTreeMap::from([
        ("--wikimark-bg".to_string(), "#101418".to_string()),
        ("--wikimark-fg".to_string(), "#eaecf0".to_string()),
        ("--wikimark-muted".to_string(), "#a2a9b1".to_string()),
        ("--wikimark-border".to_string(), "#54595d".to_string()),
        ("--wikimark-link".to_string(), "#88a3e8".to_string()),
    ]);

    (light, dark)
}

fn format_vars(vars: &BTreeMap<String, String>, indent: &str) -> String {
    let mut out = String::new();
    for (key, value) in vars {
        out.push_str(indent);
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push_str(";\n");
    }
    out
}

fn root_block(vars: &BTreeMap<String, String>, include_color_scheme: bool) -> String {
    let mut out = String::new();
    out.push_str(":root {\n");
    if include_color_scheme {
        out.push_str("  color-scheme: light dark;\n");
    }
    out.push_str(&format_vars(vars, "  "));
    out.push_str("}\n");
    out
}

fn indent_root_block(vars: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    out.push_str("  :root {\n");
    out.push_str("    color-scheme: light dark;\n");
    out.push_str(&format_vars(vars, "    "));
    out.push_str("  }\n");
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{PageOptions, Renderer, Theme, table_of_contents};
    use wikimark_core::{Article, outline, parse};

    #[test]
    fn embed_html_includes_css() {
        let renderer = Renderer::new(Theme::Light);
        let html = renderer.embed_html("<p>Hi</p>", true);
        assert!(html.contains("<style>"));
        assert!(html.contains("--wikimark-bg: #ffffff;"));
        assert!(html.contains("<p>Hi</p>"));
    }

    #[test]
    fn embed_html_can_link_stylesheet_instead() {
        let renderer = Renderer::new(Theme::Light);
        let html = renderer.embed_html("<p>Hi</p>", false);
        assert!(!html.contains("<style>"));
        assert!(html.contains("href=\"wikimark.css\""));
    }

    #[test]
    fn auto_theme_switches_on_color_scheme() {
        let css = Renderer::new(Theme::Auto).stylesheet();
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
        assert!(css.contains("    --wikimark-bg: #101418;"));
        assert!(!Renderer::new(Theme::Dark).stylesheet().contains("@media (prefers-color-scheme"));
    }

    #[test]
    fn custom_vars_override_palette() {
        let css = Renderer::new(Theme::Light)
            .with_var("--wikimark-link", "rebeccapurple")
            .stylesheet();
        assert!(css.contains("  --wikimark-link: rebeccapurple;"));
    }

    #[test]
    fn article_page_links_contents_to_heading_ids() {
        let article = Article::new("Ada <Lovelace>", "Lead.\n\n== Early life ==\n=== Family ===\ntext");
        let html = Renderer::new(Theme::Auto).render_article(&article, &PageOptions::default());
        assert!(html.contains("<title>Ada &lt;Lovelace&gt;</title>"));
        assert!(html.contains("<h1 class=\"firstHeading\">Ada &lt;Lovelace&gt;</h1>"));
        assert!(html.contains("<a href=\"#early-life\" class=\"toc-link toc-level-2\">Early life</a>"));
        assert!(html.contains("<a href=\"#family\" class=\"toc-link toc-level-3\">Family</a>"));
        assert!(html.contains("id=\"early-life\""));
        assert!(html.contains("id=\"family\""));
    }

    #[test]
    fn page_without_headings_has_no_contents() {
        let article = Article::new("", "Only a lead.");
        let html = Renderer::new(Theme::Light).render_article(&article, &PageOptions::default());
        assert!(!html.contains("class=\"toc\""));
        assert!(html.contains("<h1 class=\"firstHeading\">Article</h1>"));
        assert!(html.contains("<p>Only a lead.</p>"));
    }

    #[test]
    fn description_is_rendered_when_present() {
        let mut article = Article::new("T", "x");
        article.description = "American computer scientist".into();
        let html = Renderer::new(Theme::Light).render_article(&article, &PageOptions::default());
        assert!(html.contains("<p class=\"article-description\">American computer scientist</p>"));
    }

    #[test]
    fn contents_lists_entries_in_order() {
        let parsed = parse("== B ==\n== A ==");
        let toc = table_of_contents(&outline(&parsed.document));
        let b = toc.find("href=\"#b\"").expect("b entry");
        let a = toc.find("href=\"#a\"").expect("a entry");
        assert!(b < a);
        assert!(table_of_contents(&[]).is_empty());
    }
}
