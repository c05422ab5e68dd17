use serde::Serialize;
use wikimark_core::{Diagnostic, Position, SourceMap};

use crate::config::DiagnosticsMode;

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    code: &'a str,
    severity: &'static str,
    message: &'a str,
    range: JsonRange,
}

#[derive(Serialize)]
struct JsonRange {
    start: JsonPosition,
    end: JsonPosition,
}

#[derive(Serialize)]
struct JsonPosition {
    line: usize,
    character: usize,
}

impl From<Position> for JsonPosition {
    fn from(position: Position) -> Self {
        Self {
            line: position.line,
            character: position.character,
        }
    }
}

/// Formats diagnostics for stderr. Every diagnostic is a warning.
pub fn render(
    diagnostics: &[Diagnostic],
    source_map: &SourceMap,
    mode: DiagnosticsMode,
) -> serde_json::Result<String> {
    match mode {
        DiagnosticsMode::Json => {
            let entries: Vec<_> = diagnostics
                .iter()
                .map(|diagnostic| {
                    let range = source_map.range(diagnostic.span);
                    JsonDiagnostic {
                        code: diagnostic.code,
                        severity: "warning",
                        message: &diagnostic.message,
                        range: JsonRange {
                            start: range.start.into(),
                            end: range.end.into(),
                        },
                    }
                })
                .collect();
            serde_json::to_string_pretty(&entries)
        }
        DiagnosticsMode::Pretty => Ok(diagnostics
            .iter()
            .map(|diagnostic| {
                let start = source_map.position(diagnostic.span.start);
                format!(
                    "{}:{}: warning {} {}",
                    start.line + 1,
                    start.character + 1,
                    diagnostic.code,
                    diagnostic.message
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::config::DiagnosticsMode;
    use wikimark_core::parse;

    #[test]
    fn pretty_uses_one_based_positions() {
        let parsed = parse("ok\nsee '''here");
        let out = render(&parsed.diagnostics, &parsed.source_map, DiagnosticsMode::Pretty)
            .expect("render");
        assert_eq!(
            out,
            "2:5: warning W_UNCLOSED_BOLD bold text has no closing `'''`"
        );
    }

    #[test]
    fn json_lists_ranges() {
        let parsed = parse("[[open");
        let out = render(&parsed.diagnostics, &parsed.source_map, DiagnosticsMode::Json)
            .expect("render");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value[0]["code"], "W_UNCLOSED_LINK");
        assert_eq!(value[0]["severity"], "warning");
        assert_eq!(value[0]["range"]["end"]["character"], 2);
    }

    #[test]
    fn json_is_an_empty_array_without_diagnostics() {
        let parsed = parse("clean");
        let out = render(&parsed.diagnostics, &parsed.source_map, DiagnosticsMode::Json)
            .expect("render");
        assert_eq!(out, "[]");
    }
}
