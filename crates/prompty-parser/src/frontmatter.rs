//! Frontmatter extraction.
//!
//! A template source may open with a YAML document between `---` lines.
//! The extractor returns the YAML text untouched (parsing YAML is the
//! host's concern) and the remaining template body.

use prompty_ast::tags;
use prompty_position::Position;

use crate::error::{ParseError, ParseResult};

const DELIMITER: &str = "---";
const BOM: &str = "\u{feff}";

/// Outcome of frontmatter extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterResult {
    /// Whitespace-trimmed text between the delimiter lines; empty without frontmatter
    pub yaml_text: String,
    /// Template source after the closing delimiter line
    pub template_body: String,
    /// Position where the template body starts in the original source
    pub position: Position,
    /// Whether a frontmatter block was present
    pub has_frontmatter: bool,
}

/// Extract optional YAML frontmatter from a template source.
///
/// A leading byte-order mark and horizontal whitespace (spaces and tabs,
/// not newlines) are skipped before looking for the opening `---` line.
/// A legacy `{~prompty.config~}` block is rejected with its exact position.
pub fn extract(source: &str) -> ParseResult<FrontmatterResult> {
    let mut at = Position::start();
    let mut rest = source;

    if let Some(stripped) = rest.strip_prefix(BOM) {
        at.offset += BOM.len();
        rest = stripped;
    }
    let body_start = rest;
    let body_start_at = at;

    while let Some(stripped) = rest.strip_prefix([' ', '\t']) {
        at.advance(rest.chars().next().unwrap_or(' '));
        rest = stripped;
    }

    let legacy_open = format!("{{~{}~}}", tags::LEGACY_CONFIG);
    if rest.starts_with(&legacy_open) {
        return Err(ParseError::LegacyConfigDetected { position: at });
    }

    let opens = rest.strip_prefix("---\n").map(|r| (r, 4)).or_else(|| {
        rest.strip_prefix("---\r\n").map(|r| (r, 5))
    });
    let Some((after_open, open_len)) = opens else {
        return Ok(FrontmatterResult {
            yaml_text: String::new(),
            template_body: body_start.to_string(),
            position: body_start_at,
            has_frontmatter: false,
        });
    };

    let open_pos = at;
    let mut yaml_at = at;
    yaml_at.advance_str(&rest[..open_len]);

    // Scan for a line consisting of exactly --- followed by newline or EOF
    let mut line_start = 0usize;
    loop {
        if line_start >= after_open.len() {
            return Err(ParseError::FrontmatterUnclosed { position: open_pos });
        }
        let line_end = after_open[line_start..]
            .find('\n')
            .map(|i| line_start + i)
            .unwrap_or(after_open.len());
        let line = after_open[line_start..line_end].trim_end_matches('\r');
        if line == DELIMITER {
            let yaml_text = after_open[..line_start].trim().to_string();
            let body_start = if line_end < after_open.len() { line_end + 1 } else { line_end };
            let mut body_pos = yaml_at;
            body_pos.advance_str(&after_open[..body_start]);
            return Ok(FrontmatterResult {
                yaml_text,
                template_body: after_open[body_start..].to_string(),
                position: body_pos,
                has_frontmatter: true,
            });
        }
        if line_end >= after_open.len() {
            return Err(ParseError::FrontmatterUnclosed { position: open_pos });
        }
        line_start = line_end + 1;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_frontmatter_returns_whole_source() {
        let result = extract("Hello {~prompty.var name=\"x\" /~}").unwrap();
        assert!(!result.has_frontmatter);
        assert_eq!(result.yaml_text, "");
        assert_eq!(result.template_body, "Hello {~prompty.var name=\"x\" /~}");
    }

    #[test]
    fn frontmatter_is_split_from_body() {
        let result = extract("---\ntitle: test\nmodel: sonnet\n---\nBody text").unwrap();
        assert!(result.has_frontmatter);
        assert_eq!(result.yaml_text, "title: test\nmodel: sonnet");
        assert_eq!(result.template_body, "Body text");
        assert_eq!(result.position.line, 5);
    }

    #[test]
    fn crlf_delimiters() {
        let result = extract("---\r\ntitle: t\r\n---\r\nBody").unwrap();
        assert!(result.has_frontmatter);
        assert_eq!(result.yaml_text, "title: t");
        assert_eq!(result.template_body, "Body");
    }

    #[test]
    fn closing_delimiter_at_eof() {
        let result = extract("---\ntitle: t\n---").unwrap();
        assert!(result.has_frontmatter);
        assert_eq!(result.template_body, "");
    }

    #[test]
    fn unclosed_frontmatter_is_an_error() {
        let err = extract("---\ntitle: never closed\n").unwrap_err();
        assert!(matches!(err, ParseError::FrontmatterUnclosed { .. }));
    }

    #[test]
    fn dashes_inside_yaml_do_not_close() {
        let err = extract("---\nitems:\n  - one\n").unwrap_err();
        assert!(matches!(err, ParseError::FrontmatterUnclosed { .. }));
    }

    #[test]
    fn legacy_config_is_rejected_with_position() {
        let err = extract("  {~prompty.config~}rest").unwrap_err();
        match err {
            ParseError::LegacyConfigDetected { position } => {
                assert_eq!(position.offset, 2);
                assert_eq!(position.column, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bom_is_skipped() {
        let result = extract("\u{feff}---\na: 1\n---\nB").unwrap();
        assert!(result.has_frontmatter);
        assert_eq!(result.template_body, "B");
    }

    #[test]
    fn triple_dash_mid_body_is_not_frontmatter() {
        let result = extract("text\n---\nmore").unwrap();
        assert!(!result.has_frontmatter);
        assert_eq!(result.template_body, "text\n---\nmore");
    }
}
