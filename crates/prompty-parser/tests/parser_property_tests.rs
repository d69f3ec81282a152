//! Property-based checks of parser round-trips.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use prompty_ast::NodeKind;
use prompty_parser::Parser;

fn plain_text() -> impl Strategy<Value = String> {
    ".+".prop_filter("no open delimiter or trailing backslash", |s: &String| {
        !s.contains("{~") && !s.ends_with('\\')
    })
}

proptest! {
    /// A source without tags parses to a single text node holding it
    #[test]
    fn text_only_sources_round_trip(text in plain_text()) {
        let root = Parser::new(&text).parse().unwrap();
        let NodeKind::Root { children } = &root.kind else { unreachable!() };
        prop_assert_eq!(children.len(), 1);
        let NodeKind::Text { content } = &children[0].kind else {
            return Err(TestCaseError::fail("expected a text node"));
        };
        prop_assert_eq!(content, &text);
    }

    /// Attribute values survive quoting and unescaping
    #[test]
    fn attribute_values_round_trip(value in "[a-zA-Z0-9 _.@/-]*") {
        let source = format!("{{~prompty.var name=\"{value}\" /~}}");
        let root = Parser::new(&source).parse().unwrap();
        let NodeKind::Root { children } = &root.kind else { unreachable!() };
        let NodeKind::Tag { attrs, .. } = &children[0].kind else {
            return Err(TestCaseError::fail("expected a tag node"));
        };
        prop_assert_eq!(attrs.get("name"), Some(value.as_str()));
    }

    /// Raw bodies are preserved byte-exactly by the parser
    #[test]
    fn raw_bodies_round_trip(body in plain_text()) {
        let source = format!("{{~prompty.raw~}}{body}{{~/prompty.raw~}}");
        let root = Parser::new(&source).parse().unwrap();
        let NodeKind::Root { children } = &root.kind else { unreachable!() };
        let NodeKind::Tag { raw_content, .. } = &children[0].kind else {
            return Err(TestCaseError::fail("expected a tag node"));
        };
        prop_assert_eq!(raw_content.as_deref(), Some(body.as_str()));
    }
}
