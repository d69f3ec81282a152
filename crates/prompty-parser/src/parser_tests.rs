#![allow(clippy::unwrap_used, clippy::panic)]

use pretty_assertions::assert_eq;
use prompty_ast::{Node, NodeKind};

use crate::error::ParseError;
use crate::parser::Parser;

fn parse(source: &str) -> Node {
    Parser::new(source).parse().unwrap()
}

fn parse_err(source: &str) -> ParseError {
    Parser::new(source).parse().unwrap_err()
}

#[test]
fn text_only() {
    let root = parse("plain text, no tags");
    assert_eq!(root.to_sexp(), r#"(root (text "plain text, no tags"))"#);
}

#[test]
fn self_closing_tag_with_attrs() {
    let root = parse(r#"{~prompty.var name="user" default="Guest" /~}"#);
    assert_eq!(
        root.to_sexp(),
        r#"(root (tag prompty.var [default="Guest" name="user"]))"#
    );
}

#[test]
fn block_tag_with_children() {
    let root = parse("{~prompty.message role=\"user\"~}Hi there{~/prompty.message~}");
    assert_eq!(
        root.to_sexp(),
        r#"(root (tag prompty.message [role="user"] (text "Hi there")))"#
    );
}

#[test]
fn mismatched_close_tag() {
    let err = parse_err("{~prompty.message role=\"user\"~}Hi{~/prompty.var~}");
    match err {
        ParseError::MismatchedTag { expected, found, .. } => {
            assert_eq!(expected, "prompty.message");
            assert_eq!(found, "prompty.var");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn raw_source_is_byte_exact() {
    let source = r#"pre {~prompty.var   name="x"/~} post"#;
    let root = parse(source);
    let NodeKind::Root { children } = &root.kind else { unreachable!() };
    let NodeKind::Tag { raw_source, .. } = &children[1].kind else {
        panic!("expected tag, got {:?}", children[1]);
    };
    assert_eq!(raw_source, r#"{~prompty.var   name="x"/~}"#);
}

#[test]
fn raw_block_preserves_tags() {
    let source = "{~prompty.raw~}keep {~prompty.var name=\"x\" /~} as-is{~/prompty.raw~}";
    let root = parse(source);
    let NodeKind::Root { children } = &root.kind else { unreachable!() };
    let NodeKind::Tag { name, raw_content, .. } = &children[0].kind else {
        panic!("expected tag");
    };
    assert_eq!(name, "prompty.raw");
    assert_eq!(
        raw_content.as_deref(),
        Some("keep {~prompty.var name=\"x\" /~} as-is")
    );
}

#[test]
fn nested_raw_is_rejected() {
    let err = parse_err("{~prompty.raw~}outer {~prompty.raw~}inner{~/prompty.raw~}{~/prompty.raw~}");
    assert!(matches!(err, ParseError::NestedRawBlock { .. }));
}

#[test]
fn comment_produces_no_node() {
    let root = parse("a{~prompty.comment~}gone {~prompty.var name=\"x\" /~}{~/prompty.comment~}b");
    assert_eq!(root.to_sexp(), r#"(root (text "a") (text "b"))"#);
}

#[test]
fn conditional_with_elseif_and_else() {
    let source = "{~prompty.if eval=\"n > 10\"~}big\
{~prompty.elseif eval=\"n > 5\"~}mid\
{~prompty.else~}small{~/prompty.if~}";
    let root = parse(source);
    assert_eq!(
        root.to_sexp(),
        r#"(root (if (branch "n > 10" (text "big")) (branch "n > 5" (text "mid")) (else (text "small"))))"#
    );
}

#[test]
fn conditional_missing_eval() {
    assert!(matches!(
        parse_err("{~prompty.if~}x{~/prompty.if~}"),
        ParseError::CondMissingEval { .. }
    ));
}

#[test]
fn elseif_missing_eval() {
    assert!(matches!(
        parse_err("{~prompty.if eval=\"a\"~}x{~prompty.elseif~}y{~/prompty.if~}"),
        ParseError::CondMissingEval { .. }
    ));
}

#[test]
fn else_with_eval_is_invalid() {
    assert!(matches!(
        parse_err("{~prompty.if eval=\"a\"~}x{~prompty.else eval=\"b\"~}y{~/prompty.if~}"),
        ParseError::CondInvalidElse { .. }
    ));
}

#[test]
fn branch_after_else_is_invalid() {
    assert!(matches!(
        parse_err(
            "{~prompty.if eval=\"a\"~}x{~prompty.else~}y{~prompty.elseif eval=\"b\"~}z{~/prompty.if~}"
        ),
        ParseError::CondElseNotLast { .. }
    ));
}

#[test]
fn unclosed_conditional() {
    assert!(matches!(
        parse_err("{~prompty.if eval=\"a\"~}x"),
        ParseError::CondNotClosed { .. }
    ));
}

#[test]
fn for_loop_with_index_and_limit() {
    let root = parse(
        "{~prompty.for item=\"w\" index=\"i\" in=\"ws\" limit=\"3\"~}x{~/prompty.for~}",
    );
    assert_eq!(root.to_sexp(), r#"(root (for w index=i in ws limit=3 (text "x")))"#);
}

#[test]
fn for_loop_missing_attrs() {
    assert!(matches!(
        parse_err("{~prompty.for in=\"ws\"~}x{~/prompty.for~}"),
        ParseError::ForMissingItem { .. }
    ));
    assert!(matches!(
        parse_err("{~prompty.for item=\"w\"~}x{~/prompty.for~}"),
        ParseError::ForMissingIn { .. }
    ));
}

#[test]
fn for_loop_invalid_limit() {
    let err = parse_err("{~prompty.for item=\"w\" in=\"ws\" limit=\"-1\"~}x{~/prompty.for~}");
    match err {
        ParseError::ForInvalidLimit { limit, .. } => assert_eq!(limit, "-1"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unclosed_for_loop() {
    assert!(matches!(
        parse_err("{~prompty.for item=\"w\" in=\"ws\"~}x"),
        ParseError::ForNotClosed { .. }
    ));
}

#[test]
fn switch_with_cases_and_default() {
    let source = "{~prompty.switch eval=\"lang\"~}\n  \
{~prompty.case value=\"fr\"~}Bonjour{~/prompty.case~}\n  \
{~prompty.case eval=\"lang == \\\"de\\\"\"~}Hallo{~/prompty.case~}\n  \
{~prompty.casedefault~}Hello{~/prompty.casedefault~}\n{~/prompty.switch~}";
    let root = parse(source);
    assert_eq!(
        root.to_sexp(),
        r#"(root (switch "lang" (case "fr" (text "Bonjour")) (case-eval "lang == \"de\"" (text "Hallo")) (default (text "Hello"))))"#
    );
}

#[test]
fn switch_requires_eval() {
    assert!(matches!(
        parse_err("{~prompty.switch~}{~/prompty.switch~}"),
        ParseError::SwitchMissingEval { .. }
    ));
}

#[test]
fn switch_case_requires_exactly_one_of_value_or_eval() {
    assert!(matches!(
        parse_err(
            "{~prompty.switch eval=\"x\"~}{~prompty.case~}a{~/prompty.case~}{~/prompty.switch~}"
        ),
        ParseError::SwitchMissingValue { .. }
    ));
    assert!(matches!(
        parse_err(
            "{~prompty.switch eval=\"x\"~}{~prompty.case value=\"a\" eval=\"b\"~}c{~/prompty.case~}{~/prompty.switch~}"
        ),
        ParseError::SwitchMissingValue { .. }
    ));
}

#[test]
fn switch_duplicate_default() {
    let source = "{~prompty.switch eval=\"x\"~}\
{~prompty.casedefault~}a{~/prompty.casedefault~}\
{~prompty.casedefault~}b{~/prompty.casedefault~}\
{~/prompty.switch~}";
    assert!(matches!(parse_err(source), ParseError::SwitchDuplicateDefault { .. }));
}

#[test]
fn switch_default_must_be_last() {
    let source = "{~prompty.switch eval=\"x\"~}\
{~prompty.casedefault~}a{~/prompty.casedefault~}\
{~prompty.case value=\"v\"~}b{~/prompty.case~}\
{~/prompty.switch~}";
    assert!(matches!(parse_err(source), ParseError::SwitchDefaultNotLast { .. }));
}

#[test]
fn switch_rejects_loose_content() {
    let err = parse_err("{~prompty.switch eval=\"x\"~}loose{~/prompty.switch~}");
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn unclosed_switch() {
    assert!(matches!(
        parse_err("{~prompty.switch eval=\"x\"~}"),
        ParseError::SwitchNotClosed { .. }
    ));
}

#[test]
fn named_block() {
    let root = parse("{~prompty.block name=\"body\"~}default{~/prompty.block~}");
    assert_eq!(root.to_sexp(), r#"(root (block body (text "default")))"#);
}

#[test]
fn block_requires_name() {
    assert!(matches!(
        parse_err("{~prompty.block~}x{~/prompty.block~}"),
        ParseError::BlockMissingName { .. }
    ));
}

#[test]
fn extends_and_parent_are_plain_tags() {
    let root = parse("{~prompty.extends template=\"base\" /~}{~prompty.block name=\"b\"~}{~prompty.parent /~}{~/prompty.block~}");
    assert_eq!(
        root.to_sexp(),
        r#"(root (tag prompty.extends [template="base"]) (block b (tag prompty.parent)))"#
    );
}

#[test]
fn stray_branch_tag_is_rejected() {
    assert!(matches!(
        parse_err("{~prompty.else~}"),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn stray_close_tag_is_rejected() {
    assert!(matches!(parse_err("{~/prompty.if~}"), ParseError::UnexpectedToken { .. }));
}

#[test]
fn duplicate_attribute_last_wins() {
    let root = parse(r#"{~prompty.var name="a" name="b" /~}"#);
    assert_eq!(root.to_sexp(), r#"(root (tag prompty.var [name="b"]))"#);
}

#[test]
fn escaped_delimiter_stays_text() {
    let root = parse(r"literal \{~ delimiter");
    assert_eq!(
        root.to_sexp(),
        r#"(root (text "literal ") (text "{~") (text " delimiter"))"#
    );
}

#[test]
fn nested_structures() {
    let source = "{~prompty.if eval=\"ok\"~}\
{~prompty.for item=\"x\" in=\"xs\"~}[{~prompty.var name=\"x\" /~}]{~/prompty.for~}\
{~/prompty.if~}";
    let root = parse(source);
    assert_eq!(
        root.to_sexp(),
        r#"(root (if (branch "ok" (for x in xs (text "[") (tag prompty.var [name="x"]) (text "]")))))"#
    );
}
