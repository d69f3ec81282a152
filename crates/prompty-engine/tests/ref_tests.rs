//! Reference resolution through a document-store stub.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use prompty_engine::{
    CancelToken, DocumentResolver, Engine, EngineConfig, EngineError, MapContext, ResolveError,
    ResolveResult,
};

/// In-memory document store keyed by slug (and optionally slug@version)
struct StaticDocs {
    bodies: HashMap<String, String>,
}

impl StaticDocs {
    fn new(entries: &[(&str, &str)]) -> Self {
        StaticDocs {
            bodies: entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }
}

impl DocumentResolver for StaticDocs {
    fn resolve_prompt_body(
        &self,
        _cancel: &CancelToken,
        slug: &str,
        version: Option<&str>,
    ) -> ResolveResult<String> {
        let key = match version {
            Some(version) => format!("{slug}@{version}"),
            None => slug.to_string(),
        };
        self.bodies
            .get(&key)
            .or_else(|| self.bodies.get(slug))
            .cloned()
            .ok_or(ResolveError::RefNotFound { slug: slug.to_string() })
    }
}

fn engine_with_docs(entries: &[(&str, &str)]) -> Engine {
    let mut engine = Engine::with_defaults();
    engine.set_document_resolver(Box::new(StaticDocs::new(entries)));
    engine
}

fn resolver_failure(err: EngineError) -> ResolveError {
    match err {
        EngineError::ResolverFailed { source, .. } => source,
        other => panic!("expected resolver failure, got {other:?}"),
    }
}

#[test]
fn ref_inserts_resolved_body() {
    let engine = engine_with_docs(&[("greeting", "Hello from the store")]);
    assert_eq!(
        engine.render("[{~prompty.ref slug=\"greeting\" /~}]", &MapContext::new()).unwrap(),
        "[Hello from the store]"
    );
}

#[test]
fn ref_body_is_rendered_as_a_template() {
    let engine = engine_with_docs(&[("templated", "n = {~prompty.var name=\"n\" /~}")]);
    let mut data = MapContext::new();
    data.insert("n", 9);
    assert_eq!(
        engine.render("{~prompty.ref slug=\"templated\" /~}", &data).unwrap(),
        "n = 9"
    );
}

#[test]
fn ref_version_attribute_overrides_embedded_version() {
    let engine = engine_with_docs(&[("p@1", "one"), ("p@2", "two")]);
    assert_eq!(
        engine.render("{~prompty.ref slug=\"p@1\" /~}", &MapContext::new()).unwrap(),
        "one"
    );
    assert_eq!(
        engine
            .render("{~prompty.ref slug=\"p@1\" version=\"2\" /~}", &MapContext::new())
            .unwrap(),
        "two"
    );
}

#[test]
fn nested_refs_resolve() {
    let engine = engine_with_docs(&[
        ("outer", "o({~prompty.ref slug=\"inner\" /~})"),
        ("inner", "i"),
    ]);
    assert_eq!(
        engine.render("{~prompty.ref slug=\"outer\" /~}", &MapContext::new()).unwrap(),
        "o(i)"
    );
}

#[test]
fn direct_cycle_is_detected() {
    let engine = engine_with_docs(&[("loop", "{~prompty.ref slug=\"loop\" /~}")]);
    let err = engine.render("{~prompty.ref slug=\"loop\" /~}", &MapContext::new()).unwrap_err();
    // The cycle error is nested inside the outer ref's failure
    assert!(err.to_string().contains("circular"), "got: {err}");
}

#[test]
fn indirect_cycle_reports_dotted_chain() {
    let engine = engine_with_docs(&[
        ("a", "{~prompty.ref slug=\"b\" /~}"),
        ("b", "{~prompty.ref slug=\"a\" /~}"),
    ]);
    let err = engine.render("{~prompty.ref slug=\"a\" /~}", &MapContext::new()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("a.b.a"), "got: {message}");
}

#[test]
fn ref_depth_limit() {
    let mut entries: Vec<(String, String)> = Vec::new();
    for i in 0..15 {
        entries.push((format!("d{i}"), format!("{{~prompty.ref slug=\"d{}\" /~}}", i + 1)));
    }
    entries.push(("d15".to_string(), "bottom".to_string()));
    let pairs: Vec<(&str, &str)> =
        entries.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    let engine = engine_with_docs(&pairs);

    let err = engine.render("{~prompty.ref slug=\"d0\" /~}", &MapContext::new()).unwrap_err();
    assert!(err.to_string().contains("depth"), "got: {err}");
}

#[test]
fn shallow_chain_stays_under_the_limit() {
    let mut config = EngineConfig::default();
    config.max_ref_depth = 3;
    let mut engine = Engine::new(config);
    engine.set_document_resolver(Box::new(StaticDocs::new(&[
        ("one", "1{~prompty.ref slug=\"two\" /~}"),
        ("two", "2{~prompty.ref slug=\"three\" /~}"),
        ("three", "3"),
    ])));
    assert_eq!(
        engine.render("{~prompty.ref slug=\"one\" /~}", &MapContext::new()).unwrap(),
        "123"
    );
}

#[test]
fn missing_resolver_is_an_error() {
    let err = Engine::with_defaults()
        .render("{~prompty.ref slug=\"x\" /~}", &MapContext::new())
        .unwrap_err();
    assert!(matches!(resolver_failure(err), ResolveError::RefNoResolver));
}

#[test]
fn unknown_slug_is_not_found() {
    let engine = engine_with_docs(&[]);
    let err = engine.render("{~prompty.ref slug=\"ghost\" /~}", &MapContext::new()).unwrap_err();
    assert!(matches!(resolver_failure(err), ResolveError::RefNotFound { .. }));
}

#[test]
fn invalid_slugs_are_rejected() {
    let engine = engine_with_docs(&[]);
    for slug in ["Caps", "9start", "under_score"] {
        let source = format!("{{~prompty.ref slug=\"{slug}\" /~}}");
        let err = engine.render(&source, &MapContext::new()).unwrap_err();
        assert!(
            matches!(resolver_failure(err), ResolveError::RefInvalidSlug { .. }),
            "slug {slug:?}"
        );
    }
}

#[test]
fn missing_slug_attribute() {
    let engine = engine_with_docs(&[]);
    let err = engine.render("{~prompty.ref /~}", &MapContext::new()).unwrap_err();
    assert!(matches!(resolver_failure(err), ResolveError::RefMissingSlug));
}

#[test]
fn ref_failure_respects_error_strategy() {
    let engine = engine_with_docs(&[]);
    assert_eq!(
        engine
            .render(
                "a{~prompty.ref slug=\"ghost\" onerror=\"remove\" /~}b",
                &MapContext::new()
            )
            .unwrap(),
        "ab"
    );
}
