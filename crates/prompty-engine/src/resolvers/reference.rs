//! Cross-template reference resolver.

use prompty_ast::{Attributes, tags};
use prompty_parser::Parser;

use crate::context::ExecContext;
use crate::error::{ResolveError, ResolveResult};
use crate::executor::execute;
use crate::registry::TagResolver;

/// `{~prompty.ref slug="name[@version]" [version="…"] /~}`
///
/// Resolves the prompt body through the context's document resolver and
/// renders it with the reference chain extended, so nested refs are
/// depth-limited and cycle-checked.
pub struct RefResolver;

impl TagResolver for RefResolver {
    fn tag_name(&self) -> &'static str {
        tags::REF
    }

    fn validate(&self, attrs: &Attributes) -> ResolveResult<()> {
        let Some(raw_slug) = attrs.get("slug") else {
            return Err(ResolveError::RefMissingSlug);
        };
        let (slug, _) = split_version(raw_slug);
        if !is_valid_slug(slug) {
            return Err(ResolveError::RefInvalidSlug { slug: slug.to_string() });
        }
        Ok(())
    }

    fn resolve(&self, ctx: &ExecContext<'_>, attrs: &Attributes) -> ResolveResult<String> {
        let Some(raw_slug) = attrs.get("slug") else {
            return Err(ResolveError::RefMissingSlug);
        };
        let (slug, embedded_version) = split_version(raw_slug);
        if !is_valid_slug(slug) {
            return Err(ResolveError::RefInvalidSlug { slug: slug.to_string() });
        }
        let version = attrs.get("version").or(embedded_version);

        let Some(documents) = ctx.doc_resolver else {
            return Err(ResolveError::RefNoResolver);
        };

        let next_depth = ctx.ref_depth + 1;
        let max = ctx.config.max_ref_depth;
        if max > 0 && next_depth > max {
            return Err(ResolveError::RefDepthExceeded { depth: next_depth, max });
        }
        if ctx.ref_chain.iter().any(|link| link == slug) {
            let mut chain: Vec<&str> = ctx.ref_chain.iter().map(String::as_str).collect();
            chain.push(slug);
            return Err(ResolveError::RefCircular { chain: chain.join(".") });
        }

        let body = documents.resolve_prompt_body(ctx.cancel, slug, version)?;

        // Render the body so nested refs stay guarded
        let mut chain = ctx.ref_chain.to_vec();
        chain.push(slug.to_string());
        let root = Parser::with_config(&body, ctx.config.lexer_config())
            .parse()
            .map_err(|err| ResolveError::Other(format!("ref {slug:?}: {err}")))?;
        let child_ctx = ctx.with_ref_chain(next_depth, &chain);
        execute(&root, &child_ctx)
            .map_err(|err| ResolveError::Other(format!("ref {slug:?}: {err}")))
    }
}

/// Split `slug@version` at the last `@`; no `@` means no version
fn split_version(raw: &str) -> (&str, Option<&str>) {
    match raw.rsplit_once('@') {
        Some((slug, version)) if !slug.is_empty() => (slug, Some(version)),
        _ => (raw, None),
    }
}

/// Slug grammar: lowercase letter, then lowercase letters, digits, hyphens
fn is_valid_slug(slug: &str) -> bool {
    let mut chars = slug.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_lowercase()
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
