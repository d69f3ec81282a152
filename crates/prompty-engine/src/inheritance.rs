//! Template inheritance: extends-chain resolution and block merging.
//!
//! A child template whose first significant node is
//! `{~prompty.extends template="…" /~}` contributes named block overrides
//! to its parent. The ancestor chain is resolved leaf-up with depth and
//! cycle guards; `{~prompty.parent /~}` inside an overriding block splices
//! the parent block's original content in place.

use indexmap::IndexMap;
use prompty_ast::{Node, NodeKind, tags};
use prompty_parser::Parser;
use prompty_position::Position;

use crate::config::EngineConfig;
use crate::error::InheritanceError;

/// Source lookup for parent templates.
pub trait SourceResolver {
    /// Raw source of a template by name, `None` when unknown
    fn resolve_source(&self, name: &str) -> Option<String>;
}

/// Resolve a template's extends chain into a single merged tree.
///
/// A template with no extends tag is returned unchanged.
pub fn resolve_inheritance(
    root: Node,
    sources: &dyn SourceResolver,
    config: &EngineConfig,
) -> Result<Node, InheritanceError> {
    let mut chain = Vec::new();
    resolve_level(root, sources, config, 0, &mut chain)
}

fn resolve_level(
    root: Node,
    sources: &dyn SourceResolver,
    config: &EngineConfig,
    depth: usize,
    chain: &mut Vec<String>,
) -> Result<Node, InheritanceError> {
    let Some((parent_name, _)) = find_extends(&root)? else {
        return Ok(root);
    };

    let next_depth = depth + 1;
    let max = config.max_inheritance_depth;
    if max > 0 && next_depth > max {
        return Err(InheritanceError::DepthExceeded { depth: next_depth, max });
    }
    if chain.iter().any(|name| *name == parent_name) {
        let mut full = chain.clone();
        full.push(parent_name);
        return Err(InheritanceError::Circular { chain: full });
    }

    let overrides = extract_blocks(&root)?;
    let Some(source) = sources.resolve_source(&parent_name) else {
        return Err(InheritanceError::TemplateNotFound { name: parent_name });
    };
    let parent_root = Parser::with_config(&source, config.lexer_config()).parse()?;

    chain.push(parent_name);
    let mut merged = resolve_level(parent_root, sources, config, next_depth, chain)?;
    chain.pop();

    if let NodeKind::Root { children } = &mut merged.kind {
        apply_overrides(children, &overrides);
    }
    Ok(merged)
}

/// Locate the template's extends declaration.
///
/// At most one extends tag is allowed, and only whitespace text may
/// precede it.
fn find_extends(root: &Node) -> Result<Option<(String, Position)>, InheritanceError> {
    let NodeKind::Root { children } = &root.kind else {
        return Ok(None);
    };
    let mut extends: Vec<&Node> = Vec::new();
    for node in children {
        if is_extends(node) {
            extends.push(node);
        }
    }
    let Some(first_extends) = extends.first() else {
        return Ok(None);
    };
    if extends.len() > 1 {
        return Err(InheritanceError::ExtendsMultiple { position: extends[1].pos });
    }
    let first_significant = children.iter().find(|node| !node.is_whitespace_text());
    if first_significant.map(|node| node.pos) != Some(first_extends.pos) {
        return Err(InheritanceError::ExtendsNotFirst { position: first_extends.pos });
    }
    let NodeKind::Tag { attrs, .. } = &first_extends.kind else {
        return Ok(None);
    };
    let Some(template) = attrs.get("template") else {
        return Err(InheritanceError::ExtendsMissingTemplate { position: first_extends.pos });
    };
    Ok(Some((template.to_string(), first_extends.pos)))
}

fn is_extends(node: &Node) -> bool {
    matches!(&node.kind, NodeKind::Tag { name, .. } if name == tags::EXTENDS)
}

fn is_parent_call(node: &Node) -> bool {
    matches!(
        &node.kind,
        NodeKind::Tag { name, children, .. } if name == tags::PARENT && children.is_empty()
    )
}

/// Extract the child's named block overrides.
///
/// Block names are unique per template; a `prompty.parent` tag outside any
/// named block is rejected here.
fn extract_blocks(root: &Node) -> Result<IndexMap<String, Vec<Node>>, InheritanceError> {
    let mut blocks = IndexMap::new();
    if let NodeKind::Root { children } = &root.kind {
        walk_blocks(children, false, &mut blocks)?;
    }
    Ok(blocks)
}

fn walk_blocks(
    nodes: &[Node],
    in_block: bool,
    blocks: &mut IndexMap<String, Vec<Node>>,
) -> Result<(), InheritanceError> {
    for node in nodes {
        match &node.kind {
            NodeKind::Block { name, children, .. } => {
                if !in_block {
                    if blocks.contains_key(name) {
                        return Err(InheritanceError::BlockDuplicateName {
                            name: name.clone(),
                            position: node.pos,
                        });
                    }
                    blocks.insert(name.clone(), children.clone());
                }
                walk_blocks(children, true, blocks)?;
            }
            NodeKind::Tag { name, children, .. } => {
                if name == tags::PARENT && !in_block {
                    return Err(InheritanceError::ParentOutsideBlock { position: node.pos });
                }
                walk_blocks(children, in_block, blocks)?;
            }
            NodeKind::Root { children } | NodeKind::For { children, .. } => {
                walk_blocks(children, in_block, blocks)?;
            }
            NodeKind::Conditional { branches } => {
                for branch in branches {
                    walk_blocks(&branch.children, in_block, blocks)?;
                }
            }
            NodeKind::Switch { cases, .. } => {
                for case in cases {
                    walk_blocks(&case.children, in_block, blocks)?;
                }
            }
            NodeKind::Text { .. } => {}
        }
    }
    Ok(())
}

/// Substitute overridden blocks in the parent tree and drop extends tags
fn apply_overrides(nodes: &mut Vec<Node>, overrides: &IndexMap<String, Vec<Node>>) {
    nodes.retain(|node| !is_extends(node));
    for node in nodes.iter_mut() {
        let substituted = if let NodeKind::Block { name, children, .. } = &mut node.kind {
            match overrides.get(name.as_str()) {
                Some(replacement) => {
                    let original = std::mem::take(children);
                    let mut substituted_children = replacement.clone();
                    splice_parent(&mut substituted_children, &original);
                    *children = substituted_children;
                    true
                }
                None => false,
            }
        } else {
            false
        };
        if !substituted {
            for list in node.child_lists_mut() {
                apply_overrides(list, overrides);
            }
        }
    }
}

/// Replace every `prompty.parent` call-site with the parent block's
/// original children, recursively through nested bodies
fn splice_parent(nodes: &mut Vec<Node>, parent_children: &[Node]) {
    let mut i = 0;
    while i < nodes.len() {
        if is_parent_call(&nodes[i]) {
            let replacement: Vec<Node> = parent_children.to_vec();
            let count = replacement.len();
            nodes.splice(i..=i, replacement);
            i += count;
        } else {
            for list in nodes[i].child_lists_mut() {
                splice_parent(list, parent_children);
            }
            i += 1;
        }
    }
}
