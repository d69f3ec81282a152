//! Node types for the prompty template tree.

use prompty_position::Position;

use crate::attrs::Attributes;

/// A node in the template tree, pairing semantic content with the source
/// position it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The specific construct this node represents
    pub kind: NodeKind,
    /// Position of the construct's first byte
    pub pos: Position,
}

/// One branch of a conditional: the `if` head, an `elseif`, or the `else`.
#[derive(Debug, Clone, PartialEq)]
pub struct CondBranch {
    /// Condition expression source; empty for the `else` branch
    pub condition: String,
    /// Branch body
    pub children: Vec<Node>,
    /// True only for the trailing `else` branch
    pub is_else: bool,
    /// Position of the branch's opening tag
    pub pos: Position,
}

/// One case of a switch.
///
/// Non-default cases carry exactly one of `value` (string equality against
/// the stringified switch result) or `eval` (boolean expression).
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Match value for equality cases
    pub value: Option<String>,
    /// Boolean expression for eval cases
    pub eval: Option<String>,
    /// Case body
    pub children: Vec<Node>,
    /// True for the unique trailing default case
    pub is_default: bool,
    /// Position of the case's opening tag
    pub pos: Position,
}

/// Template tree node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Top-level sequence of nodes
    Root {
        /// Document-order children
        children: Vec<Node>,
    },
    /// Literal text run
    Text {
        /// The text content
        content: String,
    },
    /// A `{~name …~}` tag, self-closing or with children
    Tag {
        /// Tag name as written in the source
        name: String,
        /// Attribute map (unquoted, unescaped values)
        attrs: Attributes,
        /// Body nodes for block-form tags; empty when self-closing
        children: Vec<Node>,
        /// Whether the tag was written in `/~}` form
        self_close: bool,
        /// Verbatim body, populated only for `prompty.raw`
        raw_content: Option<String>,
        /// Byte-exact source from `{~` through the final `~}`
        raw_source: String,
    },
    /// A named `prompty.block` override slot
    Block {
        /// Block name, unique within one template file
        name: String,
        /// Default content of the slot
        children: Vec<Node>,
        /// Byte-exact source of the whole block
        raw_source: String,
    },
    /// A `prompty.if` / `elseif` / `else` chain
    Conditional {
        /// Branches in source order; a trailing else has an empty condition
        branches: Vec<CondBranch>,
    },
    /// A `prompty.for` loop
    For {
        /// Name bound to each element
        item_var: String,
        /// Optional name bound to the 0-based index
        index_var: Option<String>,
        /// Context path evaluated to the iteration source
        source_path: String,
        /// Iteration cap; 0 means unlimited
        limit: usize,
        /// Loop body
        children: Vec<Node>,
    },
    /// A `prompty.switch` with its cases
    Switch {
        /// Switch head expression source
        expression: String,
        /// Cases in source order; default (if any) is last
        cases: Vec<SwitchCase>,
    },
}

impl Node {
    /// Create a new node
    pub fn new(kind: NodeKind, pos: Position) -> Self {
        Node { kind, pos }
    }

    /// Create a text node
    pub fn text(content: impl Into<String>, pos: Position) -> Self {
        Node::new(NodeKind::Text { content: content.into() }, pos)
    }

    /// Whether this node is text consisting only of whitespace
    pub fn is_whitespace_text(&self) -> bool {
        match &self.kind {
            NodeKind::Text { content } => content.chars().all(char::is_whitespace),
            _ => false,
        }
    }

    /// Mutable access to every direct child list of this node.
    ///
    /// Conditional branches, loop bodies, and switch cases each contribute
    /// their own list. Used by the inheritance resolver to splice
    /// `prompty.parent` call-sites wherever they occur.
    pub fn child_lists_mut(&mut self) -> Vec<&mut Vec<Node>> {
        match &mut self.kind {
            NodeKind::Root { children }
            | NodeKind::Tag { children, .. }
            | NodeKind::Block { children, .. }
            | NodeKind::For { children, .. } => vec![children],
            NodeKind::Conditional { branches } => {
                branches.iter_mut().map(|b| &mut b.children).collect()
            }
            NodeKind::Switch { cases, .. } => {
                cases.iter_mut().map(|c| &mut c.children).collect()
            }
            NodeKind::Text { .. } => Vec::new(),
        }
    }

    /// Convert the tree to a compact s-expression, for tests and debugging
    pub fn to_sexp(&self) -> String {
        match &self.kind {
            NodeKind::Root { children } => {
                format!("(root{})", sexp_children(children))
            }
            NodeKind::Text { content } => format!("(text {content:?})"),
            NodeKind::Tag { name, attrs, children, self_close, .. } => {
                let attrs_part =
                    if attrs.is_empty() { String::new() } else { format!(" [{attrs}]") };
                if *self_close {
                    format!("(tag {name}{attrs_part})")
                } else {
                    format!("(tag {name}{attrs_part}{})", sexp_children(children))
                }
            }
            NodeKind::Block { name, children, .. } => {
                format!("(block {name}{})", sexp_children(children))
            }
            NodeKind::Conditional { branches } => {
                let mut out = String::from("(if");
                for branch in branches {
                    if branch.is_else {
                        out.push_str(&format!(" (else{})", sexp_children(&branch.children)));
                    } else {
                        out.push_str(&format!(
                            " (branch {:?}{})",
                            branch.condition,
                            sexp_children(&branch.children)
                        ));
                    }
                }
                out.push(')');
                out
            }
            NodeKind::For { item_var, index_var, source_path, limit, children } => {
                let index_part =
                    index_var.as_ref().map(|v| format!(" index={v}")).unwrap_or_default();
                let limit_part = if *limit > 0 { format!(" limit={limit}") } else { String::new() };
                format!(
                    "(for {item_var}{index_part} in {source_path}{limit_part}{})",
                    sexp_children(children)
                )
            }
            NodeKind::Switch { expression, cases } => {
                let mut out = format!("(switch {expression:?}");
                for case in cases {
                    if case.is_default {
                        out.push_str(&format!(" (default{})", sexp_children(&case.children)));
                    } else if let Some(value) = &case.value {
                        out.push_str(&format!(" (case {value:?}{})", sexp_children(&case.children)));
                    } else if let Some(eval) = &case.eval {
                        out.push_str(&format!(
                            " (case-eval {eval:?}{})",
                            sexp_children(&case.children)
                        ));
                    }
                }
                out.push(')');
                out
            }
        }
    }
}

fn sexp_children(children: &[Node]) -> String {
    let mut out = String::new();
    for child in children {
        out.push(' ');
        out.push_str(&child.to_sexp());
    }
    out
}
