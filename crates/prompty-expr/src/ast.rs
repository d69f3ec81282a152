//! Expression tree.

use prompty_value::Value;

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation
    Not,
}

/// Binary operators, lowest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `||`
    Or,
    /// `&&`
    And,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
}

/// A parsed expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value (string, number, bool, nil)
    Literal(Value),
    /// Identifier; dotted names resolve as one path into the context
    Identifier(String),
    /// Unary application
    Unary {
        /// The operator
        op: UnaryOp,
        /// Operand
        right: Box<Expr>,
    },
    /// Binary application
    Binary {
        /// The operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// Function call
    Call {
        /// Registered function name
        name: String,
        /// Argument expressions in call order
        args: Vec<Expr>,
    },
}
