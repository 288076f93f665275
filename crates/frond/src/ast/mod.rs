//! The template AST
//!
//! The tokenizer/parser front end is an external collaborator; it hands the
//! evaluator a tree built from these types. Expressions are immutable after
//! construction except for literal-value memoization, which the
//! [`fold_constants`] pass fills in exactly once. Directive nodes are built
//! incrementally by the parser and validated as a whole by
//! [`validate::validate_template`] before execution ever begins.

mod canonical;
mod dir;
mod fold;
mod params;
mod special;
pub(crate) mod validate;

pub use dir::{
    AssignScope, Block, IfBranch, ListDir, Node, NodeKind, SwitchCase, TrimKind,
};
pub use fold::fold_constants;
pub use params::ParamRole;
pub use special::SpecialVar;

use crate::value::{Number, Value};

/// A source region: begin/end line and column, all 1-based. The zero span
/// means "synthetic node, no source position".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// First line of the region
    pub begin_line: u32,
    /// First column of the region
    pub begin_col: u32,
    /// Last line of the region
    pub end_line: u32,
    /// Last column of the region
    pub end_col: u32,
}

impl Span {
    /// A span covering the given region.
    pub fn new(begin_line: u32, begin_col: u32, end_line: u32, end_col: u32) -> Self {
        Span {
            begin_line,
            begin_col,
            end_line,
            end_col,
        }
    }
}

/// One run of a string literal: either literal text or an embedded
/// `${...}` interpolation fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum StrPart {
    /// Literal text
    Text(String),
    /// Interpolated expression
    Interp(Expr),
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Boolean negation, `!x` / `not`
    Not,
    /// Numeric negation, `-x`
    Neg,
}

/// Binary operators. `Lt`..`Gte` also cover the textual aliases
/// `lt`/`lte`/`gt`/`gte`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `||`, short-circuiting
    Or,
    /// `&&`, short-circuiting
    And,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<` / `lt`
    Lt,
    /// `<=` / `lte`
    Lte,
    /// `>` / `gt`
    Gt,
    /// `>=` / `gte`
    Gte,
    /// `+` (number addition, or concatenation of strings, markup,
    /// sequences, and hashes)
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
}

/// The right end of a range expression.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeEnd {
    /// `a..b`
    Inclusive(Box<Expr>),
    /// `a..<b`
    Exclusive(Box<Expr>),
    /// `a..*n`
    Length(Box<Expr>),
    /// `a..`
    Unbounded,
}

/// Expression node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `true` / `false`
    Bool(bool),
    /// Numeric literal
    Number(Number),
    /// String literal, possibly with embedded interpolation fragments
    StringLit(Vec<StrPart>),
    /// Bare variable reference
    Var(String),
    /// `.name` special variable
    Special(SpecialVar),
    /// `target.key` member access
    Dot {
        /// The hash-capable operand
        target: Box<Expr>,
        /// The key
        key: String,
    },
    /// `target[key]` dynamic key or index access
    Index {
        /// The hash- or sequence-capable operand
        target: Box<Expr>,
        /// Key (string) or index (number) expression
        key: Box<Expr>,
    },
    /// Unary operation
    Unary {
        /// The operator
        op: UnaryOp,
        /// The operand
        operand: Box<Expr>,
    },
    /// Binary operation; operands evaluate left to right
    Binary {
        /// The operator
        op: BinOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// Range expression
    Range {
        /// Left end
        begin: Box<Expr>,
        /// Right end
        end: RangeEnd,
    },
    /// `[a, b, c]`
    SeqLit(Vec<Expr>),
    /// `{"k": v, ...}`
    HashLit(Vec<(Expr, Expr)>),
    /// Function call
    Call {
        /// The callable operand
        target: Box<Expr>,
        /// Positional arguments
        positional: Vec<Expr>,
        /// Named arguments
        named: Vec<(String, Expr)>,
    },
    /// `target?name(args)` builtin application
    Builtin {
        /// The operand
        target: Box<Expr>,
        /// Builtin name
        name: String,
        /// Builtin arguments
        args: Vec<Expr>,
    },
    /// `target??` existence test
    Exists(Box<Expr>),
    /// `target!fallback` (or bare `target!`) default operator
    Default {
        /// The possibly-missing operand
        target: Box<Expr>,
        /// The fallback; `None` is the bare form yielding
        /// [`Value::Nothing`]
        fallback: Option<Box<Expr>>,
    },
    /// `(expr)`: semantically significant for the existence operators
    Paren(Box<Expr>),
}

/// An expression node: kind, source span, and the memoized constant value
/// filled in by [`fold_constants`].
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// What this node is
    pub kind: ExprKind,
    /// Source position
    pub span: Span,
    /// Memoized value of a literal-composed subtree; set at most once,
    /// never recomputed
    pub constant: Option<Value>,
}

impl Expr {
    /// A node with the given kind and span.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            span,
            constant: None,
        }
    }

    /// A synthetic node with no source position.
    pub fn synthetic(kind: ExprKind) -> Self {
        Expr::new(kind, Span::default())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Construction conveniences (the parser-facing surface)
    // ═══════════════════════════════════════════════════════════════════

    /// Boolean literal.
    pub fn bool_lit(b: bool) -> Self {
        Expr::synthetic(ExprKind::Bool(b))
    }

    /// Integer literal.
    pub fn int(n: i64) -> Self {
        Expr::synthetic(ExprKind::Number(Number::Int(n)))
    }

    /// Float literal.
    pub fn float(f: f64) -> Self {
        Expr::synthetic(ExprKind::Number(Number::Float(f)))
    }

    /// Plain string literal without interpolation fragments.
    pub fn str(s: impl Into<String>) -> Self {
        Expr::synthetic(ExprKind::StringLit(vec![StrPart::Text(s.into())]))
    }

    /// String literal from explicit parts.
    pub fn str_parts(parts: Vec<StrPart>) -> Self {
        Expr::synthetic(ExprKind::StringLit(parts))
    }

    /// Bare variable reference.
    pub fn var(name: impl Into<String>) -> Self {
        Expr::synthetic(ExprKind::Var(name.into()))
    }

    /// Special variable reference.
    pub fn special(var: SpecialVar) -> Self {
        Expr::synthetic(ExprKind::Special(var))
    }

    /// Member access.
    pub fn dot(target: Expr, key: impl Into<String>) -> Self {
        Expr::synthetic(ExprKind::Dot {
            target: Box::new(target),
            key: key.into(),
        })
    }

    /// Dynamic key access.
    pub fn index(target: Expr, key: Expr) -> Self {
        Expr::synthetic(ExprKind::Index {
            target: Box::new(target),
            key: Box::new(key),
        })
    }

    /// Unary operation.
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::synthetic(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// Binary operation.
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::synthetic(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Range expression.
    pub fn range(begin: Expr, end: RangeEnd) -> Self {
        Expr::synthetic(ExprKind::Range {
            begin: Box::new(begin),
            end,
        })
    }

    /// Sequence literal.
    pub fn seq_lit(items: Vec<Expr>) -> Self {
        Expr::synthetic(ExprKind::SeqLit(items))
    }

    /// Hash literal.
    pub fn hash_lit(pairs: Vec<(Expr, Expr)>) -> Self {
        Expr::synthetic(ExprKind::HashLit(pairs))
    }

    /// Function call.
    pub fn call(target: Expr, positional: Vec<Expr>) -> Self {
        Expr::synthetic(ExprKind::Call {
            target: Box::new(target),
            positional,
            named: Vec::new(),
        })
    }

    /// Builtin application.
    pub fn builtin(target: Expr, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::synthetic(ExprKind::Builtin {
            target: Box::new(target),
            name: name.into(),
            args,
        })
    }

    /// Existence test (`??`).
    pub fn exists(target: Expr) -> Self {
        Expr::synthetic(ExprKind::Exists(Box::new(target)))
    }

    /// Default operator (`!`).
    pub fn default_to(target: Expr, fallback: Option<Expr>) -> Self {
        Expr::synthetic(ExprKind::Default {
            target: Box::new(target),
            fallback: fallback.map(Box::new),
        })
    }

    /// Parenthesized expression.
    pub fn paren(inner: Expr) -> Self {
        Expr::synthetic(ExprKind::Paren(Box::new(inner)))
    }

    /// Whether this subtree is composed purely of literals, and its value
    /// can therefore be pre-computed by [`fold_constants`].
    pub fn is_literal(&self) -> bool {
        if self.constant.is_some() {
            return true;
        }
        match &self.kind {
            ExprKind::Bool(_) | ExprKind::Number(_) => true,
            ExprKind::StringLit(parts) => {
                parts.iter().all(|p| matches!(p, StrPart::Text(_)))
            }
            ExprKind::Unary { operand, .. } => operand.is_literal(),
            ExprKind::Binary { left, right, .. } => left.is_literal() && right.is_literal(),
            ExprKind::Paren(inner) => inner.is_literal(),
            ExprKind::SeqLit(items) => items.iter().all(Expr::is_literal),
            ExprKind::HashLit(pairs) => {
                pairs.iter().all(|(k, v)| k.is_literal() && v.is_literal())
            }
            ExprKind::Range { begin, end } => {
                begin.is_literal()
                    && match end {
                        RangeEnd::Inclusive(e) | RangeEnd::Exclusive(e) | RangeEnd::Length(e) => {
                            e.is_literal()
                        }
                        RangeEnd::Unbounded => true,
                    }
            }
            _ => false,
        }
    }
}
