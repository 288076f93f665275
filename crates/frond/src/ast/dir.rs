//! Directive nodes
//!
//! One [`Node`] per directive occurrence or template-text run. Child
//! content hangs off the owning node as a [`Block`], so the nesting the
//! author wrote is the nesting the executor walks.

use crate::settings::SettingKey;
use crate::value::{MacroKind, MacroParam};

use super::{Expr, Span};

/// An ordered run of sibling nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    /// The nodes, in source order
    pub nodes: Vec<Node>,
}

impl Block {
    /// A block from the given nodes.
    pub fn new(nodes: Vec<Node>) -> Self {
        Block { nodes }
    }
}

/// Which scope an assignment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignScope {
    /// `#assign`: the current namespace
    Namespace,
    /// `#global`: the globals map
    Global,
    /// `#local`: the innermost macro frame
    Local,
}

impl AssignScope {
    /// The directive name, without `#`.
    pub fn directive_name(self) -> &'static str {
        match self {
            AssignScope::Namespace => "assign",
            AssignScope::Global => "global",
            AssignScope::Local => "local",
        }
    }
}

/// The whitespace-trimming instructions. All of them execute as no-ops;
/// their effect happens in the front end's whitespace handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimKind {
    /// `#t`: trim both sides
    Both,
    /// `#lt`: trim to the left
    Left,
    /// `#rt`: trim to the right
    Right,
    /// `#nt`: no trimming
    NoTrim,
}

/// One branch of an `#if` chain. `cond: None` is the `#else` branch.
#[derive(Debug, Clone, PartialEq)]
pub struct IfBranch {
    /// The branch condition; `None` for `#else`
    pub cond: Option<Expr>,
    /// The branch body
    pub body: Block,
}

/// One `#case` of a `#switch`.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// The value this case matches
    pub matches: Expr,
    /// The case body
    pub body: Block,
}

/// The `#list` directive.
#[derive(Debug, Clone, PartialEq)]
pub struct ListDir {
    /// The iterated expression
    pub seq: Expr,
    /// The item variable name; `None` for the two-part form that defers
    /// the variable to a nested `#items`
    pub item: Option<String>,
    /// The loop body
    pub body: Block,
    /// The `#else` body, executed when the source is empty
    pub else_body: Option<Block>,
}

/// Directive node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Literal template text, written verbatim
    Text(String),

    /// `${expr}`: evaluate, coerce to text, write to the output
    Interpolation(Expr),

    /// `#if`/`#elseif`/`#else` chain; at most one condition-less branch,
    /// and it is last
    If(Vec<IfBranch>),

    /// `#list`
    List(ListDir),

    /// `#items`: binds the item variable inside a two-part `#list`
    Items {
        /// The item variable name
        item: String,
        /// The per-item body
        body: Block,
    },

    /// `#sep`: body runs only when the current item has a successor
    Sep(Block),

    /// `#break`
    Break,

    /// `#continue`
    Continue,

    /// `#switch` with C-style fallthrough
    Switch {
        /// The subject, evaluated exactly once
        subject: Expr,
        /// The cases, in source order
        cases: Vec<SwitchCase>,
        /// The trailing `#default` body, if any
        default: Option<Block>,
    },

    /// `#assign`/`#global`/`#local` with an expression value
    Assign {
        /// Target scope
        scope: AssignScope,
        /// Variable name
        name: String,
        /// The assigned expression
        value: Expr,
    },

    /// The block form of assignment: the body's output is captured into
    /// the variable instead of being written
    AssignBlock {
        /// Target scope
        scope: AssignScope,
        /// Variable name
        name: String,
        /// The captured body
        body: Block,
    },

    /// `#macro` / `#function` definition
    MacroDef {
        /// Declared name
        name: String,
        /// Declared parameters, required before optional
        params: Vec<MacroParam>,
        /// Macro or function
        kind: MacroKind,
        /// The definition body
        body: Block,
    },

    /// `<@target .../>` user-directive call
    UserCall {
        /// The callee expression
        target: Expr,
        /// Positional arguments
        positional: Vec<Expr>,
        /// Named arguments
        named: Vec<(String, Expr)>,
        /// Loop-variable names bound by `#nested` arguments
        loop_vars: Vec<String>,
        /// The nested content block, if the call has one
        body: Option<Block>,
    },

    /// `#nested`: run the caller's nested content
    Nested {
        /// Values bound to the caller's loop variables
        args: Vec<Expr>,
    },

    /// `#return`, with a value only inside `#function`
    Return {
        /// The returned expression
        value: Option<Expr>,
    },

    /// `#stop`
    Stop {
        /// The message expression, if given
        message: Option<Expr>,
    },

    /// `#setting key=value`
    Setting {
        /// The runtime-changeable key
        key: SettingKey,
        /// The new value
        value: Expr,
    },

    /// `#compress`: body output is captured and whitespace-normalized
    Compress(Block),

    /// `#t`/`#lt`/`#rt`/`#nt`
    Trim(TrimKind),
}

/// A directive node: kind plus source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// What this node is
    pub kind: NodeKind,
    /// Source position
    pub span: Span,
}

impl Node {
    /// A node with the given kind and span.
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }

    /// A synthetic node with no source position.
    pub fn synthetic(kind: NodeKind) -> Self {
        Node::new(kind, Span::default())
    }

    /// Literal text.
    pub fn text(s: impl Into<String>) -> Self {
        Node::synthetic(NodeKind::Text(s.into()))
    }

    /// `${expr}`.
    pub fn interpolation(expr: Expr) -> Self {
        Node::synthetic(NodeKind::Interpolation(expr))
    }

    /// An `#if` chain.
    pub fn if_chain(branches: Vec<IfBranch>) -> Self {
        Node::synthetic(NodeKind::If(branches))
    }

    /// The one-branch `#if`.
    pub fn if_then(cond: Expr, body: Block) -> Self {
        Node::if_chain(vec![IfBranch {
            cond: Some(cond),
            body,
        }])
    }

    /// `#if` with an `#else`.
    pub fn if_then_else(cond: Expr, then_body: Block, else_body: Block) -> Self {
        Node::if_chain(vec![
            IfBranch {
                cond: Some(cond),
                body: then_body,
            },
            IfBranch {
                cond: None,
                body: else_body,
            },
        ])
    }

    /// A one-part `#list` binding `item`.
    pub fn list(seq: Expr, item: impl Into<String>, body: Block) -> Self {
        Node::synthetic(NodeKind::List(ListDir {
            seq,
            item: Some(item.into()),
            body,
            else_body: None,
        }))
    }

    /// Scoped assignment from an expression.
    pub fn assign(scope: AssignScope, name: impl Into<String>, value: Expr) -> Self {
        Node::synthetic(NodeKind::Assign {
            scope,
            name: name.into(),
            value,
        })
    }

    /// Capturing assignment from a body.
    pub fn assign_block(scope: AssignScope, name: impl Into<String>, body: Block) -> Self {
        Node::synthetic(NodeKind::AssignBlock {
            scope,
            name: name.into(),
            body,
        })
    }

    /// `#macro`/`#function` definition.
    pub fn macro_def(
        name: impl Into<String>,
        params: Vec<MacroParam>,
        kind: MacroKind,
        body: Block,
    ) -> Self {
        Node::synthetic(NodeKind::MacroDef {
            name: name.into(),
            params,
            kind,
            body,
        })
    }

    /// `<@target/>` without nested content.
    pub fn user_call(target: Expr, positional: Vec<Expr>, named: Vec<(String, Expr)>) -> Self {
        Node::synthetic(NodeKind::UserCall {
            target,
            positional,
            named,
            loop_vars: Vec::new(),
            body: None,
        })
    }
}
