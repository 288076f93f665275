//! Static placement checks
//!
//! Runs once at template construction, before constant folding. Catches
//! what the grammar alone cannot: control-flow directives outside the
//! construct that gives them meaning, malformed branch chains, duplicate
//! macro parameters, and builtin names that do not exist.

use crate::error::{camel_to_snake, ParseError};
use crate::value::{MacroKind, MacroParam};

use super::{Block, Expr, ExprKind, Node, NodeKind, RangeEnd, StrPart};

/// What kind of definition body we are inside, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefKind {
    None,
    Macro,
    Function,
}

/// Placement flags for the position being validated.
#[derive(Debug, Clone, Copy)]
struct Placement {
    /// Inside a loop body (a `#list ... as x` body or an `#items` body)
    in_loop_body: bool,
    /// Directly inside a `#list` with no item variable, where `#items`
    /// is legal
    in_unbound_list: bool,
    /// Inside a `#case` or `#default` body
    in_case: bool,
    /// Inside a `#macro` or `#function` body
    def: DefKind,
}

impl Placement {
    fn top() -> Self {
        Placement {
            in_loop_body: false,
            in_unbound_list: false,
            in_case: false,
            def: DefKind::None,
        }
    }
}

/// Validate a whole template body.
pub(crate) fn validate_template(root: &Block) -> Result<(), ParseError> {
    validate_block(root, Placement::top())
}

fn validate_block(block: &Block, at: Placement) -> Result<(), ParseError> {
    for node in &block.nodes {
        validate_node(node, at)?;
    }
    Ok(())
}

fn validate_node(node: &Node, at: Placement) -> Result<(), ParseError> {
    match &node.kind {
        NodeKind::Text(_) | NodeKind::Trim(_) => Ok(()),

        NodeKind::Interpolation(expr) => validate_expr(expr),

        NodeKind::If(branches) => {
            for (i, branch) in branches.iter().enumerate() {
                if branch.cond.is_none() && i + 1 != branches.len() {
                    return Err(ParseError::MisplacedDirective {
                        directive: "else",
                        requirement: "once, as the last branch of an #if chain",
                    });
                }
                if let Some(cond) = &branch.cond {
                    validate_expr(cond)?;
                }
                validate_block(&branch.body, at)?;
            }
            Ok(())
        }

        NodeKind::List(list) => {
            validate_expr(&list.seq)?;
            let body_at = Placement {
                in_loop_body: list.item.is_some(),
                in_unbound_list: list.item.is_none(),
                in_case: false,
                ..at
            };
            validate_block(&list.body, body_at)?;
            if let Some(else_body) = &list.else_body {
                // The #else body runs with no current item; loop-only
                // directives are illegal there.
                validate_block(
                    else_body,
                    Placement {
                        in_loop_body: false,
                        in_unbound_list: false,
                        in_case: false,
                        ..at
                    },
                )?;
            }
            Ok(())
        }

        NodeKind::Items { body, .. } => {
            if !at.in_unbound_list {
                return Err(ParseError::MisplacedDirective {
                    directive: "items",
                    requirement: "inside a #list that has no item variable",
                });
            }
            validate_block(
                body,
                Placement {
                    in_loop_body: true,
                    in_unbound_list: false,
                    in_case: false,
                    ..at
                },
            )
        }

        NodeKind::Sep(body) => {
            if !at.in_loop_body {
                return Err(ParseError::MisplacedDirective {
                    directive: "sep",
                    requirement: "inside #list or #items bodies",
                });
            }
            validate_block(body, at)
        }

        NodeKind::Break => {
            if !at.in_loop_body && !at.in_case {
                return Err(ParseError::MisplacedDirective {
                    directive: "break",
                    requirement: "inside #list or #items bodies, or #case/#default blocks",
                });
            }
            Ok(())
        }

        NodeKind::Continue => {
            if !at.in_loop_body {
                return Err(ParseError::MisplacedDirective {
                    directive: "continue",
                    requirement: "inside #list or #items bodies",
                });
            }
            Ok(())
        }

        NodeKind::Switch {
            subject,
            cases,
            default,
        } => {
            validate_expr(subject)?;
            let case_at = Placement {
                in_case: true,
                ..at
            };
            for case in cases {
                validate_expr(&case.matches)?;
                validate_block(&case.body, case_at)?;
            }
            if let Some(default) = default {
                validate_block(default, case_at)?;
            }
            Ok(())
        }

        NodeKind::Assign { scope, value, .. } => {
            validate_expr(value)?;
            require_def_for_local(*scope, at)
        }

        NodeKind::AssignBlock { scope, body, .. } => {
            validate_block(body, at)?;
            require_def_for_local(*scope, at)
        }

        NodeKind::MacroDef {
            name,
            params,
            kind,
            body,
        } => {
            validate_params(name, params)?;
            for param in params {
                if let Some(default) = &param.default {
                    validate_expr(default)?;
                }
            }
            validate_block(
                body,
                Placement {
                    in_loop_body: false,
                    in_unbound_list: false,
                    in_case: false,
                    def: match kind {
                        MacroKind::Macro => DefKind::Macro,
                        MacroKind::Function => DefKind::Function,
                    },
                },
            )
        }

        NodeKind::UserCall {
            target,
            positional,
            named,
            body,
            ..
        } => {
            validate_expr(target)?;
            for arg in positional {
                validate_expr(arg)?;
            }
            for (_, arg) in named {
                validate_expr(arg)?;
            }
            // Nested content executes at the call site, in this placement.
            match body {
                Some(body) => validate_block(body, at),
                None => Ok(()),
            }
        }

        NodeKind::Nested { args } => {
            if at.def != DefKind::Macro {
                return Err(ParseError::MisplacedDirective {
                    directive: "nested",
                    requirement: "inside #macro bodies",
                });
            }
            for arg in args {
                validate_expr(arg)?;
            }
            Ok(())
        }

        NodeKind::Return { value } => match (at.def, value) {
            (DefKind::None, _) => Err(ParseError::MisplacedDirective {
                directive: "return",
                requirement: "inside #macro or #function bodies",
            }),
            (DefKind::Macro, Some(_)) => Err(ParseError::MisplacedDirective {
                directive: "return",
                requirement: "with a value only inside #function bodies",
            }),
            (_, Some(value)) => validate_expr(value),
            (_, None) => Ok(()),
        },

        NodeKind::Stop { message } => match message {
            Some(message) => validate_expr(message),
            None => Ok(()),
        },

        NodeKind::Setting { value, .. } => validate_expr(value),

        NodeKind::Compress(body) => validate_block(body, at),
    }
}

fn require_def_for_local(scope: super::AssignScope, at: Placement) -> Result<(), ParseError> {
    if scope == super::AssignScope::Local && at.def == DefKind::None {
        return Err(ParseError::MisplacedDirective {
            directive: "local",
            requirement: "inside #macro or #function bodies",
        });
    }
    Ok(())
}

fn validate_params(name: &str, params: &[MacroParam]) -> Result<(), ParseError> {
    let mut seen_optional = false;
    for (i, param) in params.iter().enumerate() {
        if params[..i].iter().any(|p| p.name == param.name) {
            return Err(ParseError::InvalidParameterList {
                callee: name.to_string(),
                message: format!("parameter \"{}\" is declared twice", param.name),
            });
        }
        match &param.default {
            Some(_) => seen_optional = true,
            None if seen_optional => {
                return Err(ParseError::InvalidParameterList {
                    callee: name.to_string(),
                    message: format!(
                        "required parameter \"{}\" follows an optional one",
                        param.name
                    ),
                });
            }
            None => {}
        }
    }
    Ok(())
}

fn validate_expr(expr: &Expr) -> Result<(), ParseError> {
    if let ExprKind::Builtin { name, .. } = &expr.kind {
        validate_builtin_name(name)?;
    }
    for_each_child(expr, &mut |child| validate_expr(child))
}

fn validate_builtin_name(name: &str) -> Result<(), ParseError> {
    let supported = crate::eval::builtins::NAMES;
    if supported.contains(&name) {
        return Ok(());
    }
    let suggestion = if name.chars().any(|c| c.is_ascii_uppercase()) {
        let snake = camel_to_snake(name);
        supported.contains(&snake.as_str()).then_some(snake)
    } else {
        None
    };
    Err(ParseError::UnknownBuiltin {
        name: name.to_string(),
        suggestion,
        supported,
    })
}

fn for_each_child(
    expr: &Expr,
    f: &mut impl FnMut(&Expr) -> Result<(), ParseError>,
) -> Result<(), ParseError> {
    match &expr.kind {
        ExprKind::Bool(_) | ExprKind::Number(_) | ExprKind::Var(_) | ExprKind::Special(_) => Ok(()),
        ExprKind::StringLit(parts) => {
            for part in parts {
                if let StrPart::Interp(inner) = part {
                    f(inner)?;
                }
            }
            Ok(())
        }
        ExprKind::Dot { target, .. } => f(target),
        ExprKind::Index { target, key } => {
            f(target)?;
            f(key)
        }
        ExprKind::Unary { operand, .. } => f(operand),
        ExprKind::Binary { left, right, .. } => {
            f(left)?;
            f(right)
        }
        ExprKind::Range { begin, end } => {
            f(begin)?;
            match end {
                RangeEnd::Inclusive(e) | RangeEnd::Exclusive(e) | RangeEnd::Length(e) => f(e),
                RangeEnd::Unbounded => Ok(()),
            }
        }
        ExprKind::SeqLit(items) => items.iter().try_for_each(f),
        ExprKind::HashLit(pairs) => {
            for (key, value) in pairs {
                f(key)?;
                f(value)?;
            }
            Ok(())
        }
        ExprKind::Call {
            target,
            positional,
            named,
        } => {
            f(target)?;
            positional.iter().try_for_each(&mut *f)?;
            named.iter().map(|(_, a)| a).try_for_each(f)
        }
        ExprKind::Builtin { target, args, .. } => {
            f(target)?;
            args.iter().try_for_each(f)
        }
        ExprKind::Exists(target) => f(target),
        ExprKind::Default { target, fallback } => {
            f(target)?;
            match fallback {
                Some(fallback) => f(fallback),
                None => Ok(()),
            }
        }
        ExprKind::Paren(inner) => f(inner),
    }
}
