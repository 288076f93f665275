//! Literal constant folding
//!
//! Runs once after parsing. Every literal-composed expression subtree is
//! evaluated against a scratch environment and its value memoized on the
//! node; later evaluation returns the memoized value without recomputing.
//! A subtree whose evaluation fails (an overflowing literal sum, say) is
//! simply left non-constant, so the failure surfaces at run time with the
//! normal blame machinery.

use crate::context::EvalContext;
use crate::environment::Environment;
use crate::value::Value;

use super::{Block, Expr, ExprKind, Node, NodeKind, RangeEnd, StrPart};

/// Fold literal subtrees in every expression reachable from `block`.
pub fn fold_constants(block: &mut Block, ctx: &EvalContext) {
    let mut env = Environment::new("constant folding", Value::empty_hash(), ctx);
    fold_block(block, &mut env, ctx);
}

fn fold_block(block: &mut Block, env: &mut Environment, ctx: &EvalContext) {
    for node in &mut block.nodes {
        fold_node(node, env, ctx);
    }
}

fn fold_node(node: &mut Node, env: &mut Environment, ctx: &EvalContext) {
    match &mut node.kind {
        NodeKind::Text(_) | NodeKind::Break | NodeKind::Continue | NodeKind::Trim(_) => {}
        NodeKind::Interpolation(expr) => fold_expr(expr, env, ctx),
        NodeKind::If(branches) => {
            for branch in branches {
                if let Some(cond) = &mut branch.cond {
                    fold_expr(cond, env, ctx);
                }
                fold_block(&mut branch.body, env, ctx);
            }
        }
        NodeKind::List(list) => {
            fold_expr(&mut list.seq, env, ctx);
            fold_block(&mut list.body, env, ctx);
            if let Some(else_body) = &mut list.else_body {
                fold_block(else_body, env, ctx);
            }
        }
        NodeKind::Items { body, .. } => fold_block(body, env, ctx),
        NodeKind::Sep(body) => fold_block(body, env, ctx),
        NodeKind::Switch {
            subject,
            cases,
            default,
        } => {
            fold_expr(subject, env, ctx);
            for case in cases {
                fold_expr(&mut case.matches, env, ctx);
                fold_block(&mut case.body, env, ctx);
            }
            if let Some(default) = default {
                fold_block(default, env, ctx);
            }
        }
        NodeKind::Assign { value, .. } => fold_expr(value, env, ctx),
        NodeKind::AssignBlock { body, .. } => fold_block(body, env, ctx),
        NodeKind::MacroDef { params, body, .. } => {
            for param in params {
                if let Some(default) = &mut param.default {
                    fold_expr(default, env, ctx);
                }
            }
            fold_block(body, env, ctx);
        }
        NodeKind::UserCall {
            target,
            positional,
            named,
            body,
            ..
        } => {
            fold_expr(target, env, ctx);
            for arg in positional {
                fold_expr(arg, env, ctx);
            }
            for (_, arg) in named {
                fold_expr(arg, env, ctx);
            }
            if let Some(body) = body {
                fold_block(body, env, ctx);
            }
        }
        NodeKind::Nested { args } => {
            for arg in args {
                fold_expr(arg, env, ctx);
            }
        }
        NodeKind::Return { value } => {
            if let Some(value) = value {
                fold_expr(value, env, ctx);
            }
        }
        NodeKind::Stop { message } => {
            if let Some(message) = message {
                fold_expr(message, env, ctx);
            }
        }
        NodeKind::Setting { value, .. } => fold_expr(value, env, ctx),
        NodeKind::Compress(body) => fold_block(body, env, ctx),
    }
}

fn fold_expr(expr: &mut Expr, env: &mut Environment, ctx: &EvalContext) {
    fold_children(expr, env, ctx);
    if expr.constant.is_none() && expr.is_literal() {
        if let Ok(value) = crate::eval::eval_expr(expr, env, ctx) {
            expr.constant = Some(value);
        }
    }
}

fn fold_children(expr: &mut Expr, env: &mut Environment, ctx: &EvalContext) {
    match &mut expr.kind {
        ExprKind::Bool(_) | ExprKind::Number(_) | ExprKind::Var(_) | ExprKind::Special(_) => {}
        ExprKind::StringLit(parts) => {
            for part in parts {
                if let StrPart::Interp(inner) = part {
                    fold_expr(inner, env, ctx);
                }
            }
        }
        ExprKind::Dot { target, .. } => fold_expr(target, env, ctx),
        ExprKind::Index { target, key } => {
            fold_expr(target, env, ctx);
            fold_expr(key, env, ctx);
        }
        ExprKind::Unary { operand, .. } => fold_expr(operand, env, ctx),
        ExprKind::Binary { left, right, .. } => {
            fold_expr(left, env, ctx);
            fold_expr(right, env, ctx);
        }
        ExprKind::Range { begin, end } => {
            fold_expr(begin, env, ctx);
            match end {
                RangeEnd::Inclusive(e) | RangeEnd::Exclusive(e) | RangeEnd::Length(e) => {
                    fold_expr(e, env, ctx)
                }
                RangeEnd::Unbounded => {}
            }
        }
        ExprKind::SeqLit(items) => {
            for item in items {
                fold_expr(item, env, ctx);
            }
        }
        ExprKind::HashLit(pairs) => {
            for (key, value) in pairs {
                fold_expr(key, env, ctx);
                fold_expr(value, env, ctx);
            }
        }
        ExprKind::Call {
            target,
            positional,
            named,
        } => {
            fold_expr(target, env, ctx);
            for arg in positional {
                fold_expr(arg, env, ctx);
            }
            for (_, arg) in named {
                fold_expr(arg, env, ctx);
            }
        }
        ExprKind::Builtin { target, args, .. } => {
            fold_expr(target, env, ctx);
            for arg in args {
                fold_expr(arg, env, ctx);
            }
        }
        ExprKind::Exists(target) => fold_expr(target, env, ctx),
        ExprKind::Default { target, fallback } => {
            fold_expr(target, env, ctx);
            if let Some(fallback) = fallback {
                fold_expr(fallback, env, ctx);
            }
        }
        ExprKind::Paren(inner) => fold_expr(inner, env, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinOp;

    #[test]
    fn test_folds_literal_arithmetic() {
        let ctx = EvalContext::default();
        let mut block = Block::new(vec![Node::interpolation(Expr::binary(
            BinOp::Add,
            Expr::int(1),
            Expr::int(2),
        ))]);
        fold_constants(&mut block, &ctx);
        match &block.nodes[0].kind {
            NodeKind::Interpolation(expr) => {
                assert_eq!(expr.constant, Some(Value::int(3)));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_variables_stay_non_constant() {
        let ctx = EvalContext::default();
        let mut block = Block::new(vec![Node::interpolation(Expr::binary(
            BinOp::Add,
            Expr::var("x"),
            Expr::int(2),
        ))]);
        fold_constants(&mut block, &ctx);
        match &block.nodes[0].kind {
            NodeKind::Interpolation(expr) => {
                assert!(expr.constant.is_none());
                // The literal child was still memoized.
                match &expr.kind {
                    ExprKind::Binary { right, .. } => {
                        assert_eq!(right.constant, Some(Value::int(2)));
                    }
                    other => panic!("unexpected kind: {other:?}"),
                }
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_failing_literal_stays_non_constant() {
        let ctx = EvalContext::default();
        let mut block = Block::new(vec![Node::interpolation(Expr::binary(
            BinOp::Add,
            Expr::int(i64::MAX),
            Expr::int(1),
        ))]);
        fold_constants(&mut block, &ctx);
        match &block.nodes[0].kind {
            NodeKind::Interpolation(expr) => assert!(expr.constant.is_none()),
            other => panic!("unexpected node: {other:?}"),
        }
    }
}
