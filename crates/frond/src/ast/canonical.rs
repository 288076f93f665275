//! Canonical source form
//!
//! Every expression and directive can print itself back as template
//! source. The printed text re-parses to an equivalent tree; grouping the
//! author wrote survives because `(...)` is its own node.

use super::{
    BinOp, Block, Expr, ExprKind, Node, NodeKind, RangeEnd, StrPart, TrimKind, UnaryOp,
};
use crate::value::{MacroKind, Number};

impl Expr {
    /// The expression as template source text.
    pub fn canonical_form(&self) -> String {
        let mut out = String::new();
        write_expr(&mut out, self);
        out
    }
}

impl Node {
    /// The directive as template source text, including its content.
    pub fn canonical_form(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, self);
        out
    }
}

impl Block {
    /// The block's nodes as template source text.
    pub fn canonical_form(&self) -> String {
        let mut out = String::new();
        write_block(&mut out, self);
        out
    }
}

fn op_text(op: BinOp) -> &'static str {
    match op {
        BinOp::Or => "||",
        BinOp::And => "&&",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::Lt => "<",
        BinOp::Lte => "<=",
        BinOp::Gt => ">",
        BinOp::Gte => ">=",
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
    }
}

fn write_number(out: &mut String, n: Number) {
    match n {
        Number::Int(i) => out.push_str(&i.to_string()),
        Number::Float(f) => out.push_str(&f.to_string()),
    }
}

fn write_args(out: &mut String, positional: &[Expr], named: &[(String, Expr)]) {
    out.push('(');
    let mut first = true;
    for arg in positional {
        if !first {
            out.push_str(", ");
        }
        first = false;
        write_expr(out, arg);
    }
    for (name, arg) in named {
        if !first {
            out.push_str(", ");
        }
        first = false;
        out.push_str(name);
        out.push('=');
        write_expr(out, arg);
    }
    out.push(')');
}

fn write_expr(out: &mut String, expr: &Expr) {
    match &expr.kind {
        ExprKind::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ExprKind::Number(n) => write_number(out, *n),
        ExprKind::StringLit(parts) => {
            out.push('"');
            for part in parts {
                match part {
                    StrPart::Text(text) => {
                        for ch in text.chars() {
                            match ch {
                                '"' => out.push_str("\\\""),
                                '\\' => out.push_str("\\\\"),
                                '\n' => out.push_str("\\n"),
                                '\r' => out.push_str("\\r"),
                                '\t' => out.push_str("\\t"),
                                '$' => out.push_str("\\$"),
                                other => out.push(other),
                            }
                        }
                    }
                    StrPart::Interp(inner) => {
                        out.push_str("${");
                        write_expr(out, inner);
                        out.push('}');
                    }
                }
            }
            out.push('"');
        }
        ExprKind::Var(name) => out.push_str(name),
        ExprKind::Special(var) => {
            out.push('.');
            out.push_str(var.name());
        }
        ExprKind::Dot { target, key } => {
            write_expr(out, target);
            out.push('.');
            out.push_str(key);
        }
        ExprKind::Index { target, key } => {
            write_expr(out, target);
            out.push('[');
            write_expr(out, key);
            out.push(']');
        }
        ExprKind::Unary { op, operand } => {
            out.push(match op {
                UnaryOp::Not => '!',
                UnaryOp::Neg => '-',
            });
            write_expr(out, operand);
        }
        ExprKind::Binary { op, left, right } => {
            write_expr(out, left);
            out.push(' ');
            out.push_str(op_text(*op));
            out.push(' ');
            write_expr(out, right);
        }
        ExprKind::Range { begin, end } => {
            write_expr(out, begin);
            match end {
                RangeEnd::Inclusive(e) => {
                    out.push_str("..");
                    write_expr(out, e);
                }
                RangeEnd::Exclusive(e) => {
                    out.push_str("..<");
                    write_expr(out, e);
                }
                RangeEnd::Length(e) => {
                    out.push_str("..*");
                    write_expr(out, e);
                }
                RangeEnd::Unbounded => out.push_str(".."),
            }
        }
        ExprKind::SeqLit(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, item);
            }
            out.push(']');
        }
        ExprKind::HashLit(pairs) => {
            out.push('{');
            for (i, (key, value)) in pairs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, key);
                out.push_str(": ");
                write_expr(out, value);
            }
            out.push('}');
        }
        ExprKind::Call {
            target,
            positional,
            named,
        } => {
            write_expr(out, target);
            write_args(out, positional, named);
        }
        ExprKind::Builtin { target, name, args } => {
            write_expr(out, target);
            out.push('?');
            out.push_str(name);
            if !args.is_empty() {
                write_args(out, args, &[]);
            }
        }
        ExprKind::Exists(target) => {
            write_expr(out, target);
            out.push_str("??");
        }
        ExprKind::Default { target, fallback } => {
            write_expr(out, target);
            out.push('!');
            if let Some(fb) = fallback {
                write_expr(out, fb);
            }
        }
        ExprKind::Paren(inner) => {
            out.push('(');
            write_expr(out, inner);
            out.push(')');
        }
    }
}

fn write_block(out: &mut String, block: &Block) {
    for node in &block.nodes {
        write_node(out, node);
    }
}

fn write_node(out: &mut String, node: &Node) {
    match &node.kind {
        NodeKind::Text(text) => out.push_str(text),
        NodeKind::Interpolation(expr) => {
            out.push_str("${");
            write_expr(out, expr);
            out.push('}');
        }
        NodeKind::If(branches) => {
            for (i, branch) in branches.iter().enumerate() {
                match (&branch.cond, i) {
                    (Some(cond), 0) => {
                        out.push_str("<#if ");
                        write_expr(out, cond);
                        out.push('>');
                    }
                    (Some(cond), _) => {
                        out.push_str("<#elseif ");
                        write_expr(out, cond);
                        out.push('>');
                    }
                    (None, _) => out.push_str("<#else>"),
                }
                write_block(out, &branch.body);
            }
            out.push_str("</#if>");
        }
        NodeKind::List(list) => {
            out.push_str("<#list ");
            write_expr(out, &list.seq);
            if let Some(item) = &list.item {
                out.push_str(" as ");
                out.push_str(item);
            }
            out.push('>');
            write_block(out, &list.body);
            if let Some(else_body) = &list.else_body {
                out.push_str("<#else>");
                write_block(out, else_body);
            }
            out.push_str("</#list>");
        }
        NodeKind::Items { item, body } => {
            out.push_str("<#items as ");
            out.push_str(item);
            out.push('>');
            write_block(out, body);
            out.push_str("</#items>");
        }
        NodeKind::Sep(body) => {
            out.push_str("<#sep>");
            write_block(out, body);
            out.push_str("</#sep>");
        }
        NodeKind::Break => out.push_str("<#break>"),
        NodeKind::Continue => out.push_str("<#continue>"),
        NodeKind::Switch {
            subject,
            cases,
            default,
        } => {
            out.push_str("<#switch ");
            write_expr(out, subject);
            out.push('>');
            for case in cases {
                out.push_str("<#case ");
                write_expr(out, &case.matches);
                out.push('>');
                write_block(out, &case.body);
            }
            if let Some(default) = default {
                out.push_str("<#default>");
                write_block(out, default);
            }
            out.push_str("</#switch>");
        }
        NodeKind::Assign { scope, name, value } => {
            out.push_str("<#");
            out.push_str(scope.directive_name());
            out.push(' ');
            out.push_str(name);
            out.push_str(" = ");
            write_expr(out, value);
            out.push('>');
        }
        NodeKind::AssignBlock { scope, name, body } => {
            out.push_str("<#");
            out.push_str(scope.directive_name());
            out.push(' ');
            out.push_str(name);
            out.push('>');
            write_block(out, body);
            out.push_str("</#");
            out.push_str(scope.directive_name());
            out.push('>');
        }
        NodeKind::MacroDef {
            name,
            params,
            kind,
            body,
        } => {
            let tag = match kind {
                MacroKind::Macro => "macro",
                MacroKind::Function => "function",
            };
            out.push_str("<#");
            out.push_str(tag);
            out.push(' ');
            out.push_str(name);
            for param in params {
                out.push(' ');
                out.push_str(&param.name);
                if let Some(default) = &param.default {
                    out.push('=');
                    write_expr(out, default);
                }
            }
            out.push('>');
            write_block(out, body);
            out.push_str("</#");
            out.push_str(tag);
            out.push('>');
        }
        NodeKind::UserCall {
            target,
            positional,
            named,
            loop_vars,
            body,
        } => {
            out.push_str("<@");
            write_expr(out, target);
            for arg in positional {
                out.push(' ');
                write_expr(out, arg);
            }
            for (name, arg) in named {
                out.push(' ');
                out.push_str(name);
                out.push('=');
                write_expr(out, arg);
            }
            if !loop_vars.is_empty() {
                out.push_str("; ");
                out.push_str(&loop_vars.join(", "));
            }
            match body {
                Some(body) => {
                    out.push('>');
                    write_block(out, body);
                    out.push_str("</@>");
                }
                None => out.push_str(" />"),
            }
        }
        NodeKind::Nested { args } => {
            if args.is_empty() {
                out.push_str("<#nested>");
            } else {
                out.push_str("<#nested ");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_expr(out, arg);
                }
                out.push('>');
            }
        }
        NodeKind::Return { value } => match value {
            Some(value) => {
                out.push_str("<#return ");
                write_expr(out, value);
                out.push('>');
            }
            None => out.push_str("<#return>"),
        },
        NodeKind::Stop { message } => match message {
            Some(message) => {
                out.push_str("<#stop ");
                write_expr(out, message);
                out.push('>');
            }
            None => out.push_str("<#stop>"),
        },
        NodeKind::Setting { key, value } => {
            out.push_str("<#setting ");
            out.push_str(key.name());
            out.push_str(" = ");
            write_expr(out, value);
            out.push('>');
        }
        NodeKind::Compress(body) => {
            out.push_str("<#compress>");
            write_block(out, body);
            out.push_str("</#compress>");
        }
        NodeKind::Trim(kind) => out.push_str(match kind {
            TrimKind::Both => "<#t>",
            TrimKind::Left => "<#lt>",
            TrimKind::Right => "<#rt>",
            TrimKind::NoTrim => "<#nt>",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SpecialVar;

    #[test]
    fn test_literal_canonical_forms() {
        assert_eq!(Expr::int(42).canonical_form(), "42");
        assert_eq!(Expr::bool_lit(true).canonical_form(), "true");
        assert_eq!(Expr::str("a \"b\"").canonical_form(), "\"a \\\"b\\\"\"");
        assert_eq!(
            Expr::seq_lit(vec![Expr::int(1), Expr::int(2)]).canonical_form(),
            "[1, 2]"
        );
        assert_eq!(
            Expr::hash_lit(vec![(Expr::str("k"), Expr::int(1))]).canonical_form(),
            "{\"k\": 1}"
        );
    }

    #[test]
    fn test_operator_canonical_forms() {
        let e = Expr::binary(
            BinOp::Add,
            Expr::var("a"),
            Expr::paren(Expr::binary(BinOp::Mul, Expr::var("b"), Expr::int(2))),
        );
        assert_eq!(e.canonical_form(), "a + (b * 2)");
        assert_eq!(
            Expr::exists(Expr::dot(Expr::var("user"), "name")).canonical_form(),
            "user.name??"
        );
        assert_eq!(
            Expr::default_to(Expr::var("x"), Some(Expr::int(0))).canonical_form(),
            "x!0"
        );
        assert_eq!(
            Expr::builtin(Expr::var("xs"), "join", vec![Expr::str(", ")]).canonical_form(),
            "xs?join(\", \")"
        );
        assert_eq!(
            Expr::special(SpecialVar::Now).canonical_form(),
            ".now"
        );
    }

    #[test]
    fn test_range_canonical_forms() {
        use crate::ast::RangeEnd;
        assert_eq!(
            Expr::range(Expr::int(1), RangeEnd::Inclusive(Box::new(Expr::int(5))))
                .canonical_form(),
            "1..5"
        );
        assert_eq!(
            Expr::range(Expr::int(1), RangeEnd::Exclusive(Box::new(Expr::int(5))))
                .canonical_form(),
            "1..<5"
        );
        assert_eq!(
            Expr::range(Expr::int(1), RangeEnd::Unbounded).canonical_form(),
            "1.."
        );
    }

    #[test]
    fn test_directive_canonical_form() {
        let node = Node::if_then_else(
            Expr::var("ok"),
            Block::new(vec![Node::text("yes")]),
            Block::new(vec![Node::text("no")]),
        );
        assert_eq!(
            node.canonical_form(),
            "<#if ok>yes<#else>no</#if>"
        );
    }
}
