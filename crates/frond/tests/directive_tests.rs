//! Directive execution tests

use std::sync::Arc;

use pretty_assertions::assert_eq;

use frond::ast::{
    AssignScope, BinOp, Block, Expr, IfBranch, ListDir, Node, NodeKind, SwitchCase,
};
use frond::settings::SettingKey;
use frond::*;

fn render(root: Block, data: Value) -> std::result::Result<String, EvalError> {
    render_with(root, data, &EvalContext::default())
}

fn render_with(
    root: Block,
    data: Value,
    ctx: &EvalContext,
) -> std::result::Result<String, EvalError> {
    Template::new("test", root, ctx).unwrap().process(data, ctx)
}

fn interp(expr: Expr) -> Node {
    Node::interpolation(expr)
}

// ═══════════════════════════════════════════════════════════════════════
// Text and interpolation
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_text_and_interpolation() {
    let root = Block::new(vec![
        Node::text("Hello "),
        interp(Expr::var("name")),
        Node::text("!"),
    ]);
    let data = Value::hash(vec![("name".to_string(), Value::str("World"))]);
    assert_eq!(render(root, data).unwrap(), "Hello World!");
}

#[test]
fn test_number_interpolation() {
    let root = Block::new(vec![interp(Expr::binary(
        BinOp::Mul,
        Expr::int(6),
        Expr::int(7),
    ))]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "42");
}

#[test]
fn test_boolean_interpolation_needs_boolean_format() {
    let root = Block::new(vec![interp(Expr::bool_lit(true))]);
    assert!(matches!(
        render(root, Value::empty_hash()),
        Err(EvalError::Format { .. })
    ));
}

#[test]
fn test_missing_variable_interpolation_errors() {
    let root = Block::new(vec![interp(Expr::var("ghost"))]);
    assert!(matches!(
        render(root, Value::empty_hash()),
        Err(EvalError::InvalidReference { .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Auto-escaping
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_html_output_escapes_interpolations_but_not_text() {
    let ctx = EvalContext::new().with_output_format(Arc::new(HtmlFormat));
    let root = Block::new(vec![Node::text("<p>"), interp(Expr::var("x")), Node::text("</p>")]);
    let data = Value::hash(vec![("x".to_string(), Value::str("a < b"))]);
    assert_eq!(
        render_with(root, data, &ctx).unwrap(),
        "<p>a &lt; b</p>"
    );
}

#[test]
fn test_markup_value_is_written_raw() {
    let format: Arc<dyn OutputFormat> = Arc::new(HtmlFormat);
    let ctx = EvalContext::new().with_output_format(Arc::clone(&format));
    let root = Block::new(vec![interp(Expr::var("x"))]);
    let data = Value::hash(vec![(
        "x".to_string(),
        Value::Markup(Markup::from_markup(format, "<b>bold</b>")),
    )]);
    assert_eq!(render_with(root, data, &ctx).unwrap(), "<b>bold</b>");
}

#[test]
fn test_captured_output_is_not_escaped_twice() {
    let ctx = EvalContext::new().with_output_format(Arc::new(HtmlFormat));
    let capture = Node::assign_block(
        AssignScope::Namespace,
        "snippet",
        Block::new(vec![Node::text("<i>"), interp(Expr::var("x")), Node::text("</i>")]),
    );
    let root = Block::new(vec![capture, interp(Expr::var("snippet"))]);
    let data = Value::hash(vec![("x".to_string(), Value::str("1 < 2"))]);
    assert_eq!(
        render_with(root, data, &ctx).unwrap(),
        "<i>1 &lt; 2</i>"
    );
}

// ═══════════════════════════════════════════════════════════════════════
// #if
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_if_chain_takes_first_true_branch() {
    let root = Block::new(vec![Node::if_chain(vec![
        IfBranch {
            cond: Some(Expr::binary(BinOp::Gt, Expr::var("n"), Expr::int(10))),
            body: Block::new(vec![Node::text("big")]),
        },
        IfBranch {
            cond: Some(Expr::binary(BinOp::Gt, Expr::var("n"), Expr::int(5))),
            body: Block::new(vec![Node::text("medium")]),
        },
        IfBranch {
            cond: None,
            body: Block::new(vec![Node::text("small")]),
        },
    ])]);
    let data = |n: i64| Value::hash(vec![("n".to_string(), Value::int(n))]);
    assert_eq!(render(root.clone(), data(20)).unwrap(), "big");
    assert_eq!(render(root.clone(), data(7)).unwrap(), "medium");
    assert_eq!(render(root, data(1)).unwrap(), "small");
}

#[test]
fn test_if_condition_must_be_boolean() {
    let root = Block::new(vec![Node::if_then(
        Expr::str("truthy"),
        Block::new(vec![Node::text("x")]),
    )]);
    assert!(matches!(
        render(root, Value::empty_hash()),
        Err(EvalError::TypeMismatch { .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// #list, #sep, #items
// ═══════════════════════════════════════════════════════════════════════

fn abc() -> Value {
    Value::hash(vec![(
        "xs".to_string(),
        Value::seq(vec![Value::str("a"), Value::str("b"), Value::str("c")]),
    )])
}

#[test]
fn test_list_with_sep() {
    let body = Block::new(vec![
        interp(Expr::var("x")),
        Node::synthetic(NodeKind::Sep(Block::new(vec![Node::text(", ")]))),
    ]);
    let root = Block::new(vec![Node::list(Expr::var("xs"), "x", body)]);
    assert_eq!(render(root, abc()).unwrap(), "a, b, c");
}

#[test]
fn test_empty_list_runs_else_body() {
    let root = Block::new(vec![Node::synthetic(NodeKind::List(ListDir {
        seq: Expr::var("xs"),
        item: Some("x".to_string()),
        body: Block::new(vec![interp(Expr::var("x"))]),
        else_body: Some(Block::new(vec![Node::text("none")])),
    }))]);
    let data = Value::hash(vec![("xs".to_string(), Value::seq(vec![]))]);
    assert_eq!(render(root, data).unwrap(), "none");
}

#[test]
fn test_two_part_list_with_items() {
    let items = Node::synthetic(NodeKind::Items {
        item: "x".to_string(),
        body: Block::new(vec![
            interp(Expr::var("x")),
            Node::synthetic(NodeKind::Sep(Block::new(vec![Node::text("-")]))),
        ]),
    });
    let root = Block::new(vec![Node::synthetic(NodeKind::List(ListDir {
        seq: Expr::var("xs"),
        item: None,
        body: Block::new(vec![Node::text("["), items, Node::text("]")]),
        else_body: Some(Block::new(vec![Node::text("none")])),
    }))]);
    assert_eq!(render(root.clone(), abc()).unwrap(), "[a-b-c]");

    let empty = Value::hash(vec![("xs".to_string(), Value::seq(vec![]))]);
    assert_eq!(render(root, empty).unwrap(), "none");
}

#[test]
fn test_two_part_list_walks_a_one_shot_collection_once() {
    /// Hands out its items exactly once; later traversals see nothing.
    #[derive(Debug)]
    struct OneShot(std::sync::Mutex<Vec<Value>>);

    impl CollectionValue for OneShot {
        fn iter_values(&self) -> Box<dyn Iterator<Item = Value> + '_> {
            let items = match self.0.lock() {
                Ok(mut guard) => std::mem::take(&mut *guard),
                Err(_) => Vec::new(),
            };
            Box::new(items.into_iter())
        }
    }

    let items = Node::synthetic(NodeKind::Items {
        item: "x".to_string(),
        body: Block::new(vec![
            interp(Expr::var("x")),
            Node::synthetic(NodeKind::Sep(Block::new(vec![Node::text("-")]))),
        ]),
    });
    let root = Block::new(vec![Node::synthetic(NodeKind::List(ListDir {
        seq: Expr::var("xs"),
        item: None,
        body: Block::new(vec![items]),
        else_body: Some(Block::new(vec![Node::text("none")])),
    }))]);
    let source = OneShot(std::sync::Mutex::new(vec![
        Value::str("a"),
        Value::str("b"),
        Value::str("c"),
    ]));
    let data = Value::hash(vec![("xs".to_string(), Value::Collection(Arc::new(source)))]);
    // The emptiness check and #items must share one traversal, or the
    // check would swallow the items.
    assert_eq!(render(root, data).unwrap(), "a-b-c");
}

#[test]
fn test_loop_builtins_inside_list() {
    let body = Block::new(vec![
        interp(Expr::builtin(Expr::var("x"), "counter", vec![])),
        Node::if_then(
            Expr::builtin(Expr::var("x"), "is_last", vec![]),
            Block::new(vec![Node::text("!")]),
        ),
    ]);
    let root = Block::new(vec![Node::list(Expr::var("xs"), "x", body)]);
    assert_eq!(render(root, abc()).unwrap(), "123!");
}

#[test]
fn test_list_over_non_iterable_is_a_type_error() {
    let root = Block::new(vec![Node::list(
        Expr::int(42),
        "x",
        Block::new(vec![interp(Expr::var("x"))]),
    )]);
    assert!(matches!(
        render(root, Value::empty_hash()),
        Err(EvalError::TypeMismatch { .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// #switch
// ═══════════════════════════════════════════════════════════════════════

fn switch_template(with_breaks: bool) -> Block {
    let case = |n: i64, text: &str| SwitchCase {
        matches: Expr::int(n),
        body: if with_breaks {
            Block::new(vec![Node::text(text), Node::synthetic(NodeKind::Break)])
        } else {
            Block::new(vec![Node::text(text)])
        },
    };
    Block::new(vec![Node::synthetic(NodeKind::Switch {
        subject: Expr::var("n"),
        cases: vec![case(1, "one"), case(2, "two")],
        default: Some(Block::new(vec![Node::text("many")])),
    })])
}

fn n(value: i64) -> Value {
    Value::hash(vec![("n".to_string(), Value::int(value))])
}

#[test]
fn test_switch_with_breaks_runs_one_case() {
    assert_eq!(render(switch_template(true), n(1)).unwrap(), "one");
    assert_eq!(render(switch_template(true), n(2)).unwrap(), "two");
}

#[test]
fn test_switch_without_breaks_falls_through() {
    assert_eq!(render(switch_template(false), n(1)).unwrap(), "onetwomany");
}

#[test]
fn test_switch_no_match_runs_default_only() {
    assert_eq!(render(switch_template(true), n(9)).unwrap(), "many");
}

#[test]
fn test_switch_no_match_no_default_is_silent() {
    let root = Block::new(vec![Node::synthetic(NodeKind::Switch {
        subject: Expr::var("n"),
        cases: vec![SwitchCase {
            matches: Expr::int(1),
            body: Block::new(vec![Node::text("one")]),
        }],
        default: None,
    })]);
    assert_eq!(render(root, n(9)).unwrap(), "");
}

// ═══════════════════════════════════════════════════════════════════════
// Assignment
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_assign_then_read_back() {
    let root = Block::new(vec![
        Node::assign(AssignScope::Namespace, "x", Expr::int(5)),
        interp(Expr::binary(BinOp::Add, Expr::var("x"), Expr::int(1))),
    ]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "6");
}

#[test]
fn test_namespace_shadows_data_model() {
    let root = Block::new(vec![
        interp(Expr::var("x")),
        Node::assign(AssignScope::Namespace, "x", Expr::str("new")),
        interp(Expr::var("x")),
    ]);
    let data = Value::hash(vec![("x".to_string(), Value::str("old"))]);
    assert_eq!(render(root, data).unwrap(), "oldnew");
}

#[test]
fn test_capturing_assignment_diverts_loop_output() {
    let list_body = Block::new(vec![
        interp(Expr::var("x")),
        Node::synthetic(NodeKind::Sep(Block::new(vec![Node::text(",")]))),
    ]);
    let capture = Node::assign_block(
        AssignScope::Namespace,
        "captured",
        Block::new(vec![Node::list(Expr::var("xs"), "x", list_body)]),
    );
    let root = Block::new(vec![
        Node::text("before|"),
        capture,
        interp(Expr::var("captured")),
    ]);
    assert_eq!(render(root, abc()).unwrap(), "before|a,b,c");
}

#[test]
fn test_capture_is_restored_when_the_body_errors() {
    // The failing capture must not leak "leaked" into the final output,
    // and the error must surface.
    let capture = Node::assign_block(
        AssignScope::Namespace,
        "captured",
        Block::new(vec![Node::text("leaked"), interp(Expr::var("ghost"))]),
    );
    let root = Block::new(vec![Node::text("kept|"), capture]);
    assert!(matches!(
        render(root, Value::empty_hash()),
        Err(EvalError::InvalidReference { .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// #compress
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_compress_normalizes_body_output() {
    let body = Block::new(vec![
        Node::text("  first   "),
        interp(Expr::var("x")),
        Node::text("  \n\n  last  "),
    ]);
    let root = Block::new(vec![Node::synthetic(NodeKind::Compress(body))]);
    let data = Value::hash(vec![("x".to_string(), Value::str("mid"))]);
    assert_eq!(render(root, data).unwrap(), "first mid\nlast");
}

// ═══════════════════════════════════════════════════════════════════════
// #setting
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_boolean_format_setting_applies_from_there_on() {
    let root = Block::new(vec![
        Node::synthetic(NodeKind::Setting {
            key: SettingKey::BooleanFormat,
            value: Expr::str("yes,no"),
        }),
        interp(Expr::bool_lit(true)),
        Node::text("/"),
        interp(Expr::bool_lit(false)),
    ]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "yes/no");
}

#[test]
fn test_setting_does_not_outlive_the_invocation() {
    let ctx = EvalContext::default();
    let set_then_print = Block::new(vec![
        Node::synthetic(NodeKind::Setting {
            key: SettingKey::BooleanFormat,
            value: Expr::str("yes,no"),
        }),
        interp(Expr::bool_lit(true)),
    ]);
    let template = Template::new("t", set_then_print, &ctx).unwrap();
    assert_eq!(template.process(Value::empty_hash(), &ctx).unwrap(), "yes");

    // A fresh invocation starts from the context settings again.
    let print_only =
        Template::new("t2", Block::new(vec![interp(Expr::bool_lit(true))]), &ctx).unwrap();
    assert!(matches!(
        print_only.process(Value::empty_hash(), &ctx),
        Err(EvalError::Format { .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// #stop and interrupts
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_stop_with_message() {
    let root = Block::new(vec![
        Node::text("before"),
        Node::synthetic(NodeKind::Stop {
            message: Some(Expr::str("gave up")),
        }),
        Node::text("after"),
    ]);
    match render(root, Value::empty_hash()) {
        Err(EvalError::Stop { message, .. }) => assert_eq!(message, "gave up"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_interrupt_aborts_a_running_loop() {
    use frond::ast::RangeEnd;

    let ctx = EvalContext::default();
    ctx.request_interrupt();
    let root = Block::new(vec![Node::list(
        Expr::range(Expr::int(0), RangeEnd::Unbounded),
        "i",
        Block::new(vec![interp(Expr::var("i"))]),
    )]);
    let template = Template::new("t", root, &ctx).unwrap();
    assert!(matches!(
        template.process(Value::empty_hash(), &ctx),
        Err(EvalError::Interrupted)
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Structural validation at construction
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_break_outside_loop_is_rejected_at_construction() {
    let root = Block::new(vec![Node::synthetic(NodeKind::Break)]);
    assert!(matches!(
        Template::new("t", root, &EvalContext::default()),
        Err(ParseError::MisplacedDirective { .. })
    ));
}

#[test]
fn test_unknown_builtin_is_rejected_with_suggestion() {
    let root = Block::new(vec![interp(Expr::builtin(
        Expr::str("x"),
        "upperCase",
        vec![],
    ))]);
    match Template::new("t", root, &EvalContext::default()) {
        Err(ParseError::UnknownBuiltin { suggestion, .. }) => {
            assert_eq!(suggestion.as_deref(), Some("upper_case"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
