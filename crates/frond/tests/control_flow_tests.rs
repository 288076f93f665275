//! Control flow, macro, and scoping tests

use pretty_assertions::assert_eq;

use frond::ast::{AssignScope, BinOp, Block, Expr, Node, NodeKind, RangeEnd};
use frond::value::{MacroKind, MacroParam};
use frond::*;

fn render(root: Block, data: Value) -> std::result::Result<String, EvalError> {
    let ctx = EvalContext::default();
    Template::new("test", root, &ctx).unwrap().process(data, &ctx)
}

fn interp(expr: Expr) -> Node {
    Node::interpolation(expr)
}

fn param(name: &str) -> MacroParam {
    MacroParam {
        name: name.to_string(),
        default: None,
    }
}

fn param_with_default(name: &str, default: Expr) -> MacroParam {
    MacroParam {
        name: name.to_string(),
        default: Some(default),
    }
}

fn one_to(n: i64) -> Expr {
    Expr::range(Expr::int(1), RangeEnd::Inclusive(Box::new(Expr::int(n))))
}

// ═══════════════════════════════════════════════════════════════════════
// #break and #continue
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_break_ends_the_loop() {
    let body = Block::new(vec![
        interp(Expr::var("i")),
        Node::if_then(
            Expr::binary(BinOp::Eq, Expr::var("i"), Expr::int(3)),
            Block::new(vec![Node::synthetic(NodeKind::Break)]),
        ),
    ]);
    let root = Block::new(vec![
        Node::list(one_to(5), "i", body),
        Node::text("|done"),
    ]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "123|done");
}

#[test]
fn test_continue_skips_the_rest_of_the_iteration() {
    let body = Block::new(vec![
        Node::if_then(
            Expr::binary(BinOp::Eq, Expr::var("i"), Expr::int(2)),
            Block::new(vec![Node::synthetic(NodeKind::Continue)]),
        ),
        interp(Expr::var("i")),
    ]);
    let root = Block::new(vec![Node::list(one_to(4), "i", body)]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "134");
}

#[test]
fn test_break_only_exits_the_innermost_loop() {
    let inner_body = Block::new(vec![
        interp(Expr::var("j")),
        Node::synthetic(NodeKind::Break),
    ]);
    let outer_body = Block::new(vec![
        interp(Expr::var("i")),
        Node::list(one_to(9), "j", inner_body),
        Node::text(" "),
    ]);
    let root = Block::new(vec![Node::list(one_to(2), "i", outer_body)]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "11 21 ");
}

// ═══════════════════════════════════════════════════════════════════════
// Macros
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_macro_call_with_positional_and_default() {
    let body = Block::new(vec![
        interp(Expr::var("who")),
        Node::text(":"),
        interp(Expr::var("greeting")),
    ]);
    let def = Node::macro_def(
        "greet",
        vec![
            param("who"),
            param_with_default("greeting", Expr::str("hi")),
        ],
        MacroKind::Macro,
        body,
    );
    let root = Block::new(vec![
        def,
        Node::user_call(Expr::var("greet"), vec![Expr::str("ana")], vec![]),
        Node::text(" "),
        Node::user_call(
            Expr::var("greet"),
            vec![],
            vec![
                ("who".to_string(), Expr::str("bo")),
                ("greeting".to_string(), Expr::str("yo")),
            ],
        ),
    ]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "ana:hi bo:yo");
}

#[test]
fn test_macro_may_be_called_before_its_definition() {
    let root = Block::new(vec![
        Node::user_call(Expr::var("m"), vec![], vec![]),
        Node::macro_def(
            "m",
            vec![],
            MacroKind::Macro,
            Block::new(vec![Node::text("early")]),
        ),
    ]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "early");
}

#[test]
fn test_missing_required_parameter() {
    let def = Node::macro_def(
        "m",
        vec![param("needed")],
        MacroKind::Macro,
        Block::new(vec![]),
    );
    let root = Block::new(vec![def, Node::user_call(Expr::var("m"), vec![], vec![])]);
    assert!(matches!(
        render(root, Value::empty_hash()),
        Err(EvalError::InvalidArguments { .. })
    ));
}

#[test]
fn test_unknown_named_parameter() {
    let def = Node::macro_def("m", vec![], MacroKind::Macro, Block::new(vec![]));
    let root = Block::new(vec![
        def,
        Node::user_call(
            Expr::var("m"),
            vec![],
            vec![("typo".to_string(), Expr::int(1))],
        ),
    ]);
    assert!(matches!(
        render(root, Value::empty_hash()),
        Err(EvalError::InvalidArguments { .. })
    ));
}

#[test]
fn test_macro_locals_do_not_leak() {
    let body = Block::new(vec![Node::assign(
        AssignScope::Local,
        "secret",
        Expr::int(1),
    )]);
    let def = Node::macro_def("m", vec![], MacroKind::Macro, body);
    let root = Block::new(vec![
        def,
        Node::user_call(Expr::var("m"), vec![], vec![]),
        interp(Expr::builtin(Expr::exists(Expr::var("secret")), "c", vec![])),
    ]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "false");
}

#[test]
fn test_macro_body_does_not_see_caller_loop_variables() {
    let def = Node::macro_def(
        "m",
        vec![],
        MacroKind::Macro,
        Block::new(vec![interp(Expr::builtin(
            Expr::exists(Expr::var("i")),
            "c",
            vec![],
        ))]),
    );
    let root = Block::new(vec![
        def,
        Node::list(
            one_to(1),
            "i",
            Block::new(vec![Node::user_call(Expr::var("m"), vec![], vec![])]),
        ),
    ]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "false");
}

#[test]
fn test_calling_a_macro_as_a_function_is_uncallable() {
    let def = Node::macro_def("m", vec![], MacroKind::Macro, Block::new(vec![]));
    let root = Block::new(vec![def, interp(Expr::call(Expr::var("m"), vec![]))]);
    assert!(matches!(
        render(root, Value::empty_hash()),
        Err(EvalError::Uncallable { .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// #nested
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_nested_runs_caller_content_with_loop_variables() {
    // <#macro twice><#nested 1/><#nested 2/></#macro>
    // <@twice; n>[${n}]</@twice>
    let def = Node::macro_def(
        "twice",
        vec![],
        MacroKind::Macro,
        Block::new(vec![
            Node::synthetic(NodeKind::Nested {
                args: vec![Expr::int(1)],
            }),
            Node::synthetic(NodeKind::Nested {
                args: vec![Expr::int(2)],
            }),
        ]),
    );
    let call = Node::synthetic(NodeKind::UserCall {
        target: Expr::var("twice"),
        positional: vec![],
        named: vec![],
        loop_vars: vec!["n".to_string()],
        body: Some(Block::new(vec![
            Node::text("["),
            interp(Expr::var("n")),
            Node::text("]"),
        ])),
    });
    let root = Block::new(vec![def, call]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "[1][2]");
}

#[test]
fn test_nested_content_sees_caller_scope_not_macro_locals() {
    let def = Node::macro_def(
        "wrap",
        vec![],
        MacroKind::Macro,
        Block::new(vec![
            Node::assign(AssignScope::Local, "inside", Expr::str("macro-only")),
            Node::synthetic(NodeKind::Nested { args: vec![] }),
        ]),
    );
    let call = Node::synthetic(NodeKind::UserCall {
        target: Expr::var("wrap"),
        positional: vec![],
        named: vec![],
        loop_vars: vec![],
        body: Some(Block::new(vec![interp(Expr::builtin(
            Expr::exists(Expr::var("inside")),
            "c",
            vec![],
        ))])),
    });
    let root = Block::new(vec![def, call]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "false");
}

#[test]
fn test_nested_without_body_is_a_no_op() {
    let def = Node::macro_def(
        "m",
        vec![],
        MacroKind::Macro,
        Block::new(vec![
            Node::text("a"),
            Node::synthetic(NodeKind::Nested { args: vec![] }),
            Node::text("b"),
        ]),
    );
    let root = Block::new(vec![def, Node::user_call(Expr::var("m"), vec![], vec![])]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "ab");
}

// ═══════════════════════════════════════════════════════════════════════
// #function and #return
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_function_returns_a_value_and_discards_output() {
    let body = Block::new(vec![
        Node::text("this output is discarded"),
        Node::synthetic(NodeKind::Return {
            value: Some(Expr::binary(BinOp::Add, Expr::var("a"), Expr::var("b"))),
        }),
    ]);
    let def = Node::macro_def("add", vec![param("a"), param("b")], MacroKind::Function, body);
    let root = Block::new(vec![
        def,
        interp(Expr::call(Expr::var("add"), vec![Expr::int(2), Expr::int(3)])),
    ]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "5");
}

#[test]
fn test_function_ending_without_return_is_an_error() {
    let def = Node::macro_def("f", vec![], MacroKind::Function, Block::new(vec![]));
    let root = Block::new(vec![def, interp(Expr::call(Expr::var("f"), vec![]))]);
    assert!(matches!(
        render(root, Value::empty_hash()),
        Err(EvalError::InvalidReference { .. })
    ));
}

#[test]
fn test_return_exits_a_macro_early() {
    let body = Block::new(vec![
        Node::text("kept"),
        Node::synthetic(NodeKind::Return { value: None }),
        Node::text("skipped"),
    ]);
    let def = Node::macro_def("m", vec![], MacroKind::Macro, body);
    let root = Block::new(vec![def, Node::user_call(Expr::var("m"), vec![], vec![])]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "kept");
}

#[test]
fn test_runaway_recursion_hits_the_depth_limit() {
    let body = Block::new(vec![Node::synthetic(NodeKind::Return {
        value: Some(Expr::call(Expr::var("rec"), vec![])),
    })]);
    let def = Node::macro_def("rec", vec![], MacroKind::Function, body);
    let root = Block::new(vec![def, interp(Expr::call(Expr::var("rec"), vec![]))]);
    assert!(matches!(
        render(root, Value::empty_hash()),
        Err(EvalError::CallDepthExceeded { .. })
    ));
}

#[test]
fn test_bounded_recursion_under_a_raised_limit() {
    // countdown(n) = n == 0 ? "" : n + countdown(n - 1)
    let recurse = Expr::binary(
        BinOp::Add,
        Expr::builtin(Expr::var("n"), "string", vec![]),
        Expr::call(
            Expr::var("countdown"),
            vec![Expr::binary(BinOp::Sub, Expr::var("n"), Expr::int(1))],
        ),
    );
    let body = Block::new(vec![
        Node::if_then(
            Expr::binary(BinOp::Eq, Expr::var("n"), Expr::int(0)),
            Block::new(vec![Node::synthetic(NodeKind::Return {
                value: Some(Expr::str("")),
            })]),
        ),
        Node::synthetic(NodeKind::Return {
            value: Some(recurse),
        }),
    ]);
    let def = Node::macro_def("countdown", vec![param("n")], MacroKind::Function, body);
    let root = Block::new(vec![
        def,
        interp(Expr::call(Expr::var("countdown"), vec![Expr::int(4)])),
    ]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "4321");
}

// ═══════════════════════════════════════════════════════════════════════
// Scope interplay
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_global_set_inside_macro_is_visible_outside() {
    let body = Block::new(vec![Node::assign(
        AssignScope::Global,
        "g",
        Expr::int(11),
    )]);
    let def = Node::macro_def("m", vec![], MacroKind::Macro, body);
    let root = Block::new(vec![
        def,
        Node::user_call(Expr::var("m"), vec![], vec![]),
        interp(Expr::var("g")),
    ]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "11");
}

#[test]
fn test_loop_variable_shadows_and_unshadows() {
    let root = Block::new(vec![
        Node::assign(AssignScope::Namespace, "x", Expr::str("outer")),
        Node::list(one_to(1), "x", Block::new(vec![interp(Expr::var("x"))])),
        interp(Expr::var("x")),
    ]);
    assert_eq!(render(root, Value::empty_hash()).unwrap(), "1outer");
}
