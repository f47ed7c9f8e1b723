use flatline_core::analyzers::link_enclosing_loops;
use flatline_core::ast::{Expr, Function, Program, Stmt};
use flatline_core::ir::op::IROp;
use flatline_core::ir::{lower_function, lower_program, IrFunction, LowerOptions, LoweringContext};

/// Link breaks, declare the function and lower it on its own.
fn lower(name: &str, params: &[&str], mut body: Stmt) -> IrFunction {
    assert!(link_enclosing_loops(&mut body).is_empty(), "unexpected orphan break");
    let func = Function::new(name, params, body);
    let ctx = LoweringContext::from_program(&Program::new(vec![func.clone()]), LowerOptions::default());
    lower_function(&func, &ctx).expect("lowering failed")
}

fn listing(func: &IrFunction) -> Vec<String> {
    func.get_ops().iter().map(|op| op.to_string()).collect()
}

#[test]
fn while_with_immediate_break() {
    // while (x) { break; }
    let body = Stmt::while_loop(Expr::ident("x"), Stmt::block(vec![Stmt::brk()]));
    let func = lower("f", &["x"], body);

    assert_eq!(
        listing(&func),
        vec!["L0:", "LLocal r0 <- local[0]", "BrFalse r0 -> L1", "Jump L1", "Jump L0", "L1:", "RetVoid"],
        "ops:\n{}",
        func
    );
}

#[test]
fn if_else_with_returns_in_both_branches() {
    // if (x) { return; } else { return 1; }
    let body = Stmt::if_else(
        Expr::ident("x"),
        Stmt::block(vec![Stmt::ret(None)]),
        Stmt::block(vec![Stmt::ret(Some(Expr::int(1)))]),
    );
    let func = lower("f", &["x"], body);

    assert_eq!(
        listing(&func),
        vec![
            "LLocal r0 <- local[0]",
            "BrFalse r0 -> L0",
            "RetVoid",
            "Jump L1",
            "L0:",
            "LConst r1 <- 1",
            "Ret r1",
            "L1:",
            "RetVoid",
        ],
        "ops:\n{}",
        func
    );
}

#[test]
fn break_inside_if_targets_the_loop_exit() {
    // while (x) { if (y) { break; } }
    let body = Stmt::while_loop(
        Expr::ident("x"),
        Stmt::block(vec![Stmt::if_then(Expr::ident("y"), Stmt::block(vec![Stmt::brk()]))]),
    );
    let func = lower("f", &["x", "y"], body);

    assert_eq!(
        listing(&func),
        vec![
            "L0:",
            "LLocal r0 <- local[0]",
            "BrFalse r0 -> L1",
            "LLocal r1 <- local[1]",
            "BrFalse r1 -> L2",
            "Jump L1",
            "L2:",
            "Jump L0",
            "L1:",
            "RetVoid",
        ],
        "ops:\n{}",
        func
    );
}

#[test]
fn if_without_else_places_join_after_then_branch() {
    let body = Stmt::block(vec![
        Stmt::if_then(Expr::ident("c"), Stmt::expr(Expr::assign("c", Expr::int(2)))),
        Stmt::ret(Some(Expr::ident("c"))),
    ]);
    let func = lower("f", &["c"], body);
    let ops = func.get_ops();

    let IROp::BrFalse { target: join, .. } = ops[1] else {
        panic!("expected BrFalse at op 1, ops:\n{}", func);
    };
    // then-branch: LConst, SLocal; join label comes straight after.
    assert_eq!(func.position_of(join), Some(4));
    assert_eq!(ops[4], IROp::Label { label: join });
    assert!(!ops.iter().any(|op| matches!(op, IROp::Jump { .. })), "no jump without else:\n{}", func);
    // explicit return last, so no implicit one
    assert!(matches!(ops.last(), Some(IROp::Ret { .. })));
}

#[test]
fn if_else_branches_use_distinct_labels() {
    let body = Stmt::if_else(
        Expr::ident("c"),
        Stmt::expr(Expr::int(1)),
        Stmt::expr(Expr::int(2)),
    );
    let func = lower("f", &["c"], body);

    let placed: Vec<_> = func
        .get_ops()
        .iter()
        .filter_map(|op| match op {
            IROp::Label { label } => Some(*label),
            _ => None,
        })
        .collect();
    assert_eq!(placed.len(), 2);
    assert_ne!(placed[0], placed[1]);
    assert_eq!(func.label_count(), 2);
}

#[test]
fn nested_break_targets_innermost_loop() {
    // while (a) { while (b) { break; } a = 0; }
    let inner = Stmt::while_loop(Expr::ident("b"), Stmt::block(vec![Stmt::brk()]));
    let body = Stmt::while_loop(
        Expr::ident("a"),
        Stmt::block(vec![inner, Stmt::expr(Expr::assign("a", Expr::int(0)))]),
    );
    let func = lower("f", &["a", "b"], body);
    let ops = func.get_ops();

    // outer: L0 start, L1 end; inner: L2 start, L3 end
    let listing = listing(&func);
    assert_eq!(listing[6], "Jump L3", "ops:\n{}", func);
    assert_eq!(listing[8], "L3:", "ops:\n{}", func);

    let break_target = ops[6].jump_target().expect("break jump");
    let after_inner = func.position_of(break_target).expect("placed");
    // the op after the inner loop's exit is the assignment, still inside the outer loop
    assert!(matches!(ops[after_inner + 1], IROp::LConst { .. }));
    assert!(after_inner < ops.len() - 3);
}

#[test]
fn lowering_twice_gives_identical_sequences() {
    let mut body = Stmt::block(vec![
        Stmt::while_loop(
            Expr::ident("n"),
            Stmt::block(vec![
                Stmt::if_else(Expr::ident("n"), Stmt::brk(), Stmt::expr(Expr::assign("n", Expr::int(0)))),
            ]),
        ),
        Stmt::ret(Some(Expr::ident("n"))),
    ]);
    assert!(link_enclosing_loops(&mut body).is_empty());
    let program = Program::new(vec![Function::new("f", &["n"], body)]);

    let first = lower_program(&program, LowerOptions::default());
    let second = lower_program(&program, LowerOptions::default());
    assert!(first.is_ok() && second.is_ok());
    assert_eq!(first.functions[0].ops, second.functions[0].ops);
}

#[test]
fn implicit_return_can_be_disabled() {
    let func = Function::new("f", &[], Stmt::expr(Expr::int(3)));
    let options = LowerOptions { append_implicit_return: false, ..LowerOptions::default() };
    let ctx = LoweringContext::from_program(&Program::new(vec![func.clone()]), options);

    let lowered = lower_function(&func, &ctx).expect("lower");
    assert_eq!(lowered.len(), 1);
    assert!(!lowered.get_ops()[0].is_return());
}

#[test]
fn empty_function_body_is_a_single_ret_void() {
    let func = lower("f", &[], Stmt::block(vec![]));
    assert_eq!(listing(&func), vec!["RetVoid"]);
}
