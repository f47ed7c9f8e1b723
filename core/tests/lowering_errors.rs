use flatline_core::ast::{Expr, Function, Program, Stmt};
use flatline_core::error::{FlatlineErrorExt, Level};
use flatline_core::ir::{lower_function, lower_program, LowerErrorKind, LowerOptions, LoweringContext};
use flatline_core::script::Script;
use flatline_core::{compile_source, generate_error_report};

#[test]
fn unlinked_break_is_a_critical_lowering_error() {
    // breaks built by hand and never passed through the loop analyzer
    let brk = Stmt::brk();
    let brk_id = brk.get_id();
    let func = Function::new("f", &["x"], Stmt::while_loop(Expr::ident("x"), Stmt::block(vec![brk])));
    let ctx = LoweringContext::from_program(&Program::new(vec![func.clone()]), LowerOptions::default());

    let err = lower_function(&func, &ctx).unwrap_err();
    assert_eq!(err.level(), Level::Critical);
    assert_eq!(err.kind, LowerErrorKind::UnresolvedBreakTarget { stmt: brk_id, enclosing_loop: None });
    assert_eq!(err.function.as_deref(), Some("f"));
    assert!(err.message().contains(&brk_id.to_string()), "message: {}", err.message());
    assert_eq!(err.issuer(), "flatline.lower.stmt");
}

#[test]
fn failing_function_does_not_stop_the_others() {
    let source = r#"
fn bad() {
    return missing;
}

fn good(a) {
    return a + 1;
}
"#;
    let script = Script::from_source("two.fl", source);
    let lowered = compile_source(&script, LowerOptions::default()).expect("parse and analysis succeed");

    assert_eq!(lowered.errors.len(), 1);
    let err = &lowered.errors[0];
    assert!(matches!(err.kind, LowerErrorKind::UnknownIdentifier { ref name } if name == "missing"));
    assert_eq!(err.level(), Level::Error);
    assert_eq!(err.location().map(|l| l.line), Some(3));

    assert!(lowered.get("bad").is_none());
    assert!(lowered.get("good").is_some());
}

#[test]
fn break_outside_loop_is_rejected_before_lowering() {
    let source = "fn f() {\n    if (true) { break; }\n}\n";
    let script = Script::from_source("orphan.fl", source);

    let diags = compile_source(&script, LowerOptions::default()).unwrap_err();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].level(), Level::Error);
    assert!(diags[0].message().contains("outside of a loop"));
    assert_eq!(diags[0].location().map(|l| l.line), Some(2));
}

#[test]
fn all_analysis_problems_are_reported_together() {
    let source = r#"
fn f(a, a) { break; }
fn f() { while (1) { break; } break; }
"#;
    let script = Script::from_source("many.fl", source);

    let diags = compile_source(&script, LowerOptions::default()).unwrap_err();
    // duplicate param, orphan break in first f, duplicate function, orphan break in second f
    assert_eq!(diags.len(), 4, "{:?}", diags);
}

#[test]
fn calls_are_checked_against_declared_functions() {
    let source = r#"
fn add(a, b) { return a + b; }
fn caller() { return add(1); }
fn later() { return after(); }
fn after() { return 7; }
"#;
    let lowered = compile_source(&Script::from_source("calls.fl", source), LowerOptions::default())
        .expect("parse and analysis succeed");

    assert_eq!(lowered.errors.len(), 1);
    assert!(matches!(
        lowered.errors[0].kind,
        LowerErrorKind::ArityMismatch { expected: 2, found: 1, .. }
    ));
    // forward call resolves
    assert!(lowered.get("later").is_some());
}

#[test]
fn error_report_carries_level_location_and_message() {
    let program = Program::new(vec![Function::new("f", &[], Stmt::ret(Some(Expr::call("nope", vec![]))))]);
    let lowered = lower_program(&program, LowerOptions::default());
    assert!(!lowered.is_ok());

    let report = generate_error_report(&lowered.errors[0]);
    assert_eq!(report, "FLATLINE | ERROR | unknown location | in function 'f': Unknown function 'nope'");
}

#[test]
fn syntax_error_is_a_diagnostic() {
    let script = Script::from_source("broken.fl", "fn f() {\n    while x { }\n}\n");
    let diags = compile_source(&script, LowerOptions::default()).unwrap_err();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].level(), Level::Error);
    assert_eq!(diags[0].location().map(|l| l.line), Some(2));
}
