//! Source-level syntax tree and the `pest` front end that builds it.

pub mod err;
pub mod expr;
pub mod kind;
pub mod node;
pub mod rules;
pub mod stmt;

use pest::Parser;

pub use kind::{BinaryOperator, ExprKind, StmtKind, UnaryOperator};
pub use node::{Expr, Function, Program, Stmt, StmtId};
pub use rules::{Rule, RulesParser};

use crate::error::FlatlineErrorExt;
use crate::script::Script;

/// Parse a script into a `Program`.
///
/// Breaks in the returned tree are not yet linked to their loops; run
/// `analyzers::analyze_program` before lowering.
pub fn generate_ast_from_source(script: &Script) -> Result<Program, Box<dyn FlatlineErrorExt>> {
    if script.is_empty() {
        return Err(Box::<dyn FlatlineErrorExt>::from(Box::new(err::EmptyScriptError::new(
            "flatline.ast.generate_ast_from_source".into(),
            Some(crate::location::Location::new(script.name.clone(), 1, 1)),
        ))));
    }

    let mut pairs = RulesParser::parse(Rule::program, &script.content).map_err(|e| {
        Box::<dyn FlatlineErrorExt>::from(Box::new(err::SyntaxError::from_pest(e, &script.name)))
    })?;

    let program_pair = match pairs.next() {
        Some(pair) => pair,
        None => {
            return Err(Box::<dyn FlatlineErrorExt>::from(Box::new(err::SyntaxError::with(
                "Parser produced no program.".into(),
                "flatline.ast.generate_ast_from_source",
                None,
                None,
            ))));
        }
    };

    let mut functions = Vec::new();
    for pair in program_pair.into_inner() {
        match pair.as_rule() {
            Rule::function => functions.push(stmt::parse_function_rule(pair, script)?),
            Rule::EOI => {}
            _ => {
                return Err(rules::unexpected_rule(&pair, "flatline.ast.generate_ast_from_source", &None, &None));
            }
        }
    }

    if functions.is_empty() {
        return Err(Box::<dyn FlatlineErrorExt>::from(Box::new(err::EmptyScriptError::new(
            "flatline.ast.generate_ast_from_source".into(),
            Some(crate::location::Location::new(script.name.clone(), 1, 1)),
        ))));
    }

    Ok(Program::new(functions))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Program {
        let script = Script::from_source("t.fl", src);
        match generate_ast_from_source(&script) {
            Ok(program) => program,
            Err(e) => panic!("parse failed: {}", e),
        }
    }

    #[test]
    fn keyword_prefixed_identifiers_are_identifiers() {
        let program = parse("fn f() { returned = 1; elsewhere = 2; return returned; }");
        let body = &program.functions[0].body;
        let StmtKind::Block { statements } = body.get_kind() else { panic!("expected block") };
        assert_eq!(statements.len(), 3);
        assert!(matches!(statements[0].get_kind(), StmtKind::Expr { .. }));
        assert!(matches!(statements[1].get_kind(), StmtKind::Expr { .. }));
        assert!(matches!(statements[2].get_kind(), StmtKind::Return { value: Some(_) }));
    }

    #[test]
    fn binary_operators_respect_precedence() {
        let program = parse("fn f() { return 1 + 2 * 3 == 7; }");
        let StmtKind::Block { statements } = program.functions[0].body.get_kind() else { panic!() };
        let StmtKind::Return { value: Some(expr) } = statements[0].get_kind() else { panic!() };
        let ExprKind::Binary { left, op, .. } = expr.get_kind() else { panic!("expected ==") };
        assert_eq!(*op, BinaryOperator::Eq);
        let ExprKind::Binary { right, op, .. } = left.get_kind() else { panic!("expected +") };
        assert_eq!(*op, BinaryOperator::Add);
        assert!(matches!(right.get_kind(), ExprKind::Binary { op: BinaryOperator::Mul, .. }));
    }

    #[test]
    fn else_binds_to_nearest_if() {
        let program = parse("fn f(a, b) { if (a) if (b) return 1; else return 2; }");
        let StmtKind::Block { statements } = program.functions[0].body.get_kind() else { panic!() };
        let StmtKind::If { then_branch, else_branch, .. } = statements[0].get_kind() else { panic!() };
        assert!(else_branch.is_none());
        assert!(matches!(then_branch.get_kind(), StmtKind::If { else_branch: Some(_), .. }));
    }

    #[test]
    fn syntax_error_carries_location() {
        let script = Script::from_source("bad.fl", "fn f() {\n  while x) { }\n}");
        let err = generate_ast_from_source(&script).err().expect("expected a syntax error");
        let loc = err.location().expect("location");
        assert_eq!(loc.file, "bad.fl");
        assert_eq!(loc.line, 2);
    }
}
