//! file: core/src/analyzers/loops.rs
//! description: links every `break` to the `while` it exits.
//!
//! Lowering never searches for a break's loop; it trusts the
//! `enclosing_loop` recorded here. The innermost enclosing `while` wins.
//!
use crate::ast::{Stmt, StmtId, StmtKind};
use crate::error::Level;

use super::err::AnalyzerError;

/// Walk `stmt`, recording each `break`'s innermost enclosing `while`.
///
/// Returns one error per `break` that has no enclosing loop; those breaks
/// keep `enclosing_loop: None`.
pub fn link_enclosing_loops(stmt: &mut Stmt) -> Vec<AnalyzerError> {
    let mut loops: Vec<StmtId> = Vec::new();
    let mut errors = Vec::new();
    walk(stmt, &mut loops, &mut errors);
    errors
}

fn walk(stmt: &mut Stmt, loops: &mut Vec<StmtId>, errors: &mut Vec<AnalyzerError>) {
    let id = stmt.get_id();
    match &mut stmt.kind {
        StmtKind::Block { statements } => {
            for s in statements.iter_mut() {
                walk(s, loops, errors);
            }
        }
        StmtKind::If { then_branch, else_branch, .. } => {
            walk(then_branch, loops, errors);
            if let Some(else_branch) = else_branch {
                walk(else_branch, loops, errors);
            }
        }
        StmtKind::While { body, .. } => {
            loops.push(id);
            walk(body, loops, errors);
            loops.pop();
        }
        StmtKind::Break { enclosing_loop } => match loops.last() {
            Some(loop_id) => *enclosing_loop = Some(*loop_id),
            None => errors.push(AnalyzerError::with(
                Level::Error,
                "'break' used outside of a loop".to_string(),
                "flatline.analyzers.loops",
                stmt.location.clone(),
                stmt.span.clone(),
            )),
        },
        StmtKind::Expr { .. } | StmtKind::Return { .. } => {}
    }
}
