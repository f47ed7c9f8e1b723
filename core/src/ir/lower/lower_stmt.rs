//! Lowering of statement nodes into labels, jumps and conditional jumps.
//!
//! `StmtLowerer` walks one function body depth-first and appends to the
//! function's `FunctionBuilder`. Expressions are handed to an `ExprLowering`
//! and only ever come back as a register. Each engine owns the break map for
//! the loops it has entered, so two functions never share break targets.

use std::collections::HashMap;

use log::{error, trace};

use super::err::{LowerError, LowerErrorKind};
use super::function_builder::FunctionBuilder;
use super::lower_expr::ExprLowering;
use crate::ast::{Expr, Stmt, StmtId, StmtKind};
use crate::ir::label::Label;
use crate::ir::op::IROp;

pub struct StmtLowerer<'a, E: ExprLowering> {
    fb: &'a mut FunctionBuilder,
    exprs: &'a mut E,
    /// Loop statement id -> label placed right after that loop.
    break_targets: HashMap<StmtId, Label>,
}

impl<'a, E: ExprLowering> StmtLowerer<'a, E> {
    pub fn new(fb: &'a mut FunctionBuilder, exprs: &'a mut E) -> Self {
        StmtLowerer { fb, exprs, break_targets: HashMap::new() }
    }

    pub fn lower(&mut self, stmt: &Stmt) -> Result<(), LowerError> {
        trace!("[lower] {} {} at op {}", stmt.get_kind().name(), stmt.get_id(), self.fb.current_len());

        match stmt.get_kind() {
            StmtKind::Block { statements } => {
                for s in statements {
                    self.lower(s)?;
                }
                Ok(())
            }
            StmtKind::Expr { expr } => {
                self.exprs.lower_expr(expr, self.fb)?;
                Ok(())
            }
            StmtKind::Return { value: Some(value) } => {
                let src = self.exprs.lower_expr(value, self.fb)?;
                self.fb.emit_op(IROp::Ret { src });
                Ok(())
            }
            StmtKind::Return { value: None } => {
                self.fb.emit_op(IROp::RetVoid);
                Ok(())
            }
            StmtKind::If { condition, then_branch, else_branch } => {
                self.lower_if(condition, then_branch, else_branch.as_deref())
            }
            StmtKind::While { condition, body } => self.lower_while(stmt.get_id(), condition, body),
            StmtKind::Break { enclosing_loop } => self.lower_break(stmt, *enclosing_loop),
        }
    }

    fn lower_if(&mut self, condition: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>) -> Result<(), LowerError> {
        let cond = self.exprs.lower_expr(condition, self.fb)?;
        let join = self.fb.new_label();
        self.fb.emit_op(IROp::BrFalse { cond, target: join });
        self.lower(then_branch)?;

        match else_branch {
            None => {
                self.fb.emit_label(join);
            }
            Some(else_branch) => {
                let end = self.fb.new_label();
                self.fb.emit_op(IROp::Jump { target: end });
                self.fb.emit_label(join);
                self.lower(else_branch)?;
                self.fb.emit_label(end);
            }
        }
        Ok(())
    }

    fn lower_while(&mut self, loop_id: StmtId, condition: &Expr, body: &Stmt) -> Result<(), LowerError> {
        let loop_start = self.fb.new_label();
        let loop_end = self.fb.new_label();
        // Registered before the body so breaks at any depth inside resolve.
        self.break_targets.insert(loop_id, loop_end);

        self.fb.emit_label(loop_start);
        let cond = self.exprs.lower_expr(condition, self.fb)?;
        self.fb.emit_op(IROp::BrFalse { cond, target: loop_end });
        self.lower(body)?;
        self.fb.emit_op(IROp::Jump { target: loop_start });
        self.fb.emit_label(loop_end);
        Ok(())
    }

    fn lower_break(&mut self, stmt: &Stmt, enclosing_loop: Option<StmtId>) -> Result<(), LowerError> {
        let target = enclosing_loop.and_then(|loop_id| self.break_target(loop_id));
        match target {
            Some(target) => {
                self.fb.emit_op(IROp::Jump { target });
                Ok(())
            }
            None => {
                error!(
                    "[lower] break {} has no exit label (enclosing loop: {:?})",
                    stmt.get_id(),
                    enclosing_loop
                );
                Err(LowerError::new(
                    LowerErrorKind::UnresolvedBreakTarget { stmt: stmt.get_id(), enclosing_loop },
                    stmt.get_location().cloned(),
                    stmt.get_span().cloned(),
                ))
            }
        }
    }

    /// Exit label registered for `loop_id`, if that loop has been entered.
    pub fn break_target(&self, loop_id: StmtId) -> Option<Label> {
        self.break_targets.get(&loop_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::op::Register;

    /// Every expression becomes one `LConst` of zero.
    struct ZeroExprs;

    impl ExprLowering for ZeroExprs {
        fn lower_expr(&mut self, _expr: &Expr, fb: &mut FunctionBuilder) -> Result<Register, LowerError> {
            let r = fb.alloc_reg();
            fb.emit_op(IROp::LConst { dest: r, value: crate::ir::value::Value::Int(0) });
            Ok(r)
        }
    }

    fn lower(stmt: &Stmt) -> Result<Vec<IROp>, LowerError> {
        let mut fb = FunctionBuilder::new();
        let mut exprs = ZeroExprs;
        StmtLowerer::new(&mut fb, &mut exprs).lower(stmt)?;
        Ok(fb.ops)
    }

    #[test]
    fn empty_block_emits_nothing() {
        assert!(lower(&Stmt::block(vec![])).expect("lower").is_empty());
    }

    #[test]
    fn code_after_return_is_still_emitted() {
        let ops = lower(&Stmt::block(vec![Stmt::ret(None), Stmt::expr(Expr::int(1))])).expect("lower");
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0], IROp::RetVoid);
    }

    #[test]
    fn unlinked_break_is_an_unresolved_target() {
        let brk = Stmt::brk();
        let err = lower(&brk).unwrap_err();
        assert_eq!(
            err.kind,
            LowerErrorKind::UnresolvedBreakTarget { stmt: brk.get_id(), enclosing_loop: None }
        );
    }

    #[test]
    fn break_to_a_loop_not_being_lowered_is_unresolved() {
        let other = Stmt::while_loop(Expr::int(1), Stmt::block(vec![]));
        let brk = Stmt::break_to(other.get_id());
        let outer = Stmt::while_loop(Expr::int(1), Stmt::block(vec![brk]));

        let err = lower(&outer).unwrap_err();
        assert!(matches!(
            err.kind,
            LowerErrorKind::UnresolvedBreakTarget { enclosing_loop: Some(id), .. } if id == other.get_id()
        ));
    }

    #[test]
    fn break_map_tracks_entered_loops() {
        let mut fb = FunctionBuilder::new();
        let mut exprs = ZeroExprs;
        let inner = Stmt::while_loop(Expr::int(1), Stmt::block(vec![]));
        let inner_id = inner.get_id();
        let outer = Stmt::while_loop(Expr::int(1), inner);
        let outer_id = outer.get_id();

        let mut engine = StmtLowerer::new(&mut fb, &mut exprs);
        assert_eq!(engine.break_target(outer_id), None);
        engine.lower(&outer).expect("lower");

        let outer_end = engine.break_target(outer_id).expect("outer registered");
        let inner_end = engine.break_target(inner_id).expect("inner registered");
        assert_ne!(outer_end, inner_end);
        assert_eq!(fb.last_op(), Some(&IROp::Label { label: outer_end }));
    }
}
