//! file: core/src/ir/lower/lower_expr.rs
//! description: expression lowering.
//!
//! The statement engine only needs "lower this expression into a register";
//! `ExprLowering` is that seam. `BasicExprLowering` is the implementation
//! used by the driver: it emits into the same `FunctionBuilder` the engine
//! is appending to, so expression code lands exactly where the statement
//! needs it.
//!
use super::err::{LowerError, LowerErrorKind};
use super::function_builder::FunctionBuilder;
use super::lowering_context::LoweringContext;
use crate::ast::{BinaryOperator, Expr, ExprKind, UnaryOperator};
use crate::ir::op::{IROp, Register};
use crate::ir::value::Value;

pub trait ExprLowering {
    /// Lower `expr`, appending any needed ops to `fb`, and return the
    /// register that holds its value.
    fn lower_expr(&mut self, expr: &Expr, fb: &mut FunctionBuilder) -> Result<Register, LowerError>;
}

pub struct BasicExprLowering<'ctx> {
    ctx: &'ctx LoweringContext,
}

impl<'ctx> BasicExprLowering<'ctx> {
    pub fn new(ctx: &'ctx LoweringContext) -> Self {
        BasicExprLowering { ctx }
    }

    fn error(kind: LowerErrorKind, expr: &Expr) -> LowerError {
        LowerError::new(kind, expr.location.clone(), expr.span.clone())
    }
}

impl ExprLowering for BasicExprLowering<'_> {
    fn lower_expr(&mut self, expr: &Expr, fb: &mut FunctionBuilder) -> Result<Register, LowerError> {
        match expr.get_kind() {
            ExprKind::Integer { value } => {
                let r = fb.alloc_reg();
                fb.emit_op(IROp::LConst { dest: r, value: Value::Int(*value) });
                Ok(r)
            }
            ExprKind::Bool { value } => {
                let r = fb.alloc_reg();
                fb.emit_op(IROp::LConst { dest: r, value: Value::Bool(*value) });
                Ok(r)
            }
            ExprKind::Identifier { name } => {
                let local_index = fb.lookup_local(name).ok_or_else(|| {
                    Self::error(LowerErrorKind::UnknownIdentifier { name: name.clone() }, expr)
                })?;
                let r = fb.alloc_reg();
                fb.emit_op(IROp::LLocal { dest: r, local_index });
                Ok(r)
            }
            ExprKind::Unary { op, expr: inner } => {
                let src = self.lower_expr(inner, fb)?;
                let dest = fb.alloc_reg();
                match op {
                    UnaryOperator::Minus => fb.emit_op(IROp::Neg { dest, src }),
                    UnaryOperator::Not => fb.emit_op(IROp::Not { dest, src }),
                }
                Ok(dest)
            }
            ExprKind::Binary { left, op, right } => {
                let src1 = self.lower_expr(left, fb)?;
                let src2 = self.lower_expr(right, fb)?;
                let dest = fb.alloc_reg();
                let op = match op {
                    BinaryOperator::Add => IROp::Add { dest, src1, src2 },
                    BinaryOperator::Sub => IROp::Sub { dest, src1, src2 },
                    BinaryOperator::Mul => IROp::Mul { dest, src1, src2 },
                    BinaryOperator::Div => IROp::Div { dest, src1, src2 },
                    BinaryOperator::Mod => IROp::Mod { dest, src1, src2 },
                    BinaryOperator::Eq => IROp::Eq { dest, src1, src2 },
                    BinaryOperator::Ne => IROp::Neq { dest, src1, src2 },
                    BinaryOperator::Lt => IROp::Lt { dest, src1, src2 },
                    BinaryOperator::Le => IROp::Lte { dest, src1, src2 },
                    BinaryOperator::Gt => IROp::Gt { dest, src1, src2 },
                    BinaryOperator::Ge => IROp::Gte { dest, src1, src2 },
                };
                fb.emit_op(op);
                Ok(dest)
            }
            ExprKind::Assign { name, value } => {
                // The value is lowered before the local exists, so `x = x`
                // on a fresh name is still an unknown identifier.
                let src = self.lower_expr(value, fb)?;
                let local_index = fb.get_or_create_local(name);
                fb.emit_op(IROp::SLocal { src, local_index });
                Ok(src)
            }
            ExprKind::Call { callee, args } => {
                let sig = self.ctx.get_function(callee).ok_or_else(|| {
                    Self::error(LowerErrorKind::UnknownFunction { name: callee.clone() }, expr)
                })?;
                if sig.arity != args.len() {
                    return Err(Self::error(
                        LowerErrorKind::ArityMismatch {
                            name: callee.clone(),
                            expected: sig.arity,
                            found: args.len(),
                        },
                        expr,
                    ));
                }
                let mut regs = Vec::with_capacity(args.len());
                for arg in args {
                    regs.push(self.lower_expr(arg, fb)?);
                }
                let dest = fb.alloc_reg();
                fb.emit_op(IROp::Call { dest, func: callee.clone(), args: regs });
                Ok(dest)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::lower::lowering_context::LowerOptions;

    #[test]
    fn binary_operands_are_lowered_left_to_right() {
        let ctx = LoweringContext::new(LowerOptions::default());
        let mut fb = FunctionBuilder::with_params(&["a".to_string()]);
        let mut lowering = BasicExprLowering::new(&ctx);

        let expr = Expr::binary(Expr::ident("a"), BinaryOperator::Lt, Expr::int(3));
        let r = lowering.lower_expr(&expr, &mut fb).expect("lower");

        assert_eq!(
            fb.ops,
            vec![
                IROp::LLocal { dest: 0, local_index: 0 },
                IROp::LConst { dest: 1, value: Value::Int(3) },
                IROp::Lt { dest: 2, src1: 0, src2: 1 },
            ]
        );
        assert_eq!(r, 2);
    }

    #[test]
    fn assignment_creates_local_and_yields_value() {
        let ctx = LoweringContext::new(LowerOptions::default());
        let mut fb = FunctionBuilder::new();
        let mut lowering = BasicExprLowering::new(&ctx);

        let r = lowering.lower_expr(&Expr::assign("n", Expr::int(1)), &mut fb).expect("lower");
        assert_eq!(fb.lookup_local("n"), Some(0));
        assert_eq!(fb.last_op(), Some(&IROp::SLocal { src: r, local_index: 0 }));
    }

    #[test]
    fn unknown_identifier_and_callee_are_errors() {
        let mut ctx = LoweringContext::new(LowerOptions::default());
        ctx.declare_function("f", 1);
        let mut fb = FunctionBuilder::new();
        let mut lowering = BasicExprLowering::new(&ctx);

        let err = lowering.lower_expr(&Expr::ident("missing"), &mut fb).unwrap_err();
        assert!(matches!(err.kind, LowerErrorKind::UnknownIdentifier { ref name } if name == "missing"));

        let err = lowering.lower_expr(&Expr::call("g", vec![]), &mut fb).unwrap_err();
        assert!(matches!(err.kind, LowerErrorKind::UnknownFunction { .. }));

        let err = lowering.lower_expr(&Expr::call("f", vec![]), &mut fb).unwrap_err();
        assert!(matches!(err.kind, LowerErrorKind::ArityMismatch { expected: 1, found: 0, .. }));
    }
}
