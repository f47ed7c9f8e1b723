//! file: core/src/ir/lower/mod.rs
//! description: per-function lowering driver.
//!
//! `lower_function` wires a fresh `FunctionBuilder`, expression lowering and
//! statement engine together for one function body and finalizes the result.
//!
pub mod err;
pub mod function_builder;
pub mod lower_expr;
pub mod lower_stmt;
pub mod lowering_context;

use log::debug;

pub use self::err::{LowerError, LowerErrorKind};
pub use self::function_builder::FunctionBuilder;
pub use self::lower_expr::{BasicExprLowering, ExprLowering};
pub use self::lower_stmt::StmtLowerer;
pub use self::lowering_context::{FunctionSig, LowerOptions, LoweringContext};

use crate::ast::Function;
use crate::ir::function::IrFunction;
use crate::ir::op::IROp;

/// Lower one function. Parameters occupy the first local slots in order.
///
/// Errors are attributed to the function by name; nothing partially lowered
/// escapes on failure.
pub fn lower_function(func: &Function, ctx: &LoweringContext) -> Result<IrFunction, LowerError> {
    debug!("[ir] lowering function '{}' ({} params)", func.name, func.params.len());

    let mut fb = FunctionBuilder::with_params(&func.params);
    let mut exprs = BasicExprLowering::new(ctx);
    StmtLowerer::new(&mut fb, &mut exprs)
        .lower(&func.body)
        .map_err(|e| e.in_function(&func.name))?;

    if ctx.options.append_implicit_return && !fb.last_op().is_some_and(IROp::is_return) {
        fb.emit_op(IROp::RetVoid);
    }

    let lowered = fb.finalize(&func.name, &ctx.options)?;
    debug!(
        "[ir] lowered '{}': {} ops, {} labels, {} regs",
        lowered.name,
        lowered.len(),
        lowered.label_count(),
        lowered.reg_count
    );
    Ok(lowered)
}
