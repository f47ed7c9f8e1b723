//! Flat intermediate representation and the lowering that produces it.

pub mod function;
pub mod label;
pub mod lower;
pub mod op;
pub mod value;

use log::debug;

pub use self::function::{IrFunction, LoweredProgram};
pub use self::label::Label;
pub use self::lower::{lower_function, LowerError, LowerErrorKind, LowerOptions, LoweringContext};
pub use self::op::{IROp, Register};
pub use self::value::Value;

use crate::ast::Program;

/// Lower every function of `program`.
///
/// All functions are declared up front so calls can refer forward. A
/// function that fails is recorded in `errors`; the rest are still lowered.
pub fn lower_program(program: &Program, options: LowerOptions) -> LoweredProgram {
    let ctx = LoweringContext::from_program(program, options);
    let mut lowered = LoweredProgram::default();

    for func in &program.functions {
        match lower_function(func, &ctx) {
            Ok(ir) => lowered.functions.push(ir),
            Err(err) => lowered.errors.push(err),
        }
    }

    debug!(
        "[ir] lowered {} of {} function(s)",
        lowered.functions.len(),
        program.functions.len()
    );
    lowered
}
