//! file: core/src/vm/exec.rs
//! description: reference interpreter for lowered functions.
//!
//! Executes `IrFunction`s straight from a `LoweredProgram`. Each call gets a
//! `Frame` with its own registers and locals; the step budget is shared by
//! the whole run. Jumps use the label positions recorded at finalize.
//!
use log::trace;

use super::err::{ExecError, ExecErrorKind};
use super::ExecOptions;
use crate::ir::function::{IrFunction, LoweredProgram};
use crate::ir::label::Label;
use crate::ir::op::{IROp, Register};
use crate::ir::value::Value;

pub(crate) struct ExecState<'p> {
    pub program: &'p LoweredProgram,
    pub options: &'p ExecOptions,
    pub steps: usize,
}

struct Frame<'p> {
    func: &'p IrFunction,
    regs: Vec<Value>,
    locals: Vec<Value>,
    pc: usize,
}

impl<'p> Frame<'p> {
    fn new(func: &'p IrFunction, args: &[Value]) -> Self {
        let mut locals = vec![Value::default(); func.local_count.max(args.len())];
        locals[..args.len()].copy_from_slice(args);
        Frame { func, regs: vec![Value::default(); func.reg_count], locals, pc: 0 }
    }

    fn reg(&self, r: Register) -> Value {
        self.regs.get(r).copied().unwrap_or_default()
    }

    fn set_reg(&mut self, r: Register, value: Value) {
        if r >= self.regs.len() {
            self.regs.resize(r + 1, Value::default());
        }
        self.regs[r] = value;
    }

    fn set_local(&mut self, idx: usize, value: Value) {
        if idx >= self.locals.len() {
            self.locals.resize(idx + 1, Value::default());
        }
        self.locals[idx] = value;
    }

    fn error(&self, kind: ExecErrorKind) -> ExecError {
        ExecError::new(kind, &self.func.name, self.pc)
    }

    fn jump(&mut self, label: Label) -> Result<(), ExecError> {
        match self.func.position_of(label) {
            Some(pos) => {
                self.pc = pos;
                Ok(())
            }
            None => Err(self.error(ExecErrorKind::UnknownLabel { label })),
        }
    }

    fn arith(&mut self, dest: Register, src1: Register, src2: Register, f: fn(i64, i64) -> i64) {
        let v = f(self.reg(src1).as_int(), self.reg(src2).as_int());
        self.set_reg(dest, Value::Int(v));
    }

    fn compare(&mut self, dest: Register, src1: Register, src2: Register, f: fn(&i64, &i64) -> bool) {
        let v = f(&self.reg(src1).as_int(), &self.reg(src2).as_int());
        self.set_reg(dest, Value::Bool(v));
    }

    fn divide(
        &mut self,
        dest: Register,
        src1: Register,
        src2: Register,
        f: fn(i64, i64) -> i64,
    ) -> Result<(), ExecError> {
        let divisor = self.reg(src2).as_int();
        if divisor == 0 {
            return Err(self.error(ExecErrorKind::DivisionByZero));
        }
        let v = f(self.reg(src1).as_int(), divisor);
        self.set_reg(dest, Value::Int(v));
        Ok(())
    }
}

impl<'p> ExecState<'p> {
    pub fn new(program: &'p LoweredProgram, options: &'p ExecOptions) -> Self {
        ExecState { program, options, steps: 0 }
    }

    /// Run `name` to completion. `caller` is used only for error attribution.
    pub fn call(
        &mut self,
        name: &str,
        args: &[Value],
        depth: usize,
        caller: (&str, usize),
    ) -> Result<Option<Value>, ExecError> {
        let program = self.program;
        let func = program.get(name).ok_or_else(|| {
            ExecError::new(ExecErrorKind::UnknownFunction { name: name.to_string() }, caller.0, caller.1)
        })?;
        if func.param_count != args.len() {
            return Err(ExecError::new(
                ExecErrorKind::ArityMismatch {
                    name: name.to_string(),
                    expected: func.param_count,
                    found: args.len(),
                },
                caller.0,
                caller.1,
            ));
        }
        if depth > self.options.max_call_depth {
            return Err(ExecError::new(
                ExecErrorKind::CallDepth { limit: self.options.max_call_depth },
                caller.0,
                caller.1,
            ));
        }

        let mut frame = Frame::new(func, args);
        self.run_frame(&mut frame, depth)
    }

    fn run_frame(&mut self, frame: &mut Frame<'p>, depth: usize) -> Result<Option<Value>, ExecError> {
        let func = frame.func;
        let ops = func.get_ops();

        while frame.pc < ops.len() {
            self.steps += 1;
            if self.steps > self.options.max_steps {
                return Err(frame.error(ExecErrorKind::StepLimit { limit: self.options.max_steps }));
            }
            let op = &ops[frame.pc];
            if self.options.trace {
                trace!("[vm] {}@{:04}: {}", func.name, frame.pc, op);
            }

            match op {
                IROp::LConst { dest, value } => frame.set_reg(*dest, *value),
                IROp::LLocal { dest, local_index } => {
                    let v = frame.locals.get(*local_index).copied().unwrap_or_default();
                    frame.set_reg(*dest, v);
                }
                IROp::SLocal { src, local_index } => {
                    let v = frame.reg(*src);
                    frame.set_local(*local_index, v);
                }
                IROp::Add { dest, src1, src2 } => frame.arith(*dest, *src1, *src2, i64::wrapping_add),
                IROp::Sub { dest, src1, src2 } => frame.arith(*dest, *src1, *src2, i64::wrapping_sub),
                IROp::Mul { dest, src1, src2 } => frame.arith(*dest, *src1, *src2, i64::wrapping_mul),
                IROp::Div { dest, src1, src2 } => frame.divide(*dest, *src1, *src2, i64::wrapping_div)?,
                IROp::Mod { dest, src1, src2 } => frame.divide(*dest, *src1, *src2, i64::wrapping_rem)?,
                IROp::Eq { dest, src1, src2 } => frame.compare(*dest, *src1, *src2, i64::eq),
                IROp::Neq { dest, src1, src2 } => frame.compare(*dest, *src1, *src2, i64::ne),
                IROp::Lt { dest, src1, src2 } => frame.compare(*dest, *src1, *src2, i64::lt),
                IROp::Lte { dest, src1, src2 } => frame.compare(*dest, *src1, *src2, i64::le),
                IROp::Gt { dest, src1, src2 } => frame.compare(*dest, *src1, *src2, i64::gt),
                IROp::Gte { dest, src1, src2 } => frame.compare(*dest, *src1, *src2, i64::ge),
                IROp::Neg { dest, src } => {
                    let v = frame.reg(*src).as_int().wrapping_neg();
                    frame.set_reg(*dest, Value::Int(v));
                }
                IROp::Not { dest, src } => {
                    let v = frame.reg(*src).is_zero();
                    frame.set_reg(*dest, Value::Bool(v));
                }
                IROp::Label { .. } => {}
                IROp::Jump { target } => {
                    frame.jump(*target)?;
                    continue;
                }
                IROp::BrFalse { cond, target } => {
                    if frame.reg(*cond).is_zero() {
                        frame.jump(*target)?;
                        continue;
                    }
                }
                IROp::Call { dest, func: callee, args } => {
                    let values: Vec<Value> = args.iter().map(|r| frame.reg(*r)).collect();
                    let result = self.call(callee, &values, depth + 1, (&func.name, frame.pc))?;
                    frame.set_reg(*dest, result.unwrap_or_default());
                }
                IROp::Ret { src } => return Ok(Some(frame.reg(*src))),
                IROp::RetVoid => return Ok(None),
            }
            frame.pc += 1;
        }

        Ok(None)
    }
}
