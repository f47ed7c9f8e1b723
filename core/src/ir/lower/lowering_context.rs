//! file: core/src/ir/lower/lowering_context.rs
//! description: program-wide state shared by every function lowering.
//!
//! `LoweringContext` is read-only while functions are lowered: it carries the
//! function table that call lowering resolves against and the options that
//! control finalization. Per-function state (ops, labels, break targets)
//! never lives here.

use std::collections::HashMap;

use crate::ast::Program;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowerOptions {
    /// Reject functions with duplicate labels or jumps to unplaced labels.
    pub verify_labels: bool,
    /// Append `RetVoid` when a body can fall off its end.
    pub append_implicit_return: bool,
}

impl Default for LowerOptions {
    fn default() -> Self {
        LowerOptions { verify_labels: true, append_implicit_return: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSig {
    pub id: u32,
    pub arity: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LoweringContext {
    functions: HashMap<String, FunctionSig>,
    next_id: u32,
    pub options: LowerOptions,
}

impl LoweringContext {
    pub fn new(options: LowerOptions) -> Self {
        LoweringContext { functions: HashMap::new(), next_id: 0, options }
    }

    /// Context with every function of `program` declared, so calls may
    /// refer to functions defined later in the file.
    pub fn from_program(program: &Program, options: LowerOptions) -> Self {
        let mut ctx = LoweringContext::new(options);
        for func in &program.functions {
            ctx.declare_function(&func.name, func.params.len());
        }
        ctx
    }

    /// Declare a function and return its id. Redeclaring keeps the first id
    /// and updates the arity.
    pub fn declare_function(&mut self, name: &str, arity: usize) -> u32 {
        if let Some(sig) = self.functions.get_mut(name) {
            sig.arity = arity;
            return sig.id;
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.functions.insert(name.to_string(), FunctionSig { id, arity });
        id
    }

    pub fn get_function(&self, name: &str) -> Option<FunctionSig> {
        self.functions.get(name).copied()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}
