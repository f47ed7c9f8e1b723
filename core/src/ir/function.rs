use std::collections::HashMap;

use serde::Serialize;

use super::label::Label;
use super::lower::err::LowerError;
use super::op::IROp;

/// One finished function body: the flat op list plus where each label ended up.
#[derive(Debug, Clone, Serialize)]
pub struct IrFunction {
    pub name: String,
    pub param_count: usize,
    pub local_count: usize,
    pub reg_count: usize,
    pub ops: Vec<IROp>,
    #[serde(skip)]
    labels: HashMap<Label, usize>,
}

impl IrFunction {
    pub(crate) fn new(
        name: String,
        param_count: usize,
        local_count: usize,
        reg_count: usize,
        ops: Vec<IROp>,
        labels: HashMap<Label, usize>,
    ) -> Self {
        IrFunction { name, param_count, local_count, reg_count, ops, labels }
    }

    pub fn get_ops(&self) -> &[IROp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Index of the `Label` op for `label`.
    pub fn position_of(&self, label: Label) -> Option<usize> {
        self.labels.get(&label).copied()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

impl std::fmt::Display for IrFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "fn {} (params: {}, locals: {}, regs: {})",
            self.name, self.param_count, self.local_count, self.reg_count
        )?;
        for (i, op) in self.ops.iter().enumerate() {
            writeln!(f, "{:04}: {}", i, op)?;
        }
        Ok(())
    }
}

/// Result of lowering every function of a program.
///
/// A function that fails to lower is reported in `errors` and left out of
/// `functions`; the others are still lowered.
#[derive(Debug, Default)]
pub struct LoweredProgram {
    pub functions: Vec<IrFunction>,
    pub errors: Vec<LowerError>,
}

impl LoweredProgram {
    pub fn get(&self, name: &str) -> Option<&IrFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Pretty JSON array of the lowered functions.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.functions)
    }
}

impl std::fmt::Display for LoweredProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", func)?;
        }
        Ok(())
    }
}
