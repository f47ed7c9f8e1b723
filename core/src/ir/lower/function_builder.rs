use std::collections::HashMap;

use log::error;

use super::err::{LowerError, LowerErrorKind};
use super::lowering_context::LowerOptions;
use crate::ir::function::IrFunction;
use crate::ir::label::Label;
use crate::ir::op::{IROp, Register};

/// Per-function lowering context: owns the op buffer the statement engine
/// appends to, and hands out fresh registers, labels and local slots.
///
/// Ops are only ever appended. Label identities are resolved to positions in
/// `finalize`.
#[derive(Debug, Default)]
pub struct FunctionBuilder {
    next_reg: usize,
    next_label: u32,
    next_local: usize,
    param_count: usize,
    locals: HashMap<String, usize>,
    pub ops: Vec<IROp>,
}

impl FunctionBuilder {
    pub fn new() -> Self {
        FunctionBuilder::default()
    }

    /// Builder whose first local slots hold the parameters, in order.
    pub fn with_params(params: &[String]) -> Self {
        let mut fb = FunctionBuilder::new();
        for param in params {
            fb.get_or_create_local(param);
        }
        fb.param_count = params.len();
        fb
    }

    pub fn alloc_reg(&mut self) -> Register {
        let r = self.next_reg;
        self.next_reg = self.next_reg.wrapping_add(1);
        r
    }

    pub fn new_label(&mut self) -> Label {
        let l = Label::new(self.next_label);
        self.next_label = self.next_label.wrapping_add(1);
        l
    }

    pub fn get_or_create_local(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.locals.get(name) {
            idx
        } else {
            let idx = self.next_local;
            self.next_local = self.next_local.wrapping_add(1);
            self.locals.insert(name.to_string(), idx);
            idx
        }
    }

    pub fn lookup_local(&self, name: &str) -> Option<usize> {
        self.locals.get(name).copied()
    }

    pub fn emit_op(&mut self, op: IROp) {
        self.ops.push(op);
    }

    pub fn emit_label(&mut self, label: Label) {
        self.ops.push(IROp::Label { label });
    }

    pub fn current_len(&self) -> usize {
        self.ops.len()
    }

    pub fn last_op(&self) -> Option<&IROp> {
        self.ops.last()
    }

    /// Finish the function: map every label to the index of its `Label` op.
    ///
    /// With `verify_labels` set, a label placed twice or a jump to a label
    /// that was never placed is an error; without it the first placement
    /// wins and dangling jumps are left for the consumer to reject.
    pub fn finalize(self, name: &str, options: &LowerOptions) -> Result<IrFunction, LowerError> {
        let mut labels: HashMap<Label, usize> = HashMap::new();

        for (idx, op) in self.ops.iter().enumerate() {
            if let IROp::Label { label } = op {
                if let Some(&first) = labels.get(label) {
                    if options.verify_labels {
                        error!("[ir] {}: label {} placed at {} and {}", name, label, first, idx);
                        return Err(LowerError::new(
                            LowerErrorKind::DuplicateLabel { label: *label, first, second: idx },
                            None,
                            None,
                        )
                        .in_function(name));
                    }
                    continue;
                }
                labels.insert(*label, idx);
            }
        }

        if options.verify_labels {
            for (idx, op) in self.ops.iter().enumerate() {
                if let Some(target) = op.jump_target() {
                    if !labels.contains_key(&target) {
                        error!("[ir] {}: op {} jumps to unplaced label {}", name, idx, target);
                        return Err(LowerError::new(
                            LowerErrorKind::DanglingJump { label: target, at: idx },
                            None,
                            None,
                        )
                        .in_function(name));
                    }
                }
            }
        }

        Ok(IrFunction::new(
            name.to_string(),
            self.param_count,
            self.next_local,
            self.next_reg,
            self.ops,
            labels,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::value::Value;

    #[test]
    fn labels_are_fresh_and_independent_of_position() {
        let mut fb = FunctionBuilder::new();
        let a = fb.new_label();
        let b = fb.new_label();
        assert_ne!(a, b);

        fb.emit_op(IROp::Jump { target: b });
        fb.emit_label(a);
        fb.emit_label(b);

        let func = fb.finalize("f", &LowerOptions::default()).expect("finalize");
        assert_eq!(func.position_of(a), Some(1));
        assert_eq!(func.position_of(b), Some(2));
    }

    #[test]
    fn params_occupy_first_local_slots() {
        let mut fb = FunctionBuilder::with_params(&["a".to_string(), "b".to_string()]);
        assert_eq!(fb.lookup_local("a"), Some(0));
        assert_eq!(fb.lookup_local("b"), Some(1));
        assert_eq!(fb.get_or_create_local("tmp"), 2);

        let r = fb.alloc_reg();
        fb.emit_op(IROp::LConst { dest: r, value: Value::Int(7) });
        let func = fb.finalize("f", &LowerOptions::default()).expect("finalize");
        assert_eq!(func.param_count, 2);
        assert_eq!(func.local_count, 3);
        assert_eq!(func.reg_count, 1);
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let mut fb = FunctionBuilder::new();
        let l = fb.new_label();
        fb.emit_label(l);
        fb.emit_label(l);
        let err = fb.finalize("f", &LowerOptions::default()).unwrap_err();
        assert!(matches!(err.kind, LowerErrorKind::DuplicateLabel { first: 0, second: 1, .. }));
        assert_eq!(err.function.as_deref(), Some("f"));
    }

    #[test]
    fn dangling_jump_is_rejected_unless_verification_is_off() {
        let build = || {
            let mut fb = FunctionBuilder::new();
            let l = fb.new_label();
            fb.emit_op(IROp::Jump { target: l });
            fb
        };

        let err = build().finalize("f", &LowerOptions::default()).unwrap_err();
        assert!(matches!(err.kind, LowerErrorKind::DanglingJump { at: 0, .. }));

        let lax = LowerOptions { verify_labels: false, ..LowerOptions::default() };
        assert!(build().finalize("f", &lax).is_ok());
    }
}
