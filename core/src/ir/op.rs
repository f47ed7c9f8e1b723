use serde::Serialize;

use super::label::Label;
use super::value::Value;

pub type Register = usize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op")]
pub enum IROp {
    LConst { dest: Register, value: Value },

    LLocal { dest: Register, local_index: usize },
    SLocal { src: Register, local_index: usize },

    Add { dest: Register, src1: Register, src2: Register },
    Sub { dest: Register, src1: Register, src2: Register },
    Mul { dest: Register, src1: Register, src2: Register },
    Div { dest: Register, src1: Register, src2: Register },
    Mod { dest: Register, src1: Register, src2: Register },

    Eq { dest: Register, src1: Register, src2: Register },
    Neq { dest: Register, src1: Register, src2: Register },
    Lt { dest: Register, src1: Register, src2: Register },
    Lte { dest: Register, src1: Register, src2: Register },
    Gt { dest: Register, src1: Register, src2: Register },
    Gte { dest: Register, src1: Register, src2: Register },
    Neg { dest: Register, src: Register },
    Not { dest: Register, src: Register },

    /// No-op marker that jumps refer to.
    Label { label: Label },
    Jump { target: Label },
    /// Branch to `target` when `cond` is zero/false, fall through otherwise.
    BrFalse { cond: Register, target: Label },

    Call { dest: Register, func: String, args: Vec<Register> },
    Ret { src: Register },
    RetVoid,
}

impl IROp {
    /// The label this op may transfer control to, if any.
    pub fn jump_target(&self) -> Option<Label> {
        match self {
            IROp::Jump { target } | IROp::BrFalse { target, .. } => Some(*target),
            _ => None,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, IROp::Ret { .. } | IROp::RetVoid)
    }
}

impl std::fmt::Display for IROp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IROp::LConst { dest, value } => write!(f, "LConst r{} <- {}", dest, value),
            IROp::LLocal { dest, local_index } => write!(f, "LLocal r{} <- local[{}]", dest, local_index),
            IROp::SLocal { src, local_index } => write!(f, "SLocal local[{}] <- r{}", local_index, src),
            IROp::Add { dest, src1, src2 } => write!(f, "Add r{} <- r{} + r{}", dest, src1, src2),
            IROp::Sub { dest, src1, src2 } => write!(f, "Sub r{} <- r{} - r{}", dest, src1, src2),
            IROp::Mul { dest, src1, src2 } => write!(f, "Mul r{} <- r{} * r{}", dest, src1, src2),
            IROp::Div { dest, src1, src2 } => write!(f, "Div r{} <- r{} / r{}", dest, src1, src2),
            IROp::Mod { dest, src1, src2 } => write!(f, "Mod r{} <- r{} % r{}", dest, src1, src2),
            IROp::Eq { dest, src1, src2 } => write!(f, "Eq r{} <- r{} == r{}", dest, src1, src2),
            IROp::Neq { dest, src1, src2 } => write!(f, "Neq r{} <- r{} != r{}", dest, src1, src2),
            IROp::Lt { dest, src1, src2 } => write!(f, "Lt r{} <- r{} < r{}", dest, src1, src2),
            IROp::Lte { dest, src1, src2 } => write!(f, "Lte r{} <- r{} <= r{}", dest, src1, src2),
            IROp::Gt { dest, src1, src2 } => write!(f, "Gt r{} <- r{} > r{}", dest, src1, src2),
            IROp::Gte { dest, src1, src2 } => write!(f, "Gte r{} <- r{} >= r{}", dest, src1, src2),
            IROp::Neg { dest, src } => write!(f, "Neg r{} <- -r{}", dest, src),
            IROp::Not { dest, src } => write!(f, "Not r{} <- !r{}", dest, src),
            IROp::Label { label } => write!(f, "{}:", label),
            IROp::Jump { target } => write!(f, "Jump {}", target),
            IROp::BrFalse { cond, target } => write!(f, "BrFalse r{} -> {}", cond, target),
            IROp::Call { dest, func, args } => {
                write!(f, "Call r{} <- {}(", dest, func)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "r{}", arg)?;
                }
                write!(f, ")")
            }
            IROp::Ret { src } => write!(f, "Ret r{}", src),
            IROp::RetVoid => write!(f, "RetVoid"),
        }
    }
}
