use crate::error::{FlatlineErrorExt, Level};
use crate::ir::label::Label;
use crate::location::{Location, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum ExecErrorKind {
    StepLimit { limit: usize },
    CallDepth { limit: usize },
    DivisionByZero,
    UnknownFunction { name: String },
    ArityMismatch { name: String, expected: usize, found: usize },
    /// Jump to a label with no recorded position. Lowering with label
    /// verification never produces this.
    UnknownLabel { label: Label },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecError {
    pub kind: ExecErrorKind,
    /// Function executing when the error was raised, and the op index.
    pub function: String,
    pub pc: usize,
}

impl ExecError {
    pub fn new(kind: ExecErrorKind, function: &str, pc: usize) -> Self {
        ExecError { kind, function: function.to_string(), pc }
    }
}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ExecError {}

impl FlatlineErrorExt for ExecError {
    fn level(&self) -> Level {
        match self.kind {
            ExecErrorKind::UnknownLabel { .. } => Level::Critical,
            _ => Level::Error,
        }
    }

    fn message(&self) -> String {
        let detail = match &self.kind {
            ExecErrorKind::StepLimit { limit } => format!("step limit of {} exceeded", limit),
            ExecErrorKind::CallDepth { limit } => format!("call depth limit of {} exceeded", limit),
            ExecErrorKind::DivisionByZero => "division by zero".to_string(),
            ExecErrorKind::UnknownFunction { name } => format!("Unknown function '{}'", name),
            ExecErrorKind::ArityMismatch { name, expected, found } => {
                format!("Function '{}' takes {} argument(s) but {} were given", name, expected, found)
            }
            ExecErrorKind::UnknownLabel { label } => format!("jump to unresolved label {}", label),
        };
        format!("{} (in '{}' at op {:04})", detail, self.function, self.pc)
    }

    fn issuer(&self) -> String {
        "flatline.vm.exec".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}
