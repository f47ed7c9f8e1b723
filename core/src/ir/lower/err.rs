use crate::ast::StmtId;
use crate::error::{FlatlineErrorExt, Level};
use crate::ir::label::Label;
use crate::location::{Location, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum LowerErrorKind {
    /// A `break` whose loop has no registered exit label. Only reachable
    /// through an engine bug or a mislinked tree.
    UnresolvedBreakTarget { stmt: StmtId, enclosing_loop: Option<StmtId> },
    UnknownIdentifier { name: String },
    UnknownFunction { name: String },
    ArityMismatch { name: String, expected: usize, found: usize },
    DuplicateLabel { label: Label, first: usize, second: usize },
    DanglingJump { label: Label, at: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LowerError {
    pub kind: LowerErrorKind,
    pub function: Option<String>,
    location: Option<Location>,
    span: Option<Span>,
}

impl LowerError {
    pub fn new(kind: LowerErrorKind, location: Option<Location>, span: Option<Span>) -> Self {
        LowerError { kind, function: None, location, span }
    }

    /// Attribute the error to the function being lowered.
    pub fn in_function(mut self, name: &str) -> Self {
        if self.function.is_none() {
            self.function = Some(name.to_string());
        }
        self
    }

    pub fn is_internal(&self) -> bool {
        matches!(
            self.kind,
            LowerErrorKind::UnresolvedBreakTarget { .. }
                | LowerErrorKind::DuplicateLabel { .. }
                | LowerErrorKind::DanglingJump { .. }
        )
    }
}

impl std::fmt::Display for LowerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} at {}", self.message(), loc)
        } else {
            write!(f, "{}", self.message())
        }
    }
}

impl std::error::Error for LowerError {}

impl FlatlineErrorExt for LowerError {
    fn level(&self) -> Level {
        if self.is_internal() { Level::Critical } else { Level::Error }
    }

    fn message(&self) -> String {
        let detail = match &self.kind {
            LowerErrorKind::UnresolvedBreakTarget { stmt, enclosing_loop: Some(loop_id) } => {
                format!("break {} targets loop {} which has no exit label", stmt, loop_id)
            }
            LowerErrorKind::UnresolvedBreakTarget { stmt, enclosing_loop: None } => {
                format!("break {} was never linked to an enclosing loop", stmt)
            }
            LowerErrorKind::UnknownIdentifier { name } => format!("Unknown identifier '{}'", name),
            LowerErrorKind::UnknownFunction { name } => format!("Unknown function '{}'", name),
            LowerErrorKind::ArityMismatch { name, expected, found } => {
                format!("Function '{}' takes {} argument(s) but {} were given", name, expected, found)
            }
            LowerErrorKind::DuplicateLabel { label, first, second } => {
                format!("label {} placed twice (ops {} and {})", label, first, second)
            }
            LowerErrorKind::DanglingJump { label, at } => {
                format!("op {} jumps to label {} which was never placed", at, label)
            }
        };
        match &self.function {
            Some(name) => format!("in function '{}': {}", name, detail),
            None => detail,
        }
    }

    fn issuer(&self) -> String {
        match self.kind {
            LowerErrorKind::UnresolvedBreakTarget { .. } => "flatline.lower.stmt",
            LowerErrorKind::UnknownIdentifier { .. }
            | LowerErrorKind::UnknownFunction { .. }
            | LowerErrorKind::ArityMismatch { .. } => "flatline.lower.expr",
            LowerErrorKind::DuplicateLabel { .. } | LowerErrorKind::DanglingJump { .. } => {
                "flatline.lower.finalize"
            }
        }
        .to_string()
    }

    fn span(&self) -> Option<Span> {
        self.span.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}
