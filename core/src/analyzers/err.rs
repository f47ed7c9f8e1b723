use crate::error::{FlatlineErrorExt, Level};
use crate::location::{Location, Span};

/// A user-facing problem found before lowering (e.g. `break` outside a loop).
#[derive(Debug, Clone)]
pub struct AnalyzerError {
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl AnalyzerError {
    pub fn with(
        level: Level,
        message: String,
        issuer: &str,
        location: Option<Location>,
        span: Option<Span>,
    ) -> Self {
        AnalyzerError {
            level,
            message,
            issuer: issuer.to_string(),
            location,
            span,
        }
    }
}

impl std::fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} at {}", self.message, loc)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for AnalyzerError {}

impl FlatlineErrorExt for AnalyzerError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        self.span.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}
