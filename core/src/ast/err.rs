use crate::error::{FlatlineErrorExt, Level};
use crate::location::{Location, Span};

#[derive(Debug, Clone)]
pub struct EmptyScriptError {
    issuer: String,
    location: Option<Location>,
}

impl EmptyScriptError {
    pub fn new(issuer: String, location: Option<Location>) -> Self {
        EmptyScriptError { issuer, location }
    }
}

impl std::fmt::Display for EmptyScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EmptyScriptError {}

impl FlatlineErrorExt for EmptyScriptError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        "The provided script contains no functions.".to_string()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxError {
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl SyntaxError {
    pub fn with(message: String, issuer: &str, location: Option<Location>, span: Option<Span>) -> Self {
        SyntaxError {
            level: Level::Error,
            message,
            issuer: issuer.to_string(),
            location,
            span,
        }
    }

    /// Wraps a pest parse failure, keeping the position pest reported.
    pub fn from_pest(err: pest::error::Error<super::rules::Rule>, file: &str) -> Self {
        let (line, column) = match err.line_col {
            pest::error::LineColLocation::Pos(pos) => pos,
            pest::error::LineColLocation::Span(start, _) => start,
        };
        let message = match &err.variant {
            pest::error::ErrorVariant::ParsingError { positives, negatives } => {
                if positives.is_empty() {
                    format!("Unexpected input; did not expect {:?}.", negatives)
                } else {
                    format!("Unexpected input; expected one of {:?}.", positives)
                }
            }
            pest::error::ErrorVariant::CustomError { message } => message.clone(),
        };
        SyntaxError::with(
            message,
            "flatline.ast.parse",
            Some(Location::new(file, line, column)),
            None,
        )
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} (at {})", self.message, loc)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for SyntaxError {}

impl FlatlineErrorExt for SyntaxError {
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
