use std::path::PathBuf;

use crate::error::{FlatlineErrorExt, Level};

/// A source file handed to the front end.
#[derive(Debug, Clone)]
pub struct Script {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Script {
    pub fn new(path: PathBuf) -> Result<Self, Box<dyn FlatlineErrorExt>> {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::<dyn FlatlineErrorExt>::from(Box::new(MissingScriptError {
                path: path.clone(),
                reason: e.to_string(),
            }))
        })?;
        Ok(Script { name, path, content })
    }

    /// In-memory script; `name` doubles as the path.
    pub fn from_source(name: &str, content: &str) -> Self {
        Script {
            name: name.to_string(),
            path: PathBuf::from(name),
            content: content.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Script: {} at {:?}", self.name, self.path)
    }
}

#[derive(Debug, Clone)]
pub struct MissingScriptError {
    pub path: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for MissingScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MissingScriptError {}

impl FlatlineErrorExt for MissingScriptError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        format!("Cannot read script at {:?}: {}", self.path, self.reason)
    }

    fn issuer(&self) -> String {
        "flatline.script".to_string()
    }

    fn span(&self) -> Option<crate::location::Span> {
        None
    }

    fn location(&self) -> Option<crate::location::Location> {
        None
    }
}
