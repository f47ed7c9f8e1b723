pub mod err;
pub mod loops;

use std::collections::HashSet;

use crate::ast::Program;
use crate::error::{FlatlineErrorExt, Level};

pub use err::AnalyzerError;
pub use loops::link_enclosing_loops;

/// Prepare a parsed program for lowering.
///
/// Links every `break` to its loop and checks the function table (unique
/// function names, unique parameter names). All problems found are returned
/// together.
pub fn analyze_program(program: &mut Program) -> Result<(), Vec<Box<dyn FlatlineErrorExt>>> {
    let mut diags: Vec<Box<dyn FlatlineErrorExt>> = Vec::new();
    let mut seen_functions: HashSet<String> = HashSet::new();

    for func in program.functions.iter_mut() {
        if !seen_functions.insert(func.name.clone()) {
            diags.push(Box::new(AnalyzerError::with(
                Level::Error,
                format!("Function '{}' is defined more than once", func.name),
                "flatline.analyzers.functions",
                func.location.clone(),
                func.span.clone(),
            )));
        }

        let mut seen_params: HashSet<&str> = HashSet::new();
        for param in func.params.iter() {
            if !seen_params.insert(param.as_str()) {
                diags.push(Box::new(AnalyzerError::with(
                    Level::Error,
                    format!("Parameter '{}' of '{}' is declared more than once", param, func.name),
                    "flatline.analyzers.functions",
                    func.location.clone(),
                    func.span.clone(),
                )));
            }
        }

        for err in link_enclosing_loops(&mut func.body) {
            diags.push(Box::new(err));
        }
    }

    if diags.is_empty() { Ok(()) } else { Err(diags) }
}
