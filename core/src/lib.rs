pub mod analyzers;
pub mod ast;
pub mod error;
pub mod ir;
pub mod location;
pub mod script;
pub mod vm;

pub use analyzers::analyze_program;
pub use ast::{generate_ast_from_source, RulesParser};
pub use error::{FlatlineErrorExt, Level};
pub use ir::{lower_function, lower_program, IrFunction, LowerOptions, LoweredProgram};
pub use location::{Location, Span};
pub use script::Script;
pub use vm::{run_function, ExecOptions};

pub fn generate_error_report<E: FlatlineErrorExt + ?Sized>(error: &E) -> String {
    let level = error.level();
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    let message = error.message();

    format!("FLATLINE | {} | {} | {}", level, location, message)
}

/// Parse, analyze and lower a script.
///
/// Parse and analysis problems stop the pipeline and are returned as
/// diagnostics. Lowering failures are per function and are left in
/// `LoweredProgram::errors` next to the functions that did lower.
pub fn compile_source(script: &Script, options: LowerOptions) -> Result<LoweredProgram, Vec<Box<dyn FlatlineErrorExt>>> {
    let mut program = ast::generate_ast_from_source(script).map_err(|e| vec![e])?;
    analyze_program(&mut program)?;
    Ok(lower_program(&program, options))
}
