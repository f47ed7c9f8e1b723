//! Reference interpreter for lowered programs.

pub mod err;
mod exec;

pub use self::err::{ExecError, ExecErrorKind};

use crate::ir::function::LoweredProgram;
use crate::ir::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOptions {
    /// Ops executed across the whole run before giving up.
    pub max_steps: usize,
    pub max_call_depth: usize,
    /// Log every executed op at `trace` level.
    pub trace: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        ExecOptions { max_steps: 1_000_000, max_call_depth: 256, trace: false }
    }
}

/// Run `entry` with `args` and return its result, `None` when it returns
/// nothing or falls off its end.
pub fn run_function(
    program: &LoweredProgram,
    entry: &str,
    args: &[Value],
    options: &ExecOptions,
) -> Result<Option<Value>, ExecError> {
    let mut state = exec::ExecState::new(program, options);
    let result = state.call(entry, args, 0, ("<entry>", 0));
    log::debug!("[vm] '{}' finished after {} step(s)", entry, state.steps);
    result
}
