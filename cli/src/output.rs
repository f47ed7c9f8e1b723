/// cli/src/output.rs
/// description: styled diagnostics, function summaries and the stderr logger
/// used by the CLI.

use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use console::Style;
use flatline_core::{FlatlineErrorExt, IrFunction, Level};
use log::{LevelFilter, Log, Metadata, Record};

/// Styles for different output elements
pub struct FormatStyle {
    pub title: Style,
    pub info: Style,
    pub warning: Style,
    pub error: Style,
    pub critical: Style,
    pub success: Style,
    pub dim: Style,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            title: Style::new().bold().underlined(),
            info: Style::new().cyan(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            critical: Style::new().magenta().bold(),
            success: Style::new().green().bold(),
            dim: Style::new().dim(),
        }
    }
}

impl FormatStyle {
    pub fn for_level(&self, level: Level) -> &Style {
        match level {
            Level::Info => &self.info,
            Level::Warning => &self.warning,
            Level::Error => &self.error,
            Level::Critical => &self.critical,
        }
    }
}

/// Writes diagnostics to any `Write` and remembers whether a failure was seen.
pub struct DiagnosticPrinter<T: Write> {
    out: T,
    formatting: FormatStyle,
    failed: bool,
}

impl<T: Write> DiagnosticPrinter<T> {
    pub fn new(out: T) -> Self {
        DiagnosticPrinter { out, formatting: FormatStyle::default(), failed: false }
    }

    /// `[ERROR] file.fl:3:12: message (flatline.lower.expr)`
    pub fn report(&mut self, diag: &dyn FlatlineErrorExt) -> io::Result<()> {
        let level = diag.level();
        self.failed |= level.is_failure();

        let tag = self.formatting.for_level(level).apply_to(format!("[{}]", level));
        let location = match diag.location() {
            Some(loc) => format!("{}: ", loc),
            None => String::new(),
        };
        let issuer = self.formatting.dim.apply_to(format!("({})", diag.issuer()));
        writeln!(self.out, "{} {}{} {}", tag, location, diag.message(), issuer)
    }

    pub fn report_all<'a, I>(&mut self, diags: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a dyn FlatlineErrorExt>,
    {
        for diag in diags {
            self.report(diag)?;
        }
        Ok(())
    }

    pub fn success(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", self.formatting.success.apply_to(text))
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }
}

/// One row per function: name, params, locals, registers, ops, labels.
pub fn function_summary(functions: &[IrFunction]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["function", "params", "locals", "regs", "ops", "labels"]);

    for func in functions {
        table.add_row(vec![
            Cell::new(&func.name),
            Cell::new(func.param_count).set_alignment(CellAlignment::Right),
            Cell::new(func.local_count).set_alignment(CellAlignment::Right),
            Cell::new(func.reg_count).set_alignment(CellAlignment::Right),
            Cell::new(func.len()).set_alignment(CellAlignment::Right),
            Cell::new(func.label_count()).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Minimal `log` backend: every record goes to stderr, tagged by level.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let style = match record.level() {
            log::Level::Error => Style::new().red().bold(),
            log::Level::Warn => Style::new().yellow(),
            log::Level::Info => Style::new().cyan(),
            log::Level::Debug | log::Level::Trace => Style::new().dim(),
        };
        eprintln!("{} {}", style.apply_to(format!("{:<5}", record.level())), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the stderr logger. Calling it twice keeps the first level.
pub fn init_logging(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
