use clap::{Arg, ArgAction, ArgMatches, Command};
use flatline_core::ast::generate_ast_from_source;
use flatline_core::ir::value::Value;
use flatline_core::script::Script;
use flatline_core::{analyze_program, lower_program, run_function, ExecOptions, FlatlineErrorExt, LowerOptions};
use log::LevelFilter;
use std::fs;
use std::io;
use std::path::PathBuf;

mod output;

use output::DiagnosticPrinter;

fn main() {
    let cli = Command::new("flatline")
        .version("0.1.0")
        .about("Lower structured functions to a flat label/jump IR and run them");

    let cli = setup_cli(cli);
    let matches = cli.get_matches();
    let code = dispatch_commands(&matches);
    std::process::exit(code);
}

/// Sets up the CLI with subcommands and arguments.
fn setup_cli(cli: Command) -> Command {
    cli.arg(
        Arg::new("verbose")
            .help("Log lowering progress to stderr")
            .short('v')
            .long("verbose")
            .global(true)
            .action(ArgAction::SetTrue),
    )
    .subcommand(
        Command::new("build")
            .about("Lower the specified script file")
            .arg(
                Arg::new("file")
                    .help("The script file to build")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::new("dump")
                    .help("Print the parsed AST or the lowered IR")
                    .short('d')
                    .long("dump")
                    .value_parser(["ast", "ir"])
                    .value_name("STAGE"),
            )
            .arg(
                Arg::new("format")
                    .help("Format of the IR dump")
                    .short('f')
                    .long("format")
                    .value_parser(["text", "json"])
                    .default_value("text")
                    .value_name("FORMAT"),
            )
            .arg(
                Arg::new("output")
                    .help("Write the dump to a file instead of stdout")
                    .short('o')
                    .long("output")
                    .value_parser(clap::value_parser!(String))
                    .value_name("FILE"),
            )
            .arg(
                Arg::new("no-verify")
                    .help("Skip label verification when finalizing functions")
                    .long("no-verify")
                    .action(ArgAction::SetTrue),
            ),
    )
    .subcommand(
        Command::new("run")
            .about("Lower a script file and run one of its functions")
            .arg(
                Arg::new("file")
                    .help("The script file to run")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::new("entry")
                    .help("Function to call")
                    .short('e')
                    .long("entry")
                    .default_value("main")
                    .value_name("NAME"),
            )
            .arg(
                Arg::new("arg")
                    .help("Integer argument for the entry function, repeatable")
                    .short('a')
                    .long("arg")
                    .value_parser(clap::value_parser!(i64))
                    .allow_negative_numbers(true)
                    .action(ArgAction::Append)
                    .value_name("INT"),
            )
            .arg(
                Arg::new("max-steps")
                    .help("Abort after executing this many ops")
                    .long("max-steps")
                    .value_parser(clap::value_parser!(usize))
                    .value_name("N"),
            )
            .arg(
                Arg::new("trace")
                    .help("Log every executed op to stderr")
                    .long("trace")
                    .action(ArgAction::SetTrue),
            ),
    )
}

/// Dispatches the command based on the parsed arguments and returns the
/// process exit code.
fn dispatch_commands(matches: &ArgMatches) -> i32 {
    let trace = matches
        .subcommand_matches("run")
        .is_some_and(|sub_m| sub_m.get_flag("trace"));
    let level = if trace {
        LevelFilter::Trace
    } else if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    output::init_logging(level);

    let result = match matches.subcommand() {
        Some(("build", sub_m)) => build_command(sub_m),
        Some(("run", sub_m)) => run_command(sub_m),
        _ => {
            println!("No valid subcommand was used. Use --help for more information.");
            return 2;
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("I/O error: {}", e);
            1
        }
    }
}

/// Load, parse and analyze `file`. On failure the diagnostics are printed and
/// `None` is returned.
fn load_program(
    file: &str,
    printer: &mut DiagnosticPrinter<io::Stderr>,
) -> io::Result<Option<flatline_core::ast::Program>> {
    let script = match Script::new(PathBuf::from(file)) {
        Ok(script) => script,
        Err(e) => {
            printer.report(e.as_ref())?;
            return Ok(None);
        }
    };

    let mut program = match generate_ast_from_source(&script) {
        Ok(program) => program,
        Err(e) => {
            printer.report(e.as_ref())?;
            return Ok(None);
        }
    };

    if let Err(diags) = analyze_program(&mut program) {
        printer.report_all(diags.iter().map(|d| d.as_ref()))?;
        return Ok(None);
    }
    Ok(Some(program))
}

fn build_command(sub_m: &ArgMatches) -> io::Result<i32> {
    let file = sub_m.get_one::<String>("file").map(String::as_str).unwrap_or_default();
    let mut printer = DiagnosticPrinter::new(io::stderr());

    let Some(program) = load_program(file, &mut printer)? else {
        return Ok(1);
    };

    let options = LowerOptions { verify_labels: !sub_m.get_flag("no-verify"), ..LowerOptions::default() };
    let lowered = lower_program(&program, options);
    printer.report_all(lowered.errors.iter().map(|e| e as &dyn FlatlineErrorExt))?;

    let dump = match sub_m.get_one::<String>("dump").map(String::as_str) {
        Some("ast") => Some(format!("{:#?}\n", program)),
        Some(_) => {
            let text = match sub_m.get_one::<String>("format").map(String::as_str) {
                Some("json") => lowered
                    .to_json()
                    .map(|json| json + "\n")
                    .map_err(io::Error::other)?,
                _ => lowered.to_string(),
            };
            Some(text)
        }
        None => None,
    };

    match (dump, sub_m.get_one::<String>("output")) {
        (Some(text), Some(path)) => fs::write(path, text)?,
        (Some(text), None) => print!("{}", text),
        (None, _) => {
            if !lowered.functions.is_empty() {
                println!("{}", output::function_summary(&lowered.functions));
            }
            if !printer.has_failed() {
                printer.success(&format!("lowered {} function(s) from {}", lowered.functions.len(), file))?;
            }
        }
    }

    Ok(if printer.has_failed() { 1 } else { 0 })
}

fn run_command(sub_m: &ArgMatches) -> io::Result<i32> {
    let file = sub_m.get_one::<String>("file").map(String::as_str).unwrap_or_default();
    let mut printer = DiagnosticPrinter::new(io::stderr());

    let Some(program) = load_program(file, &mut printer)? else {
        return Ok(1);
    };

    let lowered = lower_program(&program, LowerOptions::default());
    if !lowered.is_ok() {
        printer.report_all(lowered.errors.iter().map(|e| e as &dyn FlatlineErrorExt))?;
        return Ok(1);
    }

    let entry = sub_m.get_one::<String>("entry").map(String::as_str).unwrap_or("main");
    let args: Vec<Value> = sub_m
        .get_many::<i64>("arg")
        .map(|vals| vals.map(|v| Value::Int(*v)).collect())
        .unwrap_or_default();

    let mut options = ExecOptions { trace: sub_m.get_flag("trace"), ..ExecOptions::default() };
    if let Some(max_steps) = sub_m.get_one::<usize>("max-steps") {
        options.max_steps = *max_steps;
    }

    match run_function(&lowered, entry, &args, &options) {
        Ok(Some(value)) => {
            println!("{}", value);
            Ok(0)
        }
        Ok(None) => Ok(0),
        Err(e) => {
            printer.report(&e)?;
            Ok(1)
        }
    }
}
