// wfst-cli: shared utilities for CLI tools.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::process;

use tracing_subscriber::EnvFilter;
use wfst_fst::SymbolTable;

/// Log target for user-facing warnings that `RUST_LOG` cannot silence.
pub const NOTICE_TARGET: &str = "notice";

/// Install the stderr logger.
///
/// Uses `RUST_LOG` if set, otherwise `debug` when `verbose` and `info`
/// otherwise.
pub fn init_logging(verbose: bool) {
    let mut filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    // Notices stay visible whatever RUST_LOG says.
    if let Ok(directive) = format!("{NOTICE_TARGET}=warn").parse() {
        filter = filter.add_directive(directive);
    }

    // Ignore error if a subscriber is already set.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Print usage to stderr and exit with code 1.
pub fn usage_error(usage: &str) -> ! {
    eprintln!("{usage}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

/// Remove every occurrence of a boolean flag from `args`.
///
/// Returns whether any of `names` was present.
pub fn take_flag(args: &mut Vec<String>, names: &[&str]) -> bool {
    let before = args.len();
    args.retain(|a| !names.contains(&a.as_str()));
    args.len() != before
}

/// Remove a `--name=VALUE` or `--name VALUE` option from `args`.
///
/// The last occurrence wins. A trailing `--name` without a value is an error.
pub fn take_option(args: &mut Vec<String>, name: &str) -> Result<Option<String>, String> {
    let prefix = format!("{name}=");
    let mut value = None;
    let mut remaining = Vec::with_capacity(args.len());
    let mut iter = args.drain(..);

    while let Some(arg) = iter.next() {
        if let Some(val) = arg.strip_prefix(&prefix) {
            value = Some(val.to_string());
        } else if arg == name {
            match iter.next() {
                Some(val) => value = Some(val),
                None => return Err(format!("{name} requires a value")),
            }
        } else {
            remaining.push(arg);
        }
    }
    drop(iter);

    *args = remaining;
    Ok(value)
}

/// Split what is left of the args into positionals, rejecting unknown
/// options. A lone `-` is a positional naming stdin.
pub fn positionals(args: Vec<String>) -> Result<Vec<String>, String> {
    if let Some(opt) = args.iter().find(|a| a.starts_with('-') && a.as_str() != "-") {
        return Err(format!("unknown option {opt}"));
    }
    Ok(args)
}

/// Read a whole input: a file, or stdin for `None` and `-`.
pub fn read_input(path: Option<&str>) -> Result<Vec<u8>, String> {
    match path {
        None | Some("-") => {
            let mut data = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut data)
                .map_err(|e| format!("failed to read standard input: {e}"))?;
            Ok(data)
        }
        Some(p) => fs::read(p).map_err(|e| format!("failed to read {p}: {e}")),
    }
}

/// Write a whole output: a file, or stdout for `None`.
pub fn write_output(path: Option<&str>, data: &[u8]) -> Result<(), String> {
    match path {
        None => {
            let mut out = io::stdout().lock();
            out.write_all(data)
                .and_then(|()| out.flush())
                .map_err(|e| format!("failed to write standard output: {e}"))
        }
        Some(p) => fs::write(p, data).map_err(|e| format!("failed to write {p}: {e}")),
    }
}

/// Load an optional symbol table file.
pub fn load_symbols(path: Option<&str>) -> Result<Option<SymbolTable>, String> {
    let Some(p) = path else {
        return Ok(None);
    };
    let text = fs::read_to_string(p).map_err(|e| format!("failed to read {p}: {e}"))?;
    SymbolTable::read_text(&text)
        .map(Some)
        .map_err(|e| format!("{p}: {e}"))
}
