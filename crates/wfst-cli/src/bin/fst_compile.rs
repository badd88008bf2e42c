// fst-compile: Compile an AT&T text transducer to the binary format.
//
// Each text line is either an arc "src dst ilabel olabel [weight]" or a final
// state "state [weight]". The first arc source is the start state. Labels are
// integers unless a symbol table is given.
//
// Usage:
//   fst-compile [OPTIONS] [in.txt|-] [out.fst]
//
// Options:
//   --weight-type=T    Weight type (default: tropical)
//   --isymbols=FILE    Input label symbol table
//   --osymbols=FILE    Output label symbol table
//   -v, --verbose      Log progress to stderr
//   -h, --help         Print help

use wfst_fst::AnyFst;
use wfst_fst::any::WEIGHT_TYPES;

const USAGE: &str = "Usage: fst-compile [--weight-type=T] [--isymbols=FILE] [--osymbols=FILE] [in.txt|-] [out.fst]";

fn main() {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    if wfst_cli::wants_help(&args) {
        println!("fst-compile: Compile an AT&T text transducer.");
        println!();
        println!("{USAGE}");
        println!();
        println!("Options:");
        println!("  --weight-type=T    Weight type (default: tropical)");
        println!("  --isymbols=FILE    Input label symbol table");
        println!("  --osymbols=FILE    Output label symbol table");
        println!("  -v, --verbose      Log progress to stderr");
        println!("  -h, --help         Print this help");
        println!();
        println!("Weight types: {}", WEIGHT_TYPES.join(", "));
        return;
    }

    let verbose = wfst_cli::take_flag(&mut args, &["-v", "--verbose"]);
    let parsed = (|| {
        let weight_type = wfst_cli::take_option(&mut args, "--weight-type")?;
        let isymbols = wfst_cli::take_option(&mut args, "--isymbols")?;
        let osymbols = wfst_cli::take_option(&mut args, "--osymbols")?;
        let files = wfst_cli::positionals(std::mem::take(&mut args))?;
        Ok::<_, String>((weight_type, isymbols, osymbols, files))
    })();
    let (weight_type, isymbols, osymbols, files) = parsed.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        wfst_cli::usage_error(USAGE)
    });
    if files.len() > 2 {
        wfst_cli::usage_error(USAGE);
    }
    wfst_cli::init_logging(verbose);

    let weight_type = weight_type.as_deref().unwrap_or("tropical");
    let isyms = wfst_cli::load_symbols(isymbols.as_deref()).unwrap_or_else(|e| wfst_cli::fatal(&e));
    let osyms = wfst_cli::load_symbols(osymbols.as_deref()).unwrap_or_else(|e| wfst_cli::fatal(&e));

    let input = files.first().map(String::as_str);
    let data = wfst_cli::read_input(input).unwrap_or_else(|e| wfst_cli::fatal(&e));
    let source = String::from_utf8(data).unwrap_or_else(|_| wfst_cli::fatal("input is not valid UTF-8"));

    let fst = AnyFst::compile_text(weight_type, &source, isyms.as_ref(), osyms.as_ref())
        .unwrap_or_else(|e| {
            wfst_cli::fatal(&format!("{}: {e}", input.unwrap_or("standard input")))
        });
    tracing::debug!(
        weight_type,
        states = fst.num_states(),
        arcs = fst.total_arcs(),
        "compiled transducer"
    );

    let bytes = fst.to_bytes().unwrap_or_else(|e| wfst_cli::fatal(&e.to_string()));
    wfst_cli::write_output(files.get(1).map(String::as_str), &bytes)
        .unwrap_or_else(|e| wfst_cli::fatal(&e));
}
