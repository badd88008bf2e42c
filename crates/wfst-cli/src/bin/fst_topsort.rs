// fst-topsort: Topologically sort a serialized transducer.
//
// Reads a binary transducer of any built-in weight type, renumbers its states
// so every arc goes from a smaller to a larger state id, and writes it back.
// A cyclic transducer is written unchanged with a warning; this is not a
// failure.
//
// Usage:
//   fst-topsort [-v|--verbose] [in.fst|-] [out.fst]
//
// Options:
//   -v, --verbose   Log algorithm progress to stderr
//   -h, --help      Print help

use wfst_fst::AnyFst;

const PROG: &str = "fst-topsort";
const USAGE: &str = "Usage: fst-topsort [-v|--verbose] [in.fst|-] [out.fst]";

fn main() {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    if wfst_cli::wants_help(&args) {
        println!("{PROG}: Topologically sort a transducer.");
        println!();
        println!("{USAGE}");
        println!();
        println!("Reads standard input when in.fst is omitted or '-', and writes");
        println!("standard output when out.fst is omitted. A cyclic input is");
        println!("written unchanged.");
        println!();
        println!("Options:");
        println!("  -v, --verbose   Log algorithm progress to stderr");
        println!("  -h, --help      Print this help");
        return;
    }

    let verbose = wfst_cli::take_flag(&mut args, &["-v", "--verbose"]);
    let files = wfst_cli::positionals(args).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        wfst_cli::usage_error(USAGE)
    });
    if files.len() > 2 {
        wfst_cli::usage_error(USAGE);
    }
    wfst_cli::init_logging(verbose);

    let input = files.first().map(String::as_str);
    let output = files.get(1).map(String::as_str);

    let data = wfst_cli::read_input(input).unwrap_or_else(|e| wfst_cli::fatal(&e));
    let mut fst = AnyFst::from_bytes(&data).unwrap_or_else(|e| {
        wfst_cli::fatal(&format!("{}: {e}", input.unwrap_or("standard input")))
    });
    tracing::debug!(
        weight_type = %fst.weight_type(),
        states = fst.num_states(),
        arcs = fst.total_arcs(),
        "read transducer"
    );

    let acyclic = fst
        .top_sort()
        .unwrap_or_else(|e| wfst_cli::fatal(&e.to_string()));
    if !acyclic {
        tracing::warn!(target: wfst_cli::NOTICE_TARGET, "{PROG}: Input FST is cyclic");
    }

    let bytes = fst.to_bytes().unwrap_or_else(|e| wfst_cli::fatal(&e.to_string()));
    wfst_cli::write_output(output, &bytes).unwrap_or_else(|e| wfst_cli::fatal(&e));
}
