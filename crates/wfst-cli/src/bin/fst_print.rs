// fst-print: Print a binary transducer in AT&T text format.
//
// Usage:
//   fst-print [OPTIONS] [in.fst|-] [out.txt]
//
// Options:
//   --isymbols=FILE    Print input labels as symbols
//   --osymbols=FILE    Print output labels as symbols
//   -v, --verbose      Log progress to stderr
//   -h, --help         Print help

use wfst_fst::AnyFst;

const USAGE: &str = "Usage: fst-print [--isymbols=FILE] [--osymbols=FILE] [in.fst|-] [out.txt]";

fn main() {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    if wfst_cli::wants_help(&args) {
        println!("fst-print: Print a transducer as text.");
        println!();
        println!("{USAGE}");
        println!();
        println!("Options:");
        println!("  --isymbols=FILE    Print input labels as symbols");
        println!("  --osymbols=FILE    Print output labels as symbols");
        println!("  -v, --verbose      Log progress to stderr");
        println!("  -h, --help         Print this help");
        return;
    }

    let verbose = wfst_cli::take_flag(&mut args, &["-v", "--verbose"]);
    let parsed = (|| {
        let isymbols = wfst_cli::take_option(&mut args, "--isymbols")?;
        let osymbols = wfst_cli::take_option(&mut args, "--osymbols")?;
        let files = wfst_cli::positionals(std::mem::take(&mut args))?;
        Ok::<_, String>((isymbols, osymbols, files))
    })();
    let (isymbols, osymbols, files) = parsed.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        wfst_cli::usage_error(USAGE)
    });
    if files.len() > 2 {
        wfst_cli::usage_error(USAGE);
    }
    wfst_cli::init_logging(verbose);

    let isyms = wfst_cli::load_symbols(isymbols.as_deref()).unwrap_or_else(|e| wfst_cli::fatal(&e));
    let osyms = wfst_cli::load_symbols(osymbols.as_deref()).unwrap_or_else(|e| wfst_cli::fatal(&e));

    let input = files.first().map(String::as_str);
    let data = wfst_cli::read_input(input).unwrap_or_else(|e| wfst_cli::fatal(&e));
    let fst = AnyFst::from_bytes(&data).unwrap_or_else(|e| {
        wfst_cli::fatal(&format!("{}: {e}", input.unwrap_or("standard input")))
    });

    let text = fst
        .print_text(isyms.as_ref(), osyms.as_ref())
        .unwrap_or_else(|e| wfst_cli::fatal(&e.to_string()));
    wfst_cli::write_output(files.get(1).map(String::as_str), text.as_bytes())
        .unwrap_or_else(|e| wfst_cli::fatal(&e));
}
