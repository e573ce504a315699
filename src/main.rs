use std::fs;

use arrai::run_program;
use clap::Parser;

/// arrai runs programs written in a small array-oriented language whose
/// only value is an array of 32-bit integers.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the program to run (conventionally a .ints file).
    file: String,

    /// Arguments forwarded to the program's main function.
    args: Vec<String>,
}

fn main() {
    let args = Args::parse();

    let source = fs::read_to_string(&args.file).unwrap_or_else(|_| {
        eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                  &args.file);
        std::process::exit(1);
    });

    if let Err(e) = run_program(&source, &args.args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
