//! Ferry Compiler CLI
//!
//! Lowers resolved program trees to Python and optionally runs them.

use ferryc::commands::{build_program, list_features, run_program, translate_program};
use ferryc::{parse_compile_options, CompileOptions};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "translate" | "build" | "run" => {
            if args.len() < 3 {
                eprintln!("Usage: ferry {command} <program.json> [externs.py...] [options]");
                eprintln!();
                print_compile_options();
                std::process::exit(1);
            }

            let mut options = CompileOptions::from_env();
            match parse_compile_options(&args[3..]) {
                Ok(parsed) => options.merge(&parsed),
                Err(message) => {
                    eprintln!("error: {message}");
                    std::process::exit(1);
                }
            }
            if command == "translate" && !options.externs.is_empty() {
                eprintln!("warning: extern files are only used by 'build' and 'run'");
            }

            ferryc::init_tracing(options.verbose);
            let code = match command.as_str() {
                "translate" => translate_program(&args[2], &options),
                "build" => build_program(&args[2], &options),
                _ => run_program(&args[2], &options),
            };
            std::process::exit(code);
        }
        "features" => list_features(),
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("Ferry Compiler {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Ferry Compiler (Python backend)");
    println!();
    println!("Usage: ferry <command> [options]");
    println!();
    println!("Commands:");
    println!("  translate <program.json>   Write the generated Python files");
    println!("  build <program.json>       Write, place externs, byte-compile");
    println!("  run <program.json>         Build, then execute with the interpreter");
    println!("  features                   List constructs the target cannot express");
    println!("  help                       Show this help message");
    println!("  version                    Show version information");
    println!();
    print_compile_options();
    println!();
    println!("Environment:");
    println!("  FERRY_PYTHON      Interpreter used when --python is not given");
    println!("  FERRY_LOG         Log filter (e.g. ferry_codegen=debug)");
    println!("  FERRY_LOG_TREE=1  Render log spans as a tree");
}

fn print_compile_options() {
    println!("Options:");
    println!("  -o <dir>            Output directory (default: <program>-py next to the input)");
    println!("  --python=<exe>      Interpreter (default: python3)");
    println!("  --color=<mode>      Diagnostics color: auto, always, never");
    println!("  -v, --verbose       Log progress");
    println!("  <file.py>           Extern module file, copied next to the output");
}
