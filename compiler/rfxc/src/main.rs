//! rfx command-line interface.

use rfxc::{fix_paths, init_tracing, list_rules, parse_fix_options, Mode};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "fix" | "check" => {
            let mode = if command == "fix" { Mode::Fix } else { Mode::Check };
            let options = match parse_fix_options(&args[2..]) {
                Ok(options) => options,
                Err(e) => {
                    eprintln!("error: {e}");
                    eprintln!("Run 'rfx help' for usage");
                    std::process::exit(2);
                }
            };
            init_tracing(options.verbose);

            let mut stdout = std::io::stdout().lock();
            match fix_paths(&options, mode, &mut stdout) {
                Ok(summary) => std::process::exit(summary.exit_code(mode)),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(2);
                }
            }
        }
        "rules" => {
            println!("Rules (in registration order):");
            if let Err(e) = list_rules(&mut std::io::stdout().lock()) {
                eprintln!("error: {e}");
                std::process::exit(2);
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("rfx {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    println!("rfx - rule-based source rewriting for Java and Android");
    println!();
    println!("Usage: rfx <command> [paths...] [options]");
    println!();
    println!("Commands:");
    println!("  fix [paths...]      Rewrite .java files in place (default: current directory)");
    println!("  check [paths...]    Report files that would change (exit 1 if any)");
    println!("  rules               List available rules");
    println!("  help                Show this help message");
    println!("  version             Show version information");
    println!();
    println!("Options:");
    println!("  --rules=<a,b>           Only run these rules");
    println!("  --level=<n>             Source level: 1.4, 1.5, 1.6, 1.7, 1.8 (default: 1.8)");
    println!("  --no-android            Skip Android platform rules");
    println!("  --max-iterations=<n>    Passes per file before giving up (default: 4)");
    println!("  --jobs=<n|auto>         Worker threads (default: auto)");
    println!("  --dry-run               Report changes without writing files");
    println!("  --verbose, -v           Print every pass report and debug logs");
    println!();
    println!("Logging:");
    println!("  RUST_LOG=rfx_engine=trace   Hierarchical trace of passes on stderr");
    println!();
    println!("Examples:");
    println!("  rfx rules");
    println!("  rfx check app/src --rules=recycle,wake-lock");
    println!("  rfx fix app/src --level=1.6");
    println!("  rfx fix Lib.java --no-android --dry-run");
}
