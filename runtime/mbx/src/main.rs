//! mbx CLI
//!
//! Try message patterns against tuples from the shell.

use mbx::{init_tracing, run, CliError, CliOptions, USAGE};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() {
        eprint!("{USAGE}");
        std::process::exit(2);
    }

    // Flag errors are reported by `run`; tracing just uses the defaults then.
    let options = CliOptions::parse(&args)
        .map(|(options, _)| options)
        .unwrap_or_default();
    init_tracing(&options);

    let stdout = std::io::stdout();
    match run(&args, &mut stdout.lock()) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("error: {e}");
            if matches!(e, CliError::Usage(_)) {
                eprintln!();
                eprint!("{USAGE}");
            }
            std::process::exit(e.exit_code());
        }
    }
}
