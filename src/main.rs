//! goose-eval: evaluate a trained GOOSE policy on a PDDL problem.

use clap::Parser;

fn main() {
    let cli = goose_eval::cli::Cli::parse();
    if let Err(e) = goose_eval::cli::run(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}
