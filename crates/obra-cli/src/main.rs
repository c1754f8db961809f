//! Reporting shell for the obra ledger: loads a snapshot and prints the
//! derived tables. All derivation lives in obra-core; this binary only
//! shapes output.

use tracing_subscriber::EnvFilter;

mod commands;
mod format;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = commands::run(&args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
