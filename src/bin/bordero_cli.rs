use std::process;

fn main() {
    bordero_core::init();

    if let Err(err) = bordero_core::cli::run_cli() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
