//! userctl: manage user objects with layered configuration

use std::process;

fn main() {
    if let Err(err) = userctl::cli::run() {
        eprintln!("ERROR: {err:#}");
        process::exit(1);
    }
}
