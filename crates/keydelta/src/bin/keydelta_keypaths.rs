//! `keydelta-keypaths` - list the keypaths of a document.
//!
//! Usage:
//!   keydelta-keypaths [--all-levels]
//!
//! The document is read from stdin. Without `--all-levels` only leaves are
//! listed.

use keydelta::cli::list_keypaths;
use std::io::{self, Read, Write};

fn main() {
    let all_levels = match std::env::args().nth(1).as_deref() {
        None => false,
        Some("--all-levels") => true,
        Some(other) => {
            eprintln!("Unknown argument: {other}");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match list_keypaths(buf.trim(), all_levels) {
        Ok(result) => {
            io::stdout().write_all(result.as_bytes()).unwrap();
            io::stdout().write_all(b"\n").unwrap();
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
