//! `keydelta-diff` - compute the modifier that turns one document into another.
//!
//! Usage:
//!   keydelta-diff '<prev-json>' [ignore-keypath...]
//!
//! The new document is read from stdin. Prints the modifier, or `null` when
//! the documents do not differ.

use keydelta::cli::diff_documents;
use std::io::{self, Read, Write};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let prev = match args.get(1) {
        Some(p) => p.clone(),
        None => {
            eprintln!("First argument must be the previous document.");
            std::process::exit(1);
        }
    };
    let ignore = args.get(2..).unwrap_or_default();

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match diff_documents(buf.trim(), &prev, ignore) {
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
