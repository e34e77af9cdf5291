//! `keydelta-apply` - apply a modifier to a document.
//!
//! Usage:
//!   keydelta-apply '<modifier-or-object-json>'
//!
//! The document is read from stdin. A `{"set": .., "unset": ..}` argument is
//! applied as is; any other object is inserted leaf by leaf.

use keydelta::cli::apply_document;
use std::io::{self, Read, Write};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let source = match args.get(1) {
        Some(s) => s.clone(),
        None => {
            eprintln!("First argument must be a modifier or an object.");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match apply_document(buf.trim(), &source) {
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
