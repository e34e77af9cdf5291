//! Core logic behind the command-line tools:
//! - `keydelta-diff`: compute the modifier between two documents
//! - `keydelta-apply`: apply a modifier (or plain object) to a document
//! - `keydelta-keypaths`: list the keypaths of a document
//!
//! Every function takes JSON text and returns pretty-printed JSON text.

use keydelta_keypath::{keypaths, KeypathsOptions};
use keydelta_value::Value;

use crate::apply::apply;
use crate::modifier::codec::to_json;
use crate::modifier::diff::{diff_to_modifier, DiffOptions};
use crate::modifier::types::ModifierError;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum CliError {
    Json(serde_json::Error),
    Modifier(ModifierError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Json(e) => write!(f, "{e}"),
            CliError::Modifier(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<ModifierError> for CliError {
    fn from(e: ModifierError) -> Self {
        CliError::Modifier(e)
    }
}

// ── keydelta-diff ─────────────────────────────────────────────────────────

/// Diff `doc_json` against `prev_json`, skipping `ignore`d keypaths.
///
/// Prints `null` when the documents do not differ.
pub fn diff_documents(doc_json: &str, prev_json: &str, ignore: &[String]) -> Result<String, CliError> {
    let doc = Value::from_json_str(doc_json)?;
    let prev = Value::from_json_str(prev_json)?;
    let options = DiffOptions::default().with_ignore(ignore.iter().cloned());
    let out = match diff_to_modifier(Some(&prev), Some(&doc), &options) {
        Some(modifier) => to_json(&modifier),
        None => serde_json::Value::Null,
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

// ── keydelta-apply ────────────────────────────────────────────────────────

/// Apply `source_json`, a modifier or a plain object, to `doc_json`.
pub fn apply_document(doc_json: &str, source_json: &str) -> Result<String, CliError> {
    let mut doc = Value::from_json_str(doc_json)?;
    let source = Value::from_json_str(source_json)?;
    apply(&mut doc, &source)?;
    Ok(serde_json::to_string_pretty(&doc)?)
}

// ── keydelta-keypaths ─────────────────────────────────────────────────────

pub fn list_keypaths(doc_json: &str, all_levels: bool) -> Result<String, CliError> {
    let doc = Value::from_json_str(doc_json)?;
    let options = KeypathsOptions { all_levels };
    Ok(serde_json::to_string_pretty(&keypaths(&doc, options))?)
}

// ── Tests ─────────────────────────────────────────────────────────────────
