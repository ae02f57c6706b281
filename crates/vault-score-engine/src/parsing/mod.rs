//! Turns a note into a [`Node`](crate::node::Node) tree.
//!
//! Notes are read line by line. `# ` headings open sections, `[[link]]` lines
//! become alternatives inside the current section, and everything else is
//! ignored. Link lines may carry directives (see [`directive`]) and may pull
//! other notes in, either parsed (`####`) or as raw text (`+`).

pub mod builder;
pub mod directive;

use std::path::{Path, PathBuf};

use crate::io::{self, IoError};
use crate::node::NodeRef;

pub use builder::{DocumentBuilder, READ_ERROR_MARKER};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read note {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: IoError,
    },
    #[error("Cyclic inclusion: {path} is already being parsed")]
    CyclicInclusion { path: PathBuf },
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Directory link targets are resolved against
    pub vault_root: PathBuf,
    /// Accepted for callers that pass a header; not used when parsing
    pub header: Option<String>,
}

impl ParseOptions {
    pub fn new(vault_root: impl Into<PathBuf>) -> Self {
        Self {
            vault_root: vault_root.into(),
            header: None,
        }
    }
}

/// Result of a successful parse
#[derive(Debug)]
pub struct ParsedDocument {
    /// Top-level composite holding one selecting composite per section
    pub root: NodeRef,
    /// Heading titles in document order
    pub section_titles: Vec<String>,
}

/// Parse the note at `path`.
///
/// Fails if this note, or any note it includes with `####`, cannot be read,
/// or if the inclusions form a cycle.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<ParsedDocument, ParseError> {
    let mut visiting = Vec::new();
    parse_path(path, options, &mut visiting)
}

/// Parse note text that did not come from a file.
///
/// Inclusions are still resolved against `options.vault_root`.
pub fn parse_str(source: &str, options: &ParseOptions) -> Result<ParsedDocument, ParseError> {
    let mut visiting = Vec::new();
    parse_lines(source, options, &mut visiting)
}

fn parse_path(
    path: &Path,
    options: &ParseOptions,
    visiting: &mut Vec<PathBuf>,
) -> Result<ParsedDocument, ParseError> {
    let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if visiting.contains(&key) {
        return Err(ParseError::CyclicInclusion {
            path: path.to_path_buf(),
        });
    }

    let source = io::read_file(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    visiting.push(key);
    let parsed = parse_lines(&source, options, visiting);
    visiting.pop();
    parsed
}

fn parse_lines(
    source: &str,
    options: &ParseOptions,
    visiting: &mut Vec<PathBuf>,
) -> Result<ParsedDocument, ParseError> {
    let mut builder = DocumentBuilder::new(options, visiting);
    for line in source.lines() {
        builder.push_line(line)?;
    }
    Ok(builder.finish())
}
