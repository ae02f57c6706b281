//! Merges the LilyPond fragments of a rendered note into one score.
//!
//! Notes carry `voiceXxx = { ... }` snippets spread over many sections and
//! inclusions. Assembly gathers all snippets of one voice into a single
//! definition and drops the result into a score template.

pub mod template;
pub mod voices;

use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

use crate::io::{self, IoError};

pub use template::{DATE_PLACEHOLDER, MUSIC_PLACEHOLDER, fill_template};
pub use voices::{VoiceMap, extract_voices, strip_fences};

/// Default location of the assembled LilyPond source
pub const DEFAULT_OUTPUT_PATH: &str = "lily";

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("Failed to read score template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: IoError,
    },
    #[error("Failed to write assembled score {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: IoError,
    },
}

#[derive(Debug, Clone)]
pub struct Assembler {
    template_path: PathBuf,
    output_path: PathBuf,
}

impl Assembler {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Assemble with today's local date.
    pub fn assemble(&self, rendered: &str) -> Result<String, AssemblyError> {
        self.assemble_on(rendered, Local::now().date_naive())
    }

    /// Merge the voices of `rendered` into the template and persist the result.
    ///
    /// Nothing is written if the template cannot be read.
    pub fn assemble_on(&self, rendered: &str, date: NaiveDate) -> Result<String, AssemblyError> {
        let template =
            io::read_file(&self.template_path).map_err(|source| AssemblyError::TemplateRead {
                path: self.template_path.clone(),
                source,
            })?;

        let voices = extract_voices(&strip_fences(rendered));
        log::debug!(
            "Assembled {} voices: {:?}",
            voices.len(),
            voices.names().collect::<Vec<_>>()
        );
        let result = fill_template(&template, &voices.assemble(), date);

        io::write_file(&self.output_path, &result).map_err(|source| {
            AssemblyError::OutputWrite {
                path: self.output_path.clone(),
                source,
            }
        })?;
        log::info!("Assembled score written to {}", self.output_path.display());

        Ok(result)
    }
}
