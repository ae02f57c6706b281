//! Runs LilyPond on an assembled score to produce PDF and MIDI.
//!
//! LilyPond is treated as a black box: the source goes into a temporary
//! directory, the process runs with a deadline, and the two output files are
//! read back into memory. The temporary directory is removed on every path.

use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::assembly::strip_fences;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(20);
/// How long to keep collecting output after the process exited
const OUTPUT_GRACE: Duration = Duration::from_secs(5);
/// How long to keep collecting output after a timed-out process was killed
const KILLED_OUTPUT_GRACE: Duration = Duration::from_millis(100);
const INPUT_FILE: &str = "input.ly";
const OUTPUT_PREFIX: &str = "output";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Pdf,
    Midi,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Pdf => write!(f, "PDF"),
            Artifact::Midi => write!(f, "MIDI"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngraveError {
    #[error("Failed to start {executable}: {source}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("LilyPond timed out after {timeout:?}. Output so far:\n{output}")]
    Timeout { timeout: Duration, output: String },

    #[error("LilyPond exited with code {code}. Output:\n{output}")]
    Exit { code: i32, output: String },

    #[error("{artifact} not generated. Output:\n{output}")]
    MissingArtifact { artifact: Artifact, output: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// PDF and MIDI bytes of one engraving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engraving {
    pub pdf: Vec<u8>,
    pub midi: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Engraver {
    executable: PathBuf,
    prefix_args: Vec<String>,
    timeout: Duration,
}

impl Engraver {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            prefix_args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments placed before LilyPond's own, for wrappers like `flatpak run`
    pub fn with_prefix_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefix_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Engrave `source` and return the PDF and MIDI bytes.
    pub fn render(&self, source: &str) -> Result<Engraving, EngraveError> {
        let workdir = tempfile::Builder::new()
            .prefix("lilypond-render-")
            .tempdir()?;
        let input = workdir.path().join(INPUT_FILE);
        fs::write(&input, strip_fences(source))?;
        let prefix = workdir.path().join(OUTPUT_PREFIX);

        let mut child = Command::new(&self.executable)
            .args(&self.prefix_args)
            .arg("-o")
            .arg(&prefix)
            .arg(&input)
            .current_dir(workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngraveError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;
        log::debug!("Started {} (pid {})", self.executable.display(), child.id());

        // stdout and stderr feed one channel, like a merged stream
        let (tx, rx) = mpsc::channel();
        if let Some(stdout) = child.stdout.take() {
            gobble(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            gobble(stderr, tx.clone());
        }
        drop(tx);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                // Already exited between polls is fine; either way reap it
                let _ = child.kill();
                let _ = child.wait();
                return Err(EngraveError::Timeout {
                    timeout: self.timeout,
                    output: collect_output(&rx, KILLED_OUTPUT_GRACE),
                });
            }
            thread::sleep(POLL_INTERVAL);
        };
        let output = collect_output(&rx, OUTPUT_GRACE);

        if !status.success() {
            return Err(EngraveError::Exit {
                code: status.code().unwrap_or(-1),
                output,
            });
        }

        let pdf = read_artifact(&[prefix.with_extension("pdf")], Artifact::Pdf, &output)?;
        let midi = read_artifact(
            &[prefix.with_extension("midi"), prefix.with_extension("mid")],
            Artifact::Midi,
            &output,
        )?;

        Ok(Engraving { pdf, midi })
    }

    /// Engrave and write both artifacts, replacing existing files.
    pub fn render_to_files(
        &self,
        source: &str,
        pdf_dest: &Path,
        midi_dest: &Path,
    ) -> Result<Engraving, EngraveError> {
        let engraving = self.render(source)?;
        fs::write(pdf_dest, &engraving.pdf)?;
        fs::write(midi_dest, &engraving.midi)?;
        log::info!("PDF written to {}", pdf_dest.display());
        log::info!("MIDI written to {}", midi_dest.display());
        Ok(engraving)
    }
}

fn gobble<R: Read + Send + 'static>(stream: R, tx: Sender<String>) {
    thread::spawn(move || {
        for line in BufReader::new(stream).lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
}

/// Drain captured lines until both streams close or `grace` runs out
fn collect_output(rx: &Receiver<String>, grace: Duration) -> String {
    let deadline = Instant::now() + grace;
    let mut out = String::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(line) => {
                out.push_str(&line);
                out.push('\n');
            }
            Err(_) => break,
        }
    }
    out
}

fn read_artifact(
    candidates: &[PathBuf],
    artifact: Artifact,
    output: &str,
) -> Result<Vec<u8>, EngraveError> {
    match candidates.iter().find(|path| path.exists()) {
        Some(path) => Ok(fs::read(path)?),
        None => Err(EngraveError::MissingArtifact {
            artifact,
            output: output.to_string(),
        }),
    }
}
