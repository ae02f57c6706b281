use std::fs;
use std::path::{Path, PathBuf};

/// Extension of plain rendered output files
pub const TEXT_OUTPUT_EXTENSION: &str = "txt";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid vault directory: {0}")]
    InvalidVaultDir(String),
}

/// Read a note and return its content
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write content to a file, creating parent directories as needed
pub fn write_file(path: &Path, content: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(path, content).map_err(IoError::Io)
}

/// Write rendered text to `<dir>/<base_name>.txt`, followed by a newline.
///
/// Returns the path that was written.
pub fn write_text_output(dir: &Path, base_name: &str, text: &str) -> Result<PathBuf, IoError> {
    let path = dir.join(format!("{base_name}.{TEXT_OUTPUT_EXTENSION}"));
    let mut content = String::with_capacity(text.len() + 1);
    content.push_str(text);
    content.push('\n');
    write_file(&path, &content)?;
    log::info!("Rendered text written to {}", path.display());
    Ok(path)
}

pub fn validate_vault_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidVaultDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}
