use relative_path::{RelativePath, RelativePathBuf};
use std::path::{Path, PathBuf};

/// File extension every note in the vault carries
pub const NOTE_EXTENSION: &str = ".md";

const LINK_OPEN: &str = "[[";
const LINK_CLOSE: &str = "]]";
const ALIAS_SEPARATOR: char = '|';

/// A wikilink target resolved to a note path relative to the vault root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteRef {
    relative_path: RelativePathBuf,
}

impl NoteRef {
    /// Parse the text of a link such as `![[Musik/Riff|the riff]]`.
    ///
    /// Brackets, a leading `!` and any `|alias` are dropped, whitespace is
    /// trimmed, and `.md` is appended unless already present.
    pub fn parse(link: &str) -> Self {
        let stripped = link.replace(LINK_OPEN, "").replace(LINK_CLOSE, "");
        let stripped = stripped.strip_prefix('!').unwrap_or(&stripped);
        let target = match stripped.find(ALIAS_SEPARATOR) {
            Some(idx) => &stripped[..idx],
            None => stripped,
        };
        let target = target.trim();

        let mut path = target.to_string();
        if !path.ends_with(NOTE_EXTENSION) {
            path.push_str(NOTE_EXTENSION);
        }

        Self {
            relative_path: RelativePathBuf::from(path),
        }
    }

    /// Get the relative path
    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// Get the note name without directory or extension
    pub fn display_name(&self) -> &str {
        self.relative_path
            .file_name()
            .map(|name| name.strip_suffix(NOTE_EXTENSION).unwrap_or(name))
            .unwrap_or("Untitled")
    }

    /// Resolve against the vault root
    pub fn to_path(&self, vault_root: &Path) -> PathBuf {
        self.relative_path.to_path(vault_root)
    }
}
