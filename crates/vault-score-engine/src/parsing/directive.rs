//! Line classification and the inline directive markers of a note.
//!
//! Matching is case-sensitive and purely textual. Each directive is removed
//! from the line everywhere it occurs once it has been recognised, so later
//! checks see the line without it.

/// Starts a new section
pub const HEADING: &str = "# ";
/// Starts a link line
pub const LINK_OPEN: &str = "[[";
/// Starts an embed-style link line
pub const EMBED_OPEN: &str = "![[";
/// Trailing marker: play the line [`REPEAT_COUNT`](crate::node::REPEAT_COUNT) times
pub const REPEAT: char = '*';
/// Put a rehearsal mark in front of the line
pub const MARK: &str = "!";
/// Emit a double bar line into the document
pub const BARLINE: &str = "||";
/// Emit a line break into the document
pub const BREAK: &str = "?";
/// Parse the linked note and splice its tree in
pub const NESTED: &str = "####";
/// Splice the linked note's raw text in
pub const RAW: &str = "+";

pub const MARK_SNIPPET: &str = "\\mark \\default";
pub const BARLINE_SNIPPET: &str = "\\bar \"||\"";
pub const BREAK_SNIPPET: &str = "\\break";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `# Title`, carrying the title text
    Heading(&'a str),
    /// `[[...]]` or `![[...]]`
    Link,
    /// Anything else; skipped without error
    Ignored,
}

pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(title) = line.strip_prefix(HEADING) {
        LineKind::Heading(title.trim())
    } else if line.starts_with(LINK_OPEN) || line.starts_with(EMBED_OPEN) {
        LineKind::Link
    } else {
        LineKind::Ignored
    }
}

/// Remove the repeat marker.
///
/// Only a line that *ends* with `*` counts as repeated, but then every `*`
/// in the line is removed.
pub fn strip_repeat(line: &str) -> (String, bool) {
    if line.ends_with(REPEAT) {
        (line.replace(REPEAT, ""), true)
    } else {
        (line.to_string(), false)
    }
}

/// How the target of a link line becomes content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// Recursively parsed note
    Nested,
    /// Literal file contents
    Raw,
    /// The link itself, as an embed
    Plain,
}

/// A link line with its directives pulled out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkLine {
    pub mark: bool,
    pub barline: bool,
    pub line_break: bool,
    pub inclusion: Inclusion,
    /// Remaining line text with mark, barline and break markers removed
    pub text: String,
}

impl LinkLine {
    pub fn extract(line: &str) -> Self {
        let mut text = line.to_string();
        let mark = take(&mut text, MARK);
        let barline = take(&mut text, BARLINE);
        let line_break = take(&mut text, BREAK);

        let inclusion = if text.contains(NESTED) {
            Inclusion::Nested
        } else if text.contains(RAW) {
            Inclusion::Raw
        } else {
            Inclusion::Plain
        };

        Self {
            mark,
            barline,
            line_break,
            inclusion,
            text,
        }
    }

    /// The link text with the inclusion marker removed
    pub fn target(&self) -> String {
        match self.inclusion {
            Inclusion::Nested => self.text.replace(NESTED, ""),
            Inclusion::Raw => self.text.replace(RAW, ""),
            Inclusion::Plain => self.text.clone(),
        }
    }

    /// Text of a plain reference, always embed-style.
    pub fn embed(&self) -> String {
        if self.text.starts_with('!') {
            self.text.clone()
        } else {
            format!("!{}", self.text)
        }
    }
}

fn take(text: &mut String, marker: &str) -> bool {
    if text.contains(marker) {
        *text = text.replace(marker, "");
        true
    } else {
        false
    }
}
