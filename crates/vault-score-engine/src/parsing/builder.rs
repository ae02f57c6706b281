use std::mem;
use std::path::PathBuf;

use super::directive::{
    self, BARLINE_SNIPPET, BREAK_SNIPPET, Inclusion, LineKind, LinkLine, MARK_SNIPPET,
};
use super::{ParseError, ParseOptions, ParsedDocument, parse_path};
use crate::io;
use crate::models::NoteRef;
use crate::node::{Composite, Node, NodeRef, RepeatDecorator, SelectingComposite};

/// Prefix of the leaf that stands in for an unreadable raw inclusion
pub const READ_ERROR_MARKER: &str = "ERROR_READING_FILE:";

/// Mutable state of one document parse
#[derive(Debug)]
struct ParseState {
    /// Section currently receiving link lines
    section: SelectingComposite,
    /// Finished sections, plus bar lines and breaks
    document: Composite,
    reading_first_section: bool,
    titles: Vec<String>,
}

impl Default for ParseState {
    fn default() -> Self {
        Self {
            section: SelectingComposite::new(),
            document: Composite::new(),
            reading_first_section: true,
            titles: Vec::new(),
        }
    }
}

/// Builds the node tree of one note, line by line.
///
/// A fresh builder is used for every note, including each nested inclusion.
/// `visiting` is the chain of notes currently being parsed above this one.
pub struct DocumentBuilder<'a> {
    options: &'a ParseOptions,
    visiting: &'a mut Vec<PathBuf>,
    state: ParseState,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(options: &'a ParseOptions, visiting: &'a mut Vec<PathBuf>) -> Self {
        Self {
            options,
            visiting,
            state: ParseState::default(),
        }
    }

    pub fn push_line(&mut self, line: &str) -> Result<(), ParseError> {
        let (line, repeat) = directive::strip_repeat(line);
        match directive::classify(&line) {
            LineKind::Heading(title) => self.start_section(title),
            LineKind::Link => self.push_link(&line, repeat)?,
            LineKind::Ignored => {}
        }
        Ok(())
    }

    pub fn finish(mut self) -> ParsedDocument {
        self.flush_section();
        ParsedDocument {
            root: Node::from(self.state.document).into_ref(),
            section_titles: self.state.titles,
        }
    }

    fn start_section(&mut self, title: &str) {
        if !self.state.reading_first_section {
            self.flush_section();
        }
        self.state.titles.push(title.to_string());
        self.state.reading_first_section = false;
    }

    fn flush_section(&mut self) {
        let section = mem::take(&mut self.state.section);
        log::debug!(
            "Closing section {:?} with {} alternatives",
            self.state.titles.last(),
            section.len()
        );
        self.state.document.add(Node::from(section).into_ref());
    }

    fn push_link(&mut self, line: &str, repeat: bool) -> Result<(), ParseError> {
        let link = LinkLine::extract(line);
        let mut composite = Composite::new();

        if link.mark {
            composite.add(Node::text(MARK_SNIPPET).into_ref());
        }
        // Bar lines and breaks go to the document, not the line
        if link.barline {
            self.state.document.add(Node::text(BARLINE_SNIPPET).into_ref());
        }
        if link.line_break {
            self.state.document.add(Node::text(BREAK_SNIPPET).into_ref());
        }

        let content = match link.inclusion {
            Inclusion::Nested => self.include_nested(&link)?,
            Inclusion::Raw => self.include_raw(&link),
            Inclusion::Plain => Node::text(link.embed()).into_ref(),
        };
        composite.add(content);

        let node = if repeat {
            Node::from(RepeatDecorator::new(Node::from(composite).into_ref()))
        } else {
            Node::from(composite)
        };
        self.state.section.add(node.into_ref());
        Ok(())
    }

    fn include_nested(&mut self, link: &LinkLine) -> Result<NodeRef, ParseError> {
        let note = NoteRef::parse(&link.target());
        let path = note.to_path(&self.options.vault_root);
        log::debug!("Including parsed note {} ({})", note.display_name(), path.display());
        let nested = parse_path(&path, self.options, self.visiting)?;
        Ok(nested.root)
    }

    fn include_raw(&self, link: &LinkLine) -> NodeRef {
        let note = NoteRef::parse(&link.target());
        let path = note.to_path(&self.options.vault_root);
        let text = match io::read_file(&path) {
            Ok(content) => content.lines().collect::<Vec<_>>().join("\n"),
            Err(e) => {
                log::warn!("Could not include {}: {e}", note.display_name());
                format!("{READ_ERROR_MARKER} {e}")
            }
        };
        Node::text(text).into_ref()
    }
}
