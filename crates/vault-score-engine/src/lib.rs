//! # vault-score-engine
//!
//! Turns a vault of markdown notes into text, and the LilyPond fragments in
//! that text into an engraved score.
//!
//! ```text
//! note.md → parsing → Node tree → render → assembly → lily → engraver → PDF + MIDI
//! ```
//!
//! - [`parsing`] reads a note into a [`node::Node`] tree, following links
//!   into other notes.
//! - [`node`] renders the tree; sections pick one alternative per render
//!   using a [`random::RandomSource`].
//! - [`assembly`] merges `voiceXxx = { ... }` fragments into a score template.
//! - [`engraver`] hands the score to the external `lilypond` program.

pub mod assembly;
pub mod engraver;
pub mod io;
pub mod models;
pub mod node;
pub mod parsing;
pub mod random;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use assembly::{Assembler, AssemblyError};
pub use engraver::{EngraveError, Engraver, Engraving};
pub use io::IoError;
pub use models::NoteRef;
pub use node::{Composite, Node, NodeRef, RepeatDecorator, SelectingComposite, TextLeaf};
pub use parsing::{ParseError, ParseOptions, ParsedDocument, parse_file, parse_str};
pub use random::{FixedIndex, RandomSource, SeededRandom, ThreadRandom};
