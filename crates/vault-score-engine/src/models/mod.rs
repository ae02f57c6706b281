pub mod note_ref;

pub use note_ref::{NOTE_EXTENSION, NoteRef};
