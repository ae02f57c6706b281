use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Fence that opens a LilyPond code block in a note
pub const LILY_FENCE: &str = "```lily";
/// Bare fence, closing any code block
pub const FENCE: &str = "```";

/// Remove code fences so the LilyPond inside reads as one stream.
pub fn strip_fences(text: &str) -> String {
    text.replace(LILY_FENCE, "").replace(FENCE, "")
}

fn voice_header() -> &'static Regex {
    static VOICE_HEADER: OnceLock<Regex> = OnceLock::new();
    VOICE_HEADER.get_or_init(|| Regex::new(r"(voice\w+)\s*=\s*\{").expect("Invalid voice regex"))
}

/// Voice definitions grouped by name, in the order names were first seen
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VoiceMap {
    voices: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl VoiceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a body to `name`, registering the name if it is new
    pub fn push(&mut self, name: &str, body: String) {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => {
                self.voices.push((name.to_string(), Vec::new()));
                self.index.insert(name.to_string(), self.voices.len() - 1);
                self.voices.len() - 1
            }
        };
        self.voices[slot].1.push(body);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.voices.iter().map(|(name, _)| name.as_str())
    }

    pub fn bodies(&self, name: &str) -> Option<&[String]> {
        self.index
            .get(name)
            .map(|&slot| self.voices[slot].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// One merged definition per voice:
    ///
    /// ```text
    /// voiceA = {
    ///   <body 1>
    ///   <body 2>
    /// }
    ///
    /// ```
    pub fn assemble(&self) -> String {
        let mut out = String::new();
        for (name, bodies) in &self.voices {
            out.push_str(name);
            out.push_str(" = {\n");
            for body in bodies {
                out.push_str("  ");
                out.push_str(body);
                out.push('\n');
            }
            out.push_str("}\n\n");
        }
        out
    }
}

/// Collect every `voiceXxx = { ... }` definition in `text`.
///
/// The body runs to the brace that balances the opening one, so nested
/// groups such as `\tuplet 3/2 { c d e }` stay inside it. Bodies are trimmed
/// and kept in order; repeated names accumulate rather than replace. A
/// body whose braces never balance ends at its first `}` instead, and the
/// scan carries on after it. Only a body with no `}` at all ends the scan.
pub fn extract_voices(text: &str) -> VoiceMap {
    let mut voices = VoiceMap::new();
    let mut pos = 0;

    while let Some(caps) = voice_header().captures_at(text, pos) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let body_start = whole.end();
        let rest = &text[body_start..];
        let Some(body_end) = closing_brace(rest).or_else(|| {
            log::warn!("Unbalanced braces in {}, ending it at the first `}}`", name.as_str());
            rest.find('}')
        }) else {
            log::warn!("Unterminated definition of {}", name.as_str());
            break;
        };
        let body = &text[body_start..body_start + body_end];
        voices.push(name.as_str(), body.trim().to_string());
        pos = body_start + body_end + 1;
    }

    voices
}

/// Byte offset of the `}` closing a group whose `{` was just consumed
fn closing_brace(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
