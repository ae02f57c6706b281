use super::NodeRef;
use crate::random::RandomSource;

/// How many times a `*`-suffixed line is played.
pub const REPEAT_COUNT: usize = 32;

/// Decorator that renders its inner node [`REPEAT_COUNT`] times back to back.
#[derive(Debug)]
pub struct RepeatDecorator {
    inner: NodeRef,
}

impl RepeatDecorator {
    pub fn new(inner: NodeRef) -> Self {
        Self { inner }
    }

    /// Renders the inner node once per repetition, without a separator.
    ///
    /// Each repetition is a fresh render, so a selecting composite below the
    /// decorator draws again on every pass.
    pub fn render(&self, rng: &mut dyn RandomSource) -> String {
        let mut out = String::new();
        for _ in 0..REPEAT_COUNT {
            out.push_str(&self.inner.render(rng));
        }
        out
    }
}
