/// Leaf node holding a fixed piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLeaf {
    content: String,
}

impl TextLeaf {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the stored text
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn render(&self) -> String {
        self.content.clone()
    }
}
