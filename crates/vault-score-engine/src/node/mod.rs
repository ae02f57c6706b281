//! The renderable composite tree.
//!
//! A parsed note becomes a tree of [`Node`]s. Every variant knows how to turn
//! itself into text; the variants differ only in how they combine the text of
//! their children.
//!
//! ```text
//! Composite (document)
//! ├── Selecting (section "# Intro")
//! │   ├── Composite (line)  -> "\mark \default", "![[Riff A]]"
//! │   └── Repeat ×32
//! │       └── Composite (line) -> "![[Riff B]]"
//! ├── Text "\bar \"||\""
//! └── Selecting (section "# Outro")
//! ```

mod composite;
mod leaf;
mod repeat;

use std::rc::Rc;

pub use composite::{Composite, SelectingComposite};
pub use leaf::TextLeaf;
pub use repeat::{REPEAT_COUNT, RepeatDecorator};

use crate::random::{RandomSource, ThreadRandom};

/// Shared handle to a node.
///
/// Composites hold their children through this handle so a child can be
/// removed again by identity, and so a nested note's subtree can be handed to
/// its parent without copying.
pub type NodeRef = Rc<Node>;

/// A unit of the renderable tree.
#[derive(Debug)]
pub enum Node {
    /// Literal text.
    Text(TextLeaf),
    /// Every child in order, each followed by a line break.
    Composite(Composite),
    /// One child picked at random per render.
    Selecting(SelectingComposite),
    /// The wrapped node repeated [`REPEAT_COUNT`] times.
    Repeat(RepeatDecorator),
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(TextLeaf::new(content))
    }

    /// Produce the text representation of this node.
    ///
    /// Rendering never mutates the tree. The only source of variation between
    /// calls is the draw `rng` makes for each [`SelectingComposite`].
    pub fn render(&self, rng: &mut dyn RandomSource) -> String {
        match self {
            Node::Text(leaf) => leaf.render(),
            Node::Composite(composite) => composite.render(rng),
            Node::Selecting(selecting) => selecting.render(rng),
            Node::Repeat(repeat) => repeat.render(rng),
        }
    }

    /// Render using the process-local generator.
    pub fn render_with_thread_rng(&self) -> String {
        self.render(&mut ThreadRandom)
    }

    pub fn into_ref(self) -> NodeRef {
        Rc::new(self)
    }
}

impl From<TextLeaf> for Node {
    fn from(leaf: TextLeaf) -> Self {
        Node::Text(leaf)
    }
}

impl From<Composite> for Node {
    fn from(composite: Composite) -> Self {
        Node::Composite(composite)
    }
}

impl From<SelectingComposite> for Node {
    fn from(selecting: SelectingComposite) -> Self {
        Node::Selecting(selecting)
    }
}

impl From<RepeatDecorator> for Node {
    fn from(repeat: RepeatDecorator) -> Self {
        Node::Repeat(repeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedIndex;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dispatch_reaches_every_variant() {
        let mut rng = FixedIndex(0);

        let text = Node::text("a");
        assert_eq!(text.render(&mut rng), "a");

        let mut composite = Composite::new();
        composite.add(Node::text("a").into_ref());
        assert_eq!(Node::from(composite).render(&mut rng), "a\n");

        let mut selecting = SelectingComposite::new();
        selecting.add(Node::text("a").into_ref());
        assert_eq!(Node::from(selecting).render(&mut rng), "a");

        let repeat = RepeatDecorator::new(Node::text("a").into_ref());
        assert_eq!(Node::from(repeat).render(&mut rng), "a".repeat(REPEAT_COUNT));
    }

    #[test]
    fn test_rendering_is_idempotent_without_selection() {
        // Given a tree with no selecting composite
        let mut line = Composite::new();
        line.add(Node::text("\\mark \\default").into_ref());
        line.add(Node::text("![[Riff]]").into_ref());
        let mut root = Composite::new();
        root.add(Node::from(line).into_ref());
        let root = Node::from(root);

        // When rendering twice with the thread generator
        let first = root.render_with_thread_rng();
        let second = root.render_with_thread_rng();

        // Then both renders agree
        assert_eq!(first, second);
        assert_eq!(first, "\\mark \\default\n![[Riff]]\n\n");
    }

    #[test]
    fn test_shared_subtree_renders_in_every_parent() {
        let shared = Node::text("shared").into_ref();

        let mut left = Composite::new();
        left.add(Rc::clone(&shared));
        let mut right = Composite::new();
        right.add(Rc::clone(&shared));
        right.add(shared);

        let mut rng = FixedIndex(0);
        assert_eq!(Node::from(left).render(&mut rng), "shared\n");
        assert_eq!(Node::from(right).render(&mut rng), "shared\nshared\n");
    }
}
