use std::rc::Rc;

use super::NodeRef;
use crate::random::RandomSource;

/// Ordered group of child nodes.
///
/// Children keep insertion order and the same node may appear more than once.
#[derive(Debug, Default)]
pub struct Composite {
    children: Vec<NodeRef>,
}

impl Composite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child at the end
    pub fn add(&mut self, child: NodeRef) {
        self.children.push(child);
    }

    /// Remove the first child that is the very same node as `child`.
    ///
    /// Identity is pointer identity, not structural equality: a different
    /// node with identical text is left alone. Returns the removed handle.
    pub fn remove(&mut self, child: &NodeRef) -> Option<NodeRef> {
        let index = self.children.iter().position(|c| Rc::ptr_eq(c, child))?;
        Some(self.children.remove(index))
    }

    /// Get the child at `index`
    pub fn child(&self, index: usize) -> Option<&NodeRef> {
        self.children.get(index)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Concatenates every child's text, each followed by `\n`.
    pub fn render(&self, rng: &mut dyn RandomSource) -> String {
        let mut out = String::new();
        for child in &self.children {
            out.push_str(&child.render(rng));
            out.push('\n');
        }
        out
    }
}

/// Composite that renders exactly one of its children, drawn at random.
///
/// This is how a section of alternatives works: each render samples one
/// child. Nothing is remembered between renders.
#[derive(Debug, Default)]
pub struct SelectingComposite {
    inner: Composite,
}

impl SelectingComposite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, child: NodeRef) {
        self.inner.add(child);
    }

    pub fn remove(&mut self, child: &NodeRef) -> Option<NodeRef> {
        self.inner.remove(child)
    }

    pub fn child(&self, index: usize) -> Option<&NodeRef> {
        self.inner.child(index)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn render(&self, rng: &mut dyn RandomSource) -> String {
        if self.inner.is_empty() {
            return String::new();
        }
        let index = rng.pick_index(self.inner.len());
        match self.inner.child(index) {
            Some(child) => child.render(rng),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::random::{FixedIndex, SeededRandom};
    use pretty_assertions::assert_eq;

    fn leaf(text: &str) -> NodeRef {
        Node::text(text).into_ref()
    }

    #[test]
    fn test_composite_renders_children_in_order() {
        let mut composite = Composite::new();
        composite.add(leaf("a"));
        composite.add(leaf("b"));
        composite.add(leaf("c"));

        assert_eq!(composite.render(&mut FixedIndex(0)), "a\nb\nc\n");
    }

    #[test]
    fn test_empty_composite_renders_empty() {
        assert_eq!(Composite::new().render(&mut FixedIndex(0)), "");
    }

    #[test]
    fn test_composite_allows_duplicates() {
        let a = leaf("a");
        let mut composite = Composite::new();
        composite.add(Rc::clone(&a));
        composite.add(a);

        assert_eq!(composite.len(), 2);
        assert_eq!(composite.render(&mut FixedIndex(0)), "a\na\n");
    }

    #[test]
    fn test_remove_by_identity() {
        // Given two structurally equal leaves
        let first = leaf("same");
        let second = leaf("same");
        let mut composite = Composite::new();
        composite.add(Rc::clone(&first));
        composite.add(Rc::clone(&second));

        // When removing the second one
        let removed = composite.remove(&second).unwrap();

        // Then exactly that node is gone
        assert!(Rc::ptr_eq(&removed, &second));
        assert_eq!(composite.len(), 1);
        assert!(Rc::ptr_eq(composite.child(0).unwrap(), &first));
    }

    #[test]
    fn test_remove_unknown_node_is_noop() {
        let mut composite = Composite::new();
        composite.add(leaf("a"));

        assert!(composite.remove(&leaf("a")).is_none());
        assert_eq!(composite.len(), 1);
    }

    #[test]
    fn test_child_out_of_range() {
        let composite = Composite::new();
        assert!(composite.child(0).is_none());
    }

    #[test]
    fn test_selecting_empty_renders_empty() {
        let selecting = SelectingComposite::new();
        for _ in 0..10 {
            assert_eq!(selecting.render(&mut SeededRandom::new(7)), "");
        }
    }

    #[test]
    fn test_selecting_uses_injected_index() {
        let mut selecting = SelectingComposite::new();
        selecting.add(leaf("A"));
        selecting.add(leaf("B"));
        selecting.add(leaf("C"));

        let mut rng = FixedIndex(1);
        for _ in 0..1000 {
            assert_eq!(selecting.render(&mut rng), "B");
        }
    }

    #[test]
    fn test_selecting_manages_children_like_composite() {
        // Given a section with three alternatives
        let b = leaf("B");
        let mut selecting = SelectingComposite::new();
        selecting.add(leaf("A"));
        selecting.add(Rc::clone(&b));
        selecting.add(leaf("C"));

        // When removing the middle one by identity
        assert!(selecting.remove(&b).is_some());

        // Then lookups shift and rendering still picks a single child
        assert_eq!(selecting.len(), 2);
        assert!(!selecting.is_empty());
        assert_eq!(selecting.child(1).unwrap().render(&mut FixedIndex(0)), "C");
        assert_eq!(selecting.render(&mut FixedIndex(1)), "C");
    }

    #[test]
    fn test_selecting_renders_only_one_child() {
        let mut selecting = SelectingComposite::new();
        selecting.add(leaf("A"));
        selecting.add(leaf("B"));

        let mut rng = SeededRandom::new(42);
        for _ in 0..100 {
            let out = selecting.render(&mut rng);
            assert!(out == "A" || out == "B", "unexpected render {out:?}");
        }
    }

    #[test]
    fn test_selecting_eventually_visits_every_child() {
        let mut selecting = SelectingComposite::new();
        selecting.add(leaf("A"));
        selecting.add(leaf("B"));
        selecting.add(leaf("C"));

        let mut rng = SeededRandom::new(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(selecting.render(&mut rng));
        }
        assert_eq!(seen.len(), 3);
    }
}
