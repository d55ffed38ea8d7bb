//! Child-list management and grouping nodes.
//!
//! Children are drawn in insertion order, so later children paint on top
//! of earlier ones. There is no z-index reordering; a node's position in
//! the list is its depth. A failing child stops the traversal and hands
//! the error to whoever owns the list.

use crate::error::DrawError;
use crate::surface::DrawContext;
use smallvec::SmallVec;
use std::fmt;

/// A node that can render itself into the shared 2d context.
pub trait Drawable<C: DrawContext> {
    fn draw(&mut self, ctx: &C) -> Result<(), DrawError>;
}

/// Ordered storage for drawable children.
pub struct ChildContainer<C: DrawContext> {
    children: SmallVec<[Box<dyn Drawable<C>>; 4]>,
}

impl<C: DrawContext> ChildContainer<C> {
    pub fn new() -> Self {
        Self {
            children: SmallVec::new(),
        }
    }

    /// Append a child at the top of the paint order.
    pub fn add(&mut self, child: impl Drawable<C> + 'static) {
        self.children.push(Box::new(child));
    }

    /// Remove and return the child at `index`, shifting later children
    /// down one paint level.
    pub fn remove(&mut self, index: usize) -> Option<Box<dyn Drawable<C>>> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Draw every child in insertion order. Stops at the first failure
    /// and returns it; earlier children have already painted.
    pub fn draw_all(&mut self, ctx: &C) -> Result<(), DrawError> {
        for child in self.children.iter_mut() {
            child.draw(ctx)?;
        }
        Ok(())
    }
}

impl<C: DrawContext> Default for ChildContainer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DrawContext> fmt::Debug for ChildContainer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildContainer")
            .field("len", &self.len())
            .finish()
    }
}

/// A grouping node: owns its own child list and draws it in order.
///
/// Failures propagate upward unchanged, so a failing grandchild aborts
/// the frame exactly as a failing direct child would.
pub struct Group<C: DrawContext> {
    children: ChildContainer<C>,
}

impl<C: DrawContext> Group<C> {
    pub fn new() -> Self {
        Self {
            children: ChildContainer::new(),
        }
    }

    pub fn add(&mut self, child: impl Drawable<C> + 'static) {
        self.children.add(child);
    }

    pub fn remove(&mut self, index: usize) -> Option<Box<dyn Drawable<C>>> {
        self.children.remove(index)
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<C: DrawContext> Default for Group<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DrawContext> fmt::Debug for Group<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group").field("len", &self.len()).finish()
    }
}

impl<C: DrawContext> Drawable<C> for Group<C> {
    fn draw(&mut self, ctx: &C) -> Result<(), DrawError> {
        self.children.draw_all(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::RecordingContext;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Probe {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        fail: bool,
    }

    impl Drawable<RecordingContext> for Probe {
        fn draw(&mut self, _ctx: &RecordingContext) -> Result<(), DrawError> {
            self.log.borrow_mut().push(self.name);
            if self.fail {
                return Err(DrawError::new(format!("{} failed", self.name)));
            }
            Ok(())
        }
    }

    fn probe(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Probe {
        Probe {
            name,
            log: Rc::clone(log),
            fail: false,
        }
    }

    #[test]
    fn draws_in_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let ctx = RecordingContext::new();
        let mut container = ChildContainer::new();
        container.add(probe("back", &log));
        container.add(probe("middle", &log));
        container.add(probe("front", &log));

        container.draw_all(&ctx).unwrap();
        assert_eq!(*log.borrow(), vec!["back", "middle", "front"]);
    }

    #[test]
    fn stops_at_first_failure() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let ctx = RecordingContext::new();
        let mut container = ChildContainer::new();
        container.add(probe("first", &log));
        container.add(Probe {
            name: "broken",
            log: Rc::clone(&log),
            fail: true,
        });
        container.add(probe("never", &log));

        let err = container.draw_all(&ctx).unwrap_err();
        assert_eq!(err.to_string(), "broken failed");
        assert_eq!(*log.borrow(), vec!["first", "broken"]);
    }

    #[test]
    fn removed_children_do_not_draw() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let ctx = RecordingContext::new();
        let mut container = ChildContainer::new();
        container.add(probe("keep", &log));
        container.add(probe("drop", &log));

        assert!(container.remove(1).is_some());
        assert!(container.remove(7).is_none());
        container.draw_all(&ctx).unwrap();
        assert_eq!(*log.borrow(), vec!["keep"]);
    }

    #[test]
    fn group_propagates_grandchild_failure() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let ctx = RecordingContext::new();

        let mut group = Group::new();
        group.add(probe("inner_ok", &log));
        group.add(Probe {
            name: "inner_bad",
            log: Rc::clone(&log),
            fail: true,
        });

        let mut container = ChildContainer::new();
        container.add(group);
        container.add(probe("after_group", &log));

        assert!(container.draw_all(&ctx).is_err());
        assert_eq!(*log.borrow(), vec!["inner_ok", "inner_bad"]);
    }
}
