//! Lazy pre-order traversal over a built tree.
//!
//! Both iterators walk the stored (name-sorted) child order, touch no
//! filesystem state, and can be restarted by calling the accessor again.
//! Dropping an iterator mid-walk leaves nothing to clean up.

use crate::item::{Item, ItemKind};

/// Flat pre-order iterator over all descendants of an item.
///
/// Directories are yielded before their contents. The starting item
/// itself is not yielded.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Item>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<&'a Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(item) => {
                    if let ItemKind::Directory { children } = &item.kind {
                        self.stack.push(children.iter());
                    }
                    return Some(item);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// One step of a structured traversal.
#[derive(Debug, Clone, Copy)]
pub enum WalkEvent<'a> {
    /// A descendant directory is being entered.
    EnterDir(&'a Item),
    /// A non-directory child of `dir` is being visited.
    Leaf { dir: &'a Item, item: &'a Item },
    /// A previously entered directory has been fully visited.
    ExitDir(&'a Item),
}

/// Structured enter/leaf/exit iterator over a tree.
///
/// `EnterDir` and `ExitDir` are emitted once per descendant directory and
/// nest exactly like the tree: every enter is closed by its exit after the
/// directory's whole subtree has been visited. The starting item itself is
/// never entered, so leaves directly below it report it as their `dir`.
#[derive(Debug, Clone)]
pub struct Events<'a> {
    stack: Vec<(&'a Item, std::slice::Iter<'a, Item>)>,
}

impl<'a> Iterator for Events<'a> {
    type Item = WalkEvent<'a>;

    fn next(&mut self) -> Option<WalkEvent<'a>> {
        loop {
            let (dir, iter) = self.stack.last_mut()?;
            let dir: &'a Item = *dir;
            match iter.next() {
                Some(child) => match &child.kind {
                    ItemKind::Directory { children } => {
                        self.stack.push((child, children.iter()));
                        return Some(WalkEvent::EnterDir(child));
                    }
                    _ => return Some(WalkEvent::Leaf { dir, item: child }),
                },
                None => {
                    let (done, _) = self.stack.pop()?;
                    if self.stack.is_empty() {
                        // The bottom frame is the starting item, which was
                        // never entered.
                        return None;
                    }
                    return Some(WalkEvent::ExitDir(done));
                }
            }
        }
    }
}

impl Item {
    /// Iterate over all descendants in pre-order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children().iter()],
        }
    }

    /// Iterate over the tree as structured enter/leaf/exit events.
    pub fn events(&self) -> Events<'_> {
        Events {
            stack: vec![(self, self.children().iter())],
        }
    }
}
