//! Iterative tree walks.
//!
//! Documents may nest hundreds of thousands of levels deep, so nothing here
//! recurses.

use std::collections::VecDeque;
use std::slice;

use crate::Element;

/// Number of levels below a member list; zero when it is empty.
pub fn depth(members: &[Element]) -> usize {
    let mut max = 0;
    let mut stack = vec![members.iter()];
    while let Some(iter) = stack.last_mut() {
        match iter.next() {
            Some(element) => {
                max = max.max(stack.len());
                stack.push(element.members.iter());
            }
            None => {
                stack.pop();
            }
        }
    }
    max
}

/// Pairwise content comparison of two member lists.
pub(crate) fn members_eq(a: &[Element], b: &[Element]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut stack = vec![(a.iter(), b.iter())];
    while let Some((left, right)) = stack.last_mut() {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) => {
                if !x.shallow_eq(y) {
                    return false;
                }
                stack.push((x.members.iter(), y.members.iter()));
            }
            (None, None) => {
                stack.pop();
            }
            _ => return false,
        }
    }
    true
}

/// Post-order walk: every element comes after all of its members.
pub struct DepthFirst<'a> {
    stack: Vec<(Option<&'a Element>, slice::Iter<'a, Element>)>,
}

impl<'a> DepthFirst<'a> {
    /// Walk a member list. The owner of the list is not yielded.
    pub fn new(members: &'a [Element]) -> Self {
        Self {
            stack: vec![(None, members.iter())],
        }
    }

    /// Walk a subtree, ending with `root` itself.
    pub fn with_root(root: &'a Element) -> Self {
        Self::new(slice::from_ref(root))
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (_, iter) = self.stack.last_mut()?;
            match iter.next() {
                Some(child) => self.stack.push((Some(child), child.members.iter())),
                None => {
                    if let Some((Some(parent), _)) = self.stack.pop() {
                        return Some(parent);
                    }
                }
            }
        }
    }
}

/// Level-order walk: all elements at one depth before any deeper one.
pub struct BreadthFirst<'a> {
    queue: VecDeque<&'a Element>,
}

impl<'a> BreadthFirst<'a> {
    pub fn new(members: &'a [Element]) -> Self {
        Self {
            queue: members.iter().collect(),
        }
    }

    pub fn with_root(root: &'a Element) -> Self {
        Self::new(slice::from_ref(root))
    }
}

impl<'a> Iterator for BreadthFirst<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.queue.pop_front()?;
        self.queue.extend(element.members.iter());
        Some(element)
    }
}
