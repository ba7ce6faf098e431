//! Index-based doubly linked list.
//!
//! Recency-ordered policies (LRU, SLRU, FIFO) keep their keys in this list
//! and store the returned [`Handle`] next to each key in a map, giving O(1)
//! `move_to_front`, `remove` and `pop_back`.
//!
//! Nodes live in a `Vec` arena and link to each other by index. Slots freed by
//! `remove`/`pop_back` are recycled by the next `push_front`.

use crate::config::MAX_PREALLOCATION;
use core::fmt;

/// Stable reference to a node, valid until that node is removed.
pub type Handle = usize;

const NIL: usize = usize::MAX;

struct Node<T> {
    val: Option<T>,
    prev: usize,
    next: usize,
}

/// A doubly linked list ordered from front (most recent) to back (least recent).
pub struct List<T> {
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> List<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for up to `cap` nodes before
    /// reallocating.
    pub fn with_capacity(cap: usize) -> Self {
        List {
            nodes: Vec::with_capacity(cap.min(MAX_PREALLOCATION)),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    /// Number of values in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `val` at the front and returns its handle.
    pub fn push_front(&mut self, val: T) -> Handle {
        let node = Node {
            val: Some(val),
            prev: NIL,
            next: self.head,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };

        if self.head != NIL {
            self.nodes[self.head].prev = idx;
        } else {
            self.tail = idx;
        }
        self.head = idx;
        self.len += 1;
        idx
    }

    /// Moves the node at `handle` to the front. Stale handles are ignored.
    pub fn move_to_front(&mut self, handle: Handle) {
        if !self.is_live(handle) || handle == self.head {
            return;
        }
        self.unlink(handle);
        self.nodes[handle].prev = NIL;
        self.nodes[handle].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = handle;
        } else {
            self.tail = handle;
        }
        self.head = handle;
    }

    /// Removes the node at `handle` and returns its value.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if !self.is_live(handle) {
            return None;
        }
        self.unlink(handle);
        self.len -= 1;
        self.free.push(handle);
        self.nodes[handle].val.take()
    }

    /// Removes and returns the back (least recent) value.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.tail == NIL {
            return None;
        }
        self.remove(self.tail)
    }

    /// Returns the back (least recent) value without removing it.
    pub fn back(&self) -> Option<&T> {
        self.get(self.tail)
    }

    /// Returns the value at `handle`, if it is still live.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.nodes.get(handle).and_then(|node| node.val.as_ref())
    }

    /// Iterates from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    #[inline]
    fn is_live(&self, handle: Handle) -> bool {
        self.nodes
            .get(handle)
            .is_some_and(|node| node.val.is_some())
    }

    fn unlink(&mut self, idx: usize) {
        let Node { prev, next, .. } = self.nodes[idx];
        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Front-to-back iterator over a [`List`].
pub struct Iter<'a, T> {
    list: &'a List<T>,
    cursor: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let node = &self.list.nodes[self.cursor];
        self.cursor = node.next;
        node.val.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<T: Clone>(list: &List<T>) -> Vec<T> {
        list.iter().cloned().collect()
    }

    #[test]
    fn test_push_and_order() {
        let mut list = List::new();
        assert!(list.is_empty());
        list.push_front(1);
        list.push_front(2);
        list.push_front(3);
        assert_eq!(list.len(), 3);
        assert_eq!(collect(&list), vec![3, 2, 1]);
        assert_eq!(list.iter().next(), Some(&3));
        assert_eq!(list.back(), Some(&1));
    }

    #[test]
    fn test_move_to_front() {
        let mut list = List::new();
        let a = list.push_front("a");
        let b = list.push_front("b");
        let c = list.push_front("c");

        list.move_to_front(a);
        assert_eq!(collect(&list), vec!["a", "c", "b"]);
        list.move_to_front(b);
        assert_eq!(collect(&list), vec!["b", "a", "c"]);
        list.move_to_front(b);
        assert_eq!(collect(&list), vec!["b", "a", "c"]);
        list.move_to_front(c);
        assert_eq!(list.back(), Some(&"a"));
    }

    #[test]
    fn test_remove_middle_and_ends() {
        let mut list = List::new();
        let a = list.push_front(1);
        let b = list.push_front(2);
        let c = list.push_front(3);

        assert_eq!(list.remove(b), Some(2));
        assert_eq!(collect(&list), vec![3, 1]);
        assert_eq!(list.remove(b), None);
        assert_eq!(list.remove(c), Some(3));
        assert_eq!(list.iter().next(), Some(&1));
        assert_eq!(list.remove(a), Some(1));
        assert!(list.is_empty());
        assert_eq!(list.pop_back(), None);
    }

    #[test]
    fn test_pop_back_and_slot_reuse() {
        let mut list = List::new();
        list.push_front(1);
        list.push_front(2);
        assert_eq!(list.pop_back(), Some(1));
        let h = list.push_front(3);
        // the freed slot is recycled
        assert_eq!(h, 0);
        assert_eq!(collect(&list), vec![3, 2]);
        assert_eq!(list.pop_back(), Some(2));
        assert_eq!(list.pop_back(), Some(3));
        assert_eq!(list.pop_back(), None);
    }

    #[test]
    fn test_stale_handles_ignored() {
        let mut list = List::new();
        let a = list.push_front(1);
        list.push_front(2);
        list.remove(a);
        list.move_to_front(a);
        list.move_to_front(42);
        assert_eq!(collect(&list), vec![2]);
    }

    #[test]
    fn test_with_capacity_starts_empty() {
        let mut list = List::with_capacity(4);
        assert!(list.is_empty());
        assert_eq!(list.back(), None);
        list.push_front(9);
        assert_eq!(collect(&list), vec![9]);
    }

    #[test]
    fn test_with_huge_capacity() {
        let mut list = List::with_capacity(usize::MAX);
        list.push_front(1);
        list.push_front(2);
        assert_eq!(list.pop_back(), Some(1));
        assert_eq!(list.len(), 1);
    }
}
