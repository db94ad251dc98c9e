//! Access-ordered entry storage
//!
//! Entries live in a slab of nodes linked into a doubly-linked list by slot index.
//! The head is the most recently used entry, the tail the least recently used.
//! A `HashMap` from key to slot gives O(1) lookup, touch, and removal.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use tokio::time::Instant;

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) inserted_at: Instant,
    prev: Option<usize>,
    next: Option<usize>,
}

pub(crate) struct AccessOrder<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K, V> AccessOrder<K, V>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn slot_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    pub(crate) fn node(&self, slot: usize) -> &Node<K, V> {
        self.slots[slot]
            .as_ref()
            .expect("indexed slot must hold a node")
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node<K, V> {
        self.slots[slot]
            .as_mut()
            .expect("indexed slot must hold a node")
    }

    /// Move an existing entry to the most-recently-used end
    pub(crate) fn touch(&mut self, slot: usize) {
        if self.head == Some(slot) {
            return;
        }
        self.unlink(slot);
        self.link_front(slot);
    }

    /// Replace the value of an existing entry, restamp it, and mark it most recently used
    pub(crate) fn replace(&mut self, slot: usize, value: V, now: Instant) {
        let node = self.node_mut(slot);
        node.value = value;
        node.inserted_at = now;
        self.touch(slot);
    }

    /// Insert a key that is not yet present at the most-recently-used end
    pub(crate) fn push_front(&mut self, key: K, value: V, now: Instant) {
        let node = Node {
            key: key.clone(),
            value,
            inserted_at: now,
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, slot);
        self.link_front(slot);
    }

    /// Remove the entry in `slot`, returning its node
    pub(crate) fn remove_slot(&mut self, slot: usize) -> Node<K, V> {
        self.unlink(slot);
        let node = self.slots[slot]
            .take()
            .expect("indexed slot must hold a node");
        self.index.remove(&node.key);
        self.free.push(slot);
        node
    }

    /// Remove and return the least recently used entry
    pub(crate) fn pop_back(&mut self) -> Option<Node<K, V>> {
        let tail = self.tail?;
        Some(self.remove_slot(tail))
    }

    pub(crate) fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    /// Keys from most to least recently used
    pub(crate) fn keys(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let node = self.node(slot);
            keys.push(node.key.clone());
            cursor = node.next;
        }
        keys
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = self.node(slot);
            (node.prev, node.next)
        };
        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
        let node = self.node_mut(slot);
        node.prev = None;
        node.next = None;
    }

    fn link_front(&mut self, slot: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(slot);
            node.prev = None;
            node.next = old_head;
        }
        if let Some(h) = old_head {
            self.node_mut(h).prev = Some(slot);
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_with(keys: &[&'static str]) -> AccessOrder<&'static str, u32> {
        let mut order = AccessOrder::with_capacity(keys.len());
        let now = Instant::now();
        for (i, key) in keys.iter().enumerate() {
            order.push_front(*key, i as u32, now);
        }
        order
    }

    #[test]
    fn test_push_front_orders_most_recent_first() {
        let order = order_with(&["a", "b", "c"]);
        assert_eq!(order.keys(), vec!["c", "b", "a"]);
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn test_touch_moves_to_front() {
        let mut order = order_with(&["a", "b", "c"]);
        let slot = order.slot_of("a").unwrap();
        order.touch(slot);
        assert_eq!(order.keys(), vec!["a", "c", "b"]);

        // Touching the head is a no-op
        order.touch(slot);
        assert_eq!(order.keys(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_pop_back_removes_least_recent() {
        let mut order = order_with(&["a", "b", "c"]);
        let evicted = order.pop_back().unwrap();
        assert_eq!(evicted.key, "a");
        assert_eq!(order.keys(), vec!["c", "b"]);
        assert!(order.slot_of("a").is_none());
    }

    #[test]
    fn test_remove_middle_slot_relinks_neighbours() {
        let mut order = order_with(&["a", "b", "c"]);
        let slot = order.slot_of("b").unwrap();
        let node = order.remove_slot(slot);
        assert_eq!(node.value, 1);
        assert_eq!(order.keys(), vec!["c", "a"]);
        assert_eq!(order.pop_back().unwrap().key, "a");
        assert_eq!(order.pop_back().unwrap().key, "c");
        assert!(order.pop_back().is_none());
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut order = order_with(&["a", "b"]);
        let freed = order.slot_of("a").unwrap();
        order.remove_slot(freed);
        order.push_front("c", 9, Instant::now());
        assert_eq!(order.slot_of("c"), Some(freed));
        assert_eq!(order.keys(), vec!["c", "b"]);
    }

    #[test]
    fn test_replace_updates_value_and_recency() {
        let mut order = order_with(&["a", "b"]);
        let slot = order.slot_of("a").unwrap();
        order.replace(slot, 42, Instant::now());
        assert_eq!(order.node(slot).value, 42);
        assert_eq!(order.keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut order = order_with(&["a", "b"]);
        order.clear();
        assert_eq!(order.len(), 0);
        assert!(order.keys().is_empty());
        assert!(order.pop_back().is_none());
    }
}
