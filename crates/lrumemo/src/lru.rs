//! Recency ordering for cached keys
//!
//! Index-based doubly-linked list: nodes live in an arena of slots and link
//! to each other by slot index. A node keeps its slot for its whole
//! lifetime, so callers can hold the index as a stable handle.

/// Node in the recency list
struct Node<K> {
    key: K,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Keys ordered from most recently used (head) to least recently used (tail)
pub(crate) struct RecencyList<K> {
    nodes: Vec<Option<Node<K>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K> RecencyList<K> {
    /// Create an empty list with room for `capacity` nodes
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `key` as the most recent node and return its slot
    pub(crate) fn push_front(&mut self, key: K) -> usize {
        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key,
            prev: None,
            next: self.head,
        });

        match self.head {
            Some(head_idx) => {
                if let Some(head) = &mut self.nodes[head_idx] {
                    head.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }

        self.head = Some(idx);
        self.len += 1;
        idx
    }

    /// Make the node in `idx` the most recent one
    pub(crate) fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) || self.nodes.get(idx).map_or(true, Option::is_none) {
            return;
        }

        self.unlink(idx);

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        match self.head {
            Some(head_idx) => {
                if let Some(head) = &mut self.nodes[head_idx] {
                    head.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }

        self.head = Some(idx);
    }

    /// Detach and return the least recent key
    pub(crate) fn pop_back(&mut self) -> Option<K> {
        let tail_idx = self.tail?;
        self.remove(tail_idx)
    }

    /// Detach the node in `idx` and return its key
    pub(crate) fn remove(&mut self, idx: usize) -> Option<K> {
        if self.nodes.get(idx).map_or(true, Option::is_none) {
            return None;
        }

        self.unlink(idx);
        self.free_list.push(idx);
        self.len -= 1;
        self.nodes[idx].take().map(|node| node.key)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Keys from most recent to least recent
    pub(crate) fn iter(&self) -> Iter<'_, K> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &self.nodes[idx] {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }
}

/// Iterator over keys, most recent first
pub(crate) struct Iter<'a, K> {
    list: &'a RecencyList<K>,
    cursor: Option<usize>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.nodes[self.cursor?].as_ref()?;
        self.cursor = node.next;
        Some(&node.key)
    }
}
