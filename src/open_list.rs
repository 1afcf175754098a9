use std::collections::BTreeMap;

use crate::node::Key;

/// Position of an entry in the [OpenList]. A node stores the token it was inserted with so it
/// can later be removed without searching the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpenToken {
    key: Key,
    seq: u64,
}

impl OpenToken {
    pub fn key(&self) -> Key {
        self.key
    }
}

/// Ascending priority queue of inconsistent nodes, referenced by their store index.
/// Duplicate keys are allowed; entries with equal keys pop in insertion order.
#[derive(Clone, Debug, Default)]
pub struct OpenList {
    entries: BTreeMap<OpenToken, usize>,
    next_seq: u64,
}

impl OpenList {
    pub fn new() -> OpenList {
        OpenList::default()
    }

    pub fn insert(&mut self, key: Key, node: usize) -> OpenToken {
        let token = OpenToken {
            key,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.entries.insert(token, node);
        token
    }

    pub fn remove(&mut self, token: OpenToken) -> Option<usize> {
        self.entries.remove(&token)
    }

    pub fn peek(&self) -> Option<(Key, usize)> {
        self.entries
            .first_key_value()
            .map(|(token, &node)| (token.key, node))
    }

    pub fn pop(&mut self) -> Option<(Key, usize)> {
        self.entries
            .pop_first()
            .map(|(token, node)| (token.key, node))
    }

    pub fn top_key(&self) -> Key {
        self.peek().map_or(Key::INFINITE, |(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_seq = 0;
    }

    /// Store indices of queued nodes in pop order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.values().copied()
    }
}
