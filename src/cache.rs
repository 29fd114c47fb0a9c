//! Bounded cache for AI help responses, keyed by command and directory.
//!
//! Eviction is strictly FIFO by insertion order: once the cache is full the
//! oldest inserted entry goes first, and a lookup hit never refreshes an
//! entry's position. Re-inserting an existing key updates the value in place
//! without touching the order.

use std::collections::{HashMap, VecDeque};

pub const DEFAULT_CAPACITY: usize = 20;

type Key = (String, String);

#[derive(Debug)]
pub struct HelpCache {
    capacity: usize,
    entries: HashMap<Key, String>,
    order: VecDeque<Key>,
}

impl HelpCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, command: &str, cwd: &str) -> Option<&String> {
        self.entries.get(&(command.to_string(), cwd.to_string()))
    }

    pub fn contains(&self, command: &str, cwd: &str) -> bool {
        self.entries
            .contains_key(&(command.to_string(), cwd.to_string()))
    }

    pub fn insert(&mut self, command: &str, cwd: &str, response: String) {
        let key = (command.to_string(), cwd.to_string());
        if self.entries.insert(key.clone(), response).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }
}

impl Default for HelpCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
