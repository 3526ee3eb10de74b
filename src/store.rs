use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use tokio::time::{Duration, Instant};

/// The Store owns the three data containers: strings with optional
/// time-to-live, hashes, and lists. Each container is guarded by its own
/// reader/writer lock so readers proceed concurrently and unrelated
/// containers never contend. The store is designed to be shared and cloned
/// cheaply using reference counting.
///
/// Expiry is lazy: an entry whose deadline has passed stays in the map until
/// the next operation observes it, and every operation treats such an entry
/// as absent.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Containers>,
}

struct Containers {
    strings: RwLock<HashMap<String, StringEntry>>,
    hashes: RwLock<HashMap<String, HashMap<String, String>>>,
    lists: RwLock<HashMap<String, VecDeque<Bytes>>>,
}

pub struct StringEntry {
    pub data: Bytes,
    pub expires_at: Option<Instant>,
}

impl StringEntry {
    fn is_expired(&self) -> bool {
        self.expires_at
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }
}

/// Conditional flags for `EXPIRE`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExpireOption {
    /// Apply only when the key has no expiry.
    Nx,
    /// Apply only when the key already has an expiry.
    Xx,
    /// Apply only when the new deadline is strictly later than the current
    /// one, or there is none.
    Gt,
    /// Apply only when the new deadline is strictly earlier than the current
    /// one, or there is none.
    Lt,
}

impl Store {
    pub fn new() -> Store {
        Store {
            inner: Arc::new(Containers {
                strings: RwLock::new(HashMap::new()),
                hashes: RwLock::new(HashMap::new()),
                lists: RwLock::new(HashMap::new()),
            }),
        }
    }

    pub fn set(&self, key: String, data: Bytes, ttl: Option<Duration>) {
        let entry = StringEntry {
            data,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.inner.strings.write().unwrap().insert(key, entry);
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        {
            let strings = self.inner.strings.read().unwrap();
            match strings.get(key) {
                Some(entry) if !entry.is_expired() => return Some(entry.data.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // The entry was observed expired under the read lock. Re-check under
        // the write lock before removing it; another writer may have replaced
        // it in between.
        let mut strings = self.inner.strings.write().unwrap();
        if strings.get(key).is_some_and(|entry| entry.is_expired()) {
            strings.remove(key);
        }
        None
    }

    /// Removes `key` from the string container. An expired entry is dropped
    /// but reported as absent.
    pub fn remove(&self, key: &str) -> bool {
        let mut strings = self.inner.strings.write().unwrap();
        match strings.remove(key) {
            Some(entry) => !entry.is_expired(),
            None => false,
        }
    }

    /// Sets the expiry of `key` to `ttl` from now, subject to `option`.
    /// Returns whether the expiry was applied.
    pub fn expire(&self, key: &str, ttl: Duration, option: Option<ExpireOption>) -> bool {
        let mut strings = self.inner.strings.write().unwrap();

        let current = match strings.get(key) {
            Some(entry) if !entry.is_expired() => entry.expires_at,
            Some(_) => {
                strings.remove(key);
                return false;
            }
            None => return false,
        };

        let deadline = Instant::now() + ttl;
        let applies = match option {
            None => true,
            Some(ExpireOption::Nx) => current.is_none(),
            Some(ExpireOption::Xx) => current.is_some(),
            Some(ExpireOption::Gt) => current.map_or(true, |c| deadline > c),
            Some(ExpireOption::Lt) => current.map_or(true, |c| deadline < c),
        };

        if applies {
            if let Some(entry) = strings.get_mut(key) {
                entry.expires_at = Some(deadline);
            }
        }
        applies
    }

    pub fn hset(&self, hash: String, field: String, value: String) {
        self.inner
            .hashes
            .write()
            .unwrap()
            .entry(hash)
            .or_default()
            .insert(field, value);
    }

    pub fn hget(&self, hash: &str, field: &str) -> Option<String> {
        self.inner
            .hashes
            .read()
            .unwrap()
            .get(hash)
            .and_then(|fields| fields.get(field).cloned())
    }

    /// All field/value pairs of `hash`, or `None` when the hash does not
    /// exist. Iteration order is unspecified.
    pub fn hgetall(&self, hash: &str) -> Option<Vec<(String, String)>> {
        self.inner.hashes.read().unwrap().get(hash).map(|fields| {
            fields
                .iter()
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect()
        })
    }

    pub fn push_front(&self, key: &str, value: Bytes) -> usize {
        let mut lists = self.inner.lists.write().unwrap();
        let list = lists.entry(key.to_string()).or_default();
        list.push_front(value);
        list.len()
    }

    pub fn push_back(&self, key: &str, values: Vec<Bytes>) -> usize {
        let mut lists = self.inner.lists.write().unwrap();
        let list = lists.entry(key.to_string()).or_default();
        list.extend(values);
        list.len()
    }

    /// Pops up to `count` elements from the head of the list, in pop order.
    /// A drained list is removed from the container so the list-name map
    /// does not accumulate empty entries.
    pub fn pop_front(&self, key: &str, count: usize) -> Vec<Bytes> {
        self.pop(key, count, VecDeque::pop_front)
    }

    pub fn pop_back(&self, key: &str, count: usize) -> Vec<Bytes> {
        self.pop(key, count, VecDeque::pop_back)
    }

    fn pop(
        &self,
        key: &str,
        count: usize,
        pop_one: fn(&mut VecDeque<Bytes>) -> Option<Bytes>,
    ) -> Vec<Bytes> {
        let mut lists = self.inner.lists.write().unwrap();

        let Some(list) = lists.get_mut(key) else {
            return Vec::new();
        };

        let mut popped = Vec::with_capacity(count.min(list.len()));
        for _ in 0..count {
            match pop_one(list) {
                Some(value) => popped.push(value),
                None => break,
            }
        }

        if list.is_empty() {
            lists.remove(key);
        }
        popped
    }

    /// Pops the head of the first non-empty list among `keys`, in the order
    /// given. A single pass under one lock acquisition; callers that want to
    /// block retry this between sleeps.
    pub fn pop_front_any(&self, keys: &[String]) -> Option<(String, Bytes)> {
        let mut lists = self.inner.lists.write().unwrap();

        for key in keys {
            if let Some(list) = lists.get_mut(key) {
                if let Some(value) = list.pop_front() {
                    if list.is_empty() {
                        lists.remove(key);
                    }
                    return Some((key.clone(), value));
                }
            }
        }
        None
    }

    pub fn list_len(&self, key: &str) -> usize {
        self.inner
            .lists
            .read()
            .unwrap()
            .get(key)
            .map(VecDeque::len)
            .unwrap_or(0)
    }

    /// Elements `[start, end]` of the list, both inclusive and 0-indexed
    /// from the head. `end == -1` means the tail; an `end` past the tail is
    /// clamped. A `start` outside `[0, len)` or an `end` before `start`
    /// yields no elements.
    pub fn list_range(&self, key: &str, start: i64, end: i64) -> Vec<Bytes> {
        let lists = self.inner.lists.read().unwrap();

        let Some(list) = lists.get(key) else {
            return Vec::new();
        };

        let len = list.len() as i64;
        if start < 0 || start >= len {
            return Vec::new();
        }

        let end = if end == -1 || end >= len { len - 1 } else { end };
        if end < start {
            return Vec::new();
        }

        list.iter()
            .skip(start as usize)
            .take((end - start + 1) as usize)
            .cloned()
            .collect()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
