use crate::node::CounterKind;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct CounterKey {
    pub address: String,
    pub kind: CounterKind,
}

impl CounterKey {
    pub fn new(address: &str, kind: CounterKind) -> CounterKey {
        CounterKey {
            address: address.to_string(),
            kind,
        }
    }
}

/// Last absolute value seen for every counter, used to turn absolute
/// counters into per-poll deltas.
#[derive(Debug, Default)]
pub struct CounterHistory {
    last: HashMap<CounterKey, i64>,
}

impl CounterHistory {
    pub fn new() -> CounterHistory {
        CounterHistory::default()
    }

    /// Records `absolute` and returns the change since the previous call for
    /// this key. The first observation, or one following a non-positive
    /// value, yields 0.
    pub fn update(&mut self, address: &str, kind: CounterKind, absolute: i64) -> i64 {
        match self.last.insert(CounterKey::new(address, kind), absolute) {
            Some(previous) if previous > 0 => absolute.saturating_sub(previous),
            _ => 0,
        }
    }

    pub fn last(&self, address: &str, kind: CounterKind) -> Option<i64> {
        self.last.get(&CounterKey::new(address, kind)).copied()
    }

    /// Drops every key whose peer is not in `peers`. Returns how many
    /// entries were removed.
    pub fn retain_peers(&mut self, peers: &HashSet<&str>) -> usize {
        let before = self.last.len();
        self.last.retain(|key, _| peers.contains(key.address.as_str()));
        before - self.last.len()
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
