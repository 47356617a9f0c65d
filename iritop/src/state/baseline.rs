use super::history::CounterKey;
use crate::node::{CounterKind, PeerRecord};
use std::collections::{HashMap, HashSet};

/// Reference values the user can subtract from absolute counters, so the
/// table reads as "since I pressed the key" rather than "since node start".
#[derive(Debug, Default)]
pub struct BaselineStore {
    captured: HashMap<CounterKey, i64>,
    on: bool,
}

impl BaselineStore {
    pub fn new() -> BaselineStore {
        BaselineStore::default()
    }

    pub fn set_baseline(&mut self, address: &str, kind: CounterKind, absolute: i64) {
        self.captured.insert(CounterKey::new(address, kind), absolute);
    }

    /// Captures every counter of every peer in `peers`.
    pub fn capture<'a>(&mut self, peers: impl IntoIterator<Item = &'a PeerRecord>) {
        for peer in peers {
            for kind in CounterKind::ALL {
                self.set_baseline(&peer.address, kind, peer.counters.get(kind));
            }
        }
    }

    /// Flips baseline mode and returns the new state. Captured values are
    /// kept either way.
    pub fn toggle(&mut self) -> bool {
        self.on = !self.on;
        self.on
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn baseline(&self, address: &str, kind: CounterKind) -> i64 {
        self.captured
            .get(&CounterKey::new(address, kind))
            .copied()
            .unwrap_or(0)
    }

    /// Value to display for `absolute`. Not clamped: a negative result means
    /// the counter restarted upstream.
    pub fn displayed_value(&self, address: &str, kind: CounterKind, absolute: i64) -> i64 {
        if self.on {
            absolute.saturating_sub(self.baseline(address, kind))
        } else {
            absolute
        }
    }

    pub fn retain_peers(&mut self, peers: &HashSet<&str>) -> usize {
        let before = self.captured.len();
        self.captured
            .retain(|key, _| peers.contains(key.address.as_str()));
        before - self.captured.len()
    }
}
