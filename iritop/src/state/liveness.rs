use std::collections::{HashMap, HashSet};

/// Polls of zero all-transaction delta after which a peer is considered
/// incommunicado.
pub const DEFAULT_INCOMMUNICADO_THRESHOLD: u32 = 12;

/// Tracks runs of zero-traffic polls per peer. Purely advisory: it only
/// drives styling, peers are never hidden because of it.
#[derive(Debug)]
pub struct LivenessClassifier {
    threshold: u32,
    streaks: HashMap<String, u32>,
}

impl Default for LivenessClassifier {
    fn default() -> Self {
        LivenessClassifier::new(DEFAULT_INCOMMUNICADO_THRESHOLD)
    }
}

impl LivenessClassifier {
    pub fn new(threshold: u32) -> LivenessClassifier {
        LivenessClassifier {
            threshold,
            streaks: HashMap::new(),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Feeds one poll's all-transaction delta and returns whether the peer
    /// is now incommunicado.
    pub fn observe(&mut self, address: &str, all_tx_delta: i64) -> bool {
        let streak = self.streaks.entry(address.to_string()).or_insert(0);
        if all_tx_delta == 0 {
            *streak = streak.saturating_add(1);
        } else {
            *streak = 0;
        }
        *streak > self.threshold
    }

    pub fn is_incommunicado(&self, address: &str) -> bool {
        self.streak(address) > self.threshold
    }

    pub fn streak(&self, address: &str) -> u32 {
        self.streaks.get(address).copied().unwrap_or(0)
    }

    pub fn retain_peers(&mut self, peers: &HashSet<&str>) -> usize {
        let before = self.streaks.len();
        self.streaks.retain(|address, _| peers.contains(address.as_str()));
        before - self.streaks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        for threshold in [0, 1, 2, 12] {
            let mut liveness = LivenessClassifier::new(threshold);
            for _ in 0..threshold {
                assert!(!liveness.observe("a", 0));
            }
            assert!(liveness.observe("a", 0), "threshold {threshold}");
            assert!(liveness.is_incommunicado("a"));
        }
    }

    #[test]
    fn traffic_resets_streak() {
        let mut liveness = LivenessClassifier::new(2);
        for _ in 0..5 {
            liveness.observe("a", 0);
        }
        assert!(liveness.is_incommunicado("a"));
        assert!(!liveness.observe("a", 3));
        assert_eq!(liveness.streak("a"), 0);
        assert!(!liveness.observe("a", 0));
        assert_eq!(liveness.streak("a"), 1);
    }

    #[test]
    fn negative_delta_counts_as_traffic() {
        let mut liveness = LivenessClassifier::new(0);
        assert!(liveness.observe("a", 0));
        assert!(!liveness.observe("a", -10));
    }

    #[test]
    fn peers_are_tracked_separately() {
        let mut liveness = LivenessClassifier::new(1);
        liveness.observe("a", 0);
        liveness.observe("a", 0);
        liveness.observe("b", 0);
        assert!(liveness.is_incommunicado("a"));
        assert!(!liveness.is_incommunicado("b"));
        assert!(!liveness.is_incommunicado("never-seen"));
    }
}
