use serde::Deserialize;

/// Node-level fields returned by `getNodeInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub app_name: String,
    pub app_version: String,
    pub jre_version: String,
    pub jre_free_memory: i64,
    pub jre_max_memory: i64,
    pub jre_total_memory: i64,
    pub latest_milestone_index: i64,
    pub latest_solid_subtangle_milestone_index: i64,
    pub milestone_start_index: i64,
    pub tips: i64,
    pub transactions_to_request: i64,
    pub neighbors: i64,
    #[serde(default)]
    pub packets_queue_size: i64,
}

impl NodeSnapshot {
    /// Milestones the node's solid view trails the network by.
    pub fn sync_lag(&self) -> i64 {
        self.latest_milestone_index
            .saturating_sub(self.latest_solid_subtangle_milestone_index)
    }

    pub fn jre_used_memory(&self) -> i64 {
        self.jre_total_memory.saturating_sub(self.jre_free_memory)
    }
}

/// The six transaction counters a neighbor reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    All,
    New,
    Sent,
    Random,
    Invalid,
    Stale,
}

impl CounterKind {
    pub const ALL: [CounterKind; 6] = [
        CounterKind::All,
        CounterKind::New,
        CounterKind::Sent,
        CounterKind::Random,
        CounterKind::Invalid,
        CounterKind::Stale,
    ];

    /// Columns shown in the neighbor table unless configured otherwise.
    pub const DEFAULT_COLUMNS: [CounterKind; 5] = [
        CounterKind::All,
        CounterKind::New,
        CounterKind::Sent,
        CounterKind::Invalid,
        CounterKind::Stale,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CounterKind::All => "all",
            CounterKind::New => "new",
            CounterKind::Sent => "sent",
            CounterKind::Random => "random",
            CounterKind::Invalid => "invalid",
            CounterKind::Stale => "stale",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CounterKind::All => "All tx",
            CounterKind::New => "New tx",
            CounterKind::Sent => "Sent tx",
            CounterKind::Random => "Random tx",
            CounterKind::Invalid => "Invalid tx",
            CounterKind::Stale => "Stale tx",
        }
    }
}

impl std::fmt::Display for CounterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One value per `CounterKind`. Used for raw counters as well as for the
/// derived deltas and baseline-adjusted values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Counters {
    #[serde(rename = "numberOfAllTransactions")]
    pub all: i64,
    #[serde(rename = "numberOfNewTransactions")]
    pub new: i64,
    #[serde(rename = "numberOfSentTransactions")]
    pub sent: i64,
    #[serde(rename = "numberOfRandomTransactionRequests")]
    pub random: i64,
    #[serde(rename = "numberOfInvalidTransactions")]
    pub invalid: i64,
    #[serde(rename = "numberOfStaleTransactions")]
    pub stale: i64,
}

impl Counters {
    pub fn from_fn(mut f: impl FnMut(CounterKind) -> i64) -> Self {
        Counters {
            all: f(CounterKind::All),
            new: f(CounterKind::New),
            sent: f(CounterKind::Sent),
            random: f(CounterKind::Random),
            invalid: f(CounterKind::Invalid),
            stale: f(CounterKind::Stale),
        }
    }

    pub fn get(&self, kind: CounterKind) -> i64 {
        match kind {
            CounterKind::All => self.all,
            CounterKind::New => self.new,
            CounterKind::Sent => self.sent,
            CounterKind::Random => self.random,
            CounterKind::Invalid => self.invalid,
            CounterKind::Stale => self.stale,
        }
    }
}

/// A neighbor as reported by `getNeighbors`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerRecord {
    pub address: String,
    pub connection_type: String,
    #[serde(flatten)]
    pub counters: Counters,
}

impl PeerRecord {
    /// `<connection type>://<address>`, as shown in the neighbor table.
    pub fn label(&self) -> String {
        format!("{}://{}", self.connection_type, self.address)
    }
}
