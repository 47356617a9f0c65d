mod api;
mod model;

pub use api::{fetch, parse_node_url, Credentials, HttpNodeApi, NodeApi, API_VERSION};
pub use model::{CounterKind, Counters, NodeSnapshot, PeerRecord};

/// Bytes per megabyte, as used for the JRE memory readout.
pub const MB: i64 = 1024 * 1024;
