use crate::node::CounterKind;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Identity of one displayed scalar.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldId {
    Node(&'static str),
    Peer { address: String, kind: CounterKind },
}

impl FieldId {
    pub fn peer(address: &str, kind: CounterKind) -> FieldId {
        FieldId::Peer {
            address: address.to_string(),
            kind,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldId::Node(name) => write!(f, "node.{name}"),
            FieldId::Peer { address, kind } => write!(f, "peer:{address}.{kind}"),
        }
    }
}

/// The underlying value behind a displayed field, compared before styling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

/// Remembers what each field showed on the previous frame.
#[derive(Debug, Default)]
pub struct DisplayTracker {
    previous: HashMap<FieldId, FieldValue>,
}

impl DisplayTracker {
    pub fn new() -> DisplayTracker {
        DisplayTracker::default()
    }

    /// True if `value` differs from what `field` held last time. A field
    /// seen for the first time is not a change. Always stores `value`.
    pub fn changed(&mut self, field: FieldId, value: impl Into<FieldValue>) -> bool {
        let value = value.into();
        match self.previous.entry(field) {
            Entry::Occupied(mut slot) => {
                if *slot.get() == value {
                    false
                } else {
                    slot.insert(value);
                    true
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(value);
                false
            }
        }
    }

    pub fn previous(&self, field: &FieldId) -> Option<&FieldValue> {
        self.previous.get(field)
    }

    /// Forgets peer fields for peers not in `peers`; node fields stay.
    pub fn retain_peers(&mut self, peers: &HashSet<&str>) -> usize {
        let before = self.previous.len();
        self.previous.retain(|field, _| match field {
            FieldId::Node(_) => true,
            FieldId::Peer { address, .. } => peers.contains(address.as_str()),
        });
        before - self.previous.len()
    }

    pub fn len(&self) -> usize {
        self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }
}
