use crate::node::{CounterKind, Counters, PeerRecord};

/// A neighbor as the table shows it: the raw record plus everything derived
/// from it for this poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerView {
    pub record: PeerRecord,
    /// Change of each counter since the previous poll.
    pub deltas: Counters,
    /// Counters after baseline subtraction.
    pub displayed: Counters,
    pub incommunicado: bool,
}

impl PeerView {
    pub fn address(&self) -> &str {
        &self.record.address
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Address,
    Counter(CounterKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub descending: bool,
}

impl SortOrder {
    /// Interprets a `--sort` argument: the 1-based table column (1 is the
    /// address), positive for descending and negative for ascending. Anything
    /// out of range sorts by address, descending.
    pub fn from_arg(arg: i64, columns: &[CounterKind]) -> SortOrder {
        let column = match arg.unsigned_abs() {
            1 => Some(SortColumn::Address),
            n if n >= 2 => usize::try_from(n - 2)
                .ok()
                .and_then(|i| columns.get(i))
                .map(|kind| SortColumn::Counter(*kind)),
            _ => None,
        };
        match column {
            Some(column) => SortOrder {
                column,
                descending: arg > 0,
            },
            None => SortOrder {
                column: SortColumn::Address,
                descending: true,
            },
        }
    }

    pub fn marker(&self) -> &'static str {
        if self.descending {
            "\u{25BC}"
        } else {
            "\u{25B2}"
        }
    }

    /// Moves to the next table column, wrapping back to the address.
    pub fn next_column(self, columns: &[CounterKind]) -> SortOrder {
        let column = match self.column {
            SortColumn::Address => columns.first().map(|k| SortColumn::Counter(*k)),
            SortColumn::Counter(kind) => columns
                .iter()
                .position(|k| *k == kind)
                .and_then(|i| columns.get(i + 1))
                .map(|k| SortColumn::Counter(*k)),
        };
        SortOrder {
            column: column.unwrap_or(SortColumn::Address),
            descending: self.descending,
        }
    }

    pub fn reversed(self) -> SortOrder {
        SortOrder {
            column: self.column,
            descending: !self.descending,
        }
    }
}

/// Stable sort on the displayed values; ties keep the node's order.
pub fn sort_peers(peers: &mut [PeerView], order: SortOrder) {
    peers.sort_by(|a, b| {
        let ord = match order.column {
            SortColumn::Address => a.record.label().cmp(&b.record.label()),
            SortColumn::Counter(kind) => a.displayed.get(kind).cmp(&b.displayed.get(kind)),
        };
        if order.descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: [CounterKind; 5] = CounterKind::DEFAULT_COLUMNS;

    fn view(address: &str, all: i64) -> PeerView {
        let counters = Counters {
            all,
            ..Default::default()
        };
        PeerView {
            record: PeerRecord {
                address: address.to_string(),
                connection_type: "udp".to_string(),
                counters,
            },
            deltas: Counters::default(),
            displayed: counters,
            incommunicado: false,
        }
    }

    #[test]
    fn sort_argument() {
        let cases = [
            (1, SortColumn::Address, true),
            (3, SortColumn::Counter(CounterKind::New), true),
            (-2, SortColumn::Counter(CounterKind::All), false),
            (-4, SortColumn::Counter(CounterKind::Sent), false),
            (100, SortColumn::Address, true),
            (-100, SortColumn::Address, true),
            (0, SortColumn::Address, true),
        ];
        for (arg, column, descending) in cases {
            let order = SortOrder::from_arg(arg, &COLUMNS);
            assert_eq!(order.column, column, "--sort={arg}");
            assert_eq!(order.descending, descending, "--sort={arg}");
        }
        assert_eq!(SortOrder::from_arg(2, &COLUMNS).marker(), "\u{25BC}");
        assert_eq!(SortOrder::from_arg(-2, &COLUMNS).marker(), "\u{25B2}");
    }

    #[test]
    fn next_column_wraps() {
        let mut order = SortOrder::from_arg(1, &COLUMNS);
        let mut seen = vec![order.column];
        for _ in 0..COLUMNS.len() {
            order = order.next_column(&COLUMNS);
            seen.push(order.column);
        }
        assert_eq!(seen[1], SortColumn::Counter(CounterKind::All));
        assert_eq!(seen[5], SortColumn::Counter(CounterKind::Stale));
        assert_eq!(order.next_column(&COLUMNS).column, SortColumn::Address);
    }

    #[test]
    fn sorts_by_displayed_value() {
        let mut peers = vec![view("a:1", 5), view("b:1", 50), view("c:1", 5), view("d:1", 10)];
        sort_peers(&mut peers, SortOrder::from_arg(2, &COLUMNS));
        let order: Vec<&str> = peers.iter().map(|p| p.address()).collect();
        assert_eq!(order, vec!["b:1", "d:1", "a:1", "c:1"]);

        sort_peers(&mut peers, SortOrder::from_arg(-1, &COLUMNS));
        let order: Vec<&str> = peers.iter().map(|p| p.address()).collect();
        assert_eq!(order, vec!["a:1", "b:1", "c:1", "d:1"]);
    }
}
