//! Screen geometry, derived from the terminal size alone.
//!
//! The summary area splits the width into three equal columns; the neighbor
//! table splits it into `ADDRESS_SLOTS + counters` equal slots, the first
//! `ADDRESS_SLOTS` of which go to the address. The address column also takes
//! the division remainder so the table always ends at the right edge.

/// Width reserved for a summary label before its value.
pub const LABEL_WIDTH: u16 = 18;
/// Slots the neighbor address column occupies.
pub const ADDRESS_SLOTS: u16 = 4;
/// Bottom rows kept free of table content for the help/status line.
pub const RESERVED_BOTTOM_ROWS: u16 = 2;
/// Row of the neighbor table header.
pub const TABLE_TOP: u16 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub x: u16,
    pub width: u16,
}

impl Column {
    pub fn end(&self) -> u16 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub rows: u16,
    pub cols: u16,
    /// Width of one summary column.
    pub third: u16,
    pub address: Column,
    pub counters: Vec<Column>,
}

impl Layout {
    pub fn compute(rows: u16, cols: u16, counter_columns: usize) -> Layout {
        let third = cols / 3;
        let slots = ADDRESS_SLOTS.saturating_add(counter_columns as u16);
        let slot = cols / slots;
        let rem = cols % slots;

        let address = Column {
            x: 0,
            width: ADDRESS_SLOTS * slot + rem,
        };
        let counters = (0..counter_columns as u16)
            .map(|i| Column {
                x: rem + (ADDRESS_SLOTS + i) * slot,
                width: slot,
            })
            .collect();

        Layout {
            rows,
            cols,
            third,
            address,
            counters,
        }
    }

    pub fn summary_label_x(&self, col: u16) -> u16 {
        self.third * col
    }

    pub fn summary_value_x(&self, col: u16) -> u16 {
        self.summary_label_x(col) + LABEL_WIDTH
    }

    /// Room for a value starting at `summary_value_x(col)` that spans `span`
    /// summary columns.
    pub fn summary_value_width(&self, span: u16) -> u16 {
        (self.third * span).saturating_sub(LABEL_WIDTH)
    }

    /// Whether content may be drawn on `row`. The last two rows are reserved.
    pub fn row_visible(&self, row: u16) -> bool {
        row < self.rows.saturating_sub(RESERVED_BOTTOM_ROWS)
    }

    pub fn status_row(&self) -> Option<u16> {
        self.rows.checked_sub(1)
    }

    /// Screen row of the `index`th neighbor.
    pub fn peer_row(&self, index: usize) -> u16 {
        let row = usize::from(TABLE_TOP) + 1 + index;
        row.min(usize::from(u16::MAX)) as u16
    }

    /// How many neighbor rows fit above the reserved rows.
    pub fn visible_peer_rows(&self) -> usize {
        usize::from(
            self.rows
                .saturating_sub(RESERVED_BOTTOM_ROWS)
                .saturating_sub(TABLE_TOP + 1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn summary_thirds_drop_remainder() {
        let layout = Layout::compute(40, 100, 5);
        assert_eq!(layout.third, 33);
        assert_eq!(layout.summary_label_x(0), 0);
        assert_eq!(layout.summary_label_x(1), 33);
        assert_eq!(layout.summary_label_x(2), 66);
        assert_eq!(layout.summary_value_x(2), 84);
        assert_eq!(layout.summary_value_width(2), 48);
    }

    #[test]
    fn table_uses_nine_slots_by_default() {
        let layout = Layout::compute(40, 100, 5);
        // 100 / 9 = 11 remainder 1
        assert_eq!(layout.address, Column { x: 0, width: 45 });
        let xs: Vec<u16> = layout.counters.iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![45, 56, 67, 78, 89]);
        assert!(layout.counters.iter().all(|c| c.width == 11));
    }

    proptest! {
        #[test]
        fn table_spans_full_width(cols in any::<u16>(), counters in 0usize..=6) {
            let layout = Layout::compute(40, cols, counters);
            let mut x = layout.address.end();
            for c in &layout.counters {
                prop_assert_eq!(c.x, x);
                x = c.end();
            }
            prop_assert_eq!(x, cols);
        }

        #[test]
        fn peer_rows_stay_above_reserved_rows(rows in 3u16..=u16::MAX, cols in any::<u16>()) {
            let layout = Layout::compute(rows, cols, 5);
            let fit = layout.visible_peer_rows();
            if fit > 0 {
                let last = layout.peer_row(fit - 1);
                prop_assert!(layout.row_visible(last));
                prop_assert!(last < rows - 2);
            }
            prop_assert!(!layout.row_visible(layout.peer_row(fit)));
            prop_assert!(layout.summary_label_x(2) + layout.third <= cols);
        }
    }

    #[test]
    fn tiny_terminal_has_no_drawable_rows() {
        let layout = Layout::compute(2, 10, 5);
        assert!(!layout.row_visible(0));
        assert_eq!(layout.visible_peer_rows(), 0);
        assert_eq!(layout.status_row(), Some(1));
        assert_eq!(Layout::compute(0, 0, 5).status_row(), None);
    }
}
