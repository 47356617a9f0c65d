//! Frame renderer
//!
//! Lays the node summary out in three columns above the neighbor table and
//! decides the style of every value. Each tracked scalar is run through the
//! `DisplayTracker` right before it is drawn, so a value is emphasized for
//! exactly one frame after it changes.

use super::frame::{Frame, Style, Tone};
use super::histogram::Segments;
use super::layout::{Layout, TABLE_TOP};
use super::peers::{PeerView, SortColumn, SortOrder};
use crate::node::{CounterKind, NodeSnapshot, MB};
use crate::obscure::obscure_address;
use crate::state::{DisplayTracker, FieldId, FieldValue};

pub const TITLE: &str = "IRITop - Simple IOTA IRI Node Monitor";
const HELP: &str = " q:quit  b:baseline  h:hide addresses  s:sort  r:reverse";
const ADDRESS_TITLE: &str = "Neighbor Address";
const BAR_CHAR: char = '|';

/// Everything one frame is drawn from.
pub struct RenderInput<'a> {
    pub node: &'a NodeSnapshot,
    pub node_url: &'a str,
    /// Neighbors in display order, deltas and baseline already applied.
    pub peers: &'a [PeerView],
    /// Counter kinds shown as table columns, left to right.
    pub columns: &'a [CounterKind],
    pub sort: Option<SortOrder>,
    pub baseline_on: bool,
    /// Salt for address obscuring, when it is enabled.
    pub obscure: Option<u64>,
    pub warning_fraction: f64,
    /// Right-hand side of the status line.
    pub status: &'a str,
    pub clear: bool,
}

/// How far the solid milestone trails the latest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LagTier {
    InSync,
    Behind,
    FarBehind,
}

impl LagTier {
    fn tone(self) -> Tone {
        match self {
            LagTier::InSync => Tone::Value,
            LagTier::Behind => Tone::Warning,
            LagTier::FarBehind => Tone::Severe,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            LagTier::InSync => "",
            LagTier::Behind => " *",
            LagTier::FarBehind => " (!)",
        }
    }
}

pub fn sync_lag_tier(lag: i64) -> LagTier {
    match lag {
        i64::MIN..=0 => LagTier::InSync,
        1..=2 => LagTier::Behind,
        _ => LagTier::FarBehind,
    }
}

pub fn render(input: &RenderInput<'_>, layout: &Layout, tracker: &mut DisplayTracker) -> Frame {
    let mut frame = Frame::new(layout.rows, layout.cols);
    frame.clear = input.clear;

    let mut painter = Painter {
        frame: &mut frame,
        layout,
        tracker,
    };
    painter.title();
    painter.summary(input);
    painter.table(input);
    painter.status(input);

    frame
}

struct Painter<'f, 'l, 't> {
    frame: &'f mut Frame,
    layout: &'l Layout,
    tracker: &'t mut DisplayTracker,
}

impl Painter<'_, '_, '_> {
    fn title(&mut self) {
        if !self.layout.row_visible(0) {
            return;
        }
        let width = usize::from(self.layout.cols);
        self.frame
            .put(0, 0, &format!("{TITLE:<width$}"), Style::new(Tone::Title));
    }

    fn summary(&mut self, input: &RenderInput<'_>) {
        let node = input.node;

        self.field(1, 0, "appName", "appName", node.app_name.as_str(), &node.app_name, Tone::Value);
        self.text(
            1,
            1,
            2,
            "jreMemory",
            &format!(
                "Free: {} Mb  Max: {} Mb  Total: {} Mb",
                node.jre_free_memory / MB,
                node.jre_max_memory / MB,
                node.jre_total_memory / MB
            ),
        );

        self.field(2, 0, "appVersion", "appVersion", node.app_version.as_str(), &node.app_version, Tone::Value);
        self.histogram(
            2,
            1,
            "jreMemory",
            node.jre_used_memory(),
            node.jre_max_memory,
            input.warning_fraction,
            2,
        );

        self.number(3, 0, "milestoneStart", "milestoneStartIndex", node.milestone_start_index, Tone::Value);
        let tier = sync_lag_tier(node.sync_lag());
        self.field(
            3,
            1,
            "milestoneIndex",
            "latestMilestoneIndex",
            node.latest_milestone_index,
            &format!("{}{}", node.latest_milestone_index, tier.marker()),
            tier.tone(),
        );
        self.number(
            3,
            2,
            "milestoneSolid",
            "latestSolidSubtangleMilestoneIndex",
            node.latest_solid_subtangle_milestone_index,
            Tone::Value,
        );

        self.field(4, 0, "jreVersion", "jreVersion", node.jre_version.as_str(), &node.jre_version, Tone::Value);
        self.number(4, 1, "tips", "tips", node.tips, Tone::Value);
        self.number(4, 2, "txToRequest", "transactionsToRequest", node.transactions_to_request, Tone::Value);

        self.text(5, 0, 1, "Node Address", input.node_url);
        self.number(5, 1, "packetsQueue", "packetsQueueSize", node.packets_queue_size, Tone::Value);
        self.neighbors(5, 2, node.neighbors, input.peers);
    }

    fn label(&mut self, row: u16, col: u16, label: &str) {
        let x = self.layout.summary_label_x(col);
        self.frame
            .put(row, x, &format!("{label}:"), Style::new(Tone::Label));
    }

    /// Blanks from `from` to the end of a one-column-wide summary value.
    fn pad(&mut self, row: u16, col: u16, from: u16) {
        let end = self.layout.summary_value_x(col) + self.layout.summary_value_width(1);
        if end > from {
            let blank = " ".repeat(usize::from(end - from));
            self.frame.put(row, from, &blank, Style::new(Tone::Plain));
        }
    }

    /// Draws a tracked summary value, emphasized when it changed since the
    /// last frame. Returns the column after the value.
    #[allow(clippy::too_many_arguments)]
    fn field(
        &mut self,
        row: u16,
        col: u16,
        label: &str,
        id: &'static str,
        value: impl Into<FieldValue>,
        text: &str,
        tone: Tone,
    ) -> u16 {
        if !self.layout.row_visible(row) {
            return 0;
        }
        self.label(row, col, label);
        let changed = self.tracker.changed(FieldId::Node(id), value);
        let x = self.layout.summary_value_x(col);
        let text = clip(text, usize::from(self.layout.summary_value_width(1)));
        let end = self
            .frame
            .put(row, x, &text, Style::new(tone).changed_if(changed));
        self.pad(row, col, end);
        end
    }

    fn number(&mut self, row: u16, col: u16, label: &str, id: &'static str, value: i64, tone: Tone) {
        self.field(row, col, label, id, value, &value.to_string(), tone);
    }

    /// Untracked summary text, cut to `span` summary columns.
    fn text(&mut self, row: u16, col: u16, span: u16, label: &str, text: &str) {
        if !self.layout.row_visible(row) {
            return;
        }
        self.label(row, col, label);
        let x = self.layout.summary_value_x(col);
        let text = clip(text, usize::from(self.layout.summary_value_width(span)));
        let end = self.frame.put(row, x, &text, Style::new(Tone::Value));
        self.pad(row, col, end);
    }

    fn neighbors(&mut self, row: u16, col: u16, count: i64, peers: &[PeerView]) {
        let tone = if count == 0 { Tone::Error } else { Tone::Value };
        let end = self.field(row, col, "neighbors", "neighbors", count, &count.to_string(), tone);
        if !self.layout.row_visible(row) {
            return;
        }
        let silent = peers.iter().filter(|p| p.incommunicado).count();
        let end = if silent > 0 {
            self.frame.put(
                row,
                end,
                &format!(" ({silent} incommunicado)"),
                Style::new(Tone::Error),
            )
        } else {
            end
        };
        self.pad(row, col, end);
    }

    #[allow(clippy::too_many_arguments)]
    fn histogram(
        &mut self,
        row: u16,
        col: u16,
        label: &str,
        used: i64,
        max: i64,
        warning_fraction: f64,
        span: u16,
    ) {
        if !self.layout.row_visible(row) {
            return;
        }
        let outer = self.layout.summary_value_width(span);
        if outer < 2 {
            return;
        }
        self.label(row, col, label);

        let segments = Segments::compute(used, max, warning_fraction, outer - 2);
        let bar = |n: u16| BAR_CHAR.to_string().repeat(usize::from(n));
        let x = self.layout.summary_value_x(col);
        let x = self.frame.put(row, x, "[", Style::new(Tone::Plain));
        let x = self.frame.put(row, x, &bar(segments.ok), Style::new(Tone::Ok));
        let x = self
            .frame
            .put(row, x, &bar(segments.warning), Style::new(Tone::Warning));
        let x = self.frame.put(row, x, &bar(segments.free), Style::new(Tone::Muted));
        self.frame.put(row, x, "]", Style::new(Tone::Plain));
    }

    fn table(&mut self, input: &RenderInput<'_>) {
        if !self.layout.row_visible(TABLE_TOP) {
            return;
        }
        self.table_header(input);

        let fit = self.layout.visible_peer_rows();
        for (i, peer) in input.peers.iter().take(fit).enumerate() {
            let row = self.layout.peer_row(i);
            self.peer_row(row, peer, input);
        }
    }

    fn table_header(&mut self, input: &RenderInput<'_>) {
        let marker = |column: SortColumn| match input.sort {
            Some(order) if order.column == column => format!(" {}", order.marker()),
            _ => String::new(),
        };
        let header = Style::new(Tone::Header);

        let address = self.layout.address;
        let title = format!("{ADDRESS_TITLE}{}", marker(SortColumn::Address));
        self.frame.put(
            TABLE_TOP,
            address.x,
            &fit_left(&title, usize::from(address.width)),
            header,
        );

        for (kind, column) in input.columns.iter().zip(&self.layout.counters) {
            let title = format!("{}{}", kind.title(), marker(SortColumn::Counter(*kind)));
            let width = usize::from(column.width);
            self.frame.put(
                TABLE_TOP,
                column.x,
                &format!("{:>width$}", clip(&title, width)),
                header,
            );
        }
    }

    fn peer_row(&mut self, row: u16, peer: &PeerView, input: &RenderInput<'_>) {
        let address = self.layout.address;
        let mut label = peer.record.label();
        if let Some(salt) = input.obscure {
            label = obscure_address(&label, salt);
        }
        let tone = if peer.incommunicado {
            Tone::Error
        } else {
            Tone::Address
        };
        self.frame.put(
            row,
            address.x,
            &fit_left(&label, usize::from(address.width)),
            Style::new(tone),
        );

        for (kind, column) in input.columns.iter().zip(&self.layout.counters) {
            if column.width == 0 {
                continue;
            }
            let kind = *kind;
            let absolute = peer.record.counters.get(kind);
            let tone = match kind {
                CounterKind::Invalid if absolute > 0 => Tone::Error,
                CounterKind::Stale if absolute > 0 => Tone::Warning,
                _ => Tone::Counter,
            };
            let changed = self
                .tracker
                .changed(FieldId::peer(peer.address(), kind), absolute);
            let text = counter_text(
                peer.displayed.get(kind),
                peer.deltas.get(kind),
                usize::from(column.width),
            );
            self.frame
                .put(row, column.x, &text, Style::new(tone).changed_if(changed));
        }
    }

    fn status(&mut self, input: &RenderInput<'_>) {
        let Some(row) = self.layout.status_row() else {
            return;
        };
        let cols = usize::from(self.layout.cols);
        self.frame
            .put(row, 0, &format!("{HELP:<cols$}"), Style::new(Tone::Plain));

        let status = format!("{} ", input.status);
        let status_len = status.chars().count() as u16;
        let x = self.layout.cols.saturating_sub(status_len);
        if x > 0 {
            self.frame.put(row, x, &status, Style::new(Tone::Muted));
        }
        if input.baseline_on {
            let tag = "[baseline] ";
            let x = x.saturating_sub(tag.len() as u16);
            if x > 0 {
                self.frame.put(row, x, tag, Style::new(Tone::Warning));
            }
        }
    }
}

fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn fit_left(text: &str, width: usize) -> String {
    format!("{:<width$}", clip(text, width))
}

/// `"<value> (<delta>)"` right-aligned, falling back to the bare value, then
/// to a `#` fill, when the column is too narrow. Keeps one leading blank as a
/// separator.
fn counter_text(displayed: i64, delta: i64, width: usize) -> String {
    let full = format!("{displayed} ({delta})");
    if full.len() < width {
        return format!("{full:>width$}");
    }
    let short = displayed.to_string();
    if short.len() < width {
        return format!("{short:>width$}");
    }
    "#".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Counters, PeerRecord};

    fn node() -> NodeSnapshot {
        NodeSnapshot {
            app_name: "IRI".to_string(),
            app_version: "1.5.6-RELEASE".to_string(),
            jre_version: "1.8.0_191".to_string(),
            jre_free_memory: 585111872,
            jre_max_memory: 3221225472,
            jre_total_memory: 2013265920,
            latest_milestone_index: 968273,
            latest_solid_subtangle_milestone_index: 968272,
            milestone_start_index: 933210,
            tips: 3601,
            transactions_to_request: 51,
            neighbors: 2,
            packets_queue_size: 0,
        }
    }

    fn peer(address: &str, counters: Counters, incommunicado: bool) -> PeerView {
        PeerView {
            record: PeerRecord {
                address: address.to_string(),
                connection_type: "udp".to_string(),
                counters,
            },
            deltas: Counters::default(),
            displayed: counters,
            incommunicado,
        }
    }

    fn input<'a>(node: &'a NodeSnapshot, peers: &'a [PeerView]) -> RenderInput<'a> {
        RenderInput {
            node,
            node_url: "http://localhost:14265",
            peers,
            columns: &CounterKind::DEFAULT_COLUMNS,
            sort: None,
            baseline_on: false,
            obscure: None,
            warning_fraction: 0.8,
            status: "updated 12:00:00",
            clear: false,
        }
    }

    fn draw(input: &RenderInput<'_>, rows: u16, cols: u16, tracker: &mut DisplayTracker) -> Frame {
        let layout = Layout::compute(rows, cols, input.columns.len());
        render(input, &layout, tracker)
    }

    #[test]
    fn lag_tiers() {
        assert_eq!(sync_lag_tier(0), LagTier::InSync);
        assert_eq!(sync_lag_tier(-4), LagTier::InSync);
        assert_eq!(sync_lag_tier(1), LagTier::Behind);
        assert_eq!(sync_lag_tier(2), LagTier::Behind);
        assert_eq!(sync_lag_tier(3), LagTier::FarBehind);
    }

    #[test]
    fn lag_of_one_warns_with_marker() {
        let node = node();
        let frame = draw(&input(&node, &[]), 40, 120, &mut DisplayTracker::new());
        let op = frame.find("968273").unwrap();
        assert_eq!(op.text, "968273 *");
        assert_eq!(op.style.tone, Tone::Warning);
    }

    #[test]
    fn lag_of_five_is_severe() {
        let mut node = node();
        node.latest_solid_subtangle_milestone_index = 968268;
        let frame = draw(&input(&node, &[]), 40, 120, &mut DisplayTracker::new());
        let op = frame.find("968273").unwrap();
        assert_eq!(op.text, "968273 (!)");
        assert_eq!(op.style.tone, Tone::Severe);
    }

    #[test]
    fn in_sync_is_plain() {
        let mut node = node();
        node.latest_solid_subtangle_milestone_index = node.latest_milestone_index;
        let frame = draw(&input(&node, &[]), 40, 120, &mut DisplayTracker::new());
        let op = frame.find("968273").unwrap();
        assert_eq!(op.text, "968273");
        assert_eq!(op.style, Style::new(Tone::Value));
    }

    #[test]
    fn lag_and_change_combine() {
        let mut node = node();
        let mut tracker = DisplayTracker::new();
        draw(&input(&node, &[]), 40, 120, &mut tracker);
        node.latest_milestone_index += 1;
        let frame = draw(&input(&node, &[]), 40, 120, &mut tracker);
        let op = frame.find("968274").unwrap();
        assert_eq!(op.text, "968274 *");
        assert_eq!(op.style.tone, Tone::Warning);
        assert!(op.style.changed);
    }

    #[test]
    fn rerender_marks_nothing_changed() {
        let node = node();
        let peers = vec![
            peer("a:1", Counters { all: 10, invalid: 2, ..Default::default() }, false),
            peer("b:1", Counters { all: 20, stale: 3, ..Default::default() }, true),
        ];
        let mut tracker = DisplayTracker::new();
        let first = draw(&input(&node, &peers), 40, 120, &mut tracker);
        let second = draw(&input(&node, &peers), 40, 120, &mut tracker);
        assert!(first.ops().iter().all(|op| !op.style.changed));
        assert!(second.ops().iter().all(|op| !op.style.changed));
        assert_eq!(first, second);
    }

    #[test]
    fn changed_counter_is_emphasized_once() {
        let node = node();
        let mut tracker = DisplayTracker::new();
        let before = vec![peer("a:1", Counters { all: 10, ..Default::default() }, false)];
        draw(&input(&node, &before), 40, 120, &mut tracker);

        let after = vec![peer("a:1", Counters { all: 15, ..Default::default() }, false)];
        let frame = draw(&input(&node, &after), 40, 120, &mut tracker);
        let changed: Vec<_> = frame.ops().iter().filter(|op| op.style.changed).collect();
        assert_eq!(changed.len(), 1);
        assert!(changed[0].text.contains("15 (0)"));

        let frame = draw(&input(&node, &after), 40, 120, &mut tracker);
        assert!(frame.ops().iter().all(|op| !op.style.changed));
    }

    #[test]
    fn no_neighbors_is_an_error() {
        let mut node = node();
        node.neighbors = 0;
        let frame = draw(&input(&node, &[]), 40, 120, &mut DisplayTracker::new());
        let x = Layout::compute(40, 120, 5).summary_value_x(2);
        let op = frame.ops_on_row(5).find(|op| op.col == x).unwrap();
        assert_eq!(op.text, "0");
        assert_eq!(op.style.tone, Tone::Error);
    }

    #[test]
    fn incommunicado_count_is_appended() {
        let node = node();
        let peers = vec![
            peer("a:1", Counters::default(), true),
            peer("b:1", Counters::default(), false),
        ];
        let frame = draw(&input(&node, &peers), 40, 120, &mut DisplayTracker::new());
        let suffix = frame.find("(1 incommunicado)").unwrap();
        assert_eq!(suffix.style.tone, Tone::Error);
        let address = frame.find("udp://a:1").unwrap();
        assert_eq!(address.style.tone, Tone::Error);
        let address = frame.find("udp://b:1").unwrap();
        assert_eq!(address.style.tone, Tone::Address);
    }

    #[test]
    fn invalid_and_stale_draw_attention() {
        let node = node();
        let peers = vec![peer(
            "a:1",
            Counters { all: 10, invalid: 1, stale: 4, ..Default::default() },
            false,
        )];
        let frame = draw(&input(&node, &peers), 40, 120, &mut DisplayTracker::new());
        let layout = Layout::compute(40, 120, 5);
        let row = layout.peer_row(0);
        let cell = |i: usize| {
            frame
                .ops_on_row(row)
                .find(|op| op.col == layout.counters[i].x)
                .unwrap()
                .clone()
        };
        assert_eq!(cell(0).style.tone, Tone::Counter);
        assert_eq!(cell(3).style.tone, Tone::Error);
        assert_eq!(cell(4).style.tone, Tone::Warning);
        assert_eq!(cell(0).text.trim(), "10 (0)");
        assert_eq!(cell(0).text.len(), usize::from(layout.counters[0].width));
    }

    #[test]
    fn histogram_fills_its_span() {
        let node = node();
        let frame = draw(&input(&node, &[]), 40, 120, &mut DisplayTracker::new());
        let layout = Layout::compute(40, 120, 5);
        let width: usize = frame
            .ops_on_row(2)
            .filter(|op| op.col >= layout.summary_value_x(1))
            .map(|op| op.text.chars().count())
            .sum();
        assert_eq!(width, usize::from(layout.summary_value_width(2)));
    }

    #[test]
    fn rows_never_reach_reserved_area() {
        let node = node();
        let peers: Vec<PeerView> = (0..50)
            .map(|i| peer(&format!("10.0.0.{i}:14600"), Counters::default(), false))
            .collect();
        for rows in 3..40u16 {
            let frame = draw(&input(&node, &peers), rows, 100, &mut DisplayTracker::new());
            for op in frame.ops() {
                assert!(
                    op.row < rows - 2 || op.row == rows - 1,
                    "rows {rows}: {op:?}"
                );
            }
        }
    }

    #[test]
    fn narrow_terminal_degrades() {
        let node = node();
        let peers = vec![peer("a:1", Counters { all: 123280, ..Default::default() }, false)];
        for cols in 0..30u16 {
            let frame = draw(&input(&node, &peers), 20, cols, &mut DisplayTracker::new());
            for op in frame.ops() {
                assert!(op.col + op.text.chars().count() as u16 <= cols);
            }
        }
    }

    #[test]
    fn sort_marker_in_header() {
        let node = node();
        let mut input = input(&node, &[]);
        input.sort = Some(SortOrder::from_arg(-2, input.columns));
        let frame = draw(&input, 40, 120, &mut DisplayTracker::new());
        assert!(frame.find("All tx \u{25B2}").is_some());
    }

    #[test]
    fn obscured_addresses_keep_scheme() {
        let node = node();
        let peers = vec![peer("vmi11111.testserver.net:14600", Counters::default(), false)];
        let mut input = input(&node, &peers);
        input.obscure = Some(7);
        let frame = draw(&input, 40, 120, &mut DisplayTracker::new());
        let layout = Layout::compute(40, 120, 5);
        let op = frame
            .ops_on_row(layout.peer_row(0))
            .find(|op| op.col == 0)
            .unwrap();
        assert!(op.text.starts_with("udp://"));
        assert!(!op.text.contains("testserver"));
    }

    #[test]
    fn counter_text_fallbacks() {
        assert_eq!(counter_text(100, 5, 10), "   100 (5)");
        assert_eq!(counter_text(123280, 12, 9), "   123280");
        assert_eq!(counter_text(123280, 12, 4), "####");
    }

    #[test]
    fn long_summary_values_stay_in_their_column() {
        let mut node = node();
        node.app_name = "IRI-with-a-really-long-distribution-name".to_string();
        let mut input = input(&node, &[]);
        input.node_url = "https://a-rather-long-node-hostname.example.org:14265";
        let layout = Layout::compute(40, 100, 5);
        let frame = render(&input, &layout, &mut DisplayTracker::new());
        let limit = layout.summary_label_x(1);

        for row in [1, 5] {
            let spill = frame
                .ops_on_row(row)
                .filter(|op| op.col < limit)
                .find(|op| op.col + op.text.chars().count() as u16 > limit);
            assert_eq!(spill, None, "row {row}");
        }
        let label = frame.find("packetsQueue:").unwrap();
        assert_eq!(label.col, limit);
        assert!(frame.find("https://a-rathe").is_some());
    }
}
