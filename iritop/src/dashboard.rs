//! Dashboard
//!
//! Owns all state carried between polls and frames: counter history,
//! baselines, liveness streaks and the display-change tracker. The event
//! loop drives it with three calls: `poll` when the poll interval elapses,
//! `handle` for a key press, and `render` on every tick.
//!
//! Ordering is poll, then state update, then render. A poll either applies
//! a complete snapshot or fails without touching any state.

use crate::node::{self, CounterKind, Counters, NodeApi, NodeSnapshot, PeerRecord};
use crate::obscure;
use crate::state::{
    BaselineStore, CounterHistory, DisplayTracker, LivenessClassifier,
    DEFAULT_INCOMMUNICADO_THRESHOLD,
};
use crate::view::{
    render, sort_peers, Frame, Layout, PeerView, RenderInput, SortOrder,
    DEFAULT_WARNING_FRACTION,
};
use crate::Error;

use std::collections::HashSet;
use tracing::{debug, info, warn};

/// User actions, other than quitting, that the dashboard reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Capture a new baseline for every counter and flip baseline mode.
    ToggleBaseline,
    ToggleObscure,
    CycleSort,
    ReverseSort,
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Shown in the summary; not used for fetching.
    pub node_url: String,
    pub incommunicado_threshold: u32,
    /// Counter kinds shown as table columns.
    pub columns: Vec<CounterKind>,
    pub sort: Option<SortOrder>,
    pub obscure: bool,
    pub warning_fraction: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            node_url: String::new(),
            incommunicado_threshold: DEFAULT_INCOMMUNICADO_THRESHOLD,
            columns: CounterKind::DEFAULT_COLUMNS.to_vec(),
            sort: None,
            obscure: false,
            warning_fraction: DEFAULT_WARNING_FRACTION,
        }
    }
}

pub struct Dashboard {
    settings: Settings,
    history: CounterHistory,
    baseline: BaselineStore,
    liveness: LivenessClassifier,
    tracker: DisplayTracker,

    node: Option<NodeSnapshot>,
    peers: Vec<PeerView>,
    polls: u64,

    sort: Option<SortOrder>,
    obscure: bool,
    salt: u64,
    status: String,

    last_size: Option<(u16, u16)>,
    last_peer_rows: usize,
}

impl Dashboard {
    pub fn new(settings: Settings) -> Dashboard {
        Dashboard {
            history: CounterHistory::new(),
            baseline: BaselineStore::new(),
            liveness: LivenessClassifier::new(settings.incommunicado_threshold),
            tracker: DisplayTracker::new(),
            node: None,
            peers: Vec::new(),
            polls: 0,
            sort: settings.sort,
            obscure: settings.obscure,
            salt: obscure::session_salt(),
            status: String::new(),
            last_size: None,
            last_peer_rows: 0,
            settings,
        }
    }

    /// Fetches a fresh snapshot and applies it. On error nothing changes.
    pub fn poll<A: NodeApi + Sync>(&mut self, api: &A) -> Result<(), Error> {
        debug!(poll = self.polls + 1, "polling node");
        let (node, peers) = node::fetch(api).inspect_err(|e| {
            warn!(error = %e, "fetch failed");
        })?;
        self.update(node, peers);
        Ok(())
    }

    /// Applies one complete snapshot: deltas, liveness, eviction of peers
    /// that disappeared, then baseline and sort.
    pub fn update(&mut self, node: NodeSnapshot, peers: Vec<PeerRecord>) {
        let mut views = Vec::with_capacity(peers.len());
        for record in peers {
            let deltas = Counters::from_fn(|kind| {
                self.history
                    .update(&record.address, kind, record.counters.get(kind))
            });
            let incommunicado = self.liveness.observe(&record.address, deltas.all);
            views.push(PeerView {
                displayed: record.counters,
                deltas,
                incommunicado,
                record,
            });
        }
        self.evict(&views);

        self.node = Some(node);
        self.peers = views;
        self.polls += 1;
        self.refresh_peers();

        info!(
            poll = self.polls,
            peers = self.peers.len(),
            incommunicado = self.peers.iter().filter(|p| p.incommunicado).count(),
            "snapshot applied"
        );
    }

    fn evict(&mut self, current: &[PeerView]) {
        let current: HashSet<&str> = current.iter().map(|p| p.address()).collect();
        let dropped = self.history.retain_peers(&current)
            + self.baseline.retain_peers(&current)
            + self.liveness.retain_peers(&current)
            + self.tracker.retain_peers(&current);
        if dropped > 0 {
            debug!(dropped, "evicted state of departed neighbors");
        }
    }

    /// Re-applies baseline and sort order to the current peer list.
    fn refresh_peers(&mut self) {
        for peer in &mut self.peers {
            let record = &peer.record;
            peer.displayed = Counters::from_fn(|kind| {
                self.baseline
                    .displayed_value(&record.address, kind, record.counters.get(kind))
            });
        }
        if let Some(order) = self.sort {
            sort_peers(&mut self.peers, order);
        }
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::ToggleBaseline => {
                self.baseline.capture(self.peers.iter().map(|p| &p.record));
                let on = self.baseline.toggle();
                info!(on, "baseline toggled");
            }
            Command::ToggleObscure => {
                self.obscure = !self.obscure;
            }
            Command::CycleSort => {
                let columns = &self.settings.columns;
                self.sort = Some(match self.sort {
                    Some(order) => order.next_column(columns),
                    None => SortOrder::from_arg(2, columns),
                });
            }
            Command::ReverseSort => {
                self.sort = self.sort.map(SortOrder::reversed);
            }
        }
        self.refresh_peers();
    }

    /// Builds the frame for a terminal of `rows` x `cols`. `None` until the
    /// first snapshot has been applied.
    pub fn render(&mut self, rows: u16, cols: u16) -> Option<Frame> {
        let node = self.node.as_ref()?;
        let layout = Layout::compute(rows, cols, self.settings.columns.len());

        let resized = self.last_size != Some((rows, cols));
        if resized && self.last_size.is_some() {
            debug!(rows, cols, "terminal resized");
        }
        let shown = self.peers.len().min(layout.visible_peer_rows());
        let clear = resized || shown < self.last_peer_rows;
        self.last_size = Some((rows, cols));
        self.last_peer_rows = shown;

        let input = RenderInput {
            node,
            node_url: &self.settings.node_url,
            peers: &self.peers,
            columns: &self.settings.columns,
            sort: self.sort,
            baseline_on: self.baseline.is_on(),
            obscure: self.obscure.then_some(self.salt),
            warning_fraction: self.settings.warning_fraction,
            status: &self.status,
            clear,
        };
        Some(render(&input, &layout, &mut self.tracker))
    }

    /// Text for the right-hand side of the status line.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn node(&self) -> Option<&NodeSnapshot> {
        self.node.as_ref()
    }

    pub fn peers(&self) -> &[PeerView] {
        &self.peers
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn baseline_on(&self) -> bool {
        self.baseline.is_on()
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    pub fn obscured(&self) -> bool {
        self.obscure
    }

    pub fn history(&self) -> &CounterHistory {
        &self.history
    }

    pub fn liveness(&self) -> &LivenessClassifier {
        &self.liveness
    }
}
