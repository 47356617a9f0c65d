//! View
//!
//! Turns node data plus the dashboard's state into a `Frame`: an ordered list
//! of positioned, styled text draws. Nothing in here touches the terminal;
//! a `Surface` implementation does that.

mod frame;
mod histogram;
mod layout;
mod peers;
mod render;

pub use frame::{DrawOp, Frame, Style, Tone};
pub use histogram::{Segments, DEFAULT_WARNING_FRACTION};
pub use layout::{
    Column, Layout, ADDRESS_SLOTS, LABEL_WIDTH, RESERVED_BOTTOM_ROWS, TABLE_TOP,
};
pub use peers::{sort_peers, PeerView, SortColumn, SortOrder};
pub use render::{render, sync_lag_tier, LagTier, RenderInput, TITLE};

use std::io;

/// Something a `Frame` can be drawn on.
pub trait Surface {
    /// Current size as `(rows, columns)`.
    fn size(&self) -> io::Result<(u16, u16)>;
    fn present(&mut self, frame: &Frame) -> io::Result<()>;
}
