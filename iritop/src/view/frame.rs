/// Semantic color of a draw; the surface decides how each one looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Plain,
    Title,
    Header,
    Label,
    Value,
    Address,
    Counter,
    Ok,
    Warning,
    Severe,
    Error,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
    pub tone: Tone,
    /// The underlying value differs from the previous frame.
    pub changed: bool,
}

impl Style {
    pub const fn new(tone: Tone) -> Style {
        Style {
            tone,
            changed: false,
        }
    }

    pub const fn changed_if(self, changed: bool) -> Style {
        Style {
            tone: self.tone,
            changed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOp {
    pub row: u16,
    pub col: u16,
    pub text: String,
    pub style: Style,
}

/// One complete screen update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub rows: u16,
    pub cols: u16,
    /// Wipe the screen before drawing.
    pub clear: bool,
    ops: Vec<DrawOp>,
}

impl Frame {
    pub fn new(rows: u16, cols: u16) -> Frame {
        Frame {
            rows,
            cols,
            clear: false,
            ops: Vec::new(),
        }
    }

    /// Queues `text` at (row, col), cut at the right edge so nothing wraps.
    /// Returns the column just past the drawn text.
    pub fn put(&mut self, row: u16, col: u16, text: &str, style: Style) -> u16 {
        if row >= self.rows || col >= self.cols || text.is_empty() {
            return col;
        }
        let room = usize::from(self.cols - col);
        let text: String = text.chars().take(room).collect();
        let end = col + text.chars().count() as u16;
        self.ops.push(DrawOp {
            row,
            col,
            text,
            style,
        });
        end
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// First draw whose text contains `needle`.
    pub fn find(&self, needle: &str) -> Option<&DrawOp> {
        self.ops.iter().find(|op| op.text.contains(needle))
    }

    pub fn ops_on_row(&self, row: u16) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(move |op| op.row == row)
    }

    pub fn max_row(&self) -> Option<u16> {
        self.ops.iter().map(|op| op.row).max()
    }
}
