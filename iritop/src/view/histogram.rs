/// Fraction of the maximum above which usage is drawn as a warning.
pub const DEFAULT_WARNING_FRACTION: f64 = 0.8;

/// Character counts of the three parts of a usage bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segments {
    pub ok: u16,
    pub warning: u16,
    pub free: u16,
}

impl Segments {
    /// Splits a `width` character bar for `used` out of `max`. Usage up to
    /// `warning_fraction` of the bar is ok, usage past it is warning, the
    /// rest is free. The parts always add up to `width`.
    pub fn compute(used: i64, max: i64, warning_fraction: f64, width: u16) -> Segments {
        let used_chars = if max <= 0 || used <= 0 {
            0
        } else {
            let fill = (used as f64 / max as f64) * f64::from(width);
            fill.floor().min(f64::from(width)) as u16
        };
        let limit = (warning_fraction.clamp(0.0, 1.0) * f64::from(width)).floor() as u16;
        let ok = used_chars.min(limit);
        Segments {
            ok,
            warning: used_chars - ok,
            free: width - used_chars,
        }
    }

    pub fn total(&self) -> u16 {
        self.ok + self.warning + self.free
    }
}
