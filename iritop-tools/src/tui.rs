use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::{cursor, terminal, ExecutableCommand, QueueableCommand};
use iritop::view::{Frame, Surface, Tone};
use std::io::{self, Write};

/// Raw-mode alternate screen. `teardown` must run before the process exits,
/// including on panic; see `install_panic_hook`.
pub struct Tui {
    stdout: io::Stdout,
}

impl Tui {
    pub fn setup() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        stdout.execute(terminal::EnterAlternateScreen)?;
        stdout.execute(cursor::Hide)?;
        Ok(Self { stdout })
    }

    pub fn teardown(&mut self) {
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }

    /// Restores the terminal before the previous panic hook prints.
    pub fn install_panic_hook() {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let mut t = Tui {
                stdout: io::stdout(),
            };
            t.teardown();
            original_hook(panic_info);
        }));
    }
}

impl Surface for Tui {
    fn size(&self) -> io::Result<(u16, u16)> {
        let (cols, rows) = terminal::size()?;
        Ok((rows, cols))
    }

    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        queue_frame(&mut self.stdout, frame)?;
        self.stdout.flush()
    }
}

/// Foreground, optional background and bold for a tone.
pub fn tone_colors(tone: Tone) -> (Color, Option<Color>, bool) {
    match tone {
        Tone::Plain => (Color::Reset, None, false),
        Tone::Title => (Color::Black, Some(Color::Cyan), true),
        Tone::Header => (Color::Black, Some(Color::Green), false),
        Tone::Label => (Color::Cyan, None, false),
        Tone::Value => (Color::Cyan, None, true),
        Tone::Address => (Color::White, None, false),
        Tone::Counter => (Color::Green, None, false),
        Tone::Ok => (Color::Green, None, true),
        Tone::Warning => (Color::Yellow, None, true),
        Tone::Severe => (Color::Red, None, true),
        Tone::Error => (Color::DarkRed, None, false),
        Tone::Muted => (Color::DarkGrey, None, false),
    }
}

/// Queues every draw in `frame`; changed values are drawn reversed.
pub fn queue_frame<W: Write>(out: &mut W, frame: &Frame) -> io::Result<()> {
    if frame.clear {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
    }
    for op in frame.ops() {
        let (fg, bg, bold) = tone_colors(op.style.tone);
        out.queue(cursor::MoveTo(op.col, op.row))?;
        out.queue(SetForegroundColor(fg))?;
        if let Some(bg) = bg {
            out.queue(SetBackgroundColor(bg))?;
        }
        if bold {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        if op.style.changed {
            out.queue(SetAttribute(Attribute::Reverse))?;
        }
        out.queue(Print(&op.text))?;
        out.queue(SetAttribute(Attribute::Reset))?;
        out.queue(ResetColor)?;
    }
    Ok(())
}
