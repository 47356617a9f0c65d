use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use iritop::dashboard::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Quit,
    Command(Command),
}

/// Maps a terminal event to a dashboard input. Key releases and repeats,
/// mouse and resize events map to nothing.
pub fn map_event(event: &Event) -> Option<Input> {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return None;
    };

    let input = match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Input::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Input::Quit,
        KeyCode::Char('b') | KeyCode::Char('B') => Input::Command(Command::ToggleBaseline),
        KeyCode::Char('h') | KeyCode::Char('H') => Input::Command(Command::ToggleObscure),
        KeyCode::Char('s') | KeyCode::Char('S') => Input::Command(Command::CycleSort),
        KeyCode::Char('r') | KeyCode::Char('R') => Input::Command(Command::ReverseSort),
        _ => return None,
    };
    Some(input)
}
