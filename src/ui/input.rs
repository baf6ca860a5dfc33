/// Keyboard input: drains crossterm events and turns key presses into
/// app `Command`s.
///
/// Menus only care about presses, so Release events are dropped and held
/// keys repeat through the terminal's own key repeat.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::Command;

pub struct InputState {
    /// Commands produced by the most recent `drain_events()`, in order.
    pub commands: Vec<Command>,

    /// Raw key events collected during drain.
    pub raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            commands: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame.
    pub fn drain_events(&mut self) {
        self.commands.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    self.raw_events.push(key);
                    if let Some(cmd) = translate(key) {
                        self.commands.push(cmd);
                    }
                }
                Ok(Event::Paste(text)) => self.commands.extend(paste_commands(&text)),
                Ok(_) => {}
                Err(e) => {
                    log::warn!("terminal event read failed: {e}");
                    break;
                }
            }
        }
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(is_ctrl_c)
    }
}

fn is_ctrl_c(k: &KeyEvent) -> bool {
    k.modifiers.contains(KeyModifiers::CONTROL)
        && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
}

/// Pasted text (bracketed paste is enabled by the renderer) arrives as one
/// event; it is fed through as typed characters. Line breaks are dropped so
/// a paste never submits.
pub fn paste_commands(text: &str) -> impl Iterator<Item = Command> + '_ {
    text.chars().filter(|c| !c.is_control()).map(Command::Char)
}

/// One key press → one command. Releases and unmapped keys give `None`.
pub fn translate(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if is_ctrl_c(&key) {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::Up => Some(Command::Up),
        KeyCode::Down | KeyCode::Tab => Some(Command::Down),
        KeyCode::BackTab => Some(Command::Up),
        KeyCode::Left => Some(Command::Left),
        KeyCode::Right => Some(Command::Right),
        KeyCode::Enter => Some(Command::Confirm),
        KeyCode::Esc => Some(Command::Back),
        KeyCode::Backspace => Some(Command::Backspace),
        KeyCode::F(2) => Some(Command::ToggleSoundPanel),
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Some(Command::Char(c))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent { code, modifiers, kind, state: KeyEventState::NONE }
    }

    fn press(code: KeyCode) -> KeyEvent {
        key(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(translate(press(KeyCode::Up)), Some(Command::Up));
        assert_eq!(translate(press(KeyCode::Tab)), Some(Command::Down));
        assert_eq!(translate(press(KeyCode::Enter)), Some(Command::Confirm));
        assert_eq!(translate(press(KeyCode::Esc)), Some(Command::Back));
        assert_eq!(translate(press(KeyCode::F(2))), Some(Command::ToggleSoundPanel));
        assert_eq!(translate(press(KeyCode::F(5))), None);
    }

    #[test]
    fn chars_and_modifiers() {
        assert_eq!(translate(press(KeyCode::Char('x'))), Some(Command::Char('x')));
        let shifted = key(KeyCode::Char('X'), KeyModifiers::SHIFT, KeyEventKind::Press);
        assert_eq!(translate(shifted), Some(Command::Char('X')));
        let ctrl_c = key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(translate(ctrl_c), Some(Command::Quit));
        let alt = key(KeyCode::Char('a'), KeyModifiers::ALT, KeyEventKind::Press);
        assert_eq!(translate(alt), None);
    }

    #[test]
    fn paste_becomes_typed_chars() {
        let cmds: Vec<Command> = paste_commands("ab\r\nc").collect();
        assert_eq!(cmds, vec![Command::Char('a'), Command::Char('b'), Command::Char('c')]);
    }

    #[test]
    fn releases_are_ignored_repeats_are_not() {
        let up = key(KeyCode::Down, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(translate(up), None);
        let rep = key(KeyCode::Down, KeyModifiers::NONE, KeyEventKind::Repeat);
        assert_eq!(translate(rep), Some(Command::Down));
    }
}
