//! Keyboard mapping and held-key tracking
//!
//! Terminals that support keyboard enhancement report key releases, so a
//! direction is held from press to release. Classic terminals only repeat
//! presses; there a direction counts as held while its last press is at most
//! `hold_ticks` ticks old.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::TickInput;

/// Ticks a key stays held after its last press on terminals without release events
pub const DEFAULT_HOLD_TICKS: u64 = 8;

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Pause,
    /// Space: restart after game over, start from the menu
    Restart,
    /// Enter: start from the menu
    Confirm,
    /// Esc: leave the round, or exit from the menu
    Back,
    Quit,
}

impl Action {
    /// Movement keys are level-triggered, everything else fires once per press
    pub fn is_held(self) -> bool {
        matches!(self, Action::Left | Action::Right | Action::Up | Action::Down)
    }
}

/// Map a key to its action
pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Quit),
            _ => None,
        };
    }
    let action = match key.code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Action::Left,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Action::Right,
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Action::Up,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Action::Down,
        KeyCode::Char('p') | KeyCode::Char('P') => Action::Pause,
        KeyCode::Char(' ') => Action::Restart,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::Back,
        KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Accumulates key events between ticks
#[derive(Debug)]
pub struct InputState {
    /// Held action -> tick it was last pressed or repeated
    last_seen: HashMap<Action, u64>,
    /// One-shot presses not yet consumed
    pressed: Vec<Action>,
    tick: u64,
    /// `None` when the terminal reports releases
    hold_ticks: Option<u64>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_TICKS)
    }
}

impl InputState {
    /// Held keys expire `hold_ticks` ticks after their last press or repeat
    pub fn new(hold_ticks: u64) -> Self {
        Self::with_hold(Some(hold_ticks))
    }

    /// Held keys last until their release event
    pub fn release_aware() -> Self {
        Self::with_hold(None)
    }

    /// Pick the hold model the terminal supports
    pub fn for_terminal(reports_releases: bool) -> Self {
        if reports_releases {
            Self::release_aware()
        } else {
            Self::default()
        }
    }

    fn with_hold(hold_ticks: Option<u64>) -> Self {
        Self {
            last_seen: HashMap::new(),
            pressed: Vec::new(),
            tick: 0,
            hold_ticks,
        }
    }

    fn fresh(&self, last: u64) -> bool {
        self.hold_ticks
            .is_none_or(|hold| self.tick.saturating_sub(last) <= hold)
    }

    pub fn handle_key(&mut self, key: &KeyEvent) {
        let Some(action) = action_for(key) else {
            return;
        };
        match key.kind {
            KeyEventKind::Press => {
                if action.is_held() {
                    self.last_seen.insert(action, self.tick);
                } else {
                    self.pressed.push(action);
                }
            }
            KeyEventKind::Repeat => {
                if action.is_held() {
                    self.last_seen.insert(action, self.tick);
                }
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&action);
            }
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.last_seen
            .get(&action)
            .is_some_and(|&last| self.fresh(last))
    }

    /// Consume every pending press of `action`
    pub fn take(&mut self, action: Action) -> bool {
        let before = self.pressed.len();
        self.pressed.retain(|&a| a != action);
        self.pressed.len() != before
    }

    /// Build the input for the next simulation tick and advance the clock
    pub fn next_tick(&mut self) -> TickInput {
        let input = TickInput {
            left: self.is_held(Action::Left),
            right: self.is_held(Action::Right),
            up: self.is_held(Action::Up),
            down: self.is_held(Action::Down),
            pause: self.take(Action::Pause),
            restart: self.take(Action::Restart),
        };
        self.tick += 1;
        if let Some(hold) = self.hold_ticks {
            let tick = self.tick;
            self.last_seen
                .retain(|_, last| tick.saturating_sub(*last) <= hold);
        }
        input
    }

    /// Forget held keys and pending presses (on screen changes)
    pub fn clear(&mut self) {
        self.last_seen.clear();
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(action_for(&press(KeyCode::Left)), Some(Action::Left));
        assert_eq!(action_for(&press(KeyCode::Char('d'))), Some(Action::Right));
        assert_eq!(action_for(&press(KeyCode::Char('W'))), Some(Action::Up));
        assert_eq!(action_for(&press(KeyCode::Char('s'))), Some(Action::Down));
        assert_eq!(action_for(&press(KeyCode::Char('p'))), Some(Action::Pause));
        assert_eq!(action_for(&press(KeyCode::Char(' '))), Some(Action::Restart));
        assert_eq!(action_for(&press(KeyCode::Enter)), Some(Action::Confirm));
        assert_eq!(action_for(&press(KeyCode::Esc)), Some(Action::Back));
        assert_eq!(action_for(&press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(action_for(&press(KeyCode::Char('x'))), None);
        assert_eq!(
            action_for(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(
            action_for(&KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_held_until_release() {
        // No repeats arrive before the OS auto-repeat delay
        let mut input = InputState::for_terminal(true);
        input.handle_key(&press(KeyCode::Left));
        for _ in 0..40 {
            assert!(input.next_tick().left);
        }
        input.handle_key(&release(KeyCode::Left));
        assert!(!input.next_tick().left);
    }

    #[test]
    fn test_classic_terminal_uses_timeout() {
        let mut input = InputState::for_terminal(false);
        input.handle_key(&press(KeyCode::Left));
        let held = (0..20).filter(|_| input.next_tick().left).count() as u64;
        assert_eq!(held, DEFAULT_HOLD_TICKS + 1);
    }

    #[test]
    fn test_hold_expires_without_release() {
        let mut input = InputState::new(3);
        input.handle_key(&press(KeyCode::Up));
        let held: Vec<bool> = (0..6).map(|_| input.next_tick().up).collect();
        assert_eq!(held, vec![true, true, true, true, false, false]);
    }

    #[test]
    fn test_repeat_keeps_key_held() {
        let mut input = InputState::new(2);
        input.handle_key(&press(KeyCode::Right));
        for _ in 0..10 {
            assert!(input.next_tick().right);
            let mut repeat = press(KeyCode::Right);
            repeat.kind = KeyEventKind::Repeat;
            input.handle_key(&repeat);
        }
    }

    #[test]
    fn test_pause_and_restart_are_one_shot() {
        let mut input = InputState::default();
        input.handle_key(&press(KeyCode::Char('p')));
        input.handle_key(&press(KeyCode::Char(' ')));
        let first = input.next_tick();
        assert!(first.pause);
        assert!(first.restart);
        let second = input.next_tick();
        assert!(!second.pause);
        assert!(!second.restart);
    }

    #[test]
    fn test_take_consumes_duplicates() {
        let mut input = InputState::default();
        input.handle_key(&press(KeyCode::Esc));
        input.handle_key(&press(KeyCode::Esc));
        assert!(input.take(Action::Back));
        assert!(!input.take(Action::Back));
    }

    #[test]
    fn test_clear() {
        let mut input = InputState::default();
        input.handle_key(&press(KeyCode::Down));
        input.handle_key(&press(KeyCode::Enter));
        input.clear();
        assert!(!input.take(Action::Confirm));
        assert!(!input.next_tick().down);
    }
}
