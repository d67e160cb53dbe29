//! Platform abstraction layer
//!
//! Turns raw key events into the fixed-shape `InputSnapshot` the simulation
//! consumes. Key codes follow `KeyboardEvent.code` naming so the browser build
//! can forward events untouched; unrecognized codes are ignored.

use std::collections::HashSet;

use crate::sim::InputSnapshot;

/// Logical game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Shoot,
    Confirm,
}

impl Action {
    /// Actions bound to a key code. Space both fires and confirms.
    pub fn for_code(code: &str) -> &'static [Action] {
        match code {
            "ArrowLeft" | "KeyA" => &[Action::Left],
            "ArrowRight" | "KeyD" => &[Action::Right],
            "ArrowUp" | "KeyW" => &[Action::Up],
            "ArrowDown" | "KeyS" => &[Action::Down],
            "Space" => &[Action::Shoot, Action::Confirm],
            "KeyZ" => &[Action::Shoot],
            "Enter" | "NumpadEnter" => &[Action::Confirm],
            _ => &[],
        }
    }
}

/// Currently held keys
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    held: HashSet<String>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Returns true if the code is bound to anything.
    pub fn press(&mut self, code: &str) -> bool {
        if Action::for_code(code).is_empty() {
            return false;
        }
        self.held.insert(code.to_string());
        true
    }

    /// Key went up
    pub fn release(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Forget everything (focus lost, key-ups will never arrive)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held
            .iter()
            .any(|code| Action::for_code(code).contains(&action))
    }

    /// Snapshot of every action for this tick
    pub fn snapshot(&self) -> InputSnapshot {
        let mut input = InputSnapshot::default();
        for action in self.held.iter().flat_map(|code| Action::for_code(code)) {
            match action {
                Action::Left => input.left = true,
                Action::Right => input.right = true,
                Action::Up => input.up = true,
                Action::Down => input.down = true,
                Action::Shoot => input.shoot = true,
                Action::Confirm => input.confirm = true,
            }
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut keys = Keyboard::new();
        assert!(!keys.press("F13"));
        assert!(!keys.press(""));
        assert_eq!(keys.snapshot(), InputSnapshot::default());
    }

    #[test]
    fn test_space_fires_and_confirms() {
        let mut keys = Keyboard::new();
        assert!(keys.press("Space"));
        let input = keys.snapshot();
        assert!(input.shoot && input.confirm);
        assert!(!input.left && !input.right && !input.up && !input.down);
    }

    #[test]
    fn test_alternate_bindings_share_action() {
        let mut keys = Keyboard::new();
        keys.press("ArrowLeft");
        keys.press("KeyA");
        keys.release("ArrowLeft");
        assert!(keys.snapshot().left);
        keys.release("KeyA");
        assert!(!keys.snapshot().left);
    }

    #[test]
    fn test_opposite_directions_cancel() {
        let mut keys = Keyboard::new();
        keys.press("KeyW");
        keys.press("KeyS");
        keys.press("KeyD");
        assert_eq!(keys.snapshot().axis(), (1.0, 0.0));
        assert!(keys.is_held(Action::Up));
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut keys = Keyboard::new();
        keys.press("KeyZ");
        keys.press("Enter");
        keys.clear();
        assert_eq!(keys.snapshot(), InputSnapshot::default());
    }
}
