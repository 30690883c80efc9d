//! Keyboard shortcuts

use crate::state::scene::SceneEditor;

/// Modifier keys held with a key press. `meta` is Cmd on macOS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
        ..Self::NONE
    };

    /// Ctrl, or Cmd on macOS
    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    Delete,
    Deselect,
    Duplicate,
    Frame,
}

impl Shortcut {
    /// Map a key (as reported by `KeyboardEvent.key`) to an editor shortcut
    pub fn from_key(key: &str, mods: Modifiers) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        match key.as_str() {
            "z" if mods.command() && mods.shift => Some(Shortcut::Redo),
            "z" if mods.command() => Some(Shortcut::Undo),
            "y" if mods.command() => Some(Shortcut::Redo),
            "d" if mods.command() => Some(Shortcut::Duplicate),
            "delete" | "backspace" if !mods.command() => Some(Shortcut::Delete),
            "escape" => Some(Shortcut::Deselect),
            "f" if !mods.command() && !mods.alt => Some(Shortcut::Frame),
            _ => None,
        }
    }
}

impl SceneEditor {
    /// Run a shortcut. Returns true if it did anything.
    pub fn apply_shortcut(&mut self, shortcut: Shortcut) -> bool {
        match shortcut {
            Shortcut::Undo => self.undo(),
            Shortcut::Redo => self.redo(),
            Shortcut::Delete => self.delete_selected(),
            Shortcut::Deselect => {
                if self.is_dragging() {
                    self.cancel_drag();
                    true
                } else {
                    self.deselect()
                }
            }
            Shortcut::Duplicate => self.duplicate_selected().is_some(),
            Shortcut::Frame => self.frame_selected() || self.frame_all(),
        }
    }

    /// Key press entry point for hosts
    pub fn handle_key(&mut self, key: &str, mods: Modifiers) -> bool {
        match Shortcut::from_key(key, mods) {
            Some(shortcut) => self.apply_shortcut(shortcut),
            None => false,
        }
    }
}
