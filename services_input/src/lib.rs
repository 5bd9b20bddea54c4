//! # Input Service
//!
//! This crate turns keyboard events into the console's per-tick device signals.
//!
//! ## Philosophy
//!
//! - **Latched, not streamed**: Bound keys set a flag that survives until the next poll
//! - **Explicit bindings**: Every signal comes from a key the host bound on purpose
//! - **Events, not streams**: Input is structured events, not byte streams
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A hardware driver (no PS/2, USB HID)
//! - A terminal emulator (no TTY, no stdin/stdout)
//! - A text editor (editing keys are handed back as [`TextEdit`]s)

use console_core::{DeviceInput, DeviceSignals};
use input_types::{InputEvent, KeyCode, KeyEvent};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Input service error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputServiceError {
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("Unknown device action: {0}")]
    UnknownAction(String),
}

/// A console signal a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceAction {
    Focus,
    QuitFocus,
    MoveUp,
    MoveDown,
}

impl DeviceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceAction::Focus => "focus",
            DeviceAction::QuitFocus => "quit_focus",
            DeviceAction::MoveUp => "move_up",
            DeviceAction::MoveDown => "move_down",
        }
    }
}

impl fmt::Display for DeviceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeviceAction {
    type Err = InputServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "focus" => Ok(DeviceAction::Focus),
            "quit_focus" | "quit" | "unfocus" => Ok(DeviceAction::QuitFocus),
            "move_up" | "up" => Ok(DeviceAction::MoveUp),
            "move_down" | "down" => Ok(DeviceAction::MoveDown),
            _ => Err(InputServiceError::UnknownAction(s.to_string())),
        }
    }
}

/// Key-to-signal bindings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keybindings {
    pub focus: Vec<KeyCode>,
    pub quit_focus: Vec<KeyCode>,
    pub move_up: Vec<KeyCode>,
    pub move_down: Vec<KeyCode>,
}

impl Keybindings {
    /// No key bound to anything
    pub fn empty() -> Self {
        Self {
            focus: Vec::new(),
            quit_focus: Vec::new(),
            move_up: Vec::new(),
            move_down: Vec::new(),
        }
    }

    /// Adds `key` to the keys triggering `action`
    pub fn bind(&mut self, action: DeviceAction, key: KeyCode) {
        let keys = self.keys_mut(action);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    /// Binds a key given by name, e.g. `bind_named(DeviceAction::Focus, "F2")`
    pub fn bind_named(&mut self, action: DeviceAction, key: &str) -> Result<(), InputServiceError> {
        let code = KeyCode::from_name(key)
            .ok_or_else(|| InputServiceError::UnknownKey(key.to_string()))?;
        self.bind(action, code);
        Ok(())
    }

    /// Removes every key bound to `action`
    pub fn clear(&mut self, action: DeviceAction) {
        self.keys_mut(action).clear();
    }

    /// Returns the action bound to `key`
    ///
    /// Checked in signal priority order: quit focus, focus, down, up.
    pub fn action_for(&self, key: KeyCode) -> Option<DeviceAction> {
        [
            DeviceAction::QuitFocus,
            DeviceAction::Focus,
            DeviceAction::MoveDown,
            DeviceAction::MoveUp,
        ]
        .into_iter()
        .find(|action| self.keys(*action).contains(&key))
    }

    pub fn keys(&self, action: DeviceAction) -> &[KeyCode] {
        match action {
            DeviceAction::Focus => &self.focus,
            DeviceAction::QuitFocus => &self.quit_focus,
            DeviceAction::MoveUp => &self.move_up,
            DeviceAction::MoveDown => &self.move_down,
        }
    }

    fn keys_mut(&mut self, action: DeviceAction) -> &mut Vec<KeyCode> {
        match action {
            DeviceAction::Focus => &mut self.focus,
            DeviceAction::QuitFocus => &mut self.quit_focus,
            DeviceAction::MoveUp => &mut self.move_up,
            DeviceAction::MoveDown => &mut self.move_down,
        }
    }
}

impl Default for Keybindings {
    /// F1 or backquote focuses, Escape leaves, arrows move
    fn default() -> Self {
        Self {
            focus: vec![KeyCode::F1, KeyCode::Char('`')],
            quit_focus: vec![KeyCode::Escape],
            move_up: vec![KeyCode::Up],
            move_down: vec![KeyCode::Down],
        }
    }
}

/// An editing operation on the input line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEdit {
    Insert(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    Submit,
}

impl TextEdit {
    /// Maps an unbound key event to an edit
    pub fn from_key(event: &KeyEvent) -> Option<Self> {
        if let Some(c) = event.printable() {
            return Some(TextEdit::Insert(c));
        }
        let edit = match event.code {
            KeyCode::Backspace => TextEdit::Backspace,
            KeyCode::Delete => TextEdit::Delete,
            KeyCode::Left => TextEdit::CursorLeft,
            KeyCode::Right => TextEdit::CursorRight,
            KeyCode::Home => TextEdit::CursorHome,
            KeyCode::End => TextEdit::CursorEnd,
            KeyCode::Enter => TextEdit::Submit,
            _ => return None,
        };
        Some(edit)
    }
}

/// What the device did with a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRouting {
    /// Latched into the next poll
    Signal(DeviceAction),
    /// Should be applied to the input line
    Edit(TextEdit),
    /// Released keys and keys with no meaning
    Ignored,
}

/// Keyboard-backed device collaborator
///
/// Bound keys latch their signal until the next [`DeviceInput::poll`]; other
/// keys are returned to the caller as edits.
#[derive(Debug, Clone, Default)]
pub struct KeyboardDevice {
    bindings: Keybindings,
    pending: DeviceSignals,
}

impl KeyboardDevice {
    pub fn new(bindings: Keybindings) -> Self {
        Self {
            bindings,
            pending: DeviceSignals::default(),
        }
    }

    pub fn bindings(&self) -> &Keybindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut Keybindings {
        &mut self.bindings
    }

    /// Signals latched since the last poll
    pub fn pending(&self) -> DeviceSignals {
        self.pending
    }

    /// Routes one input event
    pub fn handle_event(&mut self, event: &InputEvent) -> KeyRouting {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
        }
    }

    /// Routes one key event
    ///
    /// Bindings win over editing, so a bound printable key never types.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyRouting {
        if !event.is_down() {
            return KeyRouting::Ignored;
        }

        if let Some(action) = self.bindings.action_for(event.code) {
            self.latch(action);
            return KeyRouting::Signal(action);
        }

        match TextEdit::from_key(event) {
            Some(edit) => KeyRouting::Edit(edit),
            None => KeyRouting::Ignored,
        }
    }

    /// Latches a signal directly, bypassing key bindings
    pub fn latch(&mut self, action: DeviceAction) {
        match action {
            DeviceAction::Focus => self.pending.focus_requested = true,
            DeviceAction::QuitFocus => self.pending.quit_focus_requested = true,
            DeviceAction::MoveUp => self.pending.move_up_requested = true,
            DeviceAction::MoveDown => self.pending.move_down_requested = true,
        }
    }
}

impl DeviceInput for KeyboardDevice {
    fn poll(&mut self) -> DeviceSignals {
        std::mem::take(&mut self.pending)
    }
}
