//! # Input Script Parser
//!
//! Line-based key scripts for deterministic runs and demos.
//!
//! ## Format
//!
//! - Key names: `Enter`, `Escape`, `Backspace`, `Up`, `Down`, `F1`, `Grave`
//! - Single characters: `a`, `?`, `` ` ``
//! - Modifiers: `Ctrl+c`, `Alt+x`, `Shift+a`
//! - Text strings: `"give sword"` (expanded to individual key presses)
//! - Tick boundaries: `tick` or `tick 3`
//! - Comments: `# This is a comment`, also after a key name
//!
//! Keys between two `tick` lines are delivered before the same controller
//! update.
//!
//! ## Example
//!
//! ```text
//! F1                   # focus the console
//! tick
//! "gi"
//! tick
//! Down                 # select the second candidate
//! Enter
//! tick
//! ```

use input_types::{InputEvent, KeyCode, KeyEvent, Modifiers};
use std::collections::VecDeque;
use thiserror::Error;

/// Input script error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputScriptError {
    #[error("Invalid key name: {0}")]
    InvalidKeyName(String),

    #[error("Invalid modifier: {0}")]
    InvalidModifier(String),

    #[error("Invalid tick count: {0}")]
    InvalidTickCount(String),

    #[error("Parse error at line {line}: {source}")]
    ParseError {
        line: usize,
        #[source]
        source: Box<InputScriptError>,
    },

    #[error("Empty script")]
    EmptyScript,
}

/// A single scripted input action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedInput {
    /// A single key press
    Key(KeyCode, Modifiers),
    /// End of the current tick
    Tick,
}

/// Input script
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    inputs: VecDeque<ScriptedInput>,
}

impl InputScript {
    /// Creates a new empty input script
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a script from text
    ///
    /// A script with no inputs at all is rejected.
    pub fn from_text(text: &str) -> Result<Self, InputScriptError> {
        let mut inputs = VecDeque::new();

        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parsed = Self::parse_line(line).map_err(|e| InputScriptError::ParseError {
                line: line_num + 1,
                source: Box::new(e),
            })?;
            inputs.extend(parsed);
        }

        if inputs.is_empty() {
            return Err(InputScriptError::EmptyScript);
        }

        Ok(Self { inputs })
    }

    fn parse_line(line: &str) -> Result<Vec<ScriptedInput>, InputScriptError> {
        if line.len() >= 2 && line.starts_with('"') && line.ends_with('"') {
            let text = &line[1..line.len() - 1];
            return Ok(text
                .chars()
                .map(|c| ScriptedInput::Key(Self::char_to_keycode(c), Modifiers::none()))
                .collect());
        }

        // Trailing comment after a key name
        let line = match line.find(" #") {
            Some(at) => line[..at].trim_end(),
            None => line,
        };

        if let Some(rest) = line.strip_prefix("tick") {
            if rest.is_empty() || rest.starts_with(' ') {
                return Self::parse_tick(rest.trim());
            }
        }

        let (modifiers, key_name) = Self::parse_modifiers(line)?;
        let code = KeyCode::from_name(key_name)
            .ok_or_else(|| InputScriptError::InvalidKeyName(key_name.to_string()))?;

        Ok(vec![ScriptedInput::Key(code, modifiers)])
    }

    fn parse_tick(count: &str) -> Result<Vec<ScriptedInput>, InputScriptError> {
        if count.is_empty() {
            return Ok(vec![ScriptedInput::Tick]);
        }
        match count.parse::<usize>() {
            Ok(n) if n > 0 => Ok(vec![ScriptedInput::Tick; n]),
            _ => Err(InputScriptError::InvalidTickCount(count.to_string())),
        }
    }

    /// Splits `Ctrl+Shift+x` into modifiers and the key name
    ///
    /// A lone `+` is the plus key.
    fn parse_modifiers(input: &str) -> Result<(Modifiers, &str), InputScriptError> {
        let Some((prefix, key)) = input.rsplit_once('+') else {
            return Ok((Modifiers::none(), input));
        };
        if prefix.is_empty() && key.is_empty() {
            return Ok((Modifiers::none(), input));
        }

        let mut modifiers = Modifiers::none();
        for modifier in prefix.split('+') {
            modifiers = match modifier.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.with(Modifiers::CTRL),
                "alt" => modifiers.with(Modifiers::ALT),
                "shift" => modifiers.with(Modifiers::SHIFT),
                "super" | "meta" => modifiers.with(Modifiers::META),
                other => return Err(InputScriptError::InvalidModifier(other.to_string())),
            };
        }

        Ok((modifiers, key.trim()))
    }

    fn char_to_keycode(c: char) -> KeyCode {
        match c {
            ' ' => KeyCode::Space,
            c => KeyCode::Char(c),
        }
    }

    /// Gets the next input
    pub fn next_input(&mut self) -> Option<ScriptedInput> {
        self.inputs.pop_front()
    }

    /// Checks if there are more inputs
    pub fn has_more(&self) -> bool {
        !self.inputs.is_empty()
    }

    /// Returns the number of remaining inputs
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }

    /// Converts a scripted key into a press event
    pub fn to_input_event(input: &ScriptedInput) -> Option<InputEvent> {
        match input {
            ScriptedInput::Key(code, modifiers) => {
                Some(InputEvent::key(KeyEvent::pressed(*code, *modifiers)))
            }
            ScriptedInput::Tick => None,
        }
    }
}
