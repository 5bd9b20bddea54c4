//! # Host Runtime
//!
//! The tick loop that ties the console together.

use crate::commands::build_command_palette;
use crate::input_script::{InputScript, InputScriptError, ScriptedInput};
use console_core::{Clock, ConsoleConfig, ConsoleController, ConsoleSnapshot, SystemClock};
use input_types::{KeyCode, KeyEvent};
use services_command_palette::CommandPalette;
use services_input::{DeviceAction, InputServiceError, KeyRouting, Keybindings, KeyboardDevice};
use services_logger::{LogBuffer, LogEntry};
use services_settings::persistence::apply_json;
use services_settings::{
    console_config, create_default_registry, key_names, keys, SettingsError, SettingsRegistry,
};
use text_renderer_host::{TextRenderer, TextSurface};
use std::fs;
use std::path::Path;
use thiserror::Error;

const LOG_TARGET: &str = "host";

/// The controller as wired by the host
pub type HostController = ConsoleController<CommandPalette, TextSurface, KeyboardDevice>;

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Script error: {0}")]
    Script(#[from] InputScriptError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Key binding error for {setting}: {source}")]
    KeyBinding {
        setting: &'static str,
        #[source]
        source: InputServiceError,
    },
}

/// Host runtime configuration
#[derive(Debug, Clone, Default)]
pub struct HostRuntimeConfig {
    /// Optional input script text
    pub script: Option<String>,
    /// Optional settings overrides as JSON
    pub settings_json: Option<String>,
    /// Maximum steps to run (0 = unlimited)
    pub max_steps: usize,
}

impl HostRuntimeConfig {
    /// Reads the key script from `path`
    pub fn load_script(&mut self, path: &Path) -> Result<(), HostRuntimeError> {
        self.script = Some(read_file(path)?);
        Ok(())
    }

    /// Reads settings overrides JSON from `path`
    pub fn load_settings(&mut self, path: &Path) -> Result<(), HostRuntimeError> {
        self.settings_json = Some(read_file(path)?);
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String, HostRuntimeError> {
    fs::read_to_string(path).map_err(|source| HostRuntimeError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Host runtime
pub struct HostRuntime {
    config: HostRuntimeConfig,
    settings: SettingsRegistry,
    controller: HostController,
    renderer: TextRenderer,
    script: Option<InputScript>,
    steps: usize,
    log: LogBuffer,
}

impl HostRuntime {
    /// Creates a runtime stamping output with the wall clock
    pub fn new(config: HostRuntimeConfig) -> Result<Self, HostRuntimeError> {
        Self::with_clock(config, SystemClock)
    }

    /// Creates a runtime with an explicit output clock
    pub fn with_clock(
        config: HostRuntimeConfig,
        clock: impl Clock + 'static,
    ) -> Result<Self, HostRuntimeError> {
        let mut log = LogBuffer::default();

        let mut settings = create_default_registry();
        if let Some(json) = &config.settings_json {
            let applied = apply_json(&mut settings, json.as_bytes())?;
            log.record(
                LogEntry::info("settings overrides applied")
                    .with_target(LOG_TARGET)
                    .with_field("count", applied),
            );
        }

        let console = console_config(&settings)?;
        let bindings = load_keybindings(&settings)?;

        let script = match &config.script {
            Some(text) => {
                let script = InputScript::from_text(text)?;
                log.record(
                    LogEntry::info("script loaded")
                        .with_target(LOG_TARGET)
                        .with_field("inputs", script.remaining()),
                );
                Some(script)
            }
            None => None,
        };

        let controller = ConsoleController::new(
            console.clone(),
            build_command_palette(),
            TextSurface::new(console.output_capacity),
            KeyboardDevice::new(bindings),
        )
        .with_clock(clock);

        log.record(
            LogEntry::info("console booted")
                .with_target(LOG_TARGET)
                .with_field("history_capacity", console.history_capacity)
                .with_field("max_alternatives", console.max_alternatives),
        );

        Ok(Self {
            config,
            settings,
            controller,
            renderer: TextRenderer::new(),
            script,
            steps: 0,
            log,
        })
    }

    /// Runs until the script is exhausted or the step limit is hit
    ///
    /// Always performs at least one step. Returns the final frame.
    pub fn run(&mut self) -> String {
        loop {
            self.step();

            let exhausted = self.script.as_ref().map_or(true, |script| !script.has_more());
            let at_limit = self.config.max_steps > 0 && self.steps >= self.config.max_steps;
            if exhausted || at_limit {
                break;
            }
        }

        self.log.record(
            LogEntry::info("run finished")
                .with_target(LOG_TARGET)
                .with_field("steps", self.steps),
        );
        self.render_frame()
    }

    /// Executes a single tick
    ///
    /// Feeds scripted keys up to the next `tick`, then updates the controller.
    pub fn step(&mut self) {
        while let Some(input) = self.script.as_mut().and_then(InputScript::next_input) {
            match input {
                ScriptedInput::Tick => break,
                ScriptedInput::Key(code, modifiers) => {
                    self.handle_key(KeyEvent::pressed(code, modifiers));
                }
            }
        }

        self.controller.update();
        self.steps += 1;
    }

    /// Routes one key event to the device or the surface
    pub fn handle_key(&mut self, event: KeyEvent) {
        match self.controller.device_mut().handle_key(&event) {
            KeyRouting::Signal(action) => {
                self.log.record(
                    LogEntry::debug("signal latched")
                        .with_target(LOG_TARGET)
                        .with_field("action", action),
                );
            }
            KeyRouting::Edit(edit) => {
                self.controller.surface_mut().apply_edit(edit);
            }
            KeyRouting::Ignored => self.scroll(event.code),
        }
    }

    fn scroll(&mut self, code: KeyCode) {
        let surface = self.controller.surface_mut();
        let page = surface.scrollback().viewport_rows();
        match code {
            KeyCode::PageUp => {
                surface.scroll_output_up(page);
            }
            KeyCode::PageDown => {
                surface.scroll_output_down(page);
            }
            _ => {}
        }
    }

    /// Renders the current surface with a state / history status line
    pub fn render_frame(&mut self) -> String {
        let status = format!(
            "{} | history {}",
            self.controller.state().as_str(),
            self.controller.history().len()
        );
        self.renderer.render(self.controller.surface(), Some(&status))
    }

    /// Gets the step count
    pub fn step_count(&self) -> usize {
        self.steps
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        self.controller.snapshot()
    }

    pub fn controller(&self) -> &HostController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut HostController {
        &mut self.controller
    }

    pub fn console_config(&self) -> &ConsoleConfig {
        self.controller.config()
    }

    pub fn settings(&self) -> &SettingsRegistry {
        &self.settings
    }

    /// Host log entries
    pub fn log(&self) -> &LogBuffer {
        &self.log
    }

    /// Every collected log line: host, then controller, then palette
    pub fn log_lines(&self) -> Vec<String> {
        let mut lines = self.log.lines();
        lines.extend(self.controller.log().lines());
        lines.extend(self.controller.commands().log().lines());
        lines
    }
}

/// Builds key bindings from the `console.keys.*` settings
///
/// An action with no configured names keeps its default keys.
fn load_keybindings(settings: &SettingsRegistry) -> Result<Keybindings, HostRuntimeError> {
    let mut bindings = Keybindings::default();

    for (setting, action) in [
        (keys::KEYS_FOCUS, DeviceAction::Focus),
        (keys::KEYS_QUIT_FOCUS, DeviceAction::QuitFocus),
        (keys::KEYS_MOVE_UP, DeviceAction::MoveUp),
        (keys::KEYS_MOVE_DOWN, DeviceAction::MoveDown),
    ] {
        let names = key_names(settings, setting)?;
        if names.is_empty() {
            continue;
        }

        bindings.clear(action);
        for name in &names {
            bindings
                .bind_named(action, name)
                .map_err(|source| HostRuntimeError::KeyBinding { setting, source })?;
        }
    }

    Ok(bindings)
}
