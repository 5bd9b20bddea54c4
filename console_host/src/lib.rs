//! # Console Host
//!
//! Headless host that drives the console controller from a key script.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: The controller and the command palette never print
//! - **Output is frame rendering**: Not terminal state
//! - **Input is explicit events**: Scripted key presses, not stdin streams
//! - **Deterministic mode is first-class**: One `update()` per scripted tick
//!
//! ## Responsibilities
//!
//! The host:
//! - Loads settings overrides and derives the console configuration
//! - Boots the palette, keyboard device, text surface and controller
//! - Routes each key to the device (signals) or the surface (edits)
//! - Renders the final frame and exposes the collected logs
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Drive a real terminal (no raw mode, no ANSI)
//! - Persist command history between runs

pub mod commands;
pub mod input_script;
pub mod runtime;

pub use commands::build_command_palette;
pub use input_script::{InputScript, InputScriptError, ScriptedInput};
pub use runtime::{HostRuntime, HostRuntimeConfig, HostRuntimeError};
