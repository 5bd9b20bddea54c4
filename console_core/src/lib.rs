//! # Console Core
//!
//! Interaction core of an in-application command console.
//!
//! ## Philosophy
//!
//! - **Poll-driven**: The host calls [`ConsoleController::update`] once per tick
//! - **Never stuck**: Empty history, empty text and failed commands degrade to
//!   sentinels or no-ops, never to errors
//! - **Collaborators, not globals**: Command execution, rendering and device
//!   polling are traits the host supplies
//! - **Deterministic**: Time is injected, events are drained in write order
//!
//! ## Design
//!
//! The core provides:
//! - HistoryBuffer: Bounded recall ring of submitted commands
//! - CyclicSelector: Wrapping cursor over autocomplete candidates
//! - ConsoleController: Focus / typing / browsing state machine
//! - ConsoleSnapshot: Serializable state for deterministic tests
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A command grammar or dispatcher (see `CommandSystem`)
//! - A renderer (see `ConsoleSurface`)
//! - A keyboard driver (see `DeviceInput`)

pub mod command;
pub mod config;
pub mod controller;
pub mod device;
pub mod history;
pub mod output;
pub mod selector;
pub mod snapshot;
pub mod surface;
pub mod timestamp;

pub use command::{Candidate, CommandSystem};
pub use config::ConsoleConfig;
pub use controller::ConsoleController;
pub use device::{DeviceInput, DeviceSignals};
pub use history::HistoryBuffer;
pub use output::{OutputColor, OutputMessage, OutputQueue, OutputSink};
pub use selector::CyclicSelector;
pub use snapshot::{ConsoleSnapshot, ConsoleState};
pub use surface::{ConsoleSurface, SurfaceEvent};
pub use timestamp::{format_timestamp, Clock, FixedClock, SystemClock};
