//! ConsoleController state machine
//!
//! Arbitrates between polled device signals and the surface's submit /
//! text-changed events. See [`ConsoleState`] for the three states.

use crate::command::{Candidate, CommandSystem};
use crate::config::ConsoleConfig;
use crate::device::DeviceInput;
use crate::history::HistoryBuffer;
use crate::output::{self, OutputColor, OutputQueue};
use crate::selector::CyclicSelector;
use crate::snapshot::{ConsoleSnapshot, ConsoleState};
use crate::surface::{ConsoleSurface, SurfaceEvent};
use crate::timestamp::{format_timestamp, Clock, SystemClock};
use services_logger::{LogBuffer, LogEntry};

const LOG_TARGET: &str = "console";

/// Subscriber notified when the input field gains or loses focus
pub type FocusObserver = Box<dyn FnMut()>;

/// A history recall the controller wrote into the input field
///
/// The text-changed event carrying both `revision` and `text` is the echo of
/// this write and must not trigger an autocomplete query.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RecallWrite {
    revision: u64,
    text: String,
}

/// Console interaction controller
///
/// Owns the history, the candidate selector and the three collaborators.
pub struct ConsoleController<C, S, D> {
    config: ConsoleConfig,
    commands: C,
    surface: S,
    device: D,
    clock: Box<dyn Clock>,
    history: HistoryBuffer,
    selector: CyclicSelector,
    focused: bool,
    autocomplete_active: bool,
    pending_recall: Option<RecallWrite>,
    current_text: String,
    candidates: Vec<Candidate>,
    output: OutputQueue,
    focus_gained: Vec<FocusObserver>,
    focus_lost: Vec<FocusObserver>,
    log: LogBuffer,
}

impl<C, S, D> ConsoleController<C, S, D>
where
    C: CommandSystem,
    S: ConsoleSurface,
    D: DeviceInput,
{
    /// Creates a controller and wires the command system's output sink
    pub fn new(config: ConsoleConfig, mut commands: C, surface: S, device: D) -> Self {
        let config = config.clamped();
        let (sink, output) = output::channel();
        commands.attach_output(sink);

        Self {
            history: HistoryBuffer::new(config.history_capacity),
            selector: CyclicSelector::new(),
            config,
            commands,
            surface,
            device,
            clock: Box::new(SystemClock),
            focused: false,
            autocomplete_active: false,
            pending_recall: None,
            current_text: String::new(),
            candidates: Vec::new(),
            output,
            focus_gained: Vec::new(),
            focus_lost: Vec::new(),
            log: LogBuffer::default(),
        }
    }

    /// Replaces the clock used for output timestamps
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the log buffer
    pub fn with_log(mut self, log: LogBuffer) -> Self {
        self.log = log;
        self
    }

    pub fn on_focus_gained(&mut self, observer: impl FnMut() + 'static) {
        self.focus_gained.push(Box::new(observer));
    }

    pub fn on_focus_lost(&mut self, observer: impl FnMut() + 'static) {
        self.focus_lost.push(Box::new(observer));
    }

    /// Subscribes to candidate selection moves
    pub fn on_selection_changed(&mut self, observer: impl FnMut(usize) + 'static) {
        self.selector.subscribe(observer);
    }

    /// Per-tick entry point
    ///
    /// Quit-focus wins over every other focused-state signal in the same tick.
    pub fn update(&mut self) {
        self.dispatch_surface_events();

        let signals = self.device.poll();

        if !self.focused && signals.focus_requested {
            self.gain_focus();
        }

        if self.focused {
            if signals.quit_focus_requested {
                self.lose_focus();
            } else {
                if signals.move_down_requested {
                    self.move_down();
                }
                if signals.move_up_requested {
                    self.move_up();
                }
            }
        }

        self.flush_output();
        self.dispatch_surface_events();
    }

    /// Submit entry point
    ///
    /// While browsing, accepts the selected candidate. Otherwise echoes the
    /// text and executes it if non-empty.
    pub fn on_submit(&mut self, text: &str) {
        if self.state() == ConsoleState::Browsing {
            self.accept_candidate();
            return;
        }

        self.print(text, OutputColor::Echo);
        if text.is_empty() {
            return;
        }

        let success = self.commands.execute(text);
        self.log.record(
            LogEntry::info("command executed")
                .with_target(LOG_TARGET)
                .with_field("text", text)
                .with_field("success", success),
        );

        if success || self.config.record_failed_commands {
            self.history.record(text);
        }

        self.flush_output();
        self.write_input("");
        self.surface.activate_input();
        self.surface.move_scroll_to_end();
    }

    /// Text-changed entry point; queries autocomplete candidates
    ///
    /// The echo of a history recall is swallowed. Candidates queried for
    /// text typed before the recall are dropped along with it, since the
    /// field no longer holds that text.
    pub fn on_text_changed(&mut self, text: &str, revision: u64) {
        if let Some(recall) = &self.pending_recall {
            if recall.revision == revision && recall.text == text {
                self.log.record(
                    LogEntry::debug("recall echo ignored")
                        .with_target(LOG_TARGET)
                        .with_field("revision", revision),
                );
                self.pending_recall = None;
                self.current_text = text.to_string();
                self.deactivate_autocomplete();
                return;
            }
            if revision >= recall.revision {
                self.log.record(
                    LogEntry::warn("stale recall tag dropped")
                        .with_target(LOG_TARGET)
                        .with_field("expected", recall.revision)
                        .with_field("observed", revision),
                );
                self.pending_recall = None;
            }
        }

        self.current_text = text.to_string();

        if text.is_empty() || text.contains(' ') {
            self.deactivate_autocomplete();
            return;
        }

        let mut results = self.commands.query(text, self.config.max_alternatives);
        results.truncate(self.config.max_alternatives);
        if results.is_empty() {
            self.deactivate_autocomplete();
            return;
        }

        self.show_candidates(results);
    }

    /// Prints a message to the output panel, timestamped if configured
    pub fn print(&mut self, message: &str, color: OutputColor) {
        let line = self.stamp(message);
        self.surface.output(&line, color);
    }

    /// Prints several messages, each timestamped if configured
    pub fn print_batch(&mut self, messages: &[String], color: OutputColor) {
        let lines: Vec<String> = messages.iter().map(|m| self.stamp(m)).collect();
        self.surface.output_batch(&lines, color);
    }

    /// Clears the output panel
    pub fn clear_output(&mut self) {
        self.surface.clear();
    }

    pub fn state(&self) -> ConsoleState {
        if !self.focused {
            ConsoleState::Unfocused
        } else if self.autocomplete_active {
            ConsoleState::Browsing
        } else {
            ConsoleState::Typing
        }
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            state: self.state(),
            input_text: self.surface.input_text().to_string(),
            history: self.history.entries().map(str::to_string).collect(),
            history_cursor: self.history.cursor(),
            candidates: self.candidates.iter().map(ToString::to_string).collect(),
            selected: self.selector.index(),
            recall_pending: self.pending_recall.is_some(),
        }
    }

    // Public accessors for rendering/testing
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn selector(&self) -> &CyclicSelector {
        &self.selector
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_autocomplete_active(&self) -> bool {
        self.autocomplete_active
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Last text reported by the surface
    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    pub fn commands(&self) -> &C {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut C {
        &mut self.commands
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable surface access for hosts feeding keystrokes
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn log(&self) -> &LogBuffer {
        &self.log
    }

    // Private transitions

    fn gain_focus(&mut self) {
        self.focused = true;
        self.surface.activate_input();
        self.surface.focus();
        self.log.record(LogEntry::info("focus gained").with_target(LOG_TARGET));
        for observer in self.focus_gained.iter_mut() {
            observer();
        }
    }

    fn lose_focus(&mut self) {
        self.focused = false;
        self.surface.quit_focus();
        self.log.record(LogEntry::info("focus lost").with_target(LOG_TARGET));
        for observer in self.focus_lost.iter_mut() {
            observer();
        }
    }

    fn move_down(&mut self) {
        if self.autocomplete_active {
            let index = self.selector.move_forward();
            self.surface.set_alternatives_index(index);
        } else {
            let text = self.history.recall_newer();
            self.recall(text);
        }
    }

    fn move_up(&mut self) {
        if self.autocomplete_active {
            let index = self.selector.move_backward();
            self.surface.set_alternatives_index(index);
        } else {
            let text = self.history.recall_older();
            self.recall(text);
        }
    }

    /// Writes a recalled entry into the field, tagging the write so its echo
    /// does not start an autocomplete query
    fn recall(&mut self, text: String) {
        if text.is_empty() {
            return;
        }

        // Unchanged text produces no event, so there is nothing to tag
        if text != self.surface.input_text() {
            let revision = self.surface.set_input_text(&text);
            self.log.record(
                LogEntry::debug("history recalled")
                    .with_target(LOG_TARGET)
                    .with_field("text", &text)
                    .with_field("revision", revision),
            );
            self.pending_recall = Some(RecallWrite { revision, text });
        }

        self.surface.move_cursor_to_end();
        self.dispatch_surface_events();
    }

    fn accept_candidate(&mut self) {
        let label = self
            .candidates
            .get(self.selector.index())
            .map(|candidate| candidate.label.clone());

        if let Some(label) = label {
            self.log.record(
                LogEntry::info("candidate accepted")
                    .with_target(LOG_TARGET)
                    .with_field("label", &label),
            );
            self.write_input(&label);
        }

        self.deactivate_autocomplete();
        self.surface.activate_input();
        self.surface.move_cursor_to_end();
    }

    fn show_candidates(&mut self, results: Vec<Candidate>) {
        self.selector.set_size(results.len());
        self.surface.set_alternatives_index(self.selector.index());

        let lines: Vec<String> = results.iter().map(ToString::to_string).collect();
        self.candidates = results;

        if !self.autocomplete_active {
            self.autocomplete_active = true;
            self.surface.set_alternatives_active(true);
            self.log.record(
                LogEntry::debug("autocomplete activated")
                    .with_target(LOG_TARGET)
                    .with_field("candidates", lines.len()),
            );
        }

        self.surface.set_alternatives(lines);
    }

    fn deactivate_autocomplete(&mut self) {
        self.candidates.clear();
        if self.autocomplete_active {
            self.autocomplete_active = false;
            self.surface.set_alternatives_active(false);
            self.log
                .record(LogEntry::debug("autocomplete deactivated").with_target(LOG_TARGET));
        }
    }

    /// Writes the field and delivers the resulting event immediately
    fn write_input(&mut self, text: &str) {
        self.surface.set_input_text(text);
        self.dispatch_surface_events();
    }

    /// Delivers queued surface events in order
    ///
    /// Handlers may write to the surface; events produced by those writes
    /// are delivered by the nested call before the outer loop continues.
    fn dispatch_surface_events(&mut self) {
        for event in self.surface.drain_events() {
            match event {
                SurfaceEvent::Submitted(text) => self.on_submit(&text),
                SurfaceEvent::TextChanged { text, revision } => {
                    self.on_text_changed(&text, revision)
                }
            }
        }
    }

    fn flush_output(&mut self) {
        for message in self.output.drain() {
            self.print(&message.text, message.color);
        }
    }

    fn stamp(&self, message: &str) -> String {
        if self.config.timestamp_output {
            format!("{}{}", format_timestamp(self.clock.as_ref()), message)
        } else {
            message.to_string()
        }
    }
}
