//! Integration tests for the console controller state machine

use console_core::{
    Candidate, CommandSystem, ConsoleConfig, ConsoleController, ConsoleState, ConsoleSurface,
    DeviceInput, DeviceSignals, FixedClock, OutputColor, OutputSink, SurfaceEvent,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

struct FakeCommands {
    catalog: Vec<Candidate>,
    executed: Vec<String>,
    succeed: bool,
    sink: Option<OutputSink>,
}

impl FakeCommands {
    fn new() -> Self {
        Self {
            catalog: vec![
                Candidate::new("give", "gives item"),
                Candidate::new("gift", "wraps item"),
                Candidate::new("help", "lists commands"),
            ],
            executed: Vec::new(),
            succeed: true,
            sink: None,
        }
    }

    fn failing() -> Self {
        Self {
            succeed: false,
            ..Self::new()
        }
    }
}

impl CommandSystem for FakeCommands {
    fn execute(&mut self, text: &str) -> bool {
        self.executed.push(text.to_string());
        if let Some(sink) = &self.sink {
            if self.succeed {
                sink.success(format!("ran {}", text));
            } else {
                sink.error(format!("unknown command: {}", text));
            }
        }
        self.succeed
    }

    fn query(&self, text: &str, max_results: usize) -> Vec<Candidate> {
        self.catalog
            .iter()
            .filter(|c| c.label.starts_with(text))
            .take(max_results)
            .cloned()
            .collect()
    }

    fn attach_output(&mut self, sink: OutputSink) {
        self.sink = Some(sink);
    }
}

#[derive(Default)]
struct FakeSurface {
    text: String,
    revision: u64,
    events: Vec<SurfaceEvent>,
    hold_events: bool,
    focused: bool,
    active: bool,
    index: usize,
    alternatives: Vec<String>,
    lines: Vec<(String, OutputColor)>,
    cursor: usize,
    scrolls: usize,
}

impl FakeSurface {
    /// Simulates the user editing the field
    fn type_text(&mut self, text: &str) {
        self.set_input_text(text);
    }

    /// Simulates the user pressing submit
    fn press_submit(&mut self) {
        self.events.push(SurfaceEvent::Submitted(self.text.clone()));
    }

    fn output_text(&self) -> Vec<&str> {
        self.lines.iter().map(|(line, _)| line.as_str()).collect()
    }
}

impl ConsoleSurface for FakeSurface {
    fn input_text(&self) -> &str {
        &self.text
    }

    fn set_input_text(&mut self, text: &str) -> u64 {
        self.revision += 1;
        if self.text != text {
            self.text = text.to_string();
            self.events.push(SurfaceEvent::TextChanged {
                text: text.to_string(),
                revision: self.revision,
            });
        }
        self.revision
    }

    fn is_input_focused(&self) -> bool {
        self.focused
    }

    fn is_alternatives_active(&self) -> bool {
        self.active
    }

    fn set_alternatives_active(&mut self, active: bool) {
        self.active = active;
    }

    fn alternatives_index(&self) -> usize {
        self.index
    }

    fn set_alternatives_index(&mut self, index: usize) {
        self.index = index;
    }

    fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    fn set_alternatives(&mut self, alternatives: Vec<String>) {
        self.alternatives = alternatives;
    }

    fn activate_input(&mut self) {
        self.focused = true;
    }

    fn quit_focus(&mut self) {
        self.focused = false;
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn move_cursor_to_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    fn set_cursor_position(&mut self, position: usize) {
        self.cursor = position;
    }

    fn output(&mut self, message: &str, color: OutputColor) {
        self.lines.push((message.to_string(), color));
    }

    fn clear(&mut self) {
        self.lines.clear();
    }

    fn move_scroll_to_end(&mut self) {
        self.scrolls += 1;
    }

    fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        if self.hold_events {
            return Vec::new();
        }
        std::mem::take(&mut self.events)
    }
}

#[derive(Default)]
struct ScriptedDevice {
    ticks: VecDeque<DeviceSignals>,
}

impl ScriptedDevice {
    fn push(&mut self, signals: DeviceSignals) {
        self.ticks.push_back(signals);
    }
}

impl DeviceInput for ScriptedDevice {
    fn poll(&mut self) -> DeviceSignals {
        self.ticks.pop_front().unwrap_or_default()
    }
}

type TestConsole = ConsoleController<FakeCommands, FakeSurface, ScriptedDevice>;

const FOCUS: DeviceSignals = DeviceSignals {
    focus_requested: true,
    quit_focus_requested: false,
    move_up_requested: false,
    move_down_requested: false,
};

const QUIT: DeviceSignals = DeviceSignals {
    focus_requested: false,
    quit_focus_requested: true,
    move_up_requested: false,
    move_down_requested: false,
};

const UP: DeviceSignals = DeviceSignals {
    focus_requested: false,
    quit_focus_requested: false,
    move_up_requested: true,
    move_down_requested: false,
};

const DOWN: DeviceSignals = DeviceSignals {
    focus_requested: false,
    quit_focus_requested: false,
    move_up_requested: false,
    move_down_requested: true,
};

fn console_with(config: ConsoleConfig, commands: FakeCommands) -> TestConsole {
    ConsoleController::new(
        config.with_timestamp_output(false),
        commands,
        FakeSurface::default(),
        ScriptedDevice::default(),
    )
}

fn focused_console() -> TestConsole {
    let mut console = console_with(ConsoleConfig::default(), FakeCommands::new());
    tick(&mut console, FOCUS);
    console
}

fn tick(console: &mut TestConsole, signals: DeviceSignals) {
    console.device_mut().push(signals);
    console.update();
}

fn type_text(console: &mut TestConsole, text: &str) {
    console.surface_mut().type_text(text);
    console.update();
}

/// Types `text` and presses submit; only reaches execution when the text
/// yields no candidates
fn submit(console: &mut TestConsole, text: &str) {
    console.surface_mut().type_text(text);
    console.surface_mut().press_submit();
    console.update();
}

/// Submits programmatically from the typing state
fn run_command(console: &mut TestConsole, text: &str) {
    console.on_submit(text);
    console.update();
}

#[test]
fn test_starts_unfocused() {
    let console = console_with(ConsoleConfig::default(), FakeCommands::new());
    assert_eq!(console.state(), ConsoleState::Unfocused);
    assert!(!console.surface().is_input_focused());
}

#[test]
fn test_focus_request_gains_focus_once() {
    let mut console = console_with(ConsoleConfig::default(), FakeCommands::new());
    let gained = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&gained);
    console.on_focus_gained(move || *counter.borrow_mut() += 1);

    tick(&mut console, FOCUS);
    assert_eq!(console.state(), ConsoleState::Typing);
    assert!(console.surface().is_input_focused());

    // Already focused: ignored
    tick(&mut console, FOCUS);
    assert_eq!(*gained.borrow(), 1);
}

#[test]
fn test_quit_focus_wins_over_moves() {
    let mut console = focused_console();
    run_command(&mut console, "help");

    let lost = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&lost);
    console.on_focus_lost(move || *counter.borrow_mut() += 1);

    tick(
        &mut console,
        DeviceSignals {
            quit_focus_requested: true,
            move_up_requested: true,
            ..Default::default()
        },
    );

    assert_eq!(console.state(), ConsoleState::Unfocused);
    assert_eq!(console.surface().input_text(), "");
    assert_eq!(*lost.borrow(), 1);
}

#[test]
fn test_moves_ignored_while_unfocused() {
    let mut console = focused_console();
    run_command(&mut console, "help");
    tick(&mut console, QUIT);

    tick(&mut console, UP);
    assert_eq!(console.surface().input_text(), "");
}

#[test]
fn test_query_activates_browsing() {
    let mut console = focused_console();
    type_text(&mut console, "gi");

    assert_eq!(console.state(), ConsoleState::Browsing);
    assert_eq!(console.selector().size(), 2);
    assert_eq!(console.selector().index(), 0);
    assert!(console.surface().is_alternatives_active());
    assert_eq!(
        console.surface().alternatives(),
        &["give: gives item".to_string(), "gift: wraps item".to_string()]
    );
}

#[test]
fn test_browsing_down_moves_selection() {
    let mut console = focused_console();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    console.on_selection_changed(move |index| sink.borrow_mut().push(index));

    type_text(&mut console, "gi");
    tick(&mut console, DOWN);
    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(console.surface().alternatives_index(), 1);

    tick(&mut console, DOWN);
    tick(&mut console, UP);
    assert_eq!(*seen.borrow(), vec![1, 0, 1]);

    // Browsing never touches the field
    assert_eq!(console.surface().input_text(), "gi");
}

#[test]
fn test_single_candidate_move_still_notifies() {
    let mut console = focused_console();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    console.on_selection_changed(move |index| sink.borrow_mut().push(index));

    type_text(&mut console, "he");
    tick(&mut console, DOWN);
    tick(&mut console, UP);
    assert_eq!(*seen.borrow(), vec![0, 0]);
}

#[test]
fn test_space_or_empty_text_deactivates() {
    for text in ["", "a b", "give 1", "gi "] {
        let mut console = focused_console();
        type_text(&mut console, "gi");
        assert!(console.is_autocomplete_active());

        console.on_text_changed(text, u64::MAX);
        assert!(!console.is_autocomplete_active(), "text {:?}", text);
        assert!(console.candidates().is_empty());
        assert!(!console.surface().is_alternatives_active());
    }
}

#[test]
fn test_no_results_deactivates() {
    let mut console = focused_console();
    type_text(&mut console, "gi");
    type_text(&mut console, "gix");
    assert_eq!(console.state(), ConsoleState::Typing);
    assert!(console.candidates().is_empty());
}

#[test]
fn test_query_respects_max_alternatives() {
    let mut console = console_with(
        ConsoleConfig::default().with_max_alternatives(1),
        FakeCommands::new(),
    );
    tick(&mut console, FOCUS);
    type_text(&mut console, "gi");
    assert_eq!(console.candidates().len(), 1);
    assert_eq!(console.selector().size(), 1);
}

#[test]
fn test_submit_while_browsing_accepts_candidate() {
    let mut console = focused_console();
    type_text(&mut console, "gi");
    tick(&mut console, DOWN);

    console.surface_mut().press_submit();
    console.update();

    assert!(console.commands().executed.is_empty());
    assert_eq!(console.surface().input_text(), "gift");
    assert_eq!(console.state(), ConsoleState::Typing);
    assert!(console.surface().is_input_focused());
    assert_eq!(console.surface().cursor, 4);
    assert!(console.surface().lines.is_empty());
}

#[test]
fn test_submit_while_typing_executes_once() {
    let mut console = focused_console();
    submit(&mut console, "give 1");

    assert_eq!(console.commands().executed, vec!["give 1".to_string()]);
    assert_eq!(console.history().entries().collect::<Vec<_>>(), vec!["give 1"]);
    assert_eq!(console.surface().input_text(), "");
    assert!(console.surface().is_input_focused());
    assert_eq!(console.surface().scrolls, 1);
    assert_eq!(
        console.surface().output_text(),
        vec!["give 1", "ran give 1"]
    );
    assert_eq!(console.surface().lines[0].1, OutputColor::Echo);
}

#[test]
fn test_empty_submit_only_echoes() {
    let mut console = focused_console();
    console.on_submit("");

    assert!(console.commands().executed.is_empty());
    assert!(console.history().is_empty());
    assert_eq!(console.surface().output_text(), vec![""]);
    assert_eq!(console.surface().scrolls, 0);
}

#[test]
fn test_failed_command_not_recorded_when_disabled() {
    let mut console = console_with(
        ConsoleConfig::default().with_record_failed_commands(false),
        FakeCommands::failing(),
    );
    tick(&mut console, FOCUS);
    submit(&mut console, "badcmd");

    assert_eq!(console.commands().executed, vec!["badcmd".to_string()]);
    assert!(console.history().is_empty());
    assert_eq!(
        console.surface().output_text(),
        vec!["badcmd", "unknown command: badcmd"]
    );
}

#[test]
fn test_failed_command_recorded_by_default() {
    let mut console = console_with(ConsoleConfig::default(), FakeCommands::failing());
    tick(&mut console, FOCUS);
    submit(&mut console, "badcmd");
    assert_eq!(console.history().len(), 1);
}

#[test]
fn test_recall_older_does_not_query() {
    let mut console = focused_console();
    run_command(&mut console, "help");
    run_command(&mut console, "gift");

    tick(&mut console, UP);
    assert_eq!(console.surface().input_text(), "gift");
    assert_eq!(console.surface().cursor, 4);
    assert_eq!(console.state(), ConsoleState::Typing);
    assert!(!console.snapshot().recall_pending);

    tick(&mut console, UP);
    assert_eq!(console.surface().input_text(), "help");
    assert_eq!(console.state(), ConsoleState::Typing);
}

#[test]
fn test_recall_scenario_wraps() {
    let mut console = console_with(
        ConsoleConfig::default().with_history_capacity(2),
        FakeCommands::new(),
    );
    tick(&mut console, FOCUS);
    for text in ["a", "b", "c"] {
        submit(&mut console, text);
    }
    assert_eq!(console.history().entries().collect::<Vec<_>>(), vec!["b", "c"]);

    let mut recalled = Vec::new();
    for _ in 0..3 {
        tick(&mut console, UP);
        recalled.push(console.surface().input_text().to_string());
    }
    assert_eq!(recalled, vec!["c", "b", "c"]);
}

#[test]
fn test_recall_newer_in_typing_state() {
    let mut console = focused_console();
    run_command(&mut console, "help");
    run_command(&mut console, "gift");

    tick(&mut console, DOWN);
    assert_eq!(console.surface().input_text(), "help");
    assert_eq!(console.state(), ConsoleState::Typing);
}

#[test]
fn test_recall_on_empty_history_keeps_text() {
    let mut console = focused_console();
    console.surface_mut().type_text("hel p");
    console.update();

    tick(&mut console, UP);
    assert_eq!(console.surface().input_text(), "hel p");
}

#[test]
fn test_later_text_change_drops_stale_recall_tag() {
    let mut console = focused_console();
    run_command(&mut console, "gift");

    console.surface_mut().hold_events = true;
    tick(&mut console, UP);
    assert!(console.snapshot().recall_pending);

    // A newer, unrelated change is processed normally and clears the tag
    console.on_text_changed("gi", u64::MAX);
    assert!(!console.snapshot().recall_pending);
    assert_eq!(console.state(), ConsoleState::Browsing);
}

#[test]
fn test_older_text_change_keeps_recall_tag() {
    let mut console = focused_console();
    run_command(&mut console, "gift");

    console.surface_mut().hold_events = true;
    tick(&mut console, UP);

    // A change produced before the recall does not consume the tag
    console.on_text_changed("he", 0);
    assert!(console.snapshot().recall_pending);
    assert_eq!(console.state(), ConsoleState::Browsing);

    // The recall echo is ignored and drops candidates for the older text
    console.surface_mut().hold_events = false;
    console.update();
    assert!(!console.snapshot().recall_pending);
    assert_eq!(console.state(), ConsoleState::Typing);
    assert!(console.candidates().is_empty());
    assert!(!console.surface().is_alternatives_active());
    assert_eq!(console.current_text(), "gift");

    // Submit now runs the recalled command instead of accepting a candidate
    console.surface_mut().press_submit();
    console.update();
    assert_eq!(
        console.commands().executed,
        vec!["gift".to_string(), "gift".to_string()]
    );
}

#[test]
fn test_recall_echo_must_match_text() {
    let mut console = focused_console();
    run_command(&mut console, "gift");

    console.surface_mut().hold_events = true;
    tick(&mut console, UP);
    let revision = console.surface().revision;

    // Same revision with different text is not the recall echo
    console.on_text_changed("gi", revision);
    assert!(!console.snapshot().recall_pending);
    assert_eq!(console.state(), ConsoleState::Browsing);
    assert_eq!(console.candidates().len(), 2);
}

#[test]
fn test_recall_of_unchanged_text_sets_no_tag() {
    let mut console = focused_console();
    run_command(&mut console, "give 1");

    tick(&mut console, UP);
    assert_eq!(console.surface().input_text(), "give 1");
    assert!(!console.snapshot().recall_pending);

    // Writes the text already in the field, so no echo will arrive
    tick(&mut console, UP);
    assert_eq!(console.surface().input_text(), "give 1");
    assert!(!console.snapshot().recall_pending);

    // The next real keystroke is not swallowed
    type_text(&mut console, "gi");
    assert!(!console.snapshot().recall_pending);
    assert_eq!(console.state(), ConsoleState::Browsing);
}

#[test]
fn test_output_is_timestamped() {
    let mut console = ConsoleController::new(
        ConsoleConfig::default(),
        FakeCommands::new(),
        FakeSurface::default(),
        ScriptedDevice::default(),
    )
    .with_clock(FixedClock::from_hms(9, 5, 3).unwrap());
    tick(&mut console, FOCUS);
    run_command(&mut console, "help");

    assert_eq!(
        console.surface().output_text(),
        vec!["[9:5:3] help", "[9:5:3] ran help"]
    );

    console.print_batch(&["a".to_string(), "b".to_string()], OutputColor::Info);
    assert_eq!(console.surface().output_text()[2..], ["[9:5:3] a", "[9:5:3] b"]);
}

#[test]
fn test_clear_output() {
    let mut console = focused_console();
    run_command(&mut console, "help");
    console.clear_output();
    assert!(console.surface().lines.is_empty());
}

#[test]
fn test_log_records_execution() {
    let mut console = focused_console();
    run_command(&mut console, "help");

    let entry = console
        .log()
        .entries()
        .find(|entry| entry.message == "command executed")
        .expect("execution logged");
    assert_eq!(entry.field("text"), Some("help"));
    assert_eq!(entry.field("success"), Some("true"));
}

#[test]
fn test_snapshot_serializes() {
    let mut console = focused_console();
    run_command(&mut console, "help");
    type_text(&mut console, "gi");

    let snapshot = console.snapshot();
    assert_eq!(snapshot.state, ConsoleState::Browsing);
    assert_eq!(snapshot.history, vec!["help".to_string()]);

    let json = serde_json::to_string(&snapshot).unwrap();
    let restored: console_core::ConsoleSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, snapshot);
}

#[test]
fn test_second_submit_after_accept_executes() {
    let mut console = focused_console();
    type_text(&mut console, "help");
    assert_eq!(console.state(), ConsoleState::Browsing);

    console.surface_mut().press_submit();
    console.update();
    assert!(console.commands().executed.is_empty());
    assert_eq!(console.state(), ConsoleState::Typing);

    console.surface_mut().press_submit();
    console.update();
    assert_eq!(console.commands().executed, vec!["help".to_string()]);
    assert_eq!(console.surface().input_text(), "");
}
