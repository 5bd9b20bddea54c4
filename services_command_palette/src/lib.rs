//! # Command Palette Service
//!
//! The console's command system: a registry of described commands with handlers.
//!
//! ## Philosophy
//!
//! - **Discoverability**: All commands are registered and searchable
//! - **Deterministic**: Query results are a pure view over command descriptors
//! - **Testable**: All command logic can be tested independently
//!
//! ## Features
//!
//! - `execute` runs `<id> [args...]` and routes handler output to the console
//! - `query` ranks commands whose id or tags start with the typed text
//! - `help_lines` lists every enabled command with its usage
//!
//! ## Example
//!
//! ```ignore
//! use services_command_palette::{CommandPalette, CommandDescriptor};
//!
//! let mut palette = CommandPalette::new();
//!
//! let descriptor = CommandDescriptor::new(
//!     "give",
//!     "Give",
//!     "gives item",
//!     vec!["item".to_string()],
//! );
//! palette.register_command(descriptor, Box::new(|args| {
//!     Ok(format!("gave {}", args.join(" ")))
//! }));
//!
//! let candidates = palette.complete("gi");
//! ```

use console_core::{Candidate, CommandSystem, OutputSink};
use serde::{Deserialize, Serialize};
use services_logger::{LogBuffer, LogEntry};
use std::fmt;

const LOG_TARGET: &str = "palette";

/// Unique identifier for a command
///
/// The id is also the word typed at the console to run the command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandId(String);

impl CommandId {
    /// Creates a new command ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Command descriptor with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Unique command identifier
    pub id: CommandId,
    /// Human-readable command name
    pub name: String,
    /// Description of what the command does
    pub description: String,
    /// Search tags/keywords
    pub tags: Vec<String>,
    /// Argument synopsis shown by help, e.g. `<item> [count]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    /// Whether the command is enabled
    pub enabled: bool,
}

impl CommandDescriptor {
    /// Creates a new command descriptor
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: CommandId::new(id),
            name: name.into(),
            description: description.into(),
            tags,
            usage: None,
            enabled: true,
        }
    }

    /// Sets the argument synopsis
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Disables the command
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Checks if the id or a tag starts with the typed prefix
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        if !self.enabled {
            return false;
        }

        let prefix_lower = prefix.to_lowercase();

        self.id.as_str().to_lowercase().starts_with(&prefix_lower)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().starts_with(&prefix_lower))
    }

    /// Calculates a relevance score for the given query (higher is better)
    pub fn relevance_score(&self, query: &str) -> u32 {
        if !self.enabled {
            return 0;
        }

        let query_lower = query.to_lowercase();
        let id_lower = self.id.as_str().to_lowercase();
        let name_lower = self.name.to_lowercase();
        let mut score = 0u32;

        // Exact id is what the user will actually run
        if id_lower == query_lower {
            score += 2000;
        } else if id_lower.starts_with(&query_lower) {
            score += 700;
        }

        if name_lower == query_lower {
            score += 1000;
        } else if name_lower.starts_with(&query_lower) {
            score += 500;
        } else if name_lower.contains(&query_lower) {
            score += 100;
        }

        for tag in &self.tags {
            let tag_lower = tag.to_lowercase();
            if tag_lower == query_lower {
                score += 300;
            } else if tag_lower.starts_with(&query_lower) {
                score += 150;
            } else if tag_lower.contains(&query_lower) {
                score += 50;
            }
        }

        if self.description.to_lowercase().contains(&query_lower) {
            score += 10;
        }

        score
    }

    /// Autocomplete candidate for this command
    pub fn to_candidate(&self) -> Candidate {
        Candidate::new(self.id.as_str(), self.description.as_str())
    }

    /// One help line: `id usage - description`
    pub fn help_line(&self) -> String {
        match &self.usage {
            Some(usage) => format!("{} {} - {}", self.id, usage, self.description),
            None => format!("{} - {}", self.id, self.description),
        }
    }
}

/// Result of command execution
///
/// `Ok` text is printed as success output, `Err` text as an error. Either may
/// span several lines.
pub type CommandResult = Result<String, String>;

/// Command handler function signature
pub type CommandHandler = Box<dyn Fn(&[String]) -> CommandResult + Send + Sync>;

/// Registered command with its handler
struct RegisteredCommand {
    descriptor: CommandDescriptor,
    handler: CommandHandler,
}

/// A parsed console line: command word plus arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub id: CommandId,
    pub args: Vec<String>,
}

impl Invocation {
    /// Splits a console line on whitespace; `None` for a blank line
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let id = CommandId::new(words.next()?);
        let args = words.map(str::to_string).collect();
        Some(Self { id, args })
    }
}

/// Command palette service
pub struct CommandPalette {
    commands: Vec<RegisteredCommand>,
    output: Option<OutputSink>,
    log: LogBuffer,
}

impl CommandPalette {
    /// Creates a new command palette
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            output: None,
            log: LogBuffer::default(),
        }
    }

    /// Registers a command with its handler
    ///
    /// A later registration with the same id replaces the earlier one.
    pub fn register_command(&mut self, descriptor: CommandDescriptor, handler: CommandHandler) {
        self.unregister_command(&descriptor.id);
        self.commands.push(RegisteredCommand {
            descriptor,
            handler,
        });
    }

    /// Unregisters a command by ID
    pub fn unregister_command(&mut self, id: &CommandId) -> bool {
        if let Some(pos) = self.commands.iter().position(|cmd| cmd.descriptor.id == *id) {
            self.commands.remove(pos);
            true
        } else {
            false
        }
    }

    /// Number of registered commands, enabled or not
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if no command is registered
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands whose id or tags start with `prefix`, best first
    ///
    /// Equal scores keep registration order.
    pub fn complete(&self, prefix: &str) -> Vec<CommandDescriptor> {
        let mut matches: Vec<_> = self
            .commands
            .iter()
            .filter(|cmd| cmd.descriptor.matches_prefix(prefix))
            .map(|cmd| {
                let score = cmd.descriptor.relevance_score(prefix);
                (score, cmd.descriptor.clone())
            })
            .collect();

        // Sort by score (descending); stable, so ties keep registration order
        matches.sort_by(|a, b| b.0.cmp(&a.0));

        matches.into_iter().map(|(_, desc)| desc).collect()
    }

    /// Executes a command by ID with the given arguments
    pub fn execute_command(&self, id: &CommandId, args: &[String]) -> CommandResult {
        if let Some(cmd) = self.commands.iter().find(|cmd| cmd.descriptor.id == *id) {
            if !cmd.descriptor.enabled {
                return Err(format!("Command is disabled: {}", id));
            }
            (cmd.handler)(args)
        } else {
            Err(format!("Command not found: {}", id))
        }
    }

    /// Help lines for every enabled command, in registration order
    pub fn help_lines(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter(|cmd| cmd.descriptor.enabled)
            .map(|cmd| cmd.descriptor.help_line())
            .collect()
    }

    pub fn log(&self) -> &LogBuffer {
        &self.log
    }

    fn emit(&self, text: &str, ok: bool) {
        let Some(sink) = &self.output else {
            return;
        };
        for line in text.lines() {
            if ok {
                sink.success(line);
            } else {
                sink.error(line);
            }
        }
    }
}

impl CommandSystem for CommandPalette {
    fn execute(&mut self, text: &str) -> bool {
        let Some(invocation) = Invocation::parse(text) else {
            return false;
        };

        let result = self.execute_command(&invocation.id, &invocation.args);
        let ok = result.is_ok();
        self.log.record(
            LogEntry::info("command dispatched")
                .with_target(LOG_TARGET)
                .with_field("id", &invocation.id)
                .with_field("args", invocation.args.len())
                .with_field("ok", ok),
        );

        match result {
            Ok(message) => self.emit(&message, true),
            Err(message) => self.emit(&message, false),
        }
        ok
    }

    fn query(&self, text: &str, max_results: usize) -> Vec<Candidate> {
        self.complete(text)
            .iter()
            .take(max_results)
            .map(CommandDescriptor::to_candidate)
            .collect()
    }

    fn attach_output(&mut self, sink: OutputSink) {
        self.output = Some(sink);
    }
}

impl Default for CommandPalette {
    fn default() -> Self {
        Self::new()
    }
}
