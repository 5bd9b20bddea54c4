//! # Demo Commands
//!
//! The command set `consoled` boots with.
//!
//! ## Command Set
//!
//! - `help` - List every command
//! - `echo <text...>` - Print the arguments back
//! - `give <item> [count]` - Give an item
//! - `gift <item> <player>` - Wrap an item for a player
//! - `add <a> <b>` - Add two integers

use services_command_palette::{CommandDescriptor, CommandPalette, CommandResult};

fn tags(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Builds the palette with the demo command set
pub fn build_command_palette() -> CommandPalette {
    let mut palette = CommandPalette::new();

    palette.register_command(
        CommandDescriptor::new("echo", "Echo", "Print the arguments back", tags(&["text"]))
            .with_usage("<text...>"),
        Box::new(echo),
    );
    palette.register_command(
        CommandDescriptor::new("give", "Give Item", "Give an item", tags(&["inventory"]))
            .with_usage("<item> [count]"),
        Box::new(give),
    );
    palette.register_command(
        CommandDescriptor::new(
            "gift",
            "Gift Wrap",
            "Wrap an item for a player",
            tags(&["inventory"]),
        )
        .with_usage("<item> <player>"),
        Box::new(gift),
    );
    palette.register_command(
        CommandDescriptor::new("add", "Add", "Add two integers", tags(&["math"]))
            .with_usage("<a> <b>"),
        Box::new(add),
    );

    // Help text is fixed once every other command is registered
    let help = CommandDescriptor::new("help", "Help", "List every command", tags(&["docs"]));
    let mut lines = palette.help_lines();
    lines.push(help.help_line());
    let text = lines.join("\n");
    palette.register_command(help, Box::new(move |_: &[String]| Ok(text.clone())));

    palette
}

fn echo(args: &[String]) -> CommandResult {
    Ok(args.join(" "))
}

fn give(args: &[String]) -> CommandResult {
    let (item, count) = match args {
        [item] => (item, 1),
        [item, count] => {
            let count: u32 = count
                .parse()
                .map_err(|_| format!("invalid count: {}", count))?;
            (item, count)
        }
        _ => return Err("usage: give <item> [count]".to_string()),
    };
    Ok(format!("Gave {} x {}", count, item))
}

fn gift(args: &[String]) -> CommandResult {
    match args {
        [item, player] => Ok(format!("Wrapped {} for {}", item, player)),
        _ => Err("usage: gift <item> <player>".to_string()),
    }
}

fn add(args: &[String]) -> CommandResult {
    let [a, b] = args else {
        return Err("usage: add <a> <b>".to_string());
    };
    let sum = parse_int(a)?
        .checked_add(parse_int(b)?)
        .ok_or_else(|| "overflow".to_string())?;
    Ok(sum.to_string())
}

fn parse_int(text: &str) -> Result<i64, String> {
    text.parse().map_err(|_| format!("not an integer: {}", text))
}
