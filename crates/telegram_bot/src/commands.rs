//! Command structs

use teloxide::utils::command::BotCommands;

/// Commands shown in the bot menu.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Ledger commands:")]
pub enum Command {
    #[command(description = "Show this help.")]
    Start,
    #[command(description = "Show this help.")]
    Help,
    #[command(description = "Record a new entry.")]
    Add,
    #[command(description = "Show balances.")]
    Balance,
    #[command(description = "List entries.")]
    List,
    #[command(description = "Report and clear the ledger (needs approval).")]
    Clear,
    #[command(description = "Cancel the entry in progress.")]
    Cancel,
    #[command(description = "Delete an entry by id (administrator only).")]
    Delete { id: String },
}

/// Parses a `/command[@bot] [args]` message.
///
/// Returns `None` for plain text and for unknown commands.
pub fn parse_command(text: &str) -> Option<Command> {
    let trimmed = text.trim();
    let rest = trimmed.strip_prefix('/')?;

    let mut parts = rest.splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or("");
    let arg = parts.next().map(str::trim).unwrap_or("");
    let name = head.split('@').next().unwrap_or("").to_ascii_lowercase();

    match name.as_str() {
        "start" => Some(Command::Start),
        "help" => Some(Command::Help),
        "add" => Some(Command::Add),
        "balance" => Some(Command::Balance),
        "list" => Some(Command::List),
        "clear" => Some(Command::Clear),
        "cancel" => Some(Command::Cancel),
        "delete" => Some(Command::Delete {
            id: arg.to_string(),
        }),
        _ => None,
    }
}
