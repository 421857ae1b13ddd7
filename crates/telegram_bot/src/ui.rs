use engine::{EntryMode, Participants};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use uuid::Uuid;

/// Which part of the ledger a balance or list request covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scope {
    All,
    Participant(usize),
}

/// Payload of an inline button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CallbackAction {
    Person(usize),
    Split,
    Mode(EntryMode),
    Cancel,
    Balance(Scope),
    List(Scope),
    ApproveClear(Uuid),
    DenyClear(Uuid),
}

impl CallbackAction {
    pub(crate) fn parse(data: &str) -> Option<Self> {
        match data {
            "split" => return Some(Self::Split),
            "cancel" => return Some(Self::Cancel),
            "mode:debt" => return Some(Self::Mode(EntryMode::Debt)),
            "mode:expense" => return Some(Self::Mode(EntryMode::Expense)),
            _ => {}
        }

        let (kind, arg) = data.split_once(':')?;
        match kind {
            "person" => arg.parse().ok().map(Self::Person),
            "balance" => parse_scope(arg).map(Self::Balance),
            "list" => parse_scope(arg).map(Self::List),
            "approve_clear" => Uuid::parse_str(arg).ok().map(Self::ApproveClear),
            "deny_clear" => Uuid::parse_str(arg).ok().map(Self::DenyClear),
            _ => None,
        }
    }

    pub(crate) fn data(self) -> String {
        match self {
            Self::Person(idx) => format!("person:{idx}"),
            Self::Split => "split".to_string(),
            Self::Mode(mode) => format!("mode:{}", mode.as_str()),
            Self::Cancel => "cancel".to_string(),
            Self::Balance(scope) => format!("balance:{}", scope_data(scope)),
            Self::List(scope) => format!("list:{}", scope_data(scope)),
            Self::ApproveClear(id) => format!("approve_clear:{id}"),
            Self::DenyClear(id) => format!("deny_clear:{id}"),
        }
    }
}

fn parse_scope(arg: &str) -> Option<Scope> {
    if arg == "all" {
        return Some(Scope::All);
    }
    arg.parse().ok().map(Scope::Participant)
}

fn scope_data(scope: Scope) -> String {
    match scope {
        Scope::All => "all".to_string(),
        Scope::Participant(idx) => idx.to_string(),
    }
}

fn button(label: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.data())
}

fn cancel_row() -> Vec<InlineKeyboardButton> {
    vec![button("✖ Cancel", CallbackAction::Cancel)]
}

pub(crate) fn render_participant_picker(
    participants: &Participants,
) -> (String, InlineKeyboardMarkup) {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = participants
        .names()
        .iter()
        .enumerate()
        .map(|(idx, name)| vec![button(name.clone(), CallbackAction::Person(idx))])
        .collect();
    rows.push(vec![button(
        format!("➗ {}", participants.split_label()),
        CallbackAction::Split,
    )]);
    rows.push(cancel_row());

    (
        "Who is this entry for?".to_string(),
        InlineKeyboardMarkup::new(rows),
    )
}

pub(crate) fn render_mode_picker(participant: &str) -> (String, InlineKeyboardMarkup) {
    let kb = InlineKeyboardMarkup::new(vec![
        vec![
            button("🧾 Expense", CallbackAction::Mode(EntryMode::Expense)),
            button("💸 Debt", CallbackAction::Mode(EntryMode::Debt)),
        ],
        cancel_row(),
    ]);
    (format!("{participant}: expense or debt?"), kb)
}

pub(crate) fn render_scope_picker(
    title: &str,
    participants: &Participants,
    action: fn(Scope) -> CallbackAction,
) -> (String, InlineKeyboardMarkup) {
    let mut row = vec![button("All", action(Scope::All))];
    row.extend(
        participants
            .names()
            .iter()
            .enumerate()
            .map(|(idx, name)| button(name.clone(), action(Scope::Participant(idx)))),
    );
    (title.to_string(), InlineKeyboardMarkup::new(vec![row]))
}

pub(crate) fn render_clear_prompt(
    request: Uuid,
    initiator: &str,
    preview: &str,
) -> (String, InlineKeyboardMarkup) {
    let text = format!(
        "{initiator} wants to clear the ledger.\n\nLatest entries:\n{preview}\n\nApprove?"
    );
    let kb = InlineKeyboardMarkup::new(vec![vec![
        button("✅ Approve", CallbackAction::ApproveClear(request)),
        button("❌ Deny", CallbackAction::DenyClear(request)),
    ]]);
    (text, kb)
}

pub(crate) fn amount_prompt(participant: &str, mode: EntryMode) -> String {
    match mode {
        EntryMode::Debt => format!(
            "Send the amount and an optional note, e.g.\n\n30.000 borrowed\n\nThe full amount is recorded for {participant}."
        ),
        EntryMode::Expense => format!(
            "Send the total amount and an optional note, e.g.\n\n60.000 dinner\n\nHalf of it is recorded for {participant}."
        ),
    }
}

pub(crate) fn split_prompt(participants: &Participants) -> String {
    format!(
        "Send the total amount and an optional note, e.g.\n\n50.000 snacks\n\nIt is divided evenly between {}.",
        participants.names().join(", ")
    )
}

pub(crate) fn help_text() -> &'static str {
    "Shared ledger.\n\n/add - record an entry\n/balance - show balances\n/list - list entries\n/clear - report and clear the ledger (needs approval)\n/cancel - cancel the entry in progress\n/delete <id> - delete an entry (administrator)\n\nSend the amount as one word, using . , or _ as thousands separators if you like: 50.000 = 50,000 = 50_000 = 50000."
}

pub(crate) const INVALID_AMOUNT: &str =
    "That is not a valid amount. Send digits first, e.g. 30.000 borrowed";
pub(crate) const STORE_FAILURE: &str = "Something went wrong, please try again.";
pub(crate) const NOTHING_PENDING: &str = "Nothing in progress. Use /add to start a new entry.";
