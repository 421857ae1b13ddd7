//! `/balance` and `/list`.

use engine::{EntryFilter, report};

use crate::{
    ConfigParameters,
    access::Actor,
    messenger::{Messenger, deliver, deliver_prompt},
    ui::{self, CallbackAction, Scope},
};

use super::fail;

pub(super) async fn choose_balance<M: Messenger + ?Sized>(
    m: &M,
    cfg: &ConfigParameters,
    actor: &Actor,
) {
    let (text, kb) = ui::render_scope_picker(
        "Which balance?",
        &cfg.ledger.participants,
        CallbackAction::Balance,
    );
    deliver_prompt(m, actor.id, &text, kb).await;
}

pub(super) async fn choose_list<M: Messenger + ?Sized>(
    m: &M,
    cfg: &ConfigParameters,
    actor: &Actor,
) {
    let (text, kb) = ui::render_scope_picker(
        "Which entries?",
        &cfg.ledger.participants,
        CallbackAction::List,
    );
    deliver_prompt(m, actor.id, &text, kb).await;
}

pub(super) async fn show_balance<M: Messenger + ?Sized>(
    m: &M,
    cfg: &ConfigParameters,
    actor: &Actor,
    scope: Scope,
) {
    let participants = &cfg.ledger.participants;
    let balances = match cfg.engine.balances(participants).await {
        Ok(balances) => balances,
        Err(err) => return fail(m, actor, "compute balances", err).await,
    };

    let text = match scope {
        Scope::All => report::balance_summary(&balances),
        Scope::Participant(idx) => match participants.get(idx) {
            Some(name) => format!("{name}: {}", balances.get(name).unwrap_or_default()),
            None => return,
        },
    };
    deliver(m, actor.id, &text).await;
}

pub(super) async fn show_list<M: Messenger + ?Sized>(
    m: &M,
    cfg: &ConfigParameters,
    actor: &Actor,
    scope: Scope,
) {
    let filter = match scope {
        Scope::All => EntryFilter::default(),
        Scope::Participant(idx) => match cfg.ledger.participants.get(idx) {
            Some(name) => EntryFilter::participant(name),
            None => return,
        },
    };
    let entries = match cfg.engine.entries(&filter).await {
        Ok(entries) => entries,
        Err(err) => return fail(m, actor, "list entries", err).await,
    };

    if entries.is_empty() {
        deliver(m, actor.id, "No entries.").await;
        return;
    }

    let lines = entries.iter().map(report::entry_line);
    for chunk in report::paginate(lines, report::MAX_CHUNK_CHARS) {
        deliver(m, actor.id, &chunk).await;
    }
}
