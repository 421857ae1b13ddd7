//! The `/add` conversation: participant, mode, then amount and note.

use chrono::Utc;
use engine::{Entry, EntryMode, SessionState, entries_for};

use crate::{
    ConfigParameters,
    access::Actor,
    messenger::{Messenger, broadcast, deliver, deliver_prompt},
    parsing::parse_entry_input,
    ui,
};

use super::{fail, session_key};

pub(super) async fn begin<M: Messenger + ?Sized>(m: &M, cfg: &ConfigParameters, actor: &Actor) {
    if let Err(err) = cfg.engine.reset_session(&session_key(actor)).await {
        return fail(m, actor, "reset session", err).await;
    }
    let (text, kb) = ui::render_participant_picker(&cfg.ledger.participants);
    deliver_prompt(m, actor.id, &text, kb).await;
}

pub(super) async fn cancel<M: Messenger + ?Sized>(m: &M, cfg: &ConfigParameters, actor: &Actor) {
    if let Err(err) = cfg.engine.reset_session(&session_key(actor)).await {
        return fail(m, actor, "cancel session", err).await;
    }
    deliver(m, actor.id, "Cancelled.").await;
}

pub(super) async fn select_person<M: Messenger + ?Sized>(
    m: &M,
    cfg: &ConfigParameters,
    actor: &Actor,
    index: usize,
) {
    let Some(participant) = cfg.ledger.participants.get(index) else {
        tracing::debug!("participant index {index} out of range");
        deliver(m, actor.id, ui::NOTHING_PENDING).await;
        return;
    };

    let state = if cfg.ledger.ask_mode {
        SessionState::AwaitingModeChoice {
            participant: participant.to_string(),
        }
    } else {
        SessionState::AwaitingAmount {
            participant: participant.to_string(),
            mode: EntryMode::Debt,
        }
    };
    if let Err(err) = cfg.engine.save_session(&session_key(actor), &state).await {
        return fail(m, actor, "save session", err).await;
    }

    if cfg.ledger.ask_mode {
        let (text, kb) = ui::render_mode_picker(participant);
        deliver_prompt(m, actor.id, &text, kb).await;
    } else {
        deliver(m, actor.id, &ui::amount_prompt(participant, EntryMode::Debt)).await;
    }
}

pub(super) async fn select_split<M: Messenger + ?Sized>(
    m: &M,
    cfg: &ConfigParameters,
    actor: &Actor,
) {
    let state = SessionState::AwaitingSplitAmount;
    if let Err(err) = cfg.engine.save_session(&session_key(actor), &state).await {
        return fail(m, actor, "save session", err).await;
    }
    deliver(m, actor.id, &ui::split_prompt(&cfg.ledger.participants)).await;
}

pub(super) async fn select_mode<M: Messenger + ?Sized>(
    m: &M,
    cfg: &ConfigParameters,
    actor: &Actor,
    mode: EntryMode,
) {
    let key = session_key(actor);
    let participant = match cfg.engine.session(&key).await {
        Ok(
            SessionState::AwaitingModeChoice { participant }
            | SessionState::AwaitingAmount { participant, .. },
        ) => participant,
        Ok(_) => {
            deliver(m, actor.id, ui::NOTHING_PENDING).await;
            return;
        }
        Err(err) => return fail(m, actor, "load session", err).await,
    };

    let state = SessionState::AwaitingAmount {
        participant: participant.clone(),
        mode,
    };
    if let Err(err) = cfg.engine.save_session(&key, &state).await {
        return fail(m, actor, "save session", err).await;
    }
    deliver(m, actor.id, &ui::amount_prompt(&participant, mode)).await;
}

/// Free text: the amount and note of the pending entry, if any.
pub(super) async fn on_text<M: Messenger + ?Sized>(
    m: &M,
    cfg: &ConfigParameters,
    actor: &Actor,
    text: &str,
) {
    let key = session_key(actor);
    let state = match cfg.engine.session(&key).await {
        Ok(state) => state,
        Err(err) => return fail(m, actor, "load session", err).await,
    };

    match &state {
        SessionState::Idle => return,
        SessionState::AwaitingModeChoice { participant } => {
            let (text, kb) = ui::render_mode_picker(participant);
            deliver_prompt(m, actor.id, &text, kb).await;
            return;
        }
        SessionState::AwaitingAmount { .. } | SessionState::AwaitingSplitAmount => {}
    }

    let Ok(input) = parse_entry_input(text) else {
        deliver(m, actor.id, ui::INVALID_AMOUNT).await;
        return;
    };
    let Some(entries) = entries_for(
        &state,
        input.amount,
        &input.note,
        &cfg.ledger.participants,
        Utc::now(),
    ) else {
        return;
    };

    if let Err(err) = cfg.engine.insert_entries(&entries).await {
        return fail(m, actor, "insert entries", err).await;
    }
    if let Err(err) = cfg.engine.reset_session(&key).await {
        tracing::warn!("entries committed but session of {key} not reset: {err}");
    }
    tracing::info!("{} recorded {} entries", actor.id, entries.len());

    let summary = describe(&entries, &input.note);
    deliver(m, actor.id, &format!("Recorded:\n{summary}")).await;
    broadcast(
        m,
        &cfg.access.others(actor.id),
        &format!("{} recorded:\n{summary}", actor.name),
    )
    .await;
}

fn describe(entries: &[Entry], note: &str) -> String {
    let mut lines: Vec<String> = entries
        .iter()
        .map(|entry| format!("{}: {}", entry.name, entry.amount))
        .collect();
    lines.push(if note.is_empty() {
        "No note".to_string()
    } else {
        format!("Note: {note}")
    });
    lines.join("\n")
}
