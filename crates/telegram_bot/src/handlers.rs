//! Inbound updates.
//!
//! The teloxide endpoints only unpack the update; everything else goes
//! through [`on_message`] and [`on_callback`], which take any [`Messenger`].

use engine::EngineError;
use teloxide::{prelude::*, types::CallbackQuery};

use crate::{
    ConfigParameters,
    access::{Actor, refuse},
    commands::{Command, parse_command},
    messenger::{Messenger, TelegramMessenger, deliver},
    ui::{self, CallbackAction},
};

mod admin;
mod balance;
mod clear;
mod entry;
pub(crate) mod exports;
mod start;

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        tracing::debug!("dropping message without sender in chat {}", msg.chat.id);
        return Ok(());
    };
    let text = msg.text().or(msg.caption()).unwrap_or_default();

    let messenger = TelegramMessenger::new(bot);
    on_message(&messenger, &cfg, &Actor::from(from), text).await;
    Ok(())
}

pub(crate) async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    if let Err(err) = bot.answer_callback_query(q.id.clone()).await {
        tracing::warn!("failed to answer callback query: {err}");
    }
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    let messenger = TelegramMessenger::new(bot);
    on_callback(&messenger, &cfg, &Actor::from(&q.from), data).await;
    Ok(())
}

pub(crate) async fn on_message<M: Messenger + ?Sized>(
    m: &M,
    cfg: &ConfigParameters,
    actor: &Actor,
    text: &str,
) {
    if !cfg.access.is_allowed(actor.id) {
        return refuse(m, &cfg.access, actor, text).await;
    }

    match parse_command(text) {
        Some(Command::Start | Command::Help) => start::help(m, actor).await,
        Some(Command::Add) => entry::begin(m, cfg, actor).await,
        Some(Command::Cancel) => entry::cancel(m, cfg, actor).await,
        Some(Command::Balance) => balance::choose_balance(m, cfg, actor).await,
        Some(Command::List) => balance::choose_list(m, cfg, actor).await,
        Some(Command::Clear) => clear::request(m, cfg, actor).await,
        Some(Command::Delete { id }) => admin::delete(m, cfg, actor, &id).await,
        None if text.trim_start().starts_with('/') => {
            deliver(m, actor.id, "Unknown command. /help lists what I can do.").await;
        }
        None => entry::on_text(m, cfg, actor, text).await,
    }
}

pub(crate) async fn on_callback<M: Messenger + ?Sized>(
    m: &M,
    cfg: &ConfigParameters,
    actor: &Actor,
    data: &str,
) {
    if !cfg.access.is_allowed(actor.id) {
        return refuse(m, &cfg.access, actor, data).await;
    }

    let Some(action) = CallbackAction::parse(data) else {
        tracing::debug!("ignoring unknown callback data {data:?}");
        return;
    };

    match action {
        CallbackAction::Person(idx) => entry::select_person(m, cfg, actor, idx).await,
        CallbackAction::Split => entry::select_split(m, cfg, actor).await,
        CallbackAction::Mode(mode) => entry::select_mode(m, cfg, actor, mode).await,
        CallbackAction::Cancel => entry::cancel(m, cfg, actor).await,
        CallbackAction::Balance(scope) => balance::show_balance(m, cfg, actor, scope).await,
        CallbackAction::List(scope) => balance::show_list(m, cfg, actor, scope).await,
        CallbackAction::ApproveClear(id) => clear::answer(m, cfg, actor, id, true).await,
        CallbackAction::DenyClear(id) => clear::answer(m, cfg, actor, id, false).await,
    }
}

fn session_key(actor: &Actor) -> String {
    actor.id.0.to_string()
}

/// Logs a store failure and tells the user to retry.
async fn fail<M: Messenger + ?Sized>(m: &M, actor: &Actor, action: &str, err: EngineError) {
    tracing::error!("failed to {action} for {}: {err}", actor.id);
    deliver(m, actor.id, ui::STORE_FAILURE).await;
}
