//! Outbound side of the bot.
//!
//! Handlers talk to a [`Messenger`] instead of `teloxide::Bot` directly, so
//! the conversation logic can run against a recording fake in tests.

use std::path::Path;

use async_trait::async_trait;
use teloxide::{
    RequestError,
    prelude::*,
    types::{ChatId, InlineKeyboardMarkup, InputFile, UserId},
};

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, to: UserId, text: &str) -> Result<(), RequestError>;

    async fn send_prompt(
        &self,
        to: UserId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), RequestError>;

    /// Sends a local file as a document.
    async fn send_document(&self, to: UserId, path: &Path, caption: &str)
    -> Result<(), RequestError>;
}

#[derive(Clone, Debug)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, to: UserId, text: &str) -> Result<(), RequestError> {
        self.bot.send_message(ChatId::from(to), text).await?;
        Ok(())
    }

    async fn send_prompt(
        &self,
        to: UserId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), RequestError> {
        self.bot
            .send_message(ChatId::from(to), text)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    async fn send_document(
        &self,
        to: UserId,
        path: &Path,
        caption: &str,
    ) -> Result<(), RequestError> {
        self.bot
            .send_document(ChatId::from(to), InputFile::file(path.to_path_buf()))
            .caption(caption)
            .await?;
        Ok(())
    }
}

// Delivery failures are per recipient: they are logged and never stop the caller.

pub(crate) async fn deliver<M: Messenger + ?Sized>(messenger: &M, to: UserId, text: &str) -> bool {
    match messenger.send_text(to, text).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("failed to deliver message to {to}: {err}");
            false
        }
    }
}

pub(crate) async fn deliver_prompt<M: Messenger + ?Sized>(
    messenger: &M,
    to: UserId,
    text: &str,
    keyboard: InlineKeyboardMarkup,
) -> bool {
    match messenger.send_prompt(to, text, keyboard).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("failed to deliver prompt to {to}: {err}");
            false
        }
    }
}

pub(crate) async fn deliver_document<M: Messenger + ?Sized>(
    messenger: &M,
    to: UserId,
    path: &Path,
    caption: &str,
) -> bool {
    match messenger.send_document(to, path, caption).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("failed to deliver {} to {to}: {err}", path.display());
            false
        }
    }
}

/// Sends `text` to every recipient and returns how many deliveries succeeded.
pub(crate) async fn broadcast<M: Messenger + ?Sized>(
    messenger: &M,
    recipients: &[UserId],
    text: &str,
) -> usize {
    let mut delivered = 0;
    for to in recipients {
        if deliver(messenger, *to, text).await {
            delivered += 1;
        }
    }
    delivered
}
