//! Telegram bot.
//!
//! The bot owns the conversation: it reads and writes the ledger through
//! [`engine::Engine`] and keeps pending clear requests in memory.

use std::{path::PathBuf, sync::Arc};

use engine::{Engine, Participants};
use teloxide::{prelude::*, utils::command::BotCommands};

mod access;
mod commands;
mod error;
mod handlers;
mod messenger;
mod parsing;
mod scheduler;
mod state;
#[cfg(test)]
mod testing;
mod ui;

pub use access::{AccessGuard, Actor};
pub use error::BotError;
pub use messenger::{Messenger, TelegramMessenger};
pub use scheduler::Schedule;
pub use teloxide::types::UserId;

/// Ledger behaviour shared by every handler.
#[derive(Clone, Debug)]
pub struct LedgerSettings {
    pub participants: Participants,
    /// Ask expense or debt after choosing a participant; otherwise every
    /// single-participant entry is a debt.
    pub ask_mode: bool,
    /// Entries shown to approvers of a clear request.
    pub preview_size: u64,
    /// Where report documents are written before sending.
    pub report_path: PathBuf,
}

#[derive(Clone)]
pub struct ConfigParameters {
    engine: Engine,
    access: AccessGuard,
    ledger: Arc<LedgerSettings>,
    approvals: state::ClearApprovals,
}

impl ConfigParameters {
    pub fn new(engine: Engine, access: AccessGuard, ledger: LedgerSettings) -> Self {
        Self {
            engine,
            access,
            ledger: Arc::new(ledger),
            approvals: state::ClearApprovals::default(),
        }
    }
}

pub struct Bot {
    token: String,
    parameters: ConfigParameters,
    schedule: Option<Schedule>,
}

impl Bot {
    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);
        if let Err(err) = bot.set_my_commands(commands::Command::bot_commands()).await {
            tracing::warn!("failed to register bot commands: {err}");
        }

        let scheduler = self.schedule.clone().map(|schedule| {
            tokio::spawn(scheduler::run(
                schedule,
                TelegramMessenger::new(bot.clone()),
                self.parameters.clone(),
            ))
        });

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handlers::handle_message))
            .branch(Update::filter_callback_query().endpoint(handlers::handle_callback));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![self.parameters.clone()])
            .default_handler(|upd| async move {
                tracing::debug!("Unhandled update: {:?}", upd.kind);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        if let Some(task) = scheduler {
            task.abort();
        }
        tracing::info!("Telegram bot stopped");
    }
}

#[derive(Default)]
pub struct BotBuilder {
    token: String,
    access: Option<AccessGuard>,
    ledger: Option<LedgerSettings>,
    engine: Option<Engine>,
    schedule: Option<Schedule>,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    pub fn access(mut self, access: AccessGuard) -> BotBuilder {
        self.access = Some(access);
        self
    }

    pub fn ledger(mut self, ledger: LedgerSettings) -> BotBuilder {
        self.ledger = Some(ledger);
        self
    }

    pub fn engine(mut self, engine: Engine) -> BotBuilder {
        self.engine = Some(engine);
        self
    }

    /// Enables the scheduled report-and-clear job.
    pub fn schedule(mut self, schedule: Schedule) -> BotBuilder {
        self.schedule = Some(schedule);
        self
    }

    pub fn build(self) -> Result<Bot, BotError> {
        tracing::info!("Initializing telegram bot...");
        if self.token.trim().is_empty() {
            return Err(BotError::Config("telegram token is empty".to_string()));
        }
        let access = self
            .access
            .ok_or_else(|| BotError::Config("missing allow-list".to_string()))?;
        let ledger = self
            .ledger
            .ok_or_else(|| BotError::Config("missing ledger settings".to_string()))?;
        let engine = self
            .engine
            .ok_or_else(|| BotError::Config("missing engine".to_string()))?;

        Ok(Bot {
            token: self.token,
            parameters: ConfigParameters::new(engine, access, ledger),
            schedule: self.schedule,
        })
    }
}
