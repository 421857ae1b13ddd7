//! Test doubles shared by the handler tests.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use engine::{Engine, Participants};
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use teloxide::{
    RequestError,
    types::{InlineKeyboardButtonKind, InlineKeyboardMarkup, UserId},
};
use uuid::Uuid;

use crate::{ConfigParameters, LedgerSettings, access::AccessGuard, messenger::Messenger};

pub(crate) const SHEYX: UserId = UserId(1);
pub(crate) const AZIZ: UserId = UserId(2);
pub(crate) const ADMIN: UserId = SHEYX;
pub(crate) const STRANGER: UserId = UserId(99);

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Sent {
    Text {
        to: UserId,
        text: String,
    },
    Prompt {
        to: UserId,
        text: String,
        /// `(label, callback data)` for every button, row by row.
        buttons: Vec<(String, String)>,
    },
    Document {
        to: UserId,
        path: PathBuf,
        caption: String,
        contents: String,
    },
}

impl Sent {
    pub(crate) fn to(&self) -> UserId {
        match self {
            Sent::Text { to, .. } | Sent::Prompt { to, .. } | Sent::Document { to, .. } => *to,
        }
    }

    pub(crate) fn text(&self) -> &str {
        match self {
            Sent::Text { text, .. } | Sent::Prompt { text, .. } => text,
            Sent::Document { caption, .. } => caption,
        }
    }
}

/// Records everything sent; deliveries to `failing` recipients error out.
#[derive(Clone, Default)]
pub(crate) struct Recorder {
    sent: Arc<Mutex<Vec<Sent>>>,
    failing: Arc<Mutex<Vec<UserId>>>,
}

impl Recorder {
    pub(crate) fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn sent_to(&self, user: UserId) -> Vec<Sent> {
        self.sent().into_iter().filter(|s| s.to() == user).collect()
    }

    pub(crate) fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    pub(crate) fn fail_for(&self, user: UserId) {
        self.failing.lock().unwrap().push(user);
    }

    fn check(&self, to: UserId) -> Result<(), RequestError> {
        if self.failing.lock().unwrap().contains(&to) {
            return Err(RequestError::Io(std::io::Error::other("unreachable").into()));
        }
        Ok(())
    }

    fn push(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }
}

fn buttons(keyboard: &InlineKeyboardMarkup) -> Vec<(String, String)> {
    keyboard
        .inline_keyboard
        .iter()
        .flatten()
        .map(|b| {
            let data = match &b.kind {
                InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
                other => format!("{other:?}"),
            };
            (b.text.clone(), data)
        })
        .collect()
}

#[async_trait]
impl Messenger for Recorder {
    async fn send_text(&self, to: UserId, text: &str) -> Result<(), RequestError> {
        self.check(to)?;
        self.push(Sent::Text {
            to,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_prompt(
        &self,
        to: UserId,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<(), RequestError> {
        self.check(to)?;
        self.push(Sent::Prompt {
            to,
            text: text.to_string(),
            buttons: buttons(&keyboard),
        });
        Ok(())
    }

    async fn send_document(
        &self,
        to: UserId,
        path: &Path,
        caption: &str,
    ) -> Result<(), RequestError> {
        self.check(to)?;
        let contents = std::fs::read_to_string(path).unwrap_or_default();
        self.push(Sent::Document {
            to,
            path: path.to_path_buf(),
            caption: caption.to_string(),
            contents,
        });
        Ok(())
    }
}

pub(crate) async fn database() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

pub(crate) async fn engine() -> Engine {
    Engine::builder().database(database().await).build().await.unwrap()
}

/// Makes every later ledger read or write fail.
pub(crate) async fn drop_entries(db: &DatabaseConnection) {
    db.execute_unprepared("DROP TABLE entries").await.unwrap();
}

pub(crate) fn report_path() -> PathBuf {
    std::env::temp_dir().join(format!("hisob_report_{}.txt", Uuid::new_v4()))
}

/// Two participants, both allow-listed; Sheyx is also the administrator.
pub(crate) async fn parameters() -> ConfigParameters {
    parameters_with(true).await
}

pub(crate) async fn parameters_with(ask_mode: bool) -> ConfigParameters {
    ConfigParameters::new(engine().await, access(), ledger(ask_mode))
}

/// Like [`parameters`], keeping a handle on the engine's connection.
pub(crate) async fn parameters_with_database() -> (ConfigParameters, DatabaseConnection) {
    let db = database().await;
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (ConfigParameters::new(engine, access(), ledger(true)), db)
}

fn access() -> AccessGuard {
    AccessGuard::new(vec![SHEYX, AZIZ], ADMIN).unwrap()
}

fn ledger(ask_mode: bool) -> LedgerSettings {
    LedgerSettings {
        participants: Participants::new(["Sheyx", "Aziz"], "Split").unwrap(),
        ask_mode,
        preview_size: 10,
        report_path: report_path(),
    }
}

/// Callback data of the button labelled `label` in the last prompt to `user`.
pub(crate) fn button(recorder: &Recorder, user: UserId, label: &str) -> String {
    recorder
        .sent_to(user)
        .iter()
        .rev()
        .find_map(|s| match s {
            Sent::Prompt { buttons, .. } => buttons
                .iter()
                .find(|(l, _)| l.contains(label))
                .map(|(_, d)| d.clone()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no button {label:?} sent to {user}"))
}
