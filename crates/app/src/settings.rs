//! Handles settings for the application. Configuration is written in
//! `config/settings.toml` and may be overridden with `HISOB__*` environment
//! variables, e.g. `HISOB__TELEGRAM__TOKEN`.
//!
//! See `settings.example.toml` for every key.

use std::{net::SocketAddr, path::PathBuf};

use chrono::NaiveTime;
use chrono_tz::Tz;
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use engine::{EngineError, Participants};
use serde::Deserialize;
use telegram_bot::{AccessGuard, BotError, LedgerSettings, Schedule, UserId};

const DEFAULT_CONFIG_PATH: &str = "config/settings.toml";

#[derive(Debug, Parser)]
#[command(name = "hisob", version)]
pub struct Args {
    /// Config file path (TOML).
    #[arg(long, env = "HISOB_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
}

impl Server {
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        let bind = self.bind.as_deref().unwrap_or("127.0.0.1");
        format!("{bind}:{}", self.port).parse()
    }
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
    pub allowed_users: Vec<u64>,
    pub admin: u64,
}

impl Telegram {
    pub fn access(&self) -> Result<AccessGuard, BotError> {
        let allowed = self.allowed_users.iter().copied().map(UserId).collect();
        AccessGuard::new(allowed, UserId(self.admin))
    }
}

#[derive(Debug, Deserialize)]
pub struct Ledger {
    pub participants: Vec<String>,
    #[serde(default = "default_split_label")]
    pub split_label: String,
    #[serde(default = "default_true")]
    pub ask_mode: bool,
    #[serde(default = "default_preview_size")]
    pub preview_size: u64,
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
}

impl Ledger {
    pub fn settings(&self) -> Result<LedgerSettings, EngineError> {
        Ok(LedgerSettings {
            participants: Participants::new(self.participants.iter().cloned(), &self.split_label)?,
            ask_mode: self.ask_mode,
            preview_size: self.preview_size,
            report_path: self.report_path.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    pub enabled: bool,
    pub days: Vec<u32>,
    /// Wall-clock time, `HH:MM`.
    pub at: String,
    /// IANA timezone name.
    pub timezone: String,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            days: vec![1, 11, 21],
            at: "09:00".to_string(),
            timezone: "Asia/Seoul".to_string(),
        }
    }
}

impl ScheduleSettings {
    /// `None` when the scheduled job is disabled.
    pub fn schedule(&self) -> Result<Option<Schedule>, BotError> {
        if !self.enabled {
            return Ok(None);
        }
        let at = NaiveTime::parse_from_str(&self.at, "%H:%M")
            .map_err(|err| BotError::Schedule(format!("invalid time {:?}: {err}", self.at)))?;
        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|err| BotError::Schedule(format!("invalid timezone {:?}: {err}", self.timezone)))?;
        Schedule::new(self.days.clone(), at, tz).map(Some)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub database: Database,
    pub server: Option<Server>,
    pub telegram: Telegram,
    pub ledger: Ledger,
    #[serde(default)]
    pub schedule: ScheduleSettings,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("HISOB")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("telegram.allowed_users")
                    .with_list_parse_key("ledger.participants")
                    .with_list_parse_key("schedule.days"),
            )
            .build()?
            .try_deserialize()
    }
}

fn default_split_label() -> String {
    "Split".to_string()
}

fn default_true() -> bool {
    true
}

fn default_preview_size() -> u64 {
    10
}

fn default_report_path() -> PathBuf {
    PathBuf::from("report.txt")
}
