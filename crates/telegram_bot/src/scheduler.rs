//! Scheduled report-and-clear job.
//!
//! On each configured day of the month, at a fixed wall-clock time, the full
//! ledger report is sent to everyone and the ledger is cleared without an
//! approval round.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::{Asia::Seoul, Tz};

use crate::{
    BotError, ConfigParameters,
    handlers::exports,
    messenger::{Messenger, broadcast, deliver, deliver_document},
};

/// Months searched ahead for a valid fire date.
const LOOKAHEAD_MONTHS: usize = 24;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    days: Vec<u32>,
    at: NaiveTime,
    tz: Tz,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            days: vec![1, 11, 21],
            at: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            tz: Seoul,
        }
    }
}

impl Schedule {
    pub fn new(mut days: Vec<u32>, at: NaiveTime, tz: Tz) -> Result<Self, BotError> {
        if days.is_empty() {
            return Err(BotError::Schedule("no days of the month given".to_string()));
        }
        if let Some(day) = days.iter().find(|d| !(1..=31).contains(*d)) {
            return Err(BotError::Schedule(format!("{day} is not a day of the month")));
        }
        days.sort_unstable();
        days.dedup();
        Ok(Self { days, at, tz })
    }

    pub fn days(&self) -> &[u32] {
        &self.days
    }

    pub fn at(&self) -> NaiveTime {
        self.at
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// The first fire time strictly after `after`.
    ///
    /// Days a month does not have (e.g. the 31st in April) are skipped.
    pub fn next_fire(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local = after.with_timezone(&self.tz);
        let (mut year, mut month) = (local.year(), local.month());

        for _ in 0..LOOKAHEAD_MONTHS {
            for &day in &self.days {
                let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                    continue;
                };
                let Some(fire) = self
                    .tz
                    .from_local_datetime(&date.and_time(self.at))
                    .earliest()
                else {
                    continue;
                };
                let fire = fire.with_timezone(&Utc);
                if fire > after {
                    return Some(fire);
                }
            }
            (year, month) = if month == 12 {
                (year + 1, 1)
            } else {
                (year, month + 1)
            };
        }
        None
    }
}

/// Sleeps until each fire time and runs the job, forever.
pub(crate) async fn run<M: Messenger>(schedule: Schedule, messenger: M, cfg: ConfigParameters) {
    let mut last_fired = None;
    loop {
        let now = Utc::now();
        let Some(next) = schedule.next_fire(search_from(now, last_fired)) else {
            tracing::warn!("no upcoming report time, scheduler stopped");
            return;
        };
        tracing::info!("next scheduled report at {next}");

        let wait = (next - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;
        fire(&messenger, &cfg).await;
        last_fired = Some(next);
    }
}

// The sleep runs on the monotonic clock and may end before the wall clock
// reaches `next`; searching from the last fire keeps it from repeating.
fn search_from(now: DateTime<Utc>, last_fired: Option<DateTime<Utc>>) -> DateTime<Utc> {
    last_fired.map_or(now, |last| last.max(now))
}

/// Runs the job once; a failure is logged and reported to the administrator.
pub(crate) async fn fire<M: Messenger + ?Sized>(messenger: &M, cfg: &ConfigParameters) {
    if let Err(err) = run_job(messenger, cfg).await {
        tracing::error!("scheduled report failed: {err}");
        deliver(
            messenger,
            cfg.access.admin(),
            &format!("Scheduled report failed: {err}"),
        )
        .await;
    }
}

/// Report, send, clear, announce. Returns how many entries were removed.
pub(crate) async fn run_job<M: Messenger + ?Sized>(
    messenger: &M,
    cfg: &ConfigParameters,
) -> Result<u64, BotError> {
    let artifact = exports::write_report(cfg).await?;
    let caption = format!("Scheduled ledger report ({} entries)", artifact.entries);
    for to in cfg.access.everyone() {
        deliver_document(messenger, to, &artifact.path, &caption).await;
    }

    let removed = cfg.engine.delete_all().await?;
    tracing::info!("scheduled clear removed {removed} entries");

    broadcast(
        messenger,
        cfg.access.allowed(),
        &format!("Scheduled report sent. The ledger has been cleared ({removed} entries)."),
    )
    .await;
    Ok(removed)
}
