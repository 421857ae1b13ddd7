//! Report artifacts sent by `/clear` and the scheduled job.

use std::path::PathBuf;

use chrono::Utc;
use engine::{EntryFilter, report};

use crate::{BotError, ConfigParameters};

/// A report written to disk, ready to be sent as a document.
#[derive(Clone, Debug)]
pub(crate) struct Artifact {
    pub path: PathBuf,
    pub entries: usize,
}

/// Writes the full-ledger report to the configured path, replacing any
/// previous one.
pub(crate) async fn write_report(cfg: &ConfigParameters) -> Result<Artifact, BotError> {
    let entries = cfg.engine.entries(&EntryFilter::default()).await?;
    let balances = report::Balances::compute(&entries, &cfg.ledger.participants);
    let text = report::detailed_report(&entries, &balances, Utc::now());

    let path = cfg.ledger.report_path.clone();
    tokio::fs::write(&path, text).await?;
    tracing::debug!("report with {} entries written to {}", entries.len(), path.display());

    Ok(Artifact {
        path,
        entries: entries.len(),
    })
}
