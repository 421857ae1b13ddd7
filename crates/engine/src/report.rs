//! Aggregation and text rendering of the ledger.
//!
//! Timestamps are rendered on the Asia/Seoul wall clock (UTC+9).

use chrono::{DateTime, Utc};
use chrono_tz::{Asia::Seoul, Tz};

use crate::{Amount, Entry, Participants};

/// Timezone every report timestamp is shown in.
pub const REPORT_TZ: Tz = Seoul;

/// Maximum size of a single outbound text chunk.
pub const MAX_CHUNK_CHARS: usize = 4000;

const NO_NOTE: &str = "-";

/// Per-participant totals in canonical order.
///
/// Names found in the ledger but not among the configured participants are
/// kept after them, so no stored amount is dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Balances(Vec<(String, Amount)>);

impl Balances {
    pub fn compute(entries: &[Entry], participants: &Participants) -> Self {
        let mut totals: Vec<(String, Amount)> = participants
            .names()
            .iter()
            .map(|n| (n.clone(), Amount::ZERO))
            .collect();

        for entry in entries {
            match totals.iter_mut().find(|(name, _)| *name == entry.name) {
                Some((_, total)) => *total += entry.amount,
                None => totals.push((entry.name.clone(), entry.amount)),
            }
        }

        Self(totals)
    }

    pub fn get(&self, name: &str) -> Option<Amount> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, a)| *a)
    }

    pub fn total(&self) -> Amount {
        self.0.iter().map(|(_, a)| *a).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.0.iter().map(|(n, a)| (n.as_str(), *a))
    }
}

pub fn format_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&REPORT_TZ)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn note_or_placeholder(note: &str) -> &str {
    if note.trim().is_empty() { NO_NOTE } else { note }
}

/// A single line of `/list` output.
pub fn entry_line(entry: &Entry) -> String {
    format!(
        "{} | {} | {} | {} | {}",
        entry.id,
        entry.name,
        entry.amount,
        note_or_placeholder(&entry.note),
        format_time(entry.time)
    )
}

/// One line per participant followed by the overall sum.
pub fn balance_summary(balances: &Balances) -> String {
    let mut lines: Vec<String> = balances
        .iter()
        .map(|(name, amount)| format!("{name}: {amount}"))
        .collect();
    lines.push(format!("Total: {}", balances.total()));
    lines.join("\n")
}

/// Full report of the ledger as a text document.
///
/// Entries are grouped per participant in canonical order, newest first,
/// and followed by the balances they add up to.
pub fn detailed_report(
    entries: &[Entry],
    balances: &Balances,
    generated_at: DateTime<Utc>,
) -> String {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.time.cmp(&a.time));

    let mut text = format!(
        "Ledger report, generated {} ({})\nEntries: {}\n",
        format_time(generated_at),
        REPORT_TZ.name(),
        entries.len()
    );

    for (name, _) in balances.iter() {
        text.push_str(&format!("\n== {name} ==\n"));
        let mine: Vec<&&Entry> = sorted.iter().filter(|e| e.name == name).collect();
        if mine.is_empty() {
            text.push_str("(no entries)\n");
        }
        for (idx, entry) in mine.iter().enumerate() {
            text.push_str(&format!(
                "{}. {} | {} | {}\n",
                idx + 1,
                entry.amount,
                note_or_placeholder(&entry.note),
                format_time(entry.time)
            ));
        }
    }

    text.push_str("\n== Balances before clear ==\n");
    text.push_str(&balance_summary(balances));
    text.push('\n');
    text
}

/// Packs lines into chunks of at most `limit` characters, in order.
///
/// Lines are never split unless a single line is longer than `limit`.
pub fn paginate<I, S>(lines: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in lines {
        let line = line.as_ref();
        let line_len = line.chars().count();

        if line_len > limit {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { line_len } else { line_len + 1 };
        if current_len + needed > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
