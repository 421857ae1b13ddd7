//! Turning a pending session plus a parsed amount into ledger entries.

use chrono::{DateTime, Utc};

use crate::{Amount, Entry, EntryMode, Participants, SessionState};

/// Builds the entries a commit in `state` produces.
///
/// Returns `None` when the state does not accept an amount yet.
///
/// - debt: the full amount for the chosen participant
/// - expense: the participant's half ([`Amount::half`])
/// - split: one entry per participant ([`Amount::split`]), same note and time
pub fn entries_for(
    state: &SessionState,
    amount: Amount,
    note: &str,
    participants: &Participants,
    time: DateTime<Utc>,
) -> Option<Vec<Entry>> {
    match state {
        SessionState::Idle | SessionState::AwaitingModeChoice { .. } => None,
        SessionState::AwaitingAmount { participant, mode } => {
            let share = match mode {
                EntryMode::Debt => amount,
                EntryMode::Expense => amount.half(),
            };
            Some(vec![Entry::new(participant, share, note, time)])
        }
        SessionState::AwaitingSplitAmount => Some(
            participants
                .names()
                .iter()
                .zip(amount.split(participants.len()))
                .map(|(name, share)| Entry::new(name, share, note, time))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Participants {
        Participants::new(["Sheyx", "Aziz"], "Split").unwrap()
    }

    fn amount(units: i64) -> Amount {
        Amount::new(units).unwrap()
    }

    #[test]
    fn debt_records_the_full_amount() {
        let state = SessionState::AwaitingAmount {
            participant: "Sheyx".to_string(),
            mode: EntryMode::Debt,
        };
        let entries = entries_for(&state, amount(30_000), "borrowed", &people(), Utc::now()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Sheyx");
        assert_eq!(entries[0].amount, amount(30_000));
        assert_eq!(entries[0].note, "borrowed");
    }

    #[test]
    fn expense_records_only_the_half() {
        let state = SessionState::AwaitingAmount {
            participant: "Aziz".to_string(),
            mode: EntryMode::Expense,
        };
        let entries = entries_for(&state, amount(15_001), "", &people(), Utc::now()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Aziz");
        assert_eq!(entries[0].amount, amount(7_501));
    }

    #[test]
    fn split_records_one_entry_per_participant() {
        let now = Utc::now();
        let entries =
            entries_for(&SessionState::AwaitingSplitAmount, amount(50_000), "snacks", &people(), now)
                .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Sheyx");
        assert_eq!(entries[1].name, "Aziz");
        assert!(entries.iter().all(|e| e.amount == amount(25_000)));
        assert!(entries.iter().all(|e| e.note == "snacks" && e.time == now));
        assert_ne!(entries[0].id, entries[1].id);
    }

    #[test]
    fn odd_split_gives_the_remainder_to_the_first_participant() {
        let entries =
            entries_for(&SessionState::AwaitingSplitAmount, amount(7), "", &people(), Utc::now())
                .unwrap();
        assert_eq!(entries[0].amount, amount(4));
        assert_eq!(entries[1].amount, amount(3));
    }

    #[test]
    fn states_without_a_target_produce_nothing() {
        assert!(entries_for(&SessionState::Idle, amount(1), "", &people(), Utc::now()).is_none());
        let choosing = SessionState::AwaitingModeChoice {
            participant: "Sheyx".to_string(),
        };
        assert!(entries_for(&choosing, amount(1), "", &people(), Utc::now()).is_none());
    }
}
