//! Per-user conversation state.
//!
//! A session is stored as a tag plus the columns that tag needs, so a mode
//! without a real participant cannot be represented.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// How an amount typed for a single participant is recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    /// The full amount is recorded for the participant.
    Debt,
    /// The amount is a shared total; only the participant's half is recorded.
    Expense,
}

impl EntryMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debt => "debt",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for EntryMode {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "debt" => Ok(Self::Debt),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::KeyNotFound(format!("entry mode {other}"))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Nothing pending; free text is ignored.
    #[default]
    Idle,
    AwaitingModeChoice {
        participant: String,
    },
    AwaitingAmount {
        participant: String,
        mode: EntryMode,
    },
    AwaitingSplitAmount,
}

impl SessionState {
    /// `true` when the next free-text message is expected to carry input.
    pub fn is_pending(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    fn tag(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingModeChoice { .. } => "mode_choice",
            Self::AwaitingAmount { .. } => "amount",
            Self::AwaitingSplitAmount => "split_amount",
        }
    }

    fn participant(&self) -> Option<String> {
        match self {
            Self::AwaitingModeChoice { participant }
            | Self::AwaitingAmount { participant, .. } => Some(participant.clone()),
            Self::Idle | Self::AwaitingSplitAmount => None,
        }
    }

    fn mode(&self) -> Option<EntryMode> {
        match self {
            Self::AwaitingAmount { mode, .. } => Some(*mode),
            _ => None,
        }
    }
}

impl TryFrom<Model> for SessionState {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let mode = model.mode.as_deref().map(EntryMode::try_from).transpose()?;
        match (model.state.as_str(), model.participant, mode) {
            ("idle", _, _) => Ok(Self::Idle),
            ("mode_choice", Some(participant), None) => Ok(Self::AwaitingModeChoice { participant }),
            ("amount", Some(participant), Some(mode)) => {
                Ok(Self::AwaitingAmount { participant, mode })
            }
            ("split_amount", None, None) => Ok(Self::AwaitingSplitAmount),
            (state, _, _) => Err(EngineError::KeyNotFound(format!(
                "consistent session for state {state}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub state: String,
    pub participant: Option<String>,
    pub mode: Option<String>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_state(user_id: &str, state: &SessionState, now: DateTime<Utc>) -> Self {
        Self {
            user_id: ActiveValue::Set(user_id.to_string()),
            state: ActiveValue::Set(state.tag().to_string()),
            participant: ActiveValue::Set(state.participant()),
            mode: ActiveValue::Set(state.mode().map(|m| m.as_str().to_string())),
            updated_at: ActiveValue::Set(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(state: &str, participant: Option<&str>, mode: Option<&str>) -> Model {
        Model {
            user_id: "1".to_string(),
            state: state.to_string(),
            participant: participant.map(ToString::to_string),
            mode: mode.map(ToString::to_string),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn decodes_every_variant() {
        assert_eq!(
            SessionState::try_from(model("idle", None, None)).unwrap(),
            SessionState::Idle
        );
        assert_eq!(
            SessionState::try_from(model("mode_choice", Some("Sheyx"), None)).unwrap(),
            SessionState::AwaitingModeChoice {
                participant: "Sheyx".to_string()
            }
        );
        assert_eq!(
            SessionState::try_from(model("amount", Some("Sheyx"), Some("expense"))).unwrap(),
            SessionState::AwaitingAmount {
                participant: "Sheyx".to_string(),
                mode: EntryMode::Expense
            }
        );
        assert_eq!(
            SessionState::try_from(model("split_amount", None, None)).unwrap(),
            SessionState::AwaitingSplitAmount
        );
    }

    #[test]
    fn rejects_mode_without_participant() {
        assert!(SessionState::try_from(model("amount", None, Some("debt"))).is_err());
        assert!(SessionState::try_from(model("split_amount", None, Some("debt"))).is_err());
        assert!(SessionState::try_from(model("amount", Some("Sheyx"), Some("loan"))).is_err());
    }

    #[test]
    fn only_idle_is_not_pending() {
        assert!(!SessionState::Idle.is_pending());
        assert!(SessionState::AwaitingSplitAmount.is_pending());
    }
}
