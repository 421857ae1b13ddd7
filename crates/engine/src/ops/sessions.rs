use chrono::Utc;
use sea_orm::{prelude::*, sea_query::OnConflict};

use crate::{ResultEngine, SessionState, session};

use super::Engine;

impl Engine {
    /// Current state for `user_id`; a user without a record is idle.
    ///
    /// A record that does not decode to a valid state is treated as idle.
    pub async fn session(&self, user_id: &str) -> ResultEngine<SessionState> {
        let Some(model) = session::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(SessionState::Idle);
        };

        match SessionState::try_from(model) {
            Ok(state) => Ok(state),
            Err(err) => {
                tracing::warn!("discarding session of {user_id}: {err}");
                Ok(SessionState::Idle)
            }
        }
    }

    /// Creates or replaces the session of `user_id`. The last write wins.
    pub async fn save_session(&self, user_id: &str, state: &SessionState) -> ResultEngine<()> {
        let model = session::ActiveModel::from_state(user_id, state, Utc::now());
        session::Entity::insert(model)
            .on_conflict(
                OnConflict::column(session::Column::UserId)
                    .update_columns([
                        session::Column::State,
                        session::Column::Participant,
                        session::Column::Mode,
                        session::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.database)
            .await?;
        Ok(())
    }

    pub async fn reset_session(&self, user_id: &str) -> ResultEngine<()> {
        self.save_session(user_id, &SessionState::Idle).await
    }
}
