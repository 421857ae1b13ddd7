//! Identity allow-list and the administrator identity.

use teloxide::types::{User, UserId};

use crate::{
    BotError,
    messenger::{Messenger, deliver},
};

const REFUSAL: &str = "Sorry, this bot is private.";

/// The sender of an inbound update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub name: String,
}

impl Actor {
    pub fn new(id: UserId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        let name = match &user.username {
            Some(username) => format!("@{username}"),
            None => user.full_name(),
        };
        Self { id: user.id, name }
    }
}

#[derive(Clone, Debug)]
pub struct AccessGuard {
    allowed: Vec<UserId>,
    admin: UserId,
}

impl AccessGuard {
    pub fn new(allowed: Vec<UserId>, admin: UserId) -> Result<Self, BotError> {
        if allowed.is_empty() {
            return Err(BotError::Config(
                "the allow-list must not be empty".to_string(),
            ));
        }
        let mut unique: Vec<UserId> = Vec::with_capacity(allowed.len());
        for id in allowed {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Ok(Self {
            allowed: unique,
            admin,
        })
    }

    pub fn is_allowed(&self, user: UserId) -> bool {
        self.allowed.contains(&user)
    }

    /// The administrator may only act when also allow-listed.
    pub fn is_admin(&self, user: UserId) -> bool {
        self.admin == user && self.is_allowed(user)
    }

    pub fn admin(&self) -> UserId {
        self.admin
    }

    pub fn allowed(&self) -> &[UserId] {
        &self.allowed
    }

    /// The allow-list plus the administrator, who receives audit reports
    /// even when not allow-listed.
    pub fn everyone(&self) -> Vec<UserId> {
        let mut all = self.allowed.clone();
        if !all.contains(&self.admin) {
            all.push(self.admin);
        }
        all
    }

    /// Every allow-listed identity except `user`.
    pub fn others(&self, user: UserId) -> Vec<UserId> {
        self.allowed
            .iter()
            .copied()
            .filter(|id| *id != user)
            .collect()
    }
}

/// Refuses `actor` and alerts the administrator with what they sent.
pub(crate) async fn refuse<M: Messenger + ?Sized>(
    messenger: &M,
    guard: &AccessGuard,
    actor: &Actor,
    text: &str,
) {
    tracing::warn!("refused {} ({})", actor.id, actor.name);
    deliver(messenger, actor.id, REFUSAL).await;

    let alert = format!(
        "Unauthorized access attempt\nUser: {} ({})\nMessage: {text}",
        actor.id, actor.name
    );
    deliver(messenger, guard.admin(), &alert).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Recorder, Sent};

    fn guard() -> AccessGuard {
        AccessGuard::new(vec![UserId(1), UserId(2), UserId(1)], UserId(1)).unwrap()
    }

    #[test]
    fn allow_list_is_deduplicated() {
        assert_eq!(guard().allowed(), [UserId(1), UserId(2)]);
        assert!(AccessGuard::new(Vec::new(), UserId(1)).is_err());
    }

    #[test]
    fn others_excludes_the_sender() {
        assert_eq!(guard().others(UserId(1)), [UserId(2)]);
        assert_eq!(guard().others(UserId(9)), [UserId(1), UserId(2)]);
    }

    #[test]
    fn admin_must_be_allow_listed() {
        assert!(guard().is_admin(UserId(1)));
        assert!(!guard().is_admin(UserId(2)));
        let outside = AccessGuard::new(vec![UserId(2)], UserId(1)).unwrap();
        assert!(!outside.is_admin(UserId(1)));
        assert_eq!(outside.everyone(), [UserId(2), UserId(1)]);
        assert_eq!(guard().everyone(), [UserId(1), UserId(2)]);
    }

    #[tokio::test]
    async fn refusal_alerts_the_administrator() {
        let recorder = Recorder::default();
        let intruder = Actor::new(UserId(66), "@mallory");

        refuse(&recorder, &guard(), &intruder, "/balance").await;

        let sent = recorder.sent();
        assert_eq!(sent.len(), 2);
        assert!(matches!(&sent[0], Sent::Text { to, .. } if *to == UserId(66)));
        match &sent[1] {
            Sent::Text { to, text } => {
                assert_eq!(*to, UserId(1));
                assert!(text.contains("66"));
                assert!(text.contains("@mallory"));
                assert!(text.contains("/balance"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
