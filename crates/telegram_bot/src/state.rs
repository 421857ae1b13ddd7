use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use teloxide::types::UserId;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A clear waiting for someone other than the initiator to answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ClearRequest {
    pub id: Uuid,
    pub initiator: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// The request was pending and is now closed.
    Resolved(ClearRequest),
    /// The initiator tried to approve their own request; it stays pending.
    OwnRequest,
    /// Unknown id, or already answered.
    NotPending,
}

/// Most requests kept pending at once.
pub(crate) const MAX_PENDING: usize = 32;

/// Pending clear requests, kept in memory only.
///
/// Every `/clear` opens an independent request; the first answer for an id
/// closes it and later answers see [`Resolution::NotPending`]. Requests never
/// expire, but past [`MAX_PENDING`] the oldest one is dropped.
#[derive(Clone, Default)]
pub(crate) struct ClearApprovals {
    inner: Arc<Mutex<Pending>>,
}

#[derive(Default)]
struct Pending {
    next_seq: u64,
    /// Requests with the sequence number they were (re)opened at.
    requests: HashMap<Uuid, (u64, ClearRequest)>,
}

impl Pending {
    fn insert(&mut self, request: ClearRequest) {
        while self.requests.len() >= MAX_PENDING {
            let Some(oldest) = self
                .requests
                .iter()
                .min_by_key(|(_, (seq, _))| *seq)
                .map(|(id, _)| *id)
            else {
                break;
            };
            self.requests.remove(&oldest);
            tracing::warn!("dropped unanswered clear request {oldest}");
        }
        self.next_seq += 1;
        self.requests.insert(request.id, (self.next_seq, request));
    }
}

impl ClearApprovals {
    pub(crate) async fn open(&self, initiator: UserId) -> ClearRequest {
        let request = ClearRequest {
            id: Uuid::new_v4(),
            initiator,
            created_at: Utc::now(),
        };
        self.inner.lock().await.insert(request.clone());
        request
    }

    pub(crate) async fn resolve(&self, id: Uuid, by: UserId, approve: bool) -> Resolution {
        let mut guard = self.inner.lock().await;
        let own = match guard.requests.get(&id) {
            None => return Resolution::NotPending,
            Some((_, request)) => request.initiator == by,
        };
        if approve && own {
            return Resolution::OwnRequest;
        }
        match guard.requests.remove(&id) {
            Some((_, request)) => Resolution::Resolved(request),
            None => Resolution::NotPending,
        }
    }

    /// Puts a request back, e.g. when acting on it failed.
    pub(crate) async fn reopen(&self, request: ClearRequest) {
        self.inner.lock().await.insert(request);
    }

    pub(crate) async fn pending(&self) -> usize {
        self.inner.lock().await.requests.len()
    }
}
