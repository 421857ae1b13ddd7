//! Administrator commands.

use engine::EngineError;

use crate::{
    ConfigParameters,
    access::Actor,
    messenger::{Messenger, deliver},
};

use super::fail;

pub(super) async fn delete<M: Messenger + ?Sized>(
    m: &M,
    cfg: &ConfigParameters,
    actor: &Actor,
    id: &str,
) {
    if !cfg.access.is_admin(actor.id) {
        deliver(m, actor.id, "Only the administrator can delete entries.").await;
        return;
    }
    if id.is_empty() {
        deliver(m, actor.id, "Usage: /delete <entry id>").await;
        return;
    }

    match cfg.engine.delete_entry(id).await {
        Ok(()) => {
            tracing::info!("entry {id} deleted by {}", actor.id);
            deliver(m, actor.id, &format!("Entry {id} deleted.")).await;
        }
        Err(EngineError::KeyNotFound(_)) => {
            deliver(m, actor.id, &format!("No entry with id {id}.")).await;
        }
        Err(err) => fail(m, actor, "delete entry", err).await,
    }
}
