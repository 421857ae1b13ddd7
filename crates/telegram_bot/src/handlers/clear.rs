//! `/clear` and its approval round.

use engine::{EntryFilter, report};
use uuid::Uuid;

use crate::{
    ConfigParameters,
    access::Actor,
    messenger::{Messenger, broadcast, deliver, deliver_document, deliver_prompt},
    state::Resolution,
    ui,
};

use super::{exports, fail};

pub(crate) const NO_LONGER_PENDING: &str = "This clear request is no longer pending.";

pub(super) async fn request<M: Messenger + ?Sized>(m: &M, cfg: &ConfigParameters, actor: &Actor) {
    let artifact = match exports::write_report(cfg).await {
        Ok(artifact) => artifact,
        Err(err) => {
            tracing::error!("failed to write report for {}: {err}", actor.id);
            deliver(m, actor.id, ui::STORE_FAILURE).await;
            return;
        }
    };

    let caption = format!(
        "Ledger report requested by {} ({} entries)",
        actor.name, artifact.entries
    );
    let mut auditors = vec![actor.id];
    if cfg.access.admin() != actor.id {
        auditors.push(cfg.access.admin());
    }
    for to in auditors {
        deliver_document(m, to, &artifact.path, &caption).await;
    }

    let latest = match cfg
        .engine
        .entries(&EntryFilter::latest(cfg.ledger.preview_size))
        .await
    {
        Ok(entries) => entries,
        Err(err) => return fail(m, actor, "preview entries", err).await,
    };
    let preview = if latest.is_empty() {
        "(no entries)".to_string()
    } else {
        latest
            .iter()
            .map(report::entry_line)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let request = cfg.approvals.open(actor.id).await;
    tracing::info!(
        "clear request {} opened by {}, {} pending",
        request.id,
        actor.id,
        cfg.approvals.pending().await
    );

    for to in cfg.access.others(actor.id) {
        let (text, kb) = ui::render_clear_prompt(request.id, &actor.name, &preview);
        deliver_prompt(m, to, &text, kb).await;
    }
    deliver(m, actor.id, "Clear requested, waiting for approval.").await;
}

pub(super) async fn answer<M: Messenger + ?Sized>(
    m: &M,
    cfg: &ConfigParameters,
    actor: &Actor,
    id: Uuid,
    approve: bool,
) {
    let request = match cfg.approvals.resolve(id, actor.id, approve).await {
        Resolution::Resolved(request) => request,
        Resolution::OwnRequest => {
            deliver(m, actor.id, "You cannot approve your own clear request.").await;
            return;
        }
        Resolution::NotPending => {
            deliver(m, actor.id, NO_LONGER_PENDING).await;
            return;
        }
    };
    let others = cfg.access.others(actor.id);

    if !approve {
        tracing::info!(
            "clear request {} (opened {}) denied by {}",
            request.id,
            request.created_at,
            actor.id
        );
        let notice = if request.initiator == actor.id {
            format!("{} withdrew the clear request. Nothing was deleted.", actor.name)
        } else {
            format!("{} denied the clear request. Nothing was deleted.", actor.name)
        };
        deliver(m, actor.id, "Clear request denied.").await;
        broadcast(m, &others, &notice).await;
        return;
    }

    match cfg.engine.delete_all().await {
        Ok(removed) => {
            tracing::info!(
                "clear request {} (opened {}) approved by {}",
                request.id,
                request.created_at,
                actor.id
            );
            deliver(
                m,
                actor.id,
                &format!("Ledger cleared, {removed} entries removed."),
            )
            .await;
            broadcast(
                m,
                &others,
                &format!("{} approved the clear. The ledger is now empty.", actor.name),
            )
            .await;
        }
        Err(err) => {
            cfg.approvals.reopen(request).await;
            fail(m, actor, "clear ledger", err).await;
        }
    }
}
