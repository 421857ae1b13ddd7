//! Handler for /start and /help

use crate::{
    access::Actor,
    messenger::{Messenger, deliver},
    ui,
};

pub(super) async fn help<M: Messenger + ?Sized>(m: &M, actor: &Actor) {
    deliver(m, actor.id, ui::help_text()).await;
}
