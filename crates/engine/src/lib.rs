//! Ledger core: amounts, entries, sessions and their store.
//!
//! The [`Engine`] owns the database connection; every read goes back to the
//! store so nothing survives a restart except what is persisted.

pub use commit::entries_for;
pub use entry::Entry;
pub use error::EngineError;
pub use money::Amount;
pub use ops::{Engine, EngineBuilder, EntryFilter};
pub use participants::Participants;
pub use session::{EntryMode, SessionState};

mod commit;
mod entry;
mod error;
mod money;
mod ops;
mod participants;
pub mod report;
mod session;

type ResultEngine<T> = Result<T, EngineError>;
