use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{Entry, EngineError, Participants, ResultEngine, entry, report::Balances};

use super::{Engine, with_tx};

/// Selects entries. The default filter matches the whole ledger.
#[derive(Clone, Debug, Default)]
pub struct EntryFilter {
    /// Only entries attributed to this participant.
    pub name: Option<String>,
    /// At most this many entries (newest first).
    pub limit: Option<u64>,
}

impl EntryFilter {
    pub fn participant(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            limit: None,
        }
    }

    pub fn latest(limit: u64) -> Self {
        Self {
            name: None,
            limit: Some(limit),
        }
    }
}

impl Engine {
    pub async fn insert_entry(&self, entry: &Entry) -> ResultEngine<()> {
        entry::ActiveModel::from(entry).insert(&self.database).await?;
        Ok(())
    }

    /// Inserts all entries or none of them.
    pub async fn insert_entries(&self, entries: &[Entry]) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let mut result: ResultEngine<()> = Ok(());
            for e in entries {
                if let Err(err) = entry::ActiveModel::from(e).insert(&db_tx).await {
                    result = Err(err.into());
                    break;
                }
            }
            result
        })
    }

    pub async fn entry(&self, id: &str) -> ResultEngine<Entry> {
        entry::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .map(Entry::from)
            .ok_or_else(|| EngineError::KeyNotFound(format!("entry {id}")))
    }

    /// Entries matching `filter`, newest first.
    pub async fn entries(&self, filter: &EntryFilter) -> ResultEngine<Vec<Entry>> {
        let mut query = entry::Entity::find();
        if let Some(name) = &filter.name {
            query = query.filter(entry::Column::Name.eq(name.clone()));
        }
        query = query
            .order_by_desc(entry::Column::Time)
            .order_by_desc(entry::Column::Id);
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let models = query.all(&self.database).await?;
        Ok(models.into_iter().map(Entry::from).collect())
    }

    pub async fn delete_entry(&self, id: &str) -> ResultEngine<()> {
        let res = entry::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if res.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(format!("entry {id}")));
        }
        Ok(())
    }

    /// Deletes the entries matching `filter` and returns how many were removed.
    ///
    /// `limit` is not applied to deletions.
    pub async fn delete_entries(&self, filter: &EntryFilter) -> ResultEngine<u64> {
        let mut query = entry::Entity::delete_many();
        if let Some(name) = &filter.name {
            query = query.filter(entry::Column::Name.eq(name.clone()));
        }
        let res = query.exec(&self.database).await?;
        Ok(res.rows_affected)
    }

    /// Clears the ledger. Clearing an empty ledger removes nothing and succeeds.
    pub async fn delete_all(&self) -> ResultEngine<u64> {
        let removed = self.delete_entries(&EntryFilter::default()).await?;
        tracing::info!("ledger cleared, {removed} entries removed");
        Ok(removed)
    }

    pub async fn balances(&self, participants: &Participants) -> ResultEngine<Balances> {
        let entries = self.entries(&EntryFilter::default()).await?;
        Ok(Balances::compute(&entries, participants))
    }
}
