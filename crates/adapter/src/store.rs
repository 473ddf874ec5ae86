//! Replaying grid changes against storage

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::core::{ChangeKind, GridChange};
use crate::document::{GridDocument, StoredItem};

/// Storage that holds one diagram's items
pub trait GridStore {
    fn remove(&mut self, item: &StoredItem) -> Result<()>;
    fn insert(&mut self, item: StoredItem) -> Result<()>;
}

/// Apply every removal, then every insertion.
pub fn apply_changes<S: GridStore + ?Sized>(store: &mut S, changes: &[GridChange]) -> Result<()> {
    for change in changes.iter().filter(|c| c.kind == ChangeKind::Remove) {
        store.remove(&StoredItem::from_item(&change.item))?;
    }
    for change in changes.iter().filter(|c| c.kind == ChangeKind::Insert) {
        store.insert(StoredItem::from_item(&change.item))?;
    }
    debug!(changes = changes.len(), "applied changes to store");
    Ok(())
}

impl GridStore for GridDocument {
    fn remove(&mut self, item: &StoredItem) -> Result<()> {
        let idx = self
            .items
            .iter()
            .position(|stored| stored.range == item.range && stored.game_id == item.game_id)
            .ok_or_else(|| {
                anyhow!("no stored item at {:?} for game {:?}", item.range, item.game_id)
            })?;
        self.items.remove(idx);
        Ok(())
    }

    fn insert(&mut self, item: StoredItem) -> Result<()> {
        if let Some(id) = item.game_id {
            if self.items.iter().any(|stored| stored.game_id == Some(id)) {
                return Err(anyhow!("game {id} is already stored"));
            }
        }
        self.items.push(item);
        Ok(())
    }
}
