use std::collections::BTreeMap;

use metaedit_core::{ItemDocument, ItemId};

use crate::error::HarnessError;

/// In-memory stand-in for the remote media catalog.
#[derive(Debug, Default)]
pub struct TestCatalog {
    items: BTreeMap<ItemId, ItemDocument>,
    save_count: usize,
}

impl TestCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document: ItemDocument) -> ItemId {
        let item_id = ItemId::new();
        self.items.insert(item_id, document);
        item_id
    }

    pub fn fetch(&self, item_id: ItemId) -> Result<ItemDocument, HarnessError> {
        self.items
            .get(&item_id)
            .cloned()
            .ok_or(HarnessError::ItemNotFound(item_id))
    }

    pub fn store(&mut self, item_id: ItemId, document: ItemDocument) -> Result<(), HarnessError> {
        let slot = self
            .items
            .get_mut(&item_id)
            .ok_or(HarnessError::ItemNotFound(item_id))?;
        *slot = document;
        self.save_count += 1;
        Ok(())
    }

    pub fn save_count(&self) -> usize {
        self.save_count
    }
}
