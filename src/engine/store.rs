//! Published index snapshots
//!
//! The coordinator owns the only [`IndexStore`]. Readers hold cheap
//! [`IndexReader`] handles and always observe a complete snapshot, old or
//! new, never a partially rebuilt one.

use std::sync::Arc;
use tokio::sync::watch;

use crate::anchors::index::AnchorIndex;
use crate::anchors::resolve::LinkResolver;

#[derive(Debug)]
pub struct IndexStore {
    tx: watch::Sender<Arc<AnchorIndex>>,
}

impl IndexStore {
    /// Store holding an empty index
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(AnchorIndex::new()));
        Self { tx }
    }

    /// Swap in a finished index
    pub fn publish(&self, index: AnchorIndex) {
        self.tx.send_replace(Arc::new(index));
    }

    pub fn snapshot(&self) -> Arc<AnchorIndex> {
        self.tx.borrow().clone()
    }

    pub fn reader(&self) -> IndexReader {
        IndexReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read handle on the latest published index
#[derive(Debug, Clone)]
pub struct IndexReader {
    rx: watch::Receiver<Arc<AnchorIndex>>,
}

impl IndexReader {
    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<AnchorIndex> {
        self.rx.borrow().clone()
    }

    /// Fresh resolver over the latest snapshot
    pub fn resolver(&self) -> LinkResolver {
        LinkResolver::new(self.snapshot())
    }

    /// Wait for the next publication. Returns false once the store is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
