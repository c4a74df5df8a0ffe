use std::collections::HashSet;

/// Set of message ids already folded into the ledger
#[derive(Debug, Default, Clone)]
pub struct DedupGuard {
    processed: HashSet<String>,
}

impl DedupGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_processed(ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            processed: ids.into_iter().collect(),
        }
    }

    pub fn already_processed(&self, message_id: &str) -> bool {
        self.processed.contains(message_id)
    }

    /// Returns false if the id was already marked
    pub fn mark_processed(&mut self, message_id: &str) -> bool {
        self.processed.insert(message_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.processed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }

    pub fn clear(&mut self) {
        self.processed.clear();
    }
}
