// Option registry: which search produced each option code handed to a caller

use crate::models::{SearchResult, TravelOption};
use dashmap::DashMap;
use std::sync::Arc;

// Entries are never evicted; they live as long as the process.
#[derive(Debug, Default)]
pub struct OptionRegistry {
    by_option_code: DashMap<String, Arc<SearchResult>>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every option of `result` by its option code. A code that is
    /// already present is overwritten (last write wins).
    pub fn record(&self, result: Arc<SearchResult>) {
        for option in &result.options {
            if let Some(previous) = self
                .by_option_code
                .insert(option.option_code.clone(), Arc::clone(&result))
            {
                if !Arc::ptr_eq(&previous, &result) {
                    tracing::warn!(
                        option_code = %option.option_code,
                        "option code collision, replacing earlier search"
                    );
                }
            }
        }
        tracing::debug!(options = result.len(), total = self.len(), "recorded search result");
    }

    pub fn lookup(&self, option_code: &str) -> Option<Arc<SearchResult>> {
        self.by_option_code
            .get(option_code)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// The exact option registered under `option_code`.
    pub fn find_option(&self, option_code: &str) -> Option<TravelOption> {
        self.lookup(option_code)
            .and_then(|result| result.find(option_code).cloned())
    }

    pub fn contains(&self, option_code: &str) -> bool {
        self.by_option_code.contains_key(option_code)
    }

    pub fn len(&self) -> usize {
        self.by_option_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_option_code.is_empty()
    }
}
