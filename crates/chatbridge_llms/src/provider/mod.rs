//! Provider trait and registry

mod trait_def;

pub use trait_def::Provider;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Providers keyed by their own [`Provider::provider_id`].
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    by_id: BTreeMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider. A provider with the same id is replaced.
    pub fn register(mut self, provider: impl Provider + 'static) -> Self {
        self.insert(Arc::new(provider));
        self
    }

    /// Add an already shared provider, returning the one it replaced.
    pub fn insert(&mut self, provider: Arc<dyn Provider>) -> Option<Arc<dyn Provider>> {
        let id = provider.provider_id().to_string();
        tracing::debug!(provider = %id, "registering provider");
        self.by_id.insert(id, provider)
    }

    pub fn get_provider(&self, id: &str) -> Result<Arc<dyn Provider>> {
        self.by_id
            .get(id)
            .map(Arc::clone)
            .ok_or_else(|| Error::ProviderNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.by_id.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.by_id.keys()).finish()
    }
}
