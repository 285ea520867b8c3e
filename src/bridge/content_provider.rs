//! Scheme-keyed content providers.
//!
//! The editor side of the bridge: when something opens a URI whose scheme it
//! does not own, it asks the provider registered for that scheme to produce
//! the text. Resolution is a synchronous pull and happens whenever the
//! consumer asks, not when the content was last written.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tower_lsp_server::ls_types::Uri;

use crate::error::{BridgeError, BridgeResult};

/// Resolves the text of documents under one URI scheme.
pub trait TextDocumentContentProvider: Send + Sync {
    /// `None` means the document is unknown; callers treat it as empty.
    fn provide_text_document_content(&self, uri: &Uri) -> Option<String>;
}

/// Registry of content providers, one per scheme.
#[derive(Default)]
pub struct ContentProviders {
    providers: DashMap<String, Arc<dyn TextDocumentContentProvider>>,
}

impl std::fmt::Debug for ContentProviders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let schemes: Vec<String> = self.providers.iter().map(|e| e.key().clone()).collect();
        f.debug_struct("ContentProviders")
            .field("schemes", &schemes)
            .finish()
    }
}

impl ContentProviders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` for `scheme`. Each scheme can be claimed once.
    pub fn register(
        &self,
        scheme: &str,
        provider: Arc<dyn TextDocumentContentProvider>,
    ) -> BridgeResult<()> {
        match self.providers.entry(scheme.to_ascii_lowercase()) {
            Entry::Occupied(_) => Err(BridgeError::scheme_already_registered(scheme)),
            Entry::Vacant(slot) => {
                slot.insert(provider);
                log::debug!(
                    target: "soql_bridge::content_provider",
                    "Registered content provider for scheme {}",
                    scheme
                );
                Ok(())
            }
        }
    }

    pub fn unregister(&self, scheme: &str) -> bool {
        self.providers.remove(&scheme.to_ascii_lowercase()).is_some()
    }

    pub fn is_registered(&self, scheme: &str) -> bool {
        self.providers.contains_key(&scheme.to_ascii_lowercase())
    }

    /// Resolve `uri` through the provider of its scheme.
    pub fn provide(&self, uri: &Uri) -> Option<String> {
        let (scheme, _) = uri.as_str().split_once(':')?;
        // Clone the provider out so no shard lock is held while it runs
        let provider = self
            .providers
            .get(&scheme.to_ascii_lowercase())
            .map(|entry| Arc::clone(entry.value()))?;
        provider.provide_text_document_content(uri)
    }
}
