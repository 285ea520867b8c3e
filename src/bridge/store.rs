//! Virtual document store.
//!
//! One entry per host document URI holding the most recent synthesized SOQL
//! content. Each redirect overwrites the entry for its host; overlapping
//! requests for the same host are last-write-wins, and the content provider
//! serves whatever is current when the editor pulls it.

use std::sync::Arc;

use dashmap::DashMap;
use tower_lsp_server::ls_types::Uri;

use super::content_provider::TextDocumentContentProvider;
use super::virtual_uri::VirtualUriCodec;

#[derive(Debug, Default)]
pub struct VirtualDocumentStore {
    documents: DashMap<String, String>,
}

impl VirtualDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `content` for `host_uri`, returning the content it replaced.
    pub fn insert(&self, host_uri: impl Into<String>, content: String) -> Option<String> {
        self.documents.insert(host_uri.into(), content)
    }

    pub fn get(&self, host_uri: &str) -> Option<String> {
        self.documents.get(host_uri).map(|doc| doc.value().clone())
    }

    /// Drop the entry for a closed host document.
    pub fn remove(&self, host_uri: &str) -> Option<String> {
        self.documents.remove(host_uri).map(|(_, content)| content)
    }

    pub fn clear(&self) {
        self.documents.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Serves store entries for virtual SOQL URIs.
#[derive(Debug, Clone)]
pub struct VirtualDocumentProvider {
    store: Arc<VirtualDocumentStore>,
    codec: VirtualUriCodec,
}

impl VirtualDocumentProvider {
    pub fn new(store: Arc<VirtualDocumentStore>, codec: VirtualUriCodec) -> Self {
        Self { store, codec }
    }
}

impl TextDocumentContentProvider for VirtualDocumentProvider {
    fn provide_text_document_content(&self, uri: &Uri) -> Option<String> {
        if !self.codec.is_virtual_uri(uri.as_str()) {
            log::debug!(
                target: "soql_bridge::store",
                "Not a virtual SOQL document: {}",
                uri.as_str()
            );
            return None;
        }
        match self.codec.decode(uri.as_str()) {
            Ok(host_uri) => self.store.get(&host_uri),
            Err(err) => {
                log::debug!(
                    target: "soql_bridge::store",
                    "Cannot resolve virtual document: {}",
                    err
                );
                None
            }
        }
    }
}
