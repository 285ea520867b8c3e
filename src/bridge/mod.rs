//! Redirection of completion requests from Apex into embedded SOQL.
//!
//! The pieces, leaves first:
//! - [`virtual_uri`]: host URI <-> virtual SOQL URI
//! - [`store`]: latest virtual content per host document, and its content provider
//! - [`content_provider`]: scheme-keyed resolution of virtual documents
//! - [`detector`]: sentinel lookup and the bind-expression extension point
//! - [`middleware`]: the completion interceptor tying them together

pub mod content_provider;
pub mod detector;
pub mod middleware;
pub mod store;
pub mod virtual_uri;

pub use content_provider::{ContentProviders, TextDocumentContentProvider};
pub use detector::{
    BindingExpressionDetector, BlockLocation, NoBindingDetection, SOQL_SENTINEL_LABEL, SoqlBlock,
    detect_soql_block,
};
pub use middleware::{
    CompletionCommandExecutor, HostCompletionProvider, SoqlCompletionMiddleware, completion_items,
};
pub use store::{VirtualDocumentProvider, VirtualDocumentStore};
pub use virtual_uri::VirtualUriCodec;
