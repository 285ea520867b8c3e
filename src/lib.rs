//! Completion bridge from Apex into embedded SOQL.
//!
//! Apex completion requests whose cursor lies inside an inline SOQL query are
//! redirected to a SOQL completion engine through a virtual document that
//! keeps the host document's line geometry.

pub mod bridge;
pub mod config;
pub mod document;
pub mod error;

pub use bridge::{
    CompletionCommandExecutor, ContentProviders, HostCompletionProvider, SoqlCompletionMiddleware,
    TextDocumentContentProvider, VirtualDocumentStore, VirtualUriCodec,
};
pub use config::{BridgeSettings, load_settings};
pub use document::{EndOfLine, HostDocument, synthesize_virtual_content};
pub use error::{BridgeError, BridgeResult};
