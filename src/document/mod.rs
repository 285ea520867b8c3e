//! Host documents and the masked virtual content derived from them.

mod eol;
pub mod masking;

pub use eol::EndOfLine;
pub use masking::{mask_host_text, synthesize_virtual_content, utf16_len};

use tower_lsp_server::ls_types::Uri;

/// A host-language (Apex) document as seen at completion time.
#[derive(Debug, Clone)]
pub struct HostDocument {
    pub uri: Uri,
    pub text: String,
    pub eol: EndOfLine,
}

impl HostDocument {
    pub fn new(uri: Uri, text: impl Into<String>, eol: EndOfLine) -> Self {
        Self {
            uri,
            text: text.into(),
            eol,
        }
    }

    /// Key under which this document's virtual content is stored.
    pub fn key(&self) -> &str {
        self.uri.as_str()
    }
}
