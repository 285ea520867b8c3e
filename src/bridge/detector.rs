//! Embedded-block detection.
//!
//! The Apex language server signals "cursor is inside a SOQL block" out of
//! band: among its completion items it returns one whose label is a reserved
//! sentinel, with the query text in `detail` and the block location in `data`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tower_lsp_server::ls_types::{CompletionItem, Position};

use crate::document::HostDocument;

/// Label of the sentinel completion item.
pub const SOQL_SENTINEL_LABEL: &str = "_SOQL_";

/// Where an embedded block sits in its host document.
///
/// `start_index` is a UTF-16 offset into the host text. Any other fields the
/// host engine attaches are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLocation {
    pub start_index: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockLocation {
    pub fn new(start_index: usize) -> Self {
        Self {
            start_index,
            extra: Map::new(),
        }
    }
}

/// An embedded SOQL block reported by the host engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoqlBlock {
    pub query_text: String,
    pub location: BlockLocation,
}

/// Find the sentinel item and extract the block it describes.
///
/// First match wins. A sentinel without query text or with an unreadable
/// location is logged and treated as absent.
pub fn detect_soql_block(items: &[CompletionItem], sentinel_label: &str) -> Option<SoqlBlock> {
    let sentinel = items.iter().find(|item| item.label == sentinel_label)?;

    let Some(query_text) = sentinel.detail.clone() else {
        log::warn!(
            target: "soql_bridge::detector",
            "Sentinel completion item has no query text"
        );
        return None;
    };

    let location = match sentinel
        .data
        .clone()
        .map(serde_json::from_value::<BlockLocation>)
    {
        Some(Ok(location)) => location,
        Some(Err(err)) => {
            log::warn!(
                target: "soql_bridge::detector",
                "Sentinel completion item has unreadable location: {}",
                err
            );
            return None;
        }
        None => {
            log::warn!(
                target: "soql_bridge::detector",
                "Sentinel completion item has no location"
            );
            return None;
        }
    };

    Some(SoqlBlock {
        query_text,
        location,
    })
}

/// Decides whether the cursor sits in an Apex bind expression (`:expr`)
/// inside the SOQL block. Such positions stay with the Apex engine.
pub trait BindingExpressionDetector: Send + Sync {
    fn is_inside_binding_expression(
        &self,
        document: &HostDocument,
        query_text: &str,
        position: Position,
    ) -> bool;
}

/// Reports every position as outside a bind expression.
///
/// Bind expressions the Apex engine does not already cover (for example
/// `:(xyz.toUpperCase() + 'xyz')`) are not detected. A real detector would
/// find the `:` delimiters in the query text and test the cursor against them
/// in the block's local coordinates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBindingDetection;

impl BindingExpressionDetector for NoBindingDetection {
    fn is_inside_binding_expression(
        &self,
        _document: &HostDocument,
        _query_text: &str,
        _position: Position,
    ) -> bool {
        false
    }
}
