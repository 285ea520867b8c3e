//! Masked-content synthesis.
//!
//! The virtual document handed to the SOQL completion engine has exactly the
//! geometry of the host document: same line count, same length per line. All
//! host text is blanked out with spaces and only the embedded query is written
//! back at its original offset, so a `Position` in the host is the same
//! `Position` in the virtual document.
//!
//! Lengths and offsets are UTF-16 code units (LSP's default position
//! encoding). The masked text is pure ASCII, so a UTF-16 offset into the host
//! is also a byte offset into the mask.
//!
//! Splitting and rejoining use the document's own EOL, which keeps offsets
//! consistent. A document whose declared EOL is LF but which contains stray
//! `\r` gets those masked as spaces.

use crate::document::EndOfLine;
use crate::error::{BridgeError, BridgeResult};

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Replace every line of `host_text` with spaces of the same length.
pub fn mask_host_text(host_text: &str, eol: EndOfLine) -> String {
    let separator = eol.as_str();
    let mut masked = String::with_capacity(host_text.len());
    for (idx, line) in host_text.split(separator).enumerate() {
        if idx > 0 {
            masked.push_str(separator);
        }
        masked.extend(std::iter::repeat_n(' ', utf16_len(line)));
    }
    masked
}

/// Build the virtual SOQL document for one completion request.
///
/// `start_offset` is where the block starts in the host text. The block must
/// fit inside the document; out-of-range blocks are rejected rather than
/// stretching the document.
pub fn synthesize_virtual_content(
    host_text: &str,
    eol: EndOfLine,
    block_text: &str,
    start_offset: usize,
) -> BridgeResult<String> {
    let mut masked = mask_host_text(host_text, eol);
    let len = masked.len();
    let end = start_offset.saturating_add(utf16_len(block_text));
    if end > len {
        return Err(BridgeError::BlockOutOfBounds {
            start: start_offset,
            end,
            len,
        });
    }

    masked.replace_range(start_offset..end, block_text);
    Ok(masked)
}
