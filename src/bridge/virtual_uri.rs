//! Virtual document URI for embedded SOQL blocks.
//!
//! The host document URI is carried inside the virtual URI as a single
//! percent-encoded path segment:
//!
//! - Format: `{scheme}://{authority}/{encoded_host}.{extension}`
//! - Example: `embedded-soql://soql/file%3A%2F%2F%2Fproject%2FFoo.cls.soql`
//!
//! The extension lets the SOQL language server recognize the document type.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::config::BridgeSettings;
use crate::error::{BridgeError, BridgeResult};

/// Characters escaped when embedding the host URI.
///
/// Same set as ECMAScript's `encodeURIComponent`: everything except
/// alphanumerics and `- _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encodes host URIs into virtual SOQL URIs and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualUriCodec {
    scheme: String,
    authority: String,
    extension: String,
}

impl Default for VirtualUriCodec {
    fn default() -> Self {
        Self::from_settings(&BridgeSettings::default())
    }
}

impl VirtualUriCodec {
    pub fn from_settings(settings: &BridgeSettings) -> Self {
        Self {
            scheme: settings.scheme.clone(),
            authority: settings.authority.clone(),
            extension: settings.extension.clone(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Virtual URI string for the given host document URI.
    pub fn encode(&self, host_uri: &str) -> String {
        let encoded_host = utf8_percent_encode(host_uri, COMPONENT);
        format!(
            "{}://{}/{encoded_host}.{}",
            self.scheme, self.authority, self.extension
        )
    }

    /// Recover the host document URI from a virtual URI string.
    ///
    /// The extension suffix is stripped when present, so a bare encoded path
    /// also decodes.
    pub fn decode(&self, uri: &str) -> BridgeResult<String> {
        let url = url::Url::parse(uri).map_err(|_| BridgeError::invalid_virtual_uri(uri))?;
        if !url.scheme().eq_ignore_ascii_case(&self.scheme) {
            return Err(BridgeError::invalid_virtual_uri(uri));
        }

        let path = url.path();
        let path = path.strip_prefix('/').unwrap_or(path);
        let suffix = format!(".{}", self.extension);
        let encoded_host = path.strip_suffix(suffix.as_str()).unwrap_or(path);

        percent_decode_str(encoded_host)
            .decode_utf8()
            .map(|host| host.into_owned())
            .map_err(|_| BridgeError::invalid_virtual_uri(uri))
    }

    /// Whether `uri` belongs to this codec's scheme.
    pub fn is_virtual_uri(&self, uri: &str) -> bool {
        uri.split_once(':')
            .is_some_and(|(scheme, _)| scheme.eq_ignore_ascii_case(&self.scheme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn encode_matches_documented_format() {
        let codec = VirtualUriCodec::default();

        assert_eq!(
            codec.encode("file:///project/classes/Foo.cls"),
            "embedded-soql://soql/file%3A%2F%2F%2Fproject%2Fclasses%2FFoo.cls.soql"
        );
    }

    #[test]
    fn encode_leaves_component_safe_punctuation() {
        let codec = VirtualUriCodec::default();

        assert_eq!(
            codec.encode("a-b_c.d!e~f*g'h(i)j k"),
            "embedded-soql://soql/a-b_c.d!e~f*g'h(i)j%20k.soql"
        );
    }

    #[rstest]
    #[case("file:///project/classes/Foo.cls")]
    #[case("file:///c%3A/Users/dev/My%20Project/Foo.cls")]
    #[case("untitled:Untitled-1")]
    #[case("file:///home/dev/Überklasse.cls")]
    #[case("vscode-notebook-cell://authority/path/nb.ipynb#cell-id")]
    fn decode_recovers_host_uri(#[case] host: &str) {
        let codec = VirtualUriCodec::default();

        assert_eq!(codec.decode(&codec.encode(host)).unwrap(), host);
    }

    #[test]
    fn decode_tolerates_missing_extension() {
        let codec = VirtualUriCodec::default();

        assert_eq!(
            codec.decode("embedded-soql://soql/untitled%3AUntitled-1").unwrap(),
            "untitled:Untitled-1"
        );
    }

    #[test]
    fn decode_rejects_foreign_scheme() {
        let codec = VirtualUriCodec::default();

        let err = codec.decode("file:///project/Foo.cls.soql").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidVirtualUri { .. }));
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        let codec = VirtualUriCodec::default();

        assert!(codec.decode("embedded-soql://soql/%FF%FE.soql").is_err());
    }

    #[test]
    fn custom_settings_change_every_part() {
        let settings = BridgeSettings {
            scheme: "vsoql".to_string(),
            authority: "query".to_string(),
            extension: "q".to_string(),
            ..BridgeSettings::default()
        };
        let codec = VirtualUriCodec::from_settings(&settings);

        let uri = codec.encode("file:///a.cls");
        assert_eq!(uri, "vsoql://query/file%3A%2F%2F%2Fa.cls.q");
        assert_eq!(codec.decode(&uri).unwrap(), "file:///a.cls");
        assert!(codec.is_virtual_uri(&uri));
        assert!(!codec.is_virtual_uri("embedded-soql://soql/x.soql"));
    }
}
