use serde::{Deserialize, Serialize};

use crate::bridge::SOQL_SENTINEL_LABEL;
use crate::error::{BridgeError, BridgeResult};

pub const DEFAULT_SCHEME: &str = "embedded-soql";
pub const DEFAULT_AUTHORITY: &str = "soql";
pub const DEFAULT_EXTENSION: &str = "soql";

/// One configuration layer as written by the user. Unset fields fall
/// through to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsLayer {
    pub sentinel_label: Option<String>,
    pub scheme: Option<String>,
    pub authority: Option<String>,
    pub extension: Option<String>,
}

impl SettingsLayer {
    /// Overlay `primary` on top of `self`.
    pub fn merge(self, primary: SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            sentinel_label: primary.sentinel_label.or(self.sentinel_label),
            scheme: primary.scheme.or(self.scheme),
            authority: primary.authority.or(self.authority),
            extension: primary.extension.or(self.extension),
        }
    }
}

/// Resolved settings for the SOQL bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Label of the completion item that marks an embedded SOQL block
    pub sentinel_label: String,
    /// URI scheme of virtual SOQL documents
    pub scheme: String,
    pub authority: String,
    /// File extension (without dot) appended to virtual document paths
    pub extension: String,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            sentinel_label: SOQL_SENTINEL_LABEL.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl From<SettingsLayer> for BridgeSettings {
    fn from(layer: SettingsLayer) -> Self {
        let defaults = BridgeSettings::default();
        Self {
            sentinel_label: layer.sentinel_label.unwrap_or(defaults.sentinel_label),
            scheme: layer.scheme.unwrap_or(defaults.scheme),
            authority: layer.authority.unwrap_or(defaults.authority),
            extension: layer.extension.unwrap_or(defaults.extension),
        }
    }
}

impl BridgeSettings {
    pub fn validate(&self) -> BridgeResult<()> {
        if self.sentinel_label.is_empty() {
            return Err(BridgeError::config("sentinelLabel must not be empty"));
        }
        if !is_valid_scheme(&self.scheme) {
            return Err(BridgeError::config(format!(
                "scheme {:?} is not a valid URI scheme",
                self.scheme
            )));
        }
        if self.authority.is_empty() || !self.authority.chars().all(is_plain_char) {
            return Err(BridgeError::config(format!(
                "authority {:?} must be non-empty and alphanumeric",
                self.authority
            )));
        }
        if self.extension.is_empty() || !self.extension.chars().all(is_plain_char) {
            return Err(BridgeError::config(format!(
                "extension {:?} must be non-empty and alphanumeric",
                self.extension
            )));
        }
        Ok(())
    }
}

// RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn is_plain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_primary_fields() {
        let fallback = SettingsLayer {
            scheme: Some("lower".to_string()),
            extension: Some("q".to_string()),
            ..Default::default()
        };
        let primary = SettingsLayer {
            scheme: Some("upper".to_string()),
            ..Default::default()
        };

        let merged = fallback.merge(primary);

        assert_eq!(merged.scheme.as_deref(), Some("upper"));
        assert_eq!(merged.extension.as_deref(), Some("q"));
        assert_eq!(merged.sentinel_label, None);
    }

    #[test]
    fn empty_layer_resolves_to_defaults() {
        let settings = BridgeSettings::from(SettingsLayer::default());
        assert_eq!(settings, BridgeSettings::default());
        assert_eq!(settings.sentinel_label, "_SOQL_");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn parses_camel_case_toml() {
        let layer: SettingsLayer = toml::from_str(
            r#"
            sentinelLabel = "__SOQL__"
            scheme = "soql-vdoc"
            "#,
        )
        .unwrap();

        assert_eq!(layer.sentinel_label.as_deref(), Some("__SOQL__"));
        assert_eq!(layer.scheme.as_deref(), Some("soql-vdoc"));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(toml::from_str::<SettingsLayer>("schema = \"x\"").is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad_scheme = BridgeSettings {
            scheme: "1soql".to_string(),
            ..Default::default()
        };
        let bad_extension = BridgeSettings {
            extension: "so/ql".to_string(),
            ..Default::default()
        };
        let empty_label = BridgeSettings {
            sentinel_label: String::new(),
            ..Default::default()
        };

        assert!(matches!(bad_scheme.validate(), Err(BridgeError::Config { .. })));
        assert!(bad_extension.validate().is_err());
        assert!(empty_label.validate().is_err());
    }
}
