use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::{BridgeSettings, SettingsLayer};
use super::user::{CONFIG_FILE_NAME, load_user_config, user_config_path};

/// Environment variable holding a JSON settings override.
pub const SETTINGS_ENV_VAR: &str = "SOQL_BRIDGE_SETTINGS";

/// Where a configuration layer came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerOrigin {
    User,
    Project,
    /// `--settings <JSON>` on the command line
    CommandLine,
    /// [`SETTINGS_ENV_VAR`]
    Environment,
}

impl fmt::Display for LayerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LayerOrigin::User => "user config",
            LayerOrigin::Project => "project config",
            LayerOrigin::CommandLine => "--settings",
            LayerOrigin::Environment => SETTINGS_ENV_VAR,
        })
    }
}

/// JSON settings supplied directly rather than read from a file.
#[derive(Clone, Copy, Debug)]
pub struct SettingsOverride<'a> {
    pub origin: LayerOrigin,
    pub json: &'a str,
}

/// Something that happened while resolving the layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingsEvent {
    Loaded {
        origin: LayerOrigin,
        path: Option<PathBuf>,
    },
    Rejected {
        origin: LayerOrigin,
        reason: String,
    },
    /// The merged settings were invalid and defaults were used instead.
    Defaulted { reason: String },
}

impl SettingsEvent {
    pub fn is_warning(&self) -> bool {
        !matches!(self, SettingsEvent::Loaded { .. })
    }

    /// Forward the event to the `log` facade.
    pub fn log(&self) {
        if self.is_warning() {
            log::warn!(target: "soql_bridge::config", "{}", self);
        } else {
            log::info!(target: "soql_bridge::config", "{}", self);
        }
    }
}

impl fmt::Display for SettingsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsEvent::Loaded {
                origin,
                path: Some(path),
            } => write!(f, "Loaded {} from {}", origin, path.display()),
            SettingsEvent::Loaded { origin, path: None } => write!(f, "Loaded {}", origin),
            SettingsEvent::Rejected { origin, reason } => {
                write!(f, "Ignoring {}: {}", origin, reason)
            }
            SettingsEvent::Defaulted { reason } => {
                write!(f, "{}; falling back to defaults", reason)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct SettingsLoadOutcome {
    pub settings: BridgeSettings,
    pub events: Vec<SettingsEvent>,
}

/// Load settings from every layer: defaults < user < project < override.
pub fn load_settings(
    root_path: Option<&Path>,
    override_settings: Option<SettingsOverride<'_>>,
) -> SettingsLoadOutcome {
    let mut events = Vec::new();

    let user = match load_user_config() {
        Ok(Some(layer)) => {
            events.push(SettingsEvent::Loaded {
                origin: LayerOrigin::User,
                path: user_config_path(),
            });
            Some(layer)
        }
        Ok(None) => None,
        Err(err) => {
            events.push(SettingsEvent::Rejected {
                origin: LayerOrigin::User,
                reason: err.to_string(),
            });
            None
        }
    };

    resolve_layers(user, root_path, override_settings, events)
}

fn resolve_layers(
    user: Option<SettingsLayer>,
    root_path: Option<&Path>,
    override_settings: Option<SettingsOverride<'_>>,
    mut events: Vec<SettingsEvent>,
) -> SettingsLoadOutcome {
    let project = root_path.and_then(|root| read_project_layer(root, &mut events));
    let overlay = override_settings.and_then(|o| parse_override(o, &mut events));

    let merged = [user, project, overlay]
        .into_iter()
        .flatten()
        .fold(SettingsLayer::default(), SettingsLayer::merge);
    let mut settings = BridgeSettings::from(merged);

    if let Err(err) = settings.validate() {
        events.push(SettingsEvent::Defaulted {
            reason: err.to_string(),
        });
        settings = BridgeSettings::default();
    }

    SettingsLoadOutcome { settings, events }
}

fn read_project_layer(root: &Path, events: &mut Vec<SettingsEvent>) -> Option<SettingsLayer> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return None;
    }

    let parsed = fs::read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|contents| {
            toml::from_str::<SettingsLayer>(&contents).map_err(|err| err.to_string())
        });
    match parsed {
        Ok(layer) => {
            events.push(SettingsEvent::Loaded {
                origin: LayerOrigin::Project,
                path: Some(path),
            });
            Some(layer)
        }
        Err(reason) => {
            events.push(SettingsEvent::Rejected {
                origin: LayerOrigin::Project,
                reason: format!("{}: {}", path.display(), reason),
            });
            None
        }
    }
}

fn parse_override(
    settings: SettingsOverride<'_>,
    events: &mut Vec<SettingsEvent>,
) -> Option<SettingsLayer> {
    match serde_json::from_str::<SettingsLayer>(settings.json) {
        Ok(layer) => {
            events.push(SettingsEvent::Loaded {
                origin: settings.origin,
                path: None,
            });
            Some(layer)
        }
        Err(err) => {
            events.push(SettingsEvent::Rejected {
                origin: settings.origin,
                reason: err.to_string(),
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    fn write_project_config(dir: &TempDir, contents: &str) {
        fs::write(dir.path().join(CONFIG_FILE_NAME), contents)
            .expect("failed to write project config");
    }

    /// Run `f` with XDG_CONFIG_HOME pointing at a temp dir, optionally
    /// holding a user config with `user_config` as its contents.
    fn with_user_config<T>(user_config: Option<&str>, f: impl FnOnce() -> T) -> T {
        let original = env::var("XDG_CONFIG_HOME").ok();
        let config_home = TempDir::new().expect("failed to create config temp dir");
        if let Some(contents) = user_config {
            let dir = config_home.path().join("soql-bridge");
            fs::create_dir_all(&dir).expect("failed to create config dir");
            fs::write(dir.join(CONFIG_FILE_NAME), contents).expect("failed to write user config");
        }

        // SAFETY: callers are #[serial(xdg_env)], so nothing else touches XDG_CONFIG_HOME
        unsafe {
            env::set_var("XDG_CONFIG_HOME", config_home.path());
        }

        let result = f();

        // SAFETY: Same as above - restoring original env state
        unsafe {
            match original {
                Some(val) => env::set_var("XDG_CONFIG_HOME", val),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }
        result
    }

    #[test]
    fn no_layers_gives_defaults() {
        let outcome = resolve_layers(None, None, None, Vec::new());

        assert_eq!(outcome.settings, BridgeSettings::default());
        assert!(outcome.events.is_empty());
    }

    #[test]
    #[serial(xdg_env)]
    fn user_config_is_loaded_and_reported() {
        let outcome =
            with_user_config(Some("scheme = \"user-soql\""), || load_settings(None, None));

        assert_eq!(outcome.settings.scheme, "user-soql");
        assert!(matches!(
            outcome.events.as_slice(),
            [SettingsEvent::Loaded {
                origin: LayerOrigin::User,
                path: Some(_)
            }]
        ));
        assert!(outcome.events[0].to_string().starts_with("Loaded user config from "));
    }

    #[test]
    #[serial(xdg_env)]
    fn broken_user_config_is_rejected() {
        let outcome = with_user_config(Some("scheme = "), || load_settings(None, None));

        assert_eq!(outcome.settings, BridgeSettings::default());
        assert!(matches!(
            outcome.events.as_slice(),
            [SettingsEvent::Rejected {
                origin: LayerOrigin::User,
                ..
            }]
        ));
        assert!(outcome.events[0].is_warning());
    }

    #[test]
    #[serial(xdg_env)]
    fn command_line_override_wins_over_every_file() {
        let project = TempDir::new().expect("failed to create project temp dir");
        write_project_config(
            &project,
            r#"
            scheme = "project-soql"
            extension = "psoql"
            "#,
        );

        let outcome = with_user_config(Some("authority = \"user\"\nscheme = \"user-soql\""), || {
            load_settings(
                Some(project.path()),
                Some(SettingsOverride {
                    origin: LayerOrigin::CommandLine,
                    json: r#"{ "extension": "isoql" }"#,
                }),
            )
        });

        assert_eq!(outcome.settings.scheme, "project-soql");
        assert_eq!(outcome.settings.authority, "user");
        assert_eq!(outcome.settings.extension, "isoql");
        assert_eq!(outcome.settings.sentinel_label, "_SOQL_");
        let origins: Vec<LayerOrigin> = outcome
            .events
            .iter()
            .filter_map(|e| match e {
                SettingsEvent::Loaded { origin, .. } => Some(*origin),
                _ => None,
            })
            .collect();
        assert_eq!(
            origins,
            vec![LayerOrigin::User, LayerOrigin::Project, LayerOrigin::CommandLine]
        );
    }

    #[test]
    fn broken_project_config_is_reported_and_skipped() {
        let project = TempDir::new().expect("failed to create project temp dir");
        write_project_config(&project, "scheme = ");

        let outcome = resolve_layers(None, Some(project.path()), None, Vec::new());

        assert_eq!(outcome.settings, BridgeSettings::default());
        assert!(matches!(
            outcome.events.as_slice(),
            [SettingsEvent::Rejected {
                origin: LayerOrigin::Project,
                ..
            }]
        ));
    }

    #[test]
    fn malformed_override_is_reported() {
        let outcome = resolve_layers(
            None,
            None,
            Some(SettingsOverride {
                origin: LayerOrigin::Environment,
                json: r#"{ "scheme": 7 }"#,
            }),
            Vec::new(),
        );

        assert_eq!(outcome.settings, BridgeSettings::default());
        assert_eq!(outcome.events.len(), 1);
        assert!(
            outcome.events[0]
                .to_string()
                .starts_with("Ignoring SOQL_BRIDGE_SETTINGS: ")
        );
    }

    #[test]
    fn invalid_merged_settings_fall_back_to_defaults() {
        let outcome = resolve_layers(
            None,
            None,
            Some(SettingsOverride {
                origin: LayerOrigin::CommandLine,
                json: r#"{ "scheme": "not a scheme" }"#,
            }),
            Vec::new(),
        );

        assert_eq!(outcome.settings, BridgeSettings::default());
        assert!(matches!(
            outcome.events.last(),
            Some(SettingsEvent::Defaulted { .. })
        ));
    }
}
