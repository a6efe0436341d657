//! The configuration model and per-light state values.
//!
//! `ConfigAggregate` mirrors the persistent store file field-for-field. It is
//! immutable once published: a mutation produces a new aggregate that is
//! swapped in wholesale, never an edit in place.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::ids::LightId;

/// Maximum number of lights on the panel (four pages of four tiles).
pub const MAX_LIGHTS: usize = 16;

/// Maximum tile label length, in characters.
pub const MAX_DISPLAY_NAME_CHARS: usize = 31;

/// Icon used when a light entry does not name one.
pub const DEFAULT_ICON: &str = "bulb";

/// Static description of one light tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightSpec {
    /// Remote entity id, e.g. `light.kitchen`.
    #[serde(rename = "entity_id")]
    pub id: LightId,
    /// Name shown on the tile.
    #[serde(rename = "label")]
    pub display_name: String,
    /// Short glyph or icon name shown above the label.
    #[serde(rename = "icon", default = "default_icon")]
    pub icon_glyph: String,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl LightSpec {
    /// Create a light spec.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        icon_glyph: impl Into<String>,
    ) -> Self {
        Self {
            id: LightId::new(id),
            display_name: display_name.into(),
            icon_glyph: icon_glyph.into(),
        }
    }
}

/// On/off state of a light as far as the panel knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightState {
    /// Never observed, or the backend could not report it.
    #[default]
    Unknown,
    /// The light is off.
    Off,
    /// The light is on.
    On,
}

impl LightState {
    /// Map a backend `state` string. Anything but `on`/`off` is `Unknown`.
    #[must_use]
    pub fn from_remote(state: &str) -> Self {
        match state {
            "on" => Self::On,
            "off" => Self::Off,
            _ => Self::Unknown,
        }
    }

    /// The state a tap moves to. An unknown light is always switched on.
    #[must_use]
    pub const fn after_tap(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off | Self::Unknown => Self::On,
        }
    }

    /// Lowercase name as used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Off => "off",
            Self::On => "on",
        }
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings for the remote light backend.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    /// Base URL, e.g. `http://192.168.1.100:8123`.
    pub endpoint: String,
    /// Bearer credential.
    pub credential: String,
}

impl RemoteSettings {
    /// Whether both endpoint and credential are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty() && !self.credential.is_empty()
    }
}

impl fmt::Debug for RemoteSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSettings")
            .field("endpoint", &self.endpoint)
            .field("credential", &redacted(&self.credential))
            .finish()
    }
}

/// The complete device configuration, replaced atomically.
///
/// Every field except `lights` may be empty: a device with no backend and no
/// lights still starts and shows a "needs setup" hint.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigAggregate {
    /// Remote backend base URL.
    #[serde(rename = "ha_url", default)]
    pub remote_endpoint: String,
    /// Remote backend bearer credential.
    #[serde(rename = "ha_token", default)]
    pub remote_credential: String,
    /// Hash of the web operator password.
    #[serde(rename = "web_password_hash", default)]
    pub web_credential_hash: String,
    /// Ordered list of light tiles.
    #[serde(default)]
    pub lights: Vec<LightSpec>,
}

impl ConfigAggregate {
    /// Check every invariant an accepted aggregate must hold.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant, checking the light count before
    /// individual lights in list order.
    pub fn validate(&self) -> Result<()> {
        if self.lights.len() > MAX_LIGHTS {
            return Err(ValidationError::TooManyLights {
                count: self.lights.len(),
                max: MAX_LIGHTS,
            });
        }

        for (index, light) in self.lights.iter().enumerate() {
            if !light.id.is_well_formed() {
                return Err(ValidationError::InvalidLightId {
                    index,
                    id: light.id.to_string(),
                });
            }

            let len = light.display_name.chars().count();
            if len == 0 {
                return Err(ValidationError::EmptyDisplayName { index });
            }
            if len > MAX_DISPLAY_NAME_CHARS {
                return Err(ValidationError::DisplayNameTooLong {
                    index,
                    len,
                    max: MAX_DISPLAY_NAME_CHARS,
                });
            }
        }

        Ok(())
    }

    /// The remote backend connection settings.
    #[must_use]
    pub fn remote(&self) -> RemoteSettings {
        RemoteSettings {
            endpoint: self.remote_endpoint.clone(),
            credential: self.remote_credential.clone(),
        }
    }

    /// Whether the operator still has to configure the remote backend.
    #[must_use]
    pub fn needs_setup(&self) -> bool {
        !self.remote().is_configured()
    }
}

impl fmt::Debug for ConfigAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigAggregate")
            .field("remote_endpoint", &self.remote_endpoint)
            .field("remote_credential", &redacted(&self.remote_credential))
            .field("web_credential_hash", &redacted(&self.web_credential_hash))
            .field("lights", &self.lights)
            .finish()
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate_with(lights: Vec<LightSpec>) -> ConfigAggregate {
        ConfigAggregate {
            remote_endpoint: "http://ha.local:8123".into(),
            remote_credential: "secret".into(),
            web_credential_hash: String::new(),
            lights,
        }
    }

    #[test]
    fn tap_transitions() {
        assert_eq!(LightState::On.after_tap(), LightState::Off);
        assert_eq!(LightState::Off.after_tap(), LightState::On);
        assert_eq!(LightState::Unknown.after_tap(), LightState::On);
    }

    #[test]
    fn remote_state_mapping() {
        assert_eq!(LightState::from_remote("on"), LightState::On);
        assert_eq!(LightState::from_remote("off"), LightState::Off);
        assert_eq!(LightState::from_remote("unavailable"), LightState::Unknown);
        assert_eq!(LightState::from_remote("ON"), LightState::Unknown);
    }

    #[test]
    fn empty_aggregate_is_valid_and_needs_setup() {
        let aggregate = ConfigAggregate::default();
        assert!(aggregate.validate().is_ok());
        assert!(aggregate.needs_setup());
    }

    #[test]
    fn sixteen_lights_accepted_seventeen_rejected() {
        let lights: Vec<_> = (0..16)
            .map(|i| LightSpec::new(format!("light.l{i}"), format!("L{i}"), "bulb"))
            .collect();
        assert!(aggregate_with(lights.clone()).validate().is_ok());

        let mut too_many = lights;
        too_many.push(LightSpec::new("light.extra", "Extra", "bulb"));
        assert_eq!(
            aggregate_with(too_many).validate(),
            Err(ValidationError::TooManyLights { count: 17, max: 16 })
        );
    }

    #[test]
    fn invalid_id_reports_index() {
        let aggregate = aggregate_with(vec![
            LightSpec::new("light.ok", "Ok", "bulb"),
            LightSpec::new("broken", "Broken", "bulb"),
        ]);
        assert_eq!(
            aggregate.validate(),
            Err(ValidationError::InvalidLightId {
                index: 1,
                id: "broken".into()
            })
        );
    }

    #[test]
    fn label_limits_count_characters() {
        let exact = "é".repeat(31);
        assert!(aggregate_with(vec![LightSpec::new("light.a", exact, "bulb")])
            .validate()
            .is_ok());

        let long = "x".repeat(32);
        assert_eq!(
            aggregate_with(vec![LightSpec::new("light.a", long, "bulb")]).validate(),
            Err(ValidationError::DisplayNameTooLong {
                index: 0,
                len: 32,
                max: 31
            })
        );

        assert_eq!(
            aggregate_with(vec![LightSpec::new("light.a", "", "bulb")]).validate(),
            Err(ValidationError::EmptyDisplayName { index: 0 })
        );
    }

    #[test]
    fn duplicate_ids_are_legal() {
        let aggregate = aggregate_with(vec![
            LightSpec::new("light.a", "A", "bulb"),
            LightSpec::new("light.a", "A again", "bulb"),
        ]);
        assert!(aggregate.validate().is_ok());
    }

    #[test]
    fn deserializes_store_file_shape_with_defaults() {
        let json = r#"{"lights":[{"entity_id":"light.kitchen","label":"Kitchen"}]}"#;
        let aggregate: ConfigAggregate = serde_json::from_str(json).unwrap();
        assert_eq!(aggregate.remote_endpoint, "");
        assert_eq!(aggregate.lights[0].icon_glyph, DEFAULT_ICON);
        assert_eq!(aggregate.lights[0].id.as_str(), "light.kitchen");
    }

    #[test]
    fn debug_redacts_credentials() {
        let aggregate = aggregate_with(vec![]);
        let debug = format!("{aggregate:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
