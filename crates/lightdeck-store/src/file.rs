//! JSON file storage for the configuration aggregate.

use std::io::Write;
use std::path::{Path, PathBuf};

use lightdeck_core::ConfigAggregate;
use tempfile::NamedTempFile;

use crate::error::{ConfigError, Result};
use crate::ConfigStore;

/// Read, parse and validate an aggregate from `path`.
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file cannot be read, `ConfigError::Parse`
/// if it is not valid JSON, or `ConfigError::Invalid` if an invariant fails.
pub fn load(path: &Path) -> Result<ConfigAggregate> {
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let aggregate: ConfigAggregate =
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    aggregate.validate()?;

    if aggregate.remote_endpoint.is_empty() {
        tracing::warn!(path = %path.display(), "'ha_url' not set, configure via web UI");
    }
    if aggregate.remote_credential.is_empty() {
        tracing::warn!(path = %path.display(), "'ha_token' not set, configure via web UI");
    }

    tracing::debug!(
        path = %path.display(),
        lights = aggregate.lights.len(),
        "Loaded configuration"
    );

    Ok(aggregate)
}

/// Write `aggregate` to `path` as pretty-printed JSON, atomically.
///
/// Light ordering is preserved.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be written or renamed.
pub fn save(path: &Path, aggregate: &ConfigAggregate) -> Result<()> {
    let mut json = serde_json::to_string_pretty(aggregate)
        .map_err(|e| ConfigError::Serialization(e.to_string()))?;
    json.push('\n');

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(json.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    tracing::debug!(
        path = %path.display(),
        lights = aggregate.lights.len(),
        "Saved configuration"
    );

    Ok(())
}

/// A `ConfigStore` backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<ConfigAggregate> {
        load(&self.path)
    }

    fn save(&self, aggregate: &ConfigAggregate) -> Result<()> {
        save(&self.path, aggregate)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightdeck_core::{LightSpec, ValidationError};
    use tempfile::TempDir;

    fn sample() -> ConfigAggregate {
        ConfigAggregate {
            remote_endpoint: "http://192.168.1.100:8123".into(),
            remote_credential: "eyJ\"quoted\\token".into(),
            web_credential_hash: "$2b$10$abcdefghijklmnopqrstuu".into(),
            lights: vec![
                LightSpec::new("light.living_room", "Living Room", "bulb"),
                LightSpec::new("switch.studio_lamp", "Studio \"Lamp\"", "💡"),
                LightSpec::new("light.hall", "Hall", "lamp"),
            ],
        }
    }

    #[test]
    fn save_then_load_roundtrip_preserves_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ha_lights.conf");

        let original = sample();
        save(&path, &original).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, original);
        let ids: Vec<_> = loaded.lights.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["light.living_room", "switch.studio_lamp", "light.hall"]);
    }

    #[test]
    fn saving_twice_produces_identical_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ha_lights.conf");

        save(&path, &sample()).unwrap();
        let first = std::fs::read(&path).unwrap();
        save(&path, &sample()).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert!(first.ends_with(b"\n"));
    }

    #[test]
    fn saved_file_uses_store_field_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ha_lights.conf");
        save(&path, &sample()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["ha_url"], "http://192.168.1.100:8123");
        assert_eq!(value["lights"][0]["entity_id"], "light.living_room");
        assert_eq!(value["lights"][0]["label"], "Living Room");
        assert_eq!(value["lights"][0]["icon"], "bulb");
        assert!(value.get("web_password_hash").is_some());
    }

    #[test]
    fn empty_fields_and_no_lights_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ha_lights.conf");
        std::fs::write(
            &path,
            r#"{"ha_url":"","ha_token":"","web_password_hash":"","lights":[]}"#,
        )
        .unwrap();

        let loaded = load(&path).unwrap();
        assert!(loaded.lights.is_empty());
        assert!(loaded.needs_setup());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = load(&dir.path().join("absent.conf"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ha_lights.conf");
        std::fs::write(&path, "{ \"lights\": [").unwrap();

        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn invalid_aggregate_is_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ha_lights.conf");
        std::fs::write(
            &path,
            r#"{"lights":[{"entity_id":"kitchen","label":"Kitchen","icon":"bulb"}]}"#,
        )
        .unwrap();

        assert!(matches!(
            load(&path),
            Err(ConfigError::Invalid(ValidationError::InvalidLightId { index: 0, .. }))
        ));
    }

    #[test]
    fn file_store_uses_its_path() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("ha_lights.conf"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());
        assert!(store.location().ends_with("ha_lights.conf"));
    }
}
