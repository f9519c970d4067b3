//! File-backed configuration with create-if-absent semantics

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name for configs not owned by a single plugin
pub const SHARED_DIR: &str = "shared";

/// Resolves config paths under one root and loads or creates the files
///
/// Layout: `<root>/config/<plugin-id-or-shared>/<name>.toml`. A missing file
/// is created from the populate callback, which runs only on first creation;
/// later loads read the file as the plugin's user may have edited it.
#[derive(Debug, Clone)]
pub struct ConfigBase {
    root: PathBuf,
}

impl ConfigBase {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the on-disk path for a named config
    pub fn resolve(&self, owner: &str, shared: bool, name: &str) -> PathBuf {
        let dir = if shared { SHARED_DIR } else { owner };
        self.root
            .join("config")
            .join(dir)
            .join(format!("{name}.toml"))
    }

    /// Load `path`, creating it from `populate` if absent
    pub fn load_or_create<T, F>(&self, path: &Path, populate: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if path.exists() {
            let text = fs::read_to_string(path)?;
            return Ok(toml::from_str(&text)?);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let value = populate();
        fs::write(path, toml::to_string_pretty(&value)?)?;
        tracing::info!("Created config file {}", path.display());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::cell::Cell;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct TeleportSettings {
        request_timeout_secs: u64,
        cross_world: bool,
    }

    impl Default for TeleportSettings {
        fn default() -> Self {
            Self {
                request_timeout_secs: 30,
                cross_world: true,
            }
        }
    }

    #[test]
    fn test_resolve_paths() {
        let base = ConfigBase::new("/srv/server");

        assert_eq!(
            base.resolve("teleport", false, "teleport"),
            PathBuf::from("/srv/server/config/teleport/teleport.toml")
        );
        assert_eq!(
            base.resolve("teleport", true, "worlds"),
            PathBuf::from("/srv/server/config/shared/worlds.toml")
        );
    }

    #[test]
    fn test_create_then_load_without_populate() {
        let dir = tempfile::tempdir().unwrap();
        let base = ConfigBase::new(dir.path());
        let path = base.resolve("teleport", false, "teleport");

        let populated = Cell::new(0);
        let created: TeleportSettings = base
            .load_or_create(&path, || {
                populated.set(populated.get() + 1);
                TeleportSettings::default()
            })
            .unwrap();
        assert_eq!(created, TeleportSettings::default());
        assert_eq!(populated.get(), 1);
        assert!(path.exists());

        // Second load reads the file; populate must not run again.
        let loaded: TeleportSettings = base
            .load_or_create(&path, || {
                populated.set(populated.get() + 1);
                TeleportSettings {
                    request_timeout_secs: 0,
                    cross_world: false,
                }
            })
            .unwrap();
        assert_eq!(loaded, TeleportSettings::default());
        assert_eq!(populated.get(), 1);
    }

    #[test]
    fn test_user_edits_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let base = ConfigBase::new(dir.path());
        let path = base.resolve("teleport", false, "teleport");

        let _: TeleportSettings = base
            .load_or_create(&path, TeleportSettings::default)
            .unwrap();
        fs::write(&path, "request_timeout_secs = 5\ncross_world = false\n").unwrap();

        let loaded: TeleportSettings = base
            .load_or_create(&path, TeleportSettings::default)
            .unwrap();
        assert_eq!(loaded.request_timeout_secs, 5);
        assert!(!loaded.cross_world);
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let base = ConfigBase::new(dir.path());
        let path = base.resolve("teleport", false, "teleport");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not toml at all [").unwrap();

        let result: Result<TeleportSettings> =
            base.load_or_create(&path, TeleportSettings::default);
        assert!(matches!(
            result,
            Err(crate::error::FrameworkError::ConfigParse(_))
        ));
    }
}
