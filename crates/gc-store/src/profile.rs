use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::error::{Result, StoreError};
use crate::store::Store;

pub const DEFAULT_PROFILE: &str = "default";

/// Default base directory for all geocoin storage.
pub fn default_base_dir() -> PathBuf {
    dirs_home().join(".geocoin")
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Sanitize a profile name for use as a filename.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// One player's store inside the shared data directory.
///
/// Layout:
/// ```text
/// ~/.geocoin/
/// ├── config.toml
/// └── profiles/
///     ├── default.db
///     └── <profile>.db
/// ```
pub struct ProfileStore {
    store: Store,
    profile: String,
}

impl ProfileStore {
    /// Open the profile's store, creating directories as needed.
    /// `profile`: defaults to `default`; an empty name does too.
    /// `base_dir`: override the base directory (for testing).
    pub fn open(profile: Option<&str>, base_dir: Option<&Path>) -> Result<Self> {
        let base = base_dir.map(PathBuf::from).unwrap_or_else(default_base_dir);
        let profiles_dir = base.join("profiles");

        fs::create_dir_all(&profiles_dir).map_err(|e| {
            StoreError::InvalidData(format!("failed to create {}: {e}", profiles_dir.display()))
        })?;

        let profile = match profile.map(str::trim) {
            Some(name) if !name.is_empty() => sanitize_name(name),
            _ => DEFAULT_PROFILE.to_string(),
        };
        let path = profiles_dir.join(format!("{profile}.db"));
        tracing::debug!(path = %path.display(), "opening profile store");
        let store = Store::open(&path)?;

        Ok(Self { store, profile })
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn into_store(self) -> Store {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gc_core::KeyValueStore;
    use gc_core::persist::WALLET_KEY;

    #[test]
    fn test_directory_creation() {
        let dir = tempfile::tempdir().unwrap();
        let ps = ProfileStore::open(Some("walker"), Some(dir.path())).unwrap();
        assert_eq!(ps.profile(), "walker");
        assert!(dir.path().join("profiles/walker.db").exists());
    }

    #[test]
    fn test_default_profile() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            ProfileStore::open(None, Some(dir.path())).unwrap().profile(),
            DEFAULT_PROFILE
        );
        assert_eq!(
            ProfileStore::open(Some("  "), Some(dir.path())).unwrap().profile(),
            DEFAULT_PROFILE
        );
    }

    #[test]
    fn test_profile_isolation() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = ProfileStore::open(Some("a"), Some(dir.path())).unwrap().into_store();
        let b = ProfileStore::open(Some("b"), Some(dir.path())).unwrap().into_store();

        a.set(WALLET_KEY, "1,1,0").unwrap();
        assert!(b.get(WALLET_KEY).unwrap().is_none());
    }

    #[test]
    fn test_profile_name_sanitization() {
        assert_eq!(sanitize_name("hello world"), "hello_world");
        assert_eq!(sanitize_name("../escape"), "___escape");
        assert_eq!(sanitize_name("valid-name_123"), "valid-name_123");
    }
}
