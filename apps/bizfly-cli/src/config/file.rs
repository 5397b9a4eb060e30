//! YAML settings file (`~/.bizfly.yaml`)
//!
//! The file is shared with every other command, so updates touch only the
//! key being written and keep everything else as it was.

use crate::error::{CliError, CliResult};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// In-memory view of the settings file
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    values: Mapping,
}

impl ConfigFile {
    /// Load the file at `path`; a missing or empty file is an empty document
    pub fn load(path: &Path) -> CliResult<Self> {
        let values = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            parse_mapping(&contents)?
        } else {
            Mapping::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// Path this document is read from and written to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file is present on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Get a string value, treating empty strings as unset
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Set a string value, leaving other keys untouched
    pub fn set_str(&mut self, key: &str, value: &str) {
        self.values
            .insert(Value::String(key.to_string()), Value::String(value.to_string()));
    }

    /// Write the document back, creating the file if needed
    pub fn save(&self) -> CliResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&self.values)?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        std::fs::write(&tmp_path, yaml)?;

        // Holds a credential, so owner-only (Unix)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&tmp_path, perms)?;
        }

        std::fs::rename(&tmp_path, &self.path)?;
        tracing::debug!(path = %self.path.display(), "config file written");

        Ok(())
    }
}

fn parse_mapping(contents: &str) -> CliResult<Mapping> {
    if contents.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(contents)? {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(CliError::Config(
            "config file must contain a YAML mapping".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::load(&temp_dir.path().join("missing.yaml")).unwrap();
        assert!(!config.exists());
        assert!(config.get_str("auth_token").is_none());
    }

    #[test]
    fn test_load_empty_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".bizfly.yaml");
        std::fs::write(&path, "\n").unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert!(config.exists());
        assert!(config.get_str("region").is_none());
    }

    #[test]
    fn test_save_creates_file_with_single_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".bizfly.yaml");

        let mut config = ConfigFile::load(&path).unwrap();
        config.set_str("auth_token", "abc123");
        config.save().unwrap();

        let written: Mapping =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(
            written.get("auth_token").and_then(Value::as_str),
            Some("abc123")
        );
    }

    #[test]
    fn test_save_preserves_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".bizfly.yaml");
        std::fs::write(&path, "region: HoChiMinh\nauth_token: old\nproject_id: p-1\n").unwrap();

        let mut config = ConfigFile::load(&path).unwrap();
        config.set_str("auth_token", "new");
        config.save().unwrap();

        let reloaded = ConfigFile::load(&path).unwrap();
        assert_eq!(reloaded.get_str("auth_token"), Some("new"));
        assert_eq!(reloaded.get_str("region"), Some("HoChiMinh"));
        assert_eq!(reloaded.get_str("project_id"), Some("p-1"));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("bizfly.yaml");

        let mut config = ConfigFile::load(&path).unwrap();
        config.set_str("auth_token", "tok");
        config.save().unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("nested").join("bizfly.yaml.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".bizfly.yaml");

        let mut config = ConfigFile::load(&path).unwrap();
        config.set_str("auth_token", "tok");
        config.save().unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_non_mapping_root_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".bizfly.yaml");
        std::fs::write(&path, "- just\n- a list\n").unwrap();

        assert!(matches!(
            ConfigFile::load(&path),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_empty_string_value_is_unset() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".bizfly.yaml");
        std::fs::write(&path, "project_id: \"\"\n").unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert!(config.get_str("project_id").is_none());
    }
}
