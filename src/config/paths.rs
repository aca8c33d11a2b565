//! Path resolution for tether configuration and data files.
//!
//! All tether data is stored in `~/.tether/` (override with `$TETHER_HOME`):
//! - `config.yaml` - Main configuration file
//! - `tether.db` - SQLite database backing the key-value store
//!   (offline request queue, cached state)

use std::path::PathBuf;

use crate::error::TetherError;

/// Paths to tether configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.tether/`
    pub root: PathBuf,
    /// Config file: `~/.tether/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.tether/tether.db`
    pub database: PathBuf,
}

impl Paths {
    /// Create paths based on `$TETHER_HOME` or the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `$TETHER_HOME` nor `$HOME` is set.
    pub fn new() -> Result<Self, TetherError> {
        if let Ok(root) = std::env::var("TETHER_HOME") {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            TetherError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".tether")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("tether.db"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), TetherError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                TetherError::Config(format!(
                    "Failed to create directory {:?}: {}",
                    self.root, e
                ))
            })?;
        }

        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if home cannot be determined
            Self::with_root(PathBuf::from(".tether"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-tether");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.database, root.join("tether.db"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested"));

        paths.ensure_dirs().unwrap();

        assert!(paths.root.exists());
    }
}
