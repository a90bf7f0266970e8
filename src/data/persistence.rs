use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A data type that lives in one file under the store directory.
/// Each type names its file and picks JSON or YAML.
pub trait Persistable: Sized + Default + Serialize + for<'de> Deserialize<'de> {
    fn filename() -> &'static str;
    fn is_json() -> bool;
}

/// Handle to the data directory. Built once in main() from --data-dir and
/// passed down explicitly; nothing reads it through module-level state.
#[derive(Clone, Debug)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: PathBuf) -> Self {
        Store { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Loads `T` from its file, or returns `T::default()` when the file
    /// does not exist yet.
    pub fn load<T: Persistable>(&self) -> Result<T> {
        let path = self.file_path(T::filename());
        if !path.exists() {
            return Ok(T::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if T::is_json() {
            serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse JSON from {}", path.display()))
        } else {
            serde_norway::from_str(&contents)
                .with_context(|| format!("failed to parse YAML from {}", path.display()))
        }
    }

    pub fn save<T: Persistable>(&self, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create dir {}", self.dir.display()))?;
        let path = self.file_path(T::filename());
        let contents = if T::is_json() {
            serde_json::to_string_pretty(value).context("failed to serialize JSON")?
        } else {
            serde_norway::to_string(value).context("failed to serialize YAML")?
        };
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}
