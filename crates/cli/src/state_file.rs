//! Local state file holding the last known binding

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hedvig_provider::state::{decode_dynamic_value, encode_dynamic_value, DynamicValue};
use tracing::debug;

/// Default state file name
pub const DEFAULT_STATE_FILE: &str = "hedvig-access.json";

pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recorded state, `None` when nothing is recorded
    pub fn load(&self) -> Result<Option<DynamicValue>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = std::fs::read(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let value = decode_dynamic_value(&data)
            .with_context(|| format!("decoding {}", self.path.display()))?;
        Ok((!value.is_null()).then_some(value))
    }

    pub fn save(&self, value: &DynamicValue) -> Result<()> {
        let data = encode_dynamic_value(value)?;
        std::fs::write(&self.path, data)
            .with_context(|| format!("writing {}", self.path.display()))?;
        debug!("State written to {}", self.path.display());
        Ok(())
    }

    /// Record `value`, or forget the binding when there is none
    pub fn store(&self, value: Option<&DynamicValue>) -> Result<()> {
        match value {
            Some(value) => self.save(value),
            None => self.remove(),
        }
    }

    pub fn remove(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("removing {}", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedvig_provider::state::{make_state, string_value};

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = StateFile::new(dir.path().join(DEFAULT_STATE_FILE));
        assert!(file.load().unwrap().is_none());
        file.remove().unwrap();
    }

    #[test]
    fn test_store_and_forget() {
        let dir = tempfile::tempdir().unwrap();
        let file = StateFile::new(dir.path().join(DEFAULT_STATE_FILE));
        let value = make_state(vec![("id", string_value("access-vd1-h1-10.0.0.1"))]);

        file.store(Some(&value)).unwrap();
        assert_eq!(file.load().unwrap(), Some(value));

        file.store(None).unwrap();
        assert!(!file.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = StateFile::new(dir.path().join(DEFAULT_STATE_FILE));
        std::fs::write(file.path(), "{oops").unwrap();
        assert!(file.load().is_err());
    }
}
