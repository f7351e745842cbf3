use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    warn,
};

use crate::core::MindmateError;

const APP_NAME: &str = "mindmate";

/// Directory holding the client's JSON files (session, settings).
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The per-user application data directory, or the working directory if the
    /// platform has none.
    pub fn app_default() -> Self {
        match dirs::data_local_dir() {
            Some(data_dir) => Self::new(data_dir.join(APP_NAME)),
            None => Self::new("."),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    pub fn save_json<T: Serialize>(&self, data: &T, filename: &str) -> Result<(), MindmateError> {
        fs::create_dir_all(&self.root)?;
        let file_path = self.file_path(filename);
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&file_path, json)?;
        debug!("Data saved to: {}", file_path.display());
        Ok(())
    }

    pub fn load_json<T: for<'de> Deserialize<'de> + Default>(
        &self,
        filename: &str,
    ) -> Result<T, MindmateError> {
        let file_path = self.file_path(filename);

        if !file_path.exists() {
            return Ok(T::default());
        }

        let json = fs::read_to_string(&file_path)?;
        let data: T = serde_json::from_str(&json)?;
        debug!("Data loaded from: {}", file_path.display());
        Ok(data)
    }

    pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(&self, filename: &str) -> T {
        match self.load_json::<T>(filename) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to load {}: {}. Using defaults.", filename, e);
                T::default()
            }
        }
    }

    pub fn delete(&self, filename: &str) -> Result<(), MindmateError> {
        let file_path = self.file_path(filename);
        if file_path.exists() {
            fs::remove_file(&file_path)?;
            debug!("Deleted: {}", file_path.display());
        }
        Ok(())
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.file_path(filename).exists()
    }
}
