//! Uploaded file storage.
//!
//! Files land on local disk under a configured root with random hex names,
//! keeping the original extension. Reads refuse anything that is not a bare
//! file name, so stored names can be served straight from URL paths.

use std::path::{Path, PathBuf};

use folio_types::error::{Error, Result};
use rand::Rng;

/// Local-disk store for uploaded files
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory, creating it if needed
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| Error::internal(format!("Failed to create upload directory: {e}")))?;
        Ok(Self { root })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_safe_name(name: &str) -> bool {
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains('/')
            && !name.contains('\\')
    }

    fn random_stem() -> String {
        let mut bytes = [0u8; 16];
        rand::rng().fill(&mut bytes);
        hex::encode(bytes)
    }

    /// Save file contents under a fresh random name, keeping the extension
    /// of `original_name`. Returns the stored file name.
    pub async fn save(&self, original_name: &str, contents: &[u8]) -> Result<String> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()));

        let stored_name = match extension {
            Some(ext) => format!("{}.{}", Self::random_stem(), ext.to_ascii_lowercase()),
            None => Self::random_stem(),
        };

        tokio::fs::write(self.root.join(&stored_name), contents)
            .await
            .map_err(|e| Error::internal(format!("Failed to write uploaded file: {e}")))?;

        Ok(stored_name)
    }

    /// Read a stored file by name
    ///
    /// Returns `Ok(None)` if the file does not exist. Names containing path
    /// separators or dot segments are rejected outright.
    pub async fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        if !Self::is_safe_name(name) {
            return Err(Error::validation("invalid file name"));
        }

        match tokio::fs::read(self.root.join(name)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::internal(format!("Failed to read uploaded file: {e}"))),
        }
    }

    /// Remove a stored file by name (no-op if absent)
    pub async fn remove(&self, name: &str) -> Result<()> {
        if !Self::is_safe_name(name) {
            return Err(Error::validation("invalid file name"));
        }

        match tokio::fs::remove_file(self.root.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::internal(format!("Failed to remove uploaded file: {e}"))),
        }
    }
}
