use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::debug;
use uuid::Uuid;

/// On-disk store for uploaded crop photos.
///
/// Files are written under a flat root with fresh UUID names; the original
/// filename only contributes a sanitized extension.
#[derive(Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredPhoto {
    pub filename: String,
    pub size: usize,
}

impl PhotoStore {
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("failed to create photo dir at {}", root.display()))?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a stored photo by filename. Callers must validate
    /// the filename first; this does no traversal checks itself.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    pub async fn save(&self, bytes: &[u8], original_name: Option<&str>) -> Result<StoredPhoto> {
        let ext = original_name
            .and_then(|name| Path::new(name).extension().and_then(|e| e.to_str()))
            .and_then(sanitize_extension);

        let filename = match ext {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };

        let path = self.root.join(&filename);
        let mut file = File::create(&path)
            .await
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        debug!(filename, size = bytes.len(), "stored uploaded photo");

        Ok(StoredPhoto {
            filename,
            size: bytes.len(),
        })
    }
}

fn sanitize_extension(ext: &str) -> Option<String> {
    let cleaned: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
