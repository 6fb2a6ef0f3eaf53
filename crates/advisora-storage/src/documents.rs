//! Flat directory of generated documents.
//!
//! Every name passes [`is_valid_filename`] before it touches the filesystem,
//! so a name can never escape the root directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use advisora_core::document_keys::is_valid_filename;

use crate::error::StorageError;

/// Result of a GET, including the body and its content type.
#[derive(Debug)]
pub struct StoredDocument {
    pub body: Vec<u8>,
    pub content_type: &'static str,
}

/// Metadata for a single stored document, returned by [`DocumentStore::list`].
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub name: String,
    pub size: u64,
    pub modified: Option<jiff::Timestamp>,
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Open (and create if needed) the document directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| StorageError::Open {
                path: root.display().to_string(),
                source,
            })?;
        info!(path = %root.display(), "document store ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_filename(name) {
            return Err(StorageError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.root.join(name))
    }

    /// Write a new document. The bytes go to a temp file first and are
    /// linked into place, so readers never see a partial PDF and an existing
    /// document is never replaced.
    pub async fn put(&self, name: &str, body: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        let tmp_path = self.root.join(temp_name(Uuid::new_v4()));

        let write_err = |source| StorageError::Write {
            name: name.to_string(),
            source,
        };

        tokio::fs::write(&tmp_path, body).await.map_err(write_err)?;
        let linked = tokio::fs::hard_link(&tmp_path, &path).await;
        if let Err(e) = tokio::fs::remove_file(&tmp_path).await {
            warn!(path = %tmp_path.display(), error = %e, "failed to remove temp file");
        }
        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists {
                    name: name.to_string(),
                });
            }
            Err(e) => return Err(write_err(e)),
        }

        debug!(name, bytes = body.len(), "document stored");
        Ok(())
    }

    pub async fn get(&self, name: &str) -> Result<StoredDocument, StorageError> {
        let path = self.path_for(name)?;
        let body = tokio::fs::read(&path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StorageError::NotFound {
                    name: name.to_string(),
                }
            } else {
                StorageError::Read {
                    name: name.to_string(),
                    source,
                }
            }
        })?;

        Ok(StoredDocument {
            body,
            content_type: content_type_for(name),
        })
    }

    pub async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        tokio::fs::remove_file(&path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StorageError::NotFound {
                    name: name.to_string(),
                }
            } else {
                StorageError::Delete {
                    name: name.to_string(),
                    source,
                }
            }
        })
    }

    /// List stored documents with size and modification time. Temp files and
    /// anything else with an invalid name are skipped.
    pub async fn list(&self) -> Result<Vec<DocumentMeta>, StorageError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(StorageError::List)?;

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(StorageError::List)? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !is_valid_filename(&name) {
                continue;
            }
            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    warn!(name, error = %e, "skipping unreadable document");
                    continue;
                }
            };
            let modified = metadata
                .modified()
                .ok()
                .and_then(|t| jiff::Timestamp::try_from(t).ok());

            documents.push(DocumentMeta {
                name,
                size: metadata.len(),
                modified,
            });
        }

        documents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(documents)
    }

    /// Delete documents last modified more than `max_age` ago, along with
    /// temp files left behind by interrupted writes.
    /// Returns the number of documents deleted.
    pub async fn purge_older_than(&self, max_age: Duration) -> Result<usize, StorageError> {
        let now = jiff::Timestamp::now();
        let max_age_secs = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
        let expired = |modified: jiff::Timestamp| now.as_second() - modified.as_second() >= max_age_secs;

        let mut purged = 0;
        for doc in self.list().await? {
            if !doc.modified.is_some_and(expired) {
                continue;
            }
            match self.delete(&doc.name).await {
                Ok(()) => purged += 1,
                // Deleted concurrently (e.g. by another purge); nothing to do.
                Err(StorageError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        let temp_files = self.purge_temp_files(expired).await?;

        if purged > 0 || temp_files > 0 {
            info!(purged, temp_files, "purged expired documents");
        }
        Ok(purged)
    }

    async fn purge_temp_files(&self, expired: impl Fn(jiff::Timestamp) -> bool) -> Result<usize, StorageError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(StorageError::List)?;

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await.map_err(StorageError::List)? {
            if !entry.file_name().to_str().is_some_and(is_temp_name) {
                continue;
            }
            let modified = entry
                .metadata()
                .await
                .ok()
                .and_then(|m| m.modified().ok())
                .and_then(|t| jiff::Timestamp::try_from(t).ok());
            if !modified.is_some_and(&expired) {
                continue;
            }
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(path = %entry.path().display(), error = %e, "failed to remove temp file"),
            }
        }
        Ok(removed)
    }
}

fn temp_name(id: Uuid) -> String {
    format!(".{}.tmp", id.simple())
}

fn is_temp_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(".tmp")
}

fn content_type_for(name: &str) -> &'static str {
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
