//! Flat-file collection store.
//!
//! Each entity type persists as one JSON snapshot (`<data_dir>/<name>.json`)
//! holding the full document sequence. The store is the only component that
//! touches the snapshot file, and it guarantees two things:
//!
//! - **Write atomicity**: snapshots are published by writing a temp file and
//!   renaming it over the target, so a concurrent reader never observes a
//!   half-written file.
//! - **Mutation serialization**: [`Collection::mutate`] holds a per-collection
//!   mutex across its load/transform/save cycle. Two mutations on the same
//!   collection never interleave; different collections are independent.

pub mod ids;

pub use ids::IdStrategy;

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::sync::Mutex;

use tiendita_core::DocumentId;

/// A document stored in a collection snapshot.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name, used as the snapshot file stem.
    const COLLECTION: &'static str;

    /// The document's identifier.
    fn id(&self) -> DocumentId;
}

/// Errors raised by the collection store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the snapshot file failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted snapshot is not valid JSON for this collection.
    /// Not auto-repaired; surfaced to the caller.
    #[error("corrupt snapshot at {path}: {source}")]
    Corrupt {
        /// Snapshot file path.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// Encoding the in-memory documents failed.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

/// A single named collection backed by one JSON snapshot file.
pub struct Collection<T> {
    path: PathBuf,
    ids: IdStrategy,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Collection<T> {
    /// Create a collection rooted in `data_dir` with the given ID strategy.
    ///
    /// No I/O happens here; the snapshot file is established lazily on the
    /// first [`load`](Self::load).
    #[must_use]
    pub fn new(data_dir: &Path, ids: IdStrategy) -> Self {
        Self {
            path: data_dir.join(format!("{}.json", T::COLLECTION)),
            ids,
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current snapshot.
    ///
    /// A missing snapshot file is not an error: an empty snapshot is written
    /// to establish the store file and an empty sequence is returned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the file exists but does not decode,
    /// and [`StoreError::Io`] on read failure.
    pub async fn load(&self) -> Result<Vec<T>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "snapshot missing, creating empty collection");
                self.save(&[]).await?;
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the persisted snapshot.
    ///
    /// The snapshot is written to a sibling temp file and renamed into place,
    /// so concurrent readers see either the old or the new snapshot in full.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on write failure; the caller must not
    /// assume partial success.
    pub async fn save(&self, docs: &[T]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(docs).map_err(StoreError::Encode)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Load, transform, save - the canonical mutation cycle.
    ///
    /// Serialized per collection: the internal mutex is held across the whole
    /// cycle, so concurrent `mutate` calls on this collection cannot lose
    /// updates to each other. If the closure fails the snapshot is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a [`StoreError`] (converted into `E`)
    /// from the load/save halves.
    pub async fn mutate<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
        E: From<StoreError>,
    {
        self.mutate_then(f, |_| {}).await
    }

    /// Like [`mutate`](Self::mutate), but on success runs `after` with the
    /// saved documents before the collection lock is released.
    ///
    /// Observers notified from `after` see successful mutations in commit
    /// order; `after` is not run when the closure or the save fails.
    ///
    /// # Errors
    ///
    /// Same as [`mutate`](Self::mutate).
    pub async fn mutate_then<R, E, F, G>(&self, f: F, after: G) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
        G: FnOnce(&[T]),
        E: From<StoreError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.load().await?;
        let out = f(&mut docs)?;
        self.save(&docs).await?;
        after(&docs);
        Ok(out)
    }

    /// Generate the next identifier for a document joining `docs`.
    ///
    /// Must be called inside a [`mutate`](Self::mutate) closure so the
    /// sequential counter cannot race another assignment on this collection.
    pub fn next_id(&self, docs: &[T]) -> DocumentId {
        self.ids.next(docs.iter().map(Document::id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde::Deserialize;
    use tempfile::tempdir;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Widget {
        id: DocumentId,
        name: String,
    }

    impl Document for Widget {
        const COLLECTION: &'static str = "widgets";

        fn id(&self) -> DocumentId {
            self.id
        }
    }

    fn widget(id: u64, name: &str) -> Widget {
        Widget {
            id: DocumentId::Serial(id),
            name: name.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_load_missing_establishes_empty_snapshot() {
        let dir = tempdir().unwrap();
        let coll: Collection<Widget> = Collection::new(dir.path(), IdStrategy::sequential());

        let docs = coll.load().await.unwrap();
        assert!(docs.is_empty());
        // The store file now exists and holds an empty sequence.
        let raw = std::fs::read_to_string(coll.path()).unwrap();
        assert_eq!(raw.trim(), "[]");
    }

    #[tokio::test]
    async fn test_save_load_roundtrip_is_idempotent() {
        let dir = tempdir().unwrap();
        let coll: Collection<Widget> = Collection::new(dir.path(), IdStrategy::sequential());

        let docs = vec![widget(1, "a"), widget(2, "b")];
        coll.save(&docs).await.unwrap();

        let loaded = coll.load().await.unwrap();
        assert_eq!(loaded, docs);

        // save(load()) is a no-op on content
        coll.save(&loaded).await.unwrap();
        assert_eq!(coll.load().await.unwrap(), docs);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_fatal() {
        let dir = tempdir().unwrap();
        let coll: Collection<Widget> = Collection::new(dir.path(), IdStrategy::sequential());
        std::fs::write(coll.path(), b"{ not json ]").unwrap();

        let err = coll.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_snapshot_unchanged() {
        let dir = tempdir().unwrap();
        let coll: Collection<Widget> = Collection::new(dir.path(), IdStrategy::sequential());
        coll.save(&[widget(1, "a")]).await.unwrap();

        let result: Result<(), StoreError> = coll
            .mutate(|docs| {
                docs.push(widget(2, "b"));
                Err(StoreError::Encode(serde_json::from_str::<()>("x").unwrap_err()))
            })
            .await;
        assert!(result.is_err());

        let docs = coll.load().await.unwrap();
        assert_eq!(docs, vec![widget(1, "a")]);
    }

    #[tokio::test]
    async fn test_concurrent_mutations_do_not_lose_updates() {
        let dir = tempdir().unwrap();
        let coll: Arc<Collection<Widget>> =
            Arc::new(Collection::new(dir.path(), IdStrategy::sequential()));

        let mut handles = Vec::new();
        for i in 0..16u64 {
            let coll = Arc::clone(&coll);
            handles.push(tokio::spawn(async move {
                coll.mutate::<_, StoreError, _>(|docs| {
                    docs.push(widget(i + 1, "w"));
                    Ok(())
                })
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let docs = coll.load().await.unwrap();
        assert_eq!(docs.len(), 16);
    }

    #[tokio::test]
    async fn test_mutate_then_runs_hook_only_on_success() {
        let dir = tempdir().unwrap();
        let coll: Collection<Widget> = Collection::new(dir.path(), IdStrategy::sequential());

        let mut observed = None;
        coll.mutate_then::<_, StoreError, _, _>(
            |docs| {
                docs.push(widget(1, "a"));
                Ok(())
            },
            |docs| observed = Some(docs.len()),
        )
        .await
        .unwrap();
        assert_eq!(observed, Some(1));

        let mut hook_ran = false;
        let result: Result<(), StoreError> = coll
            .mutate_then(
                |_| Err(StoreError::Encode(serde_json::from_str::<()>("x").unwrap_err())),
                |_| hook_ran = true,
            )
            .await;
        assert!(result.is_err());
        assert!(!hook_ran);
    }

    #[tokio::test]
    async fn test_next_id_uses_strategy() {
        let dir = tempdir().unwrap();
        let coll: Collection<Widget> = Collection::new(dir.path(), IdStrategy::sequential());

        let docs = vec![widget(4, "a")];
        assert_eq!(coll.next_id(&docs), DocumentId::Serial(5));
    }
}
