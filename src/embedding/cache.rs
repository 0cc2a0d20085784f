//! Persistent id -> vector cache in front of an [`Embedder`]

use super::{CallPolicy, Embedder};
use crate::error::{Result, RankerError};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Embedding vectors keyed by a stable id such as `resume-<id>` or `job-<n>`.
///
/// The whole cache is loaded once and rewritten by [`EmbeddingCache::save`];
/// entries added since the last save are lost if the process dies.
pub struct EmbeddingCache {
    path: Option<PathBuf>,
    entries: RwLock<HashMap<String, Vec<f32>>>,
    embedder: Arc<dyn Embedder>,
    policy: CallPolicy,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

impl EmbeddingCache {
    /// Cache that is never persisted
    pub fn in_memory(embedder: Arc<dyn Embedder>, policy: CallPolicy) -> Self {
        Self {
            path: None,
            entries: RwLock::new(HashMap::new()),
            embedder,
            policy,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Load the snapshot at `path`. A missing file starts empty; an
    /// unreadable one is logged and also starts empty.
    pub fn load(path: &Path, embedder: Arc<dyn Embedder>, policy: CallPolicy) -> Self {
        let entries = match read_snapshot(path) {
            Ok(entries) => {
                info!("Loaded {} cached embeddings from {}", entries.len(), path.display());
                entries
            }
            Err(e) => {
                warn!("Ignoring embedding cache: {}", e);
                HashMap::new()
            }
        };

        Self {
            path: Some(path.to_path_buf()),
            entries: RwLock::new(entries),
            embedder,
            policy,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Vector stored under `id`, computing it from `text` on first use
    pub async fn get_embedding(&self, text: &str, id: &str) -> Result<Vec<f32>> {
        if let Some(vector) = self.get(id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Embedding cache hit: {}", id);
            return Ok(vector);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Embedding cache miss: {} ({} chars)", id, text.len());
        let vector = self.policy.call(self.embedder.as_ref(), text).await?;

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), vector.clone());

        Ok(vector)
    }

    pub fn get(&self, id: &str) -> Option<Vec<f32>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Rewrite the whole snapshot. The file is replaced atomically so a
    /// crash mid-write leaves the previous snapshot intact.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            let sorted: BTreeMap<&String, &Vec<f32>> = entries.iter().collect();
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, &sorted)?;
            writer.flush()?;
        }
        tmp.persist(path).map_err(|e| RankerError::Io(e.error))?;

        info!("Saved {} embeddings to {}", self.len(), path.display());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Read a snapshot file. Missing files are an empty cache; malformed ones
/// are reported as [`RankerError::CacheCorruption`].
pub fn read_snapshot(path: &Path) -> Result<HashMap<String, Vec<f32>>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => {
            return Err(RankerError::CacheCorruption(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )))
        }
    };

    serde_json::from_str(&content).map_err(|e| {
        RankerError::CacheCorruption(format!("malformed snapshot {}: {}", path.display(), e))
    })
}
