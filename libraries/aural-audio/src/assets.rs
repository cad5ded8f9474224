//! Asset loading
//!
//! Graphs name their sources by logical asset name; an [`AssetLibrary`]
//! resolves those names to decoded buffers. The file-backed library decodes
//! off the async runtime and keeps recent clips in an LRU cache so flipping
//! between reference and guess playback never re-decodes.

use crate::buffer::AudioBuffer;
use crate::decoder;
use crate::error::{AudioError, Result};
use async_trait::async_trait;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Resolves logical asset names to decoded audio
#[async_trait]
pub trait AssetLibrary: Send + Sync {
    /// Load the named asset, decoding if necessary
    async fn load(&self, name: &str) -> Result<Arc<AudioBuffer>>;
}

/// In-memory asset library, used by tests and tools
#[derive(Default)]
pub struct MemoryAssetLibrary {
    assets: HashMap<String, Arc<AudioBuffer>>,
}

impl MemoryAssetLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a buffer under a logical name
    pub fn insert(&mut self, name: impl Into<String>, buffer: Arc<AudioBuffer>) {
        self.assets.insert(name.into(), buffer);
    }
}

#[async_trait]
impl AssetLibrary for MemoryAssetLibrary {
    async fn load(&self, name: &str) -> Result<Arc<AudioBuffer>> {
        self.assets
            .get(name)
            .cloned()
            .ok_or_else(|| AudioError::AssetNotFound(name.to_string()))
    }
}

/// File-backed asset library with an LRU decode cache
///
/// Asset names are paths relative to the library root, e.g.
/// `"track1/drums.mp3"`.
pub struct FileAssetLibrary {
    root: PathBuf,
    cache: Mutex<LruCache<String, Arc<AudioBuffer>>>,
}

impl FileAssetLibrary {
    /// Cache capacity in clips; enough for all stems of a few tracks
    const CACHE_CAPACITY: usize = 32;

    /// Create a library rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let capacity =
            NonZeroUsize::new(Self::CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            root: root.into(),
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }
}

#[async_trait]
impl AssetLibrary for FileAssetLibrary {
    async fn load(&self, name: &str) -> Result<Arc<AudioBuffer>> {
        {
            let mut cache = self.cache.lock().await;
            if let Some(buffer) = cache.get(name) {
                debug!(asset = name, "asset cache hit");
                return Ok(buffer.clone());
            }
        }

        let path = self.root.join(name);
        debug!(asset = name, path = %path.display(), "decoding asset");

        let buffer = tokio::task::spawn_blocking(move || decoder::decode_file(&path))
            .await
            .map_err(|e| AudioError::Decode(format!("decode task failed: {}", e)))??;
        let buffer = Arc::new(buffer);

        let mut cache = self.cache.lock().await;
        cache.put(name.to_string(), buffer.clone());
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_library_round_trips() {
        let mut lib = MemoryAssetLibrary::new();
        lib.insert("clip", Arc::new(AudioBuffer::silent(10, 44100)));

        let buffer = lib.load("clip").await.unwrap();
        assert_eq!(buffer.frames(), 10);
    }

    #[tokio::test]
    async fn memory_library_reports_missing_asset() {
        let lib = MemoryAssetLibrary::new();
        let result = lib.load("missing").await;
        assert!(matches!(result, Err(AudioError::AssetNotFound(_))));
    }

    #[tokio::test]
    async fn file_library_reports_missing_file() {
        let lib = FileAssetLibrary::new("/nonexistent-root");
        let result = lib.load("track1/drums.mp3").await;
        assert!(matches!(result, Err(AudioError::AssetNotFound(_))));
    }
}
