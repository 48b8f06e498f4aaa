//! Draft store: step data persisted between views and across restarts

use super::forms::{FieldKey, StepDraft};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a draft store backend
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft storage i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode draft: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DraftError>;

/// One key per wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftNamespace {
    BasicInfo,
    AdditionalDetails,
}

impl DraftNamespace {
    pub const ALL: [DraftNamespace; 2] = [Self::BasicInfo, Self::AdditionalDetails];

    /// Persisted storage key
    pub fn key(self) -> &'static str {
        match self {
            Self::BasicInfo => "basicListingInfo",
            Self::AdditionalDetails => "additionalListingInfo",
        }
    }
}

/// String key-value persistence for step drafts
pub trait DraftStore: Send {
    /// Store `raw` under `namespace`, replacing any previous value
    fn write(&mut self, namespace: DraftNamespace, raw: &str) -> Result<()>;
    fn read(&self, namespace: DraftNamespace) -> Result<Option<String>>;
    fn clear(&mut self, namespace: DraftNamespace) -> Result<()>;
}

/// Result of loading a typed draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftLoad<K: FieldKey> {
    Present(StepDraft<K>),
    Absent,
    /// Stored data could not be decoded
    Corrupt,
}

impl<K: FieldKey> DraftLoad<K> {
    /// Corrupt data counts as "step not completed"
    pub fn present(self) -> Option<StepDraft<K>> {
        match self {
            Self::Present(draft) => Some(draft),
            Self::Absent | Self::Corrupt => None,
        }
    }
}

/// Serialize and store a step draft under its step's namespace
pub fn save_draft<K: FieldKey>(store: &mut dyn DraftStore, draft: &StepDraft<K>) -> Result<()> {
    let raw = serde_json::to_string(draft)?;
    store.write(K::NAMESPACE, &raw)
}

/// Load and decode a step draft. Read failures and bad JSON are reported as
/// [`DraftLoad::Corrupt`].
pub fn load_draft<K: FieldKey>(store: &dyn DraftStore) -> DraftLoad<K> {
    let namespace = K::NAMESPACE;
    let raw = match store.read(namespace) {
        Ok(Some(raw)) => raw,
        Ok(None) => return DraftLoad::Absent,
        Err(e) => {
            tracing::warn!("Failed to read draft {}: {}", namespace.key(), e);
            return DraftLoad::Corrupt;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(draft) => DraftLoad::Present(draft),
        Err(e) => {
            tracing::warn!("Discarding malformed draft {}: {}", namespace.key(), e);
            DraftLoad::Corrupt
        }
    }
}

/// Draft store backed by one JSON file per namespace
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, namespace: DraftNamespace) -> PathBuf {
        self.dir.join(format!("{}.json", namespace.key()))
    }
}

impl DraftStore for FileDraftStore {
    fn write(&mut self, namespace: DraftNamespace, raw: &str) -> Result<()> {
        write_file(&self.path(namespace), raw)?;
        tracing::debug!("Saved draft {}", namespace.key());
        Ok(())
    }

    fn read(&self, namespace: DraftNamespace) -> Result<Option<String>> {
        let path = self.path(namespace);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn clear(&mut self, namespace: DraftNamespace) -> Result<()> {
        let path = self.path(namespace);
        if path.exists() {
            fs::remove_file(path)?;
            tracing::debug!("Cleared draft {}", namespace.key());
        }
        Ok(())
    }
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Draft store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    entries: HashMap<DraftNamespace, String>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn contains(&self, namespace: DraftNamespace) -> bool {
        self.entries.contains_key(&namespace)
    }
}

impl DraftStore for MemoryDraftStore {
    fn write(&mut self, namespace: DraftNamespace, raw: &str) -> Result<()> {
        self.entries.insert(namespace, raw.to_string());
        Ok(())
    }

    fn read(&self, namespace: DraftNamespace) -> Result<Option<String>> {
        Ok(self.entries.get(&namespace).cloned())
    }

    fn clear(&mut self, namespace: DraftNamespace) -> Result<()> {
        self.entries.remove(&namespace);
        Ok(())
    }
}
