//! Persistence of the current image in a text key-value store.

use crate::canvas::{Canvas, GridSize};
use crate::codec::{self, Layout, RestoreOutcome, Restored};
use crate::Result;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Entry name holding the current image.
pub const CURRENT_IMAGE_KEY: &str = "current_image";

/// A store of named text values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store, one file per key.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }
}

/// Loads and saves the current image through a store.
#[derive(Clone, Debug)]
pub struct Session<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Read the persisted image for the active grid. A missing entry yields a
    /// blank canvas with [`RestoreOutcome::Restored`].
    pub fn load(&self, size: GridSize) -> Result<Restored> {
        match self.store.get(CURRENT_IMAGE_KEY)? {
            Some(text) => Ok(codec::restore_text(&text, size)),
            None => Ok(Restored {
                canvas: Canvas::new(size),
                outcome: RestoreOutcome::Restored,
            }),
        }
    }

    /// Grid size of the persisted image, if there is a readable one.
    pub fn stored_size(&self) -> Result<Option<GridSize>> {
        let Some(text) = self.store.get(CURRENT_IMAGE_KEY)? else {
            return Ok(None);
        };
        let Ok(data) = codec::from_text(&text) else {
            return Ok(None);
        };
        if data.len() < 2 {
            return Ok(None);
        }
        Ok(GridSize::new(data[0] as usize, data[1] as usize).ok())
    }

    /// Persist the canvas.
    pub fn save(&mut self, canvas: &Canvas) -> Result<()> {
        let text = codec::serialize_text(canvas, Layout::Masked);
        self.store.set(CURRENT_IMAGE_KEY, &text)
    }
}
