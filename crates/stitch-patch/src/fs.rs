use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::errors::DiffError;

/// Injected filesystem primitives. All engine I/O goes through this
/// seam, so parsing and commit building stay testable without a disk.
pub trait FileSystem {
    /// Whole-file read.
    fn read(&self, path: &str) -> Result<String, DiffError>;
    /// Create-or-overwrite write, creating parent directories as
    /// needed.
    fn write(&self, path: &str, content: &str) -> Result<(), DiffError>;
    /// Delete-if-present.
    fn remove(&self, path: &str) -> Result<(), DiffError>;
}

/// Real-filesystem implementation used by the CLI.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn read(&self, path: &str) -> Result<String, DiffError> {
        Ok(fs::read_to_string(path)?)
    }

    fn write(&self, path: &str, content: &str) -> Result<(), DiffError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(fs::write(path, content)?)
    }

    fn remove(&self, path: &str) -> Result<(), DiffError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// One recorded primitive call on a [`MemoryFs`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FsOp {
    Read(String),
    Write(String),
    Remove(String),
}

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<String, String>,
    journal: Vec<FsOp>,
}

/// In-memory filesystem for tests and embedders. Records every
/// primitive call so callers can assert on side-effect order.
#[derive(Clone, Debug, Default)]
pub struct MemoryFs {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<String>,
        C: Into<String>,
    {
        let fs = Self::new();
        {
            let mut state = fs.inner.lock().expect("memory fs mutex poisoned");
            for (path, content) in files {
                state.files.insert(path.into(), content.into());
            }
        }
        fs
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.lock().ok()?.files.get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Every primitive call so far, in invocation order.
    pub fn operations(&self) -> Vec<FsOp> {
        self.lock()
            .map(|state| state.journal.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, DiffError> {
        self.inner
            .lock()
            .map_err(|_| std::io::Error::other("memory fs mutex poisoned").into())
    }
}

impl FileSystem for MemoryFs {
    fn read(&self, path: &str) -> Result<String, DiffError> {
        let mut state = self.lock()?;
        state.journal.push(FsOp::Read(path.to_string()));
        state.files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(ErrorKind::NotFound, format!("no such file: '{path}'")).into()
        })
    }

    fn write(&self, path: &str, content: &str) -> Result<(), DiffError> {
        let mut state = self.lock()?;
        state.journal.push(FsOp::Write(path.to_string()));
        state.files.insert(path.to_string(), content.to_string());
        Ok(())
    }

    fn remove(&self, path: &str) -> Result<(), DiffError> {
        let mut state = self.lock()?;
        state.journal.push(FsOp::Remove(path.to_string()));
        state.files.remove(path);
        Ok(())
    }
}
