//! In-memory providers.
//!
//! Both stores hold per-path state behind a lock and let callers inject
//! read or write failures per path. They back the test suites and hosts
//! that stage descriptors before handing them to the OS.

use parking_lot::Mutex;
use permward_acl::{ensure_non_empty, ModeProvider, SecurityDescriptorProvider};
use permward_types::{AccessRight, FileMode, ProbeError, SecurityState};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

fn not_found(path: &Path) -> ProbeError {
    ProbeError::not_found(path, io::ErrorKind::NotFound.into())
}

fn denied() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "injected failure")
}

#[derive(Debug, Default)]
struct Faults {
    reads: HashSet<PathBuf>,
    writes: HashSet<PathBuf>,
}

/// Owner and access list per path.
#[derive(Debug)]
pub struct MemoryDescriptorStore {
    states: Mutex<HashMap<PathBuf, SecurityState>>,
    faults: Mutex<Faults>,
    writes: AtomicUsize,
    full_control: AccessRight,
}

impl MemoryDescriptorStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            faults: Mutex::new(Faults::default()),
            writes: AtomicUsize::new(0),
            full_control: AccessRight::FULL_CONTROL,
        }
    }

    /// Stores `state` for `path`, replacing any previous one.
    pub fn insert(&self, path: impl Into<PathBuf>, state: SecurityState) {
        self.states.lock().insert(path.into(), state);
    }

    /// Returns the stored state for `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<SecurityState> {
        self.states.lock().get(path).cloned()
    }

    /// Makes every later read of `path` fail.
    pub fn fail_reads(&self, path: impl Into<PathBuf>) {
        self.faults.lock().reads.insert(path.into());
    }

    /// Makes every later write of `path` fail.
    pub fn fail_writes(&self, path: impl Into<PathBuf>) {
        self.faults.lock().writes.insert(path.into());
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for MemoryDescriptorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityDescriptorProvider for MemoryDescriptorStore {
    fn read_state(&self, path: &Path) -> Result<SecurityState, ProbeError> {
        if self.faults.lock().reads.contains(path) {
            return Err(ProbeError::read(path, denied()));
        }
        self.states
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn write_state(&self, path: &Path, state: &SecurityState) -> Result<(), ProbeError> {
        if self.faults.lock().writes.contains(path) {
            return Err(ProbeError::write(path, denied()));
        }

        let mut states = self.states.lock();
        let slot = states.get_mut(path).ok_or_else(|| not_found(path))?;

        let mut state = state.clone();
        ensure_non_empty(&mut state, self.full_control);
        *slot = state;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Permission bits per path.
#[derive(Debug, Default)]
pub struct MemoryModeStore {
    modes: Mutex<HashMap<PathBuf, FileMode>>,
    faults: Mutex<Faults>,
    writes: AtomicUsize,
}

impl MemoryModeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `mode` for `path`, replacing any previous one.
    pub fn insert(&self, path: impl Into<PathBuf>, mode: FileMode) {
        self.modes.lock().insert(path.into(), mode);
    }

    /// Returns the stored mode for `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<FileMode> {
        self.modes.lock().get(path).copied()
    }

    /// Makes every later read of `path` fail.
    pub fn fail_reads(&self, path: impl Into<PathBuf>) {
        self.faults.lock().reads.insert(path.into());
    }

    /// Makes every later write of `path` fail.
    pub fn fail_writes(&self, path: impl Into<PathBuf>) {
        self.faults.lock().writes.insert(path.into());
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ModeProvider for MemoryModeStore {
    fn read_mode(&self, path: &Path) -> Result<FileMode, ProbeError> {
        if self.faults.lock().reads.contains(path) {
            return Err(ProbeError::read(path, denied()));
        }
        self.get(path).ok_or_else(|| not_found(path))
    }

    fn write_mode(&self, path: &Path, mode: FileMode) -> Result<(), ProbeError> {
        if self.faults.lock().writes.contains(path) {
            return Err(ProbeError::write(path, denied()));
        }

        let mut modes = self.modes.lock();
        let slot = modes.get_mut(path).ok_or_else(|| not_found(path))?;
        *slot = mode;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
