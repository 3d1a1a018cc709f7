//! Pinned race storage
//!
//! Pins are an ordered, duplicate-free list of listing ids (e.g. `2024-5`).
//! The store itself is an opaque get/set of that list. Storage failures never
//! reach the caller: reads fall back to an empty list, writes keep the
//! in-memory result, and every fault goes to a [`FaultSink`].

use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name used for the pin set inside the data directory
pub const PINS_FILE_NAME: &str = "pinned_races.json";

/// Error type for pin store operations
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum PinStoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Corrupt pin data: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for PinStoreError {
    fn from(err: std::io::Error) -> Self {
        PinStoreError::Io(err.to_string())
    }
}

/// Get/set persistence for the pin set
pub trait PinStore {
    fn get(&self) -> Result<Vec<String>, PinStoreError>;
    fn set(&self, pins: &[String]) -> Result<(), PinStoreError>;
}

impl<S: PinStore + ?Sized> PinStore for Box<S> {
    fn get(&self) -> Result<Vec<String>, PinStoreError> {
        (**self).get()
    }

    fn set(&self, pins: &[String]) -> Result<(), PinStoreError> {
        (**self).set(pins)
    }
}

/// Pin set stored as a JSON array in a file
///
/// A missing or blank file is an empty pin set.
#[derive(Debug, Clone)]
pub struct FilePinStore {
    path: PathBuf,
}

impl FilePinStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `{data_dir}/pinned_races.json`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(PINS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PinStore for FilePinStore {
    fn get(&self) -> Result<Vec<String>, PinStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|e| PinStoreError::Corrupt(e.to_string()))
    }

    fn set(&self, pins: &[String]) -> Result<(), PinStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json =
            serde_json::to_string(pins).map_err(|e| PinStoreError::Corrupt(e.to_string()))?;

        // Swap in a fully written sibling so the pin file is never half written
        let staging = self.staging_path();
        fs::write(&staging, json)?;
        if let Err(err) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(err.into());
        }
        Ok(())
    }
}

/// Pin set that lives only as long as the process
///
/// Used when no data directory is available; pins do not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryPinStore {
    pins: RefCell<Vec<String>>,
}

impl MemoryPinStore {
    pub fn new(pins: Vec<String>) -> Self {
        Self {
            pins: RefCell::new(pins),
        }
    }
}

impl PinStore for MemoryPinStore {
    fn get(&self) -> Result<Vec<String>, PinStoreError> {
        Ok(self.pins.borrow().clone())
    }

    fn set(&self, pins: &[String]) -> Result<(), PinStoreError> {
        *self.pins.borrow_mut() = pins.to_vec();
        Ok(())
    }
}

/// A recovered storage failure
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceFault {
    Read(PinStoreError),
    Write(PinStoreError),
}

impl fmt::Display for PersistenceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceFault::Read(err) => write!(f, "Error reading pinned races: {err}"),
            PersistenceFault::Write(err) => write!(f, "Error saving pinned races: {err}"),
        }
    }
}

/// Receives storage faults that were recovered from
pub trait FaultSink {
    fn report(&self, fault: &PersistenceFault);
}

impl<F: Fn(&PersistenceFault)> FaultSink for F {
    fn report(&self, fault: &PersistenceFault) {
        self(fault)
    }
}

/// Flip membership of `id`: remove it when present, append it otherwise
///
/// The relative order of the other pins is preserved.
pub fn toggle_pin(mut pins: Vec<String>, id: &str) -> Vec<String> {
    match pins.iter().position(|pin| pin == id) {
        Some(index) => {
            pins.remove(index);
        }
        None => pins.push(id.to_string()),
    }
    pins
}

/// Drop repeated ids, keeping the first occurrence
pub fn dedup_pins(pins: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(pins.len());
    for pin in pins {
        if !unique.contains(&pin) {
            unique.push(pin);
        }
    }
    unique
}

/// Pin set operations over a store, reporting faults instead of failing
pub struct Pins<S, F> {
    store: S,
    sink: F,
}

impl<S: PinStore, F: FaultSink> Pins<S, F> {
    pub fn new(store: S, sink: F) -> Self {
        Self { store, sink }
    }

    /// Current pins, or an empty list when the store cannot be read
    pub fn load(&self) -> Vec<String> {
        match self.store.get() {
            Ok(pins) => dedup_pins(pins),
            Err(err) => {
                self.sink.report(&PersistenceFault::Read(err));
                Vec::new()
            }
        }
    }

    /// Write `pins`; a failed write is reported and otherwise ignored
    pub fn save(&self, pins: &[String]) {
        if let Err(err) = self.store.set(pins) {
            self.sink.report(&PersistenceFault::Write(err));
        }
    }

    /// Toggle `id` in the persisted set and return the new set
    pub fn toggle(&self, id: &str) -> Vec<String> {
        let updated = toggle_pin(self.load(), id);
        self.save(&updated);
        updated
    }

    /// Remove every pin
    pub fn clear(&self) -> Vec<String> {
        self.save(&[]);
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn pins(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    /// Store whose reads and writes can be made to fail
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryPinStore,
        fail_reads: bool,
        fail_writes: bool,
        writes: RefCell<Vec<Vec<String>>>,
    }

    impl PinStore for FlakyStore {
        fn get(&self) -> Result<Vec<String>, PinStoreError> {
            if self.fail_reads {
                return Err(PinStoreError::Io("storage unavailable".to_string()));
            }
            self.inner.get()
        }

        fn set(&self, pins: &[String]) -> Result<(), PinStoreError> {
            self.writes.borrow_mut().push(pins.to_vec());
            if self.fail_writes {
                return Err(PinStoreError::Io("quota exceeded".to_string()));
            }
            self.inner.set(pins)
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        faults: Rc<RefCell<Vec<PersistenceFault>>>,
    }

    impl FaultSink for RecordingSink {
        fn report(&self, fault: &PersistenceFault) {
            self.faults.borrow_mut().push(fault.clone());
        }
    }

    fn memory_pins(initial: &[&str]) -> Pins<MemoryPinStore, RecordingSink> {
        Pins::new(MemoryPinStore::new(pins(initial)), RecordingSink::default())
    }

    #[test]
    fn test_toggle_pin_appends() {
        assert_eq!(
            toggle_pin(pins(&["2024-1", "2024-3"]), "2024-5"),
            pins(&["2024-1", "2024-3", "2024-5"])
        );
    }

    #[test]
    fn test_toggle_pin_removes_preserving_order() {
        assert_eq!(
            toggle_pin(pins(&["2024-1", "2024-3", "2024-5"]), "2024-3"),
            pins(&["2024-1", "2024-5"])
        );
    }

    #[test]
    fn test_toggle_pin_appends_at_end_not_sorted() {
        assert_eq!(
            toggle_pin(pins(&["2024-1", "2024-3"]), "2024-2"),
            pins(&["2024-1", "2024-3", "2024-2"])
        );
    }

    #[test]
    fn test_double_toggle_restores_original() {
        let original = pins(&["2024-1", "2024-3", "2024-5"]);

        for id in ["2024-3", "2024-7", "2024-1"] {
            let once = toggle_pin(original.clone(), id);
            assert_ne!(once, original);
            assert_eq!(toggle_pin(once, id), original, "double toggle of {id}");
        }
    }

    #[test]
    fn test_dedup_pins_keeps_first() {
        assert_eq!(
            dedup_pins(pins(&["2024-3", "2024-1", "2024-3"])),
            pins(&["2024-3", "2024-1"])
        );
    }

    #[test]
    fn test_pins_toggle_persists() {
        let service = memory_pins(&["2024-1", "2024-3"]);

        let result = service.toggle("2024-5");

        assert_eq!(result, pins(&["2024-1", "2024-3", "2024-5"]));
        assert_eq!(service.load(), result);

        let result = service.toggle("2024-3");
        assert_eq!(result, pins(&["2024-1", "2024-5"]));
        assert_eq!(service.load(), result);
        assert!(service.sink.faults.borrow().is_empty());
    }

    #[test]
    fn test_pins_remove_last() {
        let service = memory_pins(&["2024-1"]);
        assert!(service.toggle("2024-1").is_empty());
        assert!(service.load().is_empty());
    }

    #[test]
    fn test_pins_clear() {
        let service = memory_pins(&["2024-1", "2024-2"]);
        assert!(service.clear().is_empty());
        assert!(service.load().is_empty());
    }

    #[test]
    fn test_read_failure_returns_empty_and_reports() {
        let sink = RecordingSink::default();
        let store = FlakyStore {
            fail_reads: true,
            ..Default::default()
        };
        let service = Pins::new(store, sink.clone());

        assert!(service.load().is_empty());

        let faults = sink.faults.borrow();
        assert_eq!(faults.len(), 1);
        assert!(matches!(faults[0], PersistenceFault::Read(_)));
    }

    #[test]
    fn test_toggle_with_read_failure_still_returns_result() {
        let sink = RecordingSink::default();
        let store = FlakyStore {
            fail_reads: true,
            ..Default::default()
        };
        let service = Pins::new(store, sink.clone());

        assert_eq!(service.toggle("2024-1"), pins(&["2024-1"]));
        assert_eq!(*service.store.writes.borrow(), vec![pins(&["2024-1"])]);
        assert_eq!(sink.faults.borrow().len(), 1);
    }

    #[test]
    fn test_toggle_with_write_failure_returns_in_memory_result() {
        let sink = RecordingSink::default();
        let store = FlakyStore {
            inner: MemoryPinStore::new(pins(&["2024-1"])),
            fail_writes: true,
            ..Default::default()
        };
        let service = Pins::new(store, sink.clone());

        assert_eq!(service.toggle("2024-2"), pins(&["2024-1", "2024-2"]));

        let faults = sink.faults.borrow();
        assert_eq!(faults.len(), 1);
        assert_eq!(
            faults[0].to_string(),
            "Error saving pinned races: IO error: quota exceeded"
        );
    }

    #[test]
    fn test_closure_sink() {
        let seen = RefCell::new(Vec::new());
        let store = FlakyStore {
            fail_reads: true,
            ..Default::default()
        };
        let service = Pins::new(store, |fault: &PersistenceFault| {
            seen.borrow_mut().push(fault.to_string())
        });

        service.load();

        assert_eq!(
            *seen.borrow(),
            vec!["Error reading pinned races: IO error: storage unavailable".to_string()]
        );
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePinStore::in_dir(temp_dir.path());

        assert_eq!(store.get().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_file_store_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePinStore::in_dir(&temp_dir.path().join("nested").join("pitwall"));

        store.set(&pins(&["2024-1", "2024-3"])).unwrap();

        assert_eq!(store.get().unwrap(), pins(&["2024-1", "2024-3"]));
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            r#"["2024-1","2024-3"]"#
        );
    }

    #[test]
    fn test_file_store_set_replaces_without_leftovers() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePinStore::in_dir(temp_dir.path());

        store.set(&pins(&["2024-1", "2024-3", "2024-5"])).unwrap();
        store.set(&pins(&["2024-7"])).unwrap();

        assert_eq!(store.get().unwrap(), pins(&["2024-7"]));
        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_file_store_failed_write_keeps_previous_pins() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePinStore::in_dir(temp_dir.path());
        store.set(&pins(&["2024-1", "2024-3"])).unwrap();

        // A directory where the staging file goes makes the write fail midway
        fs::create_dir(store.staging_path()).unwrap();

        assert!(matches!(
            store.set(&pins(&["2024-9"])),
            Err(PinStoreError::Io(_))
        ));
        assert_eq!(store.get().unwrap(), pins(&["2024-1", "2024-3"]));
    }

    #[test]
    fn test_file_store_blank_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePinStore::in_dir(temp_dir.path());
        fs::write(store.path(), "  \n").unwrap();

        assert!(store.get().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePinStore::in_dir(temp_dir.path());
        fs::write(store.path(), "invalid-json").unwrap();

        assert!(matches!(store.get(), Err(PinStoreError::Corrupt(_))));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePinStore::in_dir(temp_dir.path());
        fs::write(store.path(), "invalid-json").unwrap();

        let sink = RecordingSink::default();
        let service = Pins::new(store, sink.clone());

        assert!(service.load().is_empty());
        assert_eq!(sink.faults.borrow().len(), 1);

        // The next toggle overwrites the corrupt file
        assert_eq!(service.toggle("2024-5"), pins(&["2024-5"]));
        assert_eq!(service.load(), pins(&["2024-5"]));
    }

    #[test]
    fn test_boxed_store() {
        let store: Box<dyn PinStore> = Box::new(MemoryPinStore::default());
        let service = Pins::new(store, RecordingSink::default());

        assert_eq!(service.toggle("1950-1"), pins(&["1950-1"]));
    }
}
