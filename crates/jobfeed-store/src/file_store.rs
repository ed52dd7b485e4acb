//! JSON file store for saved vacancies.
//!
//! The backing file holds a single top-level JSON array of objects. Every
//! mutation reads the whole file, modifies the list in memory and rewrites
//! it through a temporary file that is renamed over the original, so a
//! crash mid-write leaves either the old or the new contents.
//!
//! There is no locking. Two processes mutating the same file can lose each
//! other's updates.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use jobfeed_core::error::AppError;
use jobfeed_core::record::{matches_criteria, same_record, Criteria, Record};
use jobfeed_core::traits::RecordStore;
use jobfeed_core::Vacancy;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// A directory that is known to exist and holds store files.
///
/// Creating one is the only place the data directory gets created, so a
/// [`JsonFileStore`] can never be opened against a missing root.
#[derive(Debug, Clone)]
pub struct StorageRoot {
    path: PathBuf,
}

impl StorageRoot {
    /// Creates `path` (and parents) if absent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the directory cannot be created.
    pub fn init(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        debug!("Storage root ready at {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// How the backing file was found when reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStatus {
    /// File parsed as an array of objects.
    Loaded,
    /// File does not exist yet.
    Missing,
    /// File exists but is not a JSON array of objects.
    Corrupt(String),
}

/// Records read from the backing file along with how they were obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreContents {
    pub records: Vec<Record>,
    pub status: ReadStatus,
}

impl StoreContents {
    fn empty(status: ReadStatus) -> Self {
        Self {
            records: Vec::new(),
            status,
        }
    }
}

/// Deduplicating, criteria-deletable record store backed by one JSON file.
///
/// # Examples
///
/// ```
/// use jobfeed_store::{JsonFileStore, StorageRoot};
/// use jobfeed_core::Vacancy;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let root = StorageRoot::init(dir.path().join("data"))?;
/// let store = JsonFileStore::open(&root, "vacancies.json")?;
///
/// let v = Vacancy::new("Rust Developer", "https://hh.ru/vacancy/1", Some(1), None, "Code")?;
/// assert!(store.add_vacancy(&v)?);
/// assert!(!store.add_vacancy(&v)?);
/// assert_eq!(store.get_all()?.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    path: PathBuf,
}

impl JsonFileStore {
    /// Resolves `name` under `root`. The file itself is not created.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidStoreName` unless `name` is a plain file
    /// name with no directory components.
    pub fn open(root: &StorageRoot, name: &str) -> Result<Self, AppError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(AppError::InvalidStoreName(name.to_string())),
        }

        Ok(Self {
            root: root.path().to_path_buf(),
            path: root.path().join(name),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the backing file, reporting whether it was missing or corrupt.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` for failures other than the file not existing,
    /// such as permission errors.
    pub fn load(&self) -> Result<StoreContents, AppError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(StoreContents::empty(ReadStatus::Missing))
            }
            Err(e) => return Err(e.into()),
        };

        let items = match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                return Ok(StoreContents::empty(ReadStatus::Corrupt(
                    "top-level value is not an array".to_string(),
                )))
            }
            Err(e) => return Ok(StoreContents::empty(ReadStatus::Corrupt(e.to_string()))),
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(record) => records.push(record),
                _ => {
                    return Ok(StoreContents::empty(ReadStatus::Corrupt(format!(
                        "element {} is not an object",
                        index
                    ))))
                }
            }
        }

        Ok(StoreContents {
            records,
            status: ReadStatus::Loaded,
        })
    }

    /// Returns every stored record; empty if the file is missing or corrupt.
    pub fn get_all(&self) -> Result<Vec<Record>, AppError> {
        let contents = self.load()?;
        if let ReadStatus::Corrupt(reason) = &contents.status {
            warn!(
                "Ignoring unreadable store file {}: {}",
                self.path.display(),
                reason
            );
        }
        Ok(contents.records)
    }

    /// Appends `record` unless an identical record is already stored.
    ///
    /// Identity is deep equality of the whole mapping, with numbers compared
    /// by value. Returns `true` if the record was written.
    pub fn add(&self, record: Record) -> Result<bool, AppError> {
        let mut records = self.get_all()?;
        if records.iter().any(|stored| same_record(stored, &record)) {
            debug!("Record already present in {}", self.path.display());
            return Ok(false);
        }

        records.push(record);
        self.write_all(&records)?;
        debug!(
            "Added record to {} ({} total)",
            self.path.display(),
            records.len()
        );
        Ok(true)
    }

    /// Removes every record matching all `criteria` pairs.
    ///
    /// Empty criteria match, and therefore remove, every record. When
    /// nothing matches the file is left untouched. Returns the number of
    /// records removed.
    pub fn delete(&self, criteria: &Criteria) -> Result<usize, AppError> {
        let records = self.get_all()?;
        let before = records.len();
        let kept: Vec<Record> = records
            .into_iter()
            .filter(|record| !matches_criteria(record, criteria))
            .collect();

        let removed = before - kept.len();
        if removed > 0 {
            self.write_all(&kept)?;
        }
        debug!(
            "Deleted {} record(s) from {} ({} left)",
            removed,
            self.path.display(),
            kept.len()
        );
        Ok(removed)
    }

    /// Stores a vacancy in its record form.
    pub fn add_vacancy(&self, vacancy: &Vacancy) -> Result<bool, AppError> {
        self.add(vacancy.to_record())
    }

    /// Converts stored records back into vacancies.
    ///
    /// Records that no longer validate are skipped with a warning rather
    /// than failing the whole read.
    pub fn vacancies(&self) -> Result<Vec<Vacancy>, AppError> {
        let records = self.get_all()?;
        let mut vacancies = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match Vacancy::from_record(record) {
                Ok(v) => vacancies.push(v),
                Err(e) => warn!(
                    "Skipping stored record #{} in {}: {}",
                    index,
                    self.path.display(),
                    e
                ),
            }
        }
        Ok(vacancies)
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize, AppError> {
        Ok(self.get_all()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }

    fn write_all(&self, records: &[Record]) -> Result<(), AppError> {
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        serde_json::to_writer_pretty(&mut tmp, records)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| AppError::Io(e.error))?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn read_all(&self) -> Result<Vec<Record>, AppError> {
        self.get_all()
    }

    fn append(&self, record: Record) -> Result<bool, AppError> {
        self.add(record)
    }

    fn remove_matching(&self, criteria: &Criteria) -> Result<usize, AppError> {
        self.delete(criteria)
    }
}
