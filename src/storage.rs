use crate::errors::StorageError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};
use tracing::error;

const TMP_EXTENSION: &str = "json.tmp";

/// The two independently persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Record {
    Moods,
    Notes,
}

impl Record {
    pub fn name(self) -> &'static str {
        match self {
            Record::Moods => "moods",
            Record::Notes => "notes",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Record::Moods => "moods.json",
            Record::Notes => "notes.json",
        }
    }
}

/// Byte-level key-value persistence for the entry store.
///
/// `read` returns `Ok(None)` when the record has never been written.
pub trait Backend {
    fn read(&mut self, record: Record) -> io::Result<Option<Vec<u8>>>;
    fn write(&mut self, record: Record, bytes: &[u8]) -> io::Result<()>;
}

/// One JSON file per record inside `dir`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, record: Record) -> PathBuf {
        self.dir.join(record.file_name())
    }
}

impl Backend for FileBackend {
    fn read(&mut self, record: Record) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(record)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&mut self, record: Record, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(record);
        let tmp = path.with_extension(TMP_EXTENSION);
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)
    }
}

/// Process-local backend, used when nothing should touch disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    records: HashMap<Record, Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: Record, bytes: impl Into<Vec<u8>>) -> Self {
        self.records.insert(record, bytes.into());
        self
    }

    pub fn get(&self, record: Record) -> Option<&[u8]> {
        self.records.get(&record).map(Vec::as_slice)
    }
}

impl Backend for MemoryBackend {
    fn read(&mut self, record: Record) -> io::Result<Option<Vec<u8>>> {
        Ok(self.records.get(&record).cloned())
    }

    fn write(&mut self, record: Record, bytes: &[u8]) -> io::Result<()> {
        self.records.insert(record, bytes.to_vec());
        Ok(())
    }
}

/// Reads a record as a JSON object. Missing, unreadable or malformed records
/// all come back empty.
pub fn load_object<B: Backend + ?Sized>(backend: &mut B, record: Record) -> Map<String, Value> {
    let bytes = match backend.read(record) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Map::new(),
        Err(source) => {
            let err = StorageError::Read {
                record: record.name(),
                source,
            };
            error!("{err}");
            return Map::new();
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            error!(
                "failed to parse {} record: expected a JSON object, found {}",
                record.name(),
                json_kind(&other)
            );
            Map::new()
        }
        Err(err) => {
            error!("failed to parse {} record: {err}", record.name());
            Map::new()
        }
    }
}

pub fn persist_object<B, T>(backend: &mut B, record: Record, value: &T) -> Result<(), StorageError>
where
    B: Backend + ?Sized,
    T: Serialize,
{
    let payload = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Encode {
        record: record.name(),
        source,
    })?;
    backend
        .write(record, &payload)
        .map_err(|source| StorageError::Write {
            record: record.name(),
            source,
        })
}

pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
