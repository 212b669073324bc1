//! CSV Geo Cache
//!
//! Implements GeoCache as an in-memory map mirrored to an append-only CSV
//! log. The same implementation backs the point cache and the box cache;
//! the value type decides the log columns.

use crate::domain::ports::{CacheError, GeoCache};
use crate::domain::value_objects::{GeoBox, GeoPoint};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Header of the key column in every cache log.
pub const KEY_COLUMN: &str = "location_text";

/// A value that can be written to and read from one cache log row.
pub trait CacheRecord: Copy + Send + Sync + 'static {
    /// Value columns, in log order, following the key column.
    const COLUMNS: &'static [&'static str];

    /// Encode the value as one field per column.
    fn to_fields(&self) -> Vec<String>;

    /// Decode a value from fields ordered as `COLUMNS`.
    ///
    /// Returns None for anything that is not a valid value.
    fn from_fields(fields: &[&str]) -> Option<Self>;
}

fn parse_degrees(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl CacheRecord for GeoPoint {
    const COLUMNS: &'static [&'static str] = &["lat", "lon"];

    fn to_fields(&self) -> Vec<String> {
        vec![self.lat.to_string(), self.lon.to_string()]
    }

    fn from_fields(fields: &[&str]) -> Option<Self> {
        match fields {
            [lat, lon] => {
                let point = GeoPoint::new(parse_degrees(lat)?, parse_degrees(lon)?);
                point.is_valid().then_some(point)
            }
            _ => None,
        }
    }
}

impl CacheRecord for GeoBox {
    const COLUMNS: &'static [&'static str] = &["south", "north", "west", "east"];

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.south().to_string(),
            self.north().to_string(),
            self.west().to_string(),
            self.east().to_string(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Option<Self> {
        match fields {
            [south, north, west, east] => GeoBox::new(
                parse_degrees(south)?,
                parse_degrees(north)?,
                parse_degrees(west)?,
                parse_degrees(east)?,
            ),
            _ => None,
        }
    }
}

/// Durable write-through cache backed by a CSV log.
///
/// Stores append to the log first and update memory only once the append
/// has been flushed and synced. A single writer lock covers both steps, so
/// concurrent stores never interleave records. On reload the last record
/// for a key wins.
pub struct CsvGeoCache<V> {
    path: PathBuf,
    entries: RwLock<HashMap<String, V>>,
}

impl<V: CacheRecord> CsvGeoCache<V> {
    /// Create an empty cache for a log path without touching the file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Create a cache and load its log, creating the file if missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let cache = Self::new(path);
        cache.load()?;
        Ok(cache)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the durable log into memory, replacing the current contents.
    ///
    /// Malformed rows are skipped. A missing log is created empty.
    ///
    /// # Returns
    /// The number of distinct places held after loading
    pub fn load(&self) -> Result<usize, CacheError> {
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|source| self.unavailable(source))?;

        let (loaded, skipped) = self.read_log(file)?;
        let count = loaded.len();
        *self.entries.write() = loaded;

        if skipped > 0 {
            tracing::warn!(
                "skipped {} malformed rows in cache log {}",
                skipped,
                self.path.display()
            );
        }
        tracing::info!(
            "loaded {} items from cache {}",
            count,
            self.path.display()
        );
        Ok(count)
    }

    fn read_log(&self, file: File) -> Result<(HashMap<String, V>, usize), CacheError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = match reader.headers() {
            Ok(h) => h.clone(),
            Err(e) if e.is_io_error() => return Err(self.unavailable(e.into())),
            Err(e) => return Err(self.corrupt(format!("unreadable header: {}", e))),
        };

        if headers.is_empty() {
            return Ok((HashMap::new(), 0));
        }

        let position = |name: &str| headers.iter().position(|h| h == name);
        let (Some(key_idx), Some(value_idx)) = (
            position(KEY_COLUMN),
            V::COLUMNS
                .iter()
                .map(|&c| position(c))
                .collect::<Option<Vec<usize>>>(),
        ) else {
            return Err(self.corrupt(format!(
                "header {:?} lacks columns {:?}",
                headers.iter().collect::<Vec<_>>(),
                std::iter::once(KEY_COLUMN)
                    .chain(V::COLUMNS.iter().copied())
                    .collect::<Vec<_>>()
            )));
        };

        let mut entries = HashMap::new();
        let mut skipped = 0;

        for result in reader.records() {
            let record = match result {
                Ok(r) => r,
                Err(e) if e.is_io_error() => return Err(self.unavailable(e.into())),
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };

            let key = match record.get(key_idx) {
                Some(k) if !k.is_empty() => k,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let fields: Option<Vec<&str>> = value_idx.iter().map(|&i| record.get(i)).collect();
            match fields.as_deref().and_then(V::from_fields) {
                // Later rows overwrite earlier ones
                Some(value) => {
                    entries.insert(key.to_string(), value);
                }
                None => skipped += 1,
            }
        }

        Ok((entries, skipped))
    }

    /// Append one record, writing the header first if the log is empty.
    ///
    /// A log whose last line lacks its newline is terminated first, so the
    /// new record never merges into the previous one.
    fn append(&self, place: &str, value: &V) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        let len = file.metadata()?.len();
        let write_header = len == 0;

        if len > 0 && !ends_with_newline(&mut file)? {
            file.write_all(b"\n")?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            writer.write_record(std::iter::once(KEY_COLUMN).chain(V::COLUMNS.iter().copied()))?;
        }

        let mut record = Vec::with_capacity(V::COLUMNS.len() + 1);
        record.push(place.to_string());
        record.extend(value.to_fields());
        writer.write_record(&record)?;

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_data()
    }

    fn corrupt(&self, reason: String) -> CacheError {
        CacheError::Corrupt {
            path: self.path.clone(),
            reason,
        }
    }

    fn unavailable(&self, source: io::Error) -> CacheError {
        CacheError::Unavailable {
            path: self.path.clone(),
            source,
        }
    }
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

impl<V: CacheRecord> GeoCache<V> for CsvGeoCache<V> {
    fn lookup(&self, place: &str) -> Option<V> {
        self.entries.read().get(place).copied()
    }

    fn store(&self, place: &str, value: V) -> Result<(), CacheError> {
        let mut entries = self.entries.write();

        self.append(place, &value)
            .map_err(|source| CacheError::Append {
                path: self.path.clone(),
                source,
            })?;
        entries.insert(place.to_string(), value);

        tracing::debug!("appended {:?} to cache log {}", place, self.path.display());
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}
