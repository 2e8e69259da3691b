//! Player progress and preferences
//!
//! A single small record holds the unlocked-level watermark and the audio
//! volumes. It is loaded lazily at startup, written back on every mutation,
//! and flushed once more on shutdown, so the file on disk never lags the
//! in-memory state.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::PersistenceError;

/// Well-known progress file location, relative to the working directory
pub const PROGRESS_FILE: &str = "config/progress.json";

/// Persisted progress-and-settings record.
///
/// `unlocked_level` is a 0-based watermark: the highest level index the
/// player may enter. It only ever moves forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawRecord")]
pub struct ProgressRecord {
    /// Music volume, 0.0 - 1.0
    pub music_volume: f32,
    /// Sound effects volume, 0.0 - 1.0
    pub sfx_volume: f32,
    /// Highest unlocked level index (0-based)
    pub unlocked_level: u32,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            music_volume: 1.0,
            sfx_volume: 1.0,
            unlocked_level: 0,
        }
    }
}

/// On-disk shape, tolerant of the older save format.
///
/// Early saves stored a 1-based `unlockedLevels` list instead of the
/// watermark; those are migrated on load and rewritten in the new shape on
/// the next save.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default = "full_volume")]
    music_volume: f32,
    #[serde(default = "full_volume")]
    sfx_volume: f32,
    #[serde(default)]
    unlocked_level: Option<u32>,
    #[serde(default)]
    unlocked_levels: Option<Vec<u32>>,
}

fn full_volume() -> f32 {
    1.0
}

impl From<RawRecord> for ProgressRecord {
    fn from(raw: RawRecord) -> Self {
        let unlocked_level = match (raw.unlocked_level, raw.unlocked_levels) {
            (Some(watermark), _) => watermark,
            (None, Some(list)) => list
                .iter()
                .max()
                .map(|&n| n.saturating_sub(1))
                .unwrap_or(0),
            (None, None) => 0,
        };
        Self {
            music_volume: raw.music_volume.clamp(0.0, 1.0),
            sfx_volume: raw.sfx_volume.clamp(0.0, 1.0),
            unlocked_level,
        }
    }
}

/// Durable storage for the progress record.
pub trait ProgressStore {
    /// Load the stored record; `Ok(None)` means nothing has been saved yet
    fn load(&mut self) -> Result<Option<ProgressRecord>, PersistenceError>;
    /// Write the record to storage
    fn save(&mut self, record: &ProgressRecord) -> Result<(), PersistenceError>;
}

/// JSON file storage at a fixed path.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the crate's well-known location
    pub fn at_default_path() -> Self {
        Self::new(PROGRESS_FILE)
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<ProgressRecord>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        let record = serde_json::from_str(&json)?;
        Ok(Some(record))
    }

    fn save(&mut self, record: &ProgressRecord) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(record)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory storage, used by tests and as the silent fallback when the
/// real store is unreadable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Option<ProgressRecord>,
}

impl ProgressStore for MemoryStore {
    fn load(&mut self) -> Result<Option<ProgressRecord>, PersistenceError> {
        Ok(self.record.clone())
    }

    fn save(&mut self, record: &ProgressRecord) -> Result<(), PersistenceError> {
        self.record = Some(record.clone());
        Ok(())
    }
}

/// Progression tracker: owns the record and the store behind it.
///
/// Every mutation clamps/validates, updates the in-memory record and
/// persists before returning. Save failures are logged and do not block
/// gameplay.
pub struct Progression {
    record: ProgressRecord,
    store: Box<dyn ProgressStore>,
}

impl Progression {
    /// Load progress from the given store, synthesizing and immediately
    /// writing defaults on first run. An unreadable store degrades to
    /// in-memory defaults for the session without clobbering the file.
    pub fn load(mut store: Box<dyn ProgressStore>) -> Self {
        match store.load() {
            Ok(Some(record)) => {
                log::info!(
                    "Loaded progress: unlocked level {}, music {:.2}, sfx {:.2}",
                    record.unlocked_level,
                    record.music_volume,
                    record.sfx_volume
                );
                Self { record, store }
            }
            Ok(None) => {
                log::info!("No saved progress found, starting fresh");
                let mut progression = Self {
                    record: ProgressRecord::default(),
                    store,
                };
                progression.persist();
                progression
            }
            Err(e) => {
                log::warn!("Progress unreadable ({e}), using defaults for this session");
                Self {
                    record: ProgressRecord::default(),
                    store,
                }
            }
        }
    }

    /// Current record (read-only)
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    /// Highest unlocked level index
    pub fn unlocked_level(&self) -> u32 {
        self.record.unlocked_level
    }

    /// Whether the player may enter the given level
    pub fn is_unlocked(&self, index: usize) -> bool {
        index as u32 <= self.record.unlocked_level
    }

    /// Unlock the level after `current`, if there is one and it is not
    /// already unlocked. Idempotent; the watermark never regresses.
    /// Returns whether the watermark advanced.
    pub fn unlock_next(&mut self, current: usize, total_levels: usize) -> bool {
        let next = current + 1;
        if next >= total_levels {
            return false;
        }
        if next as u32 <= self.record.unlocked_level {
            return false;
        }
        self.record.unlocked_level = next as u32;
        log::info!("Unlocked level {next}");
        self.persist();
        true
    }

    /// Set and persist the music volume; returns the clamped value
    pub fn set_music_volume(&mut self, volume: f32) -> f32 {
        self.record.music_volume = volume.clamp(0.0, 1.0);
        self.persist();
        self.record.music_volume
    }

    /// Set and persist the sound effects volume; returns the clamped value
    pub fn set_sfx_volume(&mut self, volume: f32) -> f32 {
        self.record.sfx_volume = volume.clamp(0.0, 1.0);
        self.persist();
        self.record.sfx_volume
    }

    /// Final write on shutdown
    pub fn flush(&mut self) {
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.record) {
            log::warn!("Failed to save progress: {e}");
        }
    }
}
