//! Best-score ledger
//!
//! One best record per game mode, persisted through a `BestScoreStore`. Only
//! a strict win over the stored best is written. Store failures degrade to
//! "no best yet" on read and a logged, dropped write on save.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::format_percent;
use crate::platform;
use crate::settings::GameMode;
use crate::sim::RunStats;

/// A finished run's score
///
/// Serialized as `{ points, accuracy, hitsCenter, date }` with an ISO-8601
/// `date`, the layout browser saves already use under the same keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub points: u32,
    /// 0..=1
    pub accuracy: f64,
    pub hits_center: u32,
    /// Unix timestamp (ms) when achieved
    #[serde(rename = "date", alias = "timestamp", default, with = "score_date")]
    pub timestamp: f64,
}

/// `date` is written as an ISO string and read from either an ISO string or
/// Unix ms. An unparsable date reads as the epoch.
mod score_date {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::platform;

    pub fn serialize<S: Serializer>(ms: &f64, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&platform::iso_from_unix_ms(*ms))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(f64),
        Iso(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
        Ok(match Raw::deserialize(de)? {
            Raw::Millis(ms) => ms,
            Raw::Iso(text) => platform::unix_ms_from_iso(&text).unwrap_or(0.0),
        })
    }
}

impl ScoreRecord {
    pub fn from_stats(stats: &RunStats, timestamp: f64) -> Self {
        Self {
            points: stats.points,
            accuracy: stats.accuracy(),
            hits_center: stats.hits_center,
            timestamp,
        }
    }

    /// Rank against another record: points, then accuracy, then center hits
    pub fn rank(&self, other: &ScoreRecord) -> Ordering {
        self.points
            .cmp(&other.points)
            .then(
                self.accuracy
                    .partial_cmp(&other.accuracy)
                    .unwrap_or(Ordering::Equal),
            )
            .then(self.hits_center.cmp(&other.hits_center))
    }

    /// Whether this record strictly beats `current` (absent always loses)
    pub fn beats(&self, current: Option<&ScoreRecord>) -> bool {
        match current {
            None => true,
            Some(best) => self.rank(best) == Ordering::Greater,
        }
    }

    /// Best-score readout ("120 pts • 87.5% • C:14 • Oct 19"); the date is
    /// left off when the record has none
    pub fn summary(&self) -> String {
        let line = format!(
            "{} pts • {} • C:{}",
            self.points,
            format_percent(self.accuracy),
            self.hits_center
        );
        if self.timestamp > 0.0 {
            format!("{line} • {}", platform::short_date(self.timestamp))
        } else {
            line
        }
    }
}

/// Key-value store holding one record per key
pub trait BestScoreStore {
    fn get(&self, key: &str) -> Result<Option<ScoreRecord>, StoreError>;
    fn put(&mut self, key: &str, record: &ScoreRecord) -> Result<(), StoreError>;
}

/// In-memory store (tests, headless runs without persistence)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, ScoreRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BestScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<ScoreRecord>, StoreError> {
        Ok(self.records.get(key).copied())
    }

    fn put(&mut self, key: &str, record: &ScoreRecord) -> Result<(), StoreError> {
        self.records.insert(key.to_string(), *record);
        Ok(())
    }
}

/// Native store: one JSON document mapping keys to records
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, ScoreRecord>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl BestScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<ScoreRecord>, StoreError> {
        Ok(self.read_all()?.get(key).copied())
    }

    fn put(&mut self, key: &str, record: &ScoreRecord) -> Result<(), StoreError> {
        // A corrupt document is replaced; a file we cannot read is left alone
        let mut all = match self.read_all() {
            Ok(all) => all,
            Err(StoreError::Serialize(e)) => {
                log::warn!("Discarding corrupt score file {}: {e}", self.path.display());
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        all.insert(key.to_string(), *record);

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        // Write to a sibling tmp file then rename, so a crash never truncates
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&all)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Browser store backed by LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage not available".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl BestScoreStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<ScoreRecord>, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(key) {
            Ok(Some(json)) => Ok(Some(serde_json::from_str(&json)?)),
            Ok(None) => Ok(None),
            Err(_) => Err(StoreError::Unavailable(format!("could not read {key}"))),
        }
    }

    fn put(&mut self, key: &str, record: &ScoreRecord) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(record)?;
        storage
            .set_item(key, &json)
            .map_err(|_| StoreError::Unavailable(format!("could not write {key}")))
    }
}

/// Outcome of submitting a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Submission {
    /// Beat the stored best (or there was none) and was written
    NewBest,
    /// Did not beat the stored best
    NotBetter,
    /// Beat the stored best but the write failed
    Unsaved,
}

/// Per-mode best scores over a store
#[derive(Debug, Clone, Default)]
pub struct ScoreLedger<S: BestScoreStore> {
    store: S,
}

impl<S: BestScoreStore> ScoreLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored best for a mode; unreadable data counts as no best
    pub fn best(&self, mode: GameMode) -> Option<ScoreRecord> {
        match self.store.get(mode.storage_key()) {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Ignoring unreadable {} best score: {e}", mode.as_str());
                None
            }
        }
    }

    /// Compare a finished run against the stored best and persist a strict win
    pub fn submit(&mut self, mode: GameMode, record: &ScoreRecord) -> Submission {
        let current = self.best(mode);
        if !record.beats(current.as_ref()) {
            return Submission::NotBetter;
        }

        match self.store.put(mode.storage_key(), record) {
            Ok(()) => {
                log::info!("New {} best: {}", mode.as_str(), record.summary());
                Submission::NewBest
            }
            Err(e) => {
                log::warn!("Could not save {} best score: {e}", mode.as_str());
                Submission::Unsaved
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(points: u32, accuracy: f64, hits_center: u32) -> ScoreRecord {
        ScoreRecord {
            points,
            accuracy,
            hits_center,
            timestamp: 0.0,
        }
    }

    /// Store whose reads and writes always fail
    struct BrokenStore;

    impl BestScoreStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<ScoreRecord>, StoreError> {
            Err(StoreError::Unavailable("broken".to_string()))
        }

        fn put(&mut self, _key: &str, _record: &ScoreRecord) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("broken".to_string()))
        }
    }

    #[test]
    fn test_comparator_tiers() {
        let stored = record(100, 0.9, 4);
        assert!(record(100, 0.9, 5).beats(Some(&stored)));
        assert!(record(100, 0.95, 0).beats(Some(&stored)));
        assert!(record(101, 0.1, 0).beats(Some(&stored)));
        assert!(!record(99, 1.0, 50).beats(Some(&stored)));
        assert!(!record(100, 0.9, 4).beats(Some(&stored)));
        assert!(record(0, 0.0, 0).beats(None));
    }

    #[test]
    fn test_submit_persists_only_strict_wins() {
        let mut ledger = ScoreLedger::new(MemoryStore::new());
        assert_eq!(ledger.best(GameMode::Timed), None);

        let first = record(100, 0.9, 4);
        assert_eq!(ledger.submit(GameMode::Timed, &first), Submission::NewBest);

        let tie = ScoreRecord {
            timestamp: 99.0,
            ..first
        };
        assert_eq!(ledger.submit(GameMode::Timed, &tie), Submission::NotBetter);
        assert_eq!(ledger.best(GameMode::Timed), Some(first));

        let better = record(100, 0.9, 5);
        assert_eq!(ledger.submit(GameMode::Timed, &better), Submission::NewBest);
        assert_eq!(ledger.best(GameMode::Timed), Some(better));
    }

    #[test]
    fn test_modes_are_independent() {
        let mut ledger = ScoreLedger::new(MemoryStore::new());
        ledger.submit(GameMode::Timed, &record(300, 1.0, 10));

        assert_eq!(ledger.best(GameMode::Tracking), None);
        assert_eq!(
            ledger.submit(GameMode::Tracking, &record(5, 0.5, 0)),
            Submission::NewBest
        );
        assert_eq!(ledger.best(GameMode::Timed).map(|r| r.points), Some(300));
    }

    #[test]
    fn test_broken_store_never_blocks() {
        let mut ledger = ScoreLedger::new(BrokenStore);
        assert_eq!(ledger.best(GameMode::Timed), None);
        assert_eq!(
            ledger.submit(GameMode::Timed, &record(10, 0.5, 1)),
            Submission::Unsaved
        );
    }

    #[test]
    fn test_summary() {
        assert_eq!(record(120, 0.875, 14).summary(), "120 pts • 87.5% • C:14");

        let dated = ScoreRecord {
            timestamp: platform::unix_ms_from_iso("2026-10-19T12:00:00.000Z").unwrap(),
            ..record(120, 0.875, 14)
        };
        assert_eq!(dated.summary(), "120 pts • 87.5% • C:14 • Oct 19");
    }

    #[test]
    fn test_reads_browser_saved_record() {
        let json = r#"{"points":57,"accuracy":0.8142857142857143,"hitsCenter":19,"date":"2025-03-04T18:22:10.512Z"}"#;
        let rec: ScoreRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.points, 57);
        assert_eq!(rec.hits_center, 19);
        assert_eq!(
            platform::iso_from_unix_ms(rec.timestamp),
            "2025-03-04T18:22:10.512Z"
        );

        let written = serde_json::to_value(rec).unwrap();
        assert_eq!(written["hitsCenter"], 19);
        assert_eq!(written["date"], "2025-03-04T18:22:10.512Z");
        assert!(written.get("hits_center").is_none());

        // An unreadable date does not cost the record
        let json = r#"{"points":3,"accuracy":1.0,"hitsCenter":1,"date":"someday"}"#;
        let rec: ScoreRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.timestamp, 0.0);
    }

    #[test]
    fn test_stored_browser_best_is_not_overwritten_by_worse_run() {
        let mut store = MemoryStore::new();
        let saved: ScoreRecord = serde_json::from_str(
            r#"{"points":200,"accuracy":0.9,"hitsCenter":70,"date":"2025-03-04T18:22:10.512Z"}"#,
        )
        .unwrap();
        store.put(GameMode::Timed.storage_key(), &saved).unwrap();

        let mut ledger = ScoreLedger::new(store);
        assert_eq!(
            ledger.submit(GameMode::Timed, &record(150, 1.0, 60)),
            Submission::NotBetter
        );
        assert_eq!(ledger.best(GameMode::Timed), Some(saved));
    }

    #[test]
    fn test_file_store_round_trip_and_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores").join("best.json");
        let mut store = JsonFileStore::new(&path);

        assert_eq!(store.get("bullseye_high_timed_v3").unwrap(), None);

        let rec = record(42, 0.75, 3);
        store.put("bullseye_high_timed_v3", &rec).unwrap();
        assert_eq!(store.get("bullseye_high_timed_v3").unwrap(), Some(rec));
        assert_eq!(store.get("bullseye_high_tracking_v3").unwrap(), None);

        std::fs::write(&path, "{ definitely not json").unwrap();
        assert!(matches!(
            store.get("bullseye_high_timed_v3"),
            Err(StoreError::Serialize(_))
        ));

        // The ledger reads corruption as "no best" and overwrites it
        let mut ledger = ScoreLedger::new(store);
        assert_eq!(ledger.best(GameMode::Timed), None);
        assert_eq!(ledger.submit(GameMode::Timed, &rec), Submission::NewBest);
        assert_eq!(ledger.best(GameMode::Timed), Some(rec));
    }

    #[test]
    fn test_file_store_put_leaves_unreadable_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best.json");
        let mut store = JsonFileStore::new(&path);
        let timed = record(42, 0.75, 3);
        store.put("bullseye_high_timed_v3", &timed).unwrap();

        // A directory in place of the file fails reads with an I/O error
        // that is not NotFound, whoever runs the test
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(
            store.put("bullseye_high_tracking_v3", &record(5, 0.5, 0)),
            Err(StoreError::Io(_))
        ));
        assert!(path.is_dir());
        assert!(!path.with_extension("json.tmp").exists());
    }
}
