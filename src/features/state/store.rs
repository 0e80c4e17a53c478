//! Durable broadcast state: mode flags plus the randomized-wait bounds.

use anyhow::{Context, Result};
use log::{error, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::RwLock;

pub const DEFAULT_MIN_NORMAL: u64 = 600;
pub const DEFAULT_MAX_NORMAL: u64 = 7200;
pub const DEFAULT_MIN_APOC: u64 = 300;
pub const DEFAULT_MAX_APOC: u64 = 3600;

fn default_true() -> bool {
    true
}
fn default_min_normal() -> u64 {
    DEFAULT_MIN_NORMAL
}
fn default_max_normal() -> u64 {
    DEFAULT_MAX_NORMAL
}
fn default_min_apoc() -> u64 {
    DEFAULT_MIN_APOC
}
fn default_max_apoc() -> u64 {
    DEFAULT_MAX_APOC
}

/// Inclusive bounds, in seconds, for the wait between broadcasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervals {
    #[serde(default = "default_min_normal")]
    pub min_normal: u64,
    #[serde(default = "default_max_normal")]
    pub max_normal: u64,
    #[serde(default = "default_min_apoc")]
    pub min_apoc: u64,
    #[serde(default = "default_max_apoc")]
    pub max_apoc: u64,
}

impl Default for Intervals {
    fn default() -> Self {
        Self {
            min_normal: DEFAULT_MIN_NORMAL,
            max_normal: DEFAULT_MAX_NORMAL,
            min_apoc: DEFAULT_MIN_APOC,
            max_apoc: DEFAULT_MAX_APOC,
        }
    }
}

impl Intervals {
    /// The `(min, max)` pair for a mode
    pub fn pair(&self, mode: IntervalMode) -> (u64, u64) {
        match mode {
            IntervalMode::Normal => (self.min_normal, self.max_normal),
            IntervalMode::Apocalypse => (self.min_apoc, self.max_apoc),
        }
    }

    fn normalized(self) -> Self {
        let clamp = |min: u64, max: u64| {
            let min = min.max(1);
            (min, max.max(min))
        };
        let (min_normal, max_normal) = clamp(self.min_normal, self.max_normal);
        let (min_apoc, max_apoc) = clamp(self.min_apoc, self.max_apoc);
        Self {
            min_normal,
            max_normal,
            min_apoc,
            max_apoc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalMode {
    Normal,
    Apocalypse,
}

impl IntervalMode {
    pub fn label(&self) -> &'static str {
        match self {
            IntervalMode::Normal => "NORMAL",
            IntervalMode::Apocalypse => "APOCALYPSE",
        }
    }
}

impl FromStr for IntervalMode {
    type Err = IntervalError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(IntervalMode::Normal),
            "apocalypse" | "apocalipse" | "apoc" => Ok(IntervalMode::Apocalypse),
            other => Err(IntervalError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntervalError {
    #[error("minimum must be greater than zero")]
    NonPositiveMin,
    #[error("maximum ({max}) must be at least the minimum ({min})")]
    MaxBelowMin { min: u64, max: u64 },
    #[error("unknown interval mode '{0}'")]
    UnknownMode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastState {
    #[serde(default)]
    pub apocalypse: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub intervals: Intervals,
}

impl Default for BroadcastState {
    fn default() -> Self {
        Self {
            apocalypse: false,
            enabled: true,
            intervals: Intervals::default(),
        }
    }
}

impl BroadcastState {
    pub fn active_mode(&self) -> IntervalMode {
        if self.apocalypse {
            IntervalMode::Apocalypse
        } else {
            IntervalMode::Normal
        }
    }

    /// Seconds to wait before the next broadcast, drawn from the active closed range
    pub fn compute_wait<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let (min, max) = self.intervals.pair(self.active_mode());
        let min = min.max(1);
        let max = max.max(min);
        rng.random_range(min..=max)
    }
}

/// Owner of the process-wide [`BroadcastState`] and its backing file
pub struct StateStore {
    path: PathBuf,
    state: RwLock<BroadcastState>,
}

impl StateStore {
    /// Load state from `path`, falling back to (and persisting) defaults
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = Self::load(&path);
        Self {
            path,
            state: RwLock::new(state),
        }
    }

    /// Read the state file. Never fails: a missing or corrupt file yields defaults, which are
    /// written back immediately.
    pub fn load(path: &Path) -> BroadcastState {
        let parsed = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<BroadcastState>(&contents) {
                Ok(state) => Some(state),
                Err(e) => {
                    warn!("⚠️ State file {} is corrupt ({e}); resetting to defaults", path.display());
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("📄 No state file at {} - creating defaults", path.display());
                None
            }
            Err(e) => {
                warn!("⚠️ Failed to read state file {}: {e}; using defaults", path.display());
                None
            }
        };

        let state = match parsed {
            Some(mut state) => {
                state.intervals = state.intervals.normalized();
                state
            }
            None => {
                let state = BroadcastState::default();
                if let Err(e) = write_atomic(path, &state) {
                    error!("❌ Failed to write default state: {e}");
                }
                state
            }
        };
        info!(
            "📦 Broadcast state loaded (apocalypse={}, enabled={})",
            state.apocalypse, state.enabled
        );
        state
    }

    pub async fn snapshot(&self) -> BroadcastState {
        self.state.read().await.clone()
    }

    /// Persist `state` to the backing file without replacing the in-memory copy
    pub fn save(&self, state: &BroadcastState) -> Result<()> {
        write_atomic(&self.path, state).map_err(|e| {
            error!("❌ Failed to save state: {e}");
            e
        })
    }

    /// Apply `mutate` and persist the result.
    ///
    /// The in-memory state keeps the mutation even if the write fails; the error is returned so
    /// the caller can report it.
    pub async fn update<F>(&self, mutate: F) -> Result<BroadcastState>
    where
        F: FnOnce(&mut BroadcastState),
    {
        let mut guard = self.state.write().await;
        mutate(&mut *guard);
        let updated = guard.clone();
        // Written under the lock so concurrent updates reach the file in order
        self.save(&updated)?;
        Ok(updated)
    }

    pub async fn set_apocalypse(&self, on: bool) -> Result<BroadcastState> {
        self.update(|s| s.apocalypse = on).await
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<BroadcastState> {
        self.update(|s| s.enabled = enabled).await
    }

    /// Validate and store one interval pair.
    ///
    /// Validation failures leave the state untouched and are reported as `IntervalError`; a
    /// persistence failure after a valid update is reported as any other error.
    pub async fn set_interval(&self, mode: IntervalMode, min: u64, max: u64) -> Result<Intervals> {
        validate_interval(min, max)?;
        let updated = self
            .update(|s| match mode {
                IntervalMode::Normal => {
                    s.intervals.min_normal = min;
                    s.intervals.max_normal = max;
                }
                IntervalMode::Apocalypse => {
                    s.intervals.min_apoc = min;
                    s.intervals.max_apoc = max;
                }
            })
            .await?;
        Ok(updated.intervals)
    }
}

pub fn validate_interval(min: u64, max: u64) -> std::result::Result<(), IntervalError> {
    if min == 0 {
        return Err(IntervalError::NonPositiveMin);
    }
    if max < min {
        return Err(IntervalError::MaxBelowMin { min, max });
    }
    Ok(())
}

fn write_atomic(path: &Path, state: &BroadcastState) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("renaming into {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    #[test]
    fn test_compute_wait_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for (min, max) in [(1, 1), (1, 2), (5, 10), (600, 7200), (300, 3600)] {
            let state = BroadcastState {
                intervals: Intervals {
                    min_normal: min,
                    max_normal: max,
                    ..Intervals::default()
                },
                ..BroadcastState::default()
            };
            for _ in 0..200 {
                let v = state.compute_wait(&mut rng);
                assert!((min..=max).contains(&v), "{v} outside {min}..={max}");
            }
        }
    }

    #[test]
    fn test_compute_wait_uses_apocalypse_pair() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = BroadcastState {
            apocalypse: true,
            intervals: Intervals {
                min_normal: 1000,
                max_normal: 1000,
                min_apoc: 3,
                max_apoc: 3,
            },
            ..BroadcastState::default()
        };
        assert_eq!(state.compute_wait(&mut rng), 3);
    }

    #[test]
    fn test_compute_wait_clamps_bad_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let state = BroadcastState {
            intervals: Intervals {
                min_normal: 0,
                max_normal: 0,
                ..Intervals::default()
            },
            ..BroadcastState::default()
        };
        assert_eq!(state.compute_wait(&mut rng), 1);
    }

    #[test]
    fn test_missing_file_creates_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");

        let state = StateStore::load(&path);
        assert_eq!(state, BroadcastState::default());
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_resets_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let state = StateStore::load(&path);
        assert_eq!(state, BroadcastState::default());

        let rewritten: BroadcastState =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(rewritten, BroadcastState::default());
    }

    #[test]
    fn test_missing_interval_key_is_backfilled() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        fs::write(
            &path,
            r#"{"apocalypse": true, "enabled": false,
                "intervals": {"min_normal": 10, "max_normal": 20, "min_apoc": 5}}"#,
        )
        .unwrap();

        let state = StateStore::load(&path);
        assert!(state.apocalypse);
        assert!(!state.enabled);
        assert_eq!(state.intervals.min_normal, 10);
        assert_eq!(state.intervals.max_normal, 20);
        assert_eq!(state.intervals.min_apoc, 5);
        assert_eq!(state.intervals.max_apoc, DEFAULT_MAX_APOC);
    }

    #[test]
    fn test_loaded_bounds_are_normalized() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        fs::write(
            &path,
            r#"{"intervals": {"min_normal": 0, "max_normal": 0, "min_apoc": 50, "max_apoc": 10}}"#,
        )
        .unwrap();

        let state = StateStore::load(&path);
        assert_eq!(state.intervals.pair(IntervalMode::Normal), (1, 1));
        assert_eq!(state.intervals.pair(IntervalMode::Apocalypse), (50, 50));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        let store = StateStore::open(&path);

        let state = BroadcastState {
            apocalypse: true,
            enabled: false,
            intervals: Intervals {
                min_normal: 11,
                max_normal: 22,
                min_apoc: 3,
                max_apoc: 4,
            },
        };
        store.save(&state).unwrap();

        assert_eq!(StateStore::load(&path), state);
        assert!(!tmp.path().join("state.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_set_interval_rejects_max_below_min() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::open(tmp.path().join("state.json"));
        let before = store.snapshot().await;

        let err = store
            .set_interval(IntervalMode::Normal, 100, 50)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<IntervalError>(),
            Some(&IntervalError::MaxBelowMin { min: 100, max: 50 })
        );
        assert_eq!(store.snapshot().await, before);
        assert_eq!(StateStore::load(&tmp.path().join("state.json")), before);
    }

    #[tokio::test]
    async fn test_set_interval_rejects_zero_min() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::open(tmp.path().join("state.json"));

        let err = store
            .set_interval(IntervalMode::Apocalypse, 0, 10)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<IntervalError>(),
            Some(&IntervalError::NonPositiveMin)
        );
    }

    #[tokio::test]
    async fn test_set_interval_persists() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        let store = StateStore::open(&path);

        store
            .set_interval(IntervalMode::Apocalypse, 30, 60)
            .await
            .unwrap();

        let reloaded = StateStore::load(&path);
        assert_eq!(reloaded.intervals.pair(IntervalMode::Apocalypse), (30, 60));
        assert_eq!(
            reloaded.intervals.pair(IntervalMode::Normal),
            (DEFAULT_MIN_NORMAL, DEFAULT_MAX_NORMAL)
        );
    }

    #[tokio::test]
    async fn test_update_reports_write_failure_but_keeps_memory() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::open(tmp.path().join("missing-dir").join("state.json"));

        assert!(store.set_apocalypse(true).await.is_err());
        assert!(store.snapshot().await.apocalypse);
    }

    #[test]
    fn test_interval_mode_parsing() {
        assert_eq!("normal".parse::<IntervalMode>(), Ok(IntervalMode::Normal));
        assert_eq!("APOC".parse::<IntervalMode>(), Ok(IntervalMode::Apocalypse));
        assert_eq!("apocalipse".parse::<IntervalMode>(), Ok(IntervalMode::Apocalypse));
        assert_eq!(
            "fast".parse::<IntervalMode>(),
            Err(IntervalError::UnknownMode("fast".to_string()))
        );
    }
}
