#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Configuration tables for Packet Striker.
//!
//! Enemy, boss and wave records are read from `enemy_config.json`,
//! `boss_config.json` and `wave_config.json`. Loaded records overlay the
//! builtin tables; lookups fall back from the named record to a builtin
//! default so that a broken or missing file never stops a session.

mod builtin;
pub mod records;
pub mod tuning;

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub use records::{BossRecord, EnemyRecord, ParamValue, PatternSpec, SpawnArrangement, WaveRecord};
pub use tuning::{CombatTuning, EncounterTuning, PlayerTuning};

/// File holding enemy records.
pub const ENEMY_CONFIG_FILE: &str = "enemy_config.json";
/// File holding boss records.
pub const BOSS_CONFIG_FILE: &str = "boss_config.json";
/// File holding wave records keyed by wave number.
pub const WAVE_CONFIG_FILE: &str = "wave_config.json";

const ENEMY_FALLBACK_KEY: &str = "scout";
const BOSS_FALLBACK_KEY: &str = "basic";
const DEFAULT_SCORE_VALUE: u32 = 50;

/// Errors raised while reading or writing configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file is not a JSON object of records.
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A single record inside an otherwise valid file is malformed.
    #[error("record '{name}' in {path} is malformed: {source}")]
    Record {
        /// File that holds the record.
        path: PathBuf,
        /// Record key.
        name: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A wave table key is not a wave number.
    #[error("wave key '{key}' in {path} is not a wave number")]
    WaveKey {
        /// File that holds the record.
        path: PathBuf,
        /// Offending key.
        key: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strictness {
    Strict,
    Lenient,
}

/// Enemy, boss and wave tables consulted by the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigTables {
    enemies: BTreeMap<String, EnemyRecord>,
    bosses: BTreeMap<String, BossRecord>,
    waves: BTreeMap<u32, WaveRecord>,
}

impl ConfigTables {
    /// Tables compiled into the binary.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            enemies: builtin::enemies(),
            bosses: builtin::bosses(),
            waves: builtin::waves(),
        }
    }

    /// Tables without any records; every lookup resolves to the defaults.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            enemies: BTreeMap::new(),
            bosses: BTreeMap::new(),
            waves: BTreeMap::new(),
        }
    }

    /// Loads the tables from `dir`, failing on the first malformed file or record.
    ///
    /// Missing files are not an error; the builtin table is kept for them.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        Self::load_with(dir, Strictness::Strict)
    }

    /// Loads the tables from `dir`, skipping malformed files and records.
    #[must_use]
    pub fn load_or_builtin(dir: &Path) -> Self {
        Self::load_with(dir, Strictness::Lenient).unwrap_or_else(|error| {
            warn!("{error}; using builtin configuration");
            Self::builtin()
        })
    }

    fn load_with(dir: &Path, strictness: Strictness) -> Result<Self, ConfigError> {
        let mut tables = Self::builtin();

        let path = dir.join(ENEMY_CONFIG_FILE);
        if let Some(raw) = read_table(&path, strictness)? {
            merge_records(&path, raw, &mut tables.enemies, strictness, |key| {
                Some(key.to_owned())
            })?;
        }

        let path = dir.join(BOSS_CONFIG_FILE);
        if let Some(raw) = read_table(&path, strictness)? {
            merge_records(&path, raw, &mut tables.bosses, strictness, |key| {
                Some(key.to_owned())
            })?;
        }

        let path = dir.join(WAVE_CONFIG_FILE);
        if let Some(raw) = read_table(&path, strictness)? {
            merge_records(&path, raw, &mut tables.waves, strictness, |key| {
                key.trim().parse::<u32>().ok()
            })?;
        }

        Ok(tables)
    }

    /// Writes the three tables into `dir` as pretty-printed JSON, creating it if needed.
    pub fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        write_table(&dir.join(ENEMY_CONFIG_FILE), &self.enemies)?;
        write_table(&dir.join(BOSS_CONFIG_FILE), &self.bosses)?;
        write_table(&dir.join(WAVE_CONFIG_FILE), &self.waves)
    }

    /// Registers or replaces an enemy record.
    pub fn insert_enemy(&mut self, kind: impl Into<String>, record: EnemyRecord) {
        let _ = self.enemies.insert(kind.into(), record);
    }

    /// Registers or replaces a boss record.
    pub fn insert_boss(&mut self, kind: impl Into<String>, record: BossRecord) {
        let _ = self.bosses.insert(kind.into(), record);
    }

    /// Registers or replaces a wave record.
    pub fn insert_wave(&mut self, wave: u32, record: WaveRecord) {
        let _ = self.waves.insert(wave, record);
    }

    /// Resolves an enemy record: named, then `scout`, then the builtin default.
    #[must_use]
    pub fn enemy(&self, kind: &str) -> &EnemyRecord {
        self.enemies
            .get(kind)
            .or_else(|| self.enemies.get(ENEMY_FALLBACK_KEY))
            .unwrap_or_else(|| default_enemy())
    }

    /// Resolves a boss record: named, then `basic`, then the builtin default.
    #[must_use]
    pub fn boss(&self, kind: &str) -> &BossRecord {
        self.bosses
            .get(kind)
            .or_else(|| self.bosses.get(BOSS_FALLBACK_KEY))
            .unwrap_or_else(|| default_boss())
    }

    /// Declarative record for wave `number`, if one exists.
    #[must_use]
    pub fn wave(&self, number: u32) -> Option<&WaveRecord> {
        self.waves.get(&number)
    }

    /// Every declarative wave record keyed by wave number.
    #[must_use]
    pub fn waves(&self) -> &BTreeMap<u32, WaveRecord> {
        &self.waves
    }

    /// Score awarded for destroying an enemy of `kind`.
    #[must_use]
    pub fn score_value(&self, kind: &str) -> u32 {
        if let Some(score) = self.enemies.get(kind).and_then(|record| record.score_value) {
            return score;
        }
        match kind {
            "scout" => 50,
            "fighter" => 100,
            "gunship" => 150,
            "interceptor" => 120,
            "bomber" => 200,
            "basic" => 75,
            _ => DEFAULT_SCORE_VALUE,
        }
    }
}

impl Default for ConfigTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn default_enemy() -> &'static EnemyRecord {
    static DEFAULT: OnceLock<EnemyRecord> = OnceLock::new();
    DEFAULT.get_or_init(EnemyRecord::default)
}

fn default_boss() -> &'static BossRecord {
    static DEFAULT: OnceLock<BossRecord> = OnceLock::new();
    DEFAULT.get_or_init(BossRecord::default)
}

fn read_table(
    path: &Path,
    strictness: Strictness,
) -> Result<Option<BTreeMap<String, serde_json::Value>>, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!("{} not found; keeping builtin records", path.display());
            return Ok(None);
        }
        Err(source) => {
            return lenient_or(
                strictness,
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                },
            )
        }
    };

    match serde_json::from_str(&text) {
        Ok(raw) => Ok(Some(raw)),
        Err(source) => lenient_or(
            strictness,
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
        ),
    }
}

fn merge_records<K, R, F>(
    path: &Path,
    raw: BTreeMap<String, serde_json::Value>,
    table: &mut BTreeMap<K, R>,
    strictness: Strictness,
    parse_key: F,
) -> Result<(), ConfigError>
where
    K: Ord,
    R: DeserializeOwned,
    F: Fn(&str) -> Option<K>,
{
    for (name, value) in raw {
        let Some(key) = parse_key(&name) else {
            lenient_or::<()>(
                strictness,
                ConfigError::WaveKey {
                    path: path.to_path_buf(),
                    key: name,
                },
            )?;
            continue;
        };
        match serde_json::from_value::<R>(value) {
            Ok(record) => {
                let _ = table.insert(key, record);
            }
            Err(source) => lenient_or(
                strictness,
                ConfigError::Record {
                    path: path.to_path_buf(),
                    name,
                    source,
                },
            )?,
        }
    }
    Ok(())
}

fn lenient_or<T: Default>(strictness: Strictness, error: ConfigError) -> Result<T, ConfigError> {
    match strictness {
        Strictness::Strict => Err(error),
        Strictness::Lenient => {
            warn!("{error}; falling back to builtin records");
            Ok(T::default())
        }
    }
}

fn write_table<T: Serialize>(path: &Path, table: &T) -> Result<(), ConfigError> {
    let text = serde_json::to_string_pretty(table).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_enemies_fall_back_to_scout() {
        let tables = ConfigTables::builtin();
        assert_eq!(tables.enemy("unknown"), tables.enemy("scout"));
        assert_eq!(tables.enemy("scout").health, 20);
    }

    #[test]
    fn empty_tables_resolve_builtin_defaults() {
        let tables = ConfigTables::empty();
        assert_eq!(tables.enemy("fighter"), &EnemyRecord::default());
        assert_eq!(tables.boss("angry_migam"), &BossRecord::default());
        assert!(tables.wave(1).is_none());
    }

    #[test]
    fn score_values_follow_type_table() {
        let mut tables = ConfigTables::builtin();
        assert_eq!(tables.score_value("scout"), 50);
        assert_eq!(tables.score_value("bomber"), 200);
        assert_eq!(tables.score_value("basic"), 75);
        assert_eq!(tables.score_value("mystery"), 50);

        tables.insert_enemy(
            "elite",
            EnemyRecord {
                score_value: Some(900),
                ..EnemyRecord::default()
            },
        );
        assert_eq!(tables.score_value("elite"), 900);
    }

    #[test]
    fn builtin_wave_five_is_elite_forces() {
        let tables = ConfigTables::builtin();
        let wave = tables.wave(5).expect("wave 5 exists");
        assert_eq!(wave.name, "Elite Forces");
        assert_eq!(wave.quota(), 33);
        assert_eq!(wave.arrangement(), SpawnArrangement::Mixed);
    }

    #[test]
    fn angry_migam_has_three_image_phases() {
        let tables = ConfigTables::builtin();
        let boss = tables.boss("angry_migam");
        assert_eq!(boss.health, 1000);
        assert_eq!(boss.max_phases(), 3);
        assert_eq!(boss.attack_for_phase(0).kind(), "spread_shot_image");
        assert_eq!(boss.attack_for_phase(2).kind(), "blue_screen_attack");
    }
}
