//! Declarative records describing enemies, bosses and waves.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Scalar or textual parameter attached to a pattern specification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Numeric parameter such as a speed or cooldown.
    Number(f64),
    /// Textual parameter such as a sprite key.
    Text(String),
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Pattern selection: a `type` key plus free-form parameters.
///
/// Parameters missing from the record resolve to per-pattern defaults when
/// the pattern is constructed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(flatten)]
    params: BTreeMap<String, ParamValue>,
}

impl PatternSpec {
    /// Creates a specification for the given pattern key without parameters.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: BTreeMap::new(),
        }
    }

    /// Builder-style helper that attaches a parameter.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        let _ = self.params.insert(key.to_owned(), value.into());
        self
    }

    /// Pattern key selected by the record.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Numeric parameter, or `default` when absent or not numeric.
    #[must_use]
    pub fn number(&self, key: &str, default: f32) -> f32 {
        match self.params.get(key) {
            Some(ParamValue::Number(value)) => *value as f32,
            _ => default,
        }
    }

    /// Non-negative integer parameter, or `default` when absent.
    #[must_use]
    pub fn count(&self, key: &str, default: u32) -> u32 {
        match self.params.get(key) {
            Some(ParamValue::Number(value)) if *value >= 0.0 => *value as u32,
            _ => default,
        }
    }

    /// Textual parameter, or `default` when absent or not textual.
    #[must_use]
    pub fn text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.params.get(key) {
            Some(ParamValue::Text(value)) => value,
            _ => default,
        }
    }
}

/// Named enemy archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyRecord {
    /// Starting health; fractional values are truncated.
    #[serde(deserialize_with = "whole_health")]
    pub health: i32,
    /// Sprite drawn for the enemy.
    #[serde(default = "default_enemy_asset")]
    pub asset_key: String,
    /// Movement pattern selection.
    #[serde(default)]
    pub movement: PatternSpec,
    /// Attack pattern selection.
    #[serde(default)]
    pub attack: PatternSpec,
    /// Overrides the per-type score table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_value: Option<u32>,
}

fn default_enemy_asset() -> String {
    "enemy".to_owned()
}

impl Default for EnemyRecord {
    fn default() -> Self {
        Self {
            health: 20,
            asset_key: default_enemy_asset(),
            movement: PatternSpec::new("straight").with("speed", 100.0),
            attack: PatternSpec::new("none"),
            score_value: None,
        }
    }
}

/// Named boss archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossRecord {
    /// Starting health; fractional values are truncated.
    #[serde(deserialize_with = "whole_health")]
    pub health: i32,
    /// Sprite drawn for the boss.
    #[serde(default = "default_boss_asset")]
    pub asset_key: String,
    /// Number of attack phases.
    #[serde(default = "default_phases")]
    pub phases: u32,
    /// Movement pattern selection.
    #[serde(default)]
    pub movement: PatternSpec,
    /// Attack pattern per phase; missing trailing phases reuse the last entry.
    #[serde(default)]
    pub attack_phases: Vec<PatternSpec>,
    /// Scale applied to the generic enemy sprite when `asset_key` is missing.
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f32,
}

fn default_boss_asset() -> String {
    "boss".to_owned()
}

const fn default_phases() -> u32 {
    3
}

const fn default_scale_factor() -> f32 {
    2.0
}

impl BossRecord {
    /// Number of phases, never below one.
    #[must_use]
    pub fn max_phases(&self) -> u32 {
        self.phases.max(1)
    }

    /// Attack used during the zero-based `phase_index`.
    #[must_use]
    pub fn attack_for_phase(&self, phase_index: usize) -> PatternSpec {
        self.attack_phases
            .get(phase_index)
            .or_else(|| self.attack_phases.last())
            .cloned()
            .unwrap_or_else(|| PatternSpec::new("none"))
    }
}

impl Default for BossRecord {
    fn default() -> Self {
        Self {
            health: 500,
            asset_key: default_boss_asset(),
            phases: default_phases(),
            movement: PatternSpec::new("boss_hover").with("speed", 50.0),
            attack_phases: vec![
                PatternSpec::new("single_shot_down")
                    .with("bullet_speed", 200.0)
                    .with("cooldown", 0.6),
                PatternSpec::new("spread_shot")
                    .with("bullet_speed", 150.0)
                    .with("cooldown", 0.8),
                PatternSpec::new("circular_shot")
                    .with("bullet_speed", 250.0)
                    .with("cooldown", 1.0),
            ],
            scale_factor: default_scale_factor(),
        }
    }
}

/// Rule used to compute successive spawn positions inside a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnArrangement {
    /// Uniform within horizontal margins, above the field.
    Random,
    /// Grid wrapping every seven spawns.
    Formation,
    /// Grid wrapping every eight spawns.
    Waves,
    /// Every third spawn random, the rest on a coarse grid.
    Mixed,
}

impl SpawnArrangement {
    /// Arrangements available to procedural waves.
    pub const ALL: [SpawnArrangement; 4] = [Self::Random, Self::Formation, Self::Waves, Self::Mixed];

    /// Parses an arrangement key; unknown keys fall back to [`SpawnArrangement::Random`].
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key {
            "formation" => Self::Formation,
            "waves" => Self::Waves,
            "mixed" => Self::Mixed,
            _ => Self::Random,
        }
    }

    /// Configuration key of the arrangement.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Formation => "formation",
            Self::Waves => "waves",
            Self::Mixed => "mixed",
        }
    }
}

/// Declarative description of a regular wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveRecord {
    /// Display name.
    pub name: String,
    /// Spawn quota per enemy type. Negative counts load as zero.
    #[serde(deserialize_with = "clamped_quota")]
    pub enemies: BTreeMap<String, u32>,
    /// Delay between spawns in milliseconds. Negative delays load as zero.
    #[serde(default = "default_spawn_delay", deserialize_with = "clamped_delay")]
    pub spawn_delay: u64,
    /// Arrangement key.
    #[serde(default = "default_spawn_pattern")]
    pub spawn_pattern: String,
}

const fn default_spawn_delay() -> u64 {
    1000
}

fn default_spawn_pattern() -> String {
    SpawnArrangement::Random.key().to_owned()
}

impl WaveRecord {
    /// Creates a wave record.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        enemies: BTreeMap<String, u32>,
        spawn_delay: u64,
        arrangement: SpawnArrangement,
    ) -> Self {
        Self {
            name: name.into(),
            enemies,
            spawn_delay,
            spawn_pattern: arrangement.key().to_owned(),
        }
    }

    /// Total number of enemies the wave spawns.
    #[must_use]
    pub fn quota(&self) -> u32 {
        self.enemies
            .values()
            .fold(0_u32, |total, count| total.saturating_add(*count))
    }

    /// Parsed arrangement.
    #[must_use]
    pub fn arrangement(&self) -> SpawnArrangement {
        SpawnArrangement::from_key(&self.spawn_pattern)
    }
}

fn whole_health<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    // Float to integer casts saturate at the bounds.
    Ok(f64::deserialize(deserializer)?.trunc() as i32)
}

fn clamped_quota<'de, D>(deserializer: D) -> Result<BTreeMap<String, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(kind, count)| {
            if count < 0.0 {
                warn!("negative quota {count} for {kind:?} clamped to zero");
            }
            (kind, count.max(0.0).trunc() as u32)
        })
        .collect())
}

fn clamped_delay<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let delay = f64::deserialize(deserializer)?;
    if delay < 0.0 {
        warn!("negative spawn delay {delay} ms clamped to zero");
    }
    Ok(delay.max(0.0).trunc() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_parameters_fall_back_to_defaults() {
        let spec: PatternSpec =
            serde_json::from_str(r#"{"type":"sine_wave","amplitude":40,"image":"x"}"#)
                .expect("valid spec");
        assert_eq!(spec.kind(), "sine_wave");
        assert_eq!(spec.number("amplitude", 60.0), 40.0);
        assert_eq!(spec.number("speed", 150.0), 150.0);
        assert_eq!(spec.number("image", 3.0), 3.0);
        assert_eq!(spec.text("image", "jesus"), "x");
    }

    #[test]
    fn missing_type_is_empty() {
        let spec: PatternSpec = serde_json::from_str(r#"{"speed":10}"#).expect("valid spec");
        assert_eq!(spec.kind(), "");
        assert_eq!(spec.count("speed", 0), 10);
    }

    #[test]
    fn boss_phases_reuse_last_attack() {
        let record = BossRecord {
            attack_phases: vec![PatternSpec::new("spread_shot")],
            ..BossRecord::default()
        };
        assert_eq!(record.attack_for_phase(2).kind(), "spread_shot");

        let empty = BossRecord {
            attack_phases: Vec::new(),
            ..BossRecord::default()
        };
        assert_eq!(empty.attack_for_phase(0).kind(), "none");
    }

    #[test]
    fn unknown_arrangements_are_random() {
        assert_eq!(SpawnArrangement::from_key("boss"), SpawnArrangement::Random);
        assert_eq!(
            SpawnArrangement::from_key("formation"),
            SpawnArrangement::Formation
        );
    }

    #[test]
    fn wave_quota_sums_counts() {
        let record: WaveRecord = serde_json::from_str(
            r#"{"name":"Test","enemies":{"scout":3,"fighter":2},"spawn_delay":500}"#,
        )
        .expect("valid wave");
        assert_eq!(record.quota(), 5);
        assert_eq!(record.arrangement(), SpawnArrangement::Random);
    }

    #[test]
    fn wave_numbers_are_clamped_and_truncated() {
        let record: WaveRecord = serde_json::from_str(
            r#"{"name":"Odd","enemies":{"scout":-1,"fighter":6.0,"gunship":2.7},"spawn_delay":-100}"#,
        )
        .expect("numbers are accepted");
        assert_eq!(record.enemies.get("scout"), Some(&0));
        assert_eq!(record.quota(), 8);
        assert_eq!(record.spawn_delay, 0);

        let enemy: EnemyRecord =
            serde_json::from_str(r#"{"health":12.9}"#).expect("fractional health");
        assert_eq!(enemy.health, 12);
        assert!(serde_json::from_str::<EnemyRecord>(r#"{"health":"lots"}"#).is_err());
    }
}
