#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave-based encounter engine.
//!
//! The manager walks a fixed number of waves. Regular waves spawn enemies
//! from a declarative record, or a procedurally generated one, until their
//! quota or time runs out; every fifth wave replaces spawning with a single
//! boss. All randomness is drawn from a per-wave generator derived from the
//! session seed, so identical seeds replay identical encounters.

use std::{collections::BTreeMap, time::Duration};

use packet_striker_config::{ConfigTables, EncounterTuning, SpawnArrangement, WaveRecord};
use packet_striker_core::{Command, EnemyId, EnemyView, Event, Playfield, SpawnOrigin, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

const DEFAULT_SEED: u64 = 0x7761_7665_735f_0001;

const RAMP_WAVES: u32 = 5;
const MAX_RAMP_WAVE: u32 = 15;
const PROCEDURAL_BASELINE: [(&str, u32); 6] = [
    ("scout", 5),
    ("basic", 3),
    ("fighter", 4),
    ("gunship", 2),
    ("interceptor", 2),
    ("bomber", 1),
];
const BASE_SPAWN_DELAY_MS: i64 = 1000;
const SPAWN_DELAY_STEP_MS: i64 = 30;
const MIN_SPAWN_DELAY_MS: i64 = 300;

const SIGNATURE_BOSS: &str = "angry_migam";
const ROTATING_BOSSES: [&str; 3] = ["cyber_fortress", "network_overlord", "packet_storm"];
const BOSS_SPAWN_Y: f32 = -50.0;
const BOSS_SPAWN_PATTERN: &str = "boss";

const SPAWN_MARGIN: i32 = 50;
const RANDOM_SPAWN_Y: (i32, i32) = (-100, -50);
const FORMATION_COLUMNS: u32 = 7;
const WAVES_COLUMNS: u32 = 8;
const MIXED_COLUMNS: u32 = 6;

/// Configuration parameters required to construct the wave manager.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    tuning: EncounterTuning,
    playfield: Playfield,
    seed: u64,
}

impl Config {
    /// Creates a new configuration from encounter tuning, field size and session seed.
    #[must_use]
    pub const fn new(tuning: EncounterTuning, playfield: Playfield, seed: u64) -> Self {
        Self {
            tuning,
            playfield,
            seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(EncounterTuning::default(), Playfield::default(), DEFAULT_SEED)
    }
}

/// State of the encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    /// A regular wave is spawning or being fought.
    Active,
    /// A boss fight is in progress.
    BossActive,
    /// Pause between two waves.
    Transitioning,
    /// Every wave has been cleared.
    AllComplete,
}

/// Wave status for the heads-up display.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveInfo {
    /// Current wave, starting at one.
    pub wave_number: u32,
    /// Number of waves in the encounter.
    pub max_waves: u32,
    /// Display name of the current wave.
    pub wave_name: String,
    /// Enemies still to be spawned.
    pub enemies_remaining: u32,
    /// Enemies alive on the field.
    pub enemies_alive: usize,
    /// Share of the wave time limit used, in percent; 100 outside a wave.
    pub progress: f32,
    /// Whether the encounter is between waves.
    pub in_transition: bool,
    /// Whether a regular wave or boss fight is running.
    pub wave_active: bool,
    /// Whether the current wave is a boss fight.
    pub is_boss_wave: bool,
    /// Boss being fought, once it has spawned.
    pub boss: Option<EnemyId>,
    /// Whether every wave has been cleared.
    pub all_waves_complete: bool,
}

/// Pure system that drives wave progression and emits spawn commands.
#[derive(Debug)]
pub struct WaveManager {
    tuning: EncounterTuning,
    playfield: Playfield,
    seed: u64,
    waves: BTreeMap<u32, WaveRecord>,
    rng: ChaCha8Rng,
    current_wave: u32,
    phase: WavePhase,
    wave: WaveRecord,
    remaining: BTreeMap<String, u32>,
    quota: u32,
    spawned: u32,
    awaiting_spawn: u32,
    spawn_delay: Duration,
    since_last_spawn: Duration,
    wave_clock: Duration,
    transition_clock: Duration,
    pending_boss: Option<String>,
    boss: Option<EnemyId>,
    boss_defeated: bool,
    enemies_alive: usize,
}

impl WaveManager {
    /// Creates a manager and starts the first wave.
    #[must_use]
    pub fn new(config: Config, tables: &ConfigTables) -> Self {
        let mut manager = Self {
            tuning: config.tuning,
            playfield: config.playfield,
            seed: config.seed,
            waves: tables.waves().clone(),
            rng: ChaCha8Rng::seed_from_u64(derive_wave_seed(config.seed, 1)),
            current_wave: 1,
            phase: WavePhase::Active,
            wave: WaveRecord::new("", BTreeMap::new(), 0, SpawnArrangement::Random),
            remaining: BTreeMap::new(),
            quota: 0,
            spawned: 0,
            awaiting_spawn: 0,
            spawn_delay: Duration::ZERO,
            since_last_spawn: Duration::ZERO,
            wave_clock: Duration::ZERO,
            transition_clock: Duration::ZERO,
            pending_boss: None,
            boss: None,
            boss_defeated: false,
            enemies_alive: 0,
        };
        manager.start_wave(1);
        manager
    }

    /// Current wave number.
    #[must_use]
    pub const fn current_wave(&self) -> u32 {
        self.current_wave
    }

    /// Current encounter state.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Record the current wave spawns from.
    #[must_use]
    pub fn wave(&self) -> &WaveRecord {
        &self.wave
    }

    /// Total number of regular enemies the current wave spawns.
    #[must_use]
    pub const fn quota(&self) -> u32 {
        self.quota
    }

    /// Regular enemies spawned so far in the current wave.
    #[must_use]
    pub const fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Boss being fought, once its spawn has been confirmed.
    #[must_use]
    pub const fn boss(&self) -> Option<EnemyId> {
        self.boss
    }

    /// Whether every wave has been cleared.
    #[must_use]
    pub fn is_victory(&self) -> bool {
        self.phase == WavePhase::AllComplete
    }

    /// Starts wave `number`, replacing whatever wave was running.
    pub fn start_wave(&mut self, number: u32) {
        self.current_wave = number;
        self.rng = ChaCha8Rng::seed_from_u64(derive_wave_seed(self.seed, number));
        self.spawned = 0;
        self.awaiting_spawn = 0;
        self.wave_clock = Duration::ZERO;
        self.transition_clock = Duration::ZERO;
        self.boss = None;
        self.boss_defeated = false;
        self.pending_boss = None;

        if is_boss_wave(number, self.tuning.boss_wave_interval()) {
            let kind = boss_for_wave(number, self.tuning.boss_wave_interval());
            info!("wave {number}: boss battle against {kind}");
            self.wave = WaveRecord {
                name: format!("Boss Battle - {}", display_name(kind)),
                enemies: BTreeMap::new(),
                spawn_delay: 0,
                spawn_pattern: BOSS_SPAWN_PATTERN.to_owned(),
            };
            self.remaining.clear();
            self.quota = 0;
            self.spawn_delay = Duration::ZERO;
            self.since_last_spawn = Duration::ZERO;
            self.pending_boss = Some(kind.to_owned());
            self.phase = WavePhase::BossActive;
            return;
        }

        self.wave = match self.waves.get(&number) {
            Some(record) => record.clone(),
            None => procedural_wave(number, &mut self.rng),
        };
        self.remaining = self.wave.enemies.clone();
        self.quota = self.wave.quota();
        self.spawn_delay = Duration::from_millis(self.wave.spawn_delay);
        self.since_last_spawn = self.spawn_delay;
        self.phase = WavePhase::Active;
        info!(
            "wave {number}: {} with {} enemies every {} ms ({})",
            self.wave.name,
            self.quota,
            self.wave.spawn_delay,
            self.wave.arrangement().key()
        );
    }

    /// Consumes events and the live enemy view to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], enemies: &EnemyView, out: &mut Vec<Command>) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                Event::EnemySpawned {
                    origin: SpawnOrigin::Wave { .. },
                    ..
                } => self.awaiting_spawn = self.awaiting_spawn.saturating_sub(1),
                Event::BossSpawned { boss, .. }
                    if self.phase == WavePhase::BossActive && self.boss.is_none() =>
                {
                    self.boss = Some(*boss);
                }
                Event::BossDefeated { boss, .. } if self.boss == Some(*boss) => {
                    self.boss_defeated = true;
                }
                _ => {}
            }
        }
        self.enemies_alive = enemies.len();
        let boss_present = self
            .boss
            .map_or(false, |boss| enemies.iter().any(|snapshot| snapshot.id == boss));

        self.advance(elapsed, boss_present, out);

        if let Some(kind) = self.pending_boss.take() {
            out.push(Command::SpawnBoss {
                kind,
                position: Vec2::new(self.playfield.width() * 0.5, BOSS_SPAWN_Y),
            });
        }
    }

    fn advance(&mut self, elapsed: Duration, boss_present: bool, out: &mut Vec<Command>) {
        match self.phase {
            WavePhase::Transitioning => {
                self.transition_clock = self.transition_clock.saturating_add(elapsed);
                if self.transition_clock > self.tuning.transition_duration()
                    && self.current_wave < self.tuning.max_waves()
                {
                    self.start_wave(self.current_wave + 1);
                }
            }
            WavePhase::BossActive => {
                self.wave_clock = self.wave_clock.saturating_add(elapsed);
                if self.boss.is_some() && (self.boss_defeated || !boss_present) {
                    self.complete_wave();
                }
            }
            WavePhase::Active => {
                self.wave_clock = self.wave_clock.saturating_add(elapsed);
                self.since_last_spawn = self.since_last_spawn.saturating_add(elapsed);

                if self.spawned < self.quota && self.since_last_spawn > self.spawn_delay {
                    self.spawn_next_enemy(out);
                    self.since_last_spawn = Duration::ZERO;
                }

                let alive = self.enemies_alive + self.awaiting_spawn as usize;
                if self.wave_clock >= self.tuning.wave_duration()
                    || (self.spawned >= self.quota && alive == 0)
                {
                    self.complete_wave();
                }
            }
            WavePhase::AllComplete => {}
        }
    }

    fn spawn_next_enemy(&mut self, out: &mut Vec<Command>) {
        let total = self
            .remaining
            .values()
            .fold(0_u32, |total, count| total.saturating_add(*count));
        if total == 0 {
            return;
        }

        let mut pick = self.rng.gen_range(0..total);
        let mut chosen = None;
        for (kind, count) in self.remaining.iter_mut() {
            if pick < *count {
                *count -= 1;
                chosen = Some(kind.clone());
                break;
            }
            pick -= *count;
        }
        let Some(kind) = chosen else {
            return;
        };

        let position = spawn_position(
            self.wave.arrangement(),
            self.spawned,
            self.playfield,
            &mut self.rng,
        );
        debug!(
            "wave {} spawning {kind} #{} at {position}",
            self.current_wave, self.spawned
        );
        out.push(Command::SpawnEnemy {
            kind,
            position,
            origin: SpawnOrigin::Wave {
                wave: self.current_wave,
            },
        });
        self.spawned += 1;
        self.awaiting_spawn += 1;
    }

    fn complete_wave(&mut self) {
        if self.current_wave >= self.tuning.max_waves() {
            info!("wave {} cleared; all waves complete", self.current_wave);
            self.phase = WavePhase::AllComplete;
        } else {
            info!("wave {} cleared", self.current_wave);
            self.phase = WavePhase::Transitioning;
            self.transition_clock = Duration::ZERO;
        }
    }

    /// Share of the wave time limit used, in percent.
    #[must_use]
    pub fn progress(&self) -> f32 {
        match self.phase {
            WavePhase::Active | WavePhase::BossActive => {
                let limit = self.tuning.wave_duration().as_secs_f32();
                if limit <= 0.0 {
                    return 100.0;
                }
                (self.wave_clock.as_secs_f32() / limit * 100.0).min(100.0)
            }
            WavePhase::Transitioning | WavePhase::AllComplete => 100.0,
        }
    }

    /// Snapshot of the wave status for display.
    #[must_use]
    pub fn wave_info(&self) -> WaveInfo {
        WaveInfo {
            wave_number: self.current_wave,
            max_waves: self.tuning.max_waves(),
            wave_name: self.wave.name.clone(),
            enemies_remaining: self.quota.saturating_sub(self.spawned),
            enemies_alive: self.enemies_alive,
            progress: self.progress(),
            in_transition: self.phase == WavePhase::Transitioning,
            wave_active: matches!(self.phase, WavePhase::Active | WavePhase::BossActive),
            is_boss_wave: is_boss_wave(self.current_wave, self.tuning.boss_wave_interval()),
            boss: self.boss,
            all_waves_complete: self.phase == WavePhase::AllComplete,
        }
    }
}

/// Reports whether wave `number` is a boss fight.
#[must_use]
pub fn is_boss_wave(number: u32, interval: u32) -> bool {
    number % interval.max(1) == 0
}

/// Boss type fought on wave `number`.
///
/// The first two boss waves always bring the signature boss; later ones
/// rotate through the remaining roster.
#[must_use]
pub fn boss_for_wave(number: u32, interval: u32) -> &'static str {
    let ordinal = number / interval.max(1);
    if ordinal <= 2 {
        return SIGNATURE_BOSS;
    }
    ROTATING_BOSSES[((ordinal - 1) % ROTATING_BOSSES.len() as u32) as usize]
}

/// Generates the record for a wave without a declarative entry.
///
/// Baseline counts scale with the wave number up to three times, rounding
/// down, and the spawn delay shrinks by 30 ms per wave down to 300 ms.
pub fn procedural_wave<R>(number: u32, rng: &mut R) -> WaveRecord
where
    R: Rng + ?Sized,
{
    let ramp = number.min(MAX_RAMP_WAVE);
    let enemies = PROCEDURAL_BASELINE
        .iter()
        .map(|(kind, base)| ((*kind).to_owned(), base * ramp / RAMP_WAVES))
        .collect();
    let delay = (BASE_SPAWN_DELAY_MS - SPAWN_DELAY_STEP_MS * i64::from(number)).max(MIN_SPAWN_DELAY_MS);
    let arrangement = SpawnArrangement::ALL[rng.gen_range(0..SpawnArrangement::ALL.len())];
    WaveRecord::new(format!("Wave {number}"), enemies, delay as u64, arrangement)
}

/// Position of the `index`-th spawn of a wave.
pub fn spawn_position<R>(
    arrangement: SpawnArrangement,
    index: u32,
    playfield: Playfield,
    rng: &mut R,
) -> Vec2
where
    R: Rng + ?Sized,
{
    match arrangement {
        SpawnArrangement::Random => random_spawn_position(playfield, rng),
        SpawnArrangement::Formation => Vec2::new(
            (100 + (index % FORMATION_COLUMNS) * 80) as f32,
            -50.0 - ((index / FORMATION_COLUMNS) * 60) as f32,
        ),
        SpawnArrangement::Waves => Vec2::new(
            (50 + (index % WAVES_COLUMNS) * 90) as f32,
            -50.0 - ((index / WAVES_COLUMNS) * 80) as f32,
        ),
        SpawnArrangement::Mixed => {
            if index % 3 == 0 {
                random_spawn_position(playfield, rng)
            } else {
                Vec2::new((100 + (index % MIXED_COLUMNS) * 100) as f32, -50.0)
            }
        }
    }
}

/// Uniform position in the horizontal margins, above the field.
pub fn random_spawn_position<R>(playfield: Playfield, rng: &mut R) -> Vec2
where
    R: Rng + ?Sized,
{
    // The span follows the playfield width rather than a fixed 800 px field.
    let max_x = (playfield.width() as i32 - SPAWN_MARGIN).max(SPAWN_MARGIN);
    let x = rng.gen_range(SPAWN_MARGIN..=max_x);
    let y = rng.gen_range(RANDOM_SPAWN_Y.0..=RANDOM_SPAWN_Y.1);
    Vec2::new(x as f32, y as f32)
}

/// Derives the generator seed for one wave from the session seed.
#[must_use]
pub fn derive_wave_seed(seed: u64, wave: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(wave.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

fn display_name(kind: &str) -> String {
    kind.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use packet_striker_core::{Aabb, EnemySnapshot};

    fn tick(millis: u64) -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }]
    }

    fn no_enemies() -> EnemyView {
        EnemyView::from_snapshots(Vec::new())
    }

    fn manager_at(wave: u32) -> WaveManager {
        let mut manager = WaveManager::new(Config::default(), &ConfigTables::builtin());
        manager.start_wave(wave);
        manager
    }

    #[test]
    fn every_fifth_wave_is_a_boss_fight_without_quota() {
        for wave in (5..=50).step_by(5) {
            let manager = manager_at(wave);
            assert_eq!(manager.phase(), WavePhase::BossActive, "wave {wave}");
            assert_eq!(manager.quota(), 0);
        }
        assert_eq!(manager_at(4).phase(), WavePhase::Active);
    }

    #[test]
    fn boss_roster_follows_the_wave_number() {
        assert_eq!(boss_for_wave(5, 5), "angry_migam");
        assert_eq!(boss_for_wave(10, 5), "angry_migam");
        assert_eq!(boss_for_wave(15, 5), "packet_storm");
        assert_eq!(boss_for_wave(20, 5), "cyber_fortress");
        assert_eq!(boss_for_wave(25, 5), "network_overlord");
    }

    #[test]
    fn procedural_waves_scale_and_speed_up() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let wave = procedural_wave(7, &mut rng);
        let expected: BTreeMap<String, u32> = [
            ("basic", 4),
            ("bomber", 1),
            ("fighter", 5),
            ("gunship", 2),
            ("interceptor", 2),
            ("scout", 7),
        ]
        .into_iter()
        .map(|(kind, count)| (kind.to_owned(), count))
        .collect();
        assert_eq!(wave.enemies, expected);
        assert_eq!(wave.spawn_delay, 790);
        assert_eq!(wave.name, "Wave 7");

        let late = procedural_wave(40, &mut rng);
        assert_eq!(late.enemies.get("scout"), Some(&15));
        assert_eq!(late.spawn_delay, 300);
    }

    #[test]
    fn grid_arrangements_follow_the_spawn_index() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let field = Playfield::default();
        assert_eq!(
            spawn_position(SpawnArrangement::Formation, 8, field, &mut rng),
            Vec2::new(180.0, -110.0)
        );
        assert_eq!(
            spawn_position(SpawnArrangement::Waves, 9, field, &mut rng),
            Vec2::new(140.0, -130.0)
        );
        assert_eq!(
            spawn_position(SpawnArrangement::Mixed, 4, field, &mut rng),
            Vec2::new(500.0, -50.0)
        );
        for index in 0..50 {
            let position = spawn_position(SpawnArrangement::Random, index, field, &mut rng);
            assert!((50.0..=1150.0).contains(&position.x));
            assert!((-100.0..=-50.0).contains(&position.y));
        }
    }

    #[test]
    fn random_spawns_follow_the_playfield_width() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let narrow = Playfield::new(800.0, 600.0);
        let xs: Vec<f32> = (0..200)
            .map(|_| random_spawn_position(narrow, &mut rng).x)
            .collect();
        assert!(xs.iter().all(|x| (50.0..=750.0).contains(x)));
        assert!(xs.iter().any(|x| *x > 400.0));
    }

    #[test]
    fn wave_seeds_are_stable_and_distinct() {
        assert_eq!(derive_wave_seed(9, 3), derive_wave_seed(9, 3));
        assert_ne!(derive_wave_seed(9, 3), derive_wave_seed(9, 4));
        assert_ne!(derive_wave_seed(9, 3), derive_wave_seed(10, 3));
    }

    #[test]
    fn spawns_one_enemy_per_delay_until_quota() {
        let mut manager = manager_at(1);
        let quota = manager.quota();
        assert_eq!(quota, 8);

        let mut commands = Vec::new();
        manager.handle(&tick(16), &no_enemies(), &mut commands);
        assert_eq!(commands.len(), 1);

        manager.handle(&tick(500), &no_enemies(), &mut commands);
        assert_eq!(commands.len(), 1);
        manager.handle(&tick(1201), &no_enemies(), &mut commands);
        assert_eq!(commands.len(), 2);
        assert!(commands.iter().all(|command| matches!(
            command,
            Command::SpawnEnemy {
                origin: SpawnOrigin::Wave { wave: 1 },
                ..
            }
        )));
    }

    #[test]
    fn empty_quota_completes_immediately() {
        let mut tables = ConfigTables::builtin();
        tables.insert_wave(
            1,
            WaveRecord::new("Quiet", BTreeMap::new(), 500, SpawnArrangement::Random),
        );
        let mut manager = WaveManager::new(Config::default(), &tables);
        let mut commands = Vec::new();
        manager.handle(&tick(16), &no_enemies(), &mut commands);
        assert!(commands.is_empty());
        assert_eq!(manager.phase(), WavePhase::Transitioning);
    }

    #[test]
    fn live_enemies_hold_the_wave_until_the_time_limit() {
        let mut tables = ConfigTables::builtin();
        let enemies = [("scout".to_owned(), 1)].into_iter().collect();
        tables.insert_wave(1, WaveRecord::new("Lone", enemies, 100, SpawnArrangement::Random));
        let mut manager = WaveManager::new(Config::default(), &tables);

        let mut commands = Vec::new();
        manager.handle(&tick(16), &no_enemies(), &mut commands);
        assert_eq!(manager.spawned(), 1);
        manager.handle(&tick(16), &no_enemies(), &mut commands);
        assert_eq!(manager.phase(), WavePhase::Active, "spawn not yet confirmed");

        let alive = EnemyView::from_snapshots(vec![EnemySnapshot {
            id: EnemyId::new(0),
            bounds: Aabb::from_center_size(Vec2::ZERO, Vec2::ONE),
            is_boss: false,
        }]);
        let confirmed = vec![
            Event::EnemySpawned {
                enemy: EnemyId::new(0),
                kind: "scout".to_owned(),
                position: Vec2::ZERO,
                origin: SpawnOrigin::Wave { wave: 1 },
            },
            Event::TimeAdvanced {
                dt: Duration::from_secs(5),
            },
        ];
        manager.handle(&confirmed, &alive, &mut commands);
        assert_eq!(manager.phase(), WavePhase::Active);
        assert_eq!(manager.wave_info().enemies_alive, 1);

        manager.handle(&tick(5000), &alive, &mut commands);
        assert_eq!(manager.phase(), WavePhase::Transitioning);
    }

    #[test]
    fn transition_pause_leads_into_the_next_wave() {
        let mut manager = manager_at(3);
        manager.phase = WavePhase::Transitioning;
        let mut commands = Vec::new();
        manager.handle(&tick(3000), &no_enemies(), &mut commands);
        assert_eq!(manager.current_wave(), 3);
        manager.handle(&tick(16), &no_enemies(), &mut commands);
        assert_eq!(manager.current_wave(), 4);
        assert_eq!(manager.phase(), WavePhase::Active);
    }

    #[test]
    fn boss_wave_requests_the_boss_at_the_top_centre() {
        let mut manager = manager_at(5);
        let mut commands = Vec::new();
        manager.handle(&tick(16), &no_enemies(), &mut commands);
        assert_eq!(
            commands,
            vec![Command::SpawnBoss {
                kind: "angry_migam".to_owned(),
                position: Vec2::new(600.0, -50.0),
            }]
        );
        let info = manager.wave_info();
        assert!(info.is_boss_wave);
        assert_eq!(info.wave_name, "Boss Battle - Angry Migam");
        assert_eq!(info.enemies_remaining, 0);
    }

    #[test]
    fn last_wave_ends_in_victory() {
        let config = Config::new(
            EncounterTuning::default().with_max_waves(1),
            Playfield::default(),
            3,
        );
        let mut tables = ConfigTables::builtin();
        tables.insert_wave(
            1,
            WaveRecord::new("Quiet", BTreeMap::new(), 500, SpawnArrangement::Random),
        );
        let mut manager = WaveManager::new(config, &tables);
        let mut commands = Vec::new();
        manager.handle(&tick(16), &no_enemies(), &mut commands);
        assert!(manager.is_victory());
        assert!(manager.wave_info().all_waves_complete);
        assert_eq!(manager.progress(), 100.0);
    }
}
