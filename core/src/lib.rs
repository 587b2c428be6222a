#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Packet Striker engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems react to deterministically. Systems read immutable snapshot
//! views and respond exclusively with new command batches.

pub mod geometry;
pub mod sprites;

use std::time::Duration;

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use geometry::{Aabb, Playfield};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Packet Striker.";

/// Unique identifier assigned to an enemy or boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a power-up pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerUpId(u32);

impl PowerUpId {
    /// Creates a new power-up identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Power-up categories that can drop from destroyed enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Halves the player's shoot delay for a limited time.
    RapidFire,
    /// Replaces the weapon pattern with a three-way spread for a limited time.
    SpreadShot,
    /// Grants shield charges that absorb hits until broken.
    Shield,
}

impl PowerUpKind {
    /// Every power-up kind in drop-table order.
    pub const ALL: [PowerUpKind; 3] = [Self::RapidFire, Self::SpreadShot, Self::Shield];

    /// Configuration and sprite key of the power-up.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::RapidFire => "rapid_fire",
            Self::SpreadShot => "spread_shot",
            Self::Shield => "shield",
        }
    }
}

/// Categories of observed network traffic that may request spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    /// Transmission Control Protocol traffic.
    Tcp,
    /// Internet Control Message Protocol traffic.
    Icmp,
    /// Address Resolution Protocol traffic.
    Arp,
    /// User Datagram Protocol traffic.
    Udp,
}

impl SignalCategory {
    /// Every category in classification precedence order.
    pub const ALL: [SignalCategory; 4] = [Self::Tcp, Self::Icmp, Self::Arp, Self::Udp];

    /// Lower-case protocol name.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Icmp => "icmp",
            Self::Arp => "arp",
            Self::Udp => "udp",
        }
    }

    /// Position of the category inside [`SignalCategory::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Tcp => 0,
            Self::Icmp => 1,
            Self::Arp => 2,
            Self::Udp => 3,
        }
    }
}

/// Sound cues the simulation may request from an audio backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SoundCue {
    /// Player weapon discharge.
    Shoot,
    /// Looping choir played by the image spread attack.
    Hallelujah,
    /// Looping cue played by the fast-forward image attack.
    TangTang,
    /// Played when a warning point arms.
    BlueScreen,
    /// Background music loop, silenced during boss fights.
    BackgroundMusic,
}

impl SoundCue {
    /// Asset key of the cue.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Shoot => "shoot",
            Self::Hallelujah => "Hallelujah",
            Self::TangTang => "tangtang",
            Self::BlueScreen => "bsod",
            Self::BackgroundMusic => "background",
        }
    }
}

/// Side-effecting audio hooks. Implementations must tolerate missing devices.
pub trait AudioSink {
    /// Starts playing the cue.
    fn play(&mut self, cue: SoundCue);

    /// Stops the cue if it is playing.
    fn stop(&mut self, cue: SoundCue);
}

/// Audio sink used when no audio device is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue) {}

    fn stop(&mut self, _cue: SoundCue) {}
}

/// Player intent gathered by the input adapter for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerIntent {
    /// Desired movement direction; normalised by the world.
    pub direction: Vec2,
    /// Whether the fire button is held.
    pub fire: bool,
}

/// Describes who requested an enemy spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnOrigin {
    /// Spawned by the encounter engine for the given wave.
    Wave {
        /// Wave number that scheduled the spawn.
        wave: u32,
    },
    /// Spawned in response to observed network traffic.
    Network {
        /// Traffic category that triggered the spawn.
        category: SignalCategory,
    },
}

/// Faction that fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileOwner {
    /// Fired by the player ship.
    Player,
    /// Fired by an enemy or boss.
    Enemy,
}

/// Reason an enemy was removed from the live set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DestroyCause {
    /// Health reached zero from player fire; awards score.
    PlayerFire,
    /// Rammed the player; awards nothing.
    Contact,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Replaces the player's intent for subsequent ticks.
    SetPlayerIntent {
        /// Movement and fire request for the player ship.
        intent: PlayerIntent,
    },
    /// Requests that a regular enemy enter the playfield.
    SpawnEnemy {
        /// Enemy type key resolved through the configuration tables.
        kind: String,
        /// Spawn position in playfield pixels.
        position: Vec2,
        /// Who requested the spawn.
        origin: SpawnOrigin,
    },
    /// Requests that a boss enter the playfield.
    SpawnBoss {
        /// Boss type key resolved through the configuration tables.
        kind: String,
        /// Spawn position in playfield pixels.
        position: Vec2,
    },
    /// Requests that a power-up pickup appear.
    SpawnPowerUp {
        /// Effect granted on pickup.
        kind: PowerUpKind,
        /// Spawn position in playfield pixels.
        position: Vec2,
    },
    /// Applies player-fire damage to an enemy or boss.
    DamageEnemy {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Damage dealt.
        amount: i32,
    },
    /// Removes an enemy regardless of its health.
    DestroyEnemy {
        /// Identifier of the enemy to remove.
        enemy: EnemyId,
        /// Reason for the removal.
        cause: DestroyCause,
    },
    /// Removes a projectile from the playfield.
    DestroyProjectile {
        /// Identifier of the projectile to remove.
        projectile: ProjectileId,
    },
    /// Applies damage to the player ship.
    DamagePlayer {
        /// Damage dealt.
        amount: i32,
    },
    /// Applies a power-up to the player and removes the pickup.
    CollectPowerUp {
        /// Identifier of the pickup.
        power_up: PowerUpId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a regular enemy entered the live set.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Enemy type key.
        kind: String,
        /// Spawn position.
        position: Vec2,
        /// Who requested the spawn.
        origin: SpawnOrigin,
    },
    /// Confirms that a boss entered the live set.
    BossSpawned {
        /// Identifier assigned to the boss.
        boss: EnemyId,
        /// Boss type key.
        kind: String,
        /// Spawn position.
        position: Vec2,
        /// Number of attack phases the boss cycles through.
        max_phases: u32,
    },
    /// Announces that the boss finished its entrance and can be damaged.
    BossEntranceFinished {
        /// Identifier of the boss.
        boss: EnemyId,
    },
    /// Announces that a boss switched attack phase.
    BossPhaseChanged {
        /// Identifier of the boss.
        boss: EnemyId,
        /// Phase before the transition.
        from: u32,
        /// Phase after the transition.
        to: u32,
    },
    /// Reports that an enemy survived a hit.
    EnemyHit {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Health remaining after the hit.
        remaining_health: i32,
    },
    /// Reports that a regular enemy was destroyed.
    EnemyDestroyed {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Enemy type key.
        kind: String,
        /// Position at the moment of destruction.
        position: Vec2,
        /// Score the enemy is worth.
        score_value: u32,
        /// Reason for the destruction.
        cause: DestroyCause,
    },
    /// Reports that an enemy drifted out of the playfield and was discarded.
    EnemyLeftField {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// Reports that a boss was defeated.
    BossDefeated {
        /// Identifier of the boss.
        boss: EnemyId,
        /// Boss type key.
        kind: String,
        /// Position at the moment of defeat.
        position: Vec2,
        /// Score the boss is worth.
        score_value: u32,
    },
    /// Reports that the player lost health.
    PlayerDamaged {
        /// Damage dealt.
        amount: i32,
        /// Health remaining after the hit.
        remaining_health: i32,
    },
    /// Reports that a shield charge absorbed a hit.
    ShieldAbsorbed {
        /// Charges left after the hit.
        remaining_charges: u32,
    },
    /// Reports that the player lost a life and respawned.
    PlayerLifeLost {
        /// Lives remaining after the loss.
        lives_remaining: u32,
    },
    /// Reports that the player ran out of lives.
    PlayerDefeated,
    /// Confirms that a power-up pickup appeared.
    PowerUpSpawned {
        /// Identifier assigned to the pickup.
        power_up: PowerUpId,
        /// Effect granted on pickup.
        kind: PowerUpKind,
        /// Spawn position.
        position: Vec2,
    },
    /// Reports that the player picked up a power-up.
    PowerUpCollected {
        /// Effect that was applied.
        kind: PowerUpKind,
    },
    /// Reports that a timed power-up effect ran out.
    PowerUpExpired {
        /// Effect that expired.
        kind: PowerUpKind,
    },
    /// Requests that the audio backend start a cue.
    SoundRequested {
        /// Cue to play.
        cue: SoundCue,
    },
    /// Requests that the audio backend stop a cue.
    SoundStopped {
        /// Cue to stop.
        cue: SoundCue,
    },
}

/// Immutable representation of a single enemy used for collision queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Visual bounds of the enemy.
    pub bounds: Aabb,
    /// Whether the enemy is a boss.
    pub is_boss: bool,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Faction that fired it.
    pub owner: ProjectileOwner,
    /// Visual bounds of the projectile.
    pub bounds: Aabb,
}

/// Read-only snapshot describing all live projectiles.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Projectiles fired by the given faction.
    pub fn owned_by(&self, owner: ProjectileOwner) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots
            .iter()
            .filter(move |snapshot| snapshot.owner == owner)
    }
}

/// Immutable representation of a single power-up pickup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUpSnapshot {
    /// Identifier of the pickup.
    pub id: PowerUpId,
    /// Effect granted on pickup.
    pub kind: PowerUpKind,
    /// Visual bounds of the pickup.
    pub bounds: Aabb,
}

/// Read-only snapshot describing all live pickups.
#[derive(Clone, Debug, Default)]
pub struct PowerUpView {
    snapshots: Vec<PowerUpSnapshot>,
}

impl PowerUpView {
    /// Creates a new pickup view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PowerUpSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PowerUpSnapshot> {
        self.snapshots.iter()
    }
}

/// Immutable representation of the player ship.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Visual bounds of the ship.
    pub bounds: Aabb,
    /// Whether incoming damage is currently ignored.
    pub invulnerable: bool,
    /// Whether the player still has lives left.
    pub alive: bool,
}

#[cfg(test)]
mod tests {
    use super::{EnemyId, PowerUpKind, ProjectileId, SignalCategory};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn enemy_id_round_trips_through_bincode() {
        assert_round_trip(&EnemyId::new(42));
    }

    #[test]
    fn projectile_id_round_trips_through_bincode() {
        assert_round_trip(&ProjectileId::new(7));
    }

    #[test]
    fn power_up_kind_round_trips_through_bincode() {
        for kind in PowerUpKind::ALL {
            assert_round_trip(&kind);
        }
    }

    #[test]
    fn signal_category_indices_follow_precedence() {
        for (expected, category) in SignalCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), expected);
        }
    }

    #[test]
    fn power_up_keys_match_sprite_names() {
        let keys: Vec<&str> = PowerUpKind::ALL.iter().map(|kind| kind.key()).collect();
        assert_eq!(keys, ["rapid_fire", "spread_shot", "shield"]);
    }
}
