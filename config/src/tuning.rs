//! Runtime tuning constants grouped per subsystem.

use std::time::Duration;

/// Pacing parameters for the encounter engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EncounterTuning {
    max_waves: u32,
    wave_duration: Duration,
    transition_duration: Duration,
    boss_wave_interval: u32,
}

impl EncounterTuning {
    /// Creates tuning with explicit values. A zero boss interval is raised to one.
    #[must_use]
    pub const fn new(
        max_waves: u32,
        wave_duration: Duration,
        transition_duration: Duration,
        boss_wave_interval: u32,
    ) -> Self {
        Self {
            max_waves,
            wave_duration,
            transition_duration,
            boss_wave_interval: if boss_wave_interval == 0 {
                1
            } else {
                boss_wave_interval
            },
        }
    }

    /// Returns a copy with a different number of waves.
    #[must_use]
    pub const fn with_max_waves(mut self, max_waves: u32) -> Self {
        self.max_waves = max_waves;
        self
    }

    /// Last wave before victory.
    #[must_use]
    pub const fn max_waves(&self) -> u32 {
        self.max_waves
    }

    /// Time limit of a regular wave.
    #[must_use]
    pub const fn wave_duration(&self) -> Duration {
        self.wave_duration
    }

    /// Pause between a completed wave and the next one.
    #[must_use]
    pub const fn transition_duration(&self) -> Duration {
        self.transition_duration
    }

    /// Every wave number divisible by this value is a boss wave.
    #[must_use]
    pub const fn boss_wave_interval(&self) -> u32 {
        self.boss_wave_interval
    }
}

impl Default for EncounterTuning {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(10), Duration::from_secs(3), 5)
    }
}

/// Damage values and drop odds applied by the collision resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatTuning {
    /// Damage a player bullet deals to a regular enemy.
    pub bullet_damage_enemy: i32,
    /// Damage a player bullet deals to a boss.
    pub bullet_damage_boss: i32,
    /// Damage the player takes when rammed.
    pub contact_damage: i32,
    /// Damage the player takes from an enemy bullet.
    pub enemy_bullet_damage: i32,
    /// Damage an armed warning point deals.
    pub warning_point_damage: i32,
    /// Probability in `[0, 1]` that a destroyed enemy drops a power-up.
    pub power_up_drop_chance: f64,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            bullet_damage_enemy: 5,
            bullet_damage_boss: 10,
            contact_damage: 30,
            enemy_bullet_damage: 15,
            warning_point_damage: 40,
            power_up_drop_chance: 0.1,
        }
    }
}

/// Handling of the player ship.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerTuning {
    /// Health restored on every (re)spawn.
    pub max_health: i32,
    /// Lives at the start of a session.
    pub lives: u32,
    /// Movement speed in pixels per second.
    pub speed: f32,
    /// Minimum time between shots.
    pub shoot_delay: Duration,
    /// Speed of player bullets in pixels per second.
    pub bullet_speed: f32,
    /// Grace window after taking damage or respawning.
    pub invulnerability: Duration,
    /// Weapon level at spawn, in `1..=5`.
    pub weapon_level: u8,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 1000,
            lives: 3,
            speed: 300.0,
            shoot_delay: Duration::from_millis(200),
            bullet_speed: 500.0,
            invulnerability: Duration::from_millis(1500),
            weapon_level: 1,
        }
    }
}
