//! Multi-phase bosses with a scripted entrance.

use std::time::Duration;

use packet_striker_config::ConfigTables;
use packet_striker_core::{
    sprites::{SpriteCatalog, SpriteInfo, ENEMY_SPRITE},
    Aabb, EnemyId, Event, Playfield, Vec2,
};
use packet_striker_system_patterns::{
    AttackContext, AttackEffect, AttackPattern, MovementContext, MovementPattern,
};
use rand::Rng;
use tracing::{debug, info};

use crate::enemy::DamageOutcome;

const ENTRANCE_DURATION: Duration = Duration::from_secs(2);
const ENTRANCE_SPEED: f32 = 30.0;
const ENTRANCE_STOP_Y: f32 = 100.0;
const PHASE_INVULNERABILITY: Duration = Duration::from_secs(1);
const PHASE_FLASH: Duration = Duration::from_secs(1);
const HIT_FLASH: Duration = Duration::from_millis(100);
const BASE_SCORE: u32 = 5000;
const SCORE_PER_REMAINING_PHASE: u32 = 1000;

/// Live boss.
#[derive(Clone, Debug)]
pub struct Boss {
    id: EnemyId,
    kind: String,
    position: Vec2,
    health: i32,
    max_health: i32,
    age: f32,
    sprite: SpriteInfo,
    flash: Duration,
    movement: MovementPattern,
    attacks: Vec<AttackPattern>,
    phase: u32,
    invulnerability: Duration,
    entrance: Duration,
    entering: bool,
    alive: bool,
}

impl Boss {
    pub(crate) fn new(
        id: EnemyId,
        kind: String,
        position: Vec2,
        tables: &ConfigTables,
        sprites: &mut SpriteCatalog,
    ) -> Self {
        let record = tables.boss(&kind);
        let sprite = match sprites.lookup(&record.asset_key) {
            Some(size) => SpriteInfo {
                key: record.asset_key.clone(),
                size,
                placeholder: false,
            },
            None => {
                debug!(
                    "boss sprite {} missing, scaling {ENEMY_SPRITE} by {}",
                    record.asset_key, record.scale_factor
                );
                let base = sprites.resolve(ENEMY_SPRITE);
                SpriteInfo {
                    size: base.size * record.scale_factor,
                    ..base
                }
            }
        };
        let attacks = (0..record.max_phases() as usize)
            .map(|index| AttackPattern::from_spec(&record.attack_for_phase(index)))
            .collect();

        Self {
            id,
            position,
            health: record.health,
            max_health: record.health.max(1),
            age: 0.0,
            sprite,
            flash: Duration::ZERO,
            movement: MovementPattern::from_spec(&record.movement, position),
            attacks,
            phase: 1,
            invulnerability: Duration::ZERO,
            entrance: Duration::ZERO,
            entering: true,
            alive: true,
            kind,
        }
    }

    /// Identifier shared with the regular enemy id space.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Boss type key.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Centre of the boss.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Health at spawn.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Remaining health as a fraction of the maximum, in `0.0..=1.0`.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        (self.health.max(0) as f32 / self.max_health as f32).min(1.0)
    }

    /// Current attack phase, starting at one.
    #[must_use]
    pub const fn phase(&self) -> u32 {
        self.phase
    }

    /// Number of attack phases.
    #[must_use]
    pub fn max_phases(&self) -> u32 {
        self.attacks.len() as u32
    }

    /// Reports whether the entrance is still playing.
    #[must_use]
    pub const fn is_entering(&self) -> bool {
        self.entering
    }

    /// Reports whether damage is ignored after a phase change.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        !self.invulnerability.is_zero()
    }

    /// Time left in the post-transition invulnerability window.
    #[must_use]
    pub const fn invulnerability(&self) -> Duration {
        self.invulnerability
    }

    /// Sprite the boss is drawn with.
    #[must_use]
    pub fn sprite(&self) -> &SpriteInfo {
        &self.sprite
    }

    /// Visual bounds, also used for collision.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.sprite.size)
    }

    /// Reports whether the boss should be drawn highlighted this frame.
    #[must_use]
    pub fn is_flashing(&self) -> bool {
        !self.flash.is_zero() || (self.is_invulnerable() && (self.age * 10.0) as u32 % 2 == 1)
    }

    /// Score awarded on defeat; finishing in an earlier phase pays more.
    #[must_use]
    pub fn score_value(&self) -> u32 {
        let remaining = self.max_phases().saturating_sub(self.phase) + 1;
        BASE_SCORE + remaining * SCORE_PER_REMAINING_PHASE
    }

    pub(crate) const fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn update<R>(
        &mut self,
        dt: Duration,
        target: Option<Vec2>,
        playfield: Playfield,
        effects: &mut Vec<AttackEffect>,
        out_events: &mut Vec<Event>,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        let seconds = dt.as_secs_f32();
        self.age += seconds;

        if self.entering {
            self.entrance = self.entrance.saturating_add(dt);
            if self.entrance >= ENTRANCE_DURATION {
                self.entering = false;
                out_events.push(Event::BossEntranceFinished { boss: self.id });
            }
            if self.position.y < ENTRANCE_STOP_Y {
                self.position.y += ENTRANCE_SPEED * seconds;
            }
            return;
        }

        self.invulnerability = self.invulnerability.saturating_sub(dt);

        let target_phase = phase_for(self.health, self.max_health, self.max_phases());
        if target_phase != self.phase {
            self.transition_to(target_phase, effects, out_events);
        }

        let movement = MovementContext { playfield, target };
        self.movement
            .update(seconds, self.age, &mut self.position, &movement, rng);

        if let Some(target) = target {
            if !self.is_invulnerable() {
                let attack = AttackContext { playfield };
                if let Some(pattern) = self.attacks.get_mut(self.phase as usize - 1) {
                    pattern.update(seconds, self.position, target, &attack, effects, rng);
                }
            }
        }

        self.flash = self.flash.saturating_sub(dt);
        self.position = self.bounds().clamped_inside(&playfield.bounds()).center();
    }

    fn transition_to(&mut self, phase: u32, effects: &mut Vec<AttackEffect>, out_events: &mut Vec<Event>) {
        if let Some(pattern) = self.attacks.get_mut(self.phase as usize - 1) {
            pattern.stop(effects);
        }
        info!("boss {} entering phase {phase}", self.kind);
        out_events.push(Event::BossPhaseChanged {
            boss: self.id,
            from: self.phase,
            to: phase,
        });
        self.phase = phase;
        self.invulnerability = PHASE_INVULNERABILITY;
        self.flash = PHASE_FLASH;
    }

    /// Applies damage unless the boss is entering or invulnerable.
    ///
    /// A lethal hit stops every phase attack so looping cues and hazards are
    /// released.
    pub fn take_damage(&mut self, amount: i32, effects: &mut Vec<AttackEffect>) -> DamageOutcome {
        if !self.alive || self.entering || self.is_invulnerable() {
            return DamageOutcome::Ignored;
        }
        self.health -= amount;
        self.flash = HIT_FLASH;
        if self.health > 0 {
            return DamageOutcome::Hit(self.health);
        }
        for pattern in &mut self.attacks {
            pattern.stop(effects);
        }
        self.alive = false;
        DamageOutcome::Destroyed
    }

    pub(crate) fn kill(&mut self, effects: &mut Vec<AttackEffect>) {
        for pattern in &mut self.attacks {
            pattern.stop(effects);
        }
        self.alive = false;
    }
}

/// Phase selected by the remaining health fraction.
///
/// Phase boundaries round down, so a boss at exactly two thirds of its health
/// with three phases is still in phase one.
pub(crate) fn phase_for(health: i32, max_health: i32, max_phases: u32) -> u32 {
    let fraction = f64::from(health.max(0)) / f64::from(max_health.max(1));
    let lost = (fraction * f64::from(max_phases)).floor() as i64;
    (i64::from(max_phases) - lost).clamp(1, i64::from(max_phases.max(1))) as u32
}
