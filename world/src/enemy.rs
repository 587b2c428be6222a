//! Regular enemies composed from configuration records.

use std::time::Duration;

use packet_striker_config::ConfigTables;
use packet_striker_core::{
    sprites::{SpriteCatalog, SpriteInfo, ENEMY_SPRITE},
    Aabb, EnemyId, Playfield, SpawnOrigin, Vec2,
};
use packet_striker_system_patterns::{
    AttackContext, AttackEffect, AttackPattern, MovementContext, MovementPattern,
};
use rand::Rng;

const HIT_FLASH: Duration = Duration::from_millis(100);
const DESPAWN_MARGIN: Vec2 = Vec2::new(100.0, 100.0);

/// Result of applying damage to an enemy or boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The damage was discarded.
    Ignored,
    /// The target survived with the remaining health.
    Hit(i32),
    /// The hit destroyed the target.
    Destroyed,
}

/// Live regular enemy.
#[derive(Clone, Debug)]
pub struct Enemy {
    id: EnemyId,
    kind: String,
    origin: SpawnOrigin,
    position: Vec2,
    health: i32,
    max_health: i32,
    age: f32,
    score_value: u32,
    sprite: SpriteInfo,
    flash: Duration,
    movement: MovementPattern,
    attack: AttackPattern,
    entered_field: bool,
    alive: bool,
}

impl Enemy {
    pub(crate) fn new(
        id: EnemyId,
        kind: String,
        position: Vec2,
        origin: SpawnOrigin,
        tables: &ConfigTables,
        sprites: &mut SpriteCatalog,
    ) -> Self {
        let record = tables.enemy(&kind);
        let sprite = sprites.resolve_or(&record.asset_key, ENEMY_SPRITE);
        Self {
            id,
            origin,
            position,
            health: record.health,
            max_health: record.health.max(1),
            age: 0.0,
            score_value: tables.score_value(&kind),
            sprite,
            flash: Duration::ZERO,
            movement: MovementPattern::from_spec(&record.movement, position),
            attack: AttackPattern::from_spec(&record.attack),
            entered_field: false,
            alive: true,
            kind,
        }
    }

    /// Identifier assigned at spawn.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Type key the enemy was built from.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Who requested the spawn.
    #[must_use]
    pub const fn origin(&self) -> SpawnOrigin {
        self.origin
    }

    /// Centre of the enemy.
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

    /// Score awarded when the player destroys the enemy.
    #[must_use]
    pub const fn score_value(&self) -> u32 {
        self.score_value
    }

    /// Sprite the enemy is drawn with.
    #[must_use]
    pub fn sprite(&self) -> &SpriteInfo {
        &self.sprite
    }

    /// Visual bounds, also used for collision.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.sprite.size)
    }

    /// Reports whether the hit flash is showing.
    #[must_use]
    pub fn is_flashing(&self) -> bool {
        !self.flash.is_zero()
    }

    /// Movement pattern key.
    #[must_use]
    pub const fn movement_key(&self) -> &'static str {
        self.movement.key()
    }

    /// Attack pattern key.
    #[must_use]
    pub fn attack_key(&self) -> &'static str {
        self.attack.key()
    }

    pub(crate) const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Advances the enemy and reports whether it is still within reach of the field.
    pub(crate) fn update<R>(
        &mut self,
        dt: Duration,
        target: Option<Vec2>,
        playfield: Playfield,
        effects: &mut Vec<AttackEffect>,
        rng: &mut R,
    ) -> bool
    where
        R: Rng + ?Sized,
    {
        let seconds = dt.as_secs_f32();
        self.age += seconds;

        let movement = MovementContext { playfield, target };
        self.movement
            .update(seconds, self.age, &mut self.position, &movement, rng);
        if let Some(target) = target {
            let attack = AttackContext { playfield };
            self.attack
                .update(seconds, self.position, target, &attack, effects, rng);
        }

        self.position.x = self.position.x.clamp(0.0, playfield.width());
        self.flash = self.flash.saturating_sub(dt);

        let reach = playfield.bounds().inflate(DESPAWN_MARGIN);
        let inside = self.bounds().overlaps(&reach);
        if inside {
            self.entered_field = true;
        }
        inside || !self.entered_field
    }

    /// Applies damage, marking the enemy dead once its health is spent.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }
        self.health -= amount;
        self.flash = HIT_FLASH;
        if self.health <= 0 {
            self.alive = false;
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Hit(self.health)
        }
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }

    pub(crate) fn stop_attack(&mut self, effects: &mut Vec<AttackEffect>) {
        self.attack.stop(effects);
    }
}
