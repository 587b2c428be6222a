//! Short-lived entities: bullets, pickups and warning points.

use std::time::Duration;

use packet_striker_core::{
    sprites::SpriteInfo, Aabb, EnemyId, Playfield, PowerUpId, PowerUpKind, ProjectileId,
    ProjectileOwner, Vec2,
};

const POWER_UP_FALL_SPEED: f32 = 100.0;
const WARNING_ACTIVE_WINDOW: Duration = Duration::from_millis(500);

/// Bullet fired by the player or an enemy.
#[derive(Clone, Debug)]
pub struct Projectile {
    id: ProjectileId,
    owner: ProjectileOwner,
    position: Vec2,
    velocity: Vec2,
    sprite: SpriteInfo,
}

impl Projectile {
    pub(crate) fn new(
        id: ProjectileId,
        owner: ProjectileOwner,
        position: Vec2,
        velocity: Vec2,
        sprite: SpriteInfo,
    ) -> Self {
        Self {
            id,
            owner,
            position,
            velocity,
            sprite,
        }
    }

    /// Identifier assigned at spawn.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Side that fired the bullet.
    #[must_use]
    pub const fn owner(&self) -> ProjectileOwner {
        self.owner
    }

    /// Centre of the bullet.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity in pixels per second.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Sprite the bullet is drawn with.
    #[must_use]
    pub fn sprite(&self) -> &SpriteInfo {
        &self.sprite
    }

    /// Visual bounds, also used for collision.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.sprite.size)
    }

    /// Moves the bullet and reports whether it still overlaps the field.
    pub(crate) fn update(&mut self, dt: Duration, playfield: Playfield) -> bool {
        self.position += self.velocity * dt.as_secs_f32();
        self.bounds().overlaps(&playfield.bounds())
    }
}

/// Falling pickup.
#[derive(Clone, Debug)]
pub struct PowerUp {
    id: PowerUpId,
    kind: PowerUpKind,
    position: Vec2,
    sprite: SpriteInfo,
}

impl PowerUp {
    pub(crate) fn new(id: PowerUpId, kind: PowerUpKind, position: Vec2, sprite: SpriteInfo) -> Self {
        Self {
            id,
            kind,
            position,
            sprite,
        }
    }

    /// Identifier assigned at spawn.
    #[must_use]
    pub const fn id(&self) -> PowerUpId {
        self.id
    }

    /// Effect granted on pickup.
    #[must_use]
    pub const fn kind(&self) -> PowerUpKind {
        self.kind
    }

    /// Centre of the pickup.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Sprite the pickup is drawn with.
    #[must_use]
    pub fn sprite(&self) -> &SpriteInfo {
        &self.sprite
    }

    /// Visual bounds, also used for collision.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.sprite.size)
    }

    /// Falls and reports whether the pickup has not yet dropped below the field.
    pub(crate) fn update(&mut self, dt: Duration, playfield: Playfield) -> bool {
        self.position.y += POWER_UP_FALL_SPEED * dt.as_secs_f32();
        self.bounds().min().y <= playfield.height()
    }
}

/// Lifecycle of a warning point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarningState {
    /// Counting down to activation; harmless.
    Arming,
    /// Showing the blue screen and able to strike once.
    Active,
}

/// What happened to a warning point during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct WarningTick {
    pub(crate) armed: bool,
    pub(crate) strike: bool,
    pub(crate) expired: bool,
}

/// Delayed area hazard spawned by the blue-screen attack.
#[derive(Clone, Debug)]
pub struct WarningPoint {
    owner: EnemyId,
    position: Vec2,
    delay: Duration,
    elapsed: Duration,
    state: WarningState,
    struck: bool,
    sprite: SpriteInfo,
}

impl WarningPoint {
    pub(crate) fn new(owner: EnemyId, position: Vec2, delay: Duration, sprite: SpriteInfo) -> Self {
        Self {
            owner,
            position,
            delay,
            elapsed: Duration::ZERO,
            state: WarningState::Arming,
            struck: false,
            sprite,
        }
    }

    /// Boss whose attack created the hazard.
    #[must_use]
    pub const fn owner(&self) -> EnemyId {
        self.owner
    }

    /// Centre of the hazard.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> WarningState {
        self.state
    }

    /// Sprite the hazard is drawn with.
    #[must_use]
    pub fn sprite(&self) -> &SpriteInfo {
        &self.sprite
    }

    /// Visual bounds, also used for the strike test.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.sprite.size)
    }

    pub(crate) fn update(
        &mut self,
        dt: Duration,
        player: Option<Aabb>,
        blue_screen: &SpriteInfo,
    ) -> WarningTick {
        let mut tick = WarningTick::default();
        self.elapsed = self.elapsed.saturating_add(dt);
        match self.state {
            WarningState::Arming => {
                if self.elapsed > self.delay {
                    self.state = WarningState::Active;
                    self.elapsed = Duration::ZERO;
                    self.sprite = blue_screen.clone();
                    tick.armed = true;
                }
            }
            WarningState::Active => {
                let overlapping = player.map_or(false, |bounds| bounds.overlaps(&self.bounds()));
                if !self.struck && overlapping {
                    self.struck = true;
                    tick.strike = true;
                }
                tick.expired = self.elapsed > WARNING_ACTIVE_WINDOW;
            }
        }
        tick
    }
}
