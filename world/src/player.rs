//! Player ship driven by per-frame intent.

use std::{collections::BTreeMap, time::Duration};

use packet_striker_config::PlayerTuning;
use packet_striker_core::{Aabb, Event, Playfield, PlayerIntent, PowerUpKind, SoundCue, Vec2};

const MAX_WEAPON_LEVEL: u8 = 5;
const SPAWN_OFFSET_FROM_BOTTOM: f32 = 100.0;
const MUZZLE_INSET: f32 = 8.0;
const SPREAD_POWER_UP_ANGLE: f32 = 30.0;
const TRIPLE_SHOT_ANGLE: f32 = 15.0;
const SHIELD_CHARGES: u32 = 3;
const RAPID_FIRE_DURATION: Duration = Duration::from_secs(20);
const SPREAD_SHOT_DURATION: Duration = Duration::from_secs(10);

/// Bullet requested by the player's weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Shot {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
}

/// Authoritative state of the player ship.
#[derive(Clone, Debug)]
pub struct Player {
    tuning: PlayerTuning,
    playfield: Playfield,
    position: Vec2,
    size: Vec2,
    health: i32,
    lives: u32,
    invulnerability: Duration,
    since_last_shot: Duration,
    weapon_level: u8,
    effects: BTreeMap<PowerUpKind, Option<Duration>>,
    shield_charges: u32,
    intent: PlayerIntent,
    defeated: bool,
}

impl Player {
    pub(crate) fn new(tuning: PlayerTuning, playfield: Playfield, size: Vec2) -> Self {
        Self {
            tuning,
            playfield,
            position: spawn_point(playfield),
            size,
            health: tuning.max_health,
            lives: tuning.lives,
            invulnerability: Duration::ZERO,
            since_last_shot: tuning.shoot_delay,
            weapon_level: tuning.weapon_level.clamp(1, MAX_WEAPON_LEVEL),
            effects: BTreeMap::new(),
            shield_charges: 0,
            intent: PlayerIntent::default(),
            defeated: false,
        }
    }

    /// Centre of the ship.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Visual bounds of the ship.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Health restored on respawn.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.tuning.max_health
    }

    /// Remaining lives.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Reports whether the player still has lives left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.defeated
    }

    /// Reports whether incoming damage is currently ignored.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        !self.invulnerability.is_zero()
    }

    /// Current weapon level in `1..=5`.
    #[must_use]
    pub const fn weapon_level(&self) -> u8 {
        self.weapon_level
    }

    /// Hits the shield can still absorb.
    #[must_use]
    pub const fn shield_charges(&self) -> u32 {
        self.shield_charges
    }

    /// Reports whether the power-up effect is active.
    #[must_use]
    pub fn has_effect(&self, kind: PowerUpKind) -> bool {
        self.effects.contains_key(&kind)
    }

    /// Minimum time between shots, halved while rapid fire is active.
    #[must_use]
    pub fn shoot_delay(&self) -> Duration {
        if self.has_effect(PowerUpKind::RapidFire) {
            self.tuning.shoot_delay / 2
        } else {
            self.tuning.shoot_delay
        }
    }

    pub(crate) fn set_intent(&mut self, intent: PlayerIntent) {
        self.intent = intent;
    }

    pub(crate) fn update(&mut self, dt: Duration, shots: &mut Vec<Shot>, out_events: &mut Vec<Event>) {
        if self.defeated {
            return;
        }

        self.invulnerability = self.invulnerability.saturating_sub(dt);
        self.since_last_shot = self.since_last_shot.saturating_add(dt);
        self.expire_effects(dt, out_events);

        let direction = self.intent.direction.normalize_or_zero();
        let moved = self.position + direction * self.tuning.speed * dt.as_secs_f32();
        self.position = Aabb::from_center_size(moved, self.size)
            .clamped_inside(&self.playfield.bounds())
            .center();

        if self.intent.fire && self.since_last_shot >= self.shoot_delay() {
            self.since_last_shot = Duration::ZERO;
            self.fire(shots);
            out_events.push(Event::SoundRequested {
                cue: SoundCue::Shoot,
            });
        }
    }

    fn expire_effects(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let mut expired = Vec::new();
        for (kind, remaining) in self.effects.iter_mut() {
            if let Some(remaining) = remaining {
                *remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    expired.push(*kind);
                }
            }
        }
        for kind in expired {
            let _ = self.effects.remove(&kind);
            out_events.push(Event::PowerUpExpired { kind });
        }
    }

    fn fire(&self, shots: &mut Vec<Shot>) {
        let half = self.size * 0.5;
        let top = Vec2::new(self.position.x, self.position.y - half.y);
        let left = Vec2::new(self.position.x - half.x + MUZZLE_INSET, top.y);
        let right = Vec2::new(self.position.x + half.x - MUZZLE_INSET, top.y);
        let speed = self.tuning.bullet_speed;
        let mut shoot = |position: Vec2, degrees: f32| {
            shots.push(Shot {
                position,
                velocity: heading(degrees) * speed,
            });
        };

        if self.has_effect(PowerUpKind::SpreadShot) {
            shoot(top, 0.0);
            shoot(self.position, -SPREAD_POWER_UP_ANGLE);
            shoot(self.position, SPREAD_POWER_UP_ANGLE);
            return;
        }

        match self.weapon_level {
            1 => shoot(top, 0.0),
            2 => {
                shoot(left, 0.0);
                shoot(right, 0.0);
            }
            _ => {
                shoot(top, 0.0);
                shoot(left, -TRIPLE_SHOT_ANGLE);
                shoot(right, TRIPLE_SHOT_ANGLE);
            }
        }
    }

    /// Applies damage and reports whether a life was lost.
    ///
    /// Damage is ignored while invulnerable or defeated. A shield charge
    /// absorbs the hit without starting the invulnerability window.
    pub fn take_damage(&mut self, amount: i32, out_events: &mut Vec<Event>) -> bool {
        if self.defeated || self.is_invulnerable() {
            return false;
        }

        if self.shield_charges > 0 {
            self.shield_charges -= 1;
            if self.shield_charges == 0 {
                let _ = self.effects.remove(&PowerUpKind::Shield);
            }
            out_events.push(Event::ShieldAbsorbed {
                remaining_charges: self.shield_charges,
            });
            return false;
        }

        self.health -= amount;
        self.invulnerability = self.tuning.invulnerability;
        out_events.push(Event::PlayerDamaged {
            amount,
            remaining_health: self.health.max(0),
        });

        if self.health > 0 {
            return false;
        }

        self.health = 0;
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.defeated = true;
            out_events.push(Event::PlayerDefeated);
        } else {
            self.respawn();
            out_events.push(Event::PlayerLifeLost {
                lives_remaining: self.lives,
            });
        }
        true
    }

    fn respawn(&mut self) {
        self.health = self.tuning.max_health;
        self.invulnerability = self.tuning.invulnerability;
        self.position = spawn_point(self.playfield);
    }

    /// Applies a power-up, replacing any active effect of the same kind.
    pub fn apply_power_up(&mut self, kind: PowerUpKind, out_events: &mut Vec<Event>) {
        let remaining = match kind {
            PowerUpKind::RapidFire => Some(RAPID_FIRE_DURATION),
            PowerUpKind::SpreadShot => Some(SPREAD_SHOT_DURATION),
            PowerUpKind::Shield => {
                self.shield_charges = SHIELD_CHARGES;
                None
            }
        };
        let _ = self.effects.insert(kind, remaining);
        out_events.push(Event::PowerUpCollected { kind });
    }
}

fn spawn_point(playfield: Playfield) -> Vec2 {
    Vec2::new(
        playfield.width() * 0.5,
        playfield.height() - SPAWN_OFFSET_FROM_BOTTOM,
    )
}

/// Unit velocity for a bullet tilted `degrees` clockwise from straight up.
fn heading(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.sin(), -radians.cos())
}
