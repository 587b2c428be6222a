//! Movement patterns steering enemy and boss positions.

use packet_striker_config::PatternSpec;
use packet_striker_core::{Playfield, Vec2};
use rand::Rng;
use tracing::{debug, warn};

const HOVER_Y: f32 = 80.0;
const HOVER_BOB: f32 = 20.0;
const HOVER_MARGIN: f32 = 60.0;
const TELEPORT_MARGIN_X: i32 = 80;
const TELEPORT_MIN_Y: i32 = 50;
const TELEPORT_MAX_Y: i32 = 150;
const ARRIVAL_RADIUS: f32 = 5.0;
const FORTRESS_TARGET_Y: f32 = 100.0;
const FORTRESS_SWAY_RATE: f32 = 0.3;

/// Read-only environment available to movement patterns each tick.
#[derive(Clone, Copy, Debug)]
pub struct MovementContext {
    /// Field the entity moves within.
    pub playfield: Playfield,
    /// Current player position, if a player is present.
    pub target: Option<Vec2>,
}

/// Movement strategy owned by a single entity.
#[derive(Clone, Debug, PartialEq)]
pub enum MovementPattern {
    /// Constant velocity along a fixed direction.
    Straight(Straight),
    /// Descends while swaying horizontally on a sine curve.
    SineWave(Wave),
    /// Descends while swaying horizontally on a cosine curve.
    CosineWave(Wave),
    /// Descends to a threshold, then dives toward the player.
    Dive(Dive),
    /// Orbits a descending centre.
    Circular(Circular),
    /// Descends while snapping between two horizontal lanes.
    ZigZag(ZigZag),
    /// Hovers near the top of the field.
    BossHover(BossHover),
    /// Periodically glides to random points near the top of the field.
    BossTeleport(BossTeleport),
    /// Settles at the top centre and sways slowly.
    BossFortress(BossFortress),
}

impl MovementPattern {
    /// Builds the pattern named by `spec`, capturing state from `spawn`.
    ///
    /// Unknown keys fall back to straight movement using the same parameters.
    #[must_use]
    pub fn from_spec(spec: &PatternSpec, spawn: Vec2) -> Self {
        match spec.kind() {
            "sine_wave" => Self::SineWave(Wave::from_spec(spec, spawn)),
            "cosine_wave" => Self::CosineWave(Wave::from_spec(spec, spawn)),
            "dive" => Self::Dive(Dive {
                speed: spec.number("speed", 120.0),
                dive_y: spec.number("dive_y", 100.0),
                multiplier: spec.number("dive_speed_multiplier", 1.5),
                direction: None,
            }),
            "circular" => Self::Circular(Circular {
                radius: spec.number("radius", 80.0),
                angular_speed: spec.number("angular_speed", 2.0),
                center_speed: spec.number("center_speed", 50.0),
                center: spawn,
                angle: spec.number("start_angle", 0.0),
            }),
            "zigzag" => Self::ZigZag(ZigZag {
                speed: spec.number("speed", 120.0),
                width: spec.number("zigzag_width", 100.0),
                frequency: spec.number("zigzag_frequency", 3.0),
                initial_x: spawn.x,
                lane: 1.0,
            }),
            "boss_hover" => Self::BossHover(BossHover {
                amplitude: spec.number("amplitude", 80.0),
                frequency: spec.number("frequency", 0.8),
                initial_x: spawn.x,
            }),
            "boss_teleport" => Self::BossTeleport(BossTeleport {
                speed: spec.number("speed", 80.0),
                period: spec.number("teleport_frequency", 4.0),
                last_teleport: 0.0,
                target: None,
            }),
            "boss_fortress" => Self::BossFortress(BossFortress {
                speed: spec.number("speed", 30.0),
                settled: false,
            }),
            "straight" => Self::Straight(Straight::from_spec(spec)),
            "" => {
                debug!("movement pattern has no type, moving straight");
                Self::Straight(Straight::from_spec(spec))
            }
            other => {
                warn!("unknown movement pattern {other:?}, moving straight");
                Self::Straight(Straight::from_spec(spec))
            }
        }
    }

    /// Configuration key of the active variant.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Straight(_) => "straight",
            Self::SineWave(_) => "sine_wave",
            Self::CosineWave(_) => "cosine_wave",
            Self::Dive(_) => "dive",
            Self::Circular(_) => "circular",
            Self::ZigZag(_) => "zigzag",
            Self::BossHover(_) => "boss_hover",
            Self::BossTeleport(_) => "boss_teleport",
            Self::BossFortress(_) => "boss_fortress",
        }
    }

    /// Advances `position` by `dt` seconds; `age` already includes `dt`.
    pub fn update<R>(
        &mut self,
        dt: f32,
        age: f32,
        position: &mut Vec2,
        ctx: &MovementContext,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        match self {
            Self::Straight(pattern) => *position += pattern.direction * pattern.speed * dt,
            Self::SineWave(pattern) => {
                position.y += pattern.speed * dt;
                position.x = pattern.initial_x + pattern.amplitude * (age * pattern.frequency).sin();
            }
            Self::CosineWave(pattern) => {
                position.y += pattern.speed * dt;
                position.x = pattern.initial_x + pattern.amplitude * (age * pattern.frequency).cos();
            }
            Self::Dive(pattern) => pattern.update(dt, position, ctx),
            Self::Circular(pattern) => {
                pattern.center.y += pattern.center_speed * dt;
                pattern.angle += pattern.angular_speed * dt;
                *position = pattern.center
                    + pattern.radius * Vec2::new(pattern.angle.cos(), pattern.angle.sin());
            }
            Self::ZigZag(pattern) => {
                position.y += pattern.speed * dt;
                let phase = (age * pattern.frequency).sin();
                if phase > 0.0 && pattern.lane < 0.0 {
                    pattern.lane = 1.0;
                } else if phase < 0.0 && pattern.lane > 0.0 {
                    pattern.lane = -1.0;
                }
                position.x = pattern.initial_x + pattern.width * 0.5 * pattern.lane;
            }
            Self::BossHover(pattern) => {
                let swing = age * pattern.frequency;
                let x = pattern.initial_x + pattern.amplitude * swing.sin();
                let max_x = (ctx.playfield.width() - HOVER_MARGIN).max(HOVER_MARGIN);
                position.x = x.clamp(HOVER_MARGIN, max_x);
                position.y = HOVER_Y + HOVER_BOB * (swing * 0.5).sin();
            }
            Self::BossTeleport(pattern) => pattern.update(dt, age, position, ctx, rng),
            Self::BossFortress(pattern) => pattern.update(dt, age, position, ctx),
        }
    }
}

/// Parameters of [`MovementPattern::Straight`].
#[derive(Clone, Debug, PartialEq)]
pub struct Straight {
    speed: f32,
    direction: Vec2,
}

impl Straight {
    fn from_spec(spec: &PatternSpec) -> Self {
        let direction = Vec2::new(
            spec.number("direction_x", 0.0),
            spec.number("direction_y", 1.0),
        );
        Self {
            speed: spec.number("speed", 100.0),
            direction: direction.normalize_or_zero(),
        }
    }
}

/// Parameters of the sine and cosine sway patterns.
#[derive(Clone, Debug, PartialEq)]
pub struct Wave {
    speed: f32,
    amplitude: f32,
    frequency: f32,
    initial_x: f32,
}

impl Wave {
    fn from_spec(spec: &PatternSpec, spawn: Vec2) -> Self {
        Self {
            speed: spec.number("speed", 150.0),
            amplitude: spec.number("amplitude", 60.0),
            frequency: spec.number("frequency", 2.0),
            initial_x: spawn.x,
        }
    }
}

/// State of [`MovementPattern::Dive`]. The direction is locked once diving.
#[derive(Clone, Debug, PartialEq)]
pub struct Dive {
    speed: f32,
    dive_y: f32,
    multiplier: f32,
    direction: Option<Vec2>,
}

impl Dive {
    fn update(&mut self, dt: f32, position: &mut Vec2, ctx: &MovementContext) {
        match self.direction {
            Some(direction) => *position += direction * self.speed * self.multiplier * dt,
            None => {
                position.y += self.speed * dt;
                if position.y >= self.dive_y {
                    let aim = ctx.target.unwrap_or_else(|| ctx.playfield.center());
                    let toward = aim - *position;
                    self.direction = Some(if toward.length_squared() > 0.0 {
                        toward.normalize()
                    } else {
                        Vec2::Y
                    });
                }
            }
        }
    }

    /// Reports whether the dive direction has been locked.
    #[must_use]
    pub const fn is_diving(&self) -> bool {
        self.direction.is_some()
    }
}

/// State of [`MovementPattern::Circular`].
#[derive(Clone, Debug, PartialEq)]
pub struct Circular {
    radius: f32,
    angular_speed: f32,
    center_speed: f32,
    center: Vec2,
    angle: f32,
}

/// State of [`MovementPattern::ZigZag`].
#[derive(Clone, Debug, PartialEq)]
pub struct ZigZag {
    speed: f32,
    width: f32,
    frequency: f32,
    initial_x: f32,
    lane: f32,
}

/// Parameters of [`MovementPattern::BossHover`].
#[derive(Clone, Debug, PartialEq)]
pub struct BossHover {
    amplitude: f32,
    frequency: f32,
    initial_x: f32,
}

/// State of [`MovementPattern::BossTeleport`].
#[derive(Clone, Debug, PartialEq)]
pub struct BossTeleport {
    speed: f32,
    period: f32,
    last_teleport: f32,
    target: Option<Vec2>,
}

impl BossTeleport {
    fn update<R>(&mut self, dt: f32, age: f32, position: &mut Vec2, ctx: &MovementContext, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if age - self.last_teleport > self.period {
            let max_x = (ctx.playfield.width() as i32 - TELEPORT_MARGIN_X).max(TELEPORT_MARGIN_X);
            let x = rng.gen_range(TELEPORT_MARGIN_X..=max_x);
            let y = rng.gen_range(TELEPORT_MIN_Y..=TELEPORT_MAX_Y);
            self.target = Some(Vec2::new(x as f32, y as f32));
            self.last_teleport = age;
        }

        if let Some(target) = self.target {
            let toward = target - *position;
            if toward.length() > ARRIVAL_RADIUS {
                *position += toward.normalize() * self.speed * dt;
            } else {
                self.target = None;
            }
        }
    }
}

/// State of [`MovementPattern::BossFortress`].
#[derive(Clone, Debug, PartialEq)]
pub struct BossFortress {
    speed: f32,
    settled: bool,
}

impl BossFortress {
    fn update(&mut self, dt: f32, age: f32, position: &mut Vec2, ctx: &MovementContext) {
        if self.settled {
            position.x += self.speed * 0.5 * (age * FORTRESS_SWAY_RATE).sin() * dt;
            return;
        }

        let toward_x = ctx.playfield.width() * 0.5 - position.x;
        let toward_y = FORTRESS_TARGET_Y - position.y;
        if toward_x.abs() > ARRIVAL_RADIUS {
            position.x += toward_x.signum() * self.speed * dt;
        }
        if toward_y.abs() > ARRIVAL_RADIUS {
            position.y += toward_y.signum() * self.speed * dt;
        } else {
            self.settled = true;
        }
    }

    /// Reports whether the fortress reached its resting row.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.settled
    }
}
