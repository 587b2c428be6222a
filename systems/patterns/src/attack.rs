//! Attack patterns gated by elapsed-time cooldowns.

use packet_striker_config::PatternSpec;
use packet_striker_core::{Playfield, SoundCue, Vec2};
use rand::Rng;
use tracing::{debug, warn};

const DEFAULT_COOLDOWN: f32 = 1.0;
const WARNING_MARGIN: i32 = 50;

/// Read-only environment available to attack patterns each tick.
#[derive(Clone, Copy, Debug)]
pub struct AttackContext {
    /// Field used to place hazards.
    pub playfield: Playfield,
}

/// Side effect requested by an attack pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum AttackEffect {
    /// Spawn an enemy bullet.
    FireBullet {
        /// Muzzle position.
        position: Vec2,
        /// Velocity in pixels per second.
        velocity: Vec2,
        /// Sprite drawn instead of the plain enemy bullet.
        sprite: Option<String>,
    },
    /// Spawn a warning point that arms after `delay` seconds.
    SpawnWarningPoint {
        /// Centre of the hazard.
        position: Vec2,
        /// Seconds until the hazard arms.
        delay: f32,
    },
    /// Start a looping cue.
    PlaySound(SoundCue),
    /// Stop a looping cue.
    StopSound(SoundCue),
    /// Remove every warning point this pattern created.
    ClearWarningPoints,
}

/// Attack strategy owned by a single entity.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackPattern {
    cooldown: f32,
    accumulated: f32,
    kind: AttackKind,
}

#[derive(Clone, Debug, PartialEq)]
enum AttackKind {
    None,
    SingleShotPlayer {
        bullet_speed: f32,
    },
    SingleShotDown {
        bullet_speed: f32,
    },
    SpreadShot(Spread),
    CircularShot {
        bullet_speed: f32,
        bullet_count: u32,
    },
    BurstFire {
        bullet_speed: f32,
        burst_count: u32,
        burst_delay: f32,
        state: BurstState,
    },
    SpreadShotImage {
        spread: Spread,
        image: String,
        cue_playing: bool,
    },
    FastForwardShotImage {
        bullet_speed: f32,
        image: String,
        cue_playing: bool,
    },
    BlueScreenAttack {
        num_points: u32,
        delay: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Spread {
    bullet_speed: f32,
    bullet_count: u32,
    spread_angle: f32,
}

impl Spread {
    fn from_spec(spec: &PatternSpec) -> Self {
        Self {
            bullet_speed: spec.number("bullet_speed", 300.0),
            bullet_count: spec.count("bullet_count", 3),
            spread_angle: spec.number("spread_angle", 15.0),
        }
    }

    /// Emits the fan centred on `base`, evenly covering `[-angle, +angle]`.
    fn fire(&self, origin: Vec2, base: Vec2, sprite: Option<&str>, out: &mut Vec<AttackEffect>) {
        for index in 0..self.bullet_count {
            let degrees = if self.bullet_count > 1 {
                -self.spread_angle
                    + 2.0 * self.spread_angle * index as f32 / (self.bullet_count - 1) as f32
            } else {
                0.0
            };
            out.push(AttackEffect::FireBullet {
                position: origin,
                velocity: rotate_degrees(base, degrees) * self.bullet_speed,
                sprite: sprite.map(str::to_owned),
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum BurstState {
    Idle,
    Bursting { fired: u32, timer: f32 },
}

impl AttackPattern {
    /// Builds the pattern named by `spec`; unknown keys never fire.
    #[must_use]
    pub fn from_spec(spec: &PatternSpec) -> Self {
        let kind = match spec.kind() {
            "single_shot_player" => AttackKind::SingleShotPlayer {
                bullet_speed: spec.number("bullet_speed", 300.0),
            },
            "single_shot_down" => AttackKind::SingleShotDown {
                bullet_speed: spec.number("bullet_speed", 300.0),
            },
            "spread_shot" => AttackKind::SpreadShot(Spread::from_spec(spec)),
            "circular_shot" => AttackKind::CircularShot {
                bullet_speed: spec.number("bullet_speed", 250.0),
                bullet_count: spec.count("bullet_count", 8),
            },
            "burst_fire" => AttackKind::BurstFire {
                bullet_speed: spec.number("bullet_speed", 350.0),
                burst_count: spec.count("burst_count", 3),
                burst_delay: spec.number("burst_delay", 0.1),
                state: BurstState::Idle,
            },
            "spread_shot_image" => AttackKind::SpreadShotImage {
                spread: Spread::from_spec(spec),
                image: spec.text("image", "jesus").to_owned(),
                cue_playing: false,
            },
            "fast_forward_shot_image" => AttackKind::FastForwardShotImage {
                bullet_speed: spec.number("bullet_speed", 300.0),
                image: spec.text("image", "tang").to_owned(),
                cue_playing: false,
            },
            "blue_screen_attack" => AttackKind::BlueScreenAttack {
                num_points: spec.count("num_points", 5),
                delay: spec.number("delay", 1.0),
            },
            "none" => AttackKind::None,
            "" => {
                debug!("attack pattern has no type, it will never fire");
                AttackKind::None
            }
            other => {
                warn!("unknown attack pattern {other:?}, it will never fire");
                AttackKind::None
            }
        };
        Self {
            cooldown: spec.number("cooldown", DEFAULT_COOLDOWN),
            accumulated: 0.0,
            kind,
        }
    }

    /// An attack that never fires.
    #[must_use]
    pub fn none() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            accumulated: 0.0,
            kind: AttackKind::None,
        }
    }

    /// Configuration key of the active variant.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match &self.kind {
            AttackKind::None => "none",
            AttackKind::SingleShotPlayer { .. } => "single_shot_player",
            AttackKind::SingleShotDown { .. } => "single_shot_down",
            AttackKind::SpreadShot(_) => "spread_shot",
            AttackKind::CircularShot { .. } => "circular_shot",
            AttackKind::BurstFire { .. } => "burst_fire",
            AttackKind::SpreadShotImage { .. } => "spread_shot_image",
            AttackKind::FastForwardShotImage { .. } => "fast_forward_shot_image",
            AttackKind::BlueScreenAttack { .. } => "blue_screen_attack",
        }
    }

    /// Seconds between attacks.
    #[must_use]
    pub const fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Accumulates `dt` seconds and fires once the cooldown is exceeded.
    pub fn update<R>(
        &mut self,
        dt: f32,
        origin: Vec2,
        target: Vec2,
        ctx: &AttackContext,
        out: &mut Vec<AttackEffect>,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        if matches!(self.kind, AttackKind::None) {
            return;
        }

        if let AttackKind::BurstFire {
            bullet_speed,
            burst_count,
            burst_delay,
            state: BurstState::Bursting { fired, timer },
        } = &mut self.kind
        {
            *timer += dt;
            if *timer >= *burst_delay {
                *timer = 0.0;
                *fired += 1;
                if let Some(direction) = aim(origin, target) {
                    out.push(AttackEffect::FireBullet {
                        position: origin,
                        velocity: direction * *bullet_speed,
                        sprite: None,
                    });
                }
                if *fired >= *burst_count {
                    self.kind.reset_burst();
                    self.accumulated = 0.0;
                }
            }
            return;
        }

        self.accumulated += dt;
        if self.accumulated > self.cooldown && self.should_attack(origin, target) {
            self.execute(origin, target, ctx, out, rng);
            self.accumulated = 0.0;
        }
    }

    /// Releases looping cues and hazards held by the pattern.
    pub fn stop(&mut self, out: &mut Vec<AttackEffect>) {
        match &mut self.kind {
            AttackKind::SpreadShotImage { cue_playing, .. } if *cue_playing => {
                *cue_playing = false;
                out.push(AttackEffect::StopSound(SoundCue::Hallelujah));
            }
            AttackKind::FastForwardShotImage { cue_playing, .. } if *cue_playing => {
                *cue_playing = false;
                out.push(AttackEffect::StopSound(SoundCue::TangTang));
            }
            AttackKind::BlueScreenAttack { .. } => out.push(AttackEffect::ClearWarningPoints),
            AttackKind::BurstFire { state, .. } => *state = BurstState::Idle,
            _ => {}
        }
    }

    fn should_attack(&self, origin: Vec2, target: Vec2) -> bool {
        match self.kind {
            AttackKind::SingleShotPlayer { .. } | AttackKind::BurstFire { .. } => {
                aim(origin, target).is_some()
            }
            _ => true,
        }
    }

    fn execute<R>(
        &mut self,
        origin: Vec2,
        target: Vec2,
        ctx: &AttackContext,
        out: &mut Vec<AttackEffect>,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        match &mut self.kind {
            AttackKind::None => {}
            AttackKind::SingleShotPlayer { bullet_speed } => {
                if let Some(direction) = aim(origin, target) {
                    out.push(AttackEffect::FireBullet {
                        position: origin,
                        velocity: direction * *bullet_speed,
                        sprite: None,
                    });
                }
            }
            AttackKind::SingleShotDown { bullet_speed } => out.push(AttackEffect::FireBullet {
                position: origin,
                velocity: Vec2::Y * *bullet_speed,
                sprite: None,
            }),
            AttackKind::SpreadShot(spread) => spread.fire(origin, Vec2::Y, None, out),
            AttackKind::CircularShot {
                bullet_speed,
                bullet_count,
            } => {
                let step = 360.0 / (*bullet_count).max(1) as f32;
                for index in 0..*bullet_count {
                    out.push(AttackEffect::FireBullet {
                        position: origin,
                        velocity: rotate_degrees(Vec2::X, index as f32 * step) * *bullet_speed,
                        sprite: None,
                    });
                }
            }
            AttackKind::BurstFire { state, .. } => {
                *state = BurstState::Bursting {
                    fired: 0,
                    timer: 0.0,
                };
            }
            AttackKind::SpreadShotImage {
                spread,
                image,
                cue_playing,
            } => {
                start_cue(cue_playing, SoundCue::Hallelujah, out);
                let base = aim(origin, target).unwrap_or(Vec2::Y);
                spread.fire(origin, base, Some(image.as_str()), out);
            }
            AttackKind::FastForwardShotImage {
                bullet_speed,
                image,
                cue_playing,
            } => {
                start_cue(cue_playing, SoundCue::TangTang, out);
                out.push(AttackEffect::FireBullet {
                    position: origin,
                    velocity: Vec2::Y * *bullet_speed,
                    sprite: Some(image.clone()),
                });
            }
            AttackKind::BlueScreenAttack { num_points, delay } => {
                let width = ctx.playfield.width() as i32;
                let height = ctx.playfield.height() as i32;
                let max_x = (width - WARNING_MARGIN).max(WARNING_MARGIN);
                let max_y = (height - WARNING_MARGIN).max(WARNING_MARGIN);
                for _ in 0..*num_points {
                    let x = rng.gen_range(WARNING_MARGIN..=max_x);
                    let y = rng.gen_range(WARNING_MARGIN..=max_y);
                    out.push(AttackEffect::SpawnWarningPoint {
                        position: Vec2::new(x as f32, y as f32),
                        delay: *delay,
                    });
                }
            }
        }
    }
}

impl AttackKind {
    fn reset_burst(&mut self) {
        if let Self::BurstFire { state, .. } = self {
            *state = BurstState::Idle;
        }
    }
}

impl Default for AttackPattern {
    fn default() -> Self {
        Self::none()
    }
}

fn start_cue(cue_playing: &mut bool, cue: SoundCue, out: &mut Vec<AttackEffect>) {
    if !*cue_playing {
        *cue_playing = true;
        out.push(AttackEffect::PlaySound(cue));
    }
}

fn aim(origin: Vec2, target: Vec2) -> Option<Vec2> {
    let toward = target - origin;
    (toward.length_squared() > 0.0).then(|| toward.normalize())
}

fn rotate_degrees(vector: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(vector)
}
