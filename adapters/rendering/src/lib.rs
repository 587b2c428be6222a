#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Packet Striker adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use packet_striker_core::{
    sprites::PLAYER_SPRITE, Playfield, PlayerIntent, PowerUpKind, ProjectileOwner, SpawnOrigin,
};
use packet_striker_session::{Session, SessionStatus};
use packet_striker_world::{projectile::WarningState, query};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Background drawn behind every health bar.
pub const HEALTH_BAR_BACKGROUND: Color = Color::from_rgb_u8(100, 0, 0);

/// Fill colour of the boss health bar for the remaining health fraction.
///
/// Above half health the bar shades from red towards yellow; at or below half
/// it stays yellow.
#[must_use]
pub fn health_bar_color(fraction: f32) -> Color {
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction > 0.5 {
        let green = (255.0 * (1.0 - fraction) * 2.0) as u8;
        Color::from_rgb_u8(255, green, 0)
    } else {
        Color::from_rgb_u8(255, 255, 0)
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Requested movement direction; the world normalises it.
    pub direction: Vec2,
    /// Whether the fire button is held.
    pub fire: bool,
}

impl FrameInput {
    /// Converts the input into the player's intent for the frame.
    #[must_use]
    pub const fn intent(&self) -> PlayerIntent {
        PlayerIntent {
            direction: self.direction,
            fire: self.fire,
        }
    }
}

/// Draw order of scene sprites, back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteLayer {
    /// Warning markers painted under everything else.
    WarningPoint,
    /// Falling pickups.
    PowerUp,
    /// Regular enemies.
    Enemy,
    /// Bosses.
    Boss,
    /// Enemy and boss bullets.
    EnemyBullet,
    /// Player bullets.
    PlayerBullet,
    /// The player ship.
    Player,
}

/// A single sprite to draw this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSprite {
    /// Draw order bucket.
    pub layer: SpriteLayer,
    /// Asset key of the image.
    pub sprite: String,
    /// Centre of the sprite in playfield pixels.
    pub position: Vec2,
    /// Drawn size in pixels.
    pub size: Vec2,
    /// Whether the sprite should be drawn with the hit flash.
    pub flashing: bool,
}

impl SceneSprite {
    /// Creates a new sprite description.
    #[must_use]
    pub fn new(
        layer: SpriteLayer,
        sprite: impl Into<String>,
        position: Vec2,
        size: Vec2,
        flashing: bool,
    ) -> Self {
        Self {
            layer,
            sprite: sprite.into(),
            position,
            size,
            flashing,
        }
    }
}

/// Health bar drawn at the top of the screen during a boss fight.
#[derive(Clone, Debug, PartialEq)]
pub struct BossHealthBar {
    /// Boss type key.
    pub name: String,
    /// Remaining health in `[0, 1]`.
    pub fraction: f32,
    /// Current attack phase.
    pub phase: u32,
    /// Number of attack phases.
    pub max_phases: u32,
    /// Fill colour for the remaining health.
    pub color: Color,
}

impl BossHealthBar {
    /// Creates a bar whose colour follows [`health_bar_color`].
    #[must_use]
    pub fn new(name: impl Into<String>, fraction: f32, phase: u32, max_phases: u32) -> Self {
        Self {
            name: name.into(),
            fraction: fraction.clamp(0.0, 1.0),
            phase,
            max_phases,
            color: health_bar_color(fraction),
        }
    }

    /// Caption shown under the bar.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{} - Phase {}", self.name.to_uppercase(), self.phase)
    }
}

/// Heads-up display values.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    /// Points earned so far.
    pub score: u64,
    /// Player health.
    pub health: i32,
    /// Player health cap.
    pub max_health: i32,
    /// Lives left.
    pub lives: u32,
    /// Weapon level.
    pub weapon_level: u8,
    /// Shield charges left.
    pub shield_charges: u32,
    /// Timed power-ups currently active.
    pub active_effects: Vec<PowerUpKind>,
    /// Current wave number.
    pub wave_number: u32,
    /// Number of waves in the encounter.
    pub max_waves: u32,
    /// Display name of the wave.
    pub wave_name: String,
    /// Enemies alive on the field.
    pub enemies_alive: usize,
    /// Live enemies that were spawned by network traffic.
    pub network_enemies: usize,
    /// Enemies still to be spawned.
    pub enemies_remaining: u32,
    /// Wave time used, in percent; shown only for active regular waves.
    pub wave_progress: Option<f32>,
    /// Outcome banner, once the session has ended.
    pub outcome: Option<SessionStatus>,
}

impl Hud {
    /// Caption of the wave line.
    #[must_use]
    pub fn wave_caption(&self) -> String {
        format!(
            "Wave {}/{}: {}",
            self.wave_number, self.max_waves, self.wave_name
        )
    }
}

/// Scene description listing everything a backend draws for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Size of the playfield.
    pub playfield: Playfield,
    /// Sprites sorted back to front.
    pub sprites: Vec<SceneSprite>,
    /// Boss health bar, hidden while the boss makes its entrance.
    pub boss_bar: Option<BossHealthBar>,
    /// Heads-up display values.
    pub hud: Hud,
}

impl Scene {
    /// Builds the scene for the session's current state.
    #[must_use]
    pub fn capture(session: &Session) -> Self {
        let world = session.world();
        let mut sprites = Vec::new();

        for point in query::warning_points(world) {
            sprites.push(SceneSprite::new(
                SpriteLayer::WarningPoint,
                point.sprite().key.as_str(),
                point.position(),
                point.sprite().size,
                point.state() == WarningState::Active,
            ));
        }
        for power_up in query::power_ups(world) {
            sprites.push(SceneSprite::new(
                SpriteLayer::PowerUp,
                power_up.sprite().key.as_str(),
                power_up.position(),
                power_up.sprite().size,
                false,
            ));
        }
        for enemy in query::enemies(world) {
            sprites.push(SceneSprite::new(
                SpriteLayer::Enemy,
                enemy.sprite().key.as_str(),
                enemy.position(),
                enemy.sprite().size,
                enemy.is_flashing(),
            ));
        }
        for boss in query::bosses(world) {
            sprites.push(SceneSprite::new(
                SpriteLayer::Boss,
                boss.sprite().key.as_str(),
                boss.position(),
                boss.sprite().size,
                boss.is_flashing(),
            ));
        }
        for projectile in query::projectiles(world) {
            let layer = match projectile.owner() {
                ProjectileOwner::Player => SpriteLayer::PlayerBullet,
                ProjectileOwner::Enemy => SpriteLayer::EnemyBullet,
            };
            sprites.push(SceneSprite::new(
                layer,
                projectile.sprite().key.as_str(),
                projectile.position(),
                projectile.sprite().size,
                false,
            ));
        }

        let player = query::player(world);
        if player.is_alive() {
            sprites.push(SceneSprite::new(
                SpriteLayer::Player,
                PLAYER_SPRITE,
                player.position(),
                player.bounds().size(),
                player.is_invulnerable(),
            ));
        }
        sprites.sort_by_key(|sprite| sprite.layer);

        let wave = session.wave_info();
        let boss_bar = wave
            .boss
            .and_then(|id| query::boss(world, id))
            .filter(|boss| !boss.is_entering())
            .map(|boss| {
                BossHealthBar::new(
                    boss.kind(),
                    boss.health_fraction(),
                    boss.phase(),
                    boss.max_phases(),
                )
            });

        let active_effects = PowerUpKind::ALL
            .into_iter()
            .filter(|kind| player.has_effect(*kind))
            .collect();
        let hud = Hud {
            score: session.score(),
            health: player.health(),
            max_health: player.max_health(),
            lives: player.lives(),
            weapon_level: player.weapon_level(),
            shield_charges: player.shield_charges(),
            active_effects,
            wave_number: wave.wave_number,
            max_waves: wave.max_waves,
            wave_progress: (wave.wave_active && !wave.is_boss_wave).then_some(wave.progress),
            wave_name: wave.wave_name,
            enemies_alive: wave.enemies_alive,
            network_enemies: query::enemies(world)
                .iter()
                .filter(|enemy| matches!(enemy.origin(), SpawnOrigin::Network { .. }))
                .count(),
            enemies_remaining: wave.enemies_remaining,
            outcome: session.is_over().then(|| session.status()),
        };

        Self {
            playfield: query::playfield(world),
            sprites,
            boss_bar,
            hud,
        }
    }

    /// Number of sprites drawn on the given layer.
    #[must_use]
    pub fn count(&self, layer: SpriteLayer) -> usize {
        self.sprites
            .iter()
            .filter(|sprite| sprite.layer == layer)
            .count()
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Frame pacing requested from the backend.
    pub timing: FrameTiming,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, timing: FrameTiming) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            timing,
        }
    }
}

/// Fixed frame rate the simulation is stepped at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTiming {
    frames_per_second: u32,
}

impl FrameTiming {
    /// Frame rate the game is tuned for.
    pub const DEFAULT_FRAMES_PER_SECOND: u32 = 60;

    /// Creates a timing descriptor, rejecting a zero frame rate.
    pub fn new(frames_per_second: u32) -> Result<Self, RenderingError> {
        if frames_per_second == 0 {
            return Err(RenderingError::InvalidFrameRate { frames_per_second });
        }
        Ok(Self { frames_per_second })
    }

    /// Frames stepped per simulated second.
    #[must_use]
    pub const fn frames_per_second(&self) -> u32 {
        self.frames_per_second
    }

    /// Simulated time covered by one frame.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.frames_per_second
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self {
            frames_per_second: Self::DEFAULT_FRAMES_PER_SECOND,
        }
    }
}

/// Whether the backend should keep presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Present another frame.
    Continue,
    /// Stop after this frame.
    Exit,
}

/// Rendering backend capable of presenting Packet Striker scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and per-frame input captured by the backend, steps the simulation and
    /// returns the scene to present together with whether to continue.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput) -> (Scene, FrameControl) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Frames must advance at a positive rate.
    InvalidFrameRate {
        /// Provided frame rate that failed validation.
        frames_per_second: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFrameRate { frames_per_second } => {
                write!(
                    f,
                    "frames_per_second must be positive (received {frames_per_second})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use packet_striker_core::{NullAudio, SignalCategory};
    use packet_striker_session::SessionConfig;
    use packet_striker_system_signal_bridge::{
        BridgeConfig, BridgeStatus, Capture, CaptureError, Observation, PacketSource, SignalBridge,
    };
    use std::{thread, time::Instant};

    struct OnePacket(Option<Observation>);

    impl PacketSource for OnePacket {
        fn poll(&mut self) -> Result<Capture, CaptureError> {
            Ok(self.0.take().map_or(Capture::Closed, Capture::Packet))
        }
    }

    fn session() -> Session {
        let config = SessionConfig::default();
        let bridge = SignalBridge::disabled(config.playfield);
        Session::new(config, bridge, Box::new(NullAudio))
    }

    #[test]
    fn health_bar_shades_from_red_to_yellow() {
        assert_eq!(health_bar_color(1.0), Color::from_rgb_u8(255, 0, 0));
        assert_eq!(health_bar_color(0.75), Color::from_rgb_u8(255, 127, 0));
        assert_eq!(health_bar_color(0.5), Color::from_rgb_u8(255, 255, 0));
        assert_eq!(health_bar_color(0.1), Color::from_rgb_u8(255, 255, 0));
    }

    #[test]
    fn boss_caption_names_the_phase() {
        let bar = BossHealthBar::new("angry_migam", 0.33, 3, 3);
        assert_eq!(bar.caption(), "ANGRY_MIGAM - Phase 3");
        assert_eq!(bar.color, Color::from_rgb_u8(255, 255, 0));
    }

    #[test]
    fn frame_timing_rejects_zero_rate_without_panicking() {
        let error = FrameTiming::new(0).expect_err("zero frame rate must be rejected");
        assert!(matches!(
            error,
            RenderingError::InvalidFrameRate {
                frames_per_second: 0
            }
        ));
        assert_eq!(
            FrameTiming::default().frame_duration(),
            Duration::from_secs(1) / 60
        );
    }

    #[test]
    fn fresh_session_shows_only_the_player() {
        let scene = Scene::capture(&session());
        assert_eq!(scene.sprites.len(), 1);
        assert_eq!(scene.count(SpriteLayer::Player), 1);
        assert_eq!(scene.sprites[0].size, Vec2::splat(48.0));
        assert!(scene.boss_bar.is_none());
        assert_eq!(scene.hud.health, 1000);
        assert_eq!(scene.hud.lives, 3);
        assert_eq!(scene.hud.wave_number, 1);
    }

    #[test]
    fn firing_adds_player_bullets_above_the_ship() {
        let mut session = session();
        let input = FrameInput {
            direction: Vec2::ZERO,
            fire: true,
        };
        let _ = session.step(FrameTiming::default().frame_duration(), input.intent());
        let scene = Scene::capture(&session);
        assert!(scene.count(SpriteLayer::PlayerBullet) >= 1);
        assert_eq!(
            scene.sprites.last().map(|sprite| sprite.layer),
            Some(SpriteLayer::Player)
        );
        assert!(scene.hud.wave_progress.is_some());
    }

    #[test]
    fn hud_counts_enemies_spawned_by_traffic() {
        let config = SessionConfig::default();
        let source = OnePacket(Some(Observation::of(SignalCategory::Icmp)));
        let bridge = SignalBridge::spawn(BridgeConfig::default(), source).expect("worker starts");
        let deadline = Instant::now() + Duration::from_secs(5);
        while bridge.status() == BridgeStatus::Running && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        let mut session = Session::new(config, bridge, Box::new(NullAudio));
        assert_eq!(Scene::capture(&session).hud.network_enemies, 0);

        let _ = session.step(
            FrameTiming::default().frame_duration(),
            FrameInput::default().intent(),
        );
        let scene = Scene::capture(&session);
        assert_eq!(scene.hud.network_enemies, 1);
        assert!(scene.count(SpriteLayer::Enemy) >= 1);
    }
}
