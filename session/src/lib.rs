#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! A single owned game session driving the world and its systems.
//!
//! [`Session::step`] runs one frame of the pipeline: queued network spawns
//! are drained first, the world advances, collisions resolve, kills are
//! scored, and the wave manager schedules new spawns. Events raised by the
//! wave manager's own commands are carried into the next frame so every
//! consumer observes each event exactly once.

use std::time::Duration;

use packet_striker_config::{CombatTuning, ConfigTables, EncounterTuning, PlayerTuning};
use packet_striker_core::{AudioSink, Command, Event, Playfield, PlayerIntent, SoundCue};
use packet_striker_system_collision::{self as collision, Collision, Scoring};
use packet_striker_system_signal_bridge::{BridgeStatus, SignalBridge, SignalStats};
use packet_striker_system_waves::{self as waves, WaveInfo, WaveManager};
use packet_striker_world::{self as world, query, World, WorldConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

const SCORING_SALT: u64 = 0x5c0e_0000_0000_0001;
const BRIDGE_SALT: u64 = 0xb71d_6e00_0000_0002;

/// Everything needed to start a session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Enemy, boss and wave tables.
    pub tables: ConfigTables,
    /// Size of the playfield.
    pub playfield: Playfield,
    /// Wave pacing.
    pub encounter: EncounterTuning,
    /// Damage values and drop odds.
    pub combat: CombatTuning,
    /// Player ship handling.
    pub player: PlayerTuning,
    /// Seed every generator in the session is derived from.
    pub seed: u64,
}

impl SessionConfig {
    /// Creates a configuration with default tuning.
    #[must_use]
    pub fn new(tables: ConfigTables, seed: u64) -> Self {
        Self {
            tables,
            playfield: Playfield::default(),
            encounter: EncounterTuning::default(),
            combat: CombatTuning::default(),
            player: PlayerTuning::default(),
            seed,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(ConfigTables::builtin(), 0)
    }
}

/// Whether the session is still being played.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// The player is alive and waves remain.
    Playing,
    /// Every wave was cleared.
    Victory,
    /// The player ran out of lives.
    GameOver,
}

/// End-of-run figures reported by adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    /// Frames stepped while playing.
    pub frames: u64,
    /// Final score.
    pub score: u64,
    /// Enemies and bosses destroyed by player fire.
    pub kills: u32,
    /// Wave reached.
    pub wave: u32,
    /// Lives left.
    pub lives: u32,
    /// Enemies spawned from network signals.
    pub network_spawns: u64,
    /// Outcome at the time of the summary.
    pub status: SessionStatus,
}

/// The game session: world, systems, signal bridge and audio sink.
pub struct Session {
    world: World,
    waves: WaveManager,
    collision: Collision,
    scoring: Scoring,
    bridge: SignalBridge,
    bridge_rng: ChaCha8Rng,
    audio: Box<dyn AudioSink>,
    carried: Vec<Event>,
    frame_events: Vec<Event>,
    status: SessionStatus,
    frames: u64,
    network_spawns: u64,
}

impl Session {
    /// Creates a session at wave one and starts the background music.
    #[must_use]
    pub fn new(config: SessionConfig, bridge: SignalBridge, audio: Box<dyn AudioSink>) -> Self {
        let SessionConfig {
            tables,
            playfield,
            encounter,
            combat,
            player,
            seed,
        } = config;
        let manager = WaveManager::new(waves::Config::new(encounter, playfield, seed), &tables);
        let world = World::new(WorldConfig {
            playfield,
            player,
            combat,
            ..WorldConfig::new(tables, seed)
        });
        let mut session = Self {
            world,
            waves: manager,
            collision: Collision::new(collision::Config::new(combat)),
            scoring: Scoring::new(&combat, seed ^ SCORING_SALT),
            bridge,
            bridge_rng: ChaCha8Rng::seed_from_u64(seed ^ BRIDGE_SALT),
            audio,
            carried: Vec::new(),
            frame_events: Vec::new(),
            status: SessionStatus::Playing,
            frames: 0,
            network_spawns: 0,
        };
        session.audio.play(SoundCue::BackgroundMusic);
        info!("session started with seed {seed:#x}");
        session
    }

    /// Runs one frame. Does nothing once the session has ended.
    pub fn step(&mut self, dt: Duration, intent: PlayerIntent) -> SessionStatus {
        if self.status != SessionStatus::Playing {
            return self.status;
        }
        self.frames = self.frames.saturating_add(1);

        let mut events = std::mem::take(&mut self.carried);
        world::apply(
            &mut self.world,
            Command::SetPlayerIntent { intent },
            &mut events,
        );

        let mut commands = Vec::new();
        let drained = self.bridge.drain(&mut self.bridge_rng, &mut commands);
        self.network_spawns = self.network_spawns.saturating_add(drained as u64);
        apply_all(&mut self.world, commands, &mut events);

        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        self.collision.handle(
            &query::player_snapshot(&self.world),
            &query::enemy_view(&self.world),
            &query::projectile_view(&self.world),
            &query::power_up_view(&self.world),
            &mut commands,
        );
        apply_all(&mut self.world, commands, &mut events);

        let mut commands = Vec::new();
        self.scoring.handle(&events, &mut commands);
        apply_all(&mut self.world, commands, &mut events);

        let mut commands = Vec::new();
        self.waves
            .handle(&events, &query::enemy_view(&self.world), &mut commands);
        apply_all(&mut self.world, commands, &mut self.carried);

        self.dispatch_audio(&events);
        self.update_status(&events);
        self.frame_events = events;
        self.status
    }

    fn dispatch_audio(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::SoundRequested { cue } => self.audio.play(*cue),
                Event::SoundStopped { cue } => self.audio.stop(*cue),
                Event::BossSpawned { .. } => self.audio.stop(SoundCue::BackgroundMusic),
                Event::BossDefeated { .. } => self.audio.play(SoundCue::BackgroundMusic),
                _ => {}
            }
        }
    }

    fn update_status(&mut self, events: &[Event]) {
        if events
            .iter()
            .any(|event| matches!(event, Event::PlayerDefeated))
        {
            info!(
                "game over at wave {} with {} points",
                self.waves.current_wave(),
                self.scoring.score()
            );
            self.status = SessionStatus::GameOver;
        } else if self.waves.is_victory() {
            info!("all waves cleared with {} points", self.scoring.score());
            self.status = SessionStatus::Victory;
        }
    }

    /// Stops the signal bridge and silences the background music.
    pub fn shutdown(&mut self) {
        self.bridge.stop();
        self.audio.stop(SoundCue::BackgroundMusic);
    }

    /// Read-only access to the world for rendering.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Events raised during the last frame.
    #[must_use]
    pub fn frame_events(&self) -> &[Event] {
        &self.frame_events
    }

    /// Wave status for the heads-up display.
    #[must_use]
    pub fn wave_info(&self) -> WaveInfo {
        self.waves.wave_info()
    }

    /// Points earned so far.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.scoring.score()
    }

    /// Current outcome.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether the session has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status != SessionStatus::Playing
    }

    /// Worker status of the signal bridge.
    #[must_use]
    pub fn bridge_status(&self) -> BridgeStatus {
        self.bridge.status()
    }

    /// Packet counters of the signal bridge.
    #[must_use]
    pub fn signal_stats(&self) -> SignalStats {
        self.bridge.stats()
    }

    /// End-of-run figures.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            frames: self.frames,
            score: self.scoring.score(),
            kills: self.scoring.kills(),
            wave: self.waves.current_wave(),
            lives: query::player(&self.world).lives(),
            network_spawns: self.network_spawns,
            status: self.status,
        }
    }
}

fn apply_all(world: &mut World, commands: Vec<Command>, events: &mut Vec<Event>) {
    for command in commands {
        world::apply(world, command, events);
    }
}
