#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bridge translating observed network traffic into enemy spawn commands.
//!
//! A [`PacketSource`] runs on a dedicated worker thread. Every packet it
//! observes is classified into a [`SignalCategory`], filtered through a
//! per-category [`RateLimiter`] and pushed into a bounded queue as a
//! [`SpawnRequest`]. The simulation drains that queue once per tick with
//! [`SignalBridge::drain`], which never blocks. Capture failures disable the
//! bridge without touching simulation state.

pub mod limiter;
pub mod source;

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering},
        mpsc::{sync_channel, Receiver, SyncSender, TryRecvError, TrySendError},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

pub use limiter::RateLimiter;
pub use source::{Capture, CaptureError, Observation, PacketSource, SyntheticTraffic};

use packet_striker_core::{Command, Playfield, SignalCategory, SpawnOrigin, Vec2};
use rand::Rng;
use tracing::{debug, error, info, warn};

const SPAWN_MARGIN: i32 = 50;
const SPAWN_Y: (i32, i32) = (-100, -50);

/// Configuration parameters required to construct the bridge.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    cooldown: Duration,
    queue_capacity: usize,
    playfield: Playfield,
    enemies: BTreeMap<SignalCategory, String>,
}

impl BridgeConfig {
    /// Creates a configuration with the stock category mapping.
    #[must_use]
    pub fn new(cooldown: Duration, queue_capacity: usize, playfield: Playfield) -> Self {
        let enemies = SignalCategory::ALL
            .into_iter()
            .map(|category| (category, default_enemy(category).to_owned()))
            .collect();
        Self {
            cooldown,
            queue_capacity: queue_capacity.max(1),
            playfield,
            enemies,
        }
    }

    /// Replaces the enemy type spawned for a category.
    #[must_use]
    pub fn with_enemy(mut self, category: SignalCategory, kind: impl Into<String>) -> Self {
        let _ = self.enemies.insert(category, kind.into());
        self
    }

    /// Minimum spacing between accepted signals of one category.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Number of spawn requests the queue holds before dropping new ones.
    #[must_use]
    pub const fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Enemy type key spawned for the category.
    #[must_use]
    pub fn enemy_for(&self, category: SignalCategory) -> &str {
        self.enemies
            .get(&category)
            .map_or_else(|| default_enemy(category), String::as_str)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 64, Playfield::default())
    }
}

/// Enemy type spawned for a category unless configured otherwise.
#[must_use]
pub const fn default_enemy(category: SignalCategory) -> &'static str {
    match category {
        SignalCategory::Tcp => "interceptor",
        SignalCategory::Icmp => "fighter",
        SignalCategory::Arp => "scout",
        SignalCategory::Udp => "gunship",
    }
}

/// Admitted signal waiting to be turned into a spawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnRequest {
    /// Category that produced the request.
    pub category: SignalCategory,
    /// Enemy type key to spawn.
    pub kind: String,
}

/// Lifecycle of the producer worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeStatus {
    /// The worker is capturing packets.
    Running,
    /// The source ran out of packets.
    Closed,
    /// The worker exited after a stop request.
    Stopped,
    /// Capture failed; no further signals will arrive.
    Disabled,
}

impl BridgeStatus {
    const fn encode(self) -> u8 {
        match self {
            Self::Running => 0,
            Self::Closed => 1,
            Self::Stopped => 2,
            Self::Disabled => 3,
        }
    }

    const fn decode(value: u8) -> Self {
        match value {
            0 => Self::Running,
            1 => Self::Closed,
            2 => Self::Stopped,
            _ => Self::Disabled,
        }
    }
}

/// Packet counters collected by the worker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignalStats {
    observed: [u64; 4],
    queued: [u64; 4],
}

impl SignalStats {
    /// Classified packets seen for the category.
    #[must_use]
    pub const fn observed(&self, category: SignalCategory) -> u64 {
        self.observed[category.index()]
    }

    /// Spawn requests queued for the category.
    #[must_use]
    pub const fn queued(&self, category: SignalCategory) -> u64 {
        self.queued[category.index()]
    }
}

#[derive(Debug, Default)]
struct Shared {
    stop: AtomicBool,
    status: AtomicU8,
    observed: [AtomicU64; 4],
    queued: [AtomicU64; 4],
}

impl Shared {
    fn status(&self) -> BridgeStatus {
        BridgeStatus::decode(self.status.load(Ordering::Acquire))
    }

    fn set_status(&self, status: BridgeStatus) {
        self.status.store(status.encode(), Ordering::Release);
    }

    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

/// Consumer half of the bridge, owned by the simulation session.
#[derive(Debug)]
pub struct SignalBridge {
    receiver: Receiver<SpawnRequest>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
    playfield: Playfield,
    capacity: usize,
}

impl SignalBridge {
    /// Starts the worker thread capturing from `source`.
    pub fn spawn<S>(config: BridgeConfig, source: S) -> Result<Self, CaptureError>
    where
        S: PacketSource,
    {
        let (sender, receiver) = sync_channel(config.queue_capacity);
        let shared = Arc::new(Shared::default());
        let producer = Producer {
            source,
            limiter: RateLimiter::new(config.cooldown),
            enemies: config.enemies.clone(),
            sender,
            shared: Arc::clone(&shared),
        };
        let worker = thread::Builder::new()
            .name("signal-bridge".to_owned())
            .spawn(move || producer.run())?;
        info!("signal bridge started with {:?} cooldown", config.cooldown);
        Ok(Self {
            receiver,
            shared,
            worker: Some(worker),
            playfield: config.playfield,
            capacity: config.queue_capacity,
        })
    }

    /// Creates a bridge that never delivers signals.
    #[must_use]
    pub fn disabled(playfield: Playfield) -> Self {
        let (sender, receiver) = sync_channel(1);
        drop(sender);
        let shared = Arc::new(Shared::default());
        shared.set_status(BridgeStatus::Disabled);
        Self {
            receiver,
            shared,
            worker: None,
            playfield,
            capacity: 1,
        }
    }

    /// Current worker status.
    #[must_use]
    pub fn status(&self) -> BridgeStatus {
        self.shared.status()
    }

    /// Snapshot of the worker's packet counters.
    #[must_use]
    pub fn stats(&self) -> SignalStats {
        let mut stats = SignalStats::default();
        for index in 0..SignalCategory::ALL.len() {
            stats.observed[index] = self.shared.observed[index].load(Ordering::Relaxed);
            stats.queued[index] = self.shared.queued[index].load(Ordering::Relaxed);
        }
        stats
    }

    /// Moves queued requests into spawn commands without blocking.
    ///
    /// At most one queue's worth of requests is drained per call. Returns the
    /// number of commands emitted.
    pub fn drain<R>(&mut self, rng: &mut R, out: &mut Vec<Command>) -> usize
    where
        R: Rng + ?Sized,
    {
        let mut drained = 0;
        while drained < self.capacity {
            match self.receiver.try_recv() {
                Ok(request) => {
                    let position = network_spawn_position(self.playfield, rng);
                    debug!(
                        "network spawn: {} -> {} at {position}",
                        request.category.key(),
                        request.kind
                    );
                    out.push(Command::SpawnEnemy {
                        kind: request.kind,
                        position,
                        origin: SpawnOrigin::Network {
                            category: request.category,
                        },
                    });
                    drained += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        drained
    }

    /// Asks the worker to stop and waits for it to exit.
    pub fn stop(&mut self) {
        self.shared.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("signal bridge worker panicked");
                self.shared.set_status(BridgeStatus::Disabled);
            }
        }
    }
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::Release);
    }
}

/// Picks a spawn point above the playfield for a network-spawned enemy.
#[must_use]
pub fn network_spawn_position<R>(playfield: Playfield, rng: &mut R) -> Vec2
where
    R: Rng + ?Sized,
{
    let max_x = (playfield.width() as i32 - SPAWN_MARGIN).max(SPAWN_MARGIN);
    let x = rng.gen_range(SPAWN_MARGIN..=max_x);
    let y = rng.gen_range(SPAWN_Y.0..=SPAWN_Y.1);
    Vec2::new(x as f32, y as f32)
}

struct Producer<S> {
    source: S,
    limiter: RateLimiter,
    enemies: BTreeMap<SignalCategory, String>,
    sender: SyncSender<SpawnRequest>,
    shared: Arc<Shared>,
}

impl<S: PacketSource> Producer<S> {
    fn run(mut self) {
        while !self.shared.stop_requested() {
            match self.source.poll() {
                Ok(Capture::Packet(observation)) => {
                    if !self.forward(observation) {
                        break;
                    }
                }
                Ok(Capture::Idle) => {}
                Ok(Capture::Closed) => {
                    info!("packet source closed");
                    self.shared.set_status(BridgeStatus::Closed);
                    return;
                }
                Err(err) => {
                    error!("signal bridge disabled: {err}");
                    self.shared.set_status(BridgeStatus::Disabled);
                    return;
                }
            }
        }
        self.shared.set_status(BridgeStatus::Stopped);
    }

    /// Returns false once the consumer is gone.
    fn forward(&mut self, observation: Observation) -> bool {
        let Some(category) = observation.classify() else {
            return true;
        };
        let index = category.index();
        let _ = self.shared.observed[index].fetch_add(1, Ordering::Relaxed);
        if !self.limiter.admit(category, Instant::now()) {
            return true;
        }

        let kind = self
            .enemies
            .get(&category)
            .cloned()
            .unwrap_or_else(|| default_enemy(category).to_owned());
        match self.sender.try_send(SpawnRequest { category, kind }) {
            Ok(()) => {
                let _ = self.shared.queued[index].fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(TrySendError::Full(request)) => {
                warn!("spawn queue full, dropping {} signal", request.category.key());
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn stock_mapping_matches_traffic_categories() {
        let config = BridgeConfig::default();
        assert_eq!(config.enemy_for(SignalCategory::Tcp), "interceptor");
        assert_eq!(config.enemy_for(SignalCategory::Icmp), "fighter");
        assert_eq!(config.enemy_for(SignalCategory::Arp), "scout");
        assert_eq!(config.enemy_for(SignalCategory::Udp), "gunship");
        assert_eq!(config.cooldown(), Duration::from_secs(1));
    }

    #[test]
    fn mapping_overrides_apply_per_category() {
        let config = BridgeConfig::default().with_enemy(SignalCategory::Udp, "bomber");
        assert_eq!(config.enemy_for(SignalCategory::Udp), "bomber");
        assert_eq!(config.enemy_for(SignalCategory::Tcp), "interceptor");
    }

    #[test]
    fn network_spawns_land_in_the_entry_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let playfield = Playfield::default();
        for _ in 0..500 {
            let position = network_spawn_position(playfield, &mut rng);
            assert!((50.0..=1150.0).contains(&position.x));
            assert!((-100.0..=-50.0).contains(&position.y));
        }
    }

    #[test]
    fn disabled_bridge_drains_nothing() {
        let mut bridge = SignalBridge::disabled(Playfield::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = Vec::new();
        assert_eq!(bridge.drain(&mut rng, &mut out), 0);
        assert!(out.is_empty());
        assert_eq!(bridge.status(), BridgeStatus::Disabled);
    }

    #[test]
    fn status_codes_round_trip() {
        for status in [
            BridgeStatus::Running,
            BridgeStatus::Closed,
            BridgeStatus::Stopped,
            BridgeStatus::Disabled,
        ] {
            assert_eq!(BridgeStatus::decode(status.encode()), status);
        }
    }
}
