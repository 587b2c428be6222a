//! Packet sources feeding the bridge and the observations they produce.

use std::{io, thread, time::Duration};

use packet_striker_core::SignalCategory;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Protocol layers detected on a single captured packet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Observation {
    layers: [bool; 4],
}

impl Observation {
    /// Creates an observation without any recognised layer.
    #[must_use]
    pub const fn empty() -> Self {
        Self { layers: [false; 4] }
    }

    /// Creates an observation carrying a single layer.
    #[must_use]
    pub fn of(category: SignalCategory) -> Self {
        Self::empty().with(category)
    }

    /// Marks an additional layer as present.
    #[must_use]
    pub fn with(mut self, category: SignalCategory) -> Self {
        self.layers[category.index()] = true;
        self
    }

    /// Reports whether the packet carried the layer.
    #[must_use]
    pub const fn has(&self, category: SignalCategory) -> bool {
        self.layers[category.index()]
    }

    /// Category that wins classification, if any layer was recognised.
    ///
    /// Precedence follows [`SignalCategory::ALL`]: tcp, icmp, arp, udp.
    #[must_use]
    pub fn classify(&self) -> Option<SignalCategory> {
        SignalCategory::ALL
            .into_iter()
            .find(|category| self.has(*category))
    }
}

/// Result of polling a packet source once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capture {
    /// A packet was observed.
    Packet(Observation),
    /// Nothing arrived within the source's poll window.
    Idle,
    /// The source will not produce further packets.
    Closed,
}

/// Failures reported by a packet source.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The process lacks the capability to open a capture handle.
    #[error("permission denied opening capture on {interface}")]
    PermissionDenied {
        /// Interface the capture was attempted on.
        interface: String,
    },
    /// The capture backend is missing or misconfigured.
    #[error("capture unavailable: {0}")]
    Unavailable(String),
    /// Operating system failure while capturing or spawning the worker.
    #[error("capture i/o failure")]
    Io(#[from] io::Error),
}

/// Producer of typed packet observations.
///
/// Implementations may block, but should return [`Capture::Idle`] often
/// enough for the bridge to notice a stop request.
pub trait PacketSource: Send + 'static {
    /// Waits for the next packet.
    fn poll(&mut self) -> Result<Capture, CaptureError>;
}

const IDLE_POLL: Duration = Duration::from_millis(50);

/// Seeded stand-in for a live sniffer, emitting packets at a fixed rate.
#[derive(Debug)]
pub struct SyntheticTraffic {
    interval: Option<Duration>,
    rng: ChaCha8Rng,
}

impl SyntheticTraffic {
    /// Creates a source producing `packets_per_second` packets on average.
    ///
    /// Non-positive rates produce an idle source.
    #[must_use]
    pub fn new(packets_per_second: f32, seed: u64) -> Self {
        let interval = if packets_per_second > 0.0 {
            Duration::try_from_secs_f32(packets_per_second.recip()).ok()
        } else {
            None
        };
        Self {
            interval,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl PacketSource for SyntheticTraffic {
    fn poll(&mut self) -> Result<Capture, CaptureError> {
        let Some(interval) = self.interval else {
            thread::sleep(IDLE_POLL);
            return Ok(Capture::Idle);
        };
        thread::sleep(interval.min(IDLE_POLL));
        if interval > IDLE_POLL {
            let chance = IDLE_POLL.as_secs_f64() / interval.as_secs_f64();
            if !self.rng.gen_bool(chance) {
                return Ok(Capture::Idle);
            }
        }

        let primary = SignalCategory::ALL[self.rng.gen_range(0..SignalCategory::ALL.len())];
        let mut observation = Observation::of(primary);
        // IP traffic occasionally carries a second transport layer.
        if self.rng.gen_bool(0.1) {
            observation = observation.with(SignalCategory::Udp);
        }
        Ok(Capture::Packet(observation))
    }
}
