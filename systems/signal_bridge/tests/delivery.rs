use std::{
    collections::VecDeque,
    thread,
    time::{Duration, Instant},
};

use packet_striker_core::{Command, Playfield, SignalCategory, SpawnOrigin};
use packet_striker_system_signal_bridge::{
    BridgeConfig, BridgeStatus, Capture, CaptureError, Observation, PacketSource, SignalBridge,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

struct Scripted {
    packets: VecDeque<Observation>,
}

impl Scripted {
    fn new(packets: impl IntoIterator<Item = Observation>) -> Self {
        Self {
            packets: packets.into_iter().collect(),
        }
    }
}

impl PacketSource for Scripted {
    fn poll(&mut self) -> Result<Capture, CaptureError> {
        Ok(self
            .packets
            .pop_front()
            .map_or(Capture::Closed, Capture::Packet))
    }
}

struct Forbidden;

impl PacketSource for Forbidden {
    fn poll(&mut self) -> Result<Capture, CaptureError> {
        Err(CaptureError::PermissionDenied {
            interface: "eth0".to_owned(),
        })
    }
}

struct Silent;

impl PacketSource for Silent {
    fn poll(&mut self) -> Result<Capture, CaptureError> {
        thread::sleep(Duration::from_millis(5));
        Ok(Capture::Idle)
    }
}

fn wait_until_settled(bridge: &SignalBridge) -> BridgeStatus {
    let deadline = Instant::now() + Duration::from_secs(5);
    while bridge.status() == BridgeStatus::Running && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    bridge.status()
}

fn drain(bridge: &mut SignalBridge) -> Vec<Command> {
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut out = Vec::new();
    let _ = bridge.drain(&mut rng, &mut out);
    out
}

#[test]
fn repeated_tcp_burst_spawns_a_single_interceptor() {
    let source = Scripted::new([
        Observation::of(SignalCategory::Tcp),
        Observation::of(SignalCategory::Tcp),
    ]);
    let mut bridge = SignalBridge::spawn(BridgeConfig::default(), source).expect("worker starts");
    assert_eq!(wait_until_settled(&bridge), BridgeStatus::Closed);

    let commands = drain(&mut bridge);
    assert_eq!(commands.len(), 1);
    assert!(matches!(
        &commands[0],
        Command::SpawnEnemy {
            kind,
            position,
            origin: SpawnOrigin::Network {
                category: SignalCategory::Tcp
            },
        } if kind == "interceptor" && (-100.0..=-50.0).contains(&position.y)
    ));

    let stats = bridge.stats();
    assert_eq!(stats.observed(SignalCategory::Tcp), 2);
    assert_eq!(stats.queued(SignalCategory::Tcp), 1);
}

#[test]
fn mixed_traffic_spawns_one_enemy_per_category() {
    let source = Scripted::new([
        Observation::of(SignalCategory::Udp),
        Observation::of(SignalCategory::Arp).with(SignalCategory::Udp),
        Observation::of(SignalCategory::Icmp),
        Observation::empty(),
        Observation::of(SignalCategory::Udp),
    ]);
    let mut bridge = SignalBridge::spawn(BridgeConfig::default(), source).expect("worker starts");
    let _ = wait_until_settled(&bridge);

    let kinds: Vec<_> = drain(&mut bridge)
        .into_iter()
        .filter_map(|command| match command {
            Command::SpawnEnemy { kind, .. } => Some(kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec!["gunship", "scout", "fighter"]);
}

#[test]
fn full_queue_drops_newer_signals() {
    let config = BridgeConfig::new(Duration::ZERO, 2, Playfield::default());
    let source = Scripted::new(SignalCategory::ALL.into_iter().map(Observation::of));
    let mut bridge = SignalBridge::spawn(config, source).expect("worker starts");
    let _ = wait_until_settled(&bridge);

    assert_eq!(drain(&mut bridge).len(), 2);
    assert!(drain(&mut bridge).is_empty());
}

#[test]
fn permission_failure_disables_the_bridge() {
    let mut bridge = SignalBridge::spawn(BridgeConfig::default(), Forbidden).expect("worker starts");
    assert_eq!(wait_until_settled(&bridge), BridgeStatus::Disabled);
    assert!(drain(&mut bridge).is_empty());
}

#[test]
fn stop_request_ends_an_idle_worker() {
    let mut bridge = SignalBridge::spawn(BridgeConfig::default(), Silent).expect("worker starts");
    assert_eq!(bridge.status(), BridgeStatus::Running);
    bridge.stop();
    assert_eq!(bridge.status(), BridgeStatus::Stopped);
}
