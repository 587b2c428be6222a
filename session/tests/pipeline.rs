use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::Rc,
    thread,
    time::{Duration, Instant},
};

use packet_striker_config::{ConfigTables, EncounterTuning};
use packet_striker_core::{
    AudioSink, Playfield, PlayerIntent, SignalCategory, SoundCue, SpawnOrigin, Vec2,
};
use packet_striker_session::{Session, SessionConfig, SessionStatus};
use packet_striker_system_signal_bridge::{
    BridgeConfig, BridgeStatus, Capture, CaptureError, Observation, PacketSource, SignalBridge,
};
use packet_striker_world::query;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Clone, Debug, PartialEq, Eq)]
enum Cue {
    Play(SoundCue),
    Stop(SoundCue),
}

#[derive(Clone, Default)]
struct Recorder {
    cues: Rc<RefCell<Vec<Cue>>>,
}

impl AudioSink for Recorder {
    fn play(&mut self, cue: SoundCue) {
        self.cues.borrow_mut().push(Cue::Play(cue));
    }

    fn stop(&mut self, cue: SoundCue) {
        self.cues.borrow_mut().push(Cue::Stop(cue));
    }
}

struct Scripted(VecDeque<Observation>);

impl PacketSource for Scripted {
    fn poll(&mut self) -> Result<Capture, CaptureError> {
        Ok(self.0.pop_front().map_or(Capture::Closed, Capture::Packet))
    }
}

fn quiet_session(config: SessionConfig) -> (Session, Recorder) {
    let recorder = Recorder::default();
    let bridge = SignalBridge::disabled(config.playfield);
    let session = Session::new(config, bridge, Box::new(recorder.clone()));
    (session, recorder)
}

fn firing() -> PlayerIntent {
    PlayerIntent {
        direction: Vec2::ZERO,
        fire: true,
    }
}

#[test]
fn identical_seeds_produce_identical_runs() {
    let run = || {
        let (mut session, _) = quiet_session(SessionConfig::new(ConfigTables::builtin(), 99));
        for frame in 0..900 {
            let direction = if (frame / 120) % 2 == 0 {
                Vec2::new(-1.0, 0.0)
            } else {
                Vec2::new(1.0, 0.0)
            };
            let _ = session.step(
                FRAME,
                PlayerIntent {
                    direction,
                    fire: true,
                },
            );
        }
        (
            session.summary(),
            query::enemy_count(session.world()),
            query::player(session.world()).position(),
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn session_starts_with_background_music() {
    let (_session, recorder) = quiet_session(SessionConfig::default());
    assert_eq!(
        recorder.cues.borrow().as_slice(),
        &[Cue::Play(SoundCue::BackgroundMusic)]
    );
}

#[test]
fn boss_arrival_silences_the_background_music() {
    let config = SessionConfig {
        encounter: EncounterTuning::new(10, Duration::from_secs(10), Duration::from_secs(3), 1),
        ..SessionConfig::default()
    };
    let (mut session, recorder) = quiet_session(config);
    for _ in 0..3 {
        let _ = session.step(FRAME, PlayerIntent::default());
    }
    assert!(session.wave_info().is_boss_wave);
    assert!(session.wave_info().boss.is_some());
    assert!(recorder
        .cues
        .borrow()
        .contains(&Cue::Stop(SoundCue::BackgroundMusic)));
}

#[test]
fn firing_requests_the_shoot_cue() {
    let (mut session, recorder) = quiet_session(SessionConfig::default());
    let _ = session.step(FRAME, firing());
    assert!(recorder.cues.borrow().contains(&Cue::Play(SoundCue::Shoot)));
    assert!(!query::projectiles(session.world()).is_empty());
}

#[test]
fn network_signals_spawn_enemies_in_the_world() {
    let config = SessionConfig::default();
    let source = Scripted(VecDeque::from([
        Observation::of(SignalCategory::Tcp),
        Observation::of(SignalCategory::Tcp),
        Observation::of(SignalCategory::Icmp),
    ]));
    let bridge_config = BridgeConfig::new(Duration::from_secs(1), 8, Playfield::default());
    let bridge = SignalBridge::spawn(bridge_config, source).expect("worker starts");
    let deadline = Instant::now() + Duration::from_secs(5);
    while bridge.status() == BridgeStatus::Running && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }

    let mut session = Session::new(config, bridge, Box::new(Recorder::default()));
    let _ = session.step(FRAME, PlayerIntent::default());

    let network: Vec<_> = query::enemies(session.world())
        .iter()
        .filter_map(|enemy| match enemy.origin() {
            SpawnOrigin::Network { category } => Some((category, enemy.kind().to_owned())),
            SpawnOrigin::Wave { .. } => None,
        })
        .collect();
    assert_eq!(
        network,
        vec![
            (SignalCategory::Tcp, "interceptor".to_owned()),
            (SignalCategory::Icmp, "fighter".to_owned()),
        ]
    );
    assert_eq!(session.summary().network_spawns, 2);
    assert_eq!(session.signal_stats().observed(SignalCategory::Tcp), 2);
}

#[test]
fn shutdown_silences_the_background_music() {
    let (mut session, recorder) = quiet_session(SessionConfig::default());
    assert_eq!(session.step(FRAME, firing()), SessionStatus::Playing);
    session.shutdown();
    assert_eq!(
        recorder.cues.borrow().last(),
        Some(&Cue::Stop(SoundCue::BackgroundMusic))
    );
    assert_eq!(session.summary().frames, 1);
    assert!(!session.is_over());
}
