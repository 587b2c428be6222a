use std::time::Duration;

use packet_striker_config::{ConfigTables, EncounterTuning};
use packet_striker_core::{Command, DestroyCause, Playfield};
use packet_striker_system_waves::{Config, WaveManager, WavePhase};
use packet_striker_world::{self as world, query, World, WorldConfig};

const FRAME: Duration = Duration::from_millis(16);

struct Harness {
    world: World,
    manager: WaveManager,
    carried: Vec<packet_striker_core::Event>,
    issued: Vec<Command>,
}

impl Harness {
    fn new(seed: u64, tuning: EncounterTuning) -> Self {
        let tables = ConfigTables::builtin();
        let world = World::new(WorldConfig::new(tables.clone(), seed));
        let manager = WaveManager::new(Config::new(tuning, Playfield::default(), seed), &tables);
        Self {
            world,
            manager,
            carried: Vec::new(),
            issued: Vec::new(),
        }
    }

    fn step(&mut self) {
        let mut events = std::mem::take(&mut self.carried);
        world::apply(&mut self.world, Command::Tick { dt: FRAME }, &mut events);
        let mut commands = Vec::new();
        self.manager
            .handle(&events, &query::enemy_view(&self.world), &mut commands);
        for command in commands {
            self.issued.push(command.clone());
            world::apply(&mut self.world, command, &mut self.carried);
        }
    }
}

#[test]
fn identical_seeds_replay_identical_waves() {
    let mut first = Harness::new(0xfeed, EncounterTuning::default());
    let mut second = Harness::new(0xfeed, EncounterTuning::default());
    for _ in 0..600 {
        first.step();
        second.step();
    }
    assert!(!first.issued.is_empty());
    assert_eq!(first.issued, second.issued);
}

#[test]
fn first_wave_spawns_scouts_above_the_field() {
    let mut harness = Harness::new(7, EncounterTuning::default());
    for _ in 0..300 {
        harness.step();
    }
    assert!(harness.issued.iter().all(|command| match command {
        Command::SpawnEnemy { kind, position, .. } => {
            kind == "scout" && (-100.0..=-50.0).contains(&position.y)
        }
        _ => false,
    }));
    assert!(harness.manager.spawned() >= 3);
}

#[test]
fn destroying_the_boss_ends_the_boss_wave() {
    let mut harness = Harness::new(11, EncounterTuning::default());
    harness.manager.start_wave(5);
    harness.step();
    harness.step();

    let boss = harness.manager.boss().expect("boss spawn confirmed");
    assert!(query::boss(&harness.world, boss).is_some());

    let mut events = Vec::new();
    world::apply(
        &mut harness.world,
        Command::DestroyEnemy {
            enemy: boss,
            cause: DestroyCause::PlayerFire,
        },
        &mut events,
    );
    harness.carried.extend(events);
    harness.step();
    assert_eq!(harness.manager.phase(), WavePhase::Transitioning);
}

#[test]
fn boss_wave_at_the_wave_limit_is_a_victory() {
    let mut harness = Harness::new(11, EncounterTuning::default().with_max_waves(5));
    harness.manager.start_wave(5);
    harness.step();
    harness.step();
    let boss = harness.manager.boss().expect("boss spawn confirmed");

    let mut events = Vec::new();
    world::apply(
        &mut harness.world,
        Command::DestroyEnemy {
            enemy: boss,
            cause: DestroyCause::PlayerFire,
        },
        &mut events,
    );
    harness.carried.extend(events);
    harness.step();
    assert!(harness.manager.is_victory());
}
